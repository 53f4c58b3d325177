//! Ordered pipeline of best-effort stages followed by an optional fatal stage.
//!
//! Best-effort failures are reported through a callback and recorded; the
//! pipeline keeps going. A failing fatal stage aborts the run with
//! [`FatalStageFailed`]. Nothing is rolled back.

use futures::future::BoxFuture;

pub type StageFuture<'a, E> = BoxFuture<'a, Result<(), E>>;

struct Stage<'a, E> {
    name: String,
    run: StageFuture<'a, E>,
}

pub struct Pipeline<'a, E> {
    best_effort: Vec<Stage<'a, E>>,
    fatal: Option<Stage<'a, E>>,
}

/// Outcome of the best-effort stages of a completed run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
}

#[derive(Debug)]
pub struct FatalStageFailed<E> {
    pub stage: String,
    pub error: E,
    /// What the best-effort stages did before the fatal stage failed
    pub report: PipelineReport,
}

impl<'a, E> Pipeline<'a, E> {
    pub fn new() -> Self {
        Self {
            best_effort: Vec::new(),
            fatal: None,
        }
    }

    /// Appends a stage whose failure is reported but does not stop the run.
    pub fn best_effort(mut self, name: impl Into<String>, run: StageFuture<'a, E>) -> Self {
        self.best_effort.push(Stage { name: name.into(), run });
        self
    }

    /// Sets the final stage. Its failure fails the whole run.
    pub fn then_fatal(mut self, name: impl Into<String>, run: StageFuture<'a, E>) -> Self {
        self.fatal = Some(Stage { name: name.into(), run });
        self
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.best_effort.len() + usize::from(self.fatal.is_some())
    }

    /// Runs stages sequentially in insertion order.
    pub async fn run<F>(self, mut on_failure: F) -> Result<PipelineReport, FatalStageFailed<E>>
    where
        F: FnMut(&str, &E),
    {
        let mut report = PipelineReport::default();

        for stage in self.best_effort {
            match stage.run.await {
                Ok(()) => report.succeeded.push(stage.name),
                Err(e) => {
                    on_failure(&stage.name, &e);
                    report.failed.push(stage.name);
                }
            }
        }

        if let Some(stage) = self.fatal {
            if let Err(error) = stage.run.await {
                on_failure(&stage.name, &error);
                return Err(FatalStageFailed {
                    stage: stage.name,
                    error,
                    report,
                });
            }
        }

        Ok(report)
    }
}

impl<'a, E> Default for Pipeline<'a, E> {
    fn default() -> Self {
        Self::new()
    }
}
