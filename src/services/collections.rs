// ==================== USER-SCOPED COLLECTIONS ====================
// Registro único das collections que guardam dados por user_id.
// Exclusão e exportação escolhem seus subconjuntos a partir daqui.

/// One collection holding rows tagged with `user_id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCollection {
    pub name: String,
    /// Rows are removed on account deletion
    pub purge: bool,
    /// Rows are included in a data export
    pub export: bool,
}

impl UserCollection {
    fn new(name: &str, purge: bool, export: bool) -> Self {
        Self {
            name: name.to_string(),
            purge,
            export,
        }
    }
}

/// (name, purge, export)
const DEFAULT_COLLECTIONS: &[(&str, bool, bool)] = &[
    ("user_preferences", true, true),
    ("user_secrets", true, false),
    ("autopilot_configs", true, true),
    ("activity_logs", true, true),
    ("weekly_reports", true, true),
    ("campaigns", true, true),
    ("leads", true, true),
    ("content_library", true, true),
    ("video_projects", true, true),
    ("brand_analyses", true, false),
    ("funnel_designs", true, false),
    ("gap_analyses", true, false),
    ("tracking_frameworks", true, false),
];

#[derive(Debug, Clone, Default)]
pub struct CollectionRegistry {
    collections: Vec<UserCollection>,
}

impl CollectionRegistry {
    pub fn new(collections: Vec<UserCollection>) -> Self {
        Self { collections }
    }

    pub fn with_defaults() -> Self {
        Self::new(
            DEFAULT_COLLECTIONS
                .iter()
                .map(|(name, purge, export)| UserCollection::new(name, *purge, *export))
                .collect(),
        )
    }

    /// Replaces the purge subset with `names`. Unknown names are appended to the registry.
    pub fn with_purge_set(mut self, names: &[String]) -> Self {
        self.ensure_registered(names);
        for collection in &mut self.collections {
            collection.purge = names.contains(&collection.name);
        }
        self
    }

    /// Replaces the export subset with `names`. Unknown names are appended to the registry.
    pub fn with_export_set(mut self, names: &[String]) -> Self {
        self.ensure_registered(names);
        for collection in &mut self.collections {
            collection.export = names.contains(&collection.name);
        }
        self
    }

    fn ensure_registered(&mut self, names: &[String]) {
        for name in names {
            if !self.collections.iter().any(|c| &c.name == name) {
                self.collections.push(UserCollection::new(name, false, false));
            }
        }
    }

    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.collections.iter().map(|c| c.name.as_str())
    }

    /// Collections purged on account deletion, in registry order
    pub fn purge_targets(&self) -> Vec<&str> {
        self.collections
            .iter()
            .filter(|c| c.purge)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Collections included in a data export, in registry order
    pub fn export_targets(&self) -> Vec<&str> {
        self.collections
            .iter()
            .filter(|c| c.export)
            .map(|c| c.name.as_str())
            .collect()
    }
}
