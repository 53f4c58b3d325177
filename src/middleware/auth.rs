use crate::{
    config::JwtSettings,
    models::AuthenticatedUser,
    services::auth_service,
};
use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage, HttpResponse,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

/// Verifies the bearer token and stores an [`AuthenticatedUser`] in request extensions.
/// Missing or invalid tokens are answered with 401 before reaching the handler.
pub struct AuthMiddleware {
    settings: Rc<JwtSettings>,
}

impl AuthMiddleware {
    pub fn new(settings: JwtSettings) -> Self {
        Self {
            settings: Rc::new(settings),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            settings: self.settings.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    settings: Rc<JwtSettings>,
}

fn unauthorized<B>(req: ServiceRequest, message: &str) -> LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, Error>>
where
    B: 'static,
{
    let response = HttpResponse::Unauthorized()
        .json(serde_json::json!({
            "status": "error",
            "message": message
        }))
        .map_into_right_body();
    let (req, _payload) = req.into_parts();

    Box::pin(async move { Ok(ServiceResponse::new(req, response)) })
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Get Authorization header
        let token = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(auth_service::bearer_token)
            .map(str::to_string);

        let Some(token) = token else {
            log::warn!("🔒 {} {} - missing authorization token", req.method(), req.path());
            return unauthorized(req, "Missing authorization token");
        };

        match auth_service::verify_token(&token, &self.settings) {
            Ok(claims) => {
                req.extensions_mut().insert(AuthenticatedUser::from(claims));

                let fut = self.service.call(req);
                Box::pin(async move {
                    let res = fut.await?;
                    Ok(res.map_into_left_body())
                })
            }
            Err(e) => {
                log::warn!("🔒 {} {} - {}", req.method(), req.path(), e);
                unauthorized(req, "Invalid or expired token")
            }
        }
    }
}
