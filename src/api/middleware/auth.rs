use actix_service::{Service, Transform};
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
    body::EitherBody,
    dev::{Payload, ServiceRequest, ServiceResponse},
    http::{Method, StatusCode, header::CONTENT_TYPE},
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{debug, info, trace, warn};

use crate::api::constants;
use crate::api::jwt::get_jwt_service;
use crate::api::services::admin::{ApiResponse, ErrorCode};
use crate::services::AppServices;
use crate::storage::User;

/// 通过认证的用户，由中间件写入 request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthenticatedUser>()
                .cloned()
                .ok_or_else(|| actix_web::error::ErrorUnauthorized("Not authenticated")),
        )
    }
}

/// JWT authentication middleware
///
/// Accepts a Bearer token or the access cookie, reloads the user from
/// storage so role changes and deletions take effect immediately.
#[derive(Clone, Copy)]
pub struct RequireAuth {
    admin_only: bool,
}

impl RequireAuth {
    /// Any signed-in user
    pub fn user() -> Self {
        Self { admin_only: false }
    }

    /// Admin role required
    pub fn admin() -> Self {
        Self { admin_only: true }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAuthMiddleware {
            service: Rc::new(service),
            admin_only: self.admin_only,
        }))
    }
}

pub struct RequireAuthMiddleware<S> {
    service: Rc<S>,
    admin_only: bool,
}

impl<S, B> RequireAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    /// Handle OPTIONS requests for CORS preflight
    fn handle_options_request(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        req.into_response(
            HttpResponse::NoContent()
                .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
                .finish()
                .map_into_right_body(),
        )
    }

    fn reject(
        req: ServiceRequest,
        status: StatusCode,
        code: ErrorCode,
        message: &str,
    ) -> ServiceResponse<EitherBody<B>> {
        req.into_response(
            HttpResponse::build(status)
                .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
                .json(ApiResponse::<()> {
                    code: code as i32,
                    message: message.to_string(),
                    data: None,
                })
                .map_into_right_body(),
        )
    }

    /// Bearer header 优先，其次 access cookie
    fn extract_token(req: &ServiceRequest) -> Option<String> {
        req.headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.trim().to_string())
            .or_else(|| {
                req.cookie(constants::ACCESS_COOKIE_NAME)
                    .map(|c| c.value().to_string())
            })
            .filter(|t| !t.is_empty())
    }
}

impl<S, B> Service<ServiceRequest> for RequireAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let admin_only = self.admin_only;

        Box::pin(async move {
            // Handle CORS preflight requests
            if req.method() == Method::OPTIONS {
                return Ok(Self::handle_options_request(req));
            }

            let Some(token) = Self::extract_token(&req) else {
                debug!("No access token on {}", req.path());
                return Ok(Self::reject(
                    req,
                    StatusCode::UNAUTHORIZED,
                    ErrorCode::Unauthorized,
                    "Silakan masuk terlebih dahulu.",
                ));
            };

            let claims = match get_jwt_service().validate_access_token(&token) {
                Ok(claims) => claims,
                Err(e) => {
                    info!("Access token validation failed: {}", e);
                    let code = match e.kind() {
                        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                            ErrorCode::TokenExpired
                        }
                        _ => ErrorCode::TokenInvalid,
                    };
                    return Ok(Self::reject(
                        req,
                        StatusCode::UNAUTHORIZED,
                        code,
                        "Sesi tidak valid atau telah berakhir.",
                    ));
                }
            };

            let Some(services) = req.app_data::<web::Data<AppServices>>().cloned() else {
                warn!("AppServices not registered; cannot resolve user");
                return Ok(Self::reject(
                    req,
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::InternalServerError,
                    "Terjadi kesalahan pada server.",
                ));
            };

            let user = match services.users.find_by_id(&claims.sub).await {
                Ok(Some(user)) => user,
                Ok(None) => {
                    info!("Token subject {} no longer exists", claims.sub);
                    return Ok(Self::reject(
                        req,
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::TokenInvalid,
                        "Sesi tidak valid atau telah berakhir.",
                    ));
                }
                Err(e) => {
                    warn!("Failed to load user {}: {}", claims.sub, e);
                    return Ok(Self::reject(
                        req,
                        StatusCode::SERVICE_UNAVAILABLE,
                        ErrorCode::ServiceUnavailable,
                        "Layanan sedang tidak tersedia.",
                    ));
                }
            };

            if admin_only && !user.is_admin() {
                info!("User {} denied admin access to {}", user.email, req.path());
                return Ok(Self::reject(
                    req,
                    StatusCode::FORBIDDEN,
                    ErrorCode::Forbidden,
                    "Akses khusus admin.",
                ));
            }

            trace!("Authenticated {} ({})", user.email, user.role);
            req.extensions_mut().insert(AuthenticatedUser(user));
            let response = srv.call(req).await?.map_into_left_body();
            Ok(response)
        })
    }
}
