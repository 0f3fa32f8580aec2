//! 认证端点：注册、登录、刷新、登出、当前用户

use actix_governor::{Governor, GovernorConfigBuilder, KeyExtractor, SimpleKeyExtractionError};
use actix_web::dev::ServiceRequest;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, Result as ActixResult, Route, web};
use governor::middleware::NoOpMiddleware;
use tracing::{debug, error, info, warn};

use crate::api::constants;
use crate::api::jwt::get_jwt_service;
use crate::api::middleware::{AuthenticatedUser, RequireAuth};
use crate::errors::KopiError;
use crate::services::{AppServices, RegisterRequest};
use crate::storage::User;

use super::admin::{
    AuthSuccessResponse, CookieBuilder, ErrorCode, LoginCredentials, MessageResponse,
    RefreshRequest, UserResponse, error_from_kopi, error_response, error_with_code, json_response,
    success_response,
};

/// 基于连接 IP 的限流 key 提取器
#[derive(Clone, Copy)]
pub struct LoginKeyExtractor;

impl KeyExtractor for LoginKeyExtractor {
    type Key = String;
    type KeyExtractionError = SimpleKeyExtractionError<&'static str>;

    fn extract(&self, req: &ServiceRequest) -> Result<Self::Key, Self::KeyExtractionError> {
        // 无 peer 地址（如测试请求）时共用一个桶
        let key = req
            .connection_info()
            .peer_addr()
            .unwrap_or("unknown")
            .to_string();
        Ok(key)
    }
}

/// 创建登录限流器
///
/// 每秒补充 1 个令牌，突发上限取 auth.login_burst
/// 超限返回 HTTP 429 Too Many Requests
pub fn login_rate_limiter() -> Option<Governor<LoginKeyExtractor, NoOpMiddleware>> {
    let burst = crate::config::get_config().auth.login_burst;
    let config = GovernorConfigBuilder::default()
        .seconds_per_request(1)
        .burst_size(burst)
        .key_extractor(LoginKeyExtractor)
        .finish()?;

    debug!("Login rate limiter created: 1 req/s, burst {}", burst);
    Some(Governor::new(&config))
}

fn login_route() -> Route {
    let route = web::post().to(login);
    match login_rate_limiter() {
        Some(limiter) => route.wrap(limiter),
        None => {
            warn!("Invalid auth.login_burst, login rate limiting disabled");
            route
        }
    }
}

/// 签发 access/refresh token 并写入 cookie
fn issue_tokens(user: &User, status: StatusCode, message: &str) -> HttpResponse {
    let jwt_service = get_jwt_service();
    let tokens = jwt_service.generate_access_token(user).and_then(|access| {
        jwt_service
            .generate_refresh_token(user)
            .map(|refresh| (access, refresh))
    });

    let (access_token, refresh_token) = match tokens {
        Ok(pair) => pair,
        Err(e) => {
            error!("Failed to generate tokens for {}: {}", user.email, e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "Failed to generate token",
            );
        }
    };

    let cookie_builder = CookieBuilder::from_config();
    let body = AuthSuccessResponse {
        access_token: access_token.clone(),
        refresh_token: refresh_token.clone(),
        token_type: "Bearer".to_string(),
        expires_in: cookie_builder.access_token_minutes() * 60,
        user: UserResponse::from(user),
    };

    let mut response = json_response(status, ErrorCode::Success, message, Some(body));
    for cookie in [
        cookie_builder.build_access_cookie(access_token),
        cookie_builder.build_refresh_cookie(refresh_token),
    ] {
        if let Err(e) = response.add_cookie(&cookie) {
            warn!("Failed to set auth cookie: {}", e);
        }
    }
    response
}

/// 注册新学员并直接登录
pub async fn register(
    body: web::Json<RegisterRequest>,
    services: web::Data<AppServices>,
) -> ActixResult<impl Responder> {
    match services.users.register(body.into_inner()).await {
        Ok(user) => {
            info!("Registered new user {}", user.email);
            Ok(issue_tokens(&user, StatusCode::CREATED, "Registered"))
        }
        Err(e @ KopiError::Conflict(_)) => Ok(error_with_code(&e, ErrorCode::UserAlreadyExists)),
        Err(e @ KopiError::Validation(_)) if e.message().starts_with("Password") => {
            Ok(error_with_code(&e, ErrorCode::WeakPassword))
        }
        Err(e) => Ok(error_from_kopi(&e)),
    }
}

/// 邮箱 + 密码登录
pub async fn login(
    body: web::Json<LoginCredentials>,
    services: web::Data<AppServices>,
) -> ActixResult<impl Responder> {
    match services
        .users
        .authenticate(&body.email, &body.password)
        .await
    {
        Ok(user) => {
            info!("Login successful: {}", user.email);
            Ok(issue_tokens(&user, StatusCode::OK, "Login successful"))
        }
        Err(e @ KopiError::Unauthorized(_)) => {
            info!("Login failed for {}", body.email);
            Ok(error_with_code(&e, ErrorCode::AuthFailed))
        }
        Err(e) => Ok(error_from_kopi(&e)),
    }
}

/// 刷新 token（滑动过期），refresh token 取自请求体或 cookie
pub async fn refresh_token(
    req: HttpRequest,
    body: Option<web::Json<RefreshRequest>>,
    services: web::Data<AppServices>,
) -> ActixResult<impl Responder> {
    let token = body
        .and_then(|b| b.into_inner().refresh_token)
        .or_else(|| {
            req.cookie(constants::REFRESH_COOKIE_NAME)
                .map(|c| c.value().to_string())
        })
        .filter(|t| !t.is_empty());

    let Some(token) = token else {
        warn!("Refresh token not provided");
        return Ok(error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::TokenInvalid,
            "Refresh token not found",
        ));
    };

    let claims = match get_jwt_service().validate_refresh_token(&token) {
        Ok(claims) => claims,
        Err(e) => {
            warn!("Invalid refresh token: {}", e);
            return Ok(error_response(
                StatusCode::UNAUTHORIZED,
                ErrorCode::TokenInvalid,
                "Invalid refresh token",
            ));
        }
    };

    // 重新读取用户，角色变化在刷新后生效
    match services.users.find_by_id(&claims.sub).await {
        Ok(Some(user)) => {
            debug!("Token refreshed for {}", user.email);
            Ok(issue_tokens(&user, StatusCode::OK, "Token refreshed"))
        }
        Ok(None) => Ok(error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::TokenInvalid,
            "Invalid refresh token",
        )),
        Err(e) => Ok(error_from_kopi(&e)),
    }
}

/// 登出 - 清除 cookies
pub async fn logout() -> ActixResult<impl Responder> {
    let cookie_builder = CookieBuilder::from_config();

    Ok(HttpResponse::Ok()
        .cookie(cookie_builder.build_expired_access_cookie())
        .cookie(cookie_builder.build_expired_refresh_cookie())
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(super::admin::ApiResponse {
            code: ErrorCode::Success as i32,
            message: "OK".to_string(),
            data: Some(MessageResponse::new("Logout successful")),
        }))
}

/// 当前登录用户
pub async fn me(user: AuthenticatedUser) -> ActixResult<impl Responder> {
    Ok(success_response(UserResponse::from(&user.0)))
}

/// 认证路由 `/auth`
///
/// 包含：
/// - POST /auth/register - 注册
/// - POST /auth/login - 登录（带限流）
/// - POST /auth/refresh - 刷新 token
/// - POST /auth/logout - 登出
/// - GET /auth/me - 当前用户（需登录）
pub fn auth_routes() -> actix_web::Scope {
    web::scope("/auth")
        .route("/register", web::post().to(register))
        .route("/login", login_route())
        .route("/refresh", web::post().to(refresh_token))
        .route("/logout", web::post().to(logout))
        .route("/me", web::get().to(me).wrap(RequireAuth::user()))
}
