//! HTTP API
//!
//! - `/health` 探针
//! - `/api/v1` 公开目录、认证与课程（课程需登录）
//! - `/admin/v1` 管理端（需 admin 角色）

pub mod constants;
pub mod jwt;
pub mod middleware;
pub mod services;

use actix_web::http::StatusCode;
use actix_web::web;

use middleware::RequireAuth;
use services::admin::{ErrorCode, error_response, routes::admin_v1_routes};
use services::{auth_routes, catalog_public_routes, course_routes, health_routes};

/// JSON 请求体解析失败时返回统一的 ApiResponse
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(crate::api::constants::MAX_IMPORT_FILE_SIZE)
        .error_handler(|err, _req| {
            let message = format!("Invalid JSON body: {}", err);
            actix_web::error::InternalError::from_response(
                err,
                error_response(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, &message),
            )
            .into()
        })
}

/// 查询串解析失败（如 `?page=abc`）同样返回 ApiResponse
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let message = format!("Invalid query string: {}", err);
        actix_web::error::InternalError::from_response(
            err,
            error_response(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, &message),
        )
        .into()
    })
}

/// 注册全部路由，服务器与集成测试共用
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .service(health_routes())
        .service(
            web::scope("/api/v1")
                .service(auth_routes())
                .service(course_routes().wrap(RequireAuth::user()))
                .configure(catalog_public_routes),
        )
        .service(
            web::scope("/admin")
                .wrap(RequireAuth::admin())
                .service(admin_v1_routes()),
        );
}
