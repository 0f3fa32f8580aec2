//! Admin API 用户管理与统计

use actix_web::http::StatusCode;
use actix_web::{Responder, Result as ActixResult, web};
use tracing::info;

use crate::api::middleware::AuthenticatedUser;
use crate::errors::KopiError;
use crate::services::AppServices;
use crate::utils::normalize_email;

use super::error_code::ErrorCode;
use super::helpers::{error_from_kopi, error_response, error_with_code, success_response};
use super::types::{MessageResponse, RoleUpdateRequest, UserResponse};

fn user_error(err: &KopiError) -> actix_web::HttpResponse {
    match err {
        KopiError::NotFound(_) => error_with_code(err, ErrorCode::UserNotFound),
        KopiError::Conflict(_) => error_with_code(err, ErrorCode::UserAlreadyExists),
        _ => error_from_kopi(err),
    }
}

fn is_self(current: &AuthenticatedUser, email: &str) -> bool {
    current.0.email == normalize_email(email)
}

pub async fn list_users(services: web::Data<AppServices>) -> ActixResult<impl Responder> {
    Ok(match services.users.list().await {
        Ok(users) => success_response(users.iter().map(UserResponse::from).collect::<Vec<_>>()),
        Err(e) => user_error(&e),
    })
}

/// 修改用户角色；管理员不能修改自己的角色
pub async fn update_user_role(
    current: AuthenticatedUser,
    email: web::Path<String>,
    body: web::Json<RoleUpdateRequest>,
    services: web::Data<AppServices>,
) -> ActixResult<impl Responder> {
    if is_self(&current, &email) {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::CannotModifySelf,
            "Tidak dapat mengubah peran akun sendiri.",
        ));
    }

    match services.users.set_role(&email, body.role).await {
        Ok(user) => {
            info!("Admin API: {} set role of {} to {}", current.0.email, user.email, user.role);
            Ok(success_response(UserResponse::from(&user)))
        }
        Err(e) => Ok(user_error(&e)),
    }
}

/// 删除用户及其学习记录；管理员不能删除自己
pub async fn delete_user(
    current: AuthenticatedUser,
    email: web::Path<String>,
    services: web::Data<AppServices>,
) -> ActixResult<impl Responder> {
    if is_self(&current, &email) {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::CannotModifySelf,
            "Tidak dapat menghapus akun sendiri.",
        ));
    }

    match services.users.remove(&email).await {
        Ok(()) => {
            info!("Admin API: {} removed user {}", current.0.email, email);
            Ok(success_response(MessageResponse::new(format!(
                "Deleted {}",
                email.as_str()
            ))))
        }
        Err(e) => Ok(user_error(&e)),
    }
}

/// 各集合条目数、用户数与完成记录数
pub async fn get_stats(services: web::Data<AppServices>) -> ActixResult<impl Responder> {
    Ok(match services.stats().await {
        Ok(stats) => success_response(stats),
        Err(e) => error_from_kopi(&e),
    })
}
