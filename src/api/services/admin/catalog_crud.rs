//! Admin API 目录条目 CRUD

use actix_web::{Responder, Result as ActixResult, web};
use tracing::{info, warn};

use crate::errors::KopiError;
use crate::services::{AppServices, CatalogRegistry, ListQuery};

use super::error_code::ErrorCode;
use super::helpers::{created_response, error_with_code, success_response};
use super::types::MessageResponse;

/// 目录相关错误使用目录域错误码
pub(super) fn catalog_error(err: &KopiError) -> actix_web::HttpResponse {
    let code = match err {
        KopiError::NotFound(_) => ErrorCode::CatalogItemNotFound,
        KopiError::Conflict(_) => ErrorCode::CatalogItemExists,
        KopiError::Validation(_) => ErrorCode::CatalogInvalidItem,
        KopiError::DatabaseOperation(_) | KopiError::DatabaseConnection(_) => {
            ErrorCode::CatalogStorageError
        }
        other => ErrorCode::from(other),
    };
    error_with_code(err, code)
}

/// 列出条目（分页 + 搜索）
pub async fn list_items<T: CatalogRegistry>(
    query: web::Query<ListQuery>,
    services: web::Data<AppServices>,
) -> ActixResult<impl Responder> {
    let page = T::service(&services).list(&query).await;
    Ok(success_response(page))
}

pub async fn get_item<T: CatalogRegistry>(
    id: web::Path<String>,
    services: web::Data<AppServices>,
) -> ActixResult<impl Responder> {
    Ok(match T::service(&services).get(&id).await {
        Ok(item) => success_response(item),
        Err(e) => catalog_error(&e),
    })
}

pub async fn create_item<T: CatalogRegistry>(
    body: web::Json<T>,
    services: web::Data<AppServices>,
) -> ActixResult<impl Responder> {
    match T::service(&services).create(body.into_inner()).await {
        Ok(item) => {
            info!("Admin API: created {} {}", T::KIND, item.id());
            Ok(created_response(item))
        }
        Err(e) => {
            warn!("Admin API: create {} failed: {}", T::KIND, e);
            Ok(catalog_error(&e))
        }
    }
}

pub async fn update_item<T: CatalogRegistry>(
    id: web::Path<String>,
    body: web::Json<T>,
    services: web::Data<AppServices>,
) -> ActixResult<impl Responder> {
    match T::service(&services).update(&id, body.into_inner()).await {
        Ok(item) => {
            info!("Admin API: updated {} {}", T::KIND, item.id());
            Ok(success_response(item))
        }
        Err(e) => Ok(catalog_error(&e)),
    }
}

pub async fn delete_item<T: CatalogRegistry>(
    id: web::Path<String>,
    services: web::Data<AppServices>,
) -> ActixResult<impl Responder> {
    match T::service(&services).delete(&id).await {
        Ok(()) => {
            info!("Admin API: deleted {} {}", T::KIND, id);
            Ok(success_response(MessageResponse::new(format!(
                "Deleted {}",
                id.as_str()
            ))))
        }
        Err(e) => Ok(catalog_error(&e)),
    }
}

/// 复制条目，分配新 id
pub async fn duplicate_item<T: CatalogRegistry>(
    id: web::Path<String>,
    services: web::Data<AppServices>,
) -> ActixResult<impl Responder> {
    match T::service(&services).duplicate(&id).await {
        Ok(copy) => {
            info!("Admin API: duplicated {} {} -> {}", T::KIND, id, copy.id());
            Ok(created_response(copy))
        }
        Err(e) => Ok(catalog_error(&e)),
    }
}
