//! Admin API 目录导出导入与重置

use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use futures_util::StreamExt;
use tracing::{error, info};

use crate::api::constants::MAX_IMPORT_FILE_SIZE;
use crate::errors::KopiError;
use crate::services::{AppServices, CatalogRegistry, ImportMode};

use super::catalog_crud::catalog_error;
use super::error_code::ErrorCode;
use super::helpers::{error_response, error_with_code, success_response};
use super::types::{ImportQuery, ResetResponse};

/// 导出集合为 JSON 附件，文件名与内置种子文件一致
pub async fn export_items<T: CatalogRegistry>(
    services: web::Data<AppServices>,
) -> ActixResult<impl Responder> {
    match T::service(&services).export_pretty().await {
        Ok(body) => {
            info!("Admin API: exported {}", T::KIND);
            Ok(HttpResponse::Ok()
                .content_type("application/json; charset=utf-8")
                .insert_header((
                    "Content-Disposition",
                    format!("attachment; filename=\"{}\"", T::KIND.seed_file()),
                ))
                .body(body))
        }
        Err(e) => Ok(error_with_code(&e, ErrorCode::ExportFailed)),
    }
}

/// 从 multipart 上传的 JSON 文件导入（字段 `file`，可选字段 `mode`）
pub async fn import_items<T: CatalogRegistry>(
    mut payload: Multipart,
    services: web::Data<AppServices>,
) -> ActixResult<impl Responder> {
    info!("Admin API: import {} request", T::KIND);

    let mut file_data: Option<Vec<u8>> = None;
    let mut mode = ImportMode::default();

    // 解析 multipart form data
    while let Some(item) = payload.next().await {
        let mut field = match item {
            Ok(f) => f,
            Err(e) => {
                error!("Failed to parse multipart field: {}", e);
                return Ok(error_response(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::InvalidMultipartData,
                    &format!("Invalid multipart data: {}", e),
                ));
            }
        };

        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                // 读取文件内容（带大小限制）
                let mut data = Vec::new();
                while let Some(chunk) = field.next().await {
                    match chunk {
                        Ok(bytes) => {
                            if data.len() + bytes.len() > MAX_IMPORT_FILE_SIZE {
                                return Ok(error_response(
                                    StatusCode::BAD_REQUEST,
                                    ErrorCode::FileTooLarge,
                                    &format!(
                                        "File size exceeds maximum {} MB",
                                        MAX_IMPORT_FILE_SIZE / 1024 / 1024
                                    ),
                                ));
                            }
                            data.extend_from_slice(&bytes);
                        }
                        Err(e) => {
                            error!("Failed to read file chunk: {}", e);
                            return Ok(error_response(
                                StatusCode::BAD_REQUEST,
                                ErrorCode::FileReadError,
                                &format!("Failed to read file: {}", e),
                            ));
                        }
                    }
                }
                file_data = Some(data);
            }
            "mode" => {
                let mut data = Vec::new();
                while let Some(chunk) = field.next().await {
                    if let Ok(bytes) = chunk {
                        data.extend_from_slice(&bytes);
                    }
                }
                mode = match String::from_utf8_lossy(&data).trim().to_lowercase().as_str() {
                    "overwrite" => ImportMode::Overwrite,
                    "error" => ImportMode::Error,
                    _ => ImportMode::Skip,
                };
            }
            _ => {
                // 忽略未知字段
            }
        }
    }

    let data = match file_data {
        Some(data) if !data.is_empty() => data,
        _ => {
            return Ok(error_response(
                StatusCode::BAD_REQUEST,
                ErrorCode::ImportFileMissing,
                "No JSON file provided",
            ));
        }
    };

    let raw = match String::from_utf8(data) {
        Ok(raw) => raw,
        Err(_) => {
            return Ok(error_response(
                StatusCode::BAD_REQUEST,
                ErrorCode::ImportParseError,
                "File is not valid UTF-8.",
            ));
        }
    };

    info!(
        "Admin API: import {} mode={:?}, file size={} bytes",
        T::KIND,
        mode,
        raw.len()
    );

    Ok(import_response(
        T::service(&services).import_str(&raw, mode).await,
    ))
}

/// 直接以 JSON 请求体导入，`?mode=skip|overwrite|error`
pub async fn import_items_json<T: CatalogRegistry>(
    query: web::Query<ImportQuery>,
    body: web::Json<serde_json::Value>,
    services: web::Data<AppServices>,
) -> ActixResult<impl Responder> {
    Ok(import_response(
        T::service(&services)
            .import_value(&body, query.mode)
            .await,
    ))
}

fn import_response(result: crate::errors::Result<crate::services::ImportResult>) -> HttpResponse {
    match result {
        Ok(summary) => {
            info!(
                "Import finished: {} success, {} skipped, {} failed",
                summary.success, summary.skipped, summary.failed
            );
            success_response(summary)
        }
        Err(e @ KopiError::Serialization(_)) => error_with_code(&e, ErrorCode::ImportParseError),
        Err(e @ KopiError::Validation(_)) => error_with_code(&e, ErrorCode::ImportFailed),
        Err(e) => catalog_error(&e),
    }
}

/// 用内置种子数据替换整个集合
pub async fn reset_items<T: CatalogRegistry>(
    services: web::Data<AppServices>,
) -> ActixResult<impl Responder> {
    match T::service(&services).reset_to_seed().await {
        Ok(restored) => {
            info!("Admin API: reset {} to seed ({} items)", T::KIND, restored);
            Ok(success_response(ResetResponse { restored }))
        }
        Err(e) => Ok(catalog_error(&e)),
    }
}
