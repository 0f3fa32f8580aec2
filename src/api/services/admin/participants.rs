//! Admin API 学员进度

use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use chrono::Utc;
use tracing::info;

use crate::services::AppServices;

use super::error_code::ErrorCode;
use super::helpers::{error_from_kopi, error_with_code, success_response};

/// 所有学员（非管理员）的进度概览
pub async fn list_participants(services: web::Data<AppServices>) -> ActixResult<impl Responder> {
    Ok(match services.participants.rows().await {
        Ok(rows) => success_response(rows),
        Err(e) => error_from_kopi(&e),
    })
}

/// 下载学员进度 CSV
pub async fn export_participants(
    services: web::Data<AppServices>,
) -> ActixResult<impl Responder> {
    let csv = match services.participants.export_csv().await {
        Ok(csv) => csv,
        Err(e) => return Ok(error_with_code(&e, ErrorCode::CsvGenerationError)),
    };

    let filename = format!(
        "kopistart_participants_{}.csv",
        Utc::now().format("%Y%m%d_%H%M%S")
    );
    info!("Admin API: exporting participants to {}", filename);

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", filename),
        ))
        .body(csv))
}
