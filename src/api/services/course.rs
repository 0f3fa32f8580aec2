//! Learner course endpoints. Every route here sits behind `RequireAuth::user()`.

use actix_web::{Responder, Result as ActixResult, web};
use tracing::debug;

use crate::api::middleware::AuthenticatedUser;
use crate::errors::KopiError;
use crate::services::{AppServices, QuizSubmission};

use super::admin::{
    ErrorCode, ProgressResetResponse, error_from_kopi, error_with_code, success_response,
};

fn course_error(err: &KopiError) -> actix_web::HttpResponse {
    match err {
        KopiError::Validation(_) => error_with_code(err, ErrorCode::InvalidSubmission),
        _ => error_from_kopi(err),
    }
}

/// Course overview with per-chapter progress.
pub async fn overview(
    user: AuthenticatedUser,
    services: web::Data<AppServices>,
) -> ActixResult<impl Responder> {
    Ok(match services.course.overview(&user.0).await {
        Ok(progress) => success_response(progress),
        Err(e) => course_error(&e),
    })
}

pub async fn chapter(
    user: AuthenticatedUser,
    path: web::Path<String>,
    services: web::Data<AppServices>,
) -> ActixResult<impl Responder> {
    Ok(match services.course.chapter(&user.0, &path).await {
        Ok(view) => success_response(view),
        Err(e @ KopiError::NotFound(_)) => error_with_code(&e, ErrorCode::ChapterNotFound),
        Err(e) => course_error(&e),
    })
}

pub async fn material(
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
    services: web::Data<AppServices>,
) -> ActixResult<impl Responder> {
    let (chapter_id, material_id) = path.into_inner();
    Ok(
        match services
            .course
            .material(&user.0, &chapter_id, &material_id)
            .await
        {
            Ok(view) => success_response(view),
            Err(e @ KopiError::NotFound(_)) => error_with_code(&e, ErrorCode::MaterialNotFound),
            Err(e) => course_error(&e),
        },
    )
}

/// Questions without answers.
pub async fn quiz(
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
    services: web::Data<AppServices>,
) -> ActixResult<impl Responder> {
    let (chapter_id, material_id) = path.into_inner();
    Ok(
        match services.course.quiz(&user.0, &chapter_id, &material_id).await {
            Ok(view) => success_response(view),
            Err(e @ KopiError::NotFound(_)) => error_with_code(&e, ErrorCode::MaterialNotFound),
            Err(e) => course_error(&e),
        },
    )
}

pub async fn submit_quiz(
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
    body: web::Json<QuizSubmission>,
    services: web::Data<AppServices>,
) -> ActixResult<impl Responder> {
    let (chapter_id, material_id) = path.into_inner();
    debug!(
        "Quiz submission from {} for {}/{}",
        user.0.id, chapter_id, material_id
    );
    Ok(
        match services
            .course
            .submit_quiz(&user.0, &chapter_id, &material_id, body.into_inner())
            .await
        {
            Ok(outcome) => success_response(outcome),
            Err(e @ KopiError::NotFound(_)) => error_with_code(&e, ErrorCode::MaterialNotFound),
            Err(e) => course_error(&e),
        },
    )
}

pub async fn certificate(
    user: AuthenticatedUser,
    services: web::Data<AppServices>,
) -> ActixResult<impl Responder> {
    Ok(match services.course.certificate(&user.0).await {
        Ok(cert) => success_response(cert),
        Err(e) => course_error(&e),
    })
}

pub async fn reset_progress(
    user: AuthenticatedUser,
    services: web::Data<AppServices>,
) -> ActixResult<impl Responder> {
    Ok(match services.course.reset_progress(&user.0).await {
        Ok(removed) => success_response(ProgressResetResponse { removed }),
        Err(e) => course_error(&e),
    })
}

/// Course routes `/course`; the caller wraps them with authentication.
pub fn course_routes() -> actix_web::Scope {
    web::scope("/course")
        .route("", web::get().to(overview))
        .route("/certificate", web::get().to(certificate))
        .route("/progress", web::delete().to(reset_progress))
        .route("/chapters/{chapter}", web::get().to(chapter))
        .route(
            "/chapters/{chapter}/materials/{material}",
            web::get().to(material),
        )
        .route(
            "/chapters/{chapter}/materials/{material}/quiz",
            web::get().to(quiz),
        )
        .route(
            "/chapters/{chapter}/materials/{material}/quiz",
            web::post().to(submit_quiz),
        )
}
