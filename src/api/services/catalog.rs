//! 公开的目录只读端点

use actix_web::{Responder, Result as ActixResult, web};
use serde::Deserialize;

use crate::services::{AppServices, CatalogRegistry};
use crate::storage::{Bean, GlossaryTerm, Technique, Tool};

use super::admin::{get_item, list_items, success_response};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

/// 按首字母分组的词汇表
pub async fn glossary_grouped(
    query: web::Query<SearchQuery>,
    services: web::Data<AppServices>,
) -> ActixResult<impl Responder> {
    let groups = services.glossary.grouped(query.search.as_deref()).await;
    Ok(success_response(groups))
}

fn read_routes<T: CatalogRegistry>(scope: actix_web::Scope) -> actix_web::Scope {
    scope
        .route("", web::get().to(list_items::<T>))
        .route("", web::head().to(list_items::<T>))
        .route("/{id}", web::get().to(get_item::<T>))
}

/// 公开目录路由
///
/// - GET /{beans,techniques,tools,glossary}?search&page&page_size
/// - GET /{kind}/{id}
/// - GET /glossary/grouped?search
pub fn catalog_public_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(read_routes::<Bean>(web::scope("/beans")))
        .service(read_routes::<Technique>(web::scope("/techniques")))
        .service(read_routes::<Tool>(web::scope("/tools")))
        .service(read_routes::<GlossaryTerm>(
            web::scope("/glossary").route("/grouped", web::get().to(glossary_grouped)),
        ));
}
