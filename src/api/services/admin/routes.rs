//! Admin API 路由配置
//!
//! 将 /v1 下的路由按功能模块拆分。

use actix_web::web;

use crate::services::CatalogRegistry;
use crate::storage::{Bean, GlossaryTerm, Technique, Tool};

use super::catalog_crud::{
    create_item, delete_item, duplicate_item, get_item, list_items, update_item,
};
use super::export_import::{export_items, import_items, import_items_json, reset_items};
use super::participants::{export_participants, list_participants};
use super::users::{delete_user, get_stats, list_users, update_user_role};

/// 目录集合路由 `/{kind}`
///
/// 包含：
/// - GET/HEAD /{kind} - 分页列出
/// - POST /{kind} - 创建
/// - GET /{kind}/export - 导出 JSON
/// - POST /{kind}/import - multipart 导入
/// - POST /{kind}/import/json - JSON 请求体导入
/// - POST /{kind}/reset - 恢复种子数据
/// - POST /{kind}/{id}/duplicate - 复制
/// - GET/PUT/DELETE /{kind}/{id}
pub fn catalog_routes<T: CatalogRegistry>() -> actix_web::Scope {
    web::scope(&format!("/{}", T::KIND))
        .route("", web::get().to(list_items::<T>))
        .route("", web::head().to(list_items::<T>))
        .route("", web::post().to(create_item::<T>))
        // Fixed paths must be registered before /{id}
        .route("/export", web::get().to(export_items::<T>))
        .route("/import", web::post().to(import_items::<T>))
        .route("/import/json", web::post().to(import_items_json::<T>))
        .route("/reset", web::post().to(reset_items::<T>))
        .route("/{id}/duplicate", web::post().to(duplicate_item::<T>))
        .route("/{id}", web::get().to(get_item::<T>))
        .route("/{id}", web::put().to(update_item::<T>))
        .route("/{id}", web::delete().to(delete_item::<T>))
}

/// 学员进度路由 `/participants`
pub fn participants_routes() -> actix_web::Scope {
    web::scope("/participants")
        .route("", web::get().to(list_participants))
        .route("/export", web::get().to(export_participants))
}

/// 用户管理路由 `/users`
pub fn users_routes() -> actix_web::Scope {
    web::scope("/users")
        .route("", web::get().to(list_users))
        .route("/{email}/role", web::put().to(update_user_role))
        .route("/{email}", web::delete().to(delete_user))
}

/// 统计路由 `/stats`
pub fn stats_routes() -> actix_web::Scope {
    web::scope("/stats")
        .route("", web::get().to(get_stats))
        .route("", web::head().to(get_stats))
}

/// Admin API v1 路由，认证中间件由调用方包裹
pub fn admin_v1_routes() -> actix_web::Scope {
    web::scope("/v1")
        .service(catalog_routes::<Bean>())
        .service(catalog_routes::<Technique>())
        .service(catalog_routes::<Tool>())
        .service(catalog_routes::<GlossaryTerm>())
        .service(participants_routes())
        .service(users_routes())
        .service(stats_routes())
}
