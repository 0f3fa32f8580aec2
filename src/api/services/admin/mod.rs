//! Admin API 服务模块
//!
//! 该模块包含管理 API 的所有端点，包括：
//! - 目录 CRUD、复制、导入导出与重置
//! - 学员进度与 CSV 导出
//! - 用户角色管理
//! - 统计
//!
//! 以及全部 API 共用的响应类型、错误码和帮助函数。

mod catalog_crud;
pub mod error_code;
mod export_import;
mod helpers;
mod participants;
pub mod routes;
mod types;
mod users;

// 重新导出类型
pub use types::*;

// 重新导出帮助函数
pub use helpers::{
    CookieBuilder, api_result, created_response, error_from_kopi, error_response,
    error_with_code, json_response, success_response,
};

// 重新导出错误码
pub use error_code::ErrorCode;

pub use catalog_crud::{
    create_item, delete_item, duplicate_item, get_item, list_items, update_item,
};
pub use export_import::{export_items, import_items, import_items_json, reset_items};
pub use participants::{export_participants, list_participants};
pub use users::{delete_user, get_stats, list_users, update_user_role};
