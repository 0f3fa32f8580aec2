//! API 模块常量定义

/// Access Token Cookie 名称
pub const ACCESS_COOKIE_NAME: &str = "kopistart_access";

/// Refresh Token Cookie 名称
pub const REFRESH_COOKIE_NAME: &str = "kopistart_refresh";

/// Refresh cookie 仅发送到认证端点
pub const AUTH_PATH: &str = "/api/v1/auth";

/// 最大导入文件大小 (5MB)
pub const MAX_IMPORT_FILE_SIZE: usize = 5 * 1024 * 1024;
