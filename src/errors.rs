use actix_web::http::StatusCode;
use std::fmt;

#[derive(Debug, Clone)]
pub enum KopiError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
    MaterialLocked(String),
    CertificateLocked(String),
    InvalidContent(String),
    Serialization(String),
    PasswordHash(String),
    Token(String),
}

impl KopiError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            KopiError::DatabaseConfig(_) => "E001",
            KopiError::DatabaseConnection(_) => "E002",
            KopiError::DatabaseOperation(_) => "E003",
            KopiError::FileOperation(_) => "E004",
            KopiError::Validation(_) => "E005",
            KopiError::NotFound(_) => "E006",
            KopiError::Conflict(_) => "E007",
            KopiError::Unauthorized(_) => "E008",
            KopiError::Forbidden(_) => "E009",
            KopiError::MaterialLocked(_) => "E010",
            KopiError::CertificateLocked(_) => "E011",
            KopiError::InvalidContent(_) => "E012",
            KopiError::Serialization(_) => "E013",
            KopiError::PasswordHash(_) => "E014",
            KopiError::Token(_) => "E015",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            KopiError::DatabaseConfig(_) => "Database Configuration Error",
            KopiError::DatabaseConnection(_) => "Database Connection Error",
            KopiError::DatabaseOperation(_) => "Database Operation Error",
            KopiError::FileOperation(_) => "File Operation Error",
            KopiError::Validation(_) => "Validation Error",
            KopiError::NotFound(_) => "Resource Not Found",
            KopiError::Conflict(_) => "Resource Conflict",
            KopiError::Unauthorized(_) => "Unauthorized",
            KopiError::Forbidden(_) => "Forbidden",
            KopiError::MaterialLocked(_) => "Material Locked",
            KopiError::CertificateLocked(_) => "Certificate Locked",
            KopiError::InvalidContent(_) => "Invalid Course Content",
            KopiError::Serialization(_) => "Serialization Error",
            KopiError::PasswordHash(_) => "Password Hash Error",
            KopiError::Token(_) => "Token Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            KopiError::DatabaseConfig(msg)
            | KopiError::DatabaseConnection(msg)
            | KopiError::DatabaseOperation(msg)
            | KopiError::FileOperation(msg)
            | KopiError::Validation(msg)
            | KopiError::NotFound(msg)
            | KopiError::Conflict(msg)
            | KopiError::Unauthorized(msg)
            | KopiError::Forbidden(msg)
            | KopiError::MaterialLocked(msg)
            | KopiError::CertificateLocked(msg)
            | KopiError::InvalidContent(msg)
            | KopiError::Serialization(msg)
            | KopiError::PasswordHash(msg)
            | KopiError::Token(msg) => msg,
        }
    }

    /// 映射到 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            KopiError::Validation(_) | KopiError::Serialization(_) => StatusCode::BAD_REQUEST,
            KopiError::NotFound(_) => StatusCode::NOT_FOUND,
            KopiError::Conflict(_) => StatusCode::CONFLICT,
            KopiError::Unauthorized(_) | KopiError::Token(_) => StatusCode::UNAUTHORIZED,
            KopiError::Forbidden(_)
            | KopiError::MaterialLocked(_)
            | KopiError::CertificateLocked(_) => StatusCode::FORBIDDEN,
            KopiError::DatabaseConfig(_)
            | KopiError::DatabaseConnection(_)
            | KopiError::DatabaseOperation(_)
            | KopiError::FileOperation(_)
            | KopiError::InvalidContent(_)
            | KopiError::PasswordHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    #[cfg(feature = "server")]
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for KopiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for KopiError {}

// 便捷的构造函数
impl KopiError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        KopiError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        KopiError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        KopiError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        KopiError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        KopiError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        KopiError::NotFound(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        KopiError::Conflict(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        KopiError::Unauthorized(msg.into())
    }

    pub fn forbidden<T: Into<String>>(msg: T) -> Self {
        KopiError::Forbidden(msg.into())
    }

    pub fn material_locked<T: Into<String>>(msg: T) -> Self {
        KopiError::MaterialLocked(msg.into())
    }

    pub fn certificate_locked<T: Into<String>>(msg: T) -> Self {
        KopiError::CertificateLocked(msg.into())
    }

    pub fn invalid_content<T: Into<String>>(msg: T) -> Self {
        KopiError::InvalidContent(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        KopiError::Serialization(msg.into())
    }

    pub fn password_hash<T: Into<String>>(msg: T) -> Self {
        KopiError::PasswordHash(msg.into())
    }

    pub fn token<T: Into<String>>(msg: T) -> Self {
        KopiError::Token(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for KopiError {
    fn from(err: sea_orm::DbErr) -> Self {
        KopiError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for KopiError {
    fn from(err: std::io::Error) -> Self {
        KopiError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for KopiError {
    fn from(err: serde_json::Error) -> Self {
        KopiError::Serialization(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for KopiError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        KopiError::Token(err.to_string())
    }
}

impl From<crate::utils::password::PasswordError> for KopiError {
    fn from(err: crate::utils::password::PasswordError) -> Self {
        KopiError::PasswordHash(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, KopiError>;
