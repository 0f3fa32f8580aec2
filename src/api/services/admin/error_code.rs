//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::KopiError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字。
/// 按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证错误
/// - 3000-3099: 目录错误
/// - 4000-4099: 导入导出错误
/// - 5000-5099: 课程错误
/// - 6000-6099: 用户错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    Conflict = 1009,
    FileTooLarge = 1011,
    ServiceUnavailable = 1030,

    // 认证错误 2000-2099
    AuthFailed = 2000,
    TokenExpired = 2001,
    TokenInvalid = 2002,
    RateLimitExceeded = 2004,
    WeakPassword = 2005,

    // 目录错误 3000-3099
    CatalogItemNotFound = 3000,
    CatalogItemExists = 3001,
    CatalogInvalidItem = 3002,
    CatalogStorageError = 3005,

    // 导入导出错误 4000-4099
    ImportFailed = 4000,
    ExportFailed = 4001,
    InvalidMultipartData = 4002,
    FileReadError = 4003,
    ImportFileMissing = 4004,
    ImportParseError = 4005,
    CsvGenerationError = 4006,

    // 课程错误 5000-5099
    ChapterNotFound = 5000,
    MaterialNotFound = 5001,
    MaterialLocked = 5002,
    CertificateLocked = 5003,
    InvalidSubmission = 5004,
    CourseContentError = 5005,

    // 用户错误 6000-6099
    UserNotFound = 6000,
    UserAlreadyExists = 6001,
    CannotModifySelf = 6002,
}

impl From<&KopiError> for ErrorCode {
    fn from(err: &KopiError) -> Self {
        match err {
            KopiError::Validation(_) => ErrorCode::BadRequest,
            KopiError::Serialization(_) => ErrorCode::ImportParseError,
            KopiError::NotFound(_) => ErrorCode::NotFound,
            KopiError::Conflict(_) => ErrorCode::Conflict,
            KopiError::Unauthorized(_) => ErrorCode::Unauthorized,
            KopiError::Token(_) => ErrorCode::TokenInvalid,
            KopiError::Forbidden(_) => ErrorCode::Forbidden,
            KopiError::MaterialLocked(_) => ErrorCode::MaterialLocked,
            KopiError::CertificateLocked(_) => ErrorCode::CertificateLocked,
            KopiError::InvalidContent(_) => ErrorCode::CourseContentError,
            KopiError::DatabaseConnection(_) => ErrorCode::ServiceUnavailable,
            KopiError::DatabaseConfig(_)
            | KopiError::DatabaseOperation(_)
            | KopiError::FileOperation(_)
            | KopiError::PasswordHash(_) => ErrorCode::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::Success).unwrap(), "0");
        assert_eq!(
            serde_json::to_string(&ErrorCode::MaterialLocked).unwrap(),
            "5002"
        );
        let parsed: ErrorCode = serde_json::from_str("3001").unwrap();
        assert_eq!(parsed, ErrorCode::CatalogItemExists);
    }

    #[test]
    fn test_from_kopi_error() {
        assert_eq!(
            ErrorCode::from(&KopiError::not_found("x")),
            ErrorCode::NotFound
        );
        assert_eq!(
            ErrorCode::from(&KopiError::certificate_locked("x")),
            ErrorCode::CertificateLocked
        );
        assert_eq!(
            ErrorCode::from(&KopiError::database_operation("x")),
            ErrorCode::InternalServerError
        );
    }
}
