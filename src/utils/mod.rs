pub mod password;

const TOKEN_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// 生成随机字母数字串（用于未配置时的 JWT 密钥）
pub fn generate_secure_token(length: usize) -> String {
    std::iter::repeat_with(|| TOKEN_CHARS[rand::random_range(0..TOKEN_CHARS.len())] as char)
        .take(length)
        .collect()
}

/// 生成目录记录 ID：`<prefix>-<unix 毫秒>`
pub fn generate_item_id(prefix: &str) -> String {
    format!("{}-{}", prefix, chrono::Utc::now().timestamp_millis())
}

/// 在 ID 冲突时追加随机后缀
pub fn generate_item_id_with_suffix(prefix: &str) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", generate_item_id(prefix), &suffix[..8])
}

/// 用户 ID：`user-<unix 毫秒>-<随机>`
pub fn generate_user_id() -> String {
    generate_item_id_with_suffix("user")
}

/// 规范化邮箱（去空白并转小写）
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// 粗略的邮箱格式检查
pub fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_item_id_prefix() {
        let id = generate_item_id("bean");
        assert!(id.starts_with("bean-"));
        assert!(id["bean-".len()..].parse::<i64>().is_ok());
    }

    #[test]
    fn test_suffixed_ids_differ() {
        assert_ne!(
            generate_item_id_with_suffix("tool"),
            generate_item_id_with_suffix("tool")
        );
    }

    #[test]
    fn test_generate_secure_token() {
        let token = generate_secure_token(32);
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, generate_secure_token(32));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Budi.S@Example.COM "), "budi.s@example.com");
    }

    #[test]
    fn test_is_plausible_email() {
        assert!(is_plausible_email("citra@example.com"));
        assert!(!is_plausible_email("citra.example.com"));
        assert!(!is_plausible_email("@example.com"));
        assert!(!is_plausible_email("citra@localhost"));
    }
}
