use std::str::FromStr;

use tracing::warn;

use crate::storage::models::{MaterialCompletion, Role, User};
use migration::entities::{material_completion, user};

/// 将 users 行转换为 User；未知角色按普通用户处理
pub fn model_to_user(model: user::Model) -> User {
    let role = Role::from_str(&model.role).unwrap_or_else(|_| {
        warn!("Unknown role '{}' for {}, treating as user", model.role, model.email);
        Role::User
    });
    User {
        id: model.id,
        name: model.name,
        email: model.email,
        password_hash: model.password_hash,
        role,
        created_at: model.created_at,
    }
}

pub fn user_to_active_model(u: &User) -> user::ActiveModel {
    use sea_orm::ActiveValue::Set;

    user::ActiveModel {
        email: Set(u.email.clone()),
        id: Set(u.id.clone()),
        name: Set(u.name.clone()),
        password_hash: Set(u.password_hash.clone()),
        role: Set(u.role.to_string()),
        created_at: Set(u.created_at),
    }
}

pub fn model_to_completion(model: material_completion::Model) -> MaterialCompletion {
    MaterialCompletion {
        user_id: model.user_id,
        material_id: model.material_id,
        score: model.score,
        completed_at: model.completed_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row(role: &str) -> user::Model {
        user::Model {
            email: "budi@kopi.id".into(),
            id: "user-1".into(),
            name: "Budi".into(),
            password_hash: "$argon2id$x".into(),
            role: role.into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_round_trip() {
        let admin = model_to_user(row("admin"));
        assert_eq!(admin.role, Role::Admin);
        let am = user_to_active_model(&admin);
        assert_eq!(am.role, sea_orm::ActiveValue::Set("admin".to_string()));
    }

    #[test]
    fn test_unknown_role_falls_back_to_user() {
        assert_eq!(model_to_user(row("barista")).role, Role::User);
    }
}
