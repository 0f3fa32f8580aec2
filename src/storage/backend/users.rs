use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, SqlErr, TransactionTrait};
use tracing::info;

use super::SeaOrmStorage;
use super::converters::{model_to_user, user_to_active_model};
use super::retry;
use crate::errors::{KopiError, Result};
use crate::storage::models::{Role, User};

use migration::entities::{material_completion, user};

impl SeaOrmStorage {
    /// 按邮箱查找（邮箱需已规范化）
    pub async fn get_user(&self, email: &str) -> Result<Option<User>> {
        let db = &self.db;
        let model = retry::with_retry("get_user", self.retry_config, || async {
            user::Entity::find_by_id(email.to_string()).one(db).await
        })
        .await?;
        Ok(model.map(model_to_user))
    }

    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Id.eq(id))
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_user))
    }

    /// 新增用户，邮箱已存在时返回 Conflict
    pub async fn insert_user(&self, new_user: &User) -> Result<()> {
        match user::Entity::insert(user_to_active_model(new_user))
            .exec_without_returning(&self.db)
            .await
        {
            Ok(_) => {
                self.invalidate_count_cache();
                info!("User created: {} ({})", new_user.email, new_user.role);
                Ok(())
            }
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => Err(
                KopiError::conflict("Pengguna dengan email ini sudah terdaftar."),
            ),
            Err(e) => Err(e.into()),
        }
    }

    /// 按注册时间列出全部用户
    pub async fn list_users(&self) -> Result<Vec<User>> {
        let models = user::Entity::find()
            .order_by_asc(user::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_user).collect())
    }

    pub async fn update_user_role(&self, email: &str, role: Role) -> Result<User> {
        use sea_orm::{ActiveModelTrait, ActiveValue::Set};

        let model = user::Entity::find_by_id(email.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| KopiError::not_found(format!("Pengguna '{}' tidak ditemukan", email)))?;

        let mut active: user::ActiveModel = model.into();
        active.role = Set(role.to_string());
        let updated = active.update(&self.db).await?;

        info!("User role updated: {} -> {}", email, role);
        Ok(model_to_user(updated))
    }

    /// 删除用户及其学习进度
    pub async fn remove_user(&self, email: &str) -> Result<()> {
        let txn = self.db.begin().await?;

        let Some(model) = user::Entity::find_by_id(email.to_string())
            .one(&txn)
            .await?
        else {
            return Err(KopiError::not_found(format!(
                "Pengguna '{}' tidak ditemukan",
                email
            )));
        };

        material_completion::Entity::delete_many()
            .filter(material_completion::Column::UserId.eq(model.id.as_str()))
            .exec(&txn)
            .await?;
        user::Entity::delete_by_id(email.to_string())
            .exec(&txn)
            .await?;

        txn.commit().await?;

        self.invalidate_count_cache();
        info!("User removed: {}", email);
        Ok(())
    }
}
