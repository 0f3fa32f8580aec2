//! Storage backend tests
//!
//! Tests for SeaOrmStorage using temporary SQLite databases.

use chrono::{Duration, Utc};
use kopistart::config::{DatabaseConfig, init_config};
use kopistart::errors::KopiError;
use kopistart::storage::backend::{SeaOrmStorage, infer_backend_from_url};
use kopistart::storage::{Bean, CatalogKind, GlossaryTerm, Role, Tool, User};
use std::sync::Once;
use tempfile::TempDir;

// 确保 config 只初始化一次
static INIT: Once = Once::new();

fn init_test_config() {
    INIT.call_once(|| {
        init_config();
    });
}

fn create_test_bean(id: &str, name: &str) -> Bean {
    Bean {
        id: id.to_string(),
        name: name.to_string(),
        origin: "Aceh".to_string(),
        bean_type: "Arabika".to_string(),
        flavor: "Rempah".to_string(),
        description: format!("{} dari dataran tinggi", name),
        image_url: String::new(),
        image_hint: String::new(),
    }
}

fn create_test_user(email: &str, role: Role) -> User {
    User {
        id: format!("user-{}", email.replace('@', "-")),
        name: "Penguji".to_string(),
        email: email.to_string(),
        password_hash: "$argon2id$v=19$placeholder".to_string(),
        role,
        created_at: Utc::now(),
    }
}

/// 创建临时 SQLite 数据库的存储实例
async fn create_temp_storage() -> (SeaOrmStorage, TempDir) {
    init_test_config();

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let config = DatabaseConfig {
        database_url: format!("sqlite://{}?mode=rwc", db_path.display()),
        ..Default::default()
    };

    let storage = SeaOrmStorage::new(&config)
        .await
        .expect("Failed to create storage");

    (storage, temp_dir)
}

// =============================================================================
// URL 推断测试
// =============================================================================

#[cfg(test)]
mod url_inference_tests {
    use super::*;

    #[test]
    fn test_infer_sqlite() {
        assert_eq!(infer_backend_from_url("sqlite://data.db").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("kopistart.db").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url(":memory:").unwrap(), "sqlite");
    }

    #[test]
    fn test_infer_server_backends() {
        assert_eq!(
            infer_backend_from_url("mysql://root@localhost/kopi").unwrap(),
            "mysql"
        );
        assert_eq!(
            infer_backend_from_url("mariadb://root@localhost/kopi").unwrap(),
            "mysql"
        );
        assert_eq!(
            infer_backend_from_url("postgres://kopi@localhost/kopi").unwrap(),
            "postgres"
        );
    }

    #[test]
    fn test_infer_unknown() {
        let err = infer_backend_from_url("redis://localhost").unwrap_err();
        assert!(matches!(err, KopiError::DatabaseConfig(_)));
    }

    #[tokio::test]
    async fn test_empty_url_rejected() {
        let config = DatabaseConfig {
            database_url: String::new(),
            ..Default::default()
        };
        assert!(SeaOrmStorage::new(&config).await.is_err());
    }
}

// =============================================================================
// 目录条目测试
// =============================================================================

#[cfg(test)]
mod catalog_storage_tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_get() {
        let (storage, _dir) = create_temp_storage().await;

        storage
            .insert_item(&create_test_bean("bean-1", "Gayo"))
            .await
            .unwrap();

        let bean = storage.get_item::<Bean>("bean-1").await.unwrap().unwrap();
        assert_eq!(bean.name, "Gayo");
        assert_eq!(bean.origin, "Aceh");
        assert!(storage.get_item::<Bean>("bean-404").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_duplicate_is_conflict() {
        let (storage, _dir) = create_temp_storage().await;

        storage
            .insert_item(&create_test_bean("bean-1", "Gayo"))
            .await
            .unwrap();
        let err = storage
            .insert_item(&create_test_bean("bean-1", "Toraja"))
            .await
            .unwrap_err();

        assert!(matches!(err, KopiError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let (storage, _dir) = create_temp_storage().await;

        storage
            .insert_item(&create_test_bean("x-1", "Gayo"))
            .await
            .unwrap();
        storage
            .insert_item(&Tool {
                id: "x-1".to_string(),
                name: "Grinder".to_string(),
                description: "Penggiling".to_string(),
                image_url: String::new(),
                image_hint: String::new(),
            })
            .await
            .unwrap();

        assert_eq!(storage.count_items(CatalogKind::Beans).await.unwrap(), 1);
        assert_eq!(storage.count_items(CatalogKind::Tools).await.unwrap(), 1);
        assert_eq!(storage.count_items(CatalogKind::Glossary).await.unwrap(), 0);
        assert!(storage.item_exists(CatalogKind::Tools, "x-1").await.unwrap());
        assert!(!storage.item_exists(CatalogKind::Techniques, "x-1").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let (storage, _dir) = create_temp_storage().await;

        for (id, name) in [("bean-3", "Toraja"), ("bean-1", "Gayo"), ("bean-2", "Kintamani")] {
            storage
                .insert_item(&create_test_bean(id, name))
                .await
                .unwrap();
        }

        let names: Vec<String> = storage
            .list_items::<Bean>()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, vec!["Toraja", "Gayo", "Kintamani"]);
    }

    #[tokio::test]
    async fn test_upsert_replaces_in_place() {
        let (storage, _dir) = create_temp_storage().await;

        storage
            .insert_item(&create_test_bean("bean-1", "Gayo"))
            .await
            .unwrap();
        storage
            .insert_item(&create_test_bean("bean-2", "Toraja"))
            .await
            .unwrap();

        storage
            .upsert_item(&create_test_bean("bean-1", "Gayo Wine"))
            .await
            .unwrap();

        let beans = storage.list_items::<Bean>().await.unwrap();
        assert_eq!(beans.len(), 2);
        assert_eq!(beans[0].id, "bean-1");
        assert_eq!(beans[0].name, "Gayo Wine");
    }

    #[tokio::test]
    async fn test_remove_item() {
        let (storage, _dir) = create_temp_storage().await;

        storage
            .insert_item(&create_test_bean("bean-1", "Gayo"))
            .await
            .unwrap();
        storage.remove_item(CatalogKind::Beans, "bean-1").await.unwrap();
        assert_eq!(storage.count_items(CatalogKind::Beans).await.unwrap(), 0);

        let err = storage
            .remove_item(CatalogKind::Beans, "bean-1")
            .await
            .unwrap_err();
        assert!(matches!(err, KopiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_replace_collection() {
        let (storage, _dir) = create_temp_storage().await;

        storage
            .insert_item(&create_test_bean("bean-old", "Lama"))
            .await
            .unwrap();

        let terms = vec![
            GlossaryTerm {
                id: "term-1".to_string(),
                term: "Crema".to_string(),
                definition: "Busa espresso".to_string(),
            },
            GlossaryTerm {
                id: "term-2".to_string(),
                term: "Bloom".to_string(),
                definition: "Pelepasan gas".to_string(),
            },
        ];
        storage.replace_collection(&terms).await.unwrap();
        storage
            .replace_collection(&[create_test_bean("bean-new", "Baru")])
            .await
            .unwrap();

        let beans = storage.list_items::<Bean>().await.unwrap();
        assert_eq!(beans.len(), 1);
        assert_eq!(beans[0].id, "bean-new");
        assert_eq!(storage.count_items(CatalogKind::Glossary).await.unwrap(), 2);
    }
}

// =============================================================================
// 用户与进度测试
// =============================================================================

#[cfg(test)]
mod user_storage_tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_find_user() {
        let (storage, _dir) = create_temp_storage().await;

        let user = create_test_user("sari@kopi.id", Role::User);
        storage.insert_user(&user).await.unwrap();

        let by_email = storage.get_user("sari@kopi.id").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
        assert_eq!(by_email.role, Role::User);

        let by_id = storage.get_user_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "sari@kopi.id");
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let (storage, _dir) = create_temp_storage().await;

        storage
            .insert_user(&create_test_user("sari@kopi.id", Role::User))
            .await
            .unwrap();
        let mut again = create_test_user("sari@kopi.id", Role::Admin);
        again.id = "user-other".to_string();

        let err = storage.insert_user(&again).await.unwrap_err();
        assert!(matches!(err, KopiError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_role() {
        let (storage, _dir) = create_temp_storage().await;

        storage
            .insert_user(&create_test_user("budi@kopi.id", Role::User))
            .await
            .unwrap();
        let updated = storage
            .update_user_role("budi@kopi.id", Role::Admin)
            .await
            .unwrap();
        assert!(updated.is_admin());

        let err = storage
            .update_user_role("nobody@kopi.id", Role::Admin)
            .await
            .unwrap_err();
        assert!(matches!(err, KopiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_record_completion_keeps_best_score() {
        let (storage, _dir) = create_temp_storage().await;
        let first_at = Utc::now() - Duration::days(2);

        let first = storage
            .record_completion("user-1", "materi-1-1", 75.0, first_at)
            .await
            .unwrap();
        assert!(first.newly_completed);

        let better = storage
            .record_completion("user-1", "materi-1-1", 100.0, Utc::now())
            .await
            .unwrap();
        assert!(!better.newly_completed);
        assert_eq!(better.completion.score, 100.0);

        let worse = storage
            .record_completion("user-1", "materi-1-1", 75.0, Utc::now())
            .await
            .unwrap();
        assert_eq!(worse.completion.score, 100.0);

        let completions = storage.list_completions("user-1").await.unwrap();
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].score, 100.0);
        assert_eq!(
            completions[0].completed_at.timestamp(),
            first_at.timestamp()
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_completions_of_same_material() {
        let (storage, _dir) = create_temp_storage().await;
        let storage = std::sync::Arc::new(storage);

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let storage = storage.clone();
                tokio::spawn(async move {
                    storage
                        .record_completion("user-x", "materi-1-1", 50.0 + i as f64, Utc::now())
                        .await
                })
            })
            .collect();

        let mut newly = 0;
        for handle in handles {
            let record = handle.await.unwrap().unwrap();
            if record.newly_completed {
                newly += 1;
            }
        }
        assert_eq!(newly, 1);

        let completions = storage.list_completions("user-x").await.unwrap();
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].score, 65.0);
        assert_eq!(storage.stats().await.unwrap().completions, 1);
    }

    #[tokio::test]
    async fn test_reset_progress_only_touches_one_user() {
        let (storage, _dir) = create_temp_storage().await;

        for material in ["materi-1-1", "materi-1-2"] {
            storage
                .record_completion("user-1", material, 100.0, Utc::now())
                .await
                .unwrap();
        }
        storage
            .record_completion("user-2", "materi-1-1", 100.0, Utc::now())
            .await
            .unwrap();

        assert_eq!(storage.reset_progress("user-1").await.unwrap(), 2);
        assert!(storage.list_completions("user-1").await.unwrap().is_empty());
        assert_eq!(storage.list_all_completions().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_user_drops_progress() {
        let (storage, _dir) = create_temp_storage().await;

        let user = create_test_user("dewi@kopi.id", Role::User);
        storage.insert_user(&user).await.unwrap();
        storage
            .record_completion(&user.id, "materi-1-1", 100.0, Utc::now())
            .await
            .unwrap();

        storage.remove_user("dewi@kopi.id").await.unwrap();

        assert!(storage.get_user("dewi@kopi.id").await.unwrap().is_none());
        assert!(storage.list_completions(&user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stats() {
        let (storage, _dir) = create_temp_storage().await;

        storage
            .insert_item(&create_test_bean("bean-1", "Gayo"))
            .await
            .unwrap();
        storage
            .insert_user(&create_test_user("sari@kopi.id", Role::User))
            .await
            .unwrap();

        let stats = storage.stats().await.unwrap();
        assert_eq!(stats.beans, 1);
        assert_eq!(stats.users, 1);
        assert_eq!(stats.completions, 0);
    }

    #[tokio::test]
    async fn test_ping() {
        let (storage, _dir) = create_temp_storage().await;
        assert!(storage.ping().await.is_ok());
        assert_eq!(storage.backend_name(), "sqlite");
    }
}
