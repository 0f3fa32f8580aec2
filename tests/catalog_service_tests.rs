//! Catalog service tests
//!
//! CRUD, search, paging and JSON import/export over a temporary SQLite database.

use std::sync::{Arc, Once};

use kopistart::config::{CourseConfig, DatabaseConfig, init_config};
use kopistart::errors::KopiError;
use kopistart::seed;
use kopistart::services::{AppServices, ImportMode, ListQuery};
use kopistart::storage::{Bean, CatalogItem, GlossaryTerm, StorageFactory, Technique};
use serde_json::json;
use tempfile::TempDir;

static INIT: Once = Once::new();

fn init_test_config() {
    INIT.call_once(|| {
        init_config();
    });
}

async fn create_services() -> (AppServices, TempDir) {
    init_test_config();

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("catalog.db");
    let config = DatabaseConfig {
        database_url: format!("sqlite://{}?mode=rwc", db_path.display()),
        ..Default::default()
    };

    let storage = StorageFactory::create_with(&config)
        .await
        .expect("Failed to create storage");
    let content = seed::course_content().expect("built-in course should load");
    let services = AppServices::new(storage, Arc::new(content), &CourseConfig::default());

    (services, temp_dir)
}

fn bean(name: &str, origin: &str) -> Bean {
    Bean {
        id: String::new(),
        name: name.to_string(),
        origin: origin.to_string(),
        bean_type: "Arabika".to_string(),
        flavor: "Cokelat".to_string(),
        description: String::new(),
        image_url: String::new(),
        image_hint: String::new(),
    }
}

fn term(term: &str, definition: &str) -> GlossaryTerm {
    GlossaryTerm {
        id: String::new(),
        term: term.to_string(),
        definition: definition.to_string(),
    }
}

#[cfg(test)]
mod crud_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_assigns_prefixed_id() {
        let (services, _dir) = create_services().await;

        let created = services.beans.create(bean("Gayo", "Aceh")).await.unwrap();
        assert!(created.id.starts_with("bean-"));

        let fetched = services.beans.get(&created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_ignores_client_id() {
        let (services, _dir) = create_services().await;

        let mut draft = bean("Gayo", "Aceh");
        draft.id = "bean-custom".to_string();
        let created = services.beans.create(draft).await.unwrap();

        assert_ne!(created.id, "bean-custom");
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let (services, _dir) = create_services().await;

        let err = services.beans.create(bean("  ", "Aceh")).await.unwrap_err();
        assert!(matches!(err, KopiError::Validation(_)));
        assert_eq!(services.beans.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_glossary_requires_definition() {
        let (services, _dir) = create_services().await;

        let err = services.glossary.create(term("Crema", "")).await.unwrap_err();
        assert!(matches!(err, KopiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_keeps_id() {
        let (services, _dir) = create_services().await;

        let created = services.beans.create(bean("Gayo", "Aceh")).await.unwrap();
        let mut draft = bean("Gayo Natural", "Aceh Tengah");
        draft.id = "bean-ignored".to_string();

        let updated = services.beans.update(&created.id, draft).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(
            services.beans.get(&created.id).await.unwrap().name,
            "Gayo Natural"
        );
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let (services, _dir) = create_services().await;

        let err = services
            .beans
            .update("bean-404", bean("Gayo", "Aceh"))
            .await
            .unwrap_err();
        assert!(matches!(err, KopiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_then_get() {
        let (services, _dir) = create_services().await;

        let created = services.beans.create(bean("Gayo", "Aceh")).await.unwrap();
        services.beans.delete(&created.id).await.unwrap();

        assert!(matches!(
            services.beans.get(&created.id).await,
            Err(KopiError::NotFound(_))
        ));
        assert!(matches!(
            services.beans.delete(&created.id).await,
            Err(KopiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_copies_fields() {
        let (services, _dir) = create_services().await;

        let original = services.beans.create(bean("Gayo", "Aceh")).await.unwrap();
        let copy = services.beans.duplicate(&original.id).await.unwrap();

        assert_ne!(copy.id, original.id);
        assert_eq!(copy.name, original.name);
        assert_eq!(copy.origin, original.origin);
        assert_eq!(services.beans.count().await.unwrap(), 2);
    }
}

#[cfg(test)]
mod query_tests {
    use super::*;

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let (services, _dir) = create_services().await;

        services.beans.create(bean("Gayo", "Aceh")).await.unwrap();
        services.beans.create(bean("Toraja", "Sulawesi")).await.unwrap();

        let found = services.beans.search(Some("SULAWESI")).await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Toraja");

        assert_eq!(services.beans.search(Some("  ")).await.len(), 2);
        assert!(services.beans.search(Some("kenya")).await.is_empty());
    }

    #[tokio::test]
    async fn test_paging() {
        let (services, _dir) = create_services().await;

        for i in 0..5 {
            services
                .techniques
                .create(Technique {
                    id: String::new(),
                    name: format!("Teknik {}", i),
                    description: "Seduh manual".to_string(),
                    image_url: String::new(),
                    image_hint: String::new(),
                })
                .await
                .unwrap();
        }

        let page = services
            .techniques
            .list(&ListQuery {
                search: None,
                page: 2,
                page_size: 2,
            })
            .await;
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].name, "Teknik 2");
    }

    #[tokio::test]
    async fn test_huge_page_is_empty() {
        let (services, _dir) = create_services().await;

        services.beans.create(bean("Gayo", "Aceh")).await.unwrap();

        let page = services
            .beans
            .list(&ListQuery {
                search: None,
                page: u64::MAX,
                page_size: 100,
            })
            .await;
        assert_eq!(page.total, 1);
        assert_eq!(page.page, u64::MAX);
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_read_failure_serves_seed() {
        use sea_orm::ConnectionTrait;

        let (services, _dir) = create_services().await;
        services.beans.create(bean("Gayo", "Aceh")).await.unwrap();

        services
            .storage
            .get_db()
            .execute_unprepared("DROP TABLE catalog_entries")
            .await
            .unwrap();

        let seed_ids: Vec<String> = seed::catalog_seed::<Bean>()
            .unwrap()
            .iter()
            .map(|b| b.id().to_string())
            .collect();
        let served: Vec<String> = services
            .beans
            .all()
            .await
            .iter()
            .map(|b| b.id().to_string())
            .collect();

        assert!(!served.is_empty());
        assert_eq!(served, seed_ids);
    }

    #[tokio::test]
    async fn test_glossary_sorted_and_grouped() {
        let (services, _dir) = create_services().await;

        for (t, d) in [
            ("Crema", "Busa espresso"),
            ("Acidity", "Rasa asam"),
            ("Body", "Kekentalan"),
            ("Bloom", "Pelepasan gas"),
        ] {
            services.glossary.create(term(t, d)).await.unwrap();
        }

        let all: Vec<String> = services
            .glossary
            .all()
            .await
            .into_iter()
            .map(|t| t.term)
            .collect();
        assert_eq!(all, vec!["Acidity", "Bloom", "Body", "Crema"]);

        let groups = services.glossary.grouped(None).await;
        let letters: Vec<&str> = groups.iter().map(|g| g.letter.as_str()).collect();
        assert_eq!(letters, vec!["A", "B", "C"]);
        assert_eq!(groups[1].terms.len(), 2);

        let filtered = services.glossary.grouped(Some("gas")).await;
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].terms[0].term, "Bloom");
    }
}

#[cfg(test)]
mod import_export_tests {
    use super::*;

    #[tokio::test]
    async fn test_importing_beans_array_appends() {
        let (services, _dir) = create_services().await;

        services.beans.create(bean("Gayo", "Aceh")).await.unwrap();

        let doc = json!({
            "beans": [
                {"id": "bean-imp-1", "name": "Kintamani", "origin": "Bali", "type": "Arabika"},
                {"id": "bean-imp-2", "name": "Flores Bajawa", "origin": "NTT", "type": "Arabika"}
            ]
        });
        let result = services
            .beans
            .import_value(&doc, ImportMode::Skip)
            .await
            .unwrap();

        assert_eq!(result.success, 2);
        assert_eq!(result.failed, 0);
        assert_eq!(services.beans.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_import_modes_on_existing_id() {
        let (services, _dir) = create_services().await;

        let first = json!({"beans": [{"id": "bean-x", "name": "Gayo"}]});
        services
            .beans
            .import_value(&first, ImportMode::Skip)
            .await
            .unwrap();

        let second = json!({"beans": [{"id": "bean-x", "name": "Gayo Honey"}]});

        let skipped = services
            .beans
            .import_value(&second, ImportMode::Skip)
            .await
            .unwrap();
        assert_eq!(skipped.skipped, 1);
        assert_eq!(services.beans.get("bean-x").await.unwrap().name, "Gayo");

        let errored = services
            .beans
            .import_value(&second, ImportMode::Error)
            .await
            .unwrap();
        assert_eq!(errored.failed, 1);
        assert_eq!(errored.errors[0].id.as_deref(), Some("bean-x"));

        let overwritten = services
            .beans
            .import_value(&second, ImportMode::Overwrite)
            .await
            .unwrap();
        assert_eq!(overwritten.success, 1);
        assert_eq!(
            services.beans.get("bean-x").await.unwrap().name,
            "Gayo Honey"
        );
        assert_eq!(services.beans.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_import_counts_invalid_entries() {
        let (services, _dir) = create_services().await;

        let doc = json!({
            "terms": [
                {"term": "Crema", "definition": "Busa"},
                {"term": "", "definition": "kosong"},
                {"definition": "tanpa istilah"}
            ]
        });
        let result = services
            .glossary
            .import_value(&doc, ImportMode::Skip)
            .await
            .unwrap();

        assert_eq!(result.success, 1);
        assert_eq!(result.failed, 2);
        assert_eq!(result.errors.len(), 2);

        let stored = services.glossary.all().await;
        assert!(stored[0].id.starts_with("term-"));
    }

    #[tokio::test]
    async fn test_import_rejects_wrong_shape() {
        let (services, _dir) = create_services().await;

        let err = services
            .beans
            .import_value(&json!({"tools": []}), ImportMode::Skip)
            .await
            .unwrap_err();
        assert!(matches!(err, KopiError::Validation(_)));

        let err = services
            .beans
            .import_str("not json", ImportMode::Skip)
            .await
            .unwrap_err();
        assert!(matches!(err, KopiError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_export_shape() {
        let (services, _dir) = create_services().await;

        services.beans.create(bean("Gayo", "Aceh")).await.unwrap();
        let doc = services.beans.export().await.unwrap();

        let beans = doc["beans"].as_array().unwrap();
        assert_eq!(beans.len(), 1);
        assert_eq!(beans[0]["name"], "Gayo");
        assert!(beans[0].get("imageUrl").is_some());
    }

    #[tokio::test]
    async fn test_reset_and_seed() {
        let (services, _dir) = create_services().await;

        let written = services.seed_empty_collections().await.unwrap();
        assert!(written > 0);
        assert_eq!(services.seed_empty_collections().await.unwrap(), 0);

        let seeded = seed::catalog_seed::<Bean>().unwrap();
        services.beans.create(bean("Tambahan", "Jawa")).await.unwrap();
        let restored = services.beans.reset_to_seed().await.unwrap();

        assert_eq!(restored, seeded.len());
        let ids: Vec<String> = services
            .beans
            .all()
            .await
            .iter()
            .map(|b| b.id().to_string())
            .collect();
        let seed_ids: Vec<String> = seeded.iter().map(|b| b.id().to_string()).collect();
        assert_eq!(ids, seed_ids);
    }
}
