//! Service layer for business logic
//!
//! Shared between the HTTP handlers and the CLI.

mod catalog_service;
mod course_service;
mod participant_service;
mod user_service;

pub use catalog_service::*;
pub use course_service::*;
pub use participant_service::*;
pub use user_service::*;

use std::sync::Arc;

use crate::course::CourseContent;
use crate::course::progression::ProgressionPolicy;
use crate::storage::{Bean, GlossaryTerm, SeaOrmStorage, StorageStats, Technique, Tool};

/// All services, wired to one storage and one course.
#[derive(Clone)]
pub struct AppServices {
    pub storage: Arc<SeaOrmStorage>,
    pub beans: CatalogService<Bean>,
    pub techniques: CatalogService<Technique>,
    pub tools: CatalogService<Tool>,
    pub glossary: CatalogService<GlossaryTerm>,
    pub users: UserService,
    pub course: CourseService,
    pub participants: ParticipantService,
}

impl AppServices {
    pub fn new(
        storage: Arc<SeaOrmStorage>,
        content: Arc<CourseContent>,
        course_config: &crate::config::CourseConfig,
    ) -> Self {
        Self {
            beans: CatalogService::new(storage.clone()),
            techniques: CatalogService::new(storage.clone()),
            tools: CatalogService::new(storage.clone()),
            glossary: CatalogService::new(storage.clone()),
            users: UserService::new(storage.clone()),
            course: CourseService::new(
                storage.clone(),
                content.clone(),
                course_config.passing_score,
                ProgressionPolicy::from_config(course_config),
            ),
            participants: ParticipantService::new(storage.clone(), content),
            storage,
        }
    }

    /// Seeds every empty catalog collection. Returns entries written.
    pub async fn seed_empty_collections(&self) -> crate::errors::Result<usize> {
        Ok(self.beans.seed_if_empty().await?
            + self.techniques.seed_if_empty().await?
            + self.tools.seed_if_empty().await?
            + self.glossary.seed_if_empty().await?)
    }

    pub async fn stats(&self) -> crate::errors::Result<StorageStats> {
        self.storage.stats().await
    }
}

/// Resolves the catalog service for an item type, so handlers and CLI
/// commands can be written once for all four collections.
pub trait CatalogRegistry: crate::storage::CatalogItem {
    fn service(services: &AppServices) -> &CatalogService<Self>;
}

impl CatalogRegistry for Bean {
    fn service(services: &AppServices) -> &CatalogService<Self> {
        &services.beans
    }
}

impl CatalogRegistry for Technique {
    fn service(services: &AppServices) -> &CatalogService<Self> {
        &services.techniques
    }
}

impl CatalogRegistry for Tool {
    fn service(services: &AppServices) -> &CatalogService<Self> {
        &services.tools
    }
}

impl CatalogRegistry for GlossaryTerm {
    fn service(services: &AppServices) -> &CatalogService<Self> {
        &services.glossary
    }
}
