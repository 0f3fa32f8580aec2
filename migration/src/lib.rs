pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20261019_000001_catalog_entries;
mod m20261019_000002_users;
mod m20261019_000003_material_completions;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261019_000001_catalog_entries::Migration),
            Box::new(m20261019_000002_users::Migration),
            Box::new(m20261019_000003_material_completions::Migration),
        ]
    }
}
