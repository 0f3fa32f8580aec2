pub mod catalog_entry;
pub mod material_completion;
pub mod user;

pub use catalog_entry::Entity as CatalogEntryEntity;
pub use material_completion::Entity as MaterialCompletionEntity;
pub use user::Entity as UserEntity;
