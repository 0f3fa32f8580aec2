use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 catalog_entries 表（每个集合一行一条记录，payload 为 JSON）
        manager
            .create_table(
                Table::create()
                    .table(CatalogEntry::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CatalogEntry::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CatalogEntry::Collection).string().not_null())
                    .col(ColumnDef::new(CatalogEntry::ItemId).string().not_null())
                    .col(ColumnDef::new(CatalogEntry::Payload).text().not_null())
                    .col(
                        ColumnDef::new(CatalogEntry::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CatalogEntry::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // (collection, item_id) 唯一
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_catalog_collection_item")
                    .table(CatalogEntry::Table)
                    .col(CatalogEntry::Collection)
                    .col(CatalogEntry::ItemId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_catalog_collection_item").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(CatalogEntry::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CatalogEntry {
    #[sea_orm(iden = "catalog_entries")]
    Table,
    Id,
    Collection,
    ItemId,
    Payload,
    CreatedAt,
    UpdatedAt,
}
