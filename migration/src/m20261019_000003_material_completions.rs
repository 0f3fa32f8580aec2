use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 课程进度：每个用户已完成的材料
        manager
            .create_table(
                Table::create()
                    .table(MaterialCompletion::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MaterialCompletion::UserId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaterialCompletion::MaterialId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaterialCompletion::Score)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MaterialCompletion::CompletedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(MaterialCompletion::UserId)
                            .col(MaterialCompletion::MaterialId),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MaterialCompletion::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum MaterialCompletion {
    #[sea_orm(iden = "material_completions")]
    Table,
    UserId,
    MaterialId,
    Score,
    CompletedAt,
}
