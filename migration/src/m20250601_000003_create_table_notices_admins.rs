use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Notices::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Notices::NoticeId).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Notices::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Notices::Content).text().not_null())
                    .col(
                        ColumnDef::new(Notices::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Notices::Priority)
                            .string()
                            .not_null()
                            .default("medium"),
                    )
                    .col(ColumnDef::new(Notices::ExpiryDate).timestamp().null())
                    .col(
                        ColumnDef::new(Notices::TargetAudience)
                            .string()
                            .not_null()
                            .default("all"),
                    )
                    .col(
                        ColumnDef::new(Notices::CreatedBy)
                            .string()
                            .not_null()
                            .default("Admin"),
                    )
                    .col(ColumnDef::new(Notices::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Notices::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        for (name, col) in [
            ("idx_notices_is_active", Notices::IsActive),
            ("idx_notices_created_at", Notices::CreatedAt),
            ("idx_notices_priority", Notices::Priority),
            ("idx_notices_target_audience", Notices::TargetAudience),
            ("idx_notices_expiry_date", Notices::ExpiryDate),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Notices::Table)
                        .col(col)
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_table(
                Table::create()
                    .table(Admins::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Admins::AdminId).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Admins::Username).string().not_null())
                    .col(ColumnDef::new(Admins::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Admins::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Admins::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("unique_admin_username")
                    .table(Admins::Table)
                    .col(Admins::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Admins::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Notices::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Notices {
    Table,
    NoticeId,
    Title,
    Content,
    IsActive,
    Priority,
    ExpiryDate,
    TargetAudience,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Admins {
    Table,
    AdminId,
    Username,
    PasswordHash,
    CreatedAt,
    UpdatedAt,
}
