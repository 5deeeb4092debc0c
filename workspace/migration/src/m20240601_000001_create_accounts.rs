use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string_len(Users::Email, 255).unique_key())
                    .col(string(Users::Password))
                    .col(string_len_null(Users::Name, 50))
                    .col(boolean(Users::IsActive).default(true))
                    .col(boolean(Users::IsStaff).default(false))
                    .col(boolean(Users::IsSuperuser).default(false))
                    .to_owned(),
            )
            .await?;

        // Create auth_tokens table, one token per user
        manager
            .create_table(
                Table::create()
                    .table(AuthTokens::Table)
                    .if_not_exists()
                    .col(string_len(AuthTokens::Key, 40).primary_key())
                    .col(integer(AuthTokens::UserId).unique_key())
                    .col(timestamp_with_time_zone(AuthTokens::Created))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_auth_token_user")
                            .from(AuthTokens::Table, AuthTokens::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuthTokens::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    Password,
    Name,
    IsActive,
    IsStaff,
    IsSuperuser,
}

#[derive(DeriveIden)]
enum AuthTokens {
    Table,
    Key,
    UserId,
    Created,
}
