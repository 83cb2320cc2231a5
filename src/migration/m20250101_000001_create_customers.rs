use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Customers::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Customers::Email)
                            .string_len(254)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Customers::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Customers::Role)
                            .string_len(20)
                            .not_null()
                            .default("customer"),
                    )
                    .col(ColumnDef::new(Customers::FirstName).string_len(150).not_null())
                    .col(ColumnDef::new(Customers::LastName).string_len(150).not_null())
                    .col(
                        ColumnDef::new(Customers::PhoneNumber)
                            .string_len(20)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Customers::Address).text().not_null().default(""))
                    .col(
                        ColumnDef::new(Customers::City)
                            .string_len(100)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Customers::Country)
                            .string_len(100)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Customers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Customers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Customers {
    Table,
    Id,
    Email,
    PasswordHash,
    Role,
    FirstName,
    LastName,
    PhoneNumber,
    Address,
    City,
    Country,
    CreatedAt,
    UpdatedAt,
}
