use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_customers::Customers;
use super::m20250101_000002_create_catalog::Products;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProductReviews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductReviews::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProductReviews::ProductId).uuid().not_null())
                    .col(ColumnDef::new(ProductReviews::CustomerId).uuid().not_null())
                    .col(
                        ColumnDef::new(ProductReviews::Rating)
                            .integer()
                            .not_null()
                            .check(Expr::col(ProductReviews::Rating).between(1, 5)),
                    )
                    .col(
                        ColumnDef::new(ProductReviews::Title)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductReviews::Comment)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(ProductReviews::IsApproved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ProductReviews::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductReviews::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_reviews_product")
                            .from(ProductReviews::Table, ProductReviews::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_reviews_customer")
                            .from(ProductReviews::Table, ProductReviews::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_product_reviews_product_customer")
                    .table(ProductReviews::Table)
                    .col(ProductReviews::ProductId)
                    .col(ProductReviews::CustomerId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProductReviews::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ProductReviews {
    Table,
    Id,
    ProductId,
    CustomerId,
    Rating,
    Title,
    Comment,
    IsApproved,
    CreatedAt,
    UpdatedAt,
}
