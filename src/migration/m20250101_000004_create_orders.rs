use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_customers::Customers;
use super::m20250101_000002_create_catalog::Products;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn money(column: Orders) -> ColumnDef {
    ColumnDef::new(column)
        .decimal_len(12, 2)
        .not_null()
        .default(0)
        .to_owned()
}

fn snapshot(column: Orders, len: u32) -> ColumnDef {
    ColumnDef::new(column)
        .string_len(len)
        .not_null()
        .default("")
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Orders::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Orders::OrderNumber)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Orders::CustomerId).uuid().not_null())
                    .col(
                        ColumnDef::new(Orders::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Orders::PaymentStatus)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(money(Orders::Subtotal))
                    .col(money(Orders::TaxAmount))
                    .col(money(Orders::ShippingCost))
                    .col(money(Orders::DiscountAmount))
                    .col(money(Orders::TotalAmount))
                    .col(snapshot(Orders::BillingFirstName, 150))
                    .col(snapshot(Orders::BillingLastName, 150))
                    .col(snapshot(Orders::BillingEmail, 254))
                    .col(snapshot(Orders::BillingPhone, 20))
                    .col(ColumnDef::new(Orders::BillingAddress).text().not_null().default(""))
                    .col(snapshot(Orders::BillingCity, 100))
                    .col(snapshot(Orders::BillingCountry, 100))
                    .col(snapshot(Orders::ShippingFirstName, 150))
                    .col(snapshot(Orders::ShippingLastName, 150))
                    .col(snapshot(Orders::ShippingPhone, 20))
                    .col(ColumnDef::new(Orders::ShippingAddress).text().not_null().default(""))
                    .col(snapshot(Orders::ShippingCity, 100))
                    .col(snapshot(Orders::ShippingCountry, 100))
                    .col(ColumnDef::new(Orders::Notes).text().not_null().default(""))
                    .col(ColumnDef::new(Orders::TrackingNumber).string_len(100).null())
                    .col(
                        ColumnDef::new(Orders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Orders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Orders::ConfirmedAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Orders::ShippedAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Orders::DeliveredAt).timestamp_with_time_zone().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_customer")
                            .from(Orders::Table, Orders::CustomerId)
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
                    .name("idx_orders_customer_status")
                    .table(Orders::Table)
                    .col(Orders::CustomerId)
                    .col(Orders::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrderItems::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(OrderItems::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(OrderItems::OrderId).uuid().not_null())
                    .col(ColumnDef::new(OrderItems::ProductId).uuid().not_null())
                    .col(ColumnDef::new(OrderItems::ProductName).string_len(200).not_null())
                    .col(ColumnDef::new(OrderItems::ProductSku).string_len(100).not_null())
                    .col(ColumnDef::new(OrderItems::UnitPrice).decimal_len(12, 2).not_null())
                    .col(
                        ColumnDef::new(OrderItems::Quantity)
                            .integer()
                            .not_null()
                            .check(Expr::col(OrderItems::Quantity).gte(1)),
                    )
                    .col(ColumnDef::new(OrderItems::TotalPrice).decimal_len(12, 2).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_items_order")
                            .from(OrderItems::Table, OrderItems::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_items_product")
                            .from(OrderItems::Table, OrderItems::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_order_items_order_product")
                    .table(OrderItems::Table)
                    .col(OrderItems::OrderId)
                    .col(OrderItems::ProductId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrderStatusHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrderStatusHistory::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrderStatusHistory::OrderId).uuid().not_null())
                    .col(ColumnDef::new(OrderStatusHistory::Status).string_len(20).not_null())
                    .col(
                        ColumnDef::new(OrderStatusHistory::Comment)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(OrderStatusHistory::CreatedBy).uuid().null())
                    .col(
                        ColumnDef::new(OrderStatusHistory::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_status_history_order")
                            .from(OrderStatusHistory::Table, OrderStatusHistory::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_status_history_customer")
                            .from(OrderStatusHistory::Table, OrderStatusHistory::CreatedBy)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrderStatusHistory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OrderItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden, Clone, Copy)]
pub enum Orders {
    Table,
    Id,
    OrderNumber,
    CustomerId,
    Status,
    PaymentStatus,
    Subtotal,
    TaxAmount,
    ShippingCost,
    DiscountAmount,
    TotalAmount,
    BillingFirstName,
    BillingLastName,
    BillingEmail,
    BillingPhone,
    BillingAddress,
    BillingCity,
    BillingCountry,
    ShippingFirstName,
    ShippingLastName,
    ShippingPhone,
    ShippingAddress,
    ShippingCity,
    ShippingCountry,
    Notes,
    TrackingNumber,
    CreatedAt,
    UpdatedAt,
    ConfirmedAt,
    ShippedAt,
    DeliveredAt,
}

#[derive(DeriveIden)]
pub enum OrderItems {
    Table,
    Id,
    OrderId,
    ProductId,
    ProductName,
    ProductSku,
    UnitPrice,
    Quantity,
    TotalPrice,
}

#[derive(DeriveIden)]
pub enum OrderStatusHistory {
    Table,
    Id,
    OrderId,
    Status,
    Comment,
    CreatedBy,
    CreatedAt,
}
