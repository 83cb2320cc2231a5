//! Stock bookkeeping.
//!
//! `stock_quantity` only ever moves through the conditional updates in this
//! module, so it can never go negative regardless of interleaving.

use chrono::Utc;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Select, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    entity::{
        Products,
        products::{self, Column as ProdCol},
        status::ProductStatus,
    },
    error::{AppError, AppResult},
};

pub async fn get_product<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<products::Model> {
    Products::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))
}

/// Reserves `quantity` units. Fails with a conflict when fewer are left.
pub async fn decrement_stock<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
    quantity: i32,
) -> AppResult<()> {
    let result = Products::update_many()
        .col_expr(
            ProdCol::StockQuantity,
            Expr::col(ProdCol::StockQuantity).sub(quantity),
        )
        .col_expr(ProdCol::UpdatedAt, Expr::value(Utc::now().fixed_offset()))
        .filter(ProdCol::Id.eq(product_id))
        .filter(ProdCol::StockQuantity.gte(quantity))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        tracing::debug!(%product_id, quantity, "conditional stock decrement matched no row");
        return Err(AppError::conflict(format!(
            "Insufficient stock for product {product_id}"
        )));
    }
    Ok(())
}

/// Returns `quantity` units to stock.
pub async fn increment_stock<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
    quantity: i32,
) -> AppResult<()> {
    if quantity <= 0 {
        return Err(AppError::validation("increment must be positive"));
    }
    let result = Products::update_many()
        .col_expr(
            ProdCol::StockQuantity,
            Expr::col(ProdCol::StockQuantity).add(quantity),
        )
        .col_expr(ProdCol::UpdatedAt, Expr::value(Utc::now().fixed_offset()))
        .filter(ProdCol::Id.eq(product_id))
        .filter(ProdCol::StockQuantity.lte(i32::MAX - quantity))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        // Either the product is gone or the sum would not fit in a column.
        let product = get_product(conn, product_id).await?;
        return Err(AppError::validation(format!(
            "Stock for {} cannot exceed {} (current {}, increment {quantity})",
            product.name,
            i32::MAX,
            product.stock_quantity
        )));
    }
    Ok(())
}

/// Applies a signed correction and returns the updated product.
pub async fn adjust_stock<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
    delta: i32,
) -> AppResult<products::Model> {
    if delta == 0 {
        return Err(AppError::validation("delta must not be 0"));
    }

    if delta > 0 {
        increment_stock(conn, product_id, delta).await?;
    } else {
        let product = get_product(conn, product_id).await?;
        let taken = delta.checked_neg().unwrap_or(i32::MAX);
        match decrement_stock(conn, product_id, taken).await {
            Err(AppError::Conflict(_)) => {
                return Err(AppError::validation(format!(
                    "Stock for {} cannot become negative (current {}, delta {delta})",
                    product.name, product.stock_quantity
                )));
            }
            other => other?,
        }
    }

    get_product(conn, product_id).await
}

/// Products at or below `threshold`, or at or below their own minimum when
/// no threshold is given.
pub fn low_stock_query(threshold: Option<i32>) -> Select<Products> {
    let finder = match threshold {
        Some(threshold) => Products::find().filter(ProdCol::StockQuantity.lte(threshold)),
        None => Products::find()
            .filter(Expr::col(ProdCol::StockQuantity).lte(Expr::col(ProdCol::MinimumStock))),
    };
    finder
        .order_by_asc(ProdCol::StockQuantity)
        .order_by_asc(ProdCol::Name)
}

/// Active products that have reached their minimum stock level.
pub async fn active_low_stock<C: ConnectionTrait>(conn: &C) -> AppResult<Vec<products::Model>> {
    let products = low_stock_query(None)
        .filter(ProdCol::Status.eq(ProductStatus::Active))
        .all(conn)
        .await?;
    Ok(products)
}
