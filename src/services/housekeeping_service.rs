//! Periodic maintenance: abandoned cart cleanup, low-stock alerts and the
//! daily sales report.

use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    entity::{
        CartItems, Carts, Orders, cart_items::Column as CartItemCol, carts::Column as CartCol,
        orders::Column as OrderCol, status::OrderStatus,
    },
    error::{AppError, AppResult},
    models::{SalesReport, StatusCount},
    notifications::LowStockAlert,
    pricing::round_money,
    services::inventory_service,
    state::AppState,
};

/// Statuses that count as a sale in the daily report.
const SOLD_STATUSES: [OrderStatus; 4] = [
    OrderStatus::Confirmed,
    OrderStatus::Processing,
    OrderStatus::Shipped,
    OrderStatus::Delivered,
];

async fn delete_carts<C: ConnectionTrait>(conn: &C, cart_ids: Vec<Uuid>) -> AppResult<u64> {
    CartItems::delete_many()
        .filter(CartItemCol::CartId.is_in(cart_ids.clone()))
        .exec(conn)
        .await?;
    let result = Carts::delete_many()
        .filter(CartCol::Id.is_in(cart_ids))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

/// Deletes carts untouched for `retention_days`, items included, and
/// returns how many carts went away.
pub async fn cleanup_abandoned_carts<C>(conn: &C, retention_days: i64) -> AppResult<u64>
where
    C: ConnectionTrait + TransactionTrait,
{
    let cutoff = Duration::try_days(retention_days)
        .filter(|window| *window > Duration::zero())
        .and_then(|window| Utc::now().checked_sub_signed(window))
        .ok_or_else(|| {
            AppError::validation(format!("retention_days {retention_days} is out of range"))
        })?
        .fixed_offset();

    let txn = conn.begin().await?;
    let stale: Vec<Uuid> = Carts::find()
        .select_only()
        .column(CartCol::Id)
        .filter(CartCol::UpdatedAt.lt(cutoff))
        .into_tuple()
        .all(&txn)
        .await?;

    if stale.is_empty() {
        return Ok(0);
    }
    let deleted = delete_carts(&txn, stale).await?;
    txn.commit().await?;

    tracing::info!(deleted, retention_days, "abandoned carts removed");
    Ok(deleted)
}

/// Sends one alert per active product at or below its minimum stock and
/// returns the alerts that were dispatched.
pub async fn check_low_stock(state: &AppState) -> AppResult<Vec<LowStockAlert>> {
    let products = inventory_service::active_low_stock(&state.orm).await?;

    let alerts: Vec<LowStockAlert> = products
        .into_iter()
        .map(|product| LowStockAlert {
            product_id: product.id,
            product_name: product.name,
            sku: product.sku,
            stock_quantity: product.stock_quantity,
            minimum_stock: product.minimum_stock,
        })
        .collect();

    for alert in &alerts {
        state.notifications.low_stock(alert.clone());
    }
    if !alerts.is_empty() {
        tracing::warn!(count = alerts.len(), "products at or below minimum stock");
    }
    Ok(alerts)
}

/// Totals for orders created on `day` (UTC) whose status is in
/// [`SOLD_STATUSES`].
pub async fn daily_sales_report<C: ConnectionTrait>(
    conn: &C,
    day: NaiveDate,
) -> AppResult<SalesReport> {
    let next_day = day
        .succ_opt()
        .ok_or_else(|| AppError::validation(format!("{day} is out of range")))?;
    let start = day.and_time(NaiveTime::MIN).and_utc().fixed_offset();
    let end = next_day.and_time(NaiveTime::MIN).and_utc().fixed_offset();

    let rows: Vec<(OrderStatus, Decimal)> = Orders::find()
        .select_only()
        .column(OrderCol::Status)
        .column(OrderCol::TotalAmount)
        .filter(OrderCol::CreatedAt.gte(start))
        .filter(OrderCol::CreatedAt.lt(end))
        .filter(OrderCol::Status.is_in(SOLD_STATUSES))
        .into_tuple()
        .all(conn)
        .await?;

    let total_orders = rows.len() as i64;
    let total_revenue = round_money(rows.iter().map(|(_, total)| *total).sum());
    let average_order_value = if total_orders == 0 {
        Decimal::ZERO
    } else {
        round_money(total_revenue / Decimal::from(total_orders))
    };
    let status_breakdown = SOLD_STATUSES
        .iter()
        .map(|status| StatusCount {
            status: *status,
            count: rows.iter().filter(|(s, _)| s == status).count() as i64,
        })
        .filter(|entry| entry.count > 0)
        .collect();

    Ok(SalesReport {
        date: day,
        total_orders,
        total_revenue,
        average_order_value,
        status_breakdown,
    })
}

/// Builds the report for `day` and hands it to the notifier for the admins.
pub async fn send_daily_sales_report(state: &AppState, day: NaiveDate) -> AppResult<SalesReport> {
    let report = daily_sales_report(&state.orm, day).await?;
    tracing::info!(
        date = %report.date,
        orders = report.total_orders,
        revenue = %report.total_revenue,
        "daily sales report generated"
    );
    state.notifications.sales_report(report.clone());
    Ok(report)
}
