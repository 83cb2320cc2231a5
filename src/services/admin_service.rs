use chrono::Utc;
use sea_orm::{EntityTrait, PaginatorTrait, QuerySelect, TransactionTrait};
use uuid::Uuid;

use crate::{
    dto::{
        orders::OrderList,
        products::{InventoryAdjustRequest, ProductList},
    },
    entity::Orders,
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{OrderDetail, Product, SalesReport},
    response::{ApiResponse, Meta},
    routes::params::{LowStockQuery, OrderListQuery, SalesReportQuery},
    services::{housekeeping_service, inventory_service, order_service},
    state::AppState,
};

pub async fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;
    let finder = order_service::filtered_orders(Orders::find(), &query);
    let (orders, meta) = order_service::paginate_orders(&state.orm, finder, &query).await?;
    Ok(ApiResponse::success("Orders", orders, Some(meta)))
}

pub async fn get_order_admin(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderDetail>> {
    ensure_admin(user)?;
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Order"))?;
    let detail = order_service::load_detail(&state.orm, order).await?;
    Ok(ApiResponse::single("Order found", detail))
}

pub async fn list_low_stock(
    state: &AppState,
    user: &AuthUser,
    query: LowStockQuery,
) -> AppResult<ApiResponse<ProductList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let finder = inventory_service::low_stock_query(query.threshold);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Low stock", ProductList { items }, Some(meta)))
}

pub async fn adjust_inventory(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: InventoryAdjustRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;

    let txn = state.orm.begin().await?;
    let updated = inventory_service::adjust_stock(&txn, id, payload.delta).await?;
    txn.commit().await?;

    tracing::info!(
        product_id = %updated.id,
        delta = payload.delta,
        stock = updated.stock_quantity,
        admin_id = %user.user_id,
        "inventory adjusted"
    );
    Ok(ApiResponse::single("Inventory updated", updated.into()))
}

pub async fn daily_sales_report(
    state: &AppState,
    user: &AuthUser,
    query: SalesReportQuery,
) -> AppResult<ApiResponse<SalesReport>> {
    ensure_admin(user)?;
    let day = match query.date {
        Some(day) => day,
        None => Utc::now()
            .date_naive()
            .pred_opt()
            .ok_or_else(|| AppError::validation("No previous day"))?,
    };
    let report = housekeeping_service::daily_sales_report(&state.orm, day).await?;
    Ok(ApiResponse::single("Daily sales report", report))
}
