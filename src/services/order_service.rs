//! Order placement, customer order queries and cancellation.
//!
//! Placement runs in a single transaction: the order shell, its item
//! snapshots, the conditional stock decrements, the cart clear, the totals and
//! the first history row either all commit or none do.

use std::collections::HashSet;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::orders::{OrderItemRequest, OrderList, PlaceOrderRequest, ShippingAddressOverride},
    entity::{
        Customers, OrderItems, OrderStatusHistory, Orders, Products,
        customers,
        order_items::{self, Column as OrderItemCol},
        order_status_history::{self, Column as HistoryCol},
        orders::{self, Column as OrderCol},
        products,
        status::{OrderStatus, PaymentStatus, ProductStatus},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{OrderDetail, OrderTracking},
    notifications::{OrderSnapshot, StatusChange},
    pricing::{OrderTotals, line_total},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::{cart_service, inventory_service},
    state::AppState,
};

/// Attempts made before an order-number collision is reported.
pub const ORDER_NUMBER_ATTEMPTS: usize = 3;

/// `ORD-<unix seconds>-<8 upper-case hex chars>`.
pub fn generate_order_number() -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!(
        "ORD-{}-{}",
        Utc::now().timestamp(),
        random[..8].to_uppercase()
    )
}

struct PlacementLine {
    product: products::Model,
    quantity: i32,
}

enum Attempt {
    Placed {
        detail: OrderDetail,
        customer: customers::Model,
    },
    NumberTaken,
}

pub async fn place_order(
    state: &AppState,
    user: &AuthUser,
    payload: PlaceOrderRequest,
) -> AppResult<ApiResponse<OrderDetail>> {
    place_order_with_numbers(state, user, payload, generate_order_number).await
}

/// Places an order drawing candidate order numbers from `next_number`.
pub async fn place_order_with_numbers<F>(
    state: &AppState,
    user: &AuthUser,
    payload: PlaceOrderRequest,
    mut next_number: F,
) -> AppResult<ApiResponse<OrderDetail>>
where
    F: FnMut() -> String,
{
    for attempt in 1..=ORDER_NUMBER_ATTEMPTS {
        let order_number = next_number();
        match try_place(state, user, &payload, &order_number).await? {
            Attempt::Placed { detail, customer } => {
                tracing::info!(
                    order_number = %detail.order.order_number,
                    customer_id = %customer.id,
                    total = %detail.order.total_amount,
                    items = detail.item_count,
                    "order placed"
                );
                state
                    .notifications
                    .order_placed(OrderSnapshot::new(&detail, &customer));
                return Ok(ApiResponse::single("Order placed", detail));
            }
            Attempt::NumberTaken => {
                tracing::warn!(attempt, %order_number, "order number already taken, retrying");
            }
        }
    }

    Err(AppError::conflict(
        "Could not allocate a unique order number, please retry",
    ))
}

async fn try_place(
    state: &AppState,
    user: &AuthUser,
    payload: &PlaceOrderRequest,
    order_number: &str,
) -> AppResult<Attempt> {
    let txn = state.orm.begin().await?;

    let customer = Customers::find_by_id(user.user_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Customer"))?;

    let (lines, cart_id) = if payload.use_cart {
        let cart = cart_service::find_cart(&txn, customer.id)
            .await?
            .ok_or_else(|| AppError::not_found("Cart"))?;
        (cart_lines(&txn, cart.id).await?, Some(cart.id))
    } else {
        (explicit_lines(&txn, &payload.items).await?, None)
    };

    let order_id = Uuid::new_v4();
    let shell = order_shell(
        order_id,
        order_number,
        &customer,
        payload.shipping_address.as_ref(),
        &payload.notes,
    );
    let order = match shell.insert(&txn).await {
        Ok(order) => order,
        Err(err) if is_unique_violation(&err) => return Ok(Attempt::NumberTaken),
        Err(err) => return Err(err.into()),
    };

    for line in &lines {
        order_items::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            product_id: Set(line.product.id),
            product_name: Set(line.product.name.clone()),
            product_sku: Set(line.product.sku.clone()),
            unit_price: Set(line.product.price),
            quantity: Set(line.quantity),
            total_price: Set(line_total(line.product.price, line.quantity)),
        }
        .insert(&txn)
        .await?;

        inventory_service::decrement_stock(&txn, line.product.id, line.quantity).await?;
    }

    if let Some(cart_id) = cart_id {
        cart_service::clear(&txn, cart_id).await?;
    }

    let totals = OrderTotals::compute(
        lines.iter().map(|line| (line.product.price, line.quantity)),
        Decimal::ZERO,
        Decimal::ZERO,
    );
    let mut active: orders::ActiveModel = order.into();
    active.subtotal = Set(totals.subtotal);
    active.tax_amount = Set(totals.tax_amount);
    active.shipping_cost = Set(totals.shipping_cost);
    active.discount_amount = Set(totals.discount_amount);
    active.total_amount = Set(totals.total_amount);
    let order = active.update(&txn).await?;

    append_status_history(
        &txn,
        order_id,
        OrderStatus::Pending,
        "Order created",
        Some(customer.id),
    )
    .await?;

    let detail = load_detail(&txn, order).await?;
    txn.commit().await?;

    Ok(Attempt::Placed { detail, customer })
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

async fn cart_lines<C: ConnectionTrait>(conn: &C, cart_id: Uuid) -> AppResult<Vec<PlacementLine>> {
    let items = cart_service::list_items(conn, cart_id).await?;
    if items.is_empty() {
        return Err(AppError::validation("Cart is empty"));
    }

    items
        .into_iter()
        .map(|(item, product)| {
            if product.stock_quantity < item.quantity {
                return Err(AppError::validation(format!(
                    "Product {} is not available in requested quantity",
                    product.name
                )));
            }
            Ok(PlacementLine {
                product,
                quantity: item.quantity,
            })
        })
        .collect()
}

async fn explicit_lines<C: ConnectionTrait>(
    conn: &C,
    items: &[OrderItemRequest],
) -> AppResult<Vec<PlacementLine>> {
    if items.is_empty() {
        return Err(AppError::validation("At least one item is required"));
    }

    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if item.quantity < 1 {
            return Err(AppError::validation(format!(
                "Quantity for product {} must be at least 1",
                item.product_id
            )));
        }
        if !seen.insert(item.product_id) {
            return Err(AppError::validation(format!(
                "Product {} is listed more than once",
                item.product_id
            )));
        }
    }

    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let product = Products::find_by_id(item.product_id)
            .one(conn)
            .await?
            .ok_or_else(|| {
                AppError::validation(format!("Product {} does not exist", item.product_id))
            })?;
        if product.status != ProductStatus::Active {
            return Err(AppError::validation(format!(
                "Product {} is not available",
                product.name
            )));
        }
        if item.quantity > product.stock_quantity {
            return Err(AppError::validation(format!(
                "Insufficient stock for {}. Available: {}",
                product.name, product.stock_quantity
            )));
        }
        lines.push(PlacementLine {
            product,
            quantity: item.quantity,
        });
    }
    Ok(lines)
}

fn overlay(value: Option<&String>, fallback: &str) -> String {
    value.cloned().unwrap_or_else(|| fallback.to_string())
}

/// The order row before items and totals: billing copied from the profile,
/// shipping mirrored from billing with the override laid on top.
fn order_shell(
    id: Uuid,
    order_number: &str,
    customer: &customers::Model,
    shipping: Option<&ShippingAddressOverride>,
    notes: &str,
) -> orders::ActiveModel {
    let shipping = shipping.cloned().unwrap_or_default();
    let now = Utc::now().fixed_offset();

    orders::ActiveModel {
        id: Set(id),
        order_number: Set(order_number.to_string()),
        customer_id: Set(customer.id),
        status: Set(OrderStatus::Pending),
        payment_status: Set(PaymentStatus::Pending),
        subtotal: Set(Decimal::ZERO),
        tax_amount: Set(Decimal::ZERO),
        shipping_cost: Set(Decimal::ZERO),
        discount_amount: Set(Decimal::ZERO),
        total_amount: Set(Decimal::ZERO),
        billing_first_name: Set(customer.first_name.clone()),
        billing_last_name: Set(customer.last_name.clone()),
        billing_email: Set(customer.email.clone()),
        billing_phone: Set(customer.phone_number.clone()),
        billing_address: Set(customer.address.clone()),
        billing_city: Set(customer.city.clone()),
        billing_country: Set(customer.country.clone()),
        shipping_first_name: Set(overlay(shipping.first_name.as_ref(), &customer.first_name)),
        shipping_last_name: Set(overlay(shipping.last_name.as_ref(), &customer.last_name)),
        shipping_phone: Set(overlay(shipping.phone.as_ref(), &customer.phone_number)),
        shipping_address: Set(overlay(shipping.address.as_ref(), &customer.address)),
        shipping_city: Set(overlay(shipping.city.as_ref(), &customer.city)),
        shipping_country: Set(overlay(shipping.country.as_ref(), &customer.country)),
        notes: Set(notes.to_string()),
        tracking_number: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        confirmed_at: Set(None),
        shipped_at: Set(None),
        delivered_at: Set(None),
    }
}

pub async fn append_status_history<C: ConnectionTrait>(
    conn: &C,
    order_id: Uuid,
    status: OrderStatus,
    comment: &str,
    actor: Option<Uuid>,
) -> AppResult<order_status_history::Model> {
    let row = order_status_history::ActiveModel {
        order_id: Set(order_id),
        status: Set(status),
        comment: Set(comment.to_string()),
        created_by: Set(actor),
        created_at: Set(Utc::now().fixed_offset()),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    Ok(row)
}

/// Writes `active` only if the stored status still equals `expected`.
pub async fn update_guarded<C: ConnectionTrait>(
    conn: &C,
    expected: OrderStatus,
    active: orders::ActiveModel,
) -> AppResult<orders::Model> {
    match Orders::update(active)
        .filter(OrderCol::Status.eq(expected))
        .exec(conn)
        .await
    {
        Ok(order) => Ok(order),
        Err(DbErr::RecordNotUpdated) => Err(AppError::conflict(
            "Order was modified by another request, please retry",
        )),
        Err(err) => Err(err.into()),
    }
}

/// Puts every unit of the order back on the shelf.
pub async fn restore_stock<C: ConnectionTrait>(conn: &C, order_id: Uuid) -> AppResult<()> {
    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order_id))
        .all(conn)
        .await?;
    for item in items {
        inventory_service::increment_stock(conn, item.product_id, item.quantity).await?;
    }
    Ok(())
}

pub async fn load_detail<C: ConnectionTrait>(
    conn: &C,
    order: orders::Model,
) -> AppResult<OrderDetail> {
    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .order_by_asc(OrderItemCol::ProductName)
        .all(conn)
        .await?;
    let history = OrderStatusHistory::find()
        .filter(HistoryCol::OrderId.eq(order.id))
        .order_by_asc(HistoryCol::Id)
        .all(conn)
        .await?;
    Ok(OrderDetail::new(order, items, history))
}

async fn find_own_order<C: ConnectionTrait>(
    conn: &C,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<orders::Model> {
    Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::CustomerId.eq(user.user_id))
                .add(OrderCol::Id.eq(id)),
        )
        .one(conn)
        .await?
        .ok_or_else(|| AppError::not_found("Order"))
}

/// Applies the list filters shared by the customer and admin order lists.
pub fn filtered_orders(mut finder: Select<Orders>, query: &OrderListQuery) -> Select<Orders> {
    if let Some(status) = query.status {
        finder = finder.filter(OrderCol::Status.eq(status));
    }
    if let Some(payment_status) = query.payment_status {
        finder = finder.filter(OrderCol::PaymentStatus.eq(payment_status));
    }
    match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    }
}

pub async fn paginate_orders<C: ConnectionTrait>(
    conn: &C,
    finder: Select<Orders>,
    query: &OrderListQuery,
) -> AppResult<(OrderList, Meta)> {
    let (page, limit, offset) = query.pagination().normalize();
    let total = finder.clone().count(conn).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(conn)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok((OrderList { items }, Meta::new(page, limit, total)))
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let finder = filtered_orders(
        Orders::find().filter(OrderCol::CustomerId.eq(user.user_id)),
        &query,
    );
    let (orders, meta) = paginate_orders(&state.orm, finder, &query).await?;
    Ok(ApiResponse::success("Ok", orders, Some(meta)))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderDetail>> {
    let order = find_own_order(&state.orm, user, id).await?;
    let detail = load_detail(&state.orm, order).await?;
    Ok(ApiResponse::single("OK", detail))
}

pub async fn order_tracking(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderTracking>> {
    let order = find_own_order(&state.orm, user, id).await?;
    let detail = load_detail(&state.orm, order).await?;
    Ok(ApiResponse::single("OK", detail.into()))
}

/// Moves `order` to cancelled, restores its stock and records who did it.
/// The caller owns the transaction and the permission checks.
pub async fn cancel_in_txn<C: ConnectionTrait>(
    conn: &C,
    order: orders::Model,
    comment: &str,
    actor: Option<Uuid>,
) -> AppResult<orders::Model> {
    let previous = order.status;
    let order_id = order.id;

    let mut active: orders::ActiveModel = order.into();
    active.status = Set(OrderStatus::Cancelled);
    active.updated_at = Set(Utc::now().fixed_offset());
    let order = update_guarded(conn, previous, active).await?;

    restore_stock(conn, order_id).await?;
    append_status_history(conn, order_id, OrderStatus::Cancelled, comment, actor).await?;
    Ok(order)
}

pub fn status_change(order: &orders::Model) -> StatusChange {
    StatusChange {
        order_id: order.id,
        order_number: order.order_number.clone(),
        status: order.status,
        tracking_number: order.tracking_number.clone(),
        customer_email: order.billing_email.clone(),
        customer_phone: order.billing_phone.clone(),
    }
}

pub async fn cancel_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderDetail>> {
    let txn = state.orm.begin().await?;
    let order = find_own_order(&txn, user, id).await?;
    if !order.status.can_be_cancelled() {
        return Err(AppError::validation("Order cannot be cancelled at this stage"));
    }

    let order = cancel_in_txn(&txn, order, "Order cancelled by customer", Some(user.user_id))
        .await?;
    let change = status_change(&order);
    let detail = load_detail(&txn, order).await?;
    txn.commit().await?;

    tracing::info!(order_number = %change.order_number, "order cancelled by customer");
    state.notifications.status_changed(change);
    Ok(ApiResponse::single("Order cancelled", detail))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_number_has_expected_shape() {
        let number = generate_order_number();
        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "ORD");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 8);
        assert!(
            parts[2]
                .chars()
                .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
        );
    }

    #[test]
    fn order_numbers_differ() {
        assert_ne!(generate_order_number(), generate_order_number());
    }

    #[test]
    fn overlay_prefers_override() {
        let city = "Mombasa".to_string();
        assert_eq!(overlay(Some(&city), "Nairobi"), "Mombasa");
        assert_eq!(overlay(None, "Nairobi"), "Nairobi");
    }
}
