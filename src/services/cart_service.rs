use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, sea_query::OnConflict,
};
use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, UpdateCartItemRequest},
    entity::{
        CartItems, Carts, Products,
        cart_items::{self, Column as CartItemCol},
        carts::{self, Column as CartCol},
        products,
        status::ProductStatus,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Cart, CartItem},
    pricing::{line_total, round_money},
    response::ApiResponse,
    services::inventory_service,
    state::AppState,
};

pub async fn find_cart<C: ConnectionTrait>(
    conn: &C,
    customer_id: Uuid,
) -> AppResult<Option<carts::Model>> {
    let cart = Carts::find()
        .filter(CartCol::CustomerId.eq(customer_id))
        .one(conn)
        .await?;
    Ok(cart)
}

/// Inserts an empty cart unless the customer already has one. Returns the
/// number of rows written, so 0 means another request got there first.
///
/// The conflict is resolved by the database instead of surfacing as an
/// error, which would abort an enclosing Postgres transaction.
pub async fn insert_cart_if_absent<C: ConnectionTrait>(
    conn: &C,
    customer_id: Uuid,
) -> AppResult<u64> {
    let now = Utc::now().fixed_offset();
    let cart = carts::ActiveModel {
        id: Set(Uuid::new_v4()),
        customer_id: Set(customer_id),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let inserted = Carts::insert(cart)
        .on_conflict(
            OnConflict::column(CartCol::CustomerId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;
    Ok(inserted)
}

pub async fn get_or_create_cart<C: ConnectionTrait>(
    conn: &C,
    customer_id: Uuid,
) -> AppResult<carts::Model> {
    if let Some(cart) = find_cart(conn, customer_id).await? {
        return Ok(cart);
    }

    insert_cart_if_absent(conn, customer_id).await?;
    find_cart(conn, customer_id)
        .await?
        .ok_or_else(|| AppError::not_found("Cart"))
}

/// Cart lines joined with their live product rows, oldest first.
pub async fn list_items<C: ConnectionTrait>(
    conn: &C,
    cart_id: Uuid,
) -> AppResult<Vec<(cart_items::Model, products::Model)>> {
    let rows = CartItems::find()
        .filter(CartItemCol::CartId.eq(cart_id))
        .find_also_related(Products)
        .order_by_asc(CartItemCol::AddedAt)
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(item, product)| product.map(|product| (item, product)))
        .collect())
}

/// Removes every line and returns how many were deleted.
pub async fn clear<C: ConnectionTrait>(conn: &C, cart_id: Uuid) -> AppResult<u64> {
    let result = CartItems::delete_many()
        .filter(CartItemCol::CartId.eq(cart_id))
        .exec(conn)
        .await?;
    touch(conn, cart_id).await?;
    Ok(result.rows_affected)
}

async fn touch<C: ConnectionTrait>(conn: &C, cart_id: Uuid) -> AppResult<carts::Model> {
    let cart = carts::ActiveModel {
        id: Set(cart_id),
        updated_at: Set(Utc::now().fixed_offset()),
        ..Default::default()
    }
    .update(conn)
    .await?;
    Ok(cart)
}

pub fn cart_item_view(item: cart_items::Model, product: products::Model) -> CartItem {
    CartItem {
        id: item.id,
        total_price: line_total(product.price, item.quantity),
        is_available: product.stock_quantity >= item.quantity,
        quantity: item.quantity,
        added_at: item.added_at.with_timezone(&Utc),
        product: product.into(),
    }
}

async fn cart_view<C: ConnectionTrait>(conn: &C, cart: carts::Model) -> AppResult<Cart> {
    let items: Vec<CartItem> = list_items(conn, cart.id)
        .await?
        .into_iter()
        .map(|(item, product)| cart_item_view(item, product))
        .collect();

    let item_count = items.iter().map(|item| i64::from(item.quantity)).sum();
    let total_amount = round_money(
        items
            .iter()
            .fold(Decimal::ZERO, |acc, item| acc + item.total_price),
    );

    Ok(Cart {
        id: cart.id,
        customer_id: cart.customer_id,
        items,
        item_count,
        total_amount,
        created_at: cart.created_at.with_timezone(&Utc),
        updated_at: cart.updated_at.with_timezone(&Utc),
    })
}

pub async fn get_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<Cart>> {
    let cart = get_or_create_cart(&state.orm, user.user_id).await?;
    let data = cart_view(&state.orm, cart).await?;
    Ok(ApiResponse::single("OK", data))
}

fn check_quantity(quantity: i32) -> AppResult<()> {
    if quantity < 1 {
        return Err(AppError::validation("Quantity must be at least 1"));
    }
    Ok(())
}

fn check_stock(product: &products::Model, quantity: i32) -> AppResult<()> {
    if quantity > product.stock_quantity {
        return Err(AppError::validation(format!(
            "Only {} units of {} available",
            product.stock_quantity, product.name
        )));
    }
    Ok(())
}

async fn find_line<C: ConnectionTrait>(
    conn: &C,
    cart_id: Uuid,
    product_id: Uuid,
) -> AppResult<Option<cart_items::Model>> {
    let line = CartItems::find()
        .filter(CartItemCol::CartId.eq(cart_id))
        .filter(CartItemCol::ProductId.eq(product_id))
        .one(conn)
        .await?;
    Ok(line)
}

pub async fn add_item(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<Cart>> {
    check_quantity(payload.quantity)?;

    let txn = state.orm.begin().await?;
    let product = inventory_service::get_product(&txn, payload.product_id).await?;
    if product.status != ProductStatus::Active {
        return Err(AppError::not_found("Product"));
    }

    let cart = get_or_create_cart(&txn, user.user_id).await?;
    match find_line(&txn, cart.id, product.id).await? {
        Some(line) => {
            let quantity = line.quantity.saturating_add(payload.quantity);
            check_stock(&product, quantity)?;
            let mut active: cart_items::ActiveModel = line.into();
            active.quantity = Set(quantity);
            active.update(&txn).await?;
        }
        None => {
            check_stock(&product, payload.quantity)?;
            cart_items::ActiveModel {
                id: Set(Uuid::new_v4()),
                cart_id: Set(cart.id),
                product_id: Set(product.id),
                quantity: Set(payload.quantity),
                added_at: Set(Utc::now().fixed_offset()),
            }
            .insert(&txn)
            .await?;
        }
    }
    let cart = touch(&txn, cart.id).await?;
    let data = cart_view(&txn, cart).await?;
    txn.commit().await?;

    tracing::debug!(customer_id = %user.user_id, product_id = %product.id, "cart item added");
    Ok(ApiResponse::single("Item added to cart", data))
}

pub async fn update_item(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateCartItemRequest,
) -> AppResult<ApiResponse<Cart>> {
    check_quantity(payload.quantity)?;

    let txn = state.orm.begin().await?;
    let cart = get_or_create_cart(&txn, user.user_id).await?;
    let line = find_line(&txn, cart.id, payload.product_id)
        .await?
        .ok_or_else(|| AppError::not_found("Cart item"))?;
    let product = inventory_service::get_product(&txn, payload.product_id).await?;
    check_stock(&product, payload.quantity)?;

    let mut active: cart_items::ActiveModel = line.into();
    active.quantity = Set(payload.quantity);
    active.update(&txn).await?;
    let cart = touch(&txn, cart.id).await?;
    let data = cart_view(&txn, cart).await?;
    txn.commit().await?;

    Ok(ApiResponse::single("Cart updated", data))
}

pub async fn remove_item(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<Cart>> {
    let txn = state.orm.begin().await?;
    let cart = get_or_create_cart(&txn, user.user_id).await?;
    let result = CartItems::delete_many()
        .filter(CartItemCol::CartId.eq(cart.id))
        .filter(CartItemCol::ProductId.eq(product_id))
        .exec(&txn)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("Cart item"));
    }
    let cart = touch(&txn, cart.id).await?;
    let data = cart_view(&txn, cart).await?;
    txn.commit().await?;

    Ok(ApiResponse::single("Item removed from cart", data))
}

pub async fn clear_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<Cart>> {
    let txn = state.orm.begin().await?;
    let cart = get_or_create_cart(&txn, user.user_id).await?;
    let removed = clear(&txn, cart.id).await?;
    let cart = find_cart(&txn, user.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Cart"))?;
    let data = cart_view(&txn, cart).await?;
    txn.commit().await?;

    tracing::debug!(customer_id = %user.user_id, removed, "cart cleared");
    Ok(ApiResponse::single("Cart cleared", data))
}
