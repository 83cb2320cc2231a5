use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, SqlErr,
    TransactionTrait,
    sea_query::{Expr, Func},
};
use uuid::Uuid;

use crate::{
    dto::products::{CreateProductRequest, ProductList, UpdateProductRequest},
    entity::{
        Categories, OrderItems, ProductCategories, Products,
        categories::Column as CategoryCol,
        order_items::Column as OrderItemCol,
        product_categories::{self, Column as LinkCol},
        products::{self, Column},
        status::ProductStatus,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Product,
    pricing::MIN_PRICE,
    response::{ApiResponse, Meta},
    routes::params::{Pagination, ProductQuery, ProductSortBy, SortOrder},
    services::inventory_service,
    state::AppState,
};

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition =
        Condition::all().add(Column::Status.eq(query.status.unwrap_or(ProductStatus::Active)));

    if let Some(search) = query.q.as_ref().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search.to_lowercase());
        condition = condition.add(
            Condition::any()
                .add(Expr::expr(Func::lower(Expr::col(Column::Name))).like(pattern.clone()))
                .add(Expr::expr(Func::lower(Expr::col(Column::Description))).like(pattern.clone()))
                .add(Expr::expr(Func::lower(Expr::col(Column::Sku))).like(pattern)),
        );
    }

    if let Some(min_price) = query.min_price {
        condition = condition.add(Column::Price.gte(min_price));
    }

    if let Some(max_price) = query.max_price {
        condition = condition.add(Column::Price.lte(max_price));
    }

    if let Some(is_featured) = query.is_featured {
        condition = condition.add(Column::IsFeatured.eq(is_featured));
    }

    let mut finder = Products::find();
    if let Some(category_id) = query.category_id {
        finder = finder
            .join(JoinType::InnerJoin, products::Relation::ProductCategories.def())
            .filter(LinkCol::CategoryId.eq(category_id));
    }

    let sort_col = match query.sort_by.unwrap_or(ProductSortBy::CreatedAt) {
        ProductSortBy::CreatedAt => Column::CreatedAt,
        ProductSortBy::Price => Column::Price,
        ProductSortBy::Name => Column::Name,
    };
    finder = finder.filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

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
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

/// Active products flagged for the storefront front page, newest first.
pub async fn featured_products(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<ProductList>> {
    let query = ProductQuery {
        page: pagination.page,
        per_page: pagination.per_page,
        status: Some(ProductStatus::Active),
        is_featured: Some(true),
        ..Default::default()
    };
    let mut response = list_products(state, query).await?;
    response.message = "Featured products".to_string();
    Ok(response)
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let product = inventory_service::get_product(&state.orm, id).await?;
    Ok(ApiResponse::single("Product", product.into()))
}

fn validate_fields(
    price: Option<rust_decimal::Decimal>,
    stock_quantity: Option<i32>,
    minimum_stock: Option<i32>,
) -> AppResult<()> {
    if price.is_some_and(|price| price < MIN_PRICE) {
        return Err(AppError::validation(format!(
            "Price must be at least {MIN_PRICE}"
        )));
    }
    if stock_quantity.is_some_and(|qty| qty < 0) {
        return Err(AppError::validation("Stock quantity cannot be negative"));
    }
    if minimum_stock.is_some_and(|qty| qty < 0) {
        return Err(AppError::validation("Minimum stock cannot be negative"));
    }
    Ok(())
}

/// Replaces the product's category links with `category_ids`.
async fn link_categories<C: ConnectionTrait>(
    conn: &C,
    product_id: Uuid,
    category_ids: &[Uuid],
) -> AppResult<()> {
    if category_ids.is_empty() {
        return Err(AppError::validation("At least one category is required"));
    }

    let mut unique = category_ids.to_vec();
    unique.sort();
    unique.dedup();

    let found = Categories::find()
        .filter(CategoryCol::Id.is_in(unique.clone()))
        .count(conn)
        .await?;
    if found != unique.len() as u64 {
        return Err(AppError::validation("One or more categories do not exist"));
    }

    ProductCategories::delete_many()
        .filter(LinkCol::ProductId.eq(product_id))
        .exec(conn)
        .await?;
    let links = unique.into_iter().map(|category_id| product_categories::ActiveModel {
        product_id: Set(product_id),
        category_id: Set(category_id),
    });
    ProductCategories::insert_many(links).exec(conn).await?;
    Ok(())
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    if payload.name.trim().is_empty() || payload.sku.trim().is_empty() {
        return Err(AppError::validation("Name and SKU are required"));
    }
    validate_fields(
        Some(payload.price),
        Some(payload.stock_quantity),
        Some(payload.minimum_stock),
    )?;

    let txn = state.orm.begin().await?;
    let sku_taken = Products::find()
        .filter(Column::Sku.eq(payload.sku.trim()))
        .one(&txn)
        .await?
        .is_some();
    if sku_taken {
        return Err(AppError::conflict(format!("SKU {} already exists", payload.sku)));
    }

    let now = Utc::now().fixed_offset();
    let id = Uuid::new_v4();
    let inserted = products::ActiveModel {
        id: Set(id),
        name: Set(payload.name.trim().to_string()),
        sku: Set(payload.sku.trim().to_string()),
        description: Set(payload.description),
        price: Set(payload.price),
        stock_quantity: Set(payload.stock_quantity),
        minimum_stock: Set(payload.minimum_stock),
        status: Set(payload.status.unwrap_or(ProductStatus::Active)),
        is_featured: Set(payload.is_featured),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await;

    let product = match inserted {
        Ok(product) => product,
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            return Err(AppError::conflict(format!("SKU {} already exists", payload.sku)));
        }
        Err(err) => return Err(err.into()),
    };
    link_categories(&txn, id, &payload.category_ids).await?;
    txn.commit().await?;

    tracing::info!(product_id = %product.id, sku = %product.sku, "product created");
    Ok(ApiResponse::single("Product created", product.into()))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    validate_fields(payload.price, None, payload.minimum_stock)?;

    let txn = state.orm.begin().await?;
    let existing = inventory_service::get_product(&txn, id).await?;

    let mut active: products::ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(minimum_stock) = payload.minimum_stock {
        active.minimum_stock = Set(minimum_stock);
    }
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    if let Some(is_featured) = payload.is_featured {
        active.is_featured = Set(is_featured);
    }
    active.updated_at = Set(Utc::now().fixed_offset());
    let product = active.update(&txn).await?;

    if let Some(category_ids) = payload.category_ids {
        link_categories(&txn, id, &category_ids).await?;
    }
    txn.commit().await?;

    Ok(ApiResponse::single("Updated", product.into()))
}

pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let ordered = OrderItems::find()
        .filter(OrderItemCol::ProductId.eq(id))
        .count(&state.orm)
        .await?;
    if ordered > 0 {
        return Err(AppError::conflict(
            "Product appears on existing orders; discontinue it instead",
        ));
    }

    let result = Products::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("Product"));
    }

    tracing::info!(product_id = %id, "product deleted");
    Ok(ApiResponse::single("Deleted", serde_json::json!({})))
}
