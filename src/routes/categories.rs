use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::{
        categories::{
            CategoryList, CategoryPriceStats, CategoryTree, CreateCategoryRequest,
            UpdateCategoryRequest,
        },
        products::ProductList,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Category,
    response::ApiResponse,
    routes::params::{AveragePriceQuery, CategoryQuery, Pagination},
    services::category_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/tree", get(category_tree))
        .route("/{id}", patch(update_category))
        .route("/{id}/products", get(category_products))
        .route("/{id}/average-price", get(average_price))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    params(
        ("roots_only" = Option<bool>, Query, description = "Only top-level categories"),
        ("parent_id" = Option<Uuid>, Query, description = "Only children of this category")
    ),
    responses(
        (status = 200, description = "Active categories", body = ApiResponse<CategoryList>)
    ),
    tag = "Categories"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    let resp = category_service::list_categories(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/categories/tree",
    responses(
        (status = 200, description = "Nested active categories", body = ApiResponse<CategoryTree>)
    ),
    tag = "Categories"
)]
pub async fn category_tree(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CategoryTree>>> {
    let resp = category_service::category_tree(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<Category>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Parent not found"),
        (status = 409, description = "Name or slug already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Category>>)> {
    let resp = category_service::create_category(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    patch,
    path = "/api/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<Category>),
        (status = 400, description = "Move would create a cycle"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn update_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let resp = category_service::update_category(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}/products",
    params(
        ("id" = Uuid, Path, description = "Category ID"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20")
    ),
    responses(
        (status = 200, description = "Active products in the category and its descendants", body = ApiResponse<ProductList>),
        (status = 404, description = "Not Found")
    ),
    tag = "Categories"
)]
pub async fn category_products(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = category_service::category_products(&state, id, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}/average-price",
    params(
        ("id" = Uuid, Path, description = "Category ID"),
        ("include_descendants" = Option<bool>, Query, description = "Include subcategories")
    ),
    responses(
        (status = 200, description = "Average active price", body = ApiResponse<CategoryPriceStats>),
        (status = 404, description = "Not Found")
    ),
    tag = "Categories"
)]
pub async fn average_price(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<AveragePriceQuery>,
) -> AppResult<Json<ApiResponse<CategoryPriceStats>>> {
    let resp =
        category_service::category_average_price(&state, id, query.include_descendants).await?;
    Ok(Json(resp))
}
