//! Category forest: listing, tree building, re-parenting and per-category
//! product views.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, SqlErr,
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
    entity::{
        Categories, ProductCategories, Products,
        categories::{self, Column as CategoryCol},
        product_categories::Column as LinkCol,
        products::{self, Column as ProdCol},
        status::ProductStatus,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Category, CategoryNode, Product},
    pricing::round_money,
    response::{ApiResponse, Meta},
    routes::params::{CategoryQuery, Pagination},
    state::AppState,
};

/// Nests `categories` under their parents. Orphans whose parent is not in
/// the slice become roots. Siblings are ordered by name.
pub fn build_tree(categories: &[categories::Model]) -> Vec<CategoryNode> {
    let present: HashSet<Uuid> = categories.iter().map(|c| c.id).collect();
    let mut children: HashMap<Option<Uuid>, Vec<&categories::Model>> = HashMap::new();
    for category in categories {
        let parent = category.parent_id.filter(|id| present.contains(id));
        children.entry(parent).or_default().push(category);
    }
    for siblings in children.values_mut() {
        siblings.sort_by(|a, b| a.name.cmp(&b.name));
    }

    fn attach(
        parent: Option<Uuid>,
        children: &HashMap<Option<Uuid>, Vec<&categories::Model>>,
    ) -> Vec<CategoryNode> {
        children
            .get(&parent)
            .map(|siblings| {
                siblings
                    .iter()
                    .map(|category| CategoryNode {
                        id: category.id,
                        name: category.name.clone(),
                        slug: category.slug.clone(),
                        children: attach(Some(category.id), children),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    attach(None, &children)
}

/// `root` followed by every category below it.
pub fn descendant_ids(categories: &[categories::Model], root: Uuid) -> Vec<Uuid> {
    let mut ids = vec![root];
    let mut cursor = 0;
    while cursor < ids.len() {
        let current = ids[cursor];
        let children: Vec<Uuid> = categories
            .iter()
            .filter(|c| c.parent_id == Some(current) && !ids.contains(&c.id))
            .map(|c| c.id)
            .collect();
        ids.extend(children);
        cursor += 1;
    }
    ids
}

/// Whether hanging `id` under `new_parent` would close a loop.
pub fn creates_cycle(categories: &[categories::Model], id: Uuid, new_parent: Uuid) -> bool {
    let parents: HashMap<Uuid, Option<Uuid>> =
        categories.iter().map(|c| (c.id, c.parent_id)).collect();

    let mut seen = HashSet::new();
    let mut current = Some(new_parent);
    while let Some(ancestor) = current {
        if ancestor == id || !seen.insert(ancestor) {
            return true;
        }
        current = parents.get(&ancestor).copied().flatten();
    }
    false
}

async fn get_category<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<categories::Model> {
    Categories::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::not_found("Category"))
}

fn unique_violation(err: sea_orm::DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::conflict("A category with this name or slug already exists")
        }
        _ => err.into(),
    }
}

pub async fn list_categories(
    state: &AppState,
    query: CategoryQuery,
) -> AppResult<ApiResponse<CategoryList>> {
    let mut finder = Categories::find().filter(CategoryCol::IsActive.eq(true));
    if query.roots_only {
        finder = finder.filter(CategoryCol::ParentId.is_null());
    } else if let Some(parent_id) = query.parent_id {
        finder = finder.filter(CategoryCol::ParentId.eq(parent_id));
    }

    let items = finder
        .order_by_asc(CategoryCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Category::from)
        .collect();
    Ok(ApiResponse::single("Categories", CategoryList { items }))
}

pub async fn category_tree(state: &AppState) -> AppResult<ApiResponse<CategoryTree>> {
    let active = Categories::find()
        .filter(CategoryCol::IsActive.eq(true))
        .all(&state.orm)
        .await?;
    let roots = build_tree(&active);
    Ok(ApiResponse::single("Category tree", CategoryTree { roots }))
}

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    if payload.name.trim().is_empty() || payload.slug.trim().is_empty() {
        return Err(AppError::validation("Name and slug are required"));
    }
    if let Some(parent_id) = payload.parent_id {
        get_category(&state.orm, parent_id)
            .await
            .map_err(|_| AppError::not_found("Parent category"))?;
    }

    let category = categories::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        slug: Set(payload.slug.trim().to_lowercase()),
        description: Set(payload.description),
        parent_id: Set(payload.parent_id),
        is_active: Set(true),
        created_at: Set(Utc::now().fixed_offset()),
    }
    .insert(&state.orm)
    .await
    .map_err(unique_violation)?;

    Ok(ApiResponse::single("Category created", category.into()))
}

pub async fn update_category(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    let existing = get_category(&state.orm, id).await?;

    if let Some(Some(parent_id)) = payload.parent_id {
        get_category(&state.orm, parent_id)
            .await
            .map_err(|_| AppError::not_found("Parent category"))?;
        let all = Categories::find().all(&state.orm).await?;
        if creates_cycle(&all, id, parent_id) {
            return Err(AppError::validation(
                "A category cannot be moved under itself or one of its descendants",
            ));
        }
    }

    let mut active: categories::ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    if let Some(parent_id) = payload.parent_id {
        active.parent_id = Set(parent_id);
    }
    let category = active.update(&state.orm).await.map_err(unique_violation)?;

    Ok(ApiResponse::single("Category updated", category.into()))
}

/// Active products linked to the category, or to it and everything below it.
async fn products_in<C: ConnectionTrait>(
    conn: &C,
    category_id: Uuid,
    include_descendants: bool,
) -> AppResult<sea_orm::Select<Products>> {
    let category_ids = if include_descendants {
        let all = Categories::find().all(conn).await?;
        descendant_ids(&all, category_id)
    } else {
        vec![category_id]
    };

    let product_ids: Vec<Uuid> = ProductCategories::find()
        .select_only()
        .column(LinkCol::ProductId)
        .filter(LinkCol::CategoryId.is_in(category_ids))
        .distinct()
        .into_tuple()
        .all(conn)
        .await?;

    Ok(Products::find()
        .filter(ProdCol::Id.is_in(product_ids))
        .filter(ProdCol::Status.eq(ProductStatus::Active)))
}

pub async fn category_products(
    state: &AppState,
    id: Uuid,
    pagination: Pagination,
) -> AppResult<ApiResponse<ProductList>> {
    get_category(&state.orm, id).await?;
    let (page, limit, offset) = pagination.normalize();

    let finder = products_in(&state.orm, id, true)
        .await?
        .order_by_asc(ProdCol::Name);
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

pub fn average_price(products: &[products::Model]) -> Decimal {
    if products.is_empty() {
        return Decimal::ZERO;
    }
    let sum = products
        .iter()
        .fold(Decimal::ZERO, |acc, product| acc + product.price);
    round_money(sum / Decimal::from(products.len()))
}

pub async fn category_average_price(
    state: &AppState,
    id: Uuid,
    include_descendants: bool,
) -> AppResult<ApiResponse<CategoryPriceStats>> {
    let category = get_category(&state.orm, id).await?;
    let products = products_in(&state.orm, id, include_descendants)
        .await?
        .all(&state.orm)
        .await?;

    let stats = CategoryPriceStats {
        category: category.name,
        average_price: average_price(&products),
        product_count: products.len() as u64,
        include_descendants,
    };
    Ok(ApiResponse::single("Average price", stats))
}
