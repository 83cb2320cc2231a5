use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use storefront_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{
        Categories, Customers, ProductCategories, Products, categories, customers,
        product_categories, products,
        status::{CustomerRole, ProductStatus},
    },
    services::auth_service::hash_password,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let admin_id =
        ensure_customer(&orm, "admin@example.com", "admin12345", CustomerRole::Admin).await?;
    let user_id =
        ensure_customer(&orm, "user@example.com", "user12345", CustomerRole::Customer).await?;

    let electronics = ensure_category(&orm, "Electronics", "electronics", None).await?;
    let phones = ensure_category(&orm, "Phones", "phones", Some(electronics)).await?;
    let books = ensure_category(&orm, "Books", "books", None).await?;

    seed_products(
        &orm,
        &[
            ("Wireless Mouse", "ACC-MOUSE-01", Decimal::new(150000, 2), 40, 5, false, electronics),
            ("USB-C Charger", "ACC-CHRG-01", Decimal::new(80000, 2), 25, 5, false, electronics),
            ("Budget Smartphone", "PHN-BUDGET-01", Decimal::new(1250000, 2), 8, 10, true, phones),
            ("Rust in Action", "BK-RUST-01", Decimal::new(450000, 2), 12, 3, true, books),
        ],
    )
    .await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_customer(
    orm: &DatabaseConnection,
    email: &str,
    password: &str,
    role: CustomerRole,
) -> anyhow::Result<Uuid> {
    if let Some(existing) = Customers::find()
        .filter(customers::Column::Email.eq(email))
        .one(orm)
        .await?
    {
        println!("Customer {email} already present");
        return Ok(existing.id);
    }

    let now = Utc::now().fixed_offset();
    let customer = customers::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set(hash_password(password)?),
        role: Set(role),
        first_name: Set("Demo".into()),
        last_name: Set(role.as_str().into()),
        phone_number: Set("+254700000000".into()),
        address: Set("1 Market Street".into()),
        city: Set("Nairobi".into()),
        country: Set("Kenya".into()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(orm)
    .await?;

    println!("Ensured customer {email} (role={})", role.as_str());
    Ok(customer.id)
}

async fn ensure_category(
    orm: &DatabaseConnection,
    name: &str,
    slug: &str,
    parent_id: Option<Uuid>,
) -> anyhow::Result<Uuid> {
    if let Some(existing) = Categories::find()
        .filter(categories::Column::Slug.eq(slug))
        .one(orm)
        .await?
    {
        return Ok(existing.id);
    }

    let category = categories::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        slug: Set(slug.to_string()),
        description: Set(String::new()),
        parent_id: Set(parent_id),
        is_active: Set(true),
        created_at: Set(Utc::now().fixed_offset()),
    }
    .insert(orm)
    .await?;
    Ok(category.id)
}

async fn seed_products(
    orm: &DatabaseConnection,
    rows: &[(&str, &str, Decimal, i32, i32, bool, Uuid)],
) -> anyhow::Result<()> {
    for (name, sku, price, stock, minimum, featured, category_id) in rows {
        let exists = Products::find()
            .filter(products::Column::Sku.eq(*sku))
            .one(orm)
            .await?
            .is_some();
        if exists {
            continue;
        }

        let now = Utc::now().fixed_offset();
        let product = products::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            sku: Set(sku.to_string()),
            description: Set(format!("{name} (demo data)")),
            price: Set(*price),
            stock_quantity: Set(*stock),
            minimum_stock: Set(*minimum),
            status: Set(ProductStatus::Active),
            is_featured: Set(*featured),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(orm)
        .await?;

        product_categories::ActiveModel {
            product_id: Set(product.id),
            category_id: Set(*category_id),
        }
        .insert(orm)
        .await?;
        println!("Seeded product {sku}");
    }

    let linked = ProductCategories::find().all(orm).await?.len();
    println!("{linked} product/category links present");
    Ok(())
}
