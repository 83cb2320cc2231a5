#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, Set};
use storefront_api::{
    config::AppConfig,
    db::run_migrations,
    dto::cart::AddToCartRequest,
    entity::{
        categories, customers, product_categories, products,
        status::{CustomerRole, ProductStatus},
    },
    middleware::auth::AuthUser,
    models::SalesReport,
    notifications::{LowStockAlert, Notifier, OrderSnapshot, StatusChange},
    services::cart_service,
    state::AppState,
};
use uuid::Uuid;

/// Captures every notification so tests can assert on what was sent.
#[derive(Default)]
pub struct RecordingNotifier {
    pub placed: Mutex<Vec<OrderSnapshot>>,
    pub changes: Mutex<Vec<StatusChange>>,
    pub alerts: Mutex<Vec<LowStockAlert>>,
    pub reports: Mutex<Vec<SalesReport>>,
}

impl RecordingNotifier {
    pub fn placed(&self) -> Vec<OrderSnapshot> {
        self.placed.lock().unwrap().clone()
    }

    pub fn changes(&self) -> Vec<StatusChange> {
        self.changes.lock().unwrap().clone()
    }

    pub fn alerts(&self) -> Vec<LowStockAlert> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn reports(&self) -> Vec<SalesReport> {
        self.reports.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn order_placed(&self, order: &OrderSnapshot) -> anyhow::Result<()> {
        self.placed.lock().unwrap().push(order.clone());
        Ok(())
    }

    async fn status_changed(&self, change: &StatusChange) -> anyhow::Result<()> {
        self.changes.lock().unwrap().push(change.clone());
        Ok(())
    }

    async fn low_stock(&self, alert: &LowStockAlert) -> anyhow::Result<()> {
        self.alerts.lock().unwrap().push(alert.clone());
        Ok(())
    }

    async fn sales_report(&self, report: &SalesReport) -> anyhow::Result<()> {
        self.reports.lock().unwrap().push(report.clone());
        Ok(())
    }
}

/// A delivery channel that is always down.
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn order_placed(&self, _order: &OrderSnapshot) -> anyhow::Result<()> {
        anyhow::bail!("smtp unreachable")
    }

    async fn status_changed(&self, _change: &StatusChange) -> anyhow::Result<()> {
        anyhow::bail!("sms gateway unreachable")
    }

    async fn low_stock(&self, _alert: &LowStockAlert) -> anyhow::Result<()> {
        anyhow::bail!("smtp unreachable")
    }

    async fn sales_report(&self, _report: &SalesReport) -> anyhow::Result<()> {
        anyhow::bail!("smtp unreachable")
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".into(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: "test-secret".into(),
        jwt_ttl_hours: 1,
        admin_email: "ops@example.com".into(),
        cart_retention_days: 30,
    }
}

/// Fresh in-memory database behind a single pooled connection, so every
/// test sees its own schema and concurrent work is serialized.
pub async fn setup_state_with(notifier: Arc<dyn Notifier>) -> anyhow::Result<AppState> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let orm = Database::connect(options).await?;
    run_migrations(&orm).await?;
    Ok(AppState::new(orm, notifier, test_config()))
}

pub async fn setup_state() -> anyhow::Result<(AppState, Arc<RecordingNotifier>)> {
    let recorder = Arc::new(RecordingNotifier::default());
    let state = setup_state_with(recorder.clone()).await?;
    Ok((state, recorder))
}

/// Polls until `done` holds or a second has passed.
pub async fn eventually<F>(mut done: F) -> bool
where
    F: FnMut() -> bool,
{
    for _ in 0..100 {
        if done() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    done()
}

pub async fn create_customer(
    state: &AppState,
    email: &str,
    role: CustomerRole,
) -> anyhow::Result<customers::Model> {
    let now = Utc::now().fixed_offset();
    let customer = customers::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set("not-a-real-hash".into()),
        role: Set(role),
        first_name: Set("Amina".into()),
        last_name: Set("Otieno".into()),
        phone_number: Set("+254700111222".into()),
        address: Set("12 Moi Avenue".into()),
        city: Set("Nairobi".into()),
        country: Set("Kenya".into()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.orm)
    .await?;
    Ok(customer)
}

pub fn as_user(customer: &customers::Model) -> AuthUser {
    AuthUser {
        user_id: customer.id,
        role: customer.role,
    }
}

pub async fn customer(state: &AppState, email: &str) -> anyhow::Result<AuthUser> {
    let customer = create_customer(state, email, CustomerRole::Customer).await?;
    Ok(as_user(&customer))
}

pub async fn admin(state: &AppState) -> anyhow::Result<AuthUser> {
    let admin = create_customer(state, "admin@example.com", CustomerRole::Admin).await?;
    Ok(as_user(&admin))
}

pub async fn create_category(
    state: &AppState,
    name: &str,
    parent_id: Option<Uuid>,
) -> anyhow::Result<categories::Model> {
    let category = categories::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        slug: Set(name.to_lowercase().replace(' ', "-")),
        description: Set(String::new()),
        parent_id: Set(parent_id),
        is_active: Set(true),
        created_at: Set(Utc::now().fixed_offset()),
    }
    .insert(&state.orm)
    .await?;
    Ok(category)
}

pub async fn create_product(
    state: &AppState,
    name: &str,
    price: Decimal,
    stock: i32,
) -> anyhow::Result<products::Model> {
    create_product_with(state, name, price, stock, 0, ProductStatus::Active).await
}

pub async fn create_product_with(
    state: &AppState,
    name: &str,
    price: Decimal,
    stock: i32,
    minimum_stock: i32,
    status: ProductStatus,
) -> anyhow::Result<products::Model> {
    let now = Utc::now().fixed_offset();
    let product = products::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        sku: Set(format!("SKU-{}", &Uuid::new_v4().simple().to_string()[..8])),
        description: Set(format!("{name} for tests")),
        price: Set(price),
        stock_quantity: Set(stock),
        minimum_stock: Set(minimum_stock),
        status: Set(status),
        is_featured: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.orm)
    .await?;
    Ok(product)
}

pub async fn link(state: &AppState, product_id: Uuid, category_id: Uuid) -> anyhow::Result<()> {
    product_categories::ActiveModel {
        product_id: Set(product_id),
        category_id: Set(category_id),
    }
    .insert(&state.orm)
    .await?;
    Ok(())
}

pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    quantity: i32,
) -> anyhow::Result<()> {
    cart_service::add_item(
        state,
        user,
        AddToCartRequest {
            product_id,
            quantity,
        },
    )
    .await?;
    Ok(())
}

pub async fn stock_of(state: &AppState, product_id: Uuid) -> anyhow::Result<i32> {
    let product = storefront_api::services::inventory_service::get_product(&state.orm, product_id)
        .await?;
    Ok(product.stock_quantity)
}

/// Values read back from SQLite pass through `f64`; compare at cent precision.
pub fn cents(amount: Decimal) -> Decimal {
    amount.round_dp(2)
}
