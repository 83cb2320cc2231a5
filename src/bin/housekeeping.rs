use std::{sync::Arc, time::Duration};

use chrono::Utc;
use storefront_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    notifications::LogNotifier,
    services::housekeeping_service,
    state::AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// One pass of the periodic jobs: drop abandoned carts, raise low-stock
/// alerts, then report yesterday's sales. Meant to be scheduled externally
/// (cron, systemd timer).
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,storefront_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let retention_days = config.cart_retention_days;
    let notifier = Arc::new(LogNotifier::new(config.admin_email.clone()));
    let state = AppState::new(orm, notifier, config);

    let removed = housekeeping_service::cleanup_abandoned_carts(&state.orm, retention_days).await?;
    let alerts = housekeeping_service::check_low_stock(&state).await?;
    let yesterday = Utc::now()
        .date_naive()
        .pred_opt()
        .ok_or_else(|| anyhow::anyhow!("no previous day"))?;
    let report = housekeeping_service::send_daily_sales_report(&state, yesterday).await?;
    println!(
        "Housekeeping done: {removed} abandoned carts removed, {} low stock alerts, \
         {} orders sold on {yesterday}",
        alerts.len(),
        report.total_orders
    );

    // Notifications are dispatched on background tasks.
    tokio::time::sleep(Duration::from_millis(200)).await;
    Ok(())
}
