use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    config::AppConfig,
    notifications::{NotificationDispatcher, Notifier},
};

#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub notifications: NotificationDispatcher,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(orm: DatabaseConnection, notifier: Arc<dyn Notifier>, config: AppConfig) -> Self {
        Self {
            orm,
            notifications: NotificationDispatcher::new(notifier),
            config: Arc::new(config),
        }
    }
}
