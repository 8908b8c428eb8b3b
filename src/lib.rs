#[macro_use]
extern crate log;

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod enums;
pub mod mailer;
pub mod models;
pub mod services;
pub mod test_utils;

use crate::auth::SessionStore;
use crate::config::AppConfig;
use crate::db::{
    establish_connection_pool, run_db_migrations, AnalyticsOperations, DbPool,
    FavoriteOperations, MenuOperations, OrderOperations, UserOperations,
};
use crate::mailer::{create_mail_client, DynMailClient};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub sessions: SessionStore,
    pub mailer: DynMailClient,
    pub user_ops: UserOperations,
    pub menu_ops: MenuOperations,
    pub order_ops: OrderOperations,
    pub favorite_ops: FavoriteOperations,
    pub analytics_ops: AnalyticsOperations,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let db = establish_connection_pool(&config.database_url);
        run_db_migrations(db.clone()).expect("Unable to run migrations");

        let mailer = create_mail_client(&config.mail);
        Self::with_parts(config, db, mailer)
    }

    /// Builds the state around an existing pool and mail client.
    pub fn with_parts(config: AppConfig, db: DbPool, mailer: DynMailClient) -> Self {
        let sessions = SessionStore::new(&config.session);
        let order_ops = OrderOperations::new(db.clone(), config.cancel_window_secs);
        AppState {
            sessions,
            mailer,
            user_ops: UserOperations::new(db.clone()),
            menu_ops: MenuOperations::new(db.clone()),
            order_ops,
            favorite_ops: FavoriteOperations::new(db.clone()),
            analytics_ops: AnalyticsOperations::new(db),
            config,
        }
    }
}
