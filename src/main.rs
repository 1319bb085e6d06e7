use std::sync::Arc;

use color_eyre::eyre::{eyre, Result};
use dotenv::dotenv;
use unimed_api::config::{ApiConfig, StoreBackend};
use unimed_core::{
    store::{AppointmentStore, InMemoryAppointmentStore},
    Scheduler,
};
use unimed_db::{create_pool, schema::initialize_database, PgAppointmentStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;
    let catalog = config.slot_catalog()?;

    // Select the appointment store
    let store: Arc<dyn AppointmentStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| eyre!("DATABASE_URL must be set for the postgres store"))?;

            // Create database connection pool
            let db_pool = create_pool(database_url, config.database_max_connections).await?;

            // Initialize database schema
            initialize_database(&db_pool).await?;

            Arc::new(PgAppointmentStore::new(db_pool))
        }
        StoreBackend::Memory => Arc::new(InMemoryAppointmentStore::new()),
    };

    let scheduler = Scheduler::new(catalog, store, config.store_timeout);

    // Start API server
    unimed_api::start_server(config, scheduler).await?;

    Ok(())
}
