//! Assetflow engine shell
//!
//! Loads the snapshot store, seeds missing collections and runs an
//! integrity report over the live data. The maintenance entry point used
//! after imports and upgrades.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use assetflow::{config::AppConfig, repository::Repository, storage::SnapshotStore};

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("assetflow={}", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Assetflow engine v{}", env!("CARGO_PKG_VERSION"));

    // Open the snapshot store and load (or seed) the collections
    let store = SnapshotStore::open(&config.storage.path)?;
    let repository = Repository::load(store, config.workflow.seed_on_start);

    let summary = repository.summary();
    tracing::info!(
        users = summary.users,
        equipment = summary.equipment,
        available = summary.available,
        assigned = summary.assigned,
        under_repair = summary.under_repair,
        pending_approvals = summary.pending_approvals,
        events = summary.events,
        "inventory summary"
    );

    // Cross-entity invariants over live data
    let violations = repository.integrity_report();
    if violations.is_empty() {
        tracing::info!("integrity check passed");
    } else {
        for violation in &violations {
            tracing::warn!("integrity violation: {violation}");
        }
        anyhow::bail!("{} integrity violation(s) found", violations.len());
    }

    Ok(())
}
