//! Wiring & DI. Entry point: bootstrap adapters, load the catalog, run UI.
//! No business logic here; mutations are delegated to MutationOrchestrator.

use cineweb::adapters::http::HttpRecordStore;
use cineweb::adapters::memory::InMemoryRecordStore;
use cineweb::adapters::ui::progress::with_spinner;
use cineweb::adapters::ui::{ConsoleNotifier, InquireConfirmer, TuiInputPort};
use cineweb::ports::{Confirmer, InputPort, Notifier, RecordStore};
use cineweb::shared::config::{AppConfig, StoreBackend};
use cineweb::usecases::{Catalog, EntityRepository, MutationOrchestrator};
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    cineweb::adapters::ui::init_ui();

    let cfg = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "invalid configuration, using defaults");
        AppConfig::default()
    });

    // --- Record store ---
    let store: Arc<dyn RecordStore> = match cfg.store_backend_or_default() {
        StoreBackend::Http => {
            let url = cfg.store_url_or_default();
            info!(url = %url, "using HTTP record store");
            Arc::new(HttpRecordStore::new(url))
        }
        StoreBackend::Memory => {
            warn!("CINEWEB_STORE_BACKEND=memory, records are lost on exit");
            Arc::new(InMemoryRecordStore::new())
        }
    };
    let repo = EntityRepository::new(store);

    // --- Initial snapshot: all four collections, concurrently ---
    let catalog = with_spinner("Loading catalog...", Catalog::load(&repo))
        .await
        .map_err(|e| anyhow::anyhow!("Could not reach the record store: {}", e))?;

    // --- Orchestrator ---
    let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier);
    let confirmer: Arc<dyn Confirmer> = Arc::new(InquireConfirmer);
    let refresh = cfg.refresh_after_mutation_or_default();
    info!(refresh_after_mutation = refresh, "mutation policy");
    let orchestrator = MutationOrchestrator::new(repo, catalog, notifier, confirmer)
        .with_refresh_after_mutation(refresh);

    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(
        orchestrator,
        cfg.upcoming_preview_limit_or_default(),
        cfg.export_dir_or_default(),
    ));

    // --- Run (main menu -> Home / Movies / Rooms / Showings / Tickets / Export) ---
    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
