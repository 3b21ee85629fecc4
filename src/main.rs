//! Wiring & DI. Entry point: load config, build the repository, inject into the service, run UI.
//! No business logic here.

use dotenv::dotenv;
use lead_tracker::adapters::persistence::JsonLeadRepo;
use lead_tracker::adapters::ui::tui::TuiInputPort;
use lead_tracker::ports::{InputPort, LeadRepoPort};
use lead_tracker::shared::AppConfig;
use lead_tracker::usecases::LeadService;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();

    let (cfg, cfg_error) = match AppConfig::load() {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cfg.log_level_or_default().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }
    if let Some(e) = cfg_error {
        warn!(error = %e, "invalid configuration, using defaults");
    }

    let data_path = cfg.data_dir_or_default();
    let repo = JsonLeadRepo::new(&data_path)
        .with_db_path(cfg.db_path())
        .with_csv_path(cfg.csv_path());
    repo.ensure_data_dir()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    info!(
        data_dir = %data_path.display(),
        db = %repo.db_path().display(),
        "lead storage ready"
    );

    let repo: Arc<dyn LeadRepoPort> = Arc::new(repo);
    let service = Arc::new(LeadService::new(Arc::clone(&repo)));

    lead_tracker::adapters::ui::init_ui();
    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(Arc::clone(&service)));

    // --- Run (menu loop until the user exits) ---
    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
