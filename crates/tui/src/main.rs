mod app;
mod config;
mod error;
mod ui;

use std::{fs::OpenOptions, path::Path, sync::Arc};

use firebase::FirebaseClient;

use crate::{config::AppConfig, error::Result};

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;
    init_tracing(&config)?;
    tracing::info!(project = %config.project_id, "starting mybudget");

    let client = Arc::new(FirebaseClient::new(config.firebase_settings())?);
    let mut app = app::App::new(
        client.clone(),
        client.clone(),
        config.currency()?,
        config.splash(),
    );

    let restore = tokio::spawn(async move {
        client.restore().await;
    });
    let result = app.run().await;
    restore.abort();

    if let Err(err) = &result {
        tracing::error!("mybudget stopped: {err}");
    }
    result
}

/// Log to a file: the terminal belongs to the UI.
fn init_tracing(config: &AppConfig) -> Result<()> {
    let path = Path::new(&config.log_path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "mybudget={level},ledger={level},firebase={level}",
            level = config.log_level
        ))
        .with_ansi(false)
        .with_writer(Arc::new(file))
        .init();
    Ok(())
}
