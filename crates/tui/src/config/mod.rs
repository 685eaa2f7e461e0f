use std::{path::PathBuf, time::Duration};

use clap::Parser;
use firebase::{
    DEFAULT_FIRESTORE_URL, DEFAULT_IDENTITY_URL, DEFAULT_SECURETOKEN_URL, FirebaseSettings,
};
use ledger::Currency;
use serde::Deserialize;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "config/mybudget.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_key: String,
    pub project_id: String,
    pub identity_url: String,
    pub securetoken_url: String,
    pub firestore_url: String,
    pub currency: String,
    /// Minimum splash duration in milliseconds.
    pub splash_ms: u64,
    pub session_path: String,
    pub log_path: String,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            project_id: String::new(),
            identity_url: DEFAULT_IDENTITY_URL.to_string(),
            securetoken_url: DEFAULT_SECURETOKEN_URL.to_string(),
            firestore_url: DEFAULT_FIRESTORE_URL.to_string(),
            currency: Currency::default().code().to_string(),
            splash_ms: ledger::DEFAULT_SPLASH.as_millis() as u64,
            session_path: "config/session.json".to_string(),
            log_path: "mybudget.log".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Reject settings the app cannot start without.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(AppError::Setting("api_key is required".to_string()));
        }
        if self.project_id.trim().is_empty() {
            return Err(AppError::Setting("project_id is required".to_string()));
        }
        self.currency()?;
        Ok(())
    }

    pub fn currency(&self) -> Result<Currency> {
        Currency::try_from(self.currency.as_str()).map_err(AppError::Setting)
    }

    pub fn splash(&self) -> Duration {
        Duration::from_millis(self.splash_ms)
    }

    pub fn firebase_settings(&self) -> FirebaseSettings {
        FirebaseSettings {
            api_key: self.api_key.clone(),
            project_id: self.project_id.clone(),
            identity_url: self.identity_url.clone(),
            securetoken_url: self.securetoken_url.clone(),
            firestore_url: self.firestore_url.clone(),
            session_path: Some(PathBuf::from(&self.session_path)),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "mybudget", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the Firebase web API key.
    #[arg(long)]
    api_key: Option<String>,
    /// Override the Firebase project id.
    #[arg(long)]
    project_id: Option<String>,
    /// Override the Firestore base URL (e.g. the local emulator).
    #[arg(long)]
    firestore_url: Option<String>,
    /// Override the currency code (INR, EUR).
    #[arg(long)]
    currency: Option<String>,
    /// Override where the signed-in session is kept.
    #[arg(long)]
    session_path: Option<String>,
    /// Override the log level (error, warn, info, debug, trace).
    #[arg(long)]
    log_level: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("MYBUDGET"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(api_key) = args.api_key {
        settings.api_key = api_key;
    }
    if let Some(project_id) = args.project_id {
        settings.project_id = project_id;
    }
    if let Some(firestore_url) = args.firestore_url {
        settings.firestore_url = firestore_url;
    }
    if let Some(currency) = args.currency {
        settings.currency = currency;
    }
    if let Some(session_path) = args.session_path {
        settings.session_path = session_path;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }

    settings.validate()?;
    Ok(settings)
}
