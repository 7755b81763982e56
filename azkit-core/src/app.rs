//! Process bootstrap shared by binaries and scripts.

use tracing::{error, info};

pub struct App;

impl App {
    /// Load `.env` (overriding variables already set) when `load_env_vars` is
    /// true. A missing `.env` file is fine; an unreadable or malformed one is
    /// logged and reported as `false`.
    pub fn initialize(load_env_vars: bool) -> bool {
        if !load_env_vars {
            return true;
        }
        match dotenvy::dotenv_override() {
            Ok(path) => {
                info!(path = %path.display(), "Loaded environment file");
                true
            }
            Err(e) if e.not_found() => {
                info!("No .env file found, using process environment only");
                true
            }
            Err(e) => {
                error!(error = %e, "Error initializing application environment");
                false
            }
        }
    }
}
