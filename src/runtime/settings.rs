use std::path::Path;

use tracing::{debug, warn};

use crate::config;

pub fn load_settings(explicit: Option<&Path>) -> config::Settings {
    match config::Settings::load(explicit) {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                warn!("invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                debug!("loaded settings: {s:?}");
                s
            }
        }
        Err(e) => {
            // A broken config must not keep the tool from running.
            warn!("failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}
