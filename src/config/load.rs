use std::{
    env,
    path::{Path, PathBuf},
};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` reads the optional config file first, then lets
/// environment variables (prefix `AUDIOTAG__`) override it, and falls back to
/// struct defaults.
impl Settings {
    /// Load settings from the optional config file and the environment.
    ///
    /// `explicit` (from `--config`) wins over every other path source.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ::config::ConfigError> {
        let config_path = explicit
            .map(Path::to_path_buf)
            .or_else(resolve_config_path);

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("AUDIOTAG")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.cleanup.supported_formats.is_empty() {
            return Err("cleanup.supported_formats must not be empty".to_string());
        }
        let lists = [
            ("cleanup.supported_formats", &self.cleanup.supported_formats),
            ("cleanup.allowed_formats", &self.cleanup.allowed_formats),
            ("extract.supported_formats", &self.extract.supported_formats),
            ("convert.supported_formats", &self.convert.supported_formats),
            ("copy.supported_formats", &self.copy.supported_formats),
        ];
        for (name, list) in lists {
            if let Some(bad) = list.iter().find(|f| !f.starts_with('.')) {
                return Err(format!("{name}: \"{bad}\" must start with '.'"));
            }
        }
        if self.library.location.as_os_str().is_empty() {
            return Err("library.location must be set".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `AUDIOTAG_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("AUDIOTAG_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/audiotag/config.json`
/// or `~/.config/audiotag/config.json` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("audiotag").join("config.json"))
}
