use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use bgo_core::Config;
use inquire::{Password, PasswordDisplayMode};

/// Prompt for the OpenWeather API key and store it in the config file.
pub fn configure_api_key() -> Result<PathBuf> {
    let path = Config::config_file_path()?;
    let mut config = Config::load_from(&path)?;

    let key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .with_help_message("Create one at https://home.openweathermap.org/api_keys")
        .prompt()
        .context("Failed to read API key")?;

    let key = key.trim();
    if key.is_empty() {
        bail!("API key must not be empty");
    }

    config.set_api_key(key.to_string());
    config.save_to(&path)?;
    tracing::info!("stored API key in {}", path.display());

    Ok(path)
}
