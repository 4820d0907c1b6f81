mod overrides;

pub use overrides::apply_overrides;

use std::path::Path;

use anyhow::{Context, Result};

use trapmodes::Settings;

use crate::io::{read_text, write_text};

/// Reads `path` if given, otherwise starts from the embedded defaults.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };

    let text = read_text(path)?;
    Settings::from_toml_str(&text)
        .with_context(|| format!("Invalid settings file: {}", path.display()))
}

pub fn save_settings(path: &Path, settings: &Settings, force: bool) -> Result<()> {
    let text = settings
        .to_toml_string()
        .context("Failed to serialize settings")?;
    write_text(path, &text, force)
}
