//! Initialize the configuration directory: create ~/.hears and a default config file.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Ensure the configuration has been initialized (config file exists).
pub fn require_initialized(config_path: &Path) -> Result<()> {
    if !config_path.exists() {
        anyhow::bail!(
            "configuration not initialized; run `hears init` first (config file not found: {})",
            config_path.display()
        );
    }
    Ok(())
}

/// Create the config directory and write `config.json` with `{}` if missing.
pub fn init_config_dir(config_path: &Path) -> Result<PathBuf> {
    let config_dir = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(config_dir)
        .with_context(|| format!("creating config directory {}", config_dir.display()))?;

    if !config_path.exists() {
        std::fs::write(config_path, b"{}")
            .with_context(|| format!("writing default config to {}", config_path.display()))?;
        log::info!("created default config at {}", config_path.display());
    } else {
        log::debug!("config already exists at {}, skipping", config_path.display());
    }

    Ok(config_dir.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_creates_config_once() {
        let dir = std::env::temp_dir().join(format!("hears-init-test-{}", uuid::Uuid::new_v4()));
        let config_path = dir.join("nested").join("config.json");
        assert!(require_initialized(&config_path).is_err());

        let created = init_config_dir(&config_path).unwrap();
        assert_eq!(created, dir.join("nested"));
        assert_eq!(std::fs::read_to_string(&config_path).unwrap(), "{}");
        require_initialized(&config_path).unwrap();

        std::fs::write(&config_path, r#"{"gateway":{"port":1}}"#).unwrap();
        init_config_dir(&config_path).unwrap();
        assert_eq!(
            std::fs::read_to_string(&config_path).unwrap(),
            r#"{"gateway":{"port":1}}"#
        );
        let _ = std::fs::remove_dir_all(&dir);
    }
}
