use std::path::Path;

use sitesnap_lib::{Config, SnapError};

/// Load config from a TOML file, central config, or return defaults.
/// Priority: explicit path > ~/.config/sitesnap/config.toml > defaults
pub fn load_config(path: Option<&Path>) -> Result<Config, SnapError> {
    let cfg = Config::load(path).map_err(|e| {
        let loc = path
            .map(|p| p.display().to_string())
            .or_else(|| Config::central_config_path().map(|p| p.display().to_string()))
            .unwrap_or_else(|| "defaults".to_string());
        SnapError::Config(format!("Failed to read config {}: {}", loc, e))
    })?;

    cfg.validate().map_err(|e| {
        let prefix = path
            .map(|p| format!("Invalid config ({}): {}", p.display(), e))
            .unwrap_or_else(|| format!("Invalid config: {}", e));
        SnapError::Config(prefix)
    })?;
    Ok(cfg)
}

/// Format effective config as a single-line string.
pub fn format_effective_config(config: &Config, config_source: Option<&Path>) -> String {
    let source = config_source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    format!(
        "Effective config [{source}]: storage_root={}, viewport={}, headless={}, timeouts: nav={}s, sitemap-probe={}s, pdf margin={}px, sitemap strict={}, chrome={}",
        config.resolved_storage_root().display(),
        config.viewport,
        config.headless,
        config.timeouts.navigation.as_secs(),
        config.timeouts.sitemap_probe.as_secs(),
        config.pdf.margin_px,
        config.sitemap.strict,
        config
            .chrome_executable
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "auto".to_string()),
    )
}
