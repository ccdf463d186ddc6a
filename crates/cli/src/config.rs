use anyhow::{Context, Result};
use solitaire_hierarchy::OrgChartConfig;
use std::fs;
use std::path::Path;

/// Load configuration overrides from a TOML file; defaults when no file is given.
/// Missing keys keep their default values.
pub fn load_config(path: Option<&Path>) -> Result<OrgChartConfig> {
    let config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            let config: OrgChartConfig = toml::from_str(&text)
                .with_context(|| format!("Failed to parse config {}", path.display()))?;
            log::debug!("Loaded config overrides from {}", path.display());
            config
        }
        None => OrgChartConfig::default(),
    };

    config.validate().context("Configuration rejected")?;
    Ok(config)
}

/// Effective configuration as TOML
pub fn render_config(config: &OrgChartConfig) -> Result<String> {
    toml::to_string_pretty(config).context("Failed to serialize configuration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use solitaire_hierarchy::{NameMatching, TeamHeightScope};
    use tempfile::tempdir;

    #[test]
    fn test_missing_path_uses_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config, OrgChartConfig::default());
    }

    #[test]
    fn test_partial_file_overrides() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("solitaire.toml");
        fs::write(
            &path,
            "name_matching = \"fuzzy\"\n\n[layout]\nteam_height_scope = \"per-stream\"\n",
        )
        .unwrap();

        let config = load_config(Some(path.as_path())).unwrap();
        assert_eq!(config.name_matching, NameMatching::Fuzzy);
        assert_eq!(config.layout.team_height_scope, TeamHeightScope::PerStream);
        assert_eq!(config.layout.items_per_row, 6);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[layout]\nthemes_per_row = 0\n").unwrap();

        let err = load_config(Some(path.as_path())).unwrap_err();
        assert!(format!("{err:#}").contains("themes_per_row"));
    }

    #[test]
    fn test_rendered_config_round_trips() {
        let config = OrgChartConfig::default();
        let text = render_config(&config).unwrap();
        let back: OrgChartConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
