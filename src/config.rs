use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "circuit-stats.toml";

/// Top-level configuration loaded from circuit-stats.toml.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct StatsConfig {
    pub summary: SummaryConfig,
    pub categories: Vec<CategoryConfig>,
    pub artifacts: ArtifactConfig,
    pub plot: PlotConfig,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SummaryConfig {
    pub output: PathBuf,
    pub log_extension: String,
    pub header: bool,
}

/// One benchmark category: a root directory averaged as a unit.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CategoryConfig {
    pub name: String,
    pub dir: PathBuf,
    /// Emit one CSV row per circuit in addition to the category average.
    #[serde(default)]
    pub itemize: bool,
}

/// File extensions of the per-case scalar artifacts, without the leading dot.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ArtifactConfig {
    pub time_extension: String,
    pub and_extension: String,
    pub level_extension: String,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlotConfig {
    pub output: PathBuf,
    pub output_prefix: String,
    pub width: u32,
    pub height: u32,
}

// --- Default implementations ---

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            summary: SummaryConfig::default(),
            categories: vec![
                CategoryConfig {
                    name: "EPFL".to_string(),
                    dir: PathBuf::from("benchmark/epfl_processed"),
                    itemize: true,
                },
                CategoryConfig {
                    name: "BEEM".to_string(),
                    dir: PathBuf::from("benchmark/beem_processed"),
                    itemize: false,
                },
            ],
            artifacts: ArtifactConfig::default(),
            plot: PlotConfig::default(),
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("results.csv"),
            log_extension: "out".to_string(),
            header: false,
        }
    }
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            time_extension: "time".to_string(),
            and_extension: "and".to_string(),
            level_extension: "lev".to_string(),
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("plot_3d.svg"),
            output_prefix: "circuits".to_string(),
            width: 1200,
            height: 900,
        }
    }
}

/// Load configuration.
///
/// With `explicit == false` a missing file falls back to defaults; a file
/// the user named on the command line must exist. A file that exists but
/// does not parse is always an error.
pub fn load_config(path: &Path, explicit: bool) -> Result<StatsConfig, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && !explicit => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(StatsConfig::default());
        }
        Err(e) => return Err(ConfigError::Io(path.to_path_buf(), e)),
    };
    let config: StatsConfig =
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
    tracing::debug!(path = %path.display(), categories = config.categories.len(), "loaded config");
    Ok(config)
}

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "cannot read config {}: {e}", path.display()),
            ConfigError::Parse(path, e) => write!(f, "invalid config {}: {e}", path.display()),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(_, e) => Some(e),
            ConfigError::Parse(_, e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_benchmark_layout() {
        let cfg = StatsConfig::default();
        assert_eq!(cfg.summary.output, PathBuf::from("results.csv"));
        assert_eq!(cfg.summary.log_extension, "out");
        assert!(!cfg.summary.header);
        assert_eq!(cfg.categories.len(), 2);
        assert_eq!(cfg.categories[0].name, "EPFL");
        assert!(cfg.categories[0].itemize);
        assert_eq!(cfg.categories[1].name, "BEEM");
        assert!(!cfg.categories[1].itemize);
        assert_eq!(cfg.artifacts.time_extension, "time");
        assert_eq!(cfg.artifacts.and_extension, "and");
        assert_eq!(cfg.artifacts.level_extension, "lev");
    }

    #[test]
    fn missing_implicit_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = load_config(&dir.path().join(DEFAULT_CONFIG_FILE), false).unwrap();
        assert_eq!(cfg, StatsConfig::default());
    }

    #[test]
    fn missing_explicit_file_is_error() {
        let dir = TempDir::new().unwrap();
        let result = load_config(&dir.path().join("custom.toml"), true);
        assert!(matches!(result, Err(ConfigError::Io(..))));
    }

    #[test]
    fn partial_file_fills_remaining_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(
            &path,
            r#"
[summary]
output = "out/ratios.csv"
header = true

[[categories]]
name = "CPU"
dir = "benchmark/aig_cpu_processed"
itemize = true

[[categories]]
name = "HWMCC"
dir = "benchmark/hwmcc"
"#,
        )
        .unwrap();
        let cfg = load_config(&path, true).unwrap();
        assert_eq!(cfg.summary.output, PathBuf::from("out/ratios.csv"));
        assert!(cfg.summary.header);
        assert_eq!(cfg.summary.log_extension, "out");
        assert_eq!(cfg.categories.len(), 2);
        assert_eq!(cfg.categories[0].name, "CPU");
        assert!(cfg.categories[0].itemize);
        assert!(!cfg.categories[1].itemize);
        assert_eq!(cfg.artifacts, ArtifactConfig::default());
        assert_eq!(cfg.plot, PlotConfig::default());
    }

    #[test]
    fn malformed_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "[summary\noutput = ").unwrap();
        let result = load_config(&path, false);
        assert!(matches!(result, Err(ConfigError::Parse(..))));
    }

    #[test]
    fn custom_artifact_extensions() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(
            &path,
            "[artifacts]\ntime_extension = \"t\"\nlevel_extension = \"depth\"\n",
        )
        .unwrap();
        let cfg = load_config(&path, false).unwrap();
        assert_eq!(cfg.artifacts.time_extension, "t");
        assert_eq!(cfg.artifacts.and_extension, "and");
        assert_eq!(cfg.artifacts.level_extension, "depth");
    }
}
