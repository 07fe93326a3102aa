use crate::error::{BuildStampError, Result};
use crate::platform::Platform;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub revision: RevisionConfig,
    pub version: VersionConfig,
    pub tools: ToolConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Chain external processes (grep, awk)
    Pipeline,
    /// Filter and split fields in process
    Native,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevisionConfig {
    pub strategy: Strategy,
    pub vcs_command: String,
    pub marker: String,
    pub field: usize,
    pub strict: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct VersionConfig {
    pub strategy: Strategy,
    pub header: PathBuf,
    pub field: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    pub line_filter: String,
    pub field_extractor: String,
    pub field_extractor_windows: String,
}

impl Default for RevisionConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Pipeline,
            vcs_command: "svn".to_string(),
            marker: "Revision".to_string(),
            field: 1, // awk's $2
            strict: false,
        }
    }
}

impl Default for VersionConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Pipeline,
            header: PathBuf::from("ImageVis3D/StdDefines.h"),
            field: 2, // "#define NAME VALUE"
        }
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            line_filter: "grep".to_string(),
            field_extractor: "awk".to_string(),
            // awk is not shipped with the usual Windows toolchains
            field_extractor_windows: "gawk".to_string(),
        }
    }
}

impl ToolConfig {
    /// Field-extraction executable to use on the given platform
    pub fn field_extractor_for(&self, platform: Platform) -> &str {
        match platform {
            Platform::Windows => &self.field_extractor_windows,
            Platform::Unix => &self.field_extractor,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(BuildStampError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| BuildStampError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| BuildStampError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["buildstamp.toml", ".buildstamp.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(strategy) = cli_args.revision_strategy {
            self.revision.strategy = strategy;
        }

        if let Some(strict) = cli_args.strict {
            self.revision.strict = strict;
        }

        if let Some(strategy) = cli_args.version_strategy {
            self.version.strategy = strategy;
        }

        if let Some(ref header) = cli_args.header {
            self.version.header = header.clone();
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| BuildStampError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| BuildStampError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let required = [
            ("revision.vcs_command", self.revision.vcs_command.as_str()),
            ("revision.marker", self.revision.marker.as_str()),
            ("tools.line_filter", self.tools.line_filter.as_str()),
            ("tools.field_extractor", self.tools.field_extractor.as_str()),
            (
                "tools.field_extractor_windows",
                self.tools.field_extractor_windows.as_str(),
            ),
        ];

        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(BuildStampError::Config {
                    message: format!("{} must not be empty", key),
                });
            }
        }

        if self.version.header.as_os_str().is_empty() {
            return Err(BuildStampError::Config {
                message: "version.header must not be empty".to_string(),
            });
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub revision_strategy: Option<Strategy>,
    pub strict: Option<bool>,
    pub version_strategy: Option<Strategy>,
    pub header: Option<PathBuf>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_revision_strategy(mut self, strategy: Option<Strategy>) -> Self {
        self.revision_strategy = strategy;
        self
    }

    pub fn with_strict(mut self, strict: Option<bool>) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_version_strategy(mut self, strategy: Option<Strategy>) -> Self {
        self.version_strategy = strategy;
        self
    }

    pub fn with_header(mut self, header: Option<PathBuf>) -> Self {
        self.header = header;
        self
    }
}
