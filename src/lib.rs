pub mod cli;
pub mod config;
pub mod error;
pub mod fields;
pub mod pipeline;
pub mod platform;
pub mod revision;
pub mod ui;
pub mod version;

// Public API re-exports
pub use cli::{CommonArgs, OutputFormat, RevisionCli, VersionCli};
pub use config::{CliOverrides, Config, RevisionConfig, Strategy, ToolConfig, VersionConfig};
pub use error::{BuildStampError, Result, UserFriendlyError};

// Core functionality re-exports
pub use pipeline::{Pipeline, PipelineOutput, Stage};
pub use platform::Platform;
pub use revision::{Revision, RevisionExtractor};
pub use ui::{OutputFormatter, OutputMode};
pub use version::VersionFieldExtractor;

use std::path::Path;

/// Shared front end for the `revision` and `version` tools
pub struct BuildStamp {
    config: Config,
    output_formatter: OutputFormatter,
}

impl BuildStamp {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        Self {
            config,
            output_formatter: OutputFormatter::new(output_mode, verbose, quiet),
        }
    }

    fn from_common(common: &CommonArgs, config: Config) -> Self {
        Self::new(config, common.output_mode(), common.verbose, common.quiet)
    }

    pub fn from_revision_cli(cli: &RevisionCli) -> Result<Self> {
        Ok(Self::from_common(&cli.common, cli.load_config()?))
    }

    pub fn from_version_cli(cli: &VersionCli) -> Result<Self> {
        Ok(Self::from_common(&cli.common, cli.load_config()?))
    }

    /// Look up the revision of the working copy at `path`
    pub fn extract_revision(&self, path: &Path) -> Result<Revision> {
        let extractor =
            RevisionExtractor::new(self.config.revision.clone(), self.config.tools.clone());

        self.output_formatter.debug(&format!(
            "Platform {}, field extractor {}",
            extractor.platform(),
            self.config.tools.field_extractor_for(extractor.platform())
        ));
        self.log_stages(&extractor.pipeline(path));

        let revision = extractor.extract(path)?;

        if revision.value.is_empty() {
            self.output_formatter
                .warning(&format!("No revision reported for {}", path.display()));
        } else {
            self.output_formatter
                .info(&format!("Revision of {}: {}", path.display(), revision.value));
        }
        self.output_formatter
            .info(&format!("Pipeline finished with exit code {}", revision.exit_code));

        Ok(revision)
    }

    /// Look up the value of `name` in the configured header
    pub fn extract_version(&self, name: &str) -> Result<String> {
        let extractor =
            VersionFieldExtractor::new(self.config.version.clone(), self.config.tools.clone());

        match extractor.strategy() {
            Strategy::Pipeline => {
                self.log_stages(&Pipeline::new().stage(extractor.search_stage(name)))
            }
            Strategy::Native => self
                .output_formatter
                .debug(&format!("Reading {}", extractor.header().display())),
        }

        let value = extractor.extract(name)?;
        self.output_formatter.info(&format!("{} = {}", name, value));

        Ok(value)
    }

    fn log_stages(&self, pipeline: &Pipeline) {
        for (i, stage) in pipeline.stages().iter().enumerate() {
            self.output_formatter
                .debug(&format!("Stage {}: {}", i + 1, stage.command_line()));
        }
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config).map_err(BuildStampError::Io)?;
        Ok(())
    }

    /// Write the sample config named by `--config` (or the default name); returns the exit code
    pub fn handle_generate_config(common: &CommonArgs) -> i32 {
        let config_path = common.config_output_path();

        match Self::generate_sample_config(&config_path) {
            Ok(()) => {
                eprintln!(
                    "Generated sample configuration file: {}",
                    config_path.display()
                );
                0
            }
            Err(e) => {
                eprintln!("Failed to generate configuration file: {}", e.user_message());
                if let Some(suggestion) = e.suggestion() {
                    eprintln!("Suggestion: {}", suggestion);
                }
                e.exit_code()
            }
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Report an error on stderr and return its exit code
    pub fn handle_error(&self, error: &BuildStampError) -> i32 {
        self.output_formatter.print_user_friendly_error(error);
        error.exit_code()
    }
}

/// Report an error raised before a `BuildStamp` exists
pub fn print_startup_error(error: &BuildStampError) -> i32 {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
    error.exit_code()
}

/// Get version information
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_buildstamp_creation() {
        let stamp = BuildStamp::new(Config::default(), OutputMode::Plain, 0, true);
        assert_eq!(stamp.config().revision.vcs_command, "svn");
        assert_eq!(stamp.output_formatter().mode(), OutputMode::Plain);
    }

    #[test]
    fn test_sample_config_generation() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("sample.toml");

        BuildStamp::generate_sample_config(&config_path).unwrap();

        let loaded = Config::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.version.field, 2);
        assert_eq!(loaded.tools.field_extractor_windows, "gawk");
    }

    #[test]
    fn test_handle_generate_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("buildstamp.toml");
        let arg = config_path.to_string_lossy().to_string();

        let cli =
            VersionCli::try_parse_from(["version", "--generate-config", "--config", arg.as_str()])
                .unwrap();
        assert_eq!(BuildStamp::handle_generate_config(&cli.common), 0);
        assert!(config_path.exists());
    }

    #[test]
    fn test_extract_version_native() {
        let temp_dir = TempDir::new().unwrap();
        let header = temp_dir.path().join("StdDefines.h");
        std::fs::write(&header, "#define IV3D_MAJOR 2 // major version\n").unwrap();

        let mut config = Config::default();
        config.version.strategy = Strategy::Native;
        config.version.header = header;

        let stamp = BuildStamp::new(config, OutputMode::Plain, 0, true);
        assert_eq!(stamp.extract_version("IV3D_MAJOR").unwrap(), "2");

        let err = stamp.extract_version("IV3D_MINOR").unwrap_err();
        assert_eq!(stamp.handle_error(&err), 4);
    }

    #[test]
    fn test_version_info() {
        use clap::CommandFactory;

        assert!(!version_info().is_empty());
        assert_eq!(RevisionCli::command().get_version(), Some(version_info()));
        assert_eq!(VersionCli::command().get_version(), Some(version_info()));
    }
}
