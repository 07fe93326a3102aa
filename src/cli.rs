use crate::config::{CliOverrides, Config, Strategy};
use crate::error::Result;
use crate::ui::OutputMode;
use clap::{Args, Parser, ValueEnum};
use std::path::PathBuf;

/// Flags shared by both tools
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Extraction strategy (overrides the configuration file)
    #[arg(long, value_enum)]
    pub strategy: Option<Strategy>,

    /// Output format for the extracted value
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose diagnostics on stderr (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Write a sample configuration file and exit")]
    pub generate_config: bool,
}

#[derive(Parser, Debug)]
#[command(name = "revision")]
#[command(version = crate::version_info())]
#[command(about = "Print the version-control revision of a working copy")]
#[command(
    long_about = "Runs `svn info <PATH> | grep Revision | awk '{print $2}'` and prints the \
                  revision number. A path that is not a working copy prints nothing."
)]
#[command(after_help = "EXAMPLES:\n  \
    revision .\n  \
    revision Tuvok --strict\n  \
    revision . --strategy native -vv")]
pub struct RevisionCli {
    /// Working copy path
    #[arg(required_unless_present = "generate_config")]
    pub path: Option<PathBuf>,

    /// Fail with an error instead of printing nothing when no revision is found
    #[arg(long)]
    pub strict: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Parser, Debug)]
#[command(name = "version")]
#[command(version = crate::version_info())]
#[command(about = "Print the value of a #define from the project header")]
#[command(
    long_about = "Finds the first line of ImageVis3D/StdDefines.h mentioning MACRO and prints \
                  its third whitespace-separated token."
)]
#[command(after_help = "EXAMPLES:\n  \
    version IV3D_MAJOR\n  \
    version IV3D_MINOR --header ImageVis3D/StdDefines.h")]
pub struct VersionCli {
    /// Macro name to look up
    #[arg(required_unless_present = "generate_config")]
    pub macro_name: Option<String>,

    /// Header file to search
    #[arg(long)]
    pub header: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// The bare value
    Human,
    /// JSON object with the value
    Json,
    /// The bare value, plain diagnostics
    Plain,
}

impl From<OutputFormat> for OutputMode {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        }
    }
}

impl CommonArgs {
    pub fn load_config(&self, overrides: &CliOverrides) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;
        config.merge_with_cli_args(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_format.clone().into()
    }

    pub fn config_output_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from("buildstamp.toml"))
    }
}

impl RevisionCli {
    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_revision_strategy(self.common.strategy)
            .with_strict(self.strict.then_some(true))
    }

    pub fn load_config(&self) -> Result<Config> {
        self.common.load_config(&self.create_cli_overrides())
    }
}

impl VersionCli {
    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_version_strategy(self.common.strategy)
            .with_header(self.header.clone())
    }

    pub fn load_config(&self) -> Result<Config> {
        self.common.load_config(&self.create_cli_overrides())
    }
}
