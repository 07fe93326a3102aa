use crate::config::{RevisionConfig, Strategy, ToolConfig};
use crate::error::{BuildStampError, Result};
use crate::fields;
use crate::pipeline::{Pipeline, Stage};
use crate::platform::Platform;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    /// Extracted field(s), trailing whitespace removed
    pub value: String,
    /// Exit code of the last stage in the chain
    pub exit_code: i32,
}

/// Asks the version-control system for a working copy's revision number.
///
/// Equivalent to `svn info <path> | grep Revision | awk '{print $2}'`.
/// A path that is not a working copy yields an empty value, not an error,
/// unless `strict` is set.
pub struct RevisionExtractor {
    config: RevisionConfig,
    tools: ToolConfig,
    platform: Platform,
}

impl RevisionExtractor {
    pub fn new(config: RevisionConfig, tools: ToolConfig) -> Self {
        Self {
            config,
            tools,
            platform: Platform::current(),
        }
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn strategy(&self) -> Strategy {
        self.config.strategy
    }

    pub fn query_stage(&self, path: &Path) -> Stage {
        Stage::new(self.config.vcs_command.as_str())
            .arg("info")
            .arg(path)
    }

    /// The stages run for `path`, whichever strategy is configured
    pub fn pipeline(&self, path: &Path) -> Pipeline {
        match self.config.strategy {
            Strategy::Pipeline => Pipeline::new()
                .stage(self.query_stage(path))
                .stage(Stage::new(self.tools.line_filter.as_str()).arg(&self.config.marker))
                .stage(
                    Stage::new(self.tools.field_extractor_for(self.platform))
                        .arg(fields::awk_print_program(self.config.field)),
                ),
            Strategy::Native => Pipeline::new().stage(self.query_stage(path)),
        }
    }

    pub fn extract(&self, path: &Path) -> Result<Revision> {
        let output = self.pipeline(path).run()?;

        let (raw, exit_code) = match self.config.strategy {
            Strategy::Pipeline => (output.stdout_lossy(), output.exit_code()),
            // the in-process filter is the last stage and never fails
            Strategy::Native => (
                fields::select_field(&output.stdout_lossy(), &self.config.marker, self.config.field),
                0,
            ),
        };

        let value = raw.trim_end().to_string();
        if value.is_empty() && self.config.strict {
            return Err(BuildStampError::RevisionNotFound {
                path: path.display().to_string(),
            });
        }

        Ok(Revision { value, exit_code })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(unix)]
    use std::fs;
    #[cfg(unix)]
    use tempfile::TempDir;

    fn programs(pipeline: &Pipeline) -> Vec<String> {
        pipeline
            .stages()
            .iter()
            .map(|s| s.program.clone())
            .collect()
    }

    #[test]
    fn test_pipeline_stages_unix() {
        let extractor = RevisionExtractor::new(RevisionConfig::default(), ToolConfig::default())
            .with_platform(Platform::Unix);

        let pipeline = extractor.pipeline(Path::new("trunk"));
        assert_eq!(programs(&pipeline), vec!["svn", "grep", "awk"]);
        assert_eq!(pipeline.stages()[0].command_line(), "svn info trunk");
        assert_eq!(pipeline.stages()[1].command_line(), "grep Revision");
        assert_eq!(pipeline.stages()[2].command_line(), "awk '{print $2}'");
    }

    #[test]
    fn test_pipeline_stages_windows() {
        let extractor = RevisionExtractor::new(RevisionConfig::default(), ToolConfig::default())
            .with_platform(Platform::Windows);

        let pipeline = extractor.pipeline(Path::new("."));
        assert_eq!(programs(&pipeline), vec!["svn", "grep", "gawk"]);
        assert_eq!(pipeline.stages()[2].command_line(), "gawk '{print $2}'");
    }

    #[test]
    fn test_native_runs_query_only() {
        let config = RevisionConfig {
            strategy: Strategy::Native,
            ..RevisionConfig::default()
        };
        let extractor = RevisionExtractor::new(config, ToolConfig::default());

        assert_eq!(programs(&extractor.pipeline(Path::new("."))), vec!["svn"]);
    }

    #[test]
    fn test_missing_vcs_is_loud() {
        let config = RevisionConfig {
            vcs_command: "buildstamp-no-such-vcs-4a1f".to_string(),
            ..RevisionConfig::default()
        };
        let extractor = RevisionExtractor::new(config, ToolConfig::default());

        let result = extractor.extract(Path::new("."));
        assert!(matches!(result, Err(BuildStampError::ToolNotFound { .. })));
    }

    // `cat info <file>` fails on "info" and then prints the file, which makes
    // it a stand-in for `svn info` that replays a fixture.
    #[cfg(unix)]
    fn fake_info(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[cfg(unix)]
    fn cat_config(strategy: Strategy) -> RevisionConfig {
        RevisionConfig {
            strategy,
            vcs_command: "cat".to_string(),
            ..RevisionConfig::default()
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_extract_revision_both_strategies() {
        let dir = TempDir::new().unwrap();
        let info = fake_info(
            &dir,
            "wc.txt",
            "Path: .\nURL: svn://host/trunk\nRevision: 2871\nLast Changed Rev: 2860\n",
        );

        for strategy in [Strategy::Pipeline, Strategy::Native] {
            let extractor = RevisionExtractor::new(cat_config(strategy), ToolConfig::default());
            let revision = extractor.extract(&info).unwrap();
            assert_eq!(revision.value, "2871", "strategy {:?}", strategy);
            assert_eq!(revision.exit_code, 0);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_not_a_working_copy_is_silent() {
        let dir = TempDir::new().unwrap();
        let info = fake_info(&dir, "plain.txt", "svn: E155007: not a working copy\n");

        for strategy in [Strategy::Pipeline, Strategy::Native] {
            let extractor = RevisionExtractor::new(cat_config(strategy), ToolConfig::default());
            let revision = extractor.extract(&info).unwrap();
            assert_eq!(revision.value, "");
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_strict_reports_missing_revision() {
        let dir = TempDir::new().unwrap();
        let info = fake_info(&dir, "plain.txt", "nothing here\n");

        let config = RevisionConfig {
            strict: true,
            ..cat_config(Strategy::Native)
        };
        let extractor = RevisionExtractor::new(config, ToolConfig::default());

        let result = extractor.extract(&info);
        assert!(matches!(result, Err(BuildStampError::RevisionNotFound { .. })));
    }
}
