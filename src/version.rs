use crate::config::{Strategy, ToolConfig, VersionConfig};
use crate::error::{BuildStampError, Result};
use crate::fields;
use crate::pipeline::{Pipeline, Stage};
use std::io::ErrorKind;
use std::path::Path;

/// Reads a `#define` value out of the project header.
///
/// The first line mentioning the macro wins; its third whitespace-separated
/// token is the value. Unlike the revision lookup, every miss is an error.
pub struct VersionFieldExtractor {
    config: VersionConfig,
    tools: ToolConfig,
}

impl VersionFieldExtractor {
    pub fn new(config: VersionConfig, tools: ToolConfig) -> Self {
        Self { config, tools }
    }

    pub fn header(&self) -> &Path {
        &self.config.header
    }

    pub fn strategy(&self) -> Strategy {
        self.config.strategy
    }

    /// `grep -F -e NAME -- HEADER`: fixed-string search; neither the name nor
    /// the header path can be mistaken for an option
    pub fn search_stage(&self, name: &str) -> Stage {
        Stage::new(self.tools.line_filter.as_str())
            .arg("-F")
            .arg("-e")
            .arg(name)
            .arg("--")
            .arg(&self.config.header)
    }

    pub fn extract(&self, name: &str) -> Result<String> {
        let line = match self.config.strategy {
            Strategy::Pipeline => self.search_with_tool(name)?,
            Strategy::Native => self.search_in_process(name)?,
        };

        let value = fields::nth_field(&line, self.config.field).map(str::to_string);
        value.ok_or(BuildStampError::FieldMissing {
            index: self.config.field,
            line,
        })
    }

    fn search_with_tool(&self, name: &str) -> Result<String> {
        let stage = self.search_stage(name);
        let output = Pipeline::new().stage(stage.clone()).run()?;

        // grep: 0 = match, 1 = no match, 2+ = trouble
        match output.exit_code() {
            0 => Ok(output
                .stdout_lossy()
                .lines()
                .next()
                .unwrap_or_default()
                .to_string()),
            1 => Err(self.macro_not_found(name)),
            _ if !self.config.header.is_file() => Err(self.header_not_found()),
            code => Err(BuildStampError::ToolFailed {
                program: stage.program,
                code,
            }),
        }
    }

    fn search_in_process(&self, name: &str) -> Result<String> {
        let bytes = std::fs::read(&self.config.header).map_err(|e| match e.kind() {
            ErrorKind::NotFound => self.header_not_found(),
            _ => BuildStampError::Io(e),
        })?;
        let text = String::from_utf8_lossy(&bytes);

        let line = fields::matching_lines(&text, name)
            .next()
            .map(str::to_string);
        line.ok_or_else(|| self.macro_not_found(name))
    }

    fn header_not_found(&self) -> BuildStampError {
        BuildStampError::HeaderNotFound {
            path: self.config.header.display().to_string(),
        }
    }

    fn macro_not_found(&self, name: &str) -> BuildStampError {
        BuildStampError::MacroNotFound {
            name: name.to_string(),
            header: self.config.header.display().to_string(),
        }
    }
}
