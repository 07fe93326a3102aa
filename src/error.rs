use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildStampError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Header file not found: {path}")]
    HeaderNotFound { path: String },

    #[error("Macro {name} not found in {header}")]
    MacroNotFound { name: String, header: String },

    #[error("Line has no field {index}: {line}")]
    FieldMissing { index: usize, line: String },

    #[error("No revision reported for: {path}")]
    RevisionNotFound { path: String },

    #[error("Command {program} exited with status {code}")]
    ToolFailed { program: String, code: i32 },

    #[error("Command not found: {program}")]
    ToolNotFound { program: String },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for BuildStampError {
    fn user_message(&self) -> String {
        match self {
            BuildStampError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            BuildStampError::HeaderNotFound { path } => {
                format!("Header file not found: {}", path)
            }
            BuildStampError::MacroNotFound { name, header } => {
                format!("No line in {} mentions {}", header, name)
            }
            BuildStampError::FieldMissing { index, line } => {
                format!(
                    "Matching line has fewer than {} fields: {}",
                    index + 1,
                    line.trim()
                )
            }
            BuildStampError::RevisionNotFound { path } => {
                format!("No revision reported for: {}", path)
            }
            BuildStampError::ToolFailed { program, code } => {
                format!("{} exited with status {}", program, code)
            }
            BuildStampError::ToolNotFound { program } => {
                format!("Could not run '{}': command not found", program)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            BuildStampError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all values are non-empty.".to_string()
            ),
            BuildStampError::HeaderNotFound { .. } => Some(
                "Run from the repository root, or point at the header with --header.".to_string()
            ),
            BuildStampError::MacroNotFound { .. } => Some(
                "Check the spelling of the macro name; the search is case-sensitive.".to_string()
            ),
            BuildStampError::RevisionNotFound { .. } => Some(
                "Make sure the path is a version-controlled working copy, or drop --strict.".to_string()
            ),
            BuildStampError::ToolNotFound { .. } => Some(
                "Install the missing tool or set its name in the [tools] section of the configuration.".to_string()
            ),
            _ => None,
        }
    }
}

impl BuildStampError {
    /// Process exit code reported for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            BuildStampError::Io(_) => 1,
            BuildStampError::Config { .. } => 2,
            BuildStampError::HeaderNotFound { .. } => 3,
            BuildStampError::MacroNotFound { .. } => 4,
            BuildStampError::FieldMissing { .. } => 4,
            BuildStampError::RevisionNotFound { .. } => 5,
            BuildStampError::ToolFailed { .. } => 6,
            BuildStampError::ToolNotFound { .. } => 127,
        }
    }

    /// Map a spawn failure to `ToolNotFound` when the executable is missing
    pub fn from_spawn(error: std::io::Error, program: &str) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => BuildStampError::ToolNotFound {
                program: program.to_string(),
            },
            _ => BuildStampError::Io(error),
        }
    }
}

pub type Result<T> = std::result::Result<T, BuildStampError>;
