use std::fmt;

/// Host platform family, as far as tool selection is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    pub fn current() -> Self {
        Self::from_family(std::env::consts::FAMILY)
    }

    /// Anything that is not "windows" gets the Unix toolset
    pub fn from_family(family: &str) -> Self {
        match family {
            "windows" => Platform::Windows,
            _ => Platform::Unix,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Windows => write!(f, "windows"),
            Platform::Unix => write!(f, "unix"),
        }
    }
}
