//! Error enum
use std::fmt;
use std::path::PathBuf;

use crate::validation::Violation;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Serde(serde_json::Error),
    Csv(csv::Error),
    Glob(glob::GlobError),
    GlobPattern(glob::PatternError),
    Url(url::ParseError),
    LanguageTag(oxilangtag::LanguageTagParseError),
    UnknownLang(String),
    UnknownDataset(String),
    InvalidConfig(String),
    /// A raw record that could not be turned into a candidate.
    Malformed {
        source: PathBuf,
        line: Option<usize>,
        reason: String,
    },
    /// A candidate that failed its contract while running in strict mode.
    Validation {
        key: String,
        violations: Vec<Violation>,
    },
    RejectRatio {
        split: String,
        rejected: usize,
        seen: usize,
    },
    Custom(String),
}

impl Error {
    pub fn malformed(source: impl Into<PathBuf>, line: Option<usize>, reason: impl Into<String>) -> Self {
        Error::Malformed {
            source: source.into(),
            line,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {}", e),
            Error::Serde(e) => write!(f, "json error: {}", e),
            Error::Csv(e) => write!(f, "table error: {}", e),
            Error::Glob(e) => write!(f, "glob error: {}", e),
            Error::GlobPattern(e) => write!(f, "glob pattern error: {}", e),
            Error::Url(e) => write!(f, "invalid url: {}", e),
            Error::LanguageTag(e) => write!(f, "invalid language tag: {}", e),
            Error::UnknownLang(l) => write!(f, "unknown language: {}", l),
            Error::UnknownDataset(d) => write!(f, "unknown dataset or config: {}", d),
            Error::InvalidConfig(c) => write!(f, "invalid config: {}", c),
            Error::Malformed {
                source,
                line: Some(line),
                reason,
            } => write!(f, "{:?}:{}: {}", source, line, reason),
            Error::Malformed {
                source,
                line: None,
                reason,
            } => write!(f, "{:?}: {}", source, reason),
            Error::Validation { key, violations } => {
                write!(f, "record {} failed validation", key)?;
                for v in violations {
                    write!(f, "\n  {}", v)?;
                }
                Ok(())
            }
            Error::RejectRatio {
                split,
                rejected,
                seen,
            } => write!(
                f,
                "split {}: {} of {} records rejected, above allowed ratio",
                split, rejected, seen
            ),
            Error::Custom(s) => write!(f, "{}", s),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Serde(e)
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Error {
        Error::Csv(e)
    }
}

impl From<glob::GlobError> for Error {
    fn from(e: glob::GlobError) -> Error {
        Error::Glob(e)
    }
}

impl From<glob::PatternError> for Error {
    fn from(e: glob::PatternError) -> Error {
        Error::GlobPattern(e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Error {
        Error::Url(e)
    }
}

impl From<oxilangtag::LanguageTagParseError> for Error {
    fn from(e: oxilangtag::LanguageTagParseError) -> Error {
        Error::LanguageTag(e)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Error {
        Error::Custom(s)
    }
}
