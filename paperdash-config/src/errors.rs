//! Loader errors

use std::fmt;
use std::path::PathBuf;

use paperdash_core::ConfigError;

/// One problem found while turning a document into a configuration
#[derive(Debug, Clone, PartialEq, thiserror_no_std::Error)]
pub enum ConfigIssue {
    #[error("unknown sensor \"{0}\"")]
    UnknownSensor(String),

    #[error("unknown season \"{0}\"")]
    UnknownSeason(String),

    #[error("{first} and {second} both given")]
    ConflictingFields {
        first: &'static str,
        second: &'static str,
    },

    #[error("{0}")]
    Invalid(#[from] ConfigError),
}

/// Every problem found in one document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigIssues(pub Vec<ConfigIssue>);

impl ConfigIssues {
    pub fn push(&mut self, issue: impl Into<ConfigIssue>) {
        self.0.push(issue.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigIssue> {
        self.0.iter()
    }

    pub fn contains(&self, issue: &ConfigIssue) -> bool {
        self.0.contains(issue)
    }
}

impl fmt::Display for ConfigIssues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

/// Errors from loading or writing a configuration document
#[derive(Debug, thiserror_no_std::Error)]
pub enum LoadError {
    #[error("Failed to read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(ConfigIssues),
}

impl LoadError {
    /// Validation issues, empty for I/O and parse failures
    pub fn issues(&self) -> &[ConfigIssue] {
        match self {
            LoadError::Invalid(issues) => &issues.0,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paperdash_core::SensorIndex;

    #[test]
    fn issues_join_with_semicolons() {
        let mut issues = ConfigIssues::default();
        issues.push(ConfigIssue::UnknownSensor("pico_tmp".into()));
        issues.push(ConfigError::MissingDefaultRange {
            sensor: SensorIndex::OutdoorTemp,
        });

        let text = LoadError::Invalid(issues).to_string();
        assert!(text.starts_with("Invalid configuration: unknown sensor \"pico_tmp\"; "));
        assert!(text.contains("outdoor_temp"));
    }

    #[test]
    fn non_validation_errors_have_no_issues() {
        let err = LoadError::Io {
            path: PathBuf::from("/nonexistent.json"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.issues().is_empty());
        assert!(err.to_string().contains("/nonexistent.json"));
    }
}
