use thiserror::Error;
use tracing::warn;

/// Fatal failures while loading a rules file. Nothing is loaded.
#[derive(Debug, Error)]
pub enum RulesError {
    #[error("failed to read rules file {origin}: {source}")]
    Io {
        origin: String,
        source: std::io::Error,
    },
    #[error("failed to parse rules {origin}: {source}")]
    Xml {
        origin: String,
        source: quick_xml::Error,
    },
    #[error("failed to parse rules {origin}: {source}")]
    Toml {
        origin: String,
        source: toml::de::Error,
    },
    #[error("malformed rules {origin}: {reason}")]
    Malformed { origin: String, reason: String },
}

impl RulesError {
    pub(crate) fn xml(origin: &str, source: impl Into<quick_xml::Error>) -> Self {
        Self::Xml {
            origin: origin.to_string(),
            source: source.into(),
        }
    }

    pub(crate) fn malformed(origin: &str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            origin: origin.to_string(),
            reason: reason.into(),
        }
    }
}

/// Non-fatal rule configuration problems. The offending item is dropped
/// and loading continues.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("rule {rule}: invalid regex `{pattern}`: {source}")]
    InvalidRegex {
        rule: String,
        pattern: String,
        source: regex::Error,
    },
    #[error("rule {rule}: <{element}> is missing attribute `{attribute}`")]
    MissingAttribute {
        rule: String,
        element: String,
        attribute: String,
    },
    #[error("rule {rule} has neither an id nor node names and is never used")]
    UnreachableRule { rule: String },
}

/// Receives non-fatal configuration errors.
pub trait ConfigErrorSink {
    fn report(&mut self, error: ConfigError);
}

impl ConfigErrorSink for Vec<ConfigError> {
    fn report(&mut self, error: ConfigError) {
        self.push(error);
    }
}

/// Sink that logs every error at `warn` level and keeps nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ConfigErrorSink for TracingSink {
    fn report(&mut self, error: ConfigError) {
        warn!(%error, "ignoring invalid rule configuration");
    }
}
