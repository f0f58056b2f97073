//! Comparison rules and the file formats they are loaded from.

mod builder;
mod error;
mod load;
mod rule;
mod set;
mod toml_format;
mod xml_format;

pub use builder::{Extends, RewriteTarget, RuleDraft, RuleSetBuilder};
pub use error::{ConfigError, ConfigErrorSink, RulesError, TracingSink};
pub use load::load_rules;
pub use rule::{ComparisonMode, Normalization, RegexRewrite, Rule, TrimMode};
pub use set::RuleSet;
pub use toml_format::parse_rules_toml;
pub use xml_format::parse_rules_xml;
