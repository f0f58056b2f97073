//! Reader for TOML rule files.
//!
//! ```toml
//! [default]
//! comparison_mode = "SameNodeName"
//!
//! [[rule]]
//! id = "keyed"
//! applies_on = ["item"]
//! identification = ["id"]
//! excluded = ["updated"]
//! descriptions = { attributes = ["label"], trim = "Trim" }
//! ```

use serde::Deserialize;

use crate::rules::builder::{Extends, RewriteTarget, RuleDraft, RuleSetBuilder};
use crate::rules::{ComparisonMode, ConfigErrorSink, RuleSet, RulesError, TrimMode};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RulesFile {
    #[serde(default)]
    default: RuleTable,
    #[serde(default, rename = "rule")]
    rules: Vec<RuleTable>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleTable {
    id: Option<String>,
    #[serde(default)]
    applies_on: Vec<String>,
    extends: Option<String>,
    #[serde(default)]
    extends_default: bool,
    comparison_mode: Option<String>,
    order_significant: Option<bool>,
    compare_text: Option<bool>,
    #[serde(default)]
    identification: Vec<String>,
    #[serde(default)]
    excluded: Vec<String>,
    descriptions: Option<NormalizationTable>,
    text: Option<NormalizationTable>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct NormalizationTable {
    #[serde(default)]
    attributes: Vec<String>,
    trim: Option<String>,
    remove_newlines: Option<bool>,
    #[serde(default)]
    regex: Vec<RegexTable>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegexTable {
    from: String,
    #[serde(default)]
    to: String,
}

/// Parse a TOML rules document held in memory.
pub fn parse_rules_toml(
    input: &str,
    sink: &mut dyn ConfigErrorSink,
) -> Result<RuleSet, RulesError> {
    parse(input, "<memory>", sink)
}

pub(crate) fn parse(
    input: &str,
    origin: &str,
    sink: &mut dyn ConfigErrorSink,
) -> Result<RuleSet, RulesError> {
    let file: RulesFile = toml::from_str(input).map_err(|source| RulesError::Toml {
        origin: origin.to_string(),
        source,
    })?;

    let default_mode = file
        .default
        .comparison_mode
        .as_deref()
        .and_then(ComparisonMode::from_token)
        .unwrap_or(ComparisonMode::StrictAny);

    let mut builder = RuleSetBuilder::new();
    *builder.default_rule() = file.default.into_draft(default_mode, sink);
    for table in file.rules {
        builder.push(table.into_draft(default_mode, sink));
    }
    Ok(builder.build(sink))
}

impl RuleTable {
    fn into_draft(self, default_mode: ComparisonMode, sink: &mut dyn ConfigErrorSink) -> RuleDraft {
        let extends = match (self.extends, self.extends_default) {
            (Some(parent), _) => Some(Extends::Rule(parent)),
            (None, true) => Some(Extends::Default),
            (None, false) => None,
        };

        let mut draft = RuleDraft {
            id: self.id,
            node_names: self.applies_on,
            extends,
            mode: self
                .comparison_mode
                .map(|token| ComparisonMode::from_token(&token).unwrap_or(default_mode)),
            order_significant: self.order_significant,
            compare_text: self.compare_text,
            identity_attributes: self.identification,
            excluded_attributes: self.excluded,
            ..RuleDraft::default()
        };

        if let Some(descriptions) = self.descriptions {
            draft.description_trim = descriptions.trim.as_deref().map(TrimMode::from_token);
            draft.description_collapse = descriptions.remove_newlines;
            draft.description_attributes = descriptions.attributes;
            for regex in descriptions.regex {
                draft.add_rewrite(RewriteTarget::Description, &regex.from, &regex.to, sink);
            }
        }
        if let Some(text) = self.text {
            draft.text_trim = text.trim.as_deref().map(TrimMode::from_token);
            draft.text_collapse = text.remove_newlines;
            for regex in text.regex {
                draft.add_rewrite(RewriteTarget::Text, &regex.from, &regex.to, sink);
            }
        }
        draft
    }
}
