use std::collections::BTreeSet;

use tracing::debug;

use crate::rules::{
    ComparisonMode, ConfigError, ConfigErrorSink, Normalization, RegexRewrite, Rule, RuleSet,
    TrimMode,
};

/// Parent a rule inherits unset properties from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extends {
    Default,
    Rule(String),
}

/// Which normalization pipeline a rewrite belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteTarget {
    Description,
    Text,
}

/// A rule as written in configuration, before inheritance is applied.
///
/// `None` and empty lists mean "not set here"; only those are filled from
/// the extended rule.
#[derive(Debug, Clone, Default)]
pub struct RuleDraft {
    pub id: Option<String>,
    pub node_names: Vec<String>,
    pub extends: Option<Extends>,
    pub mode: Option<ComparisonMode>,
    pub order_significant: Option<bool>,
    pub compare_text: Option<bool>,
    pub identity_attributes: Vec<String>,
    pub excluded_attributes: Vec<String>,
    pub description_attributes: Vec<String>,
    pub description_trim: Option<TrimMode>,
    pub description_collapse: Option<bool>,
    pub description_rewrites: Vec<RegexRewrite>,
    pub text_trim: Option<TrimMode>,
    pub text_collapse: Option<bool>,
    pub text_rewrites: Vec<RegexRewrite>,
}

impl RuleDraft {
    /// Name used in diagnostics.
    pub fn label(&self) -> String {
        self.id
            .clone()
            .or_else(|| self.node_names.first().cloned())
            .unwrap_or_else(|| "<anonymous>".to_string())
    }

    /// Compile and append a rewrite. An invalid pattern is reported to
    /// `sink` and dropped.
    pub fn add_rewrite(
        &mut self,
        target: RewriteTarget,
        pattern: &str,
        replacement: &str,
        sink: &mut dyn ConfigErrorSink,
    ) {
        match RegexRewrite::new(pattern, replacement) {
            Ok(rewrite) => match target {
                RewriteTarget::Description => self.description_rewrites.push(rewrite),
                RewriteTarget::Text => self.text_rewrites.push(rewrite),
            },
            Err(source) => sink.report(ConfigError::InvalidRegex {
                rule: self.label(),
                pattern: pattern.to_string(),
                source,
            }),
        }
    }

    /// Produce the effective rule. Values set on the draft always win; the
    /// rest come from `parent`, or from [`Rule::default`] without one.
    pub fn resolve(self, parent: Option<&Rule>) -> Rule {
        let base = parent.cloned().unwrap_or_default();
        let keyed = !self.identity_attributes.is_empty() || !self.description_attributes.is_empty();
        let inherited_mode = if keyed {
            ComparisonMode::OnIdentityAttributes
        } else {
            base.mode
        };

        Rule {
            id: self.id,
            mode: self.mode.unwrap_or(inherited_mode),
            order_significant: self.order_significant.unwrap_or(base.order_significant),
            compare_text: self.compare_text.unwrap_or(base.compare_text),
            identity_attributes: pick_set(self.identity_attributes, base.identity_attributes),
            excluded_attributes: pick_set(self.excluded_attributes, base.excluded_attributes),
            description_attributes: pick_set(
                self.description_attributes,
                base.description_attributes,
            ),
            description: Normalization {
                trim: self.description_trim.unwrap_or(base.description.trim),
                collapse_whitespace: self
                    .description_collapse
                    .unwrap_or(base.description.collapse_whitespace),
                rewrites: pick_list(self.description_rewrites, base.description.rewrites),
            },
            text: Normalization {
                trim: self.text_trim.unwrap_or(base.text.trim),
                collapse_whitespace: self.text_collapse.unwrap_or(base.text.collapse_whitespace),
                rewrites: pick_list(self.text_rewrites, base.text.rewrites),
            },
        }
    }
}

fn pick_set(own: Vec<String>, inherited: BTreeSet<String>) -> BTreeSet<String> {
    if own.is_empty() {
        inherited
    } else {
        own.into_iter().collect()
    }
}

fn pick_list<T>(own: Vec<T>, inherited: Vec<T>) -> Vec<T> {
    if own.is_empty() {
        inherited
    } else {
        own
    }
}

/// Collects drafts in declaration order and resolves inheritance.
///
/// A rule can only extend rules declared before it; an unknown parent is
/// skipped and the rule keeps its own values.
#[derive(Debug, Clone, Default)]
pub struct RuleSetBuilder {
    default: RuleDraft,
    rules: Vec<RuleDraft>,
}

impl RuleSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_rule(&mut self) -> &mut RuleDraft {
        &mut self.default
    }

    pub fn push(&mut self, draft: RuleDraft) {
        self.rules.push(draft);
    }

    pub fn build(self, sink: &mut dyn ConfigErrorSink) -> RuleSet {
        let mut set = RuleSet::new(self.default.resolve(None));

        for draft in self.rules {
            if draft.id.is_none() && draft.node_names.is_empty() {
                sink.report(ConfigError::UnreachableRule {
                    rule: draft.label(),
                });
                continue;
            }

            let parent = match &draft.extends {
                None => None,
                Some(Extends::Default) => Some(set.default_rule().clone()),
                Some(Extends::Rule(id)) => {
                    let found = set.rule_by_id(id).cloned();
                    if found.is_none() {
                        debug!(rule = %draft.label(), extends = %id, "extended rule not found");
                    }
                    found
                }
            };

            let names = draft.node_names.clone();
            let rule = draft.resolve(parent.as_ref());
            set.insert(rule, names);
        }

        debug!(rules = set.len(), "rule set built");
        set
    }
}
