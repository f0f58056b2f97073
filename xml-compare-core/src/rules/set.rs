use std::collections::BTreeMap;

use crate::rules::Rule;

/// Registry of comparison rules: a default rule plus rules bound to
/// element names and, optionally, to ids.
///
/// Several names may share one rule.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    default_rule: Rule,
    rules: Vec<Rule>,
    by_name: BTreeMap<String, usize>,
    by_id: BTreeMap<String, usize>,
}

impl RuleSet {
    /// Create a rule set with `default_rule` and no named rules.
    pub fn new(default_rule: Rule) -> Self {
        Self {
            default_rule,
            ..Self::default()
        }
    }

    pub fn default_rule(&self) -> &Rule {
        &self.default_rule
    }

    pub fn default_rule_mut(&mut self) -> &mut Rule {
        &mut self.default_rule
    }

    /// Register `rule` for each of `names` and under its id, if any.
    ///
    /// A later registration for the same name or id replaces the earlier
    /// binding.
    pub fn insert<I, S>(&mut self, rule: Rule, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let index = self.rules.len();
        if let Some(id) = &rule.id {
            self.by_id.insert(id.clone(), index);
        }
        for name in names {
            self.by_name.insert(name.into(), index);
        }
        self.rules.push(rule);
    }

    /// Effective rule for an element name: its own rule or the default.
    pub fn resolve(&self, name: &str) -> &Rule {
        self.rule_for(name).unwrap_or(&self.default_rule)
    }

    /// Rule explicitly bound to `name`.
    pub fn rule_for(&self, name: &str) -> Option<&Rule> {
        self.by_name.get(name).map(|&index| &self.rules[index])
    }

    pub fn rule_by_id(&self, id: &str) -> Option<&Rule> {
        self.by_id.get(id).map(|&index| &self.rules[index])
    }

    /// Name bindings in name order.
    pub fn named_rules(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.by_name
            .iter()
            .map(|(name, &index)| (name.as_str(), &self.rules[index]))
    }

    /// Rules with an id but no name binding; these only serve as bases for
    /// other rules.
    pub fn unbound_rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules
            .iter()
            .enumerate()
            .filter(|(index, _)| !self.by_name.values().any(|bound| bound == index))
            .map(|(_, rule)| rule)
    }

    /// Number of distinct rules, the default excluded.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
