//! Rule-driven equality between two elements.
//!
//! Only the element itself is looked at: name, attributes and text.
//! Children are aligned separately.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::rules::{ComparisonMode, Rule};
use crate::tree::XmlNode;

/// Outcome of comparing two elements under a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ContentStatus {
    /// Same logical node with no relevant difference.
    Identical,
    /// Not the same logical node.
    Different,
    /// Same logical node with changed content.
    Updated,
}

/// Compare `a` and `b` under `rule`.
///
/// `rule` is the effective rule of `a`; the caller resolves it.
pub fn status(rule: &Rule, a: &XmlNode, b: &XmlNode) -> ContentStatus {
    if a.tag != b.tag {
        return ContentStatus::Different;
    }

    let left = comparable_attributes(rule, a);
    let right = comparable_attributes(rule, b);

    match rule.mode {
        ComparisonMode::OnIdentityAttributes => {
            for name in &rule.identity_attributes {
                let same = match (left.get(name.as_str()), right.get(name.as_str())) {
                    (None, None) => true,
                    (Some(x), Some(y)) => values_match(rule, name, x, y),
                    _ => false,
                };
                if !same {
                    return ContentStatus::Different;
                }
            }
            let content_same = attributes_match(rule, &left, &right, |name| {
                rule.is_identity_attribute(name)
            }) && text_or_ignored(rule, a, b);
            if content_same {
                ContentStatus::Identical
            } else {
                ContentStatus::Updated
            }
        }
        ComparisonMode::SameNameSame => {
            if attributes_match(rule, &left, &right, |_| false) && text_or_ignored(rule, a, b) {
                ContentStatus::Identical
            } else {
                ContentStatus::Updated
            }
        }
        ComparisonMode::StrictAny => {
            if !attributes_match(rule, &left, &right, |_| false) {
                ContentStatus::Different
            } else if !text_or_ignored(rule, a, b) {
                ContentStatus::Updated
            } else {
                ContentStatus::Identical
            }
        }
    }
}

/// Whole-element equality used for the document roots, independent of the
/// comparison mode. Trimmed text always counts; `compare_text` only adds the
/// normalized comparison on top.
pub fn structurally_equal(rule: &Rule, a: &XmlNode, b: &XmlNode) -> bool {
    if a.tag != b.tag {
        return false;
    }
    if trimmed_text(a) != trimmed_text(b) {
        return false;
    }
    let left = comparable_attributes(rule, a);
    let right = comparable_attributes(rule, b);
    attributes_match(rule, &left, &right, |_| false) && text_or_ignored(rule, a, b)
}

/// Whitespace-only text counts as absent.
fn trimmed_text(node: &XmlNode) -> Option<&str> {
    node.text
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

fn comparable_attributes<'n>(rule: &Rule, node: &'n XmlNode) -> BTreeMap<&'n str, &'n str> {
    node.attributes
        .iter()
        .filter(|(name, _)| !rule.is_excluded_attribute(name))
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect()
}

/// Same attribute names (outside `skip`) with matching values.
fn attributes_match(
    rule: &Rule,
    left: &BTreeMap<&str, &str>,
    right: &BTreeMap<&str, &str>,
    skip: impl Fn(&str) -> bool,
) -> bool {
    let keys_left = left.keys().filter(|name| !skip(**name));
    let keys_right = right.keys().filter(|name| !skip(**name));
    if !keys_left.eq(keys_right) {
        return false;
    }
    left.iter()
        .filter(|(name, _)| !skip(**name))
        .all(|(name, value)| {
            right
                .get(name)
                .is_some_and(|other| values_match(rule, name, value, other))
        })
}

fn values_match(rule: &Rule, name: &str, a: &str, b: &str) -> bool {
    if rule.is_description_attribute(name) {
        rule.description.matches(a, b)
    } else {
        a == b
    }
}

fn text_or_ignored(rule: &Rule, a: &XmlNode, b: &XmlNode) -> bool {
    !rule.compare_text || text_matches(rule, a.text.as_deref(), b.text.as_deref())
}

fn text_matches(rule: &Rule, a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(x), Some(y)) => rule.text.matches(x, y),
        _ => false,
    }
}
