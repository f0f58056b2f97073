use std::path::Path;

use tracing::debug;

use crate::compare::aligner::compare;
use crate::compare::graph::ComparisonGraph;
use crate::parser::{parse_file, ParseError};
use crate::rules::RuleSet;
use crate::tree::XmlNode;

/// Owns two documents and the rules they are compared with.
///
/// Every [`run`](Self::run) rebuilds the graph from scratch, so swapping the
/// rules with [`reload`](Self::reload) and running again is a full
/// recomparison.
#[derive(Debug, Clone)]
pub struct Comparator {
    left: XmlNode,
    right: XmlNode,
    rules: RuleSet,
}

impl Comparator {
    pub fn new(left: XmlNode, right: XmlNode, rules: RuleSet) -> Self {
        Self { left, right, rules }
    }

    /// Parse both documents from disk.
    pub fn from_files(left: &Path, right: &Path, rules: RuleSet) -> Result<Self, ParseError> {
        Ok(Self::new(parse_file(left)?, parse_file(right)?, rules))
    }

    pub fn run(&self) -> ComparisonGraph<'_> {
        compare(&self.left, &self.right, &self.rules)
    }

    /// Replace the rule set. Graphs from earlier runs are unaffected.
    pub fn reload(&mut self, rules: RuleSet) {
        debug!(rules = rules.len(), "reloading comparison rules");
        self.rules = rules;
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn left(&self) -> &XmlNode {
        &self.left
    }

    pub fn right(&self) -> &XmlNode {
        &self.right
    }
}
