//! Rule-driven structural comparison of XML documents.
//!
//! Two element trees are paired node by node under a [`RuleSet`] that
//! says, per element name, what makes two elements the same logical node
//! and which differences matter. The result is a [`ComparisonGraph`] with
//! both documents projected onto the same shape (missing nodes become
//! phantoms) and a [`DifferenceIndex`] over every changed node.
//!
//! ```no_run
//! use std::path::Path;
//!
//! use xml_compare_core::{compare, format_text, load_rules, parse_file, TracingSink};
//!
//! let rules = load_rules(Path::new("rules.xml"), &mut TracingSink)?;
//! let left = parse_file(Path::new("before.xml"))?;
//! let right = parse_file(Path::new("after.xml"))?;
//! let graph = compare(&left, &right, &rules);
//! println!("{}", format_text(&graph));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod compare;
pub mod equality;
pub mod format;
pub mod parser;
pub mod rules;
pub mod tree;

pub use compare::{
    classify, compare, Comparator, ComparisonGraph, ComparisonId, ComparisonNode,
    DifferenceIndex, Direction, MovedState, NodeKey, NodeStatus, Side, SideWrapper, Summary,
    WrapperId,
};
pub use equality::{status, structurally_equal, ContentStatus};
pub use format::{format_json, format_summary, format_text, format_tree};
pub use parser::{parse, parse_file, ParseError};
pub use rules::{
    load_rules, parse_rules_toml, parse_rules_xml, ComparisonMode, ConfigError, ConfigErrorSink,
    Rule, RuleSet, RulesError, TracingSink, TrimMode,
};
pub use tree::XmlNode;
