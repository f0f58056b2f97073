use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};

use regex::Regex;
use serde::Serialize;

/// How two same-named elements are judged to be the same logical node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ComparisonMode {
    /// Any attribute difference makes the nodes different; a text-only
    /// difference is an update.
    #[default]
    StrictAny,
    /// Equal names are the same node; every other difference is an update.
    SameNameSame,
    /// Identity attributes decide sameness; other differences are updates.
    OnIdentityAttributes,
}

impl ComparisonMode {
    /// Parse a configuration token. Unknown tokens yield `None` so callers
    /// can fall back to their default mode.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim() {
            "AnyDiff" | "StrictAny" => Some(Self::StrictAny),
            "SameNodeName" | "SameNameSame" => Some(Self::SameNameSame),
            "OnAttributes" | "OnIdentityAttributes" => Some(Self::OnIdentityAttributes),
            _ => None,
        }
    }
}

/// Which ends of a value are trimmed before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum TrimMode {
    #[default]
    None,
    Left,
    Right,
    Both,
}

impl TrimMode {
    /// Parse a configuration token; unknown tokens mean no trimming.
    pub fn from_token(token: &str) -> Self {
        match token.trim() {
            "Trim" | "Both" => Self::Both,
            "TrimLeft" | "Left" => Self::Left,
            "TrimRight" | "Right" => Self::Right,
            _ => Self::None,
        }
    }

    pub fn apply(self, value: &str) -> &str {
        match self {
            Self::None => value,
            Self::Left => value.trim_start(),
            Self::Right => value.trim_end(),
            Self::Both => value.trim(),
        }
    }
}

/// A compiled regex substitution applied to every match.
#[derive(Debug, Clone)]
pub struct RegexRewrite {
    pattern: Regex,
    replacement: String,
}

impl RegexRewrite {
    /// Compile `pattern`. The replacement may use `$1` / `${name}` groups.
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            replacement: replacement.into(),
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn apply<'a>(&self, value: &'a str) -> Cow<'a, str> {
        self.pattern.replace_all(value, self.replacement.as_str())
    }
}

/// Normalization pipeline for description attributes or text payloads:
/// trim, optional whitespace collapse, then the rewrites in order.
#[derive(Debug, Clone, Default)]
pub struct Normalization {
    pub trim: TrimMode,
    /// Collapse every whitespace run, newlines included, to one space.
    pub collapse_whitespace: bool,
    pub rewrites: Vec<RegexRewrite>,
}

impl Normalization {
    /// Normalize `value` with the configured pipeline.
    pub fn apply(&self, value: &str) -> String {
        self.apply_with(value, self.collapse_whitespace)
    }

    /// Compare two values after normalization.
    ///
    /// When collapsing is disabled and the values still differ, the
    /// comparison is retried once with collapsing enabled.
    pub fn matches(&self, left: &str, right: &str) -> bool {
        if self.apply(left) == self.apply(right) {
            return true;
        }
        !self.collapse_whitespace && self.apply_with(left, true) == self.apply_with(right, true)
    }

    fn apply_with(&self, value: &str, collapse: bool) -> String {
        let trimmed = self.trim.apply(value);
        let mut out = if collapse {
            collapse_whitespace(trimmed)
        } else {
            trimmed.to_string()
        };
        for rewrite in &self.rewrites {
            out = rewrite.apply(&out).into_owned();
        }
        out
    }
}

fn collapse_whitespace(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_run = false;
    for ch in value.chars() {
        if ch.is_whitespace() {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(ch);
            in_run = false;
        }
    }
    out
}

/// Comparison policy for one element type.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Identifier other rules can extend.
    pub id: Option<String>,
    pub mode: ComparisonMode,
    /// When false, a pure reorder is reported as a move, not a change.
    pub order_significant: bool,
    pub compare_text: bool,
    pub identity_attributes: BTreeSet<String>,
    /// Attributes dropped before any comparison.
    pub excluded_attributes: BTreeSet<String>,
    pub description_attributes: BTreeSet<String>,
    pub description: Normalization,
    pub text: Normalization,
}

impl Default for Rule {
    fn default() -> Self {
        Self {
            id: None,
            mode: ComparisonMode::StrictAny,
            order_significant: true,
            compare_text: true,
            identity_attributes: BTreeSet::new(),
            excluded_attributes: BTreeSet::new(),
            description_attributes: BTreeSet::new(),
            description: Normalization {
                collapse_whitespace: true,
                ..Normalization::default()
            },
            text: Normalization::default(),
        }
    }
}

impl Rule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an identity attribute. This switches the rule to
    /// [`ComparisonMode::OnIdentityAttributes`].
    pub fn add_identity_attribute(&mut self, name: impl Into<String>) {
        self.identity_attributes.insert(name.into());
        self.mode = ComparisonMode::OnIdentityAttributes;
    }

    /// Add a description attribute. This switches the rule to
    /// [`ComparisonMode::OnIdentityAttributes`].
    pub fn add_description_attribute(&mut self, name: impl Into<String>) {
        self.description_attributes.insert(name.into());
        self.mode = ComparisonMode::OnIdentityAttributes;
    }

    pub fn add_excluded_attribute(&mut self, name: impl Into<String>) {
        self.excluded_attributes.insert(name.into());
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_mode(mut self, mode: ComparisonMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_order_significant(mut self, significant: bool) -> Self {
        self.order_significant = significant;
        self
    }

    pub fn with_compare_text(mut self, compare: bool) -> Self {
        self.compare_text = compare;
        self
    }

    pub fn with_identity(mut self, names: &[&str]) -> Self {
        for name in names {
            self.add_identity_attribute(*name);
        }
        self
    }

    pub fn with_excluded(mut self, names: &[&str]) -> Self {
        for name in names {
            self.add_excluded_attribute(*name);
        }
        self
    }

    pub fn with_descriptions(mut self, names: &[&str]) -> Self {
        for name in names {
            self.add_description_attribute(*name);
        }
        self
    }

    pub fn is_description_attribute(&self, name: &str) -> bool {
        self.description_attributes.contains(name)
    }

    pub fn is_identity_attribute(&self, name: &str) -> bool {
        self.identity_attributes.contains(name)
    }

    pub fn is_excluded_attribute(&self, name: &str) -> bool {
        self.excluded_attributes.contains(name)
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mode={:?} order_significant={} compare_text={}",
            self.mode, self.order_significant, self.compare_text
        )?;
        write_set(f, "identity", &self.identity_attributes)?;
        write_set(f, "excluded", &self.excluded_attributes)?;
        write_set(f, "descriptions", &self.description_attributes)?;
        write!(
            f,
            " description_trim={:?} text_trim={:?} text_collapse={}",
            self.description.trim, self.text.trim, self.text.collapse_whitespace
        )?;
        let rewrites = self.description.rewrites.len() + self.text.rewrites.len();
        if rewrites > 0 {
            write!(f, " rewrites={rewrites}")?;
        }
        Ok(())
    }
}

fn write_set(f: &mut Formatter<'_>, label: &str, set: &BTreeSet<String>) -> fmt::Result {
    if set.is_empty() {
        return Ok(());
    }
    let joined: Vec<&str> = set.iter().map(String::as_str).collect();
    write!(f, " {label}=[{}]", joined.join(","))
}
