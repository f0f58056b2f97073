//! Reader for `<nodeRules>` rule files.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::rules::builder::{Extends, RewriteTarget, RuleDraft, RuleSetBuilder};
use crate::rules::{ComparisonMode, ConfigError, ConfigErrorSink, RuleSet, RulesError, TrimMode};

/// Parse a `<nodeRules>` document held in memory.
pub fn parse_rules_xml(
    xml: &[u8],
    sink: &mut dyn ConfigErrorSink,
) -> Result<RuleSet, RulesError> {
    parse(xml, "<memory>", sink)
}

pub(crate) fn parse(
    xml: &[u8],
    origin: &str,
    sink: &mut dyn ConfigErrorSink,
) -> Result<RuleSet, RulesError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut state = RulesReader {
        origin,
        builder: RuleSetBuilder::new(),
        current: None,
        section: Section::None,
        default_mode: ComparisonMode::StrictAny,
        sink,
    };
    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut saw_root = false;

    loop {
        match reader
            .read_event_into(&mut buf)
            .map_err(|err| RulesError::xml(origin, err))?
        {
            Event::Start(e) => {
                check_root(&e, &mut saw_root, origin)?;
                depth += 1;
                let attrs = attributes(&e, &reader, origin)?;
                state.on_start(&element_name(&e), &attrs);
            }
            Event::Empty(e) => {
                check_root(&e, &mut saw_root, origin)?;
                let name = element_name(&e);
                let attrs = attributes(&e, &reader, origin)?;
                state.on_start(&name, &attrs);
                state.on_end(&name);
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                state.on_end(&String::from_utf8_lossy(e.name().as_ref()));
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !saw_root {
        return Err(RulesError::malformed(origin, "no <nodeRules> root element"));
    }
    if depth != 0 {
        return Err(RulesError::malformed(
            origin,
            "unclosed element(s) at end of document",
        ));
    }

    let RulesReader { builder, sink, .. } = state;
    Ok(builder.build(sink))
}

fn check_root(e: &BytesStart<'_>, saw_root: &mut bool, origin: &str) -> Result<(), RulesError> {
    if *saw_root {
        return Ok(());
    }
    let name = element_name(e);
    if name != "nodeRules" {
        return Err(RulesError::malformed(
            origin,
            format!("expected <nodeRules> root element, found <{name}>"),
        ));
    }
    *saw_root = true;
    Ok(())
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn attributes(
    e: &BytesStart<'_>,
    reader: &Reader<&[u8]>,
    origin: &str,
) -> Result<Vec<(String, String)>, RulesError> {
    let mut out = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| RulesError::xml(origin, err))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .decode_and_unescape_value(reader.decoder())
            .map_err(|err| RulesError::xml(origin, err))?
            .into_owned();
        out.push((key, value));
    }
    Ok(out)
}

fn flag(value: &str) -> bool {
    value.trim() == "true"
}

fn find<'a>(attrs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
}

enum Target {
    Default,
    Rule(RuleDraft),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    AppliesOn,
    Identification,
    Excluded,
    Descriptions,
    Text,
}

struct RulesReader<'o, 's> {
    origin: &'o str,
    builder: RuleSetBuilder,
    current: Option<Target>,
    section: Section,
    default_mode: ComparisonMode,
    sink: &'s mut dyn ConfigErrorSink,
}

impl RulesReader<'_, '_> {
    fn on_start(&mut self, name: &str, attrs: &[(String, String)]) {
        match name {
            "nodeRules" => self.read_root(attrs),
            "defaultRule" => {
                self.current = Some(Target::Default);
                self.read_rule_flags(attrs);
            }
            "rule" => {
                let mut draft = RuleDraft::default();
                if let Some(id) = find(attrs, "ruleName") {
                    draft.id = Some(id.trim().to_string());
                }
                if let Some(node) = find(attrs, "nodeName") {
                    draft.node_names.push(node.trim().to_string());
                }
                self.current = Some(Target::Rule(draft));
                self.section = Section::None;
                self.read_rule_flags(attrs);
            }
            "appliesOn" => self.section = Section::AppliesOn,
            "identification" => self.section = Section::Identification,
            "excluded" => self.section = Section::Excluded,
            "nodeName" if self.section == Section::AppliesOn => {
                if let Some(node) = self.required(attrs, name, "name") {
                    if let Some(draft) = self.draft() {
                        draft.node_names.push(node);
                    }
                }
            }
            "extendsDefaultRule" => {
                if let Some(Target::Rule(draft)) = &mut self.current {
                    draft.extends = Some(Extends::Default);
                }
            }
            "extendsRule" => {
                let parent = find(attrs, "name")
                    .or_else(|| find(attrs, "ruleName"))
                    .map(|value| value.trim().to_string());
                match parent {
                    Some(parent) => {
                        if let Some(Target::Rule(draft)) = &mut self.current {
                            draft.extends = Some(Extends::Rule(parent));
                        }
                    }
                    None => self.missing(name, "name"),
                }
            }
            "attribute" => {
                if let Some(attr) = self.required(attrs, name, "name") {
                    let section = self.section;
                    match (section, self.draft()) {
                        (Section::Identification, Some(draft)) => {
                            draft.identity_attributes.push(attr);
                        }
                        (Section::Excluded, Some(draft)) => {
                            draft.excluded_attributes.push(attr);
                        }
                        _ => {
                            debug!(attribute = %attr, "stray attribute element ignored");
                        }
                    }
                }
            }
            "descriptions" => {
                self.section = Section::Descriptions;
                if let Some(draft) = self.draft() {
                    if let Some(value) = find(attrs, "removeNewLines") {
                        draft.description_collapse = Some(flag(value));
                    }
                    if let Some(value) = find(attrs, "trimType") {
                        draft.description_trim = Some(TrimMode::from_token(value));
                    }
                }
            }
            "description" => {
                if let Some(attr) = self.required(attrs, name, "name") {
                    if let Some(draft) = self.draft() {
                        draft.description_attributes.push(attr);
                    }
                }
            }
            "CDATA" | "text" => {
                self.section = Section::Text;
                if let Some(draft) = self.draft() {
                    if let Some(value) = find(attrs, "removeNewLines") {
                        draft.text_collapse = Some(flag(value));
                    }
                    if let Some(value) = find(attrs, "trimType") {
                        draft.text_trim = Some(TrimMode::from_token(value));
                    }
                    if let Some(value) = find(attrs, "excludeCDATA") {
                        draft.compare_text = Some(!flag(value));
                    }
                }
            }
            "applyRegex" => self.read_rewrite(attrs),
            _ => {}
        }
    }

    fn on_end(&mut self, name: &str) {
        match name {
            "rule" => {
                if let Some(Target::Rule(draft)) = self.current.take() {
                    self.builder.push(draft);
                }
                self.section = Section::None;
            }
            "defaultRule" => {
                self.current = None;
                self.section = Section::None;
            }
            "appliesOn" | "identification" | "excluded" | "descriptions" | "CDATA" | "text" => {
                self.section = Section::None;
            }
            _ => {}
        }
    }

    fn read_root(&mut self, attrs: &[(String, String)]) {
        let default = self.builder.default_rule();
        for (key, value) in attrs {
            match key.as_str() {
                "defaultComparisonMode" => {
                    self.default_mode =
                        ComparisonMode::from_token(value).unwrap_or(ComparisonMode::StrictAny);
                    default.mode = Some(self.default_mode);
                }
                "compareCDATA" => default.compare_text = Some(flag(value)),
                "removeCDATANewLines" => default.text_collapse = Some(flag(value)),
                "orderIsSignificant" => default.order_significant = Some(flag(value)),
                _ => {}
            }
        }
    }

    fn read_rule_flags(&mut self, attrs: &[(String, String)]) {
        let default_mode = self.default_mode;
        let Some(draft) = self.draft() else {
            return;
        };
        for (key, value) in attrs {
            match key.as_str() {
                "comparisonMode" => {
                    draft.mode = Some(ComparisonMode::from_token(value).unwrap_or(default_mode));
                }
                "orderIsSignificant" => draft.order_significant = Some(flag(value)),
                "compareCDATA" => draft.compare_text = Some(flag(value)),
                "removeCDATANewLines" => draft.text_collapse = Some(flag(value)),
                "keepCDATANewLines" => draft.text_collapse = Some(!flag(value)),
                _ => {}
            }
        }
    }

    fn read_rewrite(&mut self, attrs: &[(String, String)]) {
        let target = match self.section {
            Section::Descriptions => RewriteTarget::Description,
            Section::Text => RewriteTarget::Text,
            _ => return,
        };
        let Some(from) = self.required(attrs, "applyRegex", "replaceFrom") else {
            return;
        };
        let Some(to) = self.required(attrs, "applyRegex", "replaceTo") else {
            return;
        };

        let Self {
            current,
            builder,
            sink,
            ..
        } = self;
        let draft = match current {
            Some(Target::Default) => builder.default_rule(),
            Some(Target::Rule(draft)) => draft,
            None => return,
        };
        draft.add_rewrite(target, &from, &to, &mut **sink);
    }

    fn draft(&mut self) -> Option<&mut RuleDraft> {
        match &mut self.current {
            Some(Target::Default) => Some(self.builder.default_rule()),
            Some(Target::Rule(draft)) => Some(draft),
            None => None,
        }
    }

    fn required(&mut self, attrs: &[(String, String)], element: &str, key: &str) -> Option<String> {
        match find(attrs, key) {
            Some(value) => Some(value.trim().to_string()),
            None => {
                self.missing(element, key);
                None
            }
        }
    }

    fn missing(&mut self, element: &str, attribute: &str) {
        let rule = match &self.current {
            Some(Target::Rule(draft)) => draft.label(),
            Some(Target::Default) => "default".to_string(),
            None => self.origin.to_string(),
        };
        self.sink.report(ConfigError::MissingAttribute {
            rule,
            element: element.to_string(),
            attribute: attribute.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::parse_rules_xml;
    use crate::rules::{ComparisonMode, ConfigError, TrimMode};

    #[test]
    fn reads_rules_with_applies_on_and_sections() {
        let xml = br#"
<nodeRules defaultComparisonMode="SameNodeName" orderIsSignificant="false">
  <rule ruleName="keyed" comparisonMode="OnAttributes">
    <appliesOn><nodeName name="item"/><nodeName name="entry"/></appliesOn>
    <identification><attribute name="id"/></identification>
    <excluded><attribute name="stamp"/></excluded>
    <descriptions removeNewLines="false" trimType="TrimRight">
      <description name="label"/>
      <applyRegex replaceFrom="\s+$" replaceTo=""/>
    </descriptions>
    <CDATA trimType="Trim" excludeCDATA="true"/>
  </rule>
</nodeRules>"#;

        let mut errors = Vec::new();
        let rules = parse_rules_xml(xml, &mut errors).expect("rules parse");
        assert!(errors.is_empty(), "{errors:?}");

        assert_eq!(rules.default_rule().mode, ComparisonMode::SameNameSame);
        assert!(!rules.default_rule().order_significant);

        let item = rules.resolve("entry");
        assert_eq!(item.id.as_deref(), Some("keyed"));
        assert_eq!(item.mode, ComparisonMode::OnIdentityAttributes);
        assert!(item.is_identity_attribute("id"));
        assert!(item.is_excluded_attribute("stamp"));
        assert!(item.is_description_attribute("label"));
        assert!(!item.description.collapse_whitespace);
        assert_eq!(item.description.trim, TrimMode::Right);
        assert_eq!(item.description.rewrites.len(), 1);
        assert_eq!(item.text.trim, TrimMode::Both);
        assert!(!item.compare_text);
    }

    #[test]
    fn attribute_outside_identity_or_excluded_sections_is_ignored() {
        let xml = br#"<nodeRules>
  <rule ruleName="keyed">
    <appliesOn><nodeName name="item"/><attribute name="id"/></appliesOn>
    <excluded><attribute name="stamp"/></excluded>
    <attribute name="loose"/>
  </rule>
</nodeRules>"#;
        let mut errors = Vec::new();
        let rules = parse_rules_xml(xml, &mut errors).expect("rules parse");
        assert!(errors.is_empty(), "{errors:?}");

        let item = rules.resolve("item");
        assert!(item.is_excluded_attribute("stamp"));
        assert!(!item.is_excluded_attribute("id"));
        assert!(!item.is_excluded_attribute("loose"));
        assert!(item.identity_attributes.is_empty());
    }

    #[test]
    fn unknown_mode_token_uses_default_mode() {
        let xml = br#"<nodeRules defaultComparisonMode="SameNodeName">
  <rule nodeName="item" comparisonMode="Fuzzy"/>
</nodeRules>"#;
        let rules = parse_rules_xml(xml, &mut Vec::new()).expect("rules parse");
        assert_eq!(rules.resolve("item").mode, ComparisonMode::SameNameSame);
    }

    #[test]
    fn bad_regex_only_drops_that_rewrite() {
        let xml = br#"<nodeRules>
  <rule nodeName="note">
    <CDATA>
      <applyRegex replaceFrom="([" replaceTo=""/>
      <applyRegex replaceFrom="\d+" replaceTo="N"/>
    </CDATA>
  </rule>
  <rule nodeName="other" orderIsSignificant="false"/>
</nodeRules>"#;
        let mut errors = Vec::new();
        let rules = parse_rules_xml(xml, &mut errors).expect("rules parse");

        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], ConfigError::InvalidRegex { rule, .. } if rule == "note"));
        assert_eq!(rules.resolve("note").text.rewrites.len(), 1);
        assert!(!rules.resolve("other").order_significant);
    }

    #[test]
    fn wrong_root_is_fatal() {
        assert!(parse_rules_xml(b"<rules/>", &mut Vec::new()).is_err());
    }
}
