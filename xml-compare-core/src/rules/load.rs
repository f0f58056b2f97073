use std::fs;
use std::path::Path;

use tracing::debug;

use crate::rules::{toml_format, xml_format, ConfigErrorSink, RuleSet, RulesError};

/// Load a rules file. Files ending in `.toml` use the TOML format; anything
/// else is read as a `<nodeRules>` document.
pub fn load_rules(path: &Path, sink: &mut dyn ConfigErrorSink) -> Result<RuleSet, RulesError> {
    let origin = path.display().to_string();
    let io_error = |source| RulesError::Io {
        origin: origin.clone(),
        source,
    };

    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let rules = if is_toml {
        let raw = fs::read_to_string(path).map_err(io_error)?;
        toml_format::parse(&raw, &origin, sink)?
    } else {
        let raw = fs::read(path).map_err(io_error)?;
        xml_format::parse(&raw, &origin, sink)?
    };
    debug!(path = %origin, rules = rules.len(), "loaded rules");
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::Builder;

    use super::load_rules;
    use crate::rules::RulesError;

    #[test]
    fn picks_front_end_by_extension() {
        let mut toml_file = Builder::new().suffix(".toml").tempfile().expect("tempfile");
        writeln!(toml_file, "[[rule]]\napplies_on = [\"a\"]\norder_significant = false")
            .expect("write");
        let rules = load_rules(toml_file.path(), &mut Vec::new()).expect("toml rules");
        assert!(!rules.resolve("a").order_significant);

        let mut xml_file = Builder::new().suffix(".xml").tempfile().expect("tempfile");
        write!(xml_file, r#"<nodeRules><rule nodeName="a" compareCDATA="false"/></nodeRules>"#)
            .expect("write");
        let rules = load_rules(xml_file.path(), &mut Vec::new()).expect("xml rules");
        assert!(!rules.resolve("a").compare_text);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_rules(&dir.path().join("absent.xml"), &mut Vec::new())
            .expect_err("missing file");
        assert!(matches!(err, RulesError::Io { .. }));
    }
}
