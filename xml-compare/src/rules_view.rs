use xml_compare_core::{ConfigError, RuleSet};

/// Render every rule of `rules`: the default, the name bindings, and rules
/// that are only reachable through `extends`.
pub fn render_rules(rules: &RuleSet) -> String {
    let mut out = Vec::new();
    out.push(format!("default: {}", rules.default_rule()));
    for (name, rule) in rules.named_rules() {
        match &rule.id {
            Some(id) => out.push(format!("{name} [{id}]: {rule}")),
            None => out.push(format!("{name}: {rule}")),
        }
    }
    for rule in rules.unbound_rules() {
        let id = rule.id.as_deref().unwrap_or("?");
        out.push(format!("[{id}] (base only): {rule}"));
    }
    out.join("\n")
}

/// One warning line per non-fatal configuration error.
pub fn render_config_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(|error| format!("warning: {error}"))
        .collect::<Vec<_>>()
        .join("\n")
}
