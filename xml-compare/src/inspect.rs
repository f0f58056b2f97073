use xml_compare_core::XmlNode;

/// Render an XML tree down to `max_depth`, with attributes and the source
/// line of every element.
pub fn render_tree(node: &XmlNode, max_depth: usize) -> String {
    let mut out = String::new();
    render_node(node, 0, max_depth, &mut out);
    out
}

fn render_node(node: &XmlNode, depth: usize, max_depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    out.push_str(&indent);
    out.push_str(&node.tag);
    for (name, value) in &node.attributes {
        out.push_str(&format!(" {name}=\"{value}\""));
    }
    if node.text.is_some() {
        out.push_str(" [text]");
    }
    if let Some(line) = node.line {
        out.push_str(&format!("  (line {line})"));
    }
    out.push('\n');

    if depth >= max_depth {
        if !node.children.is_empty() {
            out.push_str(&format!(
                "{indent}  ... {} more element(s)\n",
                node.subtree_len() - 1
            ));
        }
        return;
    }

    for child in &node.children {
        render_node(child, depth + 1, max_depth, out);
    }
}
