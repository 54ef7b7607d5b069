use crate::tree::arena::{CategoryTree, NodeId};
use crate::tree::path::PathKey;

/// Information to display in the tooltip when hovering over an arc.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipInfo {
    pub name: String,
    /// Names below the root joined by " → "
    pub path: String,
    pub value_display: String,
    /// "name: value" lines for categories folded into an "Other" node
    pub includes: Vec<String>,
}

impl TooltipInfo {
    /// Plain-text rendering: path, value with unit, then the folded categories.
    pub fn text(&self, measure_label: &str) -> String {
        let mut out = format!("{}\n{} {}", self.path, self.value_display, measure_label);
        if !self.includes.is_empty() {
            out.push_str("\n\nIncludes:");
            for line in &self.includes {
                out.push('\n');
                out.push_str(line);
            }
        }
        out
    }
}

/// Build tooltip info for a node.
pub fn build_tooltip(tree: &CategoryTree, node_id: NodeId) -> TooltipInfo {
    let node = tree.get(node_id);
    let includes = if node.is_aggregated {
        node.aggregated_details
            .iter()
            .map(|d| format!("{}: {}", d.name, format_value(d.value)))
            .collect()
    } else {
        Vec::new()
    };

    TooltipInfo {
        name: node.name.to_string(),
        path: PathKey::of(tree, node_id).below_root(" → "),
        value_display: format_value(node.value),
        includes,
    }
}

/// Format a value with thousands separators and at most three decimals.
pub fn format_value(value: f64) -> String {
    let text = format!("{:.3}", value.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(text.len() + int_part.len() / 3);
    if value < 0.0 && text.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}
