//! Pure element accessors: display titles, colors and style classes derived
//! from the raw graph attributes. Absent optional fields are normal and take
//! the documented fallback; none of these functions can fail.

use crate::config::Config;
use crate::graph::{Graph, Link, LinkStyle, Node};
use crate::theme::Palette;

/// Display title of a node: its `title` (label of the structured form),
/// falling back to the id.
pub fn node_title(node: &Node) -> &str {
    match &node.title {
        Some(title) => title.label(),
        None => &node.id,
    }
}

/// Title shown for a link's type line: explicit `title`, else the type.
pub fn link_type_title(link: &Link) -> Option<&str> {
    link.title.as_deref().or(link.link_type.as_deref())
}

/// Color precedence: explicit `color`, then `style.color`, then the
/// categorical palette keyed by link type.
pub fn link_color(link: &Link, palette: &mut Palette) -> String {
    if let Some(color) = &link.color {
        return color.clone();
    }
    if let Some(LinkStyle::Attrs(attrs)) = &link.style
        && let Some(color) = &attrs.color
    {
        return color.clone();
    }
    palette.color(link.link_type.as_deref()).to_string()
}

/// Style class of a link, when its `style` is the bare class-name form.
pub fn link_style_class(link: &Link) -> Option<&str> {
    match &link.style {
        Some(LinkStyle::Class(class)) => Some(class),
        _ => None,
    }
}

/// Style class of a node (the `style` attribute, verbatim).
pub fn node_style_class(node: &Node) -> Option<&str> {
    node.style.as_deref()
}

/// Multi-line tooltip for a link: source → target, the type title if any,
/// and the formatted value.
pub fn link_title(link: &Link, graph: &Graph, config: &Config) -> String {
    let source = graph.node(&link.source).map_or(link.source.as_str(), node_title);
    let target = graph.node(&link.target).map_or(link.target.as_str(), node_title);
    let mut lines = vec![format!("{source} \u{2192} {target}")];
    if let Some(type_title) = link_type_title(link)
        && !type_title.is_empty()
    {
        lines.push(type_title.to_string());
    }
    lines.push(format_value(link.value, config));
    lines.join("\n")
}

/// Value annotation for a node label; empty unless a format was configured.
pub fn node_value_text(value: f64, config: &Config) -> String {
    match &config.node_values {
        Some(format) => format.format(value),
        None => String::new(),
    }
}

fn format_value(value: f64, config: &Config) -> String {
    match &config.node_values {
        Some(format) => format.format(value),
        None => format!("{value}"),
    }
}
