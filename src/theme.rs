use std::collections::HashMap;

/// d3's classic category20 scale, in its original order.
pub const CATEGORY20: [&str; 20] = [
    "#1f77b4", "#aec7e8", "#ff7f0e", "#ffbb78", "#2ca02c", "#98df8a", "#d62728", "#ff9896",
    "#9467bd", "#c5b0d5", "#8c564b", "#c49c94", "#e377c2", "#f7b6d2", "#7f7f7f", "#c7c7c7",
    "#bcbd22", "#dbdb8d", "#17becf", "#9edae5",
];

/// Visual constants applied as inline styles on the output document.
#[derive(Debug, Clone)]
pub struct Theme {
    pub font_family: String,
    pub background: String,
    pub link_opacity: f64,
    pub node_stroke: String,
    pub node_stroke_width: f64,
    pub process_stroke: String,
    pub process_stroke_width: f64,
    pub group_background: String,
    pub group_border: String,
    pub group_border_width: f64,
    pub group_label_color: String,
    pub label_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            font_family: "\"Helvetica Neue\", Helvetica, Arial, sans-serif".to_string(),
            background: "white".to_string(),
            link_opacity: 0.8,
            node_stroke: "#000".to_string(),
            node_stroke_width: 1.0,
            process_stroke: "#888".to_string(),
            process_stroke_width: 4.0,
            group_background: "#eee".to_string(),
            group_border: "#bbb".to_string(),
            group_border_width: 0.5,
            group_label_color: "#999".to_string(),
            label_color: "#000".to_string(),
        }
    }
}

/// Categorical color scale owned by a single render. Keys are assigned
/// colors in first-seen order, so the same key always maps to the same
/// color within one render, and repeated renders of the same graph assign
/// identical colors. Never share one palette across renders.
#[derive(Debug, Default)]
pub struct Palette {
    assigned: HashMap<String, usize>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Color for a categorical key. A missing key (untyped link) is itself
    /// a stable category.
    pub fn color(&mut self, key: Option<&str>) -> &'static str {
        let key = key.unwrap_or("");
        let next = self.assigned.len();
        let idx = *self.assigned.entry(key.to_string()).or_insert(next);
        CATEGORY20[idx % CATEGORY20.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_key_same_color() {
        let mut palette = Palette::new();
        let first = palette.color(Some("oil"));
        palette.color(Some("gas"));
        assert_eq!(palette.color(Some("oil")), first);
    }

    #[test]
    fn keys_assigned_in_first_seen_order() {
        let mut palette = Palette::new();
        assert_eq!(palette.color(Some("a")), CATEGORY20[0]);
        assert_eq!(palette.color(Some("b")), CATEGORY20[1]);
        assert_eq!(palette.color(None), CATEGORY20[2]);
        assert_eq!(palette.color(None), CATEGORY20[2]);
    }

    #[test]
    fn fresh_palettes_are_reproducible() {
        let mut first = Palette::new();
        let mut second = Palette::new();
        for key in ["x", "y", "z", "x"] {
            assert_eq!(first.color(Some(key)), second.color(Some(key)));
        }
    }
}
