//! In-memory SVG element tree and its serializer. The assembler builds a
//! tree; serialization is a deterministic depth-first walk, so paint order
//! is exactly child order.

/// Fixed document preamble: the output must be self-describing since no
/// external stylesheet or profile is available to the consumer.
pub const XML_DECLARATION: &str = "<?xml version=\"1.0\" standalone=\"no\"?>";
pub const SVG_DOCTYPE: &str = "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">";

#[derive(Debug, Clone)]
pub struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    styles: Vec<(String, String)>,
    children: Vec<Element>,
    text: Option<String>,
}

impl Element {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attrs: Vec::new(),
            styles: Vec::new(),
            children: Vec::new(),
            text: None,
        }
    }

    pub fn attr(mut self, name: &str, value: impl ToString) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    pub fn style(mut self, name: &str, value: impl ToString) -> Self {
        self.styles.push((name.to_string(), value.to_string()));
        self
    }

    pub fn text(mut self, text: impl ToString) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Insert a child before all existing ones, so it paints underneath.
    pub fn insert_first(&mut self, child: Element) {
        self.children.insert(0, child);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    fn write(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_xml(value));
            out.push('"');
        }
        if !self.styles.is_empty() {
            out.push_str(" style=\"");
            for (idx, (name, value)) in self.styles.iter().enumerate() {
                if idx > 0 {
                    out.push_str("; ");
                }
                out.push_str(name);
                out.push_str(": ");
                out.push_str(&escape_xml(value));
            }
            out.push('"');
        }
        if self.children.is_empty() && self.text.is_none() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape_xml(text));
        }
        for child in &self.children {
            child.write(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

/// Serialize a complete standalone document: XML declaration, SVG 1.1
/// doctype, then the tree.
pub fn serialize_document(root: &Element) -> String {
    let mut out = String::new();
    out.push_str(XML_DECLARATION);
    out.push_str(SVG_DOCTYPE);
    root.write(&mut out);
    out
}

pub fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Compact coordinate formatting: whole numbers lose the fraction, others
/// round to two decimals.
pub fn fmt_num(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{}", value.round() as i64)
    } else {
        let text = format!("{value:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_preamble() {
        let root = Element::new("svg").attr("width", 10);
        let out = serialize_document(&root);
        assert!(out.starts_with(XML_DECLARATION));
        assert!(out[XML_DECLARATION.len()..].starts_with(SVG_DOCTYPE));
        assert!(out.ends_with("<svg width=\"10\"/>"));
    }

    #[test]
    fn styles_render_inline() {
        let mut out = String::new();
        Element::new("rect")
            .style("fill", "white")
            .style("opacity", "0.8")
            .write(&mut out);
        assert_eq!(out, "<rect style=\"fill: white; opacity: 0.8\"/>");
    }

    #[test]
    fn text_and_attrs_are_escaped() {
        let mut out = String::new();
        Element::new("text")
            .attr("data-label", "a<b")
            .text("x & y")
            .write(&mut out);
        assert_eq!(out, "<text data-label=\"a&lt;b\">x &amp; y</text>");
    }

    #[test]
    fn insert_first_paints_underneath() {
        let mut root = Element::new("svg");
        root.push(Element::new("path"));
        root.insert_first(Element::new("rect"));
        let mut out = String::new();
        root.write(&mut out);
        assert_eq!(out, "<svg><rect/><path/></svg>");
    }

    #[test]
    fn fmt_num_compacts() {
        assert_eq!(fmt_num(800.0), "800");
        assert_eq!(fmt_num(2.5), "2.5");
        assert_eq!(fmt_num(1.234), "1.23");
    }
}
