use crate::accessor::{
    link_color, link_style_class, link_title, node_style_class, node_title, node_value_text,
};
use crate::config::Config;
use crate::error::Result;
use crate::graph::Graph;
use crate::layout::{LayoutEngine, LayoutOptions, PositionedGraph, SankeyEngine};
use crate::svg::{self, Element, fmt_num};
use crate::theme::{Palette, Theme};

/// Full pipeline for one render: layout, assemble, serialize. The palette
/// lives and dies inside this call, so color assignment only depends on
/// this graph.
pub fn render_diagram(graph: &Graph, config: &Config, engine: &dyn LayoutEngine) -> Result<String> {
    let options = LayoutOptions::resolve(graph, config);
    let layout = engine.layout(graph, &options)?;
    let theme = Theme::default();
    let tree = assemble(graph, &layout, config, &theme);
    Ok(svg::serialize_document(&tree))
}

/// Render with the default Sankey engine.
pub fn render_svg(graph: &Graph, config: &Config) -> Result<String> {
    render_diagram(graph, config, &SankeyEngine)
}

/// Build the diagram tree. Child order is paint order: background, groups,
/// links, nodes, document title.
pub fn assemble(
    graph: &Graph,
    layout: &PositionedGraph,
    config: &Config,
    theme: &Theme,
) -> Element {
    let mut palette = Palette::new();

    let mut root = Element::new("svg")
        .attr("xmlns", "http://www.w3.org/2000/svg")
        .attr("width", fmt_num(config.width))
        .attr("height", fmt_num(config.height))
        .attr(
            "viewBox",
            format!(
                "0 0 {} {}",
                fmt_num(config.width),
                fmt_num(config.height)
            ),
        )
        .style("font-family", &theme.font_family)
        .style("font-size", format!("{}px", fmt_num(config.font_size)));

    root.push(
        Element::new("rect")
            .attr("width", fmt_num(config.width))
            .attr("height", fmt_num(config.height))
            .style("fill", &theme.background),
    );

    let mut canvas = Element::new("g").attr(
        "transform",
        format!(
            "translate({},{})",
            fmt_num(config.margins.left),
            fmt_num(config.margins.top)
        ),
    );

    for group in &layout.groups {
        canvas.push(group_element(group, theme));
    }
    for link in &layout.links {
        canvas.push(link_element(link, graph, config, theme, &mut palette));
    }
    for node in &layout.nodes {
        canvas.push(node_element(node, graph, layout, config, theme));
    }

    root.push(canvas);

    if let Some(title) = graph.title() {
        root.push(
            Element::new("text")
                .attr("x", fmt_num(config.width - 10.0))
                .attr("y", fmt_num(10.0 + config.font_size * 1.5))
                .attr("text-anchor", "end")
                .style("font-size", format!("{}px", fmt_num(config.font_size * 1.5)))
                .text(title),
        );
    }

    root
}

fn group_element(group: &crate::layout::GroupLayout, theme: &Theme) -> Element {
    let mut element = Element::new("g").attr("class", "group").child(
        Element::new("rect")
            .attr("x", fmt_num(group.x))
            .attr("y", fmt_num(group.y))
            .attr("width", fmt_num(group.width))
            .attr("height", fmt_num(group.height))
            .style("fill", &theme.group_background)
            .style("stroke", &theme.group_border)
            .style("stroke-width", fmt_num(theme.group_border_width)),
    );
    if let Some(title) = &group.title {
        element.push(
            Element::new("text")
                .attr("x", fmt_num(group.x + 4.0))
                .attr("y", fmt_num(group.y - 4.0))
                .style("fill", &theme.group_label_color)
                .text(title),
        );
    }
    element
}

fn link_element(
    link: &crate::layout::LinkLayout,
    graph: &Graph,
    config: &Config,
    theme: &Theme,
    palette: &mut Palette,
) -> Element {
    let data = &graph.links[link.index];
    let (stroke, stroke_width) = class_stroke(link_style_class(data), theme);
    Element::new("path")
        .attr("class", "link")
        .attr("d", &link.path)
        .style("fill", link_color(data, palette))
        .style("opacity", fmt_num(theme.link_opacity))
        .style("stroke", stroke)
        .style("stroke-width", format!("{}px", fmt_num(stroke_width)))
        .child(Element::new("title").text(link_title(data, graph, config)))
}

fn node_element(
    node: &crate::layout::NodeLayout,
    graph: &Graph,
    layout: &PositionedGraph,
    config: &Config,
    theme: &Theme,
) -> Element {
    let data = graph.node(&node.id);
    let (stroke, stroke_width) = class_stroke(data.and_then(node_style_class), theme);
    let center_x = node.x + node.width / 2.0;

    let mut element = Element::new("g").attr("class", "node").child(
        Element::new("line")
            .attr("x1", fmt_num(center_x))
            .attr("y1", fmt_num(node.y))
            .attr("x2", fmt_num(center_x))
            .attr("y2", fmt_num(node.y + node.height))
            .style("stroke", stroke)
            .style("stroke-width", format!("{}px", fmt_num(stroke_width))),
    );

    // Labels sit to the right of the column, flipping to the left half way
    // across so the last rank stays inside the canvas.
    let on_left_half = node.x < layout.width / 2.0;
    let (label_x, anchor) = if on_left_half {
        (node.x + node.width + 4.0, "start")
    } else {
        (node.x - 4.0, "end")
    };
    let title = data.map_or(node.id.as_str(), node_title);
    let label_y = node.y + node.height / 2.0 + config.font_size * 0.35;
    element.push(
        Element::new("text")
            .attr("x", fmt_num(label_x))
            .attr("y", fmt_num(label_y))
            .attr("text-anchor", anchor)
            .style("fill", &theme.label_color)
            .text(title),
    );

    let value_text = node_value_text(node.value, config);
    if !value_text.is_empty() {
        element.push(
            Element::new("text")
                .attr("class", "node-value")
                .attr("x", fmt_num(label_x))
                .attr("y", fmt_num(label_y + config.font_size))
                .attr("text-anchor", anchor)
                .style("fill", &theme.label_color)
                .text(value_text),
        );
    }

    element
}

/// Stroke branch shared by links and node lines: a "process" class draws
/// heavier and gray.
fn class_stroke<'a>(class: Option<&str>, theme: &'a Theme) -> (&'a str, f64) {
    if class == Some("process") {
        (&theme.process_stroke, theme.process_stroke_width)
    } else {
        (&theme.node_stroke, theme.node_stroke_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::decode_graph;

    fn render(json: &str) -> String {
        let graph = decode_graph(json).unwrap();
        render_svg(&graph, &Config::default()).unwrap()
    }

    #[test]
    fn background_paints_before_everything() {
        let svg = render(
            r#"{"nodes":[{"id":"a"},{"id":"b"}],
                "links":[{"source":"a","target":"b","value":10}],
                "groups":[{"id":"g","nodes":["a"]}]}"#,
        );
        let background = svg.find("<rect").unwrap();
        for needle in ["class=\"group\"", "class=\"link\"", "class=\"node\""] {
            assert!(background < svg.find(needle).unwrap(), "{needle} under background");
        }
    }

    #[test]
    fn process_class_changes_stroke() {
        let svg = render(
            r#"{"nodes":[{"id":"a","style":"process"},{"id":"b"}],
                "links":[{"source":"a","target":"b","value":10,"style":"process"}]}"#,
        );
        assert!(svg.contains("stroke: #888"));
        assert!(svg.contains("stroke-width: 4px"));
    }

    #[test]
    fn links_carry_tooltips() {
        let svg = render(
            r#"{"nodes":[{"id":"a","title":"Alpha"},{"id":"b"}],
                "links":[{"source":"a","target":"b","value":10,"type":"fuel"}]}"#,
        );
        assert!(svg.contains("<title>Alpha \u{2192} b\nfuel\n10</title>"));
    }

    #[test]
    fn document_title_is_right_aligned() {
        let svg = render(
            r#"{"nodes":[{"id":"a"}],"links":[],
                "metadata":{"title":"Energy balance"}}"#,
        );
        assert!(svg.contains(">Energy balance</text>"));
        assert!(svg.contains("text-anchor=\"end\""));
        assert!(svg.contains("x=\"790\""));
    }

    #[test]
    fn node_values_annotated_when_configured() {
        let graph = decode_graph(
            r#"{"nodes":[{"id":"a"},{"id":"b"}],
                "links":[{"source":"a","target":"b","value":1234.5}]}"#,
        )
        .unwrap();
        let raw = crate::config::RawOptions {
            node_values: Some(",.0f".to_string()),
            ..Default::default()
        };
        let config = Config::resolve(&raw).unwrap();
        let svg = render_svg(&graph, &config).unwrap();
        assert!(svg.contains(">1,235</text>") || svg.contains(">1,234</text>"));
    }
}
