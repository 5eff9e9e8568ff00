/// Geometry computed by a layout engine, in inner (margin-less) coordinates.
/// Entities point back into the input graph by id / link index so the
/// assembler can run the accessors against the raw attributes.
#[derive(Debug, Clone)]
pub struct PositionedGraph {
    pub nodes: Vec<NodeLayout>,
    pub links: Vec<LinkLayout>,
    pub groups: Vec<GroupLayout>,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone)]
pub struct NodeLayout {
    pub id: String,
    pub rank: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Flow through the node: max of inflow and outflow.
    pub value: f64,
}

#[derive(Debug, Clone)]
pub struct LinkLayout {
    /// Index of the link in the input graph's `links`.
    pub index: usize,
    pub source: String,
    pub target: String,
    /// SVG path data for the band's closed outline.
    pub path: String,
    /// Band thickness in pixels.
    pub width: f64,
}

#[derive(Debug, Clone)]
pub struct GroupLayout {
    pub id: String,
    pub title: Option<String>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PositionedGraph {
    pub fn node(&self, id: &str) -> Option<&NodeLayout> {
        self.nodes.iter().find(|node| node.id == id)
    }
}
