mod sankey;
pub(crate) mod types;

pub use sankey::SankeyEngine;
pub use types::*;

use crate::config::Config;
use crate::error::Result;
use crate::graph::Graph;

/// Options handed to a layout engine: the drawing area after margins plus
/// the ordering/placement hints resolved from graph and configuration.
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    pub size: (f64, f64),
    /// Explicit layer assignment; `None` leaves the engine free to rank.
    pub ordering: Option<Vec<Vec<String>>>,
    /// Attribute names for manual node placement.
    pub position: Option<(String, String)>,
    /// Pixels per attribute unit in manual placement mode.
    pub scale: Option<f64>,
}

impl LayoutOptions {
    /// Resolve the hints for one render. Explicit `order` in the graph wins
    /// over `metadata.layers`.
    pub fn resolve(graph: &Graph, config: &Config) -> Self {
        Self {
            size: config.inner_size(),
            ordering: graph.ordering().map(<[Vec<String>]>::to_vec),
            position: config.position.clone(),
            scale: config.scale,
        }
    }
}

/// Capability boundary around the positioning algorithm, so the assembly
/// pipeline can be driven by an in-memory fake in tests.
pub trait LayoutEngine {
    fn layout(&self, graph: &Graph, options: &LayoutOptions) -> Result<PositionedGraph>;
}
