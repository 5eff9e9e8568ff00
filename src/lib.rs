pub mod accessor;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod layout;
pub mod render;
pub mod svg;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, RawOptions};
pub use error::Error;
pub use graph::{Graph, decode_graph};
pub use layout::{LayoutEngine, LayoutOptions, PositionedGraph, SankeyEngine};
pub use render::{render_diagram, render_svg};
pub use theme::{Palette, Theme};
