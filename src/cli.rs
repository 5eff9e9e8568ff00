use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;

use crate::config::{Config, RawOptions};
use crate::error::Error;
use crate::graph::decode_graph;
use crate::render::render_svg;

#[derive(Parser, Debug)]
#[command(
    name = "sankey-svg",
    version,
    about = "Render a Sankey flow diagram from JSON to standalone SVG"
)]
pub struct Args {
    /// Input JSON file, or '-' for stdin
    pub file: PathBuf,

    /// Output size in pixels: <w> or <w>,<h>
    #[arg(short = 's', long = "size")]
    pub size: Option<String>,

    /// Margins: 1, 2 or 4 values
    #[arg(short = 'm', long = "margins")]
    pub margins: Option<String>,

    /// Manual layout: names of the x and y node attributes
    #[arg(short = 'p', long = "position")]
    pub position: Option<String>,

    /// Pixels per attribute unit for manual layout
    #[arg(short = 'k', long = "scale")]
    pub scale: Option<String>,

    /// Base font size override
    #[arg(long = "font-size")]
    pub font_size: Option<String>,

    /// Numeric format for node value labels, e.g. ",.0f"
    #[arg(long = "node-values")]
    pub node_values: Option<String>,
}

impl Args {
    fn raw_options(&self) -> RawOptions {
        RawOptions {
            size: self.size.clone(),
            margins: self.margins.clone(),
            position: self.position.clone(),
            scale: self.scale.clone(),
            font_size: self.font_size.clone(),
            node_values: self.node_values.clone(),
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let config = Config::resolve(&args.raw_options())?;
    let input = read_input(&args.file)?;
    let graph = decode_graph(&input)?;
    let svg = render_svg(&graph, &config)?;
    print!("{svg}");
    Ok(())
}

fn read_input(path: &Path) -> Result<String, Error> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    Ok(std::fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_options() {
        let args = Args::try_parse_from([
            "sankey-svg",
            "-s",
            "800,600",
            "-m",
            "10,20",
            "-p",
            "x,y",
            "-k",
            "2.5",
            "--font-size",
            "14",
            "--node-values",
            ".1f",
            "flows.json",
        ])
        .unwrap();
        assert_eq!(args.file, PathBuf::from("flows.json"));
        assert_eq!(args.size.as_deref(), Some("800,600"));
        assert_eq!(args.margins.as_deref(), Some("10,20"));
        assert_eq!(args.position.as_deref(), Some("x,y"));
        assert_eq!(args.scale.as_deref(), Some("2.5"));
        assert_eq!(args.font_size.as_deref(), Some("14"));
        assert_eq!(args.node_values.as_deref(), Some(".1f"));
    }

    #[test]
    fn file_argument_is_required() {
        assert!(Args::try_parse_from(["sankey-svg"]).is_err());
    }
}
