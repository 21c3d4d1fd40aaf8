use crate::config::load_config;
use crate::discovery::DiscoveryMode;
use crate::explorer::Explorer;
use crate::layout::Orientation;
use crate::logging;
use crate::store::EvolutionStore;
use crate::svg::SvgRenderer;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "evotree", version, about = "Evolution tree layout and SVG renderer")]
pub struct Args {
    /// Dataset JSON file
    pub data: PathBuf,

    /// Focal entity id (defaults to the first In-Training entity)
    #[arg(short = 'r', long = "root")]
    pub root: Option<String>,

    /// Collapse an entity's descendants; may be repeated
    #[arg(short = 'x', long = "collapse")]
    pub collapse: Vec<String>,

    /// Stack stages top to bottom
    #[arg(long = "vertical")]
    pub vertical: bool,

    /// Show the root's lineage instead of its connected component
    #[arg(long = "lineage")]
    pub lineage: bool,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value = "svg")]
    pub format: OutputFormat,

    /// Config JSON file
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Output file. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Json,
}

pub fn run() -> Result<()> {
    logging::init();
    let args = Args::parse();
    let output = execute(&args)?;
    write_output(&output, args.output.as_deref())
}

/// Run the pipeline for parsed arguments and return the rendered document.
pub fn execute(args: &Args) -> Result<String> {
    let mut config = load_config(args.config.as_deref())?;
    if args.vertical {
        config.layout.orientation = Orientation::Vertical;
    }
    if args.lineage {
        config.discovery = DiscoveryMode::Lineage;
    }

    let data = std::fs::read_to_string(&args.data)
        .with_context(|| format!("Failed to read {}", args.data.display()))?;
    let store = EvolutionStore::from_json(&data)
        .with_context(|| format!("Failed to load {}", args.data.display()))?;
    if !store.warnings().is_empty() {
        log::info!("{} dangling evolutions skipped", store.warnings().len());
    }

    let mut explorer = Explorer::new(store, &config);
    if let Some(root) = &args.root {
        explorer.set_root(root)?;
    }
    for id in &args.collapse {
        if !explorer.collapse_state().is_collapsed(id) {
            explorer.toggle_collapse(id);
        }
    }

    let layout = explorer.layout();
    log::info!(
        "Laid out {} nodes and {} connections around {}",
        layout.nodes.len(),
        layout.connections.len(),
        explorer.root().unwrap_or("<none>")
    );

    match args.format {
        OutputFormat::Svg => Ok(SvgRenderer::new(config.render).render(explorer.store(), &layout)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&layout).context("Failed to serialize layout")
        }
    }
}

fn write_output(contents: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, contents)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            print!("{}", contents);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let args = Args::try_parse_from([
            "evotree",
            "data.json",
            "--root",
            "agumon",
            "--collapse",
            "greymon",
            "-x",
            "meramon",
            "--vertical",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(args.data, PathBuf::from("data.json"));
        assert_eq!(args.root.as_deref(), Some("agumon"));
        assert_eq!(args.collapse, vec!["greymon", "meramon"]);
        assert!(args.vertical);
        assert!(!args.lineage);
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.output.is_none());
    }

    #[test]
    fn test_missing_data_file() {
        let args = Args::try_parse_from(["evotree", "/nonexistent/evotree-data.json"]).unwrap();
        let err = execute(&args).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
