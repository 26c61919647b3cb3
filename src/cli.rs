use crate::config::load_config;
use crate::ir::{LayoutOrientation, NodeId, Snapshot};
use crate::layout::recompute;
use crate::layout_dump::{RoutingDump, write_routing_dump};
use crate::measure::{GridRectProvider, NodeRectProvider};
use crate::theme::EdgePalette;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "ttroute",
    version,
    about = "Route tech-tree connections and report layout conflicts"
)]
pub struct Args {
    /// Snapshot JSON file or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Config JSON file (routing, scheduler and grid tunables)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Override the snapshot's tier orientation
    #[arg(long = "orientation", value_enum)]
    pub orientation: Option<OrientationArg>,

    /// Highlight the lineage of this node
    #[arg(long = "select")]
    pub select: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long = "pretty")]
    pub pretty: bool,

    /// Log every routing pass to stderr
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OrientationArg {
    Vertical,
    Horizontal,
}

impl From<OrientationArg> for LayoutOrientation {
    fn from(value: OrientationArg) -> Self {
        match value {
            OrientationArg::Vertical => LayoutOrientation::Vertical,
            OrientationArg::Horizontal => LayoutOrientation::Horizontal,
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(args.config.as_deref())
        .with_context(|| format!("failed to load config {:?}", args.config))?;
    let input = read_input(args.input.as_deref())?;
    let mut snapshot = Snapshot::from_json(&input).context("failed to parse snapshot")?;
    if let Some(orientation) = args.orientation {
        snapshot.state.orientation = orientation.into();
    }

    let provider: Box<dyn NodeRectProvider> = match snapshot.rects.take() {
        Some(rects) => Box::new(rects),
        None => Box::new(GridRectProvider::new(&snapshot.state, &config.grid)),
    };
    let result = recompute(&snapshot.state, provider.as_ref(), &config.routing);

    let selection = args.select.map(NodeId::new);
    let dump = RoutingDump::from_result(
        &result,
        &snapshot.state,
        selection.as_ref(),
        &EdgePalette::default(),
    );

    match args.output.as_deref() {
        Some(path) => write_routing_dump(path, &dump, args.pretty)?,
        None => println!("{}", dump.to_json(args.pretty)?),
    }
    Ok(())
}

fn default_log_filter(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "warn" }
}

/// Installs the process logger. `RUST_LOG` overrides the default filter.
fn init_logging(verbose: bool) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_log_filter(verbose)))
        .init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()));
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
