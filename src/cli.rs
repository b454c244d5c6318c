use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::value::NumberPolicy;

#[derive(Debug, Parser)]
#[command(name = "vt-reader", version, about = "Lazy Mapbox Vector Tile reader")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log level (error|warn|info|debug|trace)
    #[arg(long, default_value = "info", global = true)]
    pub log: String,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the layers of a tile
    Layers(LayersArgs),
    /// Project features to GeoJSON
    Geojson(GeojsonArgs),
    /// Print the local bounding box of one feature
    Bbox(BboxArgs),
}

#[derive(Debug, Args)]
pub struct LayersArgs {
    pub input: PathBuf,

    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub output: ReportFormat,
}

#[derive(Debug, Args)]
pub struct GeojsonArgs {
    pub input: PathBuf,

    /// Tile coordinate in z/x/y form
    #[arg(long)]
    pub tile: String,

    /// Only export these layers (repeatable)
    #[arg(long)]
    pub layer: Vec<String>,

    #[arg(long, value_enum, default_value_t = NumbersArg::Number)]
    pub numbers: NumbersArg,

    #[arg(long, value_enum, default_value_t = GeojsonFormat::Json)]
    pub output: GeojsonFormat,
}

#[derive(Debug, Args)]
pub struct BboxArgs {
    pub input: PathBuf,

    #[arg(long)]
    pub layer: String,

    #[arg(long)]
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GeojsonFormat {
    Json,
    Ndjson,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NumbersArg {
    Number,
    String,
    Bigint,
}

impl From<NumbersArg> for NumberPolicy {
    fn from(arg: NumbersArg) -> Self {
        match arg {
            NumbersArg::Number => NumberPolicy::Number,
            NumbersArg::String => NumberPolicy::String,
            NumbersArg::Bigint => NumberPolicy::BigInt,
        }
    }
}
