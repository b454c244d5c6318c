use std::collections::BTreeMap;

use anyhow::{Context, Result};
use clap::Parser;

use vt_reader::cli::{Cli, Command, GeojsonFormat, ReportFormat};
use vt_reader::format::read_tile_file;
use vt_reader::output::{format_layer_table, ndjson_lines, summarize_tile};
use vt_reader::types::parse_tile_spec;
use vt_reader::{DecodeOptions, Tile};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log);

    match cli.command {
        Command::Layers(args) => {
            let payload = read_tile_file(&args.input)?;
            let tile = Tile::new(&payload).context("decode vector tile")?;
            let summaries = summarize_tile(&tile);
            match args.output {
                ReportFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&summaries)?);
                }
                ReportFormat::Text => {
                    for line in format_layer_table(&summaries) {
                        println!("{}", line);
                    }
                }
            }
        }
        Command::Geojson(args) => {
            let coord = parse_tile_spec(&args.tile)?;
            let payload = read_tile_file(&args.input)?;
            let options = DecodeOptions {
                numbers: args.numbers.into(),
            };
            let tile = Tile::with_options(&payload, options).context("decode vector tile")?;
            for name in args.layer.iter() {
                if tile.layer(name).is_none() {
                    anyhow::bail!("layer not found: {name}");
                }
            }
            let mut collections = Vec::new();
            for (name, layer) in tile.layers() {
                if !args.layer.is_empty() && !args.layer.iter().any(|wanted| wanted == name) {
                    continue;
                }
                let collection = layer
                    .to_geojson(coord.x, coord.y, coord.zoom)
                    .with_context(|| format!("project layer {name}"))?;
                collections.push((name.to_string(), collection));
            }
            match args.output {
                GeojsonFormat::Json => {
                    let by_layer: BTreeMap<_, _> = collections.into_iter().collect();
                    println!("{}", serde_json::to_string_pretty(&by_layer)?);
                }
                GeojsonFormat::Ndjson => {
                    for line in ndjson_lines(&collections)? {
                        println!("{}", line);
                    }
                }
            }
        }
        Command::Bbox(args) => {
            let payload = read_tile_file(&args.input)?;
            let tile = Tile::new(&payload).context("decode vector tile")?;
            let layer = tile
                .layer(&args.layer)
                .with_context(|| format!("layer not found: {}", args.layer))?;
            let feature = layer.feature(args.index)?;
            match feature.bbox()? {
                Some([x_min, y_min, x_max, y_max]) => {
                    println!("{} {} {} {}", x_min, y_min, x_max, y_max)
                }
                None => println!("empty"),
            }
        }
    }

    Ok(())
}

fn init_tracing(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_new(level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
