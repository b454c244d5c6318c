use anyhow::Result;
use nu_ansi_term::Style;
use serde::Serialize;
use serde_json::json;

use crate::geojson::FeatureCollection;
use crate::tile::Tile;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerSummary {
    pub name: String,
    pub version: u32,
    pub extent: u32,
    pub feature_count: usize,
    pub key_count: usize,
    pub value_count: usize,
}

pub fn summarize_tile(tile: &Tile<'_>) -> Vec<LayerSummary> {
    tile.layers()
        .values()
        .map(|layer| LayerSummary {
            name: layer.name().to_string(),
            version: layer.version(),
            extent: layer.extent(),
            feature_count: layer.len(),
            key_count: layer.keys().len(),
            value_count: layer.values().len(),
        })
        .collect()
}

pub fn format_layer_table(layers: &[LayerSummary]) -> Vec<String> {
    let name_width = layers
        .iter()
        .map(|layer| layer.name.len())
        .max()
        .unwrap_or(0)
        .max("layer".len());
    let header = format!(
        "{:<name_width$}  {:>7}  {:>6}  {:>8}  {:>5}  {:>6}",
        "layer", "version", "extent", "features", "keys", "values"
    );
    let mut lines = vec![Style::new().bold().paint(header).to_string()];
    for layer in layers {
        lines.push(format!(
            "{:<name_width$}  {:>7}  {:>6}  {:>8}  {:>5}  {:>6}",
            layer.name,
            layer.version,
            layer.extent,
            layer.feature_count,
            layer.key_count,
            layer.value_count
        ));
    }
    let total: usize = layers.iter().map(|layer| layer.feature_count).sum();
    lines.push(format!("layers: {} features: {}", layers.len(), total));
    lines
}

/// One GeoJSON feature per line, tagged with its source layer.
pub fn ndjson_lines(collections: &[(String, FeatureCollection)]) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for (layer, collection) in collections {
        for feature in collection.features.iter() {
            let mut value = serde_json::to_value(feature)?;
            if let Some(object) = value.as_object_mut() {
                object.insert("layer".to_string(), json!(layer));
            }
            lines.push(serde_json::to_string(&value)?);
        }
    }
    Ok(lines)
}
