use std::f64::consts::PI;

use serde::Serialize;

use crate::feature::Properties;
use crate::geometry::Point;

/// Inverse spherical Mercator for one tile in the slippy-map scheme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileProjection {
    size: f64,
    x0: f64,
    y0: f64,
}

impl TileProjection {
    pub fn new(extent: u32, column: u32, row: u32, zoom: u8) -> Self {
        let extent = f64::from(extent);
        Self {
            size: extent * 2f64.powi(i32::from(zoom)),
            x0: extent * f64::from(column),
            y0: extent * f64::from(row),
        }
    }

    /// `[longitude, latitude]` of a tile-local point.
    pub fn project(&self, point: Point) -> [f64; 2] {
        let lon = (f64::from(point.x) + self.x0) * 360.0 / self.size - 180.0;
        let y2 = 180.0 - (f64::from(point.y) + self.y0) * 360.0 / self.size;
        let lat = (y2 * PI / 180.0).exp().atan() * 360.0 / PI - 90.0;
        [lon, lat]
    }

    pub fn project_line(&self, line: &[Point]) -> Vec<[f64; 2]> {
        line.iter().map(|&point| self.project(point)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum GeoJsonGeometry {
    Point([f64; 2]),
    MultiPoint(Vec<[f64; 2]>),
    LineString(Vec<[f64; 2]>),
    MultiLineString(Vec<Vec<[f64; 2]>>),
    Polygon(Vec<Vec<[f64; 2]>>),
    MultiPolygon(Vec<Vec<Vec<[f64; 2]>>>),
}

/// GeoJSON `Feature`. Unknown geometry types serialize with a `null` geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct GeoJsonFeature {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub geometry: Option<GeoJsonGeometry>,
    pub properties: Properties,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<GeoJsonFeature>,
}
