//! Lazy decoding of Mapbox Vector Tiles.
//!
//! [`Tile`] indexes layers and their feature offsets without decoding any
//! feature. Features are decoded on request through [`Layer::feature`], and
//! their geometry is decoded again from the borrowed buffer every time it is
//! asked for.

pub mod cli;
pub mod error;
pub mod feature;
pub mod format;
pub mod geojson;
pub mod geometry;
pub mod layer;
pub mod output;
pub mod pbf;
pub mod tile;
pub mod types;
pub mod value;

pub use error::{Error, Result};
pub use feature::{Feature, GeomType, Properties};
pub use geojson::{FeatureCollection, GeoJsonFeature, GeoJsonGeometry, TileProjection};
pub use geometry::{Point, Polygon, Ring};
pub use layer::Layer;
pub use tile::{DecodeOptions, Tile};
pub use value::{Integer, NumberPolicy, Value};
