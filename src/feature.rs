use std::collections::BTreeMap;

use geo_types::{LineString, MultiLineString, MultiPoint, MultiPolygon};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::geojson::{GeoJsonFeature, GeoJsonGeometry, TileProjection};
use crate::geometry::{self, Point, Polygon};
use crate::pbf::PbfReader;
use crate::value::Value;

pub type Properties = BTreeMap<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum GeomType {
    #[default]
    Unknown = 0,
    Point = 1,
    LineString = 2,
    Polygon = 3,
}

impl From<u32> for GeomType {
    fn from(value: u32) -> Self {
        match value {
            1 => GeomType::Point,
            2 => GeomType::LineString,
            3 => GeomType::Polygon,
            _ => GeomType::Unknown,
        }
    }
}

/// One decoded feature. Geometry stays encoded in the tile buffer until asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature<'a> {
    id: Option<String>,
    geom_type: GeomType,
    properties: Properties,
    extent: u32,
    data: &'a [u8],
    geometry: Option<usize>,
}

impl<'a> Feature<'a> {
    /// Decodes the feature message `data`, resolving tags against the layer tables.
    pub fn parse(data: &'a [u8], keys: &[&str], values: &[Value], extent: u32) -> Result<Self> {
        let mut pbf = PbfReader::new(data);
        let mut feature = Feature {
            id: None,
            geom_type: GeomType::Unknown,
            properties: Properties::new(),
            extent,
            data,
            geometry: None,
        };

        while !pbf.is_empty() {
            let (field, wire) = pbf.read_tag()?;
            match field {
                1 => feature.id = Some(pbf.read_int64()?.to_string()),
                2 => resolve_tags(pbf.read_bytes()?, keys, values, &mut feature.properties)?,
                3 => feature.geom_type = GeomType::from(pbf.read_uint32()?),
                4 => {
                    feature.geometry = Some(pbf.position());
                    pbf.read_bytes()?;
                }
                _ => pbf.skip(wire)?,
            }
        }
        Ok(feature)
    }

    /// Identifier in decimal form.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn geom_type(&self) -> GeomType {
        self.geom_type
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn extent(&self) -> u32 {
        self.extent
    }

    pub fn load_geometry(&self) -> Result<Vec<Vec<Point>>> {
        match self.geometry {
            Some(offset) => geometry::decode_geometry(self.data, offset),
            None => Ok(Vec::new()),
        }
    }

    pub fn bbox(&self) -> Result<Option<[i32; 4]>> {
        match self.geometry {
            Some(offset) => geometry::decode_bbox(self.data, offset),
            None => Ok(None),
        }
    }

    pub fn as_points(&self) -> Result<Option<Vec<Point>>> {
        if self.geom_type != GeomType::Point {
            return Ok(None);
        }
        Ok(Some(self.load_geometry()?.into_iter().flatten().collect()))
    }

    pub fn as_lines(&self) -> Result<Option<Vec<Vec<Point>>>> {
        if self.geom_type != GeomType::LineString {
            return Ok(None);
        }
        self.load_geometry().map(Some)
    }

    pub fn as_polygons(&self) -> Result<Option<Vec<Polygon>>> {
        if self.geom_type != GeomType::Polygon {
            return Ok(None);
        }
        Ok(Some(geometry::classify_rings(self.load_geometry()?)))
    }

    /// Projects the feature into longitude/latitude for tile `column`/`row` at `zoom`.
    pub fn to_geojson(&self, column: u32, row: u32, zoom: u8) -> Result<GeoJsonFeature> {
        let projection = TileProjection::new(self.extent, column, row, zoom);

        let geometry = match self.geom_type {
            GeomType::Point => {
                let points = self.as_points()?.unwrap_or_default();
                let mut coords = projection.project_line(&points);
                if coords.len() == 1 {
                    coords.pop().map(GeoJsonGeometry::Point)
                } else {
                    Some(GeoJsonGeometry::MultiPoint(coords))
                }
            }
            GeomType::LineString => {
                let mut lines: Vec<Vec<[f64; 2]>> = self
                    .load_geometry()?
                    .iter()
                    .map(|line| projection.project_line(line))
                    .collect();
                if lines.len() == 1 {
                    lines.pop().map(GeoJsonGeometry::LineString)
                } else {
                    Some(GeoJsonGeometry::MultiLineString(lines))
                }
            }
            GeomType::Polygon => {
                let mut polygons: Vec<Vec<Vec<[f64; 2]>>> = self
                    .as_polygons()?
                    .unwrap_or_default()
                    .iter()
                    .map(|polygon| {
                        polygon
                            .iter()
                            .map(|ring| projection.project_line(ring))
                            .collect()
                    })
                    .collect();
                if polygons.len() == 1 {
                    polygons.pop().map(GeoJsonGeometry::Polygon)
                } else {
                    Some(GeoJsonGeometry::MultiPolygon(polygons))
                }
            }
            GeomType::Unknown => None,
        };

        Ok(GeoJsonFeature {
            id: self.id.clone(),
            geometry,
            properties: self.properties.clone(),
        })
    }

    /// Local tile-space geometry as `geo_types`; `None` for unknown geometry types.
    pub fn to_geo(&self) -> Result<Option<geo_types::Geometry<i32>>> {
        let geometry: Option<geo_types::Geometry<i32>> = match self.geom_type {
            GeomType::Point => {
                let mut points = self.as_points()?.unwrap_or_default();
                if points.len() == 1 {
                    points.pop().map(|p| geo_types::Point::from(p).into())
                } else {
                    Some(MultiPoint::from(points).into())
                }
            }
            GeomType::LineString => {
                let mut lines: Vec<LineString<i32>> = self
                    .load_geometry()?
                    .into_iter()
                    .map(LineString::new)
                    .collect();
                if lines.len() == 1 {
                    lines.pop().map(Into::into)
                } else {
                    Some(MultiLineString::new(lines).into())
                }
            }
            GeomType::Polygon => {
                let mut polygons: Vec<geo_types::Polygon<i32>> = self
                    .as_polygons()?
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(to_geo_polygon)
                    .collect();
                if polygons.len() == 1 {
                    polygons.pop().map(Into::into)
                } else {
                    Some(MultiPolygon::new(polygons).into())
                }
            }
            GeomType::Unknown => None,
        };
        Ok(geometry)
    }
}

fn to_geo_polygon(rings: Polygon) -> Option<geo_types::Polygon<i32>> {
    let mut rings = rings.into_iter().map(LineString::new);
    let exterior = rings.next()?;
    Some(geo_types::Polygon::new(exterior, rings.collect()))
}

/// Adds one packed tag chunk to `properties`; a feature may split its tags across chunks.
fn resolve_tags(
    data: &[u8],
    keys: &[&str],
    values: &[Value],
    properties: &mut Properties,
) -> Result<()> {
    let mut pbf = PbfReader::new(data);
    while !pbf.is_empty() {
        let key_index = pbf.read_varint()?;
        if pbf.is_empty() {
            return Err(Error::format(format!(
                "tag key {key_index} has no matching value index"
            )));
        }
        let value_index = pbf.read_varint()?;
        let key = usize::try_from(key_index)
            .ok()
            .and_then(|index| keys.get(index))
            .ok_or_else(|| {
                Error::format(format!(
                    "key index {key_index} out of range ({} keys)",
                    keys.len()
                ))
            })?;
        let value = usize::try_from(value_index)
            .ok()
            .and_then(|index| values.get(index))
            .ok_or_else(|| {
                Error::format(format!(
                    "value index {value_index} out of range ({} values)",
                    values.len()
                ))
            })?;
        properties.insert((*key).to_owned(), value.clone());
    }
    Ok(())
}
