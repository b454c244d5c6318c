use tracing::debug;

use crate::error::{Error, Result};
use crate::feature::Feature;
use crate::geojson::FeatureCollection;
use crate::pbf::PbfReader;
use crate::value::{NumberPolicy, Value, decode_value};

pub const DEFAULT_VERSION: u32 = 1;
pub const DEFAULT_EXTENT: u32 = 4096;

/// A decoded layer. Keys and values are decoded eagerly; features are only indexed.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer<'a> {
    name: &'a str,
    version: u32,
    extent: u32,
    data: &'a [u8],
    features: Vec<usize>,
    keys: Vec<&'a str>,
    values: Vec<Value>,
}

impl<'a> Layer<'a> {
    /// Scans the layer message `data`, recording where each feature starts.
    pub fn parse(data: &'a [u8], numbers: NumberPolicy) -> Result<Self> {
        let mut pbf = PbfReader::new(data);
        let mut layer = Layer {
            name: "",
            version: DEFAULT_VERSION,
            extent: DEFAULT_EXTENT,
            data,
            features: Vec::new(),
            keys: Vec::new(),
            values: Vec::new(),
        };

        while !pbf.is_empty() {
            let (field, wire) = pbf.read_tag()?;
            match field {
                15 => layer.version = pbf.read_uint32()?,
                1 => layer.name = pbf.read_string()?,
                5 => layer.extent = pbf.read_uint32()?,
                2 => {
                    layer.features.push(pbf.position());
                    pbf.read_bytes()?;
                }
                3 => layer.keys.push(pbf.read_string()?),
                4 => layer.values.push(decode_value(pbf.read_bytes()?, numbers)?),
                _ => pbf.skip(wire)?,
            }
        }

        if layer.extent == 0 {
            return Err(Error::format(format!(
                "layer {:?} declares a zero extent",
                layer.name
            )));
        }

        debug!(
            layer = layer.name,
            version = layer.version,
            extent = layer.extent,
            features = layer.features.len(),
            keys = layer.keys.len(),
            values = layer.values.len(),
            "decoded layer"
        );
        Ok(layer)
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn extent(&self) -> u32 {
        self.extent
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn keys(&self) -> &[&'a str] {
        &self.keys
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Decodes feature `index`; geometry stays encoded until requested.
    pub fn feature(&self, index: usize) -> Result<Feature<'a>> {
        let offset = *self.features.get(index).ok_or(Error::OutOfRange {
            index,
            len: self.features.len(),
        })?;
        let body = PbfReader::at(self.data, offset)?.read_bytes()?;
        Feature::parse(body, &self.keys, &self.values, self.extent)
    }

    pub fn features(&self) -> impl Iterator<Item = Result<Feature<'a>>> + '_ {
        (0..self.len()).map(move |index| self.feature(index))
    }

    pub fn to_geojson(&self, column: u32, row: u32, zoom: u8) -> Result<FeatureCollection> {
        let features = self
            .features()
            .map(|feature| feature?.to_geojson(column, row, zoom))
            .collect::<Result<Vec<_>>>()?;
        Ok(FeatureCollection { features })
    }
}
