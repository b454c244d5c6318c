use std::collections::BTreeMap;

use tracing::trace;

use crate::error::Result;
use crate::layer::Layer;
use crate::pbf::PbfReader;
use crate::value::NumberPolicy;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    pub numbers: NumberPolicy,
}

/// A decoded vector tile borrowing its buffer. Layers without features are not kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile<'a> {
    layers: BTreeMap<&'a str, Layer<'a>>,
}

impl<'a> Tile<'a> {
    pub fn new(data: &'a [u8]) -> Result<Self> {
        Self::with_options(data, DecodeOptions::default())
    }

    pub fn with_options(data: &'a [u8], options: DecodeOptions) -> Result<Self> {
        let mut pbf = PbfReader::new(data);
        let mut layers = BTreeMap::new();
        while !pbf.is_empty() {
            let (field, wire) = pbf.read_tag()?;
            if field != 3 {
                pbf.skip(wire)?;
                continue;
            }
            let layer = Layer::parse(pbf.read_bytes()?, options.numbers)?;
            if layer.is_empty() {
                trace!(layer = layer.name(), "skipping layer without features");
                continue;
            }
            layers.insert(layer.name(), layer);
        }
        Ok(Self { layers })
    }

    pub fn layers(&self) -> &BTreeMap<&'a str, Layer<'a>> {
        &self.layers
    }

    pub fn layer(&self, name: &str) -> Option<&Layer<'a>> {
        self.layers.get(name)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
