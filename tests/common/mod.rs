//! Hand-written protobuf encoding for fixtures the `mvt` encoder cannot produce
//! (malformed tables, unusual winding, explicit command streams).

#![allow(dead_code)]

pub const MOVE_TO: u32 = 1;
pub const LINE_TO: u32 = 2;
pub const CLOSE_PATH: u32 = 7;

pub fn varint(buf: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        buf.push((value as u8) | 0x80);
        value >>= 7;
    }
    buf.push(value as u8);
}

pub fn zigzag(value: i32) -> u32 {
    ((value << 1) ^ (value >> 31)) as u32
}

pub fn command(id: u32, count: u32) -> u32 {
    (id & 0x7) | (count << 3)
}

#[derive(Default)]
pub struct Message(Vec<u8>);

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    fn tag(&mut self, field: u32, wire: u8) {
        varint(&mut self.0, (u64::from(field) << 3) | u64::from(wire));
    }

    pub fn varint(mut self, field: u32, value: u64) -> Self {
        self.tag(field, 0);
        varint(&mut self.0, value);
        self
    }

    pub fn bytes(mut self, field: u32, data: &[u8]) -> Self {
        self.tag(field, 2);
        varint(&mut self.0, data.len() as u64);
        self.0.extend_from_slice(data);
        self
    }

    pub fn string(self, field: u32, text: &str) -> Self {
        self.bytes(field, text.as_bytes())
    }

    pub fn float(mut self, field: u32, value: f32) -> Self {
        self.tag(field, 5);
        self.0.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn double(mut self, field: u32, value: f64) -> Self {
        self.tag(field, 1);
        self.0.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn packed(self, field: u32, values: &[u32]) -> Self {
        let mut body = Vec::new();
        for value in values {
            varint(&mut body, u64::from(*value));
        }
        self.bytes(field, &body)
    }

    pub fn build(self) -> Vec<u8> {
        self.0
    }
}

/// MoveTo with every point as its own parameter pair.
pub fn encode_points(points: &[(i32, i32)]) -> Vec<u32> {
    let mut out = vec![command(MOVE_TO, points.len() as u32)];
    let mut cursor = (0, 0);
    for &(x, y) in points {
        out.push(zigzag(x.wrapping_sub(cursor.0)));
        out.push(zigzag(y.wrapping_sub(cursor.1)));
        cursor = (x, y);
    }
    out
}

fn encode_paths(paths: &[&[(i32, i32)]], close: bool) -> Vec<u32> {
    let mut out = Vec::new();
    let mut cursor = (0, 0);
    for path in paths {
        let (first, rest) = path.split_first().expect("non-empty path");
        out.push(command(MOVE_TO, 1));
        out.push(zigzag(first.0.wrapping_sub(cursor.0)));
        out.push(zigzag(first.1.wrapping_sub(cursor.1)));
        cursor = *first;
        out.push(command(LINE_TO, rest.len() as u32));
        for &(x, y) in rest {
            out.push(zigzag(x.wrapping_sub(cursor.0)));
            out.push(zigzag(y.wrapping_sub(cursor.1)));
            cursor = (x, y);
        }
        if close {
            out.push(command(CLOSE_PATH, 1));
        }
    }
    out
}

pub fn encode_lines(lines: &[&[(i32, i32)]]) -> Vec<u32> {
    encode_paths(lines, false)
}

/// Rings without a repeated closing point; each one ends in ClosePath.
pub fn encode_rings(rings: &[&[(i32, i32)]]) -> Vec<u32> {
    encode_paths(rings, true)
}

pub fn feature(id: Option<u64>, tags: &[u32], geom_type: u32, geometry: &[u32]) -> Vec<u8> {
    let mut message = Message::new();
    if let Some(id) = id {
        message = message.varint(1, id);
    }
    message
        .packed(2, tags)
        .varint(3, u64::from(geom_type))
        .packed(4, geometry)
        .build()
}

pub fn string_value(text: &str) -> Vec<u8> {
    Message::new().string(1, text).build()
}

pub fn uint_value(value: u64) -> Vec<u8> {
    Message::new().varint(5, value).build()
}

pub fn layer(
    name: &str,
    extent: Option<u32>,
    keys: &[&str],
    values: &[Vec<u8>],
    features: &[Vec<u8>],
) -> Vec<u8> {
    let mut message = Message::new().varint(15, 2).string(1, name);
    for feature in features {
        message = message.bytes(2, feature);
    }
    for key in keys {
        message = message.string(3, key);
    }
    for value in values {
        message = message.bytes(4, value);
    }
    if let Some(extent) = extent {
        message = message.varint(5, u64::from(extent));
    }
    message.build()
}

pub fn tile(layers: &[Vec<u8>]) -> Vec<u8> {
    let mut message = Message::new();
    for layer in layers {
        message = message.bytes(3, layer);
    }
    message.build()
}

/// A one-layer, one-feature tile named "test".
pub fn single_feature_tile(geom_type: u32, geometry: &[u32]) -> Vec<u8> {
    tile(&[layer(
        "test",
        Some(4096),
        &[],
        &[],
        &[feature(Some(1), &[], geom_type, geometry)],
    )])
}
