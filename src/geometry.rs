//! Command stream decoding and polygon ring classification.
//!
//! Geometry is a sequence of command integers (id in the low 3 bits, repeat
//! count in the rest) interleaved with zigzag-encoded coordinate deltas.
//! Every entry point here takes the buffer and the offset of the geometry
//! length prefix explicitly, so decoding is a pure function of its inputs.

use geo_types::Coord;
use tracing::trace;

use crate::error::{Error, Result};
use crate::pbf::PbfReader;

pub type Point = Coord<i32>;
pub type Ring = Vec<Point>;
pub type Polygon = Vec<Ring>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveTo,
    LineTo,
    ClosePath,
}

impl Command {
    fn from_id(id: u32) -> Result<Self> {
        match id {
            1 => Ok(Command::MoveTo),
            2 => Ok(Command::LineTo),
            7 => Ok(Command::ClosePath),
            other => Err(Error::format(format!("unknown geometry command {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    MoveTo(Point),
    LineTo(Point),
    ClosePath,
}

struct CommandStream<'a> {
    pbf: PbfReader<'a>,
    command: Command,
    remaining: i64,
    cursor: Point,
}

impl<'a> CommandStream<'a> {
    fn at(data: &'a [u8], offset: usize) -> Result<Self> {
        let body = PbfReader::at(data, offset)?.read_bytes()?;
        Ok(Self {
            pbf: PbfReader::new(body),
            command: Command::MoveTo,
            remaining: 0,
            cursor: Point { x: 0, y: 0 },
        })
    }

    fn step(&mut self) -> Result<Step> {
        if self.remaining <= 0 {
            let command = self.pbf.read_uint32()?;
            self.command = Command::from_id(command & 0x7)?;
            self.remaining = i64::from(command >> 3);
        }
        self.remaining -= 1;

        match self.command {
            Command::MoveTo | Command::LineTo => {
                let dx = self.pbf.read_sint32()?;
                let dy = self.pbf.read_sint32()?;
                self.cursor.x = self.cursor.x.wrapping_add(dx);
                self.cursor.y = self.cursor.y.wrapping_add(dy);
                if self.command == Command::MoveTo {
                    Ok(Step::MoveTo(self.cursor))
                } else {
                    Ok(Step::LineTo(self.cursor))
                }
            }
            Command::ClosePath => Ok(Step::ClosePath),
        }
    }
}

impl Iterator for CommandStream<'_> {
    type Item = Result<Step>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pbf.is_empty() {
            return None;
        }
        let step = self.step();
        if step.is_err() {
            // Stop after the first error instead of decoding garbage.
            self.pbf = PbfReader::new(&[]);
        }
        Some(step)
    }
}

/// Decodes the geometry at `offset` into lines (or rings, or single points).
pub fn decode_geometry(data: &[u8], offset: usize) -> Result<Vec<Vec<Point>>> {
    let mut lines = Vec::new();
    let mut line: Option<Vec<Point>> = None;

    for step in CommandStream::at(data, offset)? {
        match step? {
            Step::MoveTo(point) => {
                if let Some(open) = line.take() {
                    lines.push(open);
                }
                line = Some(vec![point]);
            }
            Step::LineTo(point) => line.get_or_insert_with(Vec::new).push(point),
            Step::ClosePath => {
                if let Some(open) = line.as_mut() {
                    if let Some(&first) = open.first() {
                        open.push(first);
                    }
                }
            }
        }
    }

    if let Some(open) = line {
        lines.push(open);
    }
    Ok(lines)
}

/// `[x_min, y_min, x_max, y_max]` of the geometry at `offset`, `None` when it has no points.
pub fn decode_bbox(data: &[u8], offset: usize) -> Result<Option<[i32; 4]>> {
    let mut bounds: Option<[i32; 4]> = None;
    for step in CommandStream::at(data, offset)? {
        let point = match step? {
            Step::MoveTo(point) | Step::LineTo(point) => point,
            Step::ClosePath => continue,
        };
        bounds = Some(match bounds {
            None => [point.x, point.y, point.x, point.y],
            Some([x_min, y_min, x_max, y_max]) => [
                x_min.min(point.x),
                y_min.min(point.y),
                x_max.max(point.x),
                y_max.max(point.y),
            ],
        });
    }
    Ok(bounds)
}

/// Twice the surveyor's-formula area; positive for exterior rings in tile space (y down).
/// Accumulates in `i128`; rings spanning the full `i32` range overflow `i64`.
pub fn signed_area(ring: &[Point]) -> i128 {
    let Some(&last) = ring.last() else {
        return 0;
    };
    let mut prev = last;
    let mut sum = 0i128;
    for &point in ring {
        sum += i128::from(prev.x) * i128::from(point.y)
            - i128::from(point.x) * i128::from(prev.y);
        prev = point;
    }
    sum
}

/// Groups rings into polygons: a positive ring opens a polygon, negative rings are its holes.
pub fn classify_rings(rings: Vec<Ring>) -> Vec<Polygon> {
    if rings.len() <= 1 {
        return match rings.first() {
            Some(ring) if signed_area(ring) == 0 => {
                trace!(points = ring.len(), "dropping degenerate ring");
                Vec::new()
            }
            Some(_) => vec![rings],
            None => Vec::new(),
        };
    }

    let mut polygons: Vec<Polygon> = Vec::new();
    for ring in rings {
        let area = signed_area(&ring);
        if area > 0 {
            polygons.push(vec![ring]);
        } else if area < 0 {
            match polygons.last_mut() {
                Some(polygon) => polygon.push(ring),
                None => trace!(points = ring.len(), "dropping hole before any outer ring"),
            }
        } else {
            trace!(points = ring.len(), "dropping degenerate ring");
        }
    }
    polygons
}
