use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{Error, Result};
use crate::pbf::PbfReader;

/// Largest integer an IEEE-754 double carries exactly (2^53 - 1).
pub const MAX_SAFE_INTEGER: i128 = (1 << 53) - 1;

/// How 64-bit integer property values are surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberPolicy {
    /// Plain numbers; values beyond +/- 2^53 - 1 fail with `PrecisionLoss`.
    #[default]
    Number,
    /// Decimal text, always lossless.
    String,
    /// Native wide integer, always lossless.
    BigInt,
}

impl NumberPolicy {
    pub fn convert(self, value: i128) -> Result<Integer> {
        match self {
            NumberPolicy::Number => {
                if value.abs() > MAX_SAFE_INTEGER {
                    return Err(Error::PrecisionLoss {
                        value,
                        policy: self,
                    });
                }
                Ok(Integer::Number(value as i64))
            }
            NumberPolicy::String => Ok(Integer::Decimal(value.to_string())),
            NumberPolicy::BigInt => Ok(Integer::Big(value)),
        }
    }
}

impl fmt::Display for NumberPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NumberPolicy::Number => "number",
            NumberPolicy::String => "string",
            NumberPolicy::BigInt => "bigint",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Integer {
    Number(i64),
    Decimal(String),
    Big(i128),
}

impl Serialize for Integer {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Integer::Number(value) => serializer.serialize_i64(*value),
            Integer::Decimal(text) => serializer.serialize_str(text),
            // Values originate from 64-bit fields, so one of the narrow forms always fits.
            Integer::Big(value) => match (i64::try_from(*value), u64::try_from(*value)) {
                (Ok(signed), _) => serializer.serialize_i64(signed),
                (_, Ok(unsigned)) => serializer.serialize_u64(unsigned),
                _ => serializer.serialize_i128(*value),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Double(f64),
    String(String),
    Integer(Integer),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(text) => Some(text),
            Value::Integer(Integer::Decimal(text)) => Some(text),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(value) => Some(*value),
            Value::Integer(Integer::Number(value)) => Some(*value as f64),
            Value::Integer(Integer::Big(value)) => Some(*value as f64),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Double(value) => write!(f, "{value}"),
            Value::String(text) => f.write_str(text),
            Value::Integer(Integer::Number(value)) => write!(f, "{value}"),
            Value::Integer(Integer::Decimal(text)) => f.write_str(text),
            Value::Integer(Integer::Big(value)) => write!(f, "{value}"),
        }
    }
}

/// Decodes one `Value` message. The last recognised field wins; none yields `Null`.
pub fn decode_value(data: &[u8], policy: NumberPolicy) -> Result<Value> {
    let mut pbf = PbfReader::new(data);
    let mut value = Value::Null;
    while !pbf.is_empty() {
        let (field, wire) = pbf.read_tag()?;
        value = match field {
            1 => Value::String(pbf.read_string()?.to_owned()),
            2 => Value::Double(f64::from(pbf.read_float()?)),
            3 => Value::Double(pbf.read_double()?),
            4 => Value::Integer(policy.convert(i128::from(pbf.read_int64()?))?),
            5 => Value::Integer(policy.convert(i128::from(pbf.read_varint()?))?),
            6 => Value::Integer(policy.convert(i128::from(pbf.read_sint64()?))?),
            7 => Value::Bool(pbf.read_bool()?),
            _ => {
                pbf.skip(wire)?;
                continue;
            }
        };
    }
    Ok(value)
}
