//! Parsing of externally produced shape payloads (imported JSON, generated
//! content). Every entry is checked; nothing is guessed.

use serde_json::Value;

use crate::core::{Error, Result};
use crate::voxel::voxel::{MAX_PACKED_RGB, parse_hex_color};
use super::target::Target;

/// Parse a JSON array of `{x, y, z, color}` objects.
///
/// Coordinates must be integral numbers. The color may be a number or a
/// `#RRGGBB` string and may also be given under the short key `c`.
pub fn parse_targets(json: &str) -> Result<Vec<Target>> {
    let value: Value = serde_json::from_str(json)?;
    targets_from_value(&value)
}

/// Same as [`parse_targets`] for an already-parsed document
pub fn targets_from_value(value: &Value) -> Result<Vec<Target>> {
    let entries = value
        .as_array()
        .ok_or_else(|| Error::Payload("expected a JSON array of voxels".into()))?;

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_entry(index, entry))
        .collect()
}

fn parse_entry(index: usize, entry: &Value) -> Result<Target> {
    let object = entry
        .as_object()
        .ok_or_else(|| Error::validation(index, "entry is not an object"))?;

    let coord = |key: &str| -> Result<i32> {
        let value = object
            .get(key)
            .ok_or_else(|| Error::validation(index, format!("missing {}", key)))?;
        parse_coordinate(value)
            .ok_or_else(|| Error::validation(index, format!("{} is not an integer: {}", key, value)))
    };

    let x = coord("x")?;
    let y = coord("y")?;
    let z = coord("z")?;

    let color_value = object
        .get("color")
        .or_else(|| object.get("c"))
        .ok_or_else(|| Error::validation(index, "missing color"))?;
    let color = parse_color(color_value)
        .ok_or_else(|| Error::validation(index, format!("unparsable color {}", color_value)))?;

    Ok(Target::new(x, y, z, color))
}

fn parse_coordinate(value: &Value) -> Option<i32> {
    if let Some(i) = value.as_i64() {
        return i32::try_from(i).ok();
    }
    let f = value.as_f64()?;
    if f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64 {
        Some(f as i32)
    } else {
        None
    }
}

fn parse_color(value: &Value) -> Option<u32> {
    match value {
        Value::String(text) => parse_hex_color(text),
        Value::Number(n) => match n.as_u64() {
            Some(c) => Some(c),
            None => n
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= MAX_PACKED_RGB as f64)
                .map(|f| f as u64),
        }
        .filter(|&c| c <= MAX_PACKED_RGB as u64)
        .map(|c| c as u32),
        _ => None,
    }
}
