//! Colour values from layout JSON and their element form.

use std::fmt;

use serde_json::{Map, Value};

use super::config::value_type_name;
use crate::error::{LayoutError, Result};
use crate::schema::{SchemaRegistry, TypedObject};

/// Channels written by every colour element.
const CHANNELS: [&str; 3] = ["r", "g", "b"];

/// An RGB colour with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a 3-element numeric JSON array.
    ///
    /// # Errors
    /// `MalformedValue` unless the array has exactly three integral entries
    /// in `0..=255`.
    pub fn from_json(value: &Value) -> Result<Self> {
        let items = value.as_array().ok_or_else(|| {
            LayoutError::MalformedValue(format!(
                "colour must be a 3-element array, got {}",
                value_type_name(value)
            ))
        })?;
        if items.len() != 3 {
            return Err(LayoutError::MalformedValue(format!(
                "colour must have exactly 3 components, got {}",
                items.len()
            )));
        }
        Ok(Self::new(channel(&items[0])?, channel(&items[1])?, channel(&items[2])?))
    }

    /// Read the channels of an existing colour element.
    ///
    /// # Errors
    /// `UnknownAttribute` if the element has no `r`/`g`/`b`, `MalformedValue`
    /// if a channel is not an integer in range.
    pub fn from_object(color: &TypedObject) -> Result<Self> {
        let mut channels = [0u8; 3];
        for (slot, name) in channels.iter_mut().zip(CHANNELS) {
            let value = color.attr(name)?;
            *slot = value
                .as_i64()
                .and_then(|v| u8::try_from(v).ok())
                .ok_or_else(|| {
                    LayoutError::MalformedValue(format!(
                        "<{}> channel '{name}' is not a colour value: {value}",
                        color.tag()
                    ))
                })?;
        }
        let [r, g, b] = channels;
        Ok(Self::new(r, g, b))
    }

    /// Build a colour element of the named schema (`BGColor`, `AxesColor`, ...).
    ///
    /// # Errors
    /// `UnknownSchema` for an unregistered name, `UnknownAttribute` if the
    /// schema has no colour channels.
    pub fn to_object(self, registry: &SchemaRegistry, schema: &str) -> Result<TypedObject> {
        let mut color = registry.instantiate(schema)?;
        for (name, value) in CHANNELS.into_iter().zip([self.r, self.g, self.b]) {
            color.set_attr(name, i64::from(value))?;
        }
        Ok(color)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.r, self.g, self.b)
    }
}

fn channel(value: &Value) -> Result<u8> {
    let number = value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64));
    number
        .and_then(|n| u8::try_from(n).ok())
        .ok_or_else(|| {
            LayoutError::MalformedValue(format!("colour component {value} is not in 0..=255"))
        })
}

/// Resolve a colour given as a palette name or a literal array.
///
/// # Errors
/// `MissingConfigKey` (`color_palette.<name>`) for an unknown name,
/// `MalformedValue` for any other shape.
pub fn parse_color(value: &Value, palette: &Map<String, Value>) -> Result<Rgb> {
    match value {
        Value::String(name) => {
            let entry = palette
                .get(name)
                .ok_or_else(|| LayoutError::MissingConfigKey(format!("color_palette.{name}")))?;
            Rgb::from_json(entry)
        }
        Value::Array(_) => Rgb::from_json(value),
        other => Err(LayoutError::MalformedValue(format!(
            "colour must be a palette name or a 3-element array, got {}",
            value_type_name(other)
        ))),
    }
}
