//! Text conversion for column values.

use std::fmt;

use tabula_foundation::{Error, Result, ValueKind};

use super::ColumnValue;

/// Formats values to text and parses them back.
pub trait Format<T>: fmt::Debug {
    /// Renders a value.
    fn format(&self, value: &T) -> String;

    /// Parses text into a value.
    ///
    /// # Errors
    ///
    /// Returns a parse error if `text` is not a valid value.
    fn parse(&self, text: &str) -> Result<T>;
}

/// The value kind's own textual form.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultFormat;

impl<T: ColumnValue> Format<T> for DefaultFormat {
    fn format(&self, value: &T) -> String {
        value.format_default()
    }

    fn parse(&self, text: &str) -> Result<T> {
        T::parse_default(text)
    }
}

/// Fixed number of decimal places for floating point columns.
#[derive(Copy, Clone, Debug)]
pub struct DecimalFormat {
    places: usize,
}

impl DecimalFormat {
    /// Creates a format rendering `places` digits after the point.
    #[must_use]
    pub const fn new(places: usize) -> Self {
        Self { places }
    }
}

impl Format<f64> for DecimalFormat {
    fn format(&self, value: &f64) -> String {
        format!("{value:.*}", self.places)
    }

    fn parse(&self, text: &str) -> Result<f64> {
        text.trim()
            .parse()
            .map_err(|e| Error::parse(text, ValueKind::Double, format!("{e}")))
    }
}

impl Format<f32> for DecimalFormat {
    fn format(&self, value: &f32) -> String {
        format!("{value:.*}", self.places)
    }

    fn parse(&self, text: &str) -> Result<f32> {
        text.trim()
            .parse()
            .map_err(|e| Error::parse(text, ValueKind::Float, format!("{e}")))
    }
}
