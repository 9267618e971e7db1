//! The normalized metadata record returned with every import.
//!
//! All three providers fill the same flat schema. Absent information is
//! encoded as `None` (serialized as `null`) or NaN, never by leaving a key
//! out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Location of the first raster row relative to the y-axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YOrigin {
    /// Row 0 is the upper border
    Upper,
    /// Row 0 is the lower border
    Lower,
}

impl YOrigin {
    /// The string form used in the metadata record
    pub fn as_str(&self) -> &'static str {
        match self {
            YOrigin::Upper => "upper",
            YOrigin::Lower => "lower",
        }
    }
}

/// Everything the metadata record holds except the time stamps
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geodata {
    /// PROJ.4 projection definition
    pub projection: Option<String>,
    /// x-coordinate of the lower-left corner of the data raster
    pub x1: f64,
    /// y-coordinate of the lower-left corner of the data raster
    pub y1: f64,
    /// x-coordinate of the upper-right corner of the data raster
    pub x2: f64,
    /// y-coordinate of the upper-right corner of the data raster
    pub y2: f64,
    /// Grid resolution in x-direction
    pub xpixelsize: f64,
    /// Grid resolution in y-direction
    pub ypixelsize: f64,
    /// Unit of the x and y coordinates
    pub cartesian_unit: String,
    /// Location of row 0
    pub yorigin: YOrigin,
    /// Data provider
    pub institution: String,
    /// Physical unit of the data
    pub unit: Option<String>,
    /// Transformation applied to the data
    pub transform: Option<String>,
    /// Minutes between time steps
    pub accutime: f64,
    /// Rain/no-rain threshold
    pub threshold: f64,
    /// Value assigned to no-rain pixels
    pub zerovalue: f64,
}

/// Metadata describing an imported precipitation field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    #[serde(flatten)]
    pub geodata: Geodata,
    /// One timestamp per time index, ascending
    pub time_stamps: Vec<DateTime<Utc>>,
}

impl Metadata {
    /// Combine derived geodata with the time stamps of the returned field
    pub fn new(geodata: Geodata, time_stamps: Vec<DateTime<Utc>>) -> Self {
        Self {
            geodata,
            time_stamps,
        }
    }

    /// Number of time steps described
    pub fn time_steps(&self) -> usize {
        self.time_stamps.len()
    }

    /// The record as a flat JSON object
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Normalize a precipitation units string.
///
/// `kg m-2` and `mm` are the same amount for water and both become `mm`;
/// anything else is passed through.
pub fn normalize_unit(units: &str) -> String {
    match units {
        "kg m-2" | "mm" => "mm".to_string(),
        other => other.to_string(),
    }
}
