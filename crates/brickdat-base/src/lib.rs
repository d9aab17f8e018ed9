use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// LDraw units per millimetre, from the convention 1 LDU = 0.4 mm.
pub const LDU_PER_MILLIMETER: f64 = 2.5;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[default]
    Inch,
    Foot,
    Millimeter,
    Centimeter,
    Meter,
}

impl LengthUnit {
    pub const fn millimeters_per_unit(self) -> f64 {
        match self {
            Self::Inch => 25.4,
            Self::Foot => 304.8,
            Self::Millimeter => 1.0,
            Self::Centimeter => 10.0,
            Self::Meter => 1000.0,
        }
    }

    pub fn to_millimeters(self, value: f64) -> f64 {
        value * self.millimeters_per_unit()
    }

    pub fn to_ldu(self, value: f64) -> f64 {
        self.to_millimeters(value) * LDU_PER_MILLIMETER
    }

    pub fn millimeters_to_unit(self, value: f64) -> f64 {
        value / self.millimeters_per_unit()
    }
}

impl FromStr for LengthUnit {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "in" | "inch" | "inches" => Ok(Self::Inch),
            "ft" | "foot" | "feet" => Ok(Self::Foot),
            "mm" | "millimeter" | "millimeters" => Ok(Self::Millimeter),
            "cm" | "centimeter" | "centimeters" => Ok(Self::Centimeter),
            "m" | "meter" | "meters" => Ok(Self::Meter),
            other => Err(Error::UnknownUnit(other.to_string())),
        }
    }
}

impl std::fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Inch => "in",
            Self::Foot => "ft",
            Self::Millimeter => "mm",
            Self::Centimeter => "cm",
            Self::Meter => "m",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Units {
    pub length: LengthUnit,
}

impl Units {
    pub const fn metric_mm() -> Self {
        Self {
            length: LengthUnit::Millimeter,
        }
    }

    pub const fn imperial_inch() -> Self {
        Self {
            length: LengthUnit::Inch,
        }
    }
}

/// Comparison tolerance, expressed in host length units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    pub linear: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self { linear: 1.0e-6 }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown length unit: {0}")]
    UnknownUnit(String),
}

pub type Result<T> = std::result::Result<T, Error>;
