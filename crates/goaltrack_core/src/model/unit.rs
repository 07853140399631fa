//! Measurement units and pure conversion.
//!
//! # Responsibility
//! - Define the unit vocabulary per measurement domain.
//! - Convert scalar values between units of the same domain.
//!
//! # Invariants
//! - Conversion never crosses domains; mixing distance and volume fails.
//! - `from == to` conversion returns the input unchanged.
//! - Conversion is side-effect free.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const METERS_PER_MILE: f64 = 1609.344;
const METERS_PER_KILOMETER: f64 = 1000.0;
const METERS_PER_FOOT: f64 = 0.3048;
const MILLILITERS_PER_OUNCE: f64 = 29.573_529_562_5;
const OUNCES_PER_CUP: f64 = 8.0;
const MILLILITERS_PER_LITER: f64 = 1000.0;

/// Physical quantity a unit measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasurementDomain {
    Distance,
    Volume,
}

impl Display for MeasurementDomain {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Distance => f.write_str("distance"),
            Self::Volume => f.write_str("volume"),
        }
    }
}

/// Distance units accepted by running goals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistanceUnit {
    Miles,
    Kilometers,
    Meters,
    Feet,
}

impl DistanceUnit {
    pub const ALL: [DistanceUnit; 4] = [Self::Miles, Self::Kilometers, Self::Meters, Self::Feet];

    fn meters_per_unit(self) -> f64 {
        match self {
            Self::Miles => METERS_PER_MILE,
            Self::Kilometers => METERS_PER_KILOMETER,
            Self::Meters => 1.0,
            Self::Feet => METERS_PER_FOOT,
        }
    }

    /// Converts `value` expressed in `self` into `to`.
    pub fn convert(self, value: f64, to: DistanceUnit) -> f64 {
        if self == to {
            return value;
        }
        value * self.meters_per_unit() / to.meters_per_unit()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Miles => "Miles",
            Self::Kilometers => "Kilometers",
            Self::Meters => "Meters",
            Self::Feet => "Feet",
        }
    }
}

/// Volume units accepted by water goals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolumeUnit {
    Ounces,
    Cups,
    Liters,
}

impl VolumeUnit {
    pub const ALL: [VolumeUnit; 3] = [Self::Ounces, Self::Cups, Self::Liters];

    fn milliliters_per_unit(self) -> f64 {
        match self {
            Self::Ounces => MILLILITERS_PER_OUNCE,
            Self::Cups => MILLILITERS_PER_OUNCE * OUNCES_PER_CUP,
            Self::Liters => MILLILITERS_PER_LITER,
        }
    }

    /// Converts `value` expressed in `self` into `to`.
    pub fn convert(self, value: f64, to: VolumeUnit) -> f64 {
        if self == to {
            return value;
        }
        value * self.milliliters_per_unit() / to.milliliters_per_unit()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ounces => "Ounces",
            Self::Cups => "Cups",
            Self::Liters => "Liters",
        }
    }
}

/// Any unit known to the tracker, tagged by domain.
///
/// Serialized as the bare unit name (`"Miles"`, `"Liters"`), which keeps the
/// persisted JSON free of domain wrappers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Unit {
    Distance(DistanceUnit),
    Volume(VolumeUnit),
}

impl Unit {
    pub fn domain(self) -> MeasurementDomain {
        match self {
            Self::Distance(_) => MeasurementDomain::Distance,
            Self::Volume(_) => MeasurementDomain::Volume,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Distance(unit) => unit.as_str(),
            Self::Volume(unit) => unit.as_str(),
        }
    }
}

impl From<DistanceUnit> for Unit {
    fn from(value: DistanceUnit) -> Self {
        Self::Distance(value)
    }
}

impl From<VolumeUnit> for Unit {
    fn from(value: VolumeUnit) -> Self {
        Self::Volume(value)
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when text does not name a known unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownUnit(pub String);

impl Display for UnknownUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown unit `{}`", self.0)
    }
}

impl Error for UnknownUnit {}

impl FromStr for Unit {
    type Err = UnknownUnit;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let unit = match value.trim().to_ascii_lowercase().as_str() {
            "miles" | "mile" | "mi" => DistanceUnit::Miles.into(),
            "kilometers" | "kilometer" | "km" => DistanceUnit::Kilometers.into(),
            "meters" | "meter" | "m" => DistanceUnit::Meters.into(),
            "feet" | "foot" | "ft" => DistanceUnit::Feet.into(),
            "ounces" | "ounce" | "oz" => VolumeUnit::Ounces.into(),
            "cups" | "cup" => VolumeUnit::Cups.into(),
            "liters" | "liter" | "l" => VolumeUnit::Liters.into(),
            _ => return Err(UnknownUnit(value.to_string())),
        };
        Ok(unit)
    }
}

/// Conversion failure between units of different domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionError {
    InvalidUnit { from: Unit, to: Unit },
}

impl Display for ConversionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUnit { from, to } => write!(
                f,
                "cannot convert {} ({}) to {} ({})",
                from,
                from.domain(),
                to,
                to.domain()
            ),
        }
    }
}

impl Error for ConversionError {}

/// Converts `value` from one unit into another unit of the same domain.
///
/// # Errors
/// - Returns `ConversionError::InvalidUnit` when `from` and `to` belong to
///   different measurement domains.
pub fn convert(value: f64, from: Unit, to: Unit) -> Result<f64, ConversionError> {
    match (from, to) {
        (Unit::Distance(from), Unit::Distance(to)) => Ok(from.convert(value, to)),
        (Unit::Volume(from), Unit::Volume(to)) => Ok(from.convert(value, to)),
        _ => Err(ConversionError::InvalidUnit { from, to }),
    }
}

/// Scalar value paired with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: f64,
    pub unit: Unit,
}

impl Measurement {
    pub fn new(value: f64, unit: impl Into<Unit>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }

    /// Re-expresses this measurement in `unit`.
    pub fn convert_to(self, unit: impl Into<Unit>) -> Result<Measurement, ConversionError> {
        let unit = unit.into();
        Ok(Measurement {
            value: convert(self.value, self.unit, unit)?,
            unit,
        })
    }
}
