//! Chromaticity-domain validity test.
//!
//! A point is classified against two Robertson 1968 isotemperature lines, one
//! per bound of a temperature range. The side-of-line test is a 2D cross
//! product whose vector order and `<= 0` comparison are load-bearing: flipping
//! either inverts every classification.

use serde::Serialize;

use crate::colorimetry::{Colorimetry, Xy};

/// Perpendicular offset from the Planckian locus used for line endpoints
pub const ISOTEMPERATURE_DUV: f64 = 0.025;

/// Range used when no method-specific range applies (K)
pub const DEFAULT_T_LOW: f64 = 2500.0;
pub const DEFAULT_T_HIGH: f64 = 10000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureRange {
    pub low: f64,
    pub high: f64,
}

impl TemperatureRange {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }
}

impl Default for TemperatureRange {
    fn default() -> Self {
        Self::new(DEFAULT_T_LOW, DEFAULT_T_HIGH)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainClassification {
    Inside,
    BeyondHigh,
    BeyondLow,
}

/// Segment in xy across the Planckian locus at a fixed temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsotemperatureLine {
    pub kelvin: f64,
    /// Endpoint at `-ISOTEMPERATURE_DUV`
    pub start: Xy,
    /// Endpoint at `+ISOTEMPERATURE_DUV`
    pub end: Xy,
}

impl IsotemperatureLine {
    pub fn at<C: Colorimetry + ?Sized>(colorimetry: &C, kelvin: f64) -> Self {
        let start =
            colorimetry.uv_to_xy(colorimetry.cct_to_uv_robertson(kelvin, -ISOTEMPERATURE_DUV));
        let end =
            colorimetry.uv_to_xy(colorimetry.cct_to_uv_robertson(kelvin, ISOTEMPERATURE_DUV));
        Self { kelvin, start, end }
    }

    /// Cross product of `end - start` and `end - point`, compared with `<= 0`.
    pub fn is_below(&self, point: Xy) -> bool {
        let (x1, y1) = (self.start.x, self.start.y);
        let (x2, y2) = (self.end.x, self.end.y);

        let v1 = (x2 - x1, y2 - y1);
        let v2 = (x2 - point.x, y2 - point.y);
        let cross = v1.0 * v2.1 - v1.1 * v2.0;

        cross <= 0.0
    }
}

/// Classify `point` against `range`.
///
/// `BeyondLow` wins over `BeyondHigh` when both lines reject the point. NaN
/// coordinates compare false and therefore land in `BeyondLow`.
pub fn classify<C: Colorimetry + ?Sized>(
    colorimetry: &C,
    point: Xy,
    range: TemperatureRange,
) -> DomainClassification {
    let below_low = IsotemperatureLine::at(colorimetry, range.low).is_below(point);
    let below_high = IsotemperatureLine::at(colorimetry, range.high).is_below(point);

    if !below_low {
        DomainClassification::BeyondLow
    } else if below_high {
        DomainClassification::BeyondHigh
    } else {
        DomainClassification::Inside
    }
}
