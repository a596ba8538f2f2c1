// models/src/medical/bmi.rs

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ValidationError, ValidationResult};

/// Weight category derived from a body-mass index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Underweight => "Underweight",
            Verdict::Normal => "Normal",
            Verdict::Overweight => "Overweight",
            Verdict::Obese => "Obese",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computes `weight / height^2` rounded to two decimals, halves away from zero.
///
/// Squaring a decimal height in binary floating point leaves noise in the last
/// bits (`1.6 * 1.6` is `2.5600000000000005`), which would push exact ties such
/// as `40 / 2.56 = 15.625` below the half. A scaled value within
/// `TIE_TOLERANCE` (relative) of a half is treated as a tie so ties land where
/// decimal arithmetic puts them; anything further away rounds normally.
///
/// # Errors
/// Returns a `ValidationError` against `height` if it is not strictly positive.
pub fn compute_bmi(weight: f64, height: f64) -> ValidationResult<f64> {
    if height.is_nan() || height <= 0.0 {
        return Err(ValidationError::single("height", "must be greater than 0"));
    }
    Ok(round_bmi(weight, height))
}

// a few ulps of accumulated error, well below any decimal input's spacing
const TIE_TOLERANCE: f64 = 1e-12;

pub(crate) fn round_bmi(weight: f64, height: f64) -> f64 {
    let scaled = weight / (height * height) * 100.0;
    let magnitude = scaled.abs();
    let whole = magnitude.floor();
    let units = if (magnitude - whole - 0.5).abs() <= magnitude * TIE_TOLERANCE {
        whole + 1.0
    } else {
        magnitude.round()
    };
    units.copysign(scaled) / 100.0
}

/// Maps a BMI to its verdict. Ranges are checked in order and the first match
/// wins; anything no range claims, including `[24.9, 25)`, is `Obese`.
pub fn classify_verdict(bmi: f64) -> Verdict {
    if bmi < 18.5 {
        Verdict::Underweight
    } else if (18.5..24.9).contains(&bmi) {
        Verdict::Normal
    } else if (25.0..29.9).contains(&bmi) {
        Verdict::Overweight
    } else {
        Verdict::Obese
    }
}
