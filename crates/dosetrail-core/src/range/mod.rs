//! Duration and dose range model.
//!
//! Reference tables encode "not specified" as a literal zero. Every bound is
//! therefore passed through [`defined`] on construction and on
//! deserialization, so the rest of the crate only ever sees `Option<f64>`.

mod dose;
mod duration;
mod units;

pub use dose::{classify_dose, DoseClass, DoseRange, RoaDose};
pub use duration::{DurationRange, RoaDuration};
pub use units::DurationUnits;

use serde::{Deserialize, Deserializer};

/// Map a raw bound to `None` when it is zero, negative or not finite.
pub fn defined(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

pub(crate) fn deserialize_defined<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(defined(raw))
}
