//! Named numeric measurements attached to images and objects.

use serde::{Deserialize, Serialize};

/// A named measurement value. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    name: String,
    value: f64,
}

impl Measurement {
    /// Creates a measurement.
    #[must_use]
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Returns the measurement name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the measured value (NaN when undefined).
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }
}
