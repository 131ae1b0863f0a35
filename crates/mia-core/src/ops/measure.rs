//! Intensity measurement over object coordinates.

use crate::image::Image;
use crate::object::Obj;

/// Running statistics accumulated one value at a time.
///
/// Uses Welford's update so the variance stays stable for long runs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CumStat {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
    sum: f64,
}

impl CumStat {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one value.
    #[expect(
        clippy::cast_precision_loss,
        reason = "sample counts stay far below 2^52"
    )]
    pub fn add(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.count += 1;
        self.sum += value;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    /// Returns the number of values added.
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Returns the mean, or NaN when empty.
    #[must_use]
    pub const fn mean(&self) -> f64 {
        if self.count == 0 { f64::NAN } else { self.mean }
    }

    /// Returns the minimum, or NaN when empty.
    #[must_use]
    pub const fn min(&self) -> f64 {
        if self.count == 0 { f64::NAN } else { self.min }
    }

    /// Returns the maximum, or NaN when empty.
    #[must_use]
    pub const fn max(&self) -> f64 {
        if self.count == 0 { f64::NAN } else { self.max }
    }

    /// Returns the sum of all values.
    #[must_use]
    pub const fn sum(&self) -> f64 {
        self.sum
    }

    /// Returns the population standard deviation, or NaN when empty.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "sample counts stay far below 2^52"
    )]
    pub fn std(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            (self.m2 / self.count as f64).sqrt()
        }
    }
}

impl Extend<f64> for CumStat {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

/// Measures `image` over the coordinates of `obj`.
///
/// Reads channel 0 at the object's frame. Coordinates that fall outside
/// the image are ignored, so an object with no readable voxels yields an
/// empty [`CumStat`].
#[must_use]
pub fn measure_intensity(obj: &Obj, image: &Image) -> CumStat {
    let mut stat = CumStat::new();
    stat.extend(
        obj.points()
            .into_iter()
            .filter_map(|p| image.value_at(p.x, p.y, p.z, 0, obj.t()))
            .map(f64::from),
    );
    stat
}
