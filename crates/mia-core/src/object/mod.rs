//! Labelled spatial objects and their collections.
//!
//! An [`Objs`] collection owns its [`Obj`]s keyed by integer ID and knows
//! the spatiotemporal [`SpatialBounds`] they live in. Objects hold integer
//! coordinates, a single time index, measurements, and relationships to
//! objects in other collections. Relationships are stored as
//! `(collection name, ID)` pairs and are one-sided: [`Obj::add_child`] and
//! [`Obj::add_parent`] must both be called, or use [`Objs::link`] to set
//! both sides at once.

mod storage;

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{BoundsError, ObjectError};
use crate::image::{Calibration, Dimensions, Image};
use crate::measurement::Measurement;

use self::storage::CoordinateStore;
pub use self::storage::{Point, VolumeType};

/// Spatial and temporal limits shared by every object in a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialBounds {
    dimensions: Dimensions,
    calibration: Calibration,
}

impl SpatialBounds {
    /// Declares bounds explicitly.
    #[must_use]
    pub const fn new(dimensions: Dimensions, calibration: Calibration) -> Self {
        Self {
            dimensions,
            calibration,
        }
    }

    /// Takes the bounds of an image.
    #[must_use]
    pub fn from_image(image: &Image) -> Self {
        Self::new(image.dimensions(), image.calibration().clone())
    }

    /// Returns the extent.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Returns the physical calibration.
    #[must_use]
    pub const fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Returns `true` if the coordinate lies inside the spatial limits.
    #[must_use]
    pub fn contains(&self, x: i64, y: i64, z: i64) -> bool {
        let within = |value: i64, limit: u32| (0..i64::from(limit)).contains(&value);
        within(x, self.dimensions.width)
            && within(y, self.dimensions.height)
            && within(z, self.dimensions.slices)
    }

    fn check(&self, x: i64, y: i64, z: i64) -> Result<Point, BoundsError> {
        let error = || BoundsError {
            x,
            y,
            z,
            width: self.dimensions.width,
            height: self.dimensions.height,
            depth: self.dimensions.slices,
        };
        if !self.contains(x, y, z) {
            return Err(error());
        }
        match (u32::try_from(x), u32::try_from(y), u32::try_from(z)) {
            (Ok(px), Ok(py), Ok(pz)) => Ok(Point::new(px, py, pz)),
            _ => Err(error()),
        }
    }

    fn max_extent(&self) -> u32 {
        self.dimensions
            .width
            .max(self.dimensions.height)
            .max(self.dimensions.slices)
    }
}

/// Mean position of an object's coordinates, in pixel (and slice) units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Centroid {
    /// Mean X.
    pub x: f64,
    /// Mean Y.
    pub y: f64,
    /// Mean Z in slices.
    pub z: f64,
}

impl Centroid {
    /// Rounds each axis to the nearest integer coordinate.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "rounded centroids of in-bounds objects fit in i64"
    )]
    pub fn rounded(self) -> (i64, i64, i64) {
        (
            self.x.round() as i64,
            self.y.round() as i64,
            self.z.round() as i64,
        )
    }
}

/// A single labelled object at one time point.
#[derive(Debug, Clone, PartialEq)]
pub struct Obj {
    id: u32,
    collection: String,
    bounds: SpatialBounds,
    volume_type: VolumeType,
    coordinates: CoordinateStore,
    t: u32,
    measurements: BTreeMap<String, Measurement>,
    parents: BTreeMap<String, u32>,
    children: BTreeMap<String, BTreeSet<u32>>,
    partners: BTreeMap<String, BTreeSet<u32>>,
}

impl Obj {
    fn new(id: u32, collection: &str, bounds: &SpatialBounds, volume_type: VolumeType) -> Self {
        Self {
            id,
            collection: collection.to_owned(),
            bounds: bounds.clone(),
            volume_type,
            coordinates: CoordinateStore::new(volume_type, bounds.max_extent()),
            t: 0,
            measurements: BTreeMap::new(),
            parents: BTreeMap::new(),
            children: BTreeMap::new(),
            partners: BTreeMap::new(),
        }
    }

    /// Returns the object ID, unique within its collection.
    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Returns the name of the owning collection.
    #[must_use]
    pub const fn collection_name(&self) -> &str {
        self.collection.as_str()
    }

    /// Returns the storage kind chosen at creation.
    #[must_use]
    pub const fn volume_type(&self) -> VolumeType {
        self.volume_type
    }

    /// Adds a coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`BoundsError`] if the coordinate is outside the collection
    /// limits; the object is left unchanged.
    pub fn add(&mut self, x: i64, y: i64, z: i64) -> Result<(), BoundsError> {
        let point = self.bounds.check(x, y, z)?;
        self.coordinates.insert(point);
        Ok(())
    }

    /// Returns `true` if the coordinate belongs to the object.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        self.coordinates.contains(point)
    }

    /// Returns all coordinates ordered by slice, row, then column.
    #[must_use]
    pub fn points(&self) -> Vec<Point> {
        self.coordinates.points()
    }

    /// Returns the number of coordinates.
    #[must_use]
    pub fn size(&self) -> usize {
        self.coordinates.len()
    }

    /// Returns `true` when the object has no coordinates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Returns the time index.
    #[must_use]
    pub const fn t(&self) -> u32 {
        self.t
    }

    /// Sets the time index.
    pub const fn set_t(&mut self, t: u32) {
        self.t = t;
    }

    /// Returns the mean coordinate, or `None` for an empty object.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "object sizes and coordinates are far below 2^52"
    )]
    pub fn mean_centroid(&self) -> Option<Centroid> {
        let points = self.points();
        if points.is_empty() {
            return None;
        }
        let count = points.len() as f64;
        let (sx, sy, sz) = points.iter().fold((0.0, 0.0, 0.0), |(sx, sy, sz), p| {
            (
                sx + f64::from(p.x),
                sy + f64::from(p.y),
                sz + f64::from(p.z),
            )
        });
        Some(Centroid {
            x: sx / count,
            y: sy / count,
            z: sz / count,
        })
    }

    /// Attaches a measurement, replacing any with the same name.
    pub fn add_measurement(&mut self, measurement: Measurement) {
        self.measurements
            .insert(measurement.name().to_owned(), measurement);
    }

    /// Looks up a measurement by name.
    #[must_use]
    pub fn measurement(&self, name: &str) -> Option<&Measurement> {
        self.measurements.get(name)
    }

    /// Returns all measurements keyed by name.
    #[must_use]
    pub const fn measurements(&self) -> &BTreeMap<String, Measurement> {
        &self.measurements
    }

    /// Records `parent` as this object's parent in the parent's collection,
    /// replacing any previous parent from that collection.
    pub fn add_parent(&mut self, parent: &Self) {
        self.parents.insert(parent.collection.clone(), parent.id);
    }

    /// Records `child` as one of this object's children.
    pub fn add_child(&mut self, child: &Self) {
        self.children
            .entry(child.collection.clone())
            .or_default()
            .insert(child.id);
    }

    /// Records `partner` as a partner. Call on both objects for a symmetric
    /// relationship.
    pub fn add_partner(&mut self, partner: &Self) {
        self.partners
            .entry(partner.collection.clone())
            .or_default()
            .insert(partner.id);
    }

    /// Returns the parent ID in the named collection.
    #[must_use]
    pub fn parent(&self, collection: &str) -> Option<u32> {
        self.parents.get(collection).copied()
    }

    /// Returns parent IDs keyed by collection name.
    #[must_use]
    pub const fn parents(&self) -> &BTreeMap<String, u32> {
        &self.parents
    }

    /// Returns the child IDs in the named collection.
    pub fn children(&self, collection: &str) -> impl Iterator<Item = u32> + '_ {
        self.children
            .get(collection)
            .into_iter()
            .flat_map(|ids| ids.iter().copied())
    }

    /// Returns the partner IDs in the named collection.
    pub fn partners(&self, collection: &str) -> impl Iterator<Item = u32> + '_ {
        self.partners
            .get(collection)
            .into_iter()
            .flat_map(|ids| ids.iter().copied())
    }
}

/// One row of a collection's measurement table.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRow {
    /// Object ID.
    pub id: u32,
    /// Object time index.
    pub t: u32,
    /// Measurement values keyed by name.
    pub values: BTreeMap<String, f64>,
}

/// A named collection of objects sharing spatial bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Objs {
    name: String,
    bounds: SpatialBounds,
    objects: BTreeMap<u32, Obj>,
    next_id: Option<u32>,
}

impl Objs {
    /// Creates an empty collection with explicit bounds.
    #[must_use]
    pub fn new(name: impl Into<String>, bounds: SpatialBounds) -> Self {
        Self {
            name: name.into(),
            bounds,
            objects: BTreeMap::new(),
            next_id: Some(1),
        }
    }

    /// Creates an empty collection with the bounds of `reference`.
    #[must_use]
    pub fn with_reference(name: impl Into<String>, reference: &Self) -> Self {
        Self::new(name, reference.bounds.clone())
    }

    /// Creates an empty collection with the bounds of `image`.
    #[must_use]
    pub fn with_image(name: impl Into<String>, image: &Image) -> Self {
        Self::new(name, SpatialBounds::from_image(image))
    }

    /// Returns the collection name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the spatial bounds.
    #[must_use]
    pub const fn bounds(&self) -> &SpatialBounds {
        &self.bounds
    }

    /// Creates an empty object under a fresh ID and returns it for filling.
    ///
    /// IDs are never reused, even after the largest one has been handed out.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectError::IdsExhausted`] once `u32::MAX` has been used.
    pub fn create_and_add_new_object(
        &mut self,
        volume_type: VolumeType,
    ) -> Result<&mut Obj, ObjectError> {
        let Some(id) = self.next_id else {
            return Err(ObjectError::IdsExhausted {
                collection: self.name.clone(),
            });
        };
        self.next_id = id.checked_add(1);
        Ok(self
            .objects
            .entry(id)
            .or_insert_with(|| Obj::new(id, &self.name, &self.bounds, volume_type)))
    }

    /// Looks up an object by ID.
    #[must_use]
    pub fn get(&self, id: u32) -> Option<&Obj> {
        self.objects.get(&id)
    }

    /// Looks up an object by ID for editing.
    pub fn get_mut(&mut self, id: u32) -> Option<&mut Obj> {
        self.objects.get_mut(&id)
    }

    /// Iterates objects in ID order.
    pub fn values(&self) -> impl Iterator<Item = &Obj> {
        self.objects.values()
    }

    /// Iterates objects in ID order for editing.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Obj> {
        self.objects.values_mut()
    }

    /// Returns the IDs in ascending order.
    #[must_use]
    pub fn ids(&self) -> Vec<u32> {
        self.objects.keys().copied().collect()
    }

    /// Returns the number of objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` when the collection holds no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Returns the largest ID in use.
    #[must_use]
    pub fn max_id(&self) -> Option<u32> {
        self.objects.keys().next_back().copied()
    }

    /// Links a parent and a child in two different collections, updating
    /// both sides. Returns `false` if either ID is missing.
    pub fn link(parents: &mut Self, parent_id: u32, children: &mut Self, child_id: u32) -> bool {
        let (Some(parent), Some(child)) = (
            parents.objects.get_mut(&parent_id),
            children.objects.get_mut(&child_id),
        ) else {
            return false;
        };
        parent.add_child(child);
        child.add_parent(parent);
        true
    }

    /// Links two partners in two different collections, updating both sides.
    /// Returns `false` if either ID is missing.
    pub fn link_partners(first: &mut Self, first_id: u32, second: &mut Self, second_id: u32) -> bool {
        let (Some(a), Some(b)) = (
            first.objects.get_mut(&first_id),
            second.objects.get_mut(&second_id),
        ) else {
            return false;
        };
        a.add_partner(b);
        b.add_partner(a);
        true
    }

    /// Tabulates measurements per object in ID order.
    #[must_use]
    pub fn measurement_table(&self) -> Vec<MeasurementRow> {
        self.objects
            .values()
            .map(|obj| MeasurementRow {
                id: obj.id,
                t: obj.t,
                values: obj
                    .measurements
                    .values()
                    .map(|m| (m.name().to_owned(), m.value()))
                    .collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests;
