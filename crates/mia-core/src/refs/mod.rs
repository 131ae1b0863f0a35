//! Reference declarations published to downstream modules.
//!
//! After any parameter edit the host asks each module which measurements,
//! metadata and relationships it will add. Modules answer with references
//! taken from their own [`RefCollection`] stores via
//! [`RefCollection::get_or_put`], so the same canonical instance is handed
//! out on every call and downstream modules bind to it stably. Stored
//! references are boxed, keeping their addresses fixed while the store
//! grows.

use std::collections::BTreeMap;

/// References returned by one reference-query hook.
pub type RefList<'a, R> = Vec<&'a R>;

/// A reference type stored in a [`RefCollection`].
pub trait Reference {
    /// Key identifying the reference within its store.
    type Key: Ord + Clone;

    /// Creates the canonical instance for `key`.
    fn from_key(key: &Self::Key) -> Self;
}

/// Keyed cache of canonical references.
#[derive(Debug)]
pub struct RefCollection<R: Reference> {
    entries: BTreeMap<R::Key, Box<R>>,
}

impl<R: Reference> Default for RefCollection<R> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<R: Reference> RefCollection<R> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored reference for `key`, creating it on first use.
    pub fn get_or_put(&mut self, key: R::Key) -> &mut R {
        self.entries
            .entry(key)
            .or_insert_with_key(|stored| Box::new(R::from_key(stored)))
    }

    /// Looks up a reference without creating it.
    #[must_use]
    pub fn get(&self, key: &R::Key) -> Option<&R> {
        self.entries.get(key).map(Box::as_ref)
    }

    /// Iterates stored references in key order.
    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.entries.values().map(Box::as_ref)
    }

    /// Returns the number of stored references.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Measurement references
// ---------------------------------------------------------------------------

/// A measurement a module adds to every object of one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjMeasurementRef {
    name: String,
    objects_name: String,
    description: String,
}

impl ObjMeasurementRef {
    /// Returns the measurement name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the collection the measurement is attached to.
    #[must_use]
    pub const fn objects_name(&self) -> &str {
        self.objects_name.as_str()
    }

    /// Points the reference at a collection.
    pub fn set_objects_name(&mut self, objects_name: impl Into<String>) {
        self.objects_name = objects_name.into();
    }

    /// Returns the help text.
    #[must_use]
    pub const fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Sets the help text.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }
}

impl Reference for ObjMeasurementRef {
    type Key = String;

    fn from_key(key: &String) -> Self {
        Self {
            name: key.clone(),
            objects_name: String::new(),
            description: String::new(),
        }
    }
}

/// A measurement a module adds to one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMeasurementRef {
    name: String,
    image_name: String,
    description: String,
}

impl ImageMeasurementRef {
    /// Returns the measurement name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the image the measurement is attached to.
    #[must_use]
    pub const fn image_name(&self) -> &str {
        self.image_name.as_str()
    }

    /// Points the reference at an image.
    pub fn set_image_name(&mut self, image_name: impl Into<String>) {
        self.image_name = image_name.into();
    }

    /// Returns the help text.
    #[must_use]
    pub const fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Sets the help text.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }
}

impl Reference for ImageMeasurementRef {
    type Key = String;

    fn from_key(key: &String) -> Self {
        Self {
            name: key.clone(),
            image_name: String::new(),
            description: String::new(),
        }
    }
}

/// A workspace metadata value a module adds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRef {
    name: String,
    description: String,
}

impl MetadataRef {
    /// Returns the metadata key.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the help text.
    #[must_use]
    pub const fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Sets the help text.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }
}

impl Reference for MetadataRef {
    type Key = String;

    fn from_key(key: &String) -> Self {
        Self {
            name: key.clone(),
            description: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Relationship references
// ---------------------------------------------------------------------------

/// A parent-child relationship between two collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentChildRef {
    parent: String,
    child: String,
}

impl ParentChildRef {
    /// Returns the parent collection name.
    #[must_use]
    pub const fn parent_name(&self) -> &str {
        self.parent.as_str()
    }

    /// Returns the child collection name.
    #[must_use]
    pub const fn child_name(&self) -> &str {
        self.child.as_str()
    }
}

impl Reference for ParentChildRef {
    type Key = (String, String);

    fn from_key((parent, child): &(String, String)) -> Self {
        Self {
            parent: parent.clone(),
            child: child.clone(),
        }
    }
}

/// Order-independent key for a partner relationship.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartnerKey(String, String);

impl PartnerKey {
    /// Builds the key; `(a, b)` and `(b, a)` produce the same key.
    #[must_use]
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        let (first, second) = (a.into(), b.into());
        if first <= second {
            Self(first, second)
        } else {
            Self(second, first)
        }
    }
}

/// A partner relationship between two collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnerRef {
    partner1: String,
    partner2: String,
}

impl PartnerRef {
    /// Returns the first collection name (lexically smaller).
    #[must_use]
    pub const fn partner1(&self) -> &str {
        self.partner1.as_str()
    }

    /// Returns the second collection name.
    #[must_use]
    pub const fn partner2(&self) -> &str {
        self.partner2.as_str()
    }

    /// Returns the other side of the relationship, if `name` is one side.
    #[must_use]
    pub fn partner_of(&self, name: &str) -> Option<&str> {
        if self.partner1 == name {
            Some(self.partner2.as_str())
        } else if self.partner2 == name {
            Some(self.partner1.as_str())
        } else {
            None
        }
    }
}

impl Reference for PartnerRef {
    type Key = PartnerKey;

    fn from_key(key: &PartnerKey) -> Self {
        Self {
            partner1: key.0.clone(),
            partner2: key.1.clone(),
        }
    }
}

/// Store of object measurement references keyed by measurement name.
pub type ObjMeasurementRefs = RefCollection<ObjMeasurementRef>;
/// Store of image measurement references keyed by measurement name.
pub type ImageMeasurementRefs = RefCollection<ImageMeasurementRef>;
/// Store of metadata references keyed by metadata name.
pub type MetadataRefs = RefCollection<MetadataRef>;
/// Store of parent-child references keyed by `(parent, child)`.
pub type ParentChildRefs = RefCollection<ParentChildRef>;
/// Store of partner references keyed by an unordered pair.
pub type PartnerRefs = RefCollection<PartnerRef>;

impl RefCollection<ParentChildRef> {
    /// Returns the canonical reference for a parent and child collection.
    pub fn get_or_put_pair(&mut self, parent: &str, child: &str) -> &mut ParentChildRef {
        self.get_or_put((parent.to_owned(), child.to_owned()))
    }
}

impl RefCollection<PartnerRef> {
    /// Returns the canonical reference for two partner collections in
    /// either order.
    pub fn get_or_put_pair(&mut self, a: &str, b: &str) -> &mut PartnerRef {
        self.get_or_put(PartnerKey::new(a, b))
    }
}

#[cfg(test)]
mod tests;
