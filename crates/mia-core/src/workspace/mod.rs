//! The per-run container of named images and object collections.
//!
//! A [`Workspace`] is owned by exactly one workflow run and modules execute
//! against it one at a time, so plain `&mut` access is all the sharing it
//! needs. Adding an artefact under an existing name replaces the old one.

use std::collections::{BTreeMap, HashMap};

use crate::image::Image;
use crate::object::Objs;

/// Named images, object collections and metadata for one workflow run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workspace {
    id: u32,
    images: HashMap<String, Image>,
    objects: HashMap<String, Objs>,
    metadata: BTreeMap<String, String>,
}

impl Workspace {
    /// Creates an empty workspace.
    #[must_use]
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Returns the workspace ID.
    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Looks up an image by exact name.
    #[must_use]
    pub fn image(&self, name: &str) -> Option<&Image> {
        self.images.get(name)
    }

    /// Looks up an image by exact name for editing.
    pub fn image_mut(&mut self, name: &str) -> Option<&mut Image> {
        self.images.get_mut(name)
    }

    /// Looks up an object collection by exact name.
    #[must_use]
    pub fn objects(&self, name: &str) -> Option<&Objs> {
        self.objects.get(name)
    }

    /// Looks up an object collection by exact name for editing.
    pub fn objects_mut(&mut self, name: &str) -> Option<&mut Objs> {
        self.objects.get_mut(name)
    }

    /// Borrows an image for reading and a collection for editing at once.
    pub fn image_and_objects_mut(
        &mut self,
        image: &str,
        objects: &str,
    ) -> Option<(&Image, &mut Objs)> {
        let found_image = self.images.get(image)?;
        let found_objects = self.objects.get_mut(objects)?;
        Some((found_image, found_objects))
    }

    /// Stores an image under its own name, returning any image it replaced.
    pub fn add_image(&mut self, image: Image) -> Option<Image> {
        self.images.insert(image.name().to_owned(), image)
    }

    /// Stores a collection under its own name, returning any it replaced.
    pub fn add_objects(&mut self, objects: Objs) -> Option<Objs> {
        self.objects.insert(objects.name().to_owned(), objects)
    }

    /// Removes an image.
    pub fn remove_image(&mut self, name: &str) -> Option<Image> {
        self.images.remove(name)
    }

    /// Removes an object collection.
    pub fn remove_objects(&mut self, name: &str) -> Option<Objs> {
        self.objects.remove(name)
    }

    /// Returns image names in sorted order.
    #[must_use]
    pub fn image_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.images.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Returns object collection names in sorted order.
    #[must_use]
    pub fn object_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.objects.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Sets a metadata value such as the source filename.
    pub fn add_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Returns all metadata.
    #[must_use]
    pub const fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }
}
