//! Palette categories.
//!
//! Categories form a tree with a single [`ROOT`]. Every category is a
//! `static` built by a `const fn`, so a custom category a plugin declares
//! exists before the host first enumerates modules and caches its palette.
//!
//! # Example
//!
//! ```
//! use mia_core::category::{self, Category};
//!
//! static EXAMPLES: Category =
//!     Category::new("Examples", "Modules used in examples", &category::ROOT, true);
//!
//! assert_eq!(EXAMPLES.path(), "Examples");
//! assert!(EXAMPLES.parent().is_some_and(Category::is_root));
//! ```

/// A node in the module palette tree.
#[derive(Debug)]
pub struct Category {
    name: &'static str,
    description: &'static str,
    parent: Option<&'static Self>,
    include_in_docs: bool,
}

impl Category {
    /// Declares a category beneath `parent`.
    #[must_use]
    pub const fn new(
        name: &'static str,
        description: &'static str,
        parent: &'static Self,
        include_in_docs: bool,
    ) -> Self {
        Self {
            name,
            description,
            parent: Some(parent),
            include_in_docs,
        }
    }

    const fn root() -> Self {
        Self {
            name: "",
            description: "Root of the module palette",
            parent: None,
            include_in_docs: false,
        }
    }

    /// Returns the category name shown in the palette.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the free-text description shown in help.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.description
    }

    /// Returns the parent category, or `None` for the root.
    #[must_use]
    pub const fn parent(&self) -> Option<&'static Self> {
        self.parent
    }

    /// Returns `true` when this category appears in generated docs.
    #[must_use]
    pub const fn include_in_docs(&self) -> bool {
        self.include_in_docs
    }

    /// Returns `true` for the palette root.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Returns the names from the first level below the root down to this
    /// category.
    #[must_use]
    pub fn segments(&self) -> Vec<&'static str> {
        let mut segments = Vec::new();
        let mut current = Some(self);
        while let Some(category) = current {
            if !category.is_root() {
                segments.push(category.name);
            }
            current = category.parent;
        }
        segments.reverse();
        segments
    }

    /// Returns the `/`-separated palette path (empty for the root).
    #[must_use]
    pub fn path(&self) -> String {
        self.segments().join("/")
    }

    /// Returns `true` if `self` is `other` or lies beneath it.
    #[must_use]
    pub fn is_within(&self, other: &Self) -> bool {
        let mut current = Some(self);
        while let Some(category) = current {
            if std::ptr::eq(category, other) {
                return true;
            }
            current = category.parent;
        }
        false
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.path() == other.path()
    }
}

impl Eq for Category {}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_root() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.path())
        }
    }
}

/// The palette root.
pub static ROOT: Category = Category::root();

/// Loading and saving images and objects.
pub static INPUT_OUTPUT: Category =
    Category::new("Input output", "Loading and saving images", &ROOT, true);

/// Image processing.
pub static IMAGES: Category = Category::new("Images", "Image processing", &ROOT, true);

/// Object detection, measurement and relationships.
pub static OBJECTS: Category = Category::new(
    "Objects",
    "Detection, measurement and relationships of objects",
    &ROOT,
    true,
);

/// Object measurement.
pub static OBJECTS_MEASURE: Category =
    Category::new("Measure", "Measuring object properties", &OBJECTS, true);

/// Overlays and visual output.
pub static VISUALISATION: Category =
    Category::new("Visualisation", "Overlays and image display", &ROOT, true);

/// Conditional execution and workflow control.
pub static WORKFLOW: Category = Category::new(
    "Workflow handling",
    "Conditional execution and workflow control",
    &ROOT,
    true,
);

/// Anything else.
pub static MISCELLANEOUS: Category =
    Category::new("Miscellaneous", "Modules without a better home", &ROOT, true);
