//! Module registry and palette.
//!
//! The [`ModuleRegistry`] stores module factories keyed by symbolic name,
//! together with the [`PluginInfo`] each module registered with. It is an
//! ordinary value owned by the host: build one at startup, register module
//! types, and hand it to whatever creates workflows. Duplicate registrations
//! for the same name are rejected.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::category::Category;
use crate::error::{ParameterError, RegistryError};
use crate::module::{Module, create_module};

/// Builds a fresh module with its parameters declared.
pub type ModuleFactory = fn() -> Result<Box<dyn Module>, ParameterError>;

/// Ordering weight for modules that share a palette folder.
///
/// Higher priorities are listed first.
#[derive(Debug, Clone, Copy)]
pub struct Priority(f64);

impl Priority {
    /// Listed before everything else.
    pub const FIRST: Self = Self(f64::INFINITY);
    /// Extremely high priority.
    pub const EXTREMELY_HIGH: Self = Self(1_000_000.0);
    /// Very high priority.
    pub const VERY_HIGH: Self = Self(10_000.0);
    /// High priority.
    pub const HIGH: Self = Self(100.0);
    /// The default.
    pub const NORMAL: Self = Self(0.0);
    /// Low priority.
    pub const LOW: Self = Self(-100.0);
    /// Very low priority.
    pub const VERY_LOW: Self = Self(-10_000.0);
    /// Extremely low priority.
    pub const EXTREMELY_LOW: Self = Self(-1_000_000.0);
    /// Listed after everything else.
    pub const LAST: Self = Self(f64::NEG_INFINITY);

    /// Creates a custom priority.
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Returns the numeric weight.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl PartialEq for Priority {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Priority {}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Registration attributes of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginInfo {
    /// Ordering weight within a palette folder.
    pub priority: Priority,
    /// `false` hides the module from the palette; it can still be created
    /// by name.
    pub visible: bool,
}

impl Default for PluginInfo {
    fn default() -> Self {
        Self {
            priority: Priority::NORMAL,
            visible: true,
        }
    }
}

impl PluginInfo {
    /// Registration attributes for a hidden module.
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            visible: false,
            ..Self::default()
        }
    }

    /// Overrides the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// A registered module type.
#[derive(Debug, Clone)]
pub struct RegisteredModule {
    name: String,
    display_name: String,
    description: String,
    category: &'static Category,
    info: PluginInfo,
    factory: ModuleFactory,
}

impl RegisteredModule {
    /// Returns the symbolic name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the palette name.
    #[must_use]
    pub const fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the help text.
    #[must_use]
    pub const fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the palette folder.
    #[must_use]
    pub const fn category(&self) -> &'static Category {
        self.category
    }

    /// Returns the registration attributes.
    #[must_use]
    pub const fn info(&self) -> PluginInfo {
        self.info
    }
}

/// One palette row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteEntry {
    /// Symbolic module name, used with [`ModuleRegistry::create`].
    pub name: String,
    /// Name shown to the user.
    pub display_name: String,
    /// Registration priority.
    pub priority: Priority,
}

/// Registry of available module types.
///
/// # Example
///
/// ```
/// use mia_core::registry::{ModuleRegistry, PluginInfo};
///
/// let registry = ModuleRegistry::new();
/// assert!(registry.is_empty());
/// assert!(registry.create("Unknown").is_err());
/// let _ = PluginInfo::default();
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: HashMap<String, RegisteredModule>,
}

impl ModuleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module type.
    ///
    /// # Errors
    ///
    /// See [`ModuleRegistry::register_factory`].
    pub fn register<M>(&mut self, info: PluginInfo) -> Result<(), RegistryError>
    where
        M: Module + Default + 'static,
    {
        self.register_factory(info, boxed_module::<M>)
    }

    /// Registers a module factory.
    ///
    /// A prototype is built once to read the module's identity and check its
    /// parameter declarations.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidParameters`] if the module declares
    /// malformed parameters, [`RegistryError::EmptyName`] if its symbolic
    /// name is empty, and [`RegistryError::Duplicate`] if the name is taken.
    pub fn register_factory(
        &mut self,
        info: PluginInfo,
        factory: ModuleFactory,
    ) -> Result<(), RegistryError> {
        let prototype = factory().map_err(|source| RegistryError::InvalidParameters {
            name: String::from("<unregistered>"),
            source,
        })?;
        let name = prototype.name().to_owned();
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.modules.contains_key(&name) {
            return Err(RegistryError::Duplicate { name });
        }
        debug!(
            target: "mia::registry",
            module = %name,
            category = %prototype.category().path(),
            visible = info.visible,
            "registered module"
        );
        let entry = RegisteredModule {
            name: name.clone(),
            display_name: prototype.base().display_name().to_owned(),
            description: prototype.description().to_owned(),
            category: prototype.category(),
            info,
            factory,
        };
        self.modules.insert(name, entry);
        Ok(())
    }

    /// Creates a fresh instance of a registered module.
    ///
    /// Hidden modules can be created too.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] for unknown names.
    pub fn create(&self, name: &str) -> Result<Box<dyn Module>, RegistryError> {
        let entry = self.get(name).ok_or_else(|| RegistryError::NotFound {
            name: name.to_owned(),
        })?;
        (entry.factory)().map_err(|source| RegistryError::InvalidParameters {
            name: name.to_owned(),
            source,
        })
    }

    /// Looks up a registered module by symbolic name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RegisteredModule> {
        self.modules.get(name)
    }

    /// Returns the visible modules grouped by category path.
    ///
    /// Within a folder, higher priorities come first and ties are ordered by
    /// display name.
    #[must_use]
    pub fn palette(&self) -> BTreeMap<String, Vec<PaletteEntry>> {
        let mut palette: BTreeMap<String, Vec<PaletteEntry>> = BTreeMap::new();
        for entry in self.modules.values().filter(|m| m.info.visible) {
            palette
                .entry(entry.category.path())
                .or_default()
                .push(PaletteEntry {
                    name: entry.name.clone(),
                    display_name: entry.display_name.clone(),
                    priority: entry.info.priority,
                });
        }
        for entries in palette.values_mut() {
            entries.sort_by(|a, b| {
                b.priority
                    .cmp(&a.priority)
                    .then_with(|| a.display_name.cmp(&b.display_name))
            });
        }
        palette
    }

    /// Returns the number of registered modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

fn boxed_module<M>() -> Result<Box<dyn Module>, ParameterError>
where
    M: Module + Default + 'static,
{
    Ok(Box::new(create_module::<M>()?))
}
