//! Typed, self-describing module parameters.
//!
//! A module declares its [`Parameter`]s once, in order, into its
//! [`Parameters`] set. The host renders the subset a module reports as
//! visible, writes user edits back by name, and persists values through
//! [`ParameterValues`]. Lookups by name are the only way to reach a
//! parameter, so a module always reads the instance the host edited.
//!
//! # Example
//!
//! ```
//! use mia_core::parameter::{Parameter, Parameters};
//!
//! let mut parameters = Parameters::new("example");
//! parameters.add(Parameter::integer("Line width", 1)).expect("unique name");
//! parameters.set_from_text("Line width", "3").expect("integer input");
//!
//! let width: i64 = parameters.value("Line width", None).expect("declared");
//! assert_eq!(width, 3);
//! ```

mod value;

use std::collections::BTreeMap;

use crate::error::ParameterError;
use crate::workspace::Workspace;

pub use self::value::{ParameterType, ParameterValue, substitute_metadata};

/// Persisted parameter values keyed by parameter name.
pub type ParameterValues = BTreeMap<String, ParameterValue>;

/// Closed set of parameter kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterKind {
    /// Visual group header; holds no value.
    Separator,
    /// Name of an image already in the workspace.
    InputImage,
    /// Name of an object collection already in the workspace.
    InputObjects,
    /// Free-text name for an image this module creates.
    OutputImage,
    /// Free-text name for an object collection this module creates.
    OutputObjects,
    /// One of a fixed set of strings.
    Choice {
        /// Allowed values in display order.
        choices: Vec<String>,
    },
    /// An integer.
    Integer,
}

impl ParameterKind {
    /// Returns the kind's canonical label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Separator => "separator",
            Self::InputImage => "input_image",
            Self::InputObjects => "input_objects",
            Self::OutputImage => "output_image",
            Self::OutputObjects => "output_objects",
            Self::Choice { .. } => "choice",
            Self::Integer => "integer",
        }
    }

    /// Returns `true` when the user may edit the value.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        !matches!(self, Self::Separator)
    }

    /// Returns `true` for kinds whose value is text.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(
            self,
            Self::InputImage
                | Self::InputObjects
                | Self::OutputImage
                | Self::OutputObjects
                | Self::Choice { .. }
        )
    }

    /// Returns the control the host renders for this kind.
    #[must_use]
    pub const fn widget(&self) -> Widget {
        match self {
            Self::Separator => Widget::Header,
            Self::InputImage => Widget::ImageDropdown,
            Self::InputObjects => Widget::ObjectsDropdown,
            Self::OutputImage | Self::OutputObjects => Widget::TextField,
            Self::Choice { .. } => Widget::Dropdown,
            Self::Integer => Widget::NumericField,
        }
    }
}

impl std::fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// GUI control used to render a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Widget {
    /// Read-only group header.
    Header,
    /// Dropdown over workspace images.
    ImageDropdown,
    /// Dropdown over workspace object collections.
    ObjectsDropdown,
    /// Free text entry.
    TextField,
    /// Dropdown over a fixed set of strings.
    Dropdown,
    /// Numeric entry.
    NumericField,
}

/// A named, typed configuration entry owned by a module.
#[derive(Debug, PartialEq, Eq)]
pub struct Parameter {
    name: String,
    owner: String,
    kind: ParameterKind,
    value: ParameterValue,
    default: ParameterValue,
    description: String,
}

impl Parameter {
    fn new(name: impl Into<String>, kind: ParameterKind, default: ParameterValue) -> Self {
        Self {
            name: name.into(),
            owner: String::new(),
            kind,
            value: default.clone(),
            default,
            description: String::new(),
        }
    }

    /// Declares a separator.
    #[must_use]
    pub fn separator(name: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::Separator, ParameterValue::Empty)
    }

    /// Declares an input-image selector.
    #[must_use]
    pub fn input_image(name: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::InputImage, ParameterValue::from(""))
    }

    /// Declares an input-objects selector.
    #[must_use]
    pub fn input_objects(name: impl Into<String>) -> Self {
        Self::new(name, ParameterKind::InputObjects, ParameterValue::from(""))
    }

    /// Declares an output-image name with a default.
    #[must_use]
    pub fn output_image(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self::new(
            name,
            ParameterKind::OutputImage,
            ParameterValue::Text(default.into()),
        )
    }

    /// Declares an output-objects name with a default.
    #[must_use]
    pub fn output_objects(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self::new(
            name,
            ParameterKind::OutputObjects,
            ParameterValue::Text(default.into()),
        )
    }

    /// Declares a choice. The default must be one of `choices`; this is
    /// checked when the parameter is added to a [`Parameters`] set.
    #[must_use]
    pub fn choice(name: impl Into<String>, default: &str, choices: &[&str]) -> Self {
        Self::new(
            name,
            ParameterKind::Choice {
                choices: choices.iter().map(|c| (*c).to_owned()).collect(),
            },
            ParameterValue::from(default),
        )
    }

    /// Declares an integer with a default.
    #[must_use]
    pub fn integer(name: impl Into<String>, default: i64) -> Self {
        Self::new(name, ParameterKind::Integer, ParameterValue::Integer(default))
    }

    /// Attaches help text.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Returns the parameter name (also its GUI label).
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the symbolic name of the owning module.
    #[must_use]
    pub const fn owner(&self) -> &str {
        self.owner.as_str()
    }

    /// Returns the parameter kind.
    #[must_use]
    pub const fn kind(&self) -> &ParameterKind {
        &self.kind
    }

    /// Returns the current value.
    #[must_use]
    pub const fn value(&self) -> &ParameterValue {
        &self.value
    }

    /// Returns the default value.
    #[must_use]
    pub const fn default_value(&self) -> &ParameterValue {
        &self.default
    }

    /// Returns the help text.
    #[must_use]
    pub const fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the dropdown entries for selector kinds.
    ///
    /// Input selectors list the matching workspace artefacts (empty without a
    /// workspace); choices list their fixed set; other kinds have none.
    #[must_use]
    pub fn options(&self, workspace: Option<&Workspace>) -> Vec<String> {
        match (&self.kind, workspace) {
            (ParameterKind::InputImage, Some(ws)) => ws.image_names(),
            (ParameterKind::InputObjects, Some(ws)) => ws.object_names(),
            (ParameterKind::Choice { choices }, _) => choices.clone(),
            _ => Vec::new(),
        }
    }

    /// Replaces the value after checking it matches the kind.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::NotEditable`] for separators and
    /// [`ParameterError::WrongType`] when the value type does not match.
    pub fn set_value(&mut self, value: ParameterValue) -> Result<(), ParameterError> {
        if !self.kind.is_editable() {
            return Err(ParameterError::NotEditable {
                name: self.name.clone(),
            });
        }
        let matches = match &value {
            ParameterValue::Text(_) => self.kind.is_text(),
            ParameterValue::Integer(_) => self.kind == ParameterKind::Integer,
            ParameterValue::Empty => false,
        };
        if !matches {
            return Err(ParameterError::WrongType {
                name: self.name.clone(),
                expected: self.default.type_name(),
                actual: value.type_name(),
            });
        }
        self.value = value;
        Ok(())
    }

    /// Coerces raw user input into the parameter's value type.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::NotEditable`] for separators and
    /// [`ParameterError::InvalidInteger`] when integer input does not parse.
    pub fn set_from_text(&mut self, input: &str) -> Result<(), ParameterError> {
        let value = match self.kind {
            ParameterKind::Separator => {
                return Err(ParameterError::NotEditable {
                    name: self.name.clone(),
                });
            }
            ParameterKind::Integer => {
                let parsed = input.trim().parse::<i64>().map_err(|source| {
                    ParameterError::InvalidInteger {
                        name: self.name.clone(),
                        input: input.to_owned(),
                        source,
                    }
                })?;
                ParameterValue::Integer(parsed)
            }
            _ => ParameterValue::from(input),
        };
        self.value = value;
        Ok(())
    }

    /// Restores the default value.
    pub fn reset(&mut self) {
        self.value = self.default.clone();
    }

    /// Returns `true` when the current value is acceptable for the kind.
    ///
    /// Choices must hold one of their allowed values; artefact names must
    /// not be blank.
    #[must_use]
    pub fn verify(&self) -> bool {
        match (&self.kind, &self.value) {
            (ParameterKind::Separator, _) => true,
            (ParameterKind::Choice { choices }, ParameterValue::Text(value)) => {
                choices.iter().any(|choice| choice == value)
            }
            (ParameterKind::Integer, ParameterValue::Integer(_)) => true,
            (kind, ParameterValue::Text(value)) if kind.is_text() => !value.trim().is_empty(),
            _ => false,
        }
    }

    fn validate_declaration(&self) -> Result<(), ParameterError> {
        if let ParameterKind::Choice { choices } = &self.kind {
            let default = self.default.as_text().unwrap_or_default();
            if !choices.iter().any(|choice| choice == default) {
                return Err(ParameterError::ChoiceDefault {
                    name: self.name.clone(),
                    default: default.to_owned(),
                });
            }
        }
        Ok(())
    }
}

/// The ordered parameter set a module declares.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Parameters {
    owner: String,
    entries: Vec<Parameter>,
}

impl Parameters {
    /// Creates an empty set owned by the named module.
    #[must_use]
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            entries: Vec::new(),
        }
    }

    /// Adds a parameter in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::Duplicate`] if the name is taken and
    /// [`ParameterError::ChoiceDefault`] if a choice default is not allowed.
    pub fn add(&mut self, mut parameter: Parameter) -> Result<(), ParameterError> {
        if self.contains(parameter.name()) {
            return Err(ParameterError::Duplicate {
                name: parameter.name,
            });
        }
        parameter.validate_declaration()?;
        parameter.owner.clone_from(&self.owner);
        self.entries.push(parameter);
        Ok(())
    }

    /// Returns the owning module's symbolic name.
    #[must_use]
    pub const fn owner(&self) -> &str {
        self.owner.as_str()
    }

    /// Returns `true` if a parameter with this name is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|p| p.name == name)
    }

    /// Looks up a parameter by name.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::Missing`] if no such parameter is declared.
    pub fn get(&self, name: &str) -> Result<&Parameter, ParameterError> {
        self.entries
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| missing(name))
    }

    /// Looks up a parameter by name for editing.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::Missing`] if no such parameter is declared.
    pub fn get_mut(&mut self, name: &str) -> Result<&mut Parameter, ParameterError> {
        self.entries
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| missing(name))
    }

    /// Reads a typed value.
    ///
    /// Text values have `M{key}` metadata tokens substituted when a
    /// workspace is supplied.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::Missing`] for an undeclared name and
    /// [`ParameterError::WrongType`] when `T` does not match the value.
    pub fn value<T: ParameterType>(
        &self,
        name: &str,
        workspace: Option<&Workspace>,
    ) -> Result<T, ParameterError> {
        let parameter = self.get(name)?;
        let typed = T::extract(&parameter.value).ok_or_else(|| ParameterError::WrongType {
            name: name.to_owned(),
            expected: T::TYPE_NAME,
            actual: parameter.value.type_name(),
        })?;
        Ok(typed.resolve(workspace))
    }

    /// Sets a typed value by name.
    ///
    /// # Errors
    ///
    /// See [`Parameter::set_value`]; also [`ParameterError::Missing`].
    pub fn set_value(
        &mut self,
        name: &str,
        value: impl Into<ParameterValue>,
    ) -> Result<(), ParameterError> {
        self.get_mut(name)?.set_value(value.into())
    }

    /// Coerces user input by name.
    ///
    /// # Errors
    ///
    /// See [`Parameter::set_from_text`]; also [`ParameterError::Missing`].
    pub fn set_from_text(&mut self, name: &str, input: &str) -> Result<(), ParameterError> {
        self.get_mut(name)?.set_from_text(input)
    }

    /// Returns the named parameters, in the order given, as references to the
    /// owned instances.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::Missing`] for the first undeclared name.
    pub fn select<'a>(&'a self, names: &[&str]) -> Result<Vec<&'a Parameter>, ParameterError> {
        names.iter().map(|name| self.get(name)).collect()
    }

    /// Iterates parameters in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.entries.iter()
    }

    /// Returns the number of declared parameters.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is declared.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` when every parameter holds an acceptable value.
    #[must_use]
    pub fn verify(&self) -> bool {
        self.entries.iter().all(Parameter::verify)
    }

    /// Snapshots editable values for persistence.
    #[must_use]
    pub fn values(&self) -> ParameterValues {
        self.entries
            .iter()
            .filter(|p| p.kind.is_editable())
            .map(|p| (p.name.clone(), p.value.clone()))
            .collect()
    }

    /// Applies persisted values. Parameters absent from `values` revert to
    /// their defaults; names this module does not declare are ignored.
    ///
    /// # Errors
    ///
    /// Returns the first type mismatch. Integer parameters accept text that
    /// parses as an integer.
    pub fn apply_values(&mut self, values: &ParameterValues) -> Result<(), ParameterError> {
        for parameter in self.entries.iter_mut().filter(|p| p.kind.is_editable()) {
            match values.get(&parameter.name) {
                None => parameter.reset(),
                Some(ParameterValue::Text(text)) if parameter.kind == ParameterKind::Integer => {
                    parameter.set_from_text(text)?;
                }
                Some(value) => parameter.set_value(value.clone())?,
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Parameters {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn missing(name: &str) -> ParameterError {
    ParameterError::Missing {
        name: name.to_owned(),
    }
}
