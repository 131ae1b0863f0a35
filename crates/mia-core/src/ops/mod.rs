//! Reusable host operations.
//!
//! These are pure functions over images and object collections. They never
//! read from or write to a [`Workspace`](crate::workspace::Workspace); a
//! module fetches its inputs, calls them, and stores the results itself.

pub mod colour;
pub mod measure;
pub mod overlay;

#[cfg(test)]
mod tests;
