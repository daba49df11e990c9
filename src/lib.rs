//! imagemark - rectangle labeling projects for image sets
//!
//! The project document ([`model::Labels`]) is built from the observable
//! primitives of `imagemark_signal`, so every edit notifies its observers
//! exactly once. [`format::LabelSerializer`] persists it as JSON and
//! [`manager::ProjectManager`] drives the open/save lifecycle.

pub mod config;
pub mod constants;
pub mod format;
pub mod manager;
pub mod model;
pub mod storage;

#[cfg(test)]
mod tests;

pub use format::{LabelSerializer, PersistError};
pub use manager::{ManagerError, ProjectManager};
pub use model::{Labels, MarkerTool, RectangleLabel, SelectionOperation};
