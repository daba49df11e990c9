//! Project document persistence.
//!
//! A project is a single JSON object whose keys are declared in
//! [`LABELS_FIELDS`]. [`LabelSerializer`] owns the live [`crate::model::Labels`]
//! and performs the checked load/save lifecycle around it.

mod descriptor;
mod error;
mod serializer;

pub use descriptor::{FieldDescriptor, LABELS_FIELDS, find_field};
pub use error::PersistError;
pub use serializer::LabelSerializer;
