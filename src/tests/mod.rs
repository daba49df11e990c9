//! End-to-end tests of the project lifecycle.
//!
//! These exercise the model, serializer and manager together against
//! temporary directories.
