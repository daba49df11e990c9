//! Cross-primitive tests.
//!
//! These check notification counts over long mutation sequences and the
//! interplay of bridges, restore and forced changes.
