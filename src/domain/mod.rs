//! Domain model: form schema, registry and UI view models.

pub mod form;
