//! Result export.

pub mod csv;
