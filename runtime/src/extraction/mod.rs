//! Above-the-fold class extraction.
//!
//! [`above_fold`] measures a rendered page and picks out the classes of
//! elements inside the viewport; [`class_set`] accumulates them across pages.

pub mod above_fold;
pub mod class_set;
