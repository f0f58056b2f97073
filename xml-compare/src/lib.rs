//! Terminal front-end for `xml-compare-core`.
//!
//! - [`report`]: colored rendering of comparison results
//! - [`inspect`]: parsed tree view with source lines
//! - [`rules_view`]: listing of a loaded rule set
//!
//! The comparison itself lives in `xml-compare-core`; this crate only
//! renders its results.

pub mod inspect;
pub mod report;
pub mod rules_view;
