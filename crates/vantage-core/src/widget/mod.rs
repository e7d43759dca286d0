//! Widget catalog and ordering.
//!
//! [`registry`] holds the fixed catalog, [`order`] the user's permutation
//! of it, and [`reorder`] the controller that mutates and persists that
//! permutation (including drag gestures).

pub mod order;
pub mod registry;
pub mod reorder;
