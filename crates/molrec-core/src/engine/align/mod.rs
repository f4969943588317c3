//! # Alignment Module
//!
//! Finds the rigid transform and atom relabeling that best superimpose one
//! geometry onto another of the same composition.
//!
//! ## Key Components
//!
//! - [`search`] - the enumerate-and-compare loop with convergence, mirror and cancellation handling
//! - [`candidates`] - per-shuffle-class screens and their lazy Cartesian product
//! - [`hungarian`] - minimum-cost assignment with reduced costs
//! - [`uno`] - enumeration of every perfect matching of a bipartite graph from one seed
//! - [`kabsch`] - quaternion superposition of two ordered point sets
//! - [`scramble`] - random or prescribed transforms for exercising the search

pub mod candidates;
pub mod hungarian;
pub mod kabsch;
pub mod scramble;
pub mod search;
pub mod uno;
