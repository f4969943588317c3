//! # Nucleus Module
//!
//! Turns whatever a caller knows about an atom into one consistent [`Nucleus`](crate::core::models::nucleus::Nucleus).
//!
//! ## Key Components
//!
//! - [`parse_nucleus_label`](label::parse_nucleus_label) - splits labels like `@13C_mine` or `Gh(6@13.003)`
//! - [`NucleusReconciler`](reconcile::NucleusReconciler) - merges explicit fields, label parts and table defaults
//! - [`NucleusCache`](cache::NucleusCache) - thread-safe memo of reconciled queries

pub mod cache;
pub mod label;
pub mod reconcile;
