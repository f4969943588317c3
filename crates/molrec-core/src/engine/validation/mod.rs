//! # Validation Module
//!
//! Stage-by-stage checks that turn a [`MoleculeArrays`](crate::core::models::inputs::MoleculeArrays)
//! bundle into the pieces of a canonical [`Molrec`](crate::core::models::molrec::Molrec).
//!
//! ## Stages
//!
//! Each stage both validates and fills defaults. They run in this order:
//!
//! - [`units`] - length units, conversion-factor override and provenance
//! - [`connectivity`] - canonical, sorted bond triples
//! - [`geometry`] - Cartesian shape and overlapping atoms
//! - [`zmat`] - the line grammar of unsettled (Z-matrix) geometries
//! - [`efp`] - effective-fragment files and placement hints
//! - [`nuclei`] - per-atom identity through the nucleus reconciler
//! - [`fragments`] - separators and per-fragment quantity lists
//! - [`chgmult`] - charge and multiplicity across fragments
//! - [`frame`] - whether the record may later be translated or rotated
//!
//! Results accumulate in a [`MolrecBuilder`](builder::MolrecBuilder), which refuses to
//! overwrite a slot with a different value.

pub mod builder;
pub mod chgmult;
pub mod connectivity;
pub mod efp;
pub mod fragments;
pub mod frame;
pub mod geometry;
pub mod nuclei;
pub mod units;
pub mod zmat;
