//! # Models Module
//!
//! Value types exchanged between the validation and alignment layers and their callers.
//!
//! ## Key Components
//!
//! - [`MoleculeArrays`](inputs::MoleculeArrays) - the unvalidated named-array bundle accepted as input
//! - [`Molrec`](molrec::Molrec) - the canonical record produced by validation
//! - [`Nucleus`](nucleus::Nucleus) - one atom's resolved identity
//! - [`AlignmentMill`](mill::AlignmentMill) - a rigid transform plus atom relabeling
//!
//! All types derive `serde` traits so that transport layers can encode them without
//! knowledge of their internals.

pub mod inputs;
pub mod mill;
pub mod molrec;
pub mod nucleus;
