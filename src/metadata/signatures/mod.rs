//! Structural type signatures.
//!
//! A [`TypeSignature`] describes a value's type recursively: a discriminant
//! (primitive kind, named-type reference, generic instantiation, generic
//! parameter by index, single-dimension array, plus the deliberately
//! unimplemented shapes) together with kind-specific payload. Signatures are
//! plain data; structural equivalence across two metadata models is decided
//! by the comparator in [`crate::metadata::mapping`], because named-type
//! identity requires translating handles between the models.
//!
//! Two signatures are structurally comparable only when they were built
//! against compatible models (a source signature against a target
//! signature); nothing in this module enforces that, the engine does.

mod types;

pub use types::*;
