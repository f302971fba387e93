//! Convenient re-exports of the most commonly used types and traits.
//!
//! # Example
//!
//! ```rust
//! use dotcompat::prelude::*;
//!
//! let mut old = MetadataModelBuilder::new();
//! let c = old.type_def("N", "C");
//! let f = old.field(c, "f", SignatureField::new(TypeSignature::I4));
//!
//! let mut new = MetadataModelBuilder::new();
//! let c2 = new.type_def("N", "C");
//! new.field(c2, "f", SignatureField::new(TypeSignature::I4));
//!
//! let mapping = MetadataMapping::new(old.build().into(), new.build().into());
//! assert!(mapping.map_field_definition(f)?.target().is_some());
//! # Ok::<(), dotcompat::Error>(())
//! ```

pub use crate::{
    metadata::descriptors::{CompatibilityDescriptor, Severity},
    metadata::mapping::{Candidate, Mapping, MetadataMapping},
    metadata::model::{
        ConstantTypeCode, IdentifierComparer, MetadataModel, MetadataModelBuilder,
    },
    metadata::signatures::{SignatureField, TypeSignature},
    metadata::token::{HandleKind, Token},
    Error, Result,
};
