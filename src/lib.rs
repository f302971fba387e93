// Copyright 2026 dotcompat contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]

//! # dotcompat
//!
//! An engine for computing entity correspondences between two versions of a
//! .NET assembly's metadata. Given two already-parsed, read-only metadata
//! models - a "source" (old version) and a "target" (new version) -
//! `dotcompat` determines, for any metadata entity of the source, its
//! best-effort counterpart in the target. That correspondence is the
//! foundation for detecting breaking API/ABI changes between releases:
//! removed members, changed signatures, changed constant values, mismatched
//! event accessor wiring.
//!
//! ## Features
//!
//! - **🔍 Per-kind resolution** - Dedicated matching heuristics for type
//!   definitions, type references, methods, fields, events, constants,
//!   assembly references and assembly files
//! - **🧭 Dynamic dispatch** - A single polymorphic entry point routes any
//!   kind-tagged handle to the correct resolver
//! - **🧬 Structural signature comparison** - Recursive equivalence over
//!   type signatures, including generic instantiations and arrays
//! - **⚡ Memoized and concurrent** - Each handle is resolved at most once,
//!   safe under parallel lookups from many threads
//! - **📊 Precise outcome modeling** - Unique, unmapped and
//!   ambiguous-with-reasons results are distinct by construction
//!
//! ## Quick Start
//!
//! Add `dotcompat` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! dotcompat = "0.1"
//! ```
//!
//! ### Using the Prelude
//!
//! ```rust
//! use dotcompat::prelude::*;
//!
//! // Describe the old version of the assembly
//! let mut old = MetadataModelBuilder::new();
//! let c = old.type_def("N", "C");
//! let f = old.field(c, "f", SignatureField::new(TypeSignature::I4));
//!
//! // Describe the new version
//! let mut new = MetadataModelBuilder::new();
//! let c2 = new.type_def("N", "C");
//! let _ = new.field(c2, "f", SignatureField::new(TypeSignature::I4));
//!
//! // Map entities from old to new
//! let mapping = MetadataMapping::new(old.build().into(), new.build().into());
//! assert!(mapping.map_field_definition(f)?.target().is_some());
//! # Ok::<(), dotcompat::Error>(())
//! ```
//!
//! ## Architecture
//!
//! `dotcompat` is organized into a small number of modules:
//!
//! - [`prelude`] - Convenient re-exports of commonly used types
//! - [`metadata::token`] - Kind-tagged entity handles ([`Token`],
//!   [`HandleKind`])
//! - [`metadata::model`] - The read-only, in-memory metadata view consumed
//!   by the engine, plus a builder for constructing it
//! - [`metadata::signatures`] - Recursive structural type signatures
//! - [`metadata::mapping`] - The entity-mapping engine itself:
//!   [`MetadataMapping`], the three-state [`Mapping`] outcome, and the
//!   per-kind memoization layer
//! - [`metadata::descriptors`] - Diagnostic rule metadata consumed by
//!   reporting layers
//!
//! ## Outcome Model
//!
//! Every resolution produces one of exactly three outcomes, surfaced as the
//! [`Mapping`] enum:
//!
//! - `Unique` - exactly one target entity judged equivalent
//! - `Unmapped` - no plausible candidate (the entity was likely removed)
//! - `Ambiguous` - one or more candidates match by name and scope but fail
//!   a finer check; each carries a human-readable reason
//!
//! A fourth condition - the *engine itself* not knowing how to compare an
//! entity kind or signature shape - is never folded into `Unmapped`. It is
//! reported as a hard [`Error`], because silently treating engine
//! incompleteness as "entity removed" would fabricate breaking-change
//! reports.
//!
//! ## Concurrency
//!
//! [`MetadataMapping`] is `Send + Sync`. A diagnostic layer may map many
//! unrelated entities in parallel; per-kind caches guarantee each handle is
//! resolved at most once and that no thread observes a partially-built
//! result. Resolvers recurse freely into other caches from the computing
//! thread. Genuine handle cycles are a documented, unguarded risk.
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, Error>`](Result):
//!
//! ```rust
//! use dotcompat::{Error, HandleKind, MetadataMapping, MetadataModelBuilder, Token};
//!
//! let source = MetadataModelBuilder::new().build();
//! let target = MetadataModelBuilder::new().build();
//! let mapping = MetadataMapping::new(source.into(), target.into());
//!
//! // Property definitions have no resolver yet: hard failure, not "unmapped".
//! let property = Token::from_parts(HandleKind::Property, 1);
//! match mapping.map_handle(property) {
//!     Err(Error::MappingNotImplemented(kind)) => assert_eq!(kind, HandleKind::Property),
//!     other => panic!("expected a hard failure, got {other:?}"),
//! }
//! ```

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

pub(crate) mod error;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use dotcompat::prelude::*;
///
/// let model = MetadataModelBuilder::new().build();
/// assert!(model.type_defs().is_empty());
/// ```
pub mod prelude;

/// Handles, signatures, the metadata model and the entity-mapping engine.
///
/// This module contains everything the engine needs to compute
/// correspondences between two metadata models:
///
/// - [`metadata::token`] - The [`Token`] handle primitive and the closed
///   [`HandleKind`] enumeration over metadata tables
/// - [`metadata::signatures`] - Structural type signatures
///   ([`metadata::signatures::TypeSignature`] and friends)
/// - [`metadata::model`] - The immutable, queryable metadata view
/// - [`metadata::mapping`] - The mapping engine, outcome type and caches
/// - [`metadata::descriptors`] - Diagnostic rule metadata records
pub mod metadata;

/// `dotcompat` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type
/// is always [`Error`]. Used consistently throughout the crate for all
/// fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `dotcompat` Error type
///
/// The main error type for all operations in this crate. Every variant
/// represents *engine incompleteness or misuse* - a legitimate "no
/// counterpart found" outcome is ordinary data ([`Mapping::Unmapped`]), never
/// an error.
pub use error::Error;

/// The entity-mapping engine, constructed once per pair of metadata models.
///
/// See [`metadata::mapping::MetadataMapping`] for the full resolution API.
pub use metadata::mapping::MetadataMapping;

/// The three-state outcome of every resolution.
pub use metadata::mapping::{Candidate, Mapping};

/// The read-only metadata view consumed by the engine, and its builder.
pub use metadata::model::{MetadataModel, MetadataModelBuilder};

/// Kind-tagged entity handles.
pub use metadata::token::{HandleKind, Token};
