//! The entity-mapping engine.
//!
//! Given two [`MetadataModel`](crate::metadata::model::MetadataModel)s - the
//! "source" (old version) and the "target" (new version) of the same
//! assembly - [`MetadataMapping`] computes, on demand, the target
//! counterpart of any source entity. Resolution is a demand-driven,
//! recursive, cache-stabilized fixpoint: mapping a field first maps its
//! declaring type; comparing a generic instantiation maps the unbound type;
//! comparing a named type maps its handle - and every intermediate result
//! is memoized so no handle is ever resolved twice.
//!
//! # Components
//!
//! - [`Mapping`] / [`Candidate`] - the three-state outcome of every
//!   resolution (unique target, unmapped, or ambiguous with reasons)
//! - [`MetadataMapping`] - the engine: a handle-kind dispatcher
//!   ([`MetadataMapping::map_handle`]), one resolver per implemented kind,
//!   and the signature comparator
//!   ([`MetadataMapping::compare_type_signatures`])
//! - a per-kind memoization cache (internal) guaranteeing at-most-once
//!   resolution under concurrent access
//!
//! # Matching policy
//!
//! All resolvers share one policy: name equality first, scope equality
//! second, structural equality third. The heuristics are deliberately no
//! stronger than that - overloaded methods and same-named types of
//! different generic arity are not disambiguated, and renamed entities are
//! never recovered. The engine reports what the heuristic finds; deciding
//! what an unmapped or ambiguous entity *means* belongs to the diagnostic
//! layer on top.

mod cache;
mod compare;
mod engine;
mod result;

pub(crate) use cache::MappingCache;
pub use engine::MetadataMapping;
pub use result::{Candidate, Mapping};
