//! Metadata handles, models, signatures and the entity-mapping engine.
//!
//! The modules here mirror the shape of the problem: [`token`] defines the
//! kind-tagged handle every entity is named by, [`model`] holds the two
//! read-only metadata views being compared, [`signatures`] describes value
//! types structurally, [`mapping`] computes correspondences between the two
//! models, and [`descriptors`] carries the rule metadata a reporting layer
//! attaches to mapping outcomes.

/// Diagnostic rule metadata consumed by reporting layers.
pub mod descriptors;

/// The entity-mapping engine: dispatcher, per-kind resolvers, signature
/// comparator and memoization.
pub mod mapping;

/// The read-only, in-memory metadata model and its builder.
pub mod model;

/// Structural type signatures.
pub mod signatures;

/// Kind-tagged metadata handles.
pub mod token;
