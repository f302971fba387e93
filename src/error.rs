use thiserror::Error;

use crate::metadata::token::{HandleKind, Token};

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every variant represents a hard failure: either the engine does not yet
/// implement a comparison the input requires, or a handle does not resolve
/// inside its own model. A source entity that simply has no counterpart in
/// the target model is *not* an error - that outcome is ordinary data,
/// surfaced as [`crate::Mapping::Unmapped`].
///
/// # Error Categories
///
/// ## Engine Incompleteness
/// - [`Error::MappingNotImplemented`] - Entity kind with no resolver
/// - [`Error::SignatureNotImplemented`] - Signature shape with no comparison rule
/// - [`Error::CustomModifiersNotImplemented`] - Custom modifiers present on a signature
///
/// ## Invalid Input
/// - [`Error::UnsupportedHandle`] - Handle whose table byte names no known kind
/// - [`Error::RowNotFound`] - Handle with no row in its metadata model
/// - [`Error::InvalidSignature`] - Signature that violates its own grammar
/// - [`Error::ConstantParent`] - Constant attached to a parent without a default-value slot
///
/// # Examples
///
/// ```rust
/// use dotcompat::{Error, HandleKind, MetadataMapping, MetadataModelBuilder, Token};
///
/// let mapping = MetadataMapping::new(
///     MetadataModelBuilder::new().build().into(),
///     MetadataModelBuilder::new().build().into(),
/// );
///
/// let generic_param = Token::from_parts(HandleKind::GenericParam, 1);
/// match mapping.map_handle(generic_param) {
///     Err(Error::MappingNotImplemented(kind)) => assert_eq!(kind, HandleKind::GenericParam),
///     other => panic!("unexpected outcome: {other:?}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// No resolver exists for this entity kind.
    ///
    /// The kind is part of the metadata type system but the engine does not
    /// yet know how to map it between assemblies. This is a statement about
    /// the engine, not about the compared binaries, and must never be
    /// conflated with "entity removed".
    #[error("Mapping '{0}' handles between assemblies is not implemented")]
    MappingNotImplemented(HandleKind),

    /// The handle's table byte does not name any known metadata table.
    ///
    /// Raised by the untyped dispatcher when a token carries a kind tag
    /// outside the closed set of [`HandleKind`] values.
    #[error("{0} does not reference a known metadata table")]
    UnsupportedHandle(Token),

    /// Failed to find the metadata row a handle refers to.
    ///
    /// The handle's kind is valid but its row index does not exist in the
    /// model it was looked up against. Usually indicates a handle from one
    /// model was used against the other without translation.
    #[error("Failed to find a metadata row for {0}")]
    RowNotFound(Token),

    /// This signature shape cannot be compared yet.
    ///
    /// Multi-dimensional arrays, raw pointers and function pointers are
    /// deliberately left as hard failures rather than best-effort guesses.
    #[error("{0} signature comparison is not yet implemented")]
    SignatureNotImplemented(&'static str),

    /// Custom modifiers were present on a signature being compared.
    ///
    /// Modifier-aware equivalence is not implemented; failing loudly avoids
    /// silently ignoring a part of the binary contract.
    #[error("Custom modifiers on signatures are not yet implemented")]
    CustomModifiersNotImplemented,

    /// A signature violated its own grammar.
    ///
    /// For example, a generic instantiation whose unbound type is not a
    /// named type reference.
    #[error("Invalid signature type code")]
    InvalidSignature,

    /// A constant's mapped parent exposes no default-value slot.
    ///
    /// Constants attach to parameters, fields or properties; any other
    /// parent kind indicates a malformed model.
    #[error("Constant parent {0} does not expose a default-value slot")]
    ConstantParent(Token),

    /// Failed to lock target.
    ///
    /// Thread synchronization failed, typically because a lock was poisoned
    /// by a panic on another thread.
    #[error("Failed to lock target")]
    LockError,

    /// Generic error for miscellaneous failures.
    #[error("{0}")]
    Error(String),
}
