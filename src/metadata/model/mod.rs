//! The read-only metadata model consumed by the mapping engine.
//!
//! A [`MetadataModel`] is the already-parsed, tabular view of one compiled
//! binary: its type definitions and references, members, events, constants
//! and assembly-level entries, each addressable by [`Token`]. The engine
//! holds two of these - source and target - for the lifetime of one
//! comparison; both are immutable once built.
//!
//! Models are materialized through [`MetadataModelBuilder`], which assigns
//! row tokens, wires member lists and default-value slots, and produces the
//! finished model. Parsing a binary container into a model is out of scope
//! for this crate; any front end that can enumerate types and members can
//! populate a builder.
//!
//! # Storage
//!
//! Each table is a `SkipMap<Token, Arc<Row>>`: lock-free lookup, and
//! iteration in ascending token order, which keeps every scan the engine
//! performs deterministic. Member lists on [`TypeDef`] rows are
//! `boxcar::Vec` so they can be appended through the shared `Arc` during
//! construction.
//!
//! # Identifier comparison
//!
//! Name matching goes through the model's [`IdentifierComparer`], mirroring
//! the configured string comparer of the underlying metadata reader.
//! Metadata identifiers are case-sensitive by default.

mod builder;
mod rows;

pub use builder::MetadataModelBuilder;
pub use rows::*;

use crate::{metadata::token::Token, Error, Result};

/// How identifiers are compared during matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentifierComparer {
    /// Byte-for-byte equality, the metadata default
    #[default]
    CaseSensitive,
    /// ASCII case folding
    IgnoreAsciiCase,
}

impl IdentifierComparer {
    /// Compare two identifiers under this comparer
    #[must_use]
    pub fn eq(self, a: &str, b: &str) -> bool {
        match self {
            IdentifierComparer::CaseSensitive => a == b,
            IdentifierComparer::IgnoreAsciiCase => a.eq_ignore_ascii_case(b),
        }
    }
}

/// The read-only, queryable view of one binary's metadata.
///
/// Rows are owned by the model and handed out as cheap `Arc` clones; the
/// engine stores only tokens and derived results. All lookups are by token;
/// a token issued by one model must never be looked up against another -
/// doing so yields [`Error::RowNotFound`] at best and a wrong row at worst.
pub struct MetadataModel {
    pub(crate) type_defs: TypeDefMap,
    pub(crate) type_refs: TypeRefMap,
    pub(crate) method_defs: MethodDefMap,
    pub(crate) fields: FieldMap,
    pub(crate) params: ParamMap,
    pub(crate) properties: PropertyMap,
    pub(crate) events: EventMap,
    pub(crate) constants: ConstantMap,
    pub(crate) assembly_refs: AssemblyRefMap,
    pub(crate) files: AssemblyFileMap,
    pub(crate) comparer: IdentifierComparer,
}

impl MetadataModel {
    /// Compare two identifiers under this model's configured comparer
    #[must_use]
    pub fn ident_eq(&self, a: &str, b: &str) -> bool {
        self.comparer.eq(a, b)
    }

    /// The configured identifier comparer
    #[must_use]
    pub fn comparer(&self) -> IdentifierComparer {
        self.comparer
    }

    /// All type definitions, in token order
    #[must_use]
    pub fn type_defs(&self) -> &TypeDefMap {
        &self.type_defs
    }

    /// Look up a type definition by token
    ///
    /// # Errors
    /// Returns [`Error::RowNotFound`] if the token has no row in this model
    pub fn type_def(&self, token: Token) -> Result<TypeDefRc> {
        self.type_defs
            .get(&token)
            .map(|entry| entry.value().clone())
            .ok_or(Error::RowNotFound(token))
    }

    /// All type references, in token order
    #[must_use]
    pub fn type_refs(&self) -> &TypeRefMap {
        &self.type_refs
    }

    /// Look up a type reference by token
    ///
    /// # Errors
    /// Returns [`Error::RowNotFound`] if the token has no row in this model
    pub fn type_ref(&self, token: Token) -> Result<TypeRefRc> {
        self.type_refs
            .get(&token)
            .map(|entry| entry.value().clone())
            .ok_or(Error::RowNotFound(token))
    }

    /// All method definitions, in token order
    #[must_use]
    pub fn method_defs(&self) -> &MethodDefMap {
        &self.method_defs
    }

    /// Look up a method definition by token
    ///
    /// # Errors
    /// Returns [`Error::RowNotFound`] if the token has no row in this model
    pub fn method_def(&self, token: Token) -> Result<MethodDefRc> {
        self.method_defs
            .get(&token)
            .map(|entry| entry.value().clone())
            .ok_or(Error::RowNotFound(token))
    }

    /// All field definitions, in token order
    #[must_use]
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// Look up a field definition by token
    ///
    /// # Errors
    /// Returns [`Error::RowNotFound`] if the token has no row in this model
    pub fn field(&self, token: Token) -> Result<FieldRc> {
        self.fields
            .get(&token)
            .map(|entry| entry.value().clone())
            .ok_or(Error::RowNotFound(token))
    }

    /// All parameters, in token order
    #[must_use]
    pub fn params(&self) -> &ParamMap {
        &self.params
    }

    /// Look up a parameter by token
    ///
    /// # Errors
    /// Returns [`Error::RowNotFound`] if the token has no row in this model
    pub fn param(&self, token: Token) -> Result<ParamRc> {
        self.params
            .get(&token)
            .map(|entry| entry.value().clone())
            .ok_or(Error::RowNotFound(token))
    }

    /// All properties, in token order
    #[must_use]
    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    /// Look up a property by token
    ///
    /// # Errors
    /// Returns [`Error::RowNotFound`] if the token has no row in this model
    pub fn property(&self, token: Token) -> Result<PropertyRc> {
        self.properties
            .get(&token)
            .map(|entry| entry.value().clone())
            .ok_or(Error::RowNotFound(token))
    }

    /// All events, in token order
    #[must_use]
    pub fn events(&self) -> &EventMap {
        &self.events
    }

    /// Look up an event by token
    ///
    /// # Errors
    /// Returns [`Error::RowNotFound`] if the token has no row in this model
    pub fn event(&self, token: Token) -> Result<EventRc> {
        self.events
            .get(&token)
            .map(|entry| entry.value().clone())
            .ok_or(Error::RowNotFound(token))
    }

    /// All constants, in token order
    #[must_use]
    pub fn constants(&self) -> &ConstantMap {
        &self.constants
    }

    /// Look up a constant by token
    ///
    /// # Errors
    /// Returns [`Error::RowNotFound`] if the token has no row in this model
    pub fn constant(&self, token: Token) -> Result<ConstantRc> {
        self.constants
            .get(&token)
            .map(|entry| entry.value().clone())
            .ok_or(Error::RowNotFound(token))
    }

    /// All assembly references, in token order
    #[must_use]
    pub fn assembly_refs(&self) -> &AssemblyRefMap {
        &self.assembly_refs
    }

    /// Look up an assembly reference by token
    ///
    /// # Errors
    /// Returns [`Error::RowNotFound`] if the token has no row in this model
    pub fn assembly_ref(&self, token: Token) -> Result<AssemblyRefRc> {
        self.assembly_refs
            .get(&token)
            .map(|entry| entry.value().clone())
            .ok_or(Error::RowNotFound(token))
    }

    /// All manifest files, in token order
    #[must_use]
    pub fn files(&self) -> &AssemblyFileMap {
        &self.files
    }

    /// Look up a manifest file by token
    ///
    /// # Errors
    /// Returns [`Error::RowNotFound`] if the token has no row in this model
    pub fn file(&self, token: Token) -> Result<AssemblyFileRc> {
        self.files
            .get(&token)
            .map(|entry| entry.value().clone())
            .ok_or(Error::RowNotFound(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{signatures::SignatureField, signatures::TypeSignature, token::HandleKind};

    #[test]
    fn test_ident_comparer() {
        assert!(IdentifierComparer::CaseSensitive.eq("Foo", "Foo"));
        assert!(!IdentifierComparer::CaseSensitive.eq("Foo", "foo"));
        assert!(IdentifierComparer::IgnoreAsciiCase.eq("Foo", "foo"));
    }

    #[test]
    fn test_lookup_by_token() {
        let mut builder = MetadataModelBuilder::new();
        let c = builder.type_def("N", "C");
        let f = builder.field(c, "f", SignatureField::new(TypeSignature::I4));
        let model = builder.build();

        assert_eq!(model.type_def(c).unwrap().name, "C");
        assert_eq!(model.field(f).unwrap().name, "f");
        assert_eq!(model.field(f).unwrap().declaring_type, c);
    }

    #[test]
    fn test_missing_row_is_an_error() {
        let model = MetadataModelBuilder::new().build();
        let absent = Token::from_parts(HandleKind::TypeDef, 7);
        assert!(matches!(
            model.type_def(absent),
            Err(Error::RowNotFound(token)) if token == absent
        ));
    }

    #[test]
    fn test_iteration_is_token_ordered() {
        let mut builder = MetadataModelBuilder::new();
        let a = builder.type_def("N", "A");
        let b = builder.type_def("N", "B");
        let model = builder.build();

        let tokens: Vec<Token> = model.type_defs().iter().map(|e| *e.key()).collect();
        assert_eq!(tokens, vec![a, b]);
    }
}
