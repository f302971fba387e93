use std::fmt;

use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};

/// A metadata token naming one entity within one metadata model.
///
/// Tokens consist of a 32-bit value where:
/// - The high byte (bits 24-31) indicates the entity kind (metadata table)
/// - The low 24 bits (bits 0-23) indicate the row index within that table
///
/// A token only has meaning relative to the model it was issued by. Tokens
/// from the source and target models of a comparison are never equality-
/// comparable directly; a source token must first be translated through
/// [`crate::MetadataMapping`].
///
/// The all-zero token is the nil handle and represents "no entity" (for
/// example, an event without a raiser accessor).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(pub u32);

impl Token {
    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// The nil handle, representing "no entity"
    #[must_use]
    pub const fn nil() -> Self {
        Token(0)
    }

    /// Builds a token from an entity kind and a row index
    #[must_use]
    pub fn from_parts(kind: HandleKind, row: u32) -> Self {
        Token(((kind as u32) << 24) | (row & 0x00FF_FFFF))
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the table byte from the token (high byte)
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Extracts the row index from the token (low 24 bits)
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns true if this is the nil handle (value 0)
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Resolves the table byte to a [`HandleKind`], if it names a known kind
    ///
    /// Note that the nil handle resolves to [`HandleKind::Module`] (table
    /// byte 0); callers that care about nil-ness check [`Token::is_null`]
    /// first, the way the mapping dispatcher does.
    #[must_use]
    pub fn kind(&self) -> Option<HandleKind> {
        HandleKind::from_table(self.table())
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

/// The closed set of entity kinds a token can name.
///
/// Each variant's discriminant is the metadata table byte carried in the
/// high byte of a [`Token`]. The set is closed on purpose: the mapping
/// dispatcher matches over it exhaustively, so adding a kind forces every
/// routing decision to be revisited at compile time.
///
/// Eight kinds currently have resolvers ([`TypeDef`](HandleKind::TypeDef),
/// [`TypeRef`](HandleKind::TypeRef), [`MethodDef`](HandleKind::MethodDef),
/// [`Field`](HandleKind::Field), [`Event`](HandleKind::Event),
/// [`Constant`](HandleKind::Constant),
/// [`AssemblyRef`](HandleKind::AssemblyRef), [`File`](HandleKind::File));
/// mapping any other kind fails with
/// [`crate::Error::MappingNotImplemented`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display, EnumIter, EnumCount)]
#[repr(u8)]
pub enum HandleKind {
    /// `Module` table (0x00) - the module definition of an assembly
    Module = 0x00,
    /// `TypeRef` table (0x01) - references to types defined elsewhere
    TypeRef = 0x01,
    /// `TypeDef` table (0x02) - type definitions within the assembly
    TypeDef = 0x02,
    /// `Field` table (0x04) - field definitions within types
    Field = 0x04,
    /// `MethodDef` table (0x06) - method definitions
    MethodDef = 0x06,
    /// `Param` table (0x08) - method parameter definitions
    Param = 0x08,
    /// `InterfaceImpl` table (0x09) - interface implementations by types
    InterfaceImpl = 0x09,
    /// `MemberRef` table (0x0A) - references to members defined elsewhere
    MemberRef = 0x0A,
    /// `Constant` table (0x0B) - compile-time default values
    Constant = 0x0B,
    /// `CustomAttribute` table (0x0C) - custom attribute applications
    CustomAttribute = 0x0C,
    /// `DeclSecurity` table (0x0E) - declarative security attributes
    DeclSecurity = 0x0E,
    /// `StandAloneSig` table (0x11) - standalone signatures
    StandAloneSig = 0x11,
    /// `Event` table (0x14) - event definitions
    Event = 0x14,
    /// `Property` table (0x17) - property definitions
    Property = 0x17,
    /// `MethodImpl` table (0x19) - method implementation mappings
    MethodImpl = 0x19,
    /// `ModuleRef` table (0x1A) - references to external modules
    ModuleRef = 0x1A,
    /// `TypeSpec` table (0x1B) - generic type specifications
    TypeSpec = 0x1B,
    /// `Assembly` table (0x20) - the assembly definition itself
    Assembly = 0x20,
    /// `AssemblyRef` table (0x23) - references to external assemblies
    AssemblyRef = 0x23,
    /// `File` table (0x26) - files belonging to the assembly
    File = 0x26,
    /// `ExportedType` table (0x27) - types exported from this assembly
    ExportedType = 0x27,
    /// `ManifestResource` table (0x28) - embedded or linked resources
    ManifestResource = 0x28,
    /// `GenericParam` table (0x2A) - generic parameter definitions
    GenericParam = 0x2A,
    /// `MethodSpec` table (0x2B) - generic method instantiations
    MethodSpec = 0x2B,
    /// `GenericParamConstraint` table (0x2C) - generic parameter constraints
    GenericParamConstraint = 0x2C,
    /// Namespace definitions (0x7C) - synthetic, not backed by a physical table
    NamespaceDefinition = 0x7C,
}

impl HandleKind {
    /// Resolves a table byte to its kind, if it names one
    #[must_use]
    pub fn from_table(table: u8) -> Option<Self> {
        HandleKind::iter().find(|kind| *kind as u8 == table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::EnumCount;

    #[test]
    fn test_token_parts() {
        let token = Token::from_parts(HandleKind::MethodDef, 1);
        assert_eq!(token.value(), 0x06000001);
        assert_eq!(token.table(), 0x06);
        assert_eq!(token.row(), 1);
        assert_eq!(token.kind(), Some(HandleKind::MethodDef));
    }

    #[test]
    fn test_token_nil() {
        assert!(Token::nil().is_null());
        assert!(!Token::from_parts(HandleKind::TypeDef, 1).is_null());
        // nil shares its table byte with Module; the dispatcher checks
        // nil-ness before kind
        assert_eq!(Token::nil().kind(), Some(HandleKind::Module));
    }

    #[test]
    fn test_token_row_masking() {
        let token = Token::from_parts(HandleKind::TypeDef, 0x01FF_FFFF);
        assert_eq!(token.row(), 0x00FF_FFFF);
        assert_eq!(token.table(), 0x02);
    }

    #[test]
    fn test_token_conversions() {
        let token: Token = 0x02000005u32.into();
        assert_eq!(token.kind(), Some(HandleKind::TypeDef));
        let raw: u32 = token.into();
        assert_eq!(raw, 0x02000005);
    }

    #[test]
    fn test_token_display() {
        assert_eq!(format!("{}", Token::new(0x06000001)), "0x06000001");
        let debug = format!("{:?}", Token::new(0x06000001));
        assert!(debug.contains("table: 0x06"));
        assert!(debug.contains("row: 1"));
    }

    #[test]
    fn test_handle_kind_from_table() {
        assert_eq!(HandleKind::from_table(0x02), Some(HandleKind::TypeDef));
        assert_eq!(HandleKind::from_table(0x14), Some(HandleKind::Event));
        assert_eq!(
            HandleKind::from_table(0x7C),
            Some(HandleKind::NamespaceDefinition)
        );
        // 0x03 is a gap in the table numbering
        assert_eq!(HandleKind::from_table(0x03), None);
        assert_eq!(HandleKind::from_table(0xFF), None);
    }

    #[test]
    fn test_handle_kind_is_closed() {
        assert_eq!(HandleKind::COUNT, 26);
        for kind in HandleKind::iter() {
            assert_eq!(HandleKind::from_table(kind as u8), Some(kind));
        }
    }

    #[test]
    fn test_handle_kind_display() {
        assert_eq!(HandleKind::TypeDef.to_string(), "TypeDef");
        assert_eq!(HandleKind::AssemblyRef.to_string(), "AssemblyRef");
    }

    #[test]
    fn test_token_ordering() {
        let a = Token::from_parts(HandleKind::TypeDef, 1);
        let b = Token::from_parts(HandleKind::TypeDef, 2);
        let c = Token::from_parts(HandleKind::MethodDef, 1);
        assert!(a < b);
        assert!(b < c);
    }
}
