use std::sync::{Arc, OnceLock};

use crossbeam_skiplist::SkipMap;
use strum::Display;

use crate::metadata::{signatures::SignatureField, token::Token};

/// A type definition with resolved names and owned data
pub struct TypeDef {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// The namespace of the type, empty for the global namespace
    pub namespace: String,
    /// The simple name of the type
    pub name: String,
    /// The enclosing type for nested types, nil for top-level types
    pub declaring_type: Token,
    /// Tokens of the fields declared by this type
    pub fields: boxcar::Vec<Token>,
    /// Tokens of the methods declared by this type
    pub methods: boxcar::Vec<Token>,
}

/// A reference to a `TypeDef`
pub type TypeDefRc = Arc<TypeDef>;
/// A map that holds the mapping of Token to `TypeDef`
pub type TypeDefMap = SkipMap<Token, TypeDefRc>;

/// A reference to a type defined in another module or assembly
pub struct TypeRef {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// The namespace of the referenced type
    pub namespace: String,
    /// The simple name of the referenced type
    pub name: String,
}

/// A reference to a `TypeRef`
pub type TypeRefRc = Arc<TypeRef>;
/// A map that holds the mapping of Token to `TypeRef`
pub type TypeRefMap = SkipMap<Token, TypeRefRc>;

/// A method definition
pub struct MethodDef {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// The name of the method
    pub name: String,
    /// The type declaring this method, nil for module-level methods
    pub declaring_type: Token,
}

/// A reference to a `MethodDef`
pub type MethodDefRc = Arc<MethodDef>;
/// A map that holds the mapping of Token to `MethodDef`
pub type MethodDefMap = SkipMap<Token, MethodDefRc>;

/// A field definition
pub struct Field {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// The name of the field
    pub name: String,
    /// The type declaring this field
    pub declaring_type: Token,
    /// The structural signature of the field
    pub signature: SignatureField,
    /// The field's default-value constant, set once during model construction
    pub default_value: OnceLock<Token>,
}

impl Field {
    /// The field's default-value constant, nil when the field has none
    #[must_use]
    pub fn default_value(&self) -> Token {
        self.default_value.get().copied().unwrap_or_else(Token::nil)
    }
}

/// A reference to a `Field`
pub type FieldRc = Arc<Field>;
/// A map that holds the mapping of Token to `Field`
pub type FieldMap = SkipMap<Token, FieldRc>;

/// A method parameter definition
pub struct Param {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// The name of the parameter
    pub name: String,
    /// One-based position within the method's parameter list
    pub sequence: u32,
    /// The method declaring this parameter
    pub method: Token,
    /// The parameter's default-value constant, set once during model construction
    pub default_value: OnceLock<Token>,
}

impl Param {
    /// The parameter's default-value constant, nil when the parameter has none
    #[must_use]
    pub fn default_value(&self) -> Token {
        self.default_value.get().copied().unwrap_or_else(Token::nil)
    }
}

/// A reference to a `Param`
pub type ParamRc = Arc<Param>;
/// A map that holds the mapping of Token to `Param`
pub type ParamMap = SkipMap<Token, ParamRc>;

/// A property definition
pub struct Property {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// The name of the property
    pub name: String,
    /// The type declaring this property
    pub declaring_type: Token,
    /// The property's default-value constant, set once during model construction
    pub default_value: OnceLock<Token>,
}

impl Property {
    /// The property's default-value constant, nil when the property has none
    #[must_use]
    pub fn default_value(&self) -> Token {
        self.default_value.get().copied().unwrap_or_else(Token::nil)
    }
}

/// A reference to a `Property`
pub type PropertyRc = Arc<Property>;
/// A map that holds the mapping of Token to `Property`
pub type PropertyMap = SkipMap<Token, PropertyRc>;

/// An event definition and its accessor wiring
pub struct Event {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// The name of the event
    pub name: String,
    /// The method that handles `add`; events always define one
    pub fn_on_add: Token,
    /// The method that handles `remove`; events always define one
    pub fn_on_remove: Token,
    /// The method that handles `raise`, nil when the event has none
    pub fn_on_raise: Token,
}

/// A reference to an `Event`
pub type EventRc = Arc<Event>;
/// A map that holds the mapping of Token to `Event`
pub type EventMap = SkipMap<Token, EventRc>;

/// Type of a constant value, as stored in the constant table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[repr(u8)]
pub enum ConstantTypeCode {
    /// bool
    Boolean = 0x02,
    /// char
    Char = 0x03,
    /// signed 8bit integer
    I1 = 0x04,
    /// unsigned 8bit integer
    U1 = 0x05,
    /// signed 16bit integer
    I2 = 0x06,
    /// unsigned 16bit integer
    U2 = 0x07,
    /// signed 32bit integer
    I4 = 0x08,
    /// unsigned 32bit integer
    U4 = 0x09,
    /// signed 64bit integer
    I8 = 0x0A,
    /// unsigned 64bit integer
    U8 = 0x0B,
    /// 32bit floating-point
    R4 = 0x0C,
    /// 64bit floating-point
    R8 = 0x0D,
    /// System.String
    String = 0x0E,
    /// A null reference
    NullRef = 0x12,
}

/// A compile-time default value attached to a field, parameter or property
pub struct Constant {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// The type of the stored value
    pub type_code: ConstantTypeCode,
    /// The entity this constant is the default value of
    pub parent: Token,
    /// The raw little-endian value bytes
    pub value: Vec<u8>,
}

/// A reference to a `Constant`
pub type ConstantRc = Arc<Constant>;
/// A map that holds the mapping of Token to `Constant`
pub type ConstantMap = SkipMap<Token, ConstantRc>;

/// A reference to an external assembly
pub struct AssemblyRef {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// The name of the referenced assembly
    pub name: String,
    /// The culture of the referenced assembly, None for culture-neutral
    pub culture: Option<String>,
    /// Major version of the referenced assembly
    pub major_version: u32,
    /// Minor version of the referenced assembly
    pub minor_version: u32,
    /// Build number of the referenced assembly
    pub build_number: u32,
    /// Revision number of the referenced assembly
    pub revision_number: u32,
    /// Public key or token bytes; empty when the reference is not strong-named
    pub public_key_or_token: Vec<u8>,
}

impl AssemblyRef {
    /// The four-part version of the referenced assembly
    #[must_use]
    pub fn version(&self) -> (u32, u32, u32, u32) {
        (
            self.major_version,
            self.minor_version,
            self.build_number,
            self.revision_number,
        )
    }
}

/// A reference to an `AssemblyRef`
pub type AssemblyRefRc = Arc<AssemblyRef>;
/// A map that holds the mapping of Token to `AssemblyRef`
pub type AssemblyRefMap = SkipMap<Token, AssemblyRefRc>;

/// A file belonging to the assembly manifest
pub struct AssemblyFile {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// The name of the file
    pub name: String,
}

/// A reference to an `AssemblyFile`
pub type AssemblyFileRc = Arc<AssemblyFile>;
/// A map that holds the mapping of Token to `AssemblyFile`
pub type AssemblyFileMap = SkipMap<Token, AssemblyFileRc>;
