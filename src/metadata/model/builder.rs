use std::sync::{Arc, OnceLock};

use crossbeam_skiplist::SkipMap;

use crate::metadata::{
    model::{
        AssemblyFile, AssemblyRef, Constant, ConstantTypeCode, Event, Field, IdentifierComparer,
        MetadataModel, MethodDef, Param, Property, TypeDef, TypeRef,
    },
    signatures::SignatureField,
    token::{HandleKind, Token},
};

/// Materializes a [`MetadataModel`] row by row.
///
/// The builder assigns tokens in table order as rows are added, and wires
/// the cross-links - member lists on type definitions, default-value slots
/// on fields, parameters and properties - when [`build`](Self::build) runs.
/// Rows may be added in any order; a field may reference a declaring type
/// that is defined later.
///
/// # Example
///
/// ```rust
/// use dotcompat::prelude::*;
///
/// let mut builder = MetadataModelBuilder::new();
/// let c = builder.type_def("System", "Uri");
/// let f = builder.field(c, "scheme", SignatureField::new(TypeSignature::String));
/// let model = builder.build();
///
/// assert_eq!(model.type_def(c)?.name, "Uri");
/// assert_eq!(model.field(f)?.declaring_type, c);
/// # Ok::<(), dotcompat::Error>(())
/// ```
#[derive(Default)]
pub struct MetadataModelBuilder {
    comparer: IdentifierComparer,
    type_defs: Vec<TypeDef>,
    type_refs: Vec<TypeRef>,
    method_defs: Vec<MethodDef>,
    fields: Vec<Field>,
    params: Vec<Param>,
    properties: Vec<Property>,
    events: Vec<Event>,
    constants: Vec<Constant>,
    assembly_refs: Vec<AssemblyRef>,
    files: Vec<AssemblyFile>,
}

impl MetadataModelBuilder {
    /// A builder for an empty model with case-sensitive identifiers
    #[must_use]
    pub fn new() -> Self {
        MetadataModelBuilder::default()
    }

    /// Configure how identifiers are compared during matching
    #[must_use]
    pub fn with_comparer(mut self, comparer: IdentifierComparer) -> Self {
        self.comparer = comparer;
        self
    }

    /// Add a top-level type definition
    pub fn type_def(&mut self, namespace: &str, name: &str) -> Token {
        self.type_def_in(Token::nil(), namespace, name)
    }

    /// Add a nested type definition enclosed by `declaring`
    pub fn nested_type_def(&mut self, declaring: Token, namespace: &str, name: &str) -> Token {
        self.type_def_in(declaring, namespace, name)
    }

    fn type_def_in(&mut self, declaring: Token, namespace: &str, name: &str) -> Token {
        let rid = self.type_defs.len() as u32 + 1;
        let token = Token::from_parts(HandleKind::TypeDef, rid);
        self.type_defs.push(TypeDef {
            rid,
            token,
            namespace: namespace.to_string(),
            name: name.to_string(),
            declaring_type: declaring,
            fields: boxcar::Vec::new(),
            methods: boxcar::Vec::new(),
        });
        token
    }

    /// Add a reference to a type defined elsewhere
    pub fn type_ref(&mut self, namespace: &str, name: &str) -> Token {
        let rid = self.type_refs.len() as u32 + 1;
        let token = Token::from_parts(HandleKind::TypeRef, rid);
        self.type_refs.push(TypeRef {
            rid,
            token,
            namespace: namespace.to_string(),
            name: name.to_string(),
        });
        token
    }

    /// Add a method definition; `declaring` may be nil for module-level methods
    pub fn method_def(&mut self, declaring: Token, name: &str) -> Token {
        let rid = self.method_defs.len() as u32 + 1;
        let token = Token::from_parts(HandleKind::MethodDef, rid);
        self.method_defs.push(MethodDef {
            rid,
            token,
            name: name.to_string(),
            declaring_type: declaring,
        });
        token
    }

    /// Add a field declared by `declaring`
    pub fn field(&mut self, declaring: Token, name: &str, signature: SignatureField) -> Token {
        let rid = self.fields.len() as u32 + 1;
        let token = Token::from_parts(HandleKind::Field, rid);
        self.fields.push(Field {
            rid,
            token,
            name: name.to_string(),
            declaring_type: declaring,
            signature,
            default_value: OnceLock::new(),
        });
        token
    }

    /// Add a parameter of `method` at one-based position `sequence`
    pub fn param(&mut self, method: Token, sequence: u32, name: &str) -> Token {
        let rid = self.params.len() as u32 + 1;
        let token = Token::from_parts(HandleKind::Param, rid);
        self.params.push(Param {
            rid,
            token,
            name: name.to_string(),
            sequence,
            method,
            default_value: OnceLock::new(),
        });
        token
    }

    /// Add a property declared by `declaring`
    pub fn property(&mut self, declaring: Token, name: &str) -> Token {
        let rid = self.properties.len() as u32 + 1;
        let token = Token::from_parts(HandleKind::Property, rid);
        self.properties.push(Property {
            rid,
            token,
            name: name.to_string(),
            declaring_type: declaring,
            default_value: OnceLock::new(),
        });
        token
    }

    /// Add an event with its accessor methods; only the raiser is optional
    pub fn event(
        &mut self,
        name: &str,
        adder: Token,
        remover: Token,
        raiser: Option<Token>,
    ) -> Token {
        let rid = self.events.len() as u32 + 1;
        let token = Token::from_parts(HandleKind::Event, rid);
        self.events.push(Event {
            rid,
            token,
            name: name.to_string(),
            fn_on_add: adder,
            fn_on_remove: remover,
            fn_on_raise: raiser.unwrap_or_else(Token::nil),
        });
        token
    }

    /// Add a constant as the default value of `parent` (a field, parameter
    /// or property)
    pub fn constant(
        &mut self,
        parent: Token,
        type_code: ConstantTypeCode,
        value: impl Into<Vec<u8>>,
    ) -> Token {
        let rid = self.constants.len() as u32 + 1;
        let token = Token::from_parts(HandleKind::Constant, rid);
        self.constants.push(Constant {
            rid,
            token,
            type_code,
            parent,
            value: value.into(),
        });
        token
    }

    /// Add a reference to an external assembly; an empty
    /// `public_key_or_token` means the reference is not strong-named
    pub fn assembly_ref(
        &mut self,
        name: &str,
        culture: Option<&str>,
        version: (u32, u32, u32, u32),
        public_key_or_token: &[u8],
    ) -> Token {
        let rid = self.assembly_refs.len() as u32 + 1;
        let token = Token::from_parts(HandleKind::AssemblyRef, rid);
        self.assembly_refs.push(AssemblyRef {
            rid,
            token,
            name: name.to_string(),
            culture: culture.map(str::to_string),
            major_version: version.0,
            minor_version: version.1,
            build_number: version.2,
            revision_number: version.3,
            public_key_or_token: public_key_or_token.to_vec(),
        });
        token
    }

    /// Add a manifest file entry
    pub fn file(&mut self, name: &str) -> Token {
        let rid = self.files.len() as u32 + 1;
        let token = Token::from_parts(HandleKind::File, rid);
        self.files.push(AssemblyFile {
            rid,
            token,
            name: name.to_string(),
        });
        token
    }

    /// Finish the model: wire member lists and default-value slots, then
    /// freeze everything
    #[must_use]
    pub fn build(self) -> MetadataModel {
        let model = MetadataModel {
            type_defs: into_map(self.type_defs, |row| row.token),
            type_refs: into_map(self.type_refs, |row| row.token),
            method_defs: into_map(self.method_defs, |row| row.token),
            fields: into_map(self.fields, |row| row.token),
            params: into_map(self.params, |row| row.token),
            properties: into_map(self.properties, |row| row.token),
            events: into_map(self.events, |row| row.token),
            constants: into_map(self.constants, |row| row.token),
            assembly_refs: into_map(self.assembly_refs, |row| row.token),
            files: into_map(self.files, |row| row.token),
            comparer: self.comparer,
        };

        // member lists, in token order
        for entry in model.fields.iter() {
            let field = entry.value();
            if let Some(declaring) = model.type_defs.get(&field.declaring_type) {
                declaring.value().fields.push(field.token);
            }
        }
        for entry in model.method_defs.iter() {
            let method = entry.value();
            if let Some(declaring) = model.type_defs.get(&method.declaring_type) {
                declaring.value().methods.push(method.token);
            }
        }

        // default-value slots; a second constant for the same parent is ignored
        for entry in model.constants.iter() {
            let constant = entry.value();
            match constant.parent.kind() {
                Some(HandleKind::Field) => {
                    if let Some(parent) = model.fields.get(&constant.parent) {
                        let _ = parent.value().default_value.set(constant.token);
                    }
                }
                Some(HandleKind::Param) => {
                    if let Some(parent) = model.params.get(&constant.parent) {
                        let _ = parent.value().default_value.set(constant.token);
                    }
                }
                Some(HandleKind::Property) => {
                    if let Some(parent) = model.properties.get(&constant.parent) {
                        let _ = parent.value().default_value.set(constant.token);
                    }
                }
                _ => {}
            }
        }

        model
    }
}

fn into_map<T: Send + Sync + 'static>(rows: Vec<T>, token: impl Fn(&T) -> Token) -> SkipMap<Token, Arc<T>> {
    let map = SkipMap::new();
    for row in rows {
        map.insert(token(&row), Arc::new(row));
    }
    map
}
