use std::sync::Arc;

use crate::{
    metadata::{
        mapping::{Mapping, MappingCache},
        model::{EventRc, MetadataModel},
        token::{HandleKind, Token},
    },
    Error, Result,
};

/// The entity-mapping engine.
///
/// Constructed once per pair of metadata models and alive for the duration
/// of one comparison run. The engine owns no entities - it holds the two
/// models, one memoization cache per implemented entity kind, and nothing
/// else. All caches start empty and fill on demand.
///
/// Every resolver follows the shared policy *name equality first, scope
/// equality second, structural equality third*, with kind-specific
/// variations documented on each accessor. Resolution is recursive: mapping
/// a field maps its declaring type, mapping an event maps its accessor
/// methods, comparing a named-type signature maps its handle. The caches
/// make the recursion cheap and idempotent.
///
/// The engine is `Send + Sync`; a diagnostic layer may map unrelated
/// entities from many threads at once. See the module documentation for the
/// concurrency contract.
///
/// # Example
///
/// ```rust
/// use dotcompat::prelude::*;
///
/// let mut old = MetadataModelBuilder::new();
/// let c = old.type_def("N", "C");
/// let f = old.field(c, "f", SignatureField::new(TypeSignature::I4));
///
/// let mut new = MetadataModelBuilder::new();
/// let c2 = new.type_def("N", "C");
/// let f2 = new.field(c2, "f", SignatureField::new(TypeSignature::I4));
///
/// let mapping = MetadataMapping::new(old.build().into(), new.build().into());
/// assert_eq!(mapping.map_field_definition(f)?, Mapping::Unique(f2));
/// # Ok::<(), dotcompat::Error>(())
/// ```
pub struct MetadataMapping {
    source: Arc<MetadataModel>,
    target: Arc<MetadataModel>,

    type_definitions: MappingCache,
    type_references: MappingCache,
    method_definitions: MappingCache,
    field_definitions: MappingCache,
    event_definitions: MappingCache,
    constants: MappingCache,
    assembly_references: MappingCache,
    assembly_files: MappingCache,
}

impl MetadataMapping {
    /// Create an engine over a source (old) and target (new) model
    #[must_use]
    pub fn new(source: Arc<MetadataModel>, target: Arc<MetadataModel>) -> Self {
        MetadataMapping {
            source,
            target,
            type_definitions: MappingCache::new(),
            type_references: MappingCache::new(),
            method_definitions: MappingCache::new(),
            field_definitions: MappingCache::new(),
            event_definitions: MappingCache::new(),
            constants: MappingCache::new(),
            assembly_references: MappingCache::new(),
            assembly_files: MappingCache::new(),
        }
    }

    /// The source (old version) model
    #[must_use]
    pub fn source(&self) -> &MetadataModel {
        &self.source
    }

    /// The target (new version) model
    #[must_use]
    pub fn target(&self) -> &MetadataModel {
        &self.target
    }

    /// Map a reference whose kind is not known until runtime.
    ///
    /// This is the single polymorphic entry point: a nil handle maps to
    /// [`Mapping::Unmapped`], a handle of an implemented kind is routed to
    /// that kind's resolver, and a handle of a known-but-unimplemented kind
    /// fails with [`Error::MappingNotImplemented`] - a statement about the
    /// engine, deliberately distinct from the unmapped outcome.
    ///
    /// # Errors
    /// - [`Error::UnsupportedHandle`] when the table byte names no known kind
    /// - [`Error::MappingNotImplemented`] for kinds without a resolver
    /// - Any error of the routed resolver
    pub fn map_handle(&self, handle: Token) -> Result<Mapping> {
        if handle.is_null() {
            return Ok(Mapping::Unmapped);
        }

        let Some(kind) = handle.kind() else {
            return Err(Error::UnsupportedHandle(handle));
        };

        match kind {
            HandleKind::TypeDef => self.map_type_definition(handle),
            HandleKind::TypeRef => self.map_type_reference(handle),
            HandleKind::MethodDef => self.map_method_definition(handle),
            HandleKind::Field => self.map_field_definition(handle),
            HandleKind::Event => self.map_event_definition(handle),
            HandleKind::Constant => self.map_constant(handle),
            HandleKind::AssemblyRef => self.map_assembly_reference(handle),
            HandleKind::File => self.map_assembly_file(handle),
            unimplemented @ (HandleKind::Module
            | HandleKind::Param
            | HandleKind::InterfaceImpl
            | HandleKind::MemberRef
            | HandleKind::CustomAttribute
            | HandleKind::DeclSecurity
            | HandleKind::StandAloneSig
            | HandleKind::Property
            | HandleKind::MethodImpl
            | HandleKind::ModuleRef
            | HandleKind::TypeSpec
            | HandleKind::Assembly
            | HandleKind::ExportedType
            | HandleKind::ManifestResource
            | HandleKind::GenericParam
            | HandleKind::MethodSpec
            | HandleKind::GenericParamConstraint
            | HandleKind::NamespaceDefinition) => {
                Err(Error::MappingNotImplemented(unimplemented))
            }
        }
    }

    /// Map a type definition handle.
    ///
    /// Matches target type definitions with equal simple name and equal
    /// namespace; a nested candidate additionally requires the source's
    /// mapped declaring type to equal the candidate's declaring type. The
    /// first structural match wins - this kind has no ambiguity
    /// representation, the outcome is unique or unmapped. Types differing
    /// only by generic arity are not disambiguated.
    ///
    /// # Errors
    /// [`Error::RowNotFound`] if the handle has no row in the source model
    pub fn map_type_definition(&self, handle: Token) -> Result<Mapping> {
        self.type_definitions
            .get_or_try_insert_with(handle, || self.map_type_definition_impl(handle))
    }

    /// Map a type reference handle.
    ///
    /// Matches target type references by name and namespace only. No
    /// declaring-type or signature narrowing is applied; references carry no
    /// body to compare.
    ///
    /// # Errors
    /// [`Error::RowNotFound`] if the handle has no row in the source model
    pub fn map_type_reference(&self, handle: Token) -> Result<Mapping> {
        self.type_references
            .get_or_try_insert_with(handle, || self.map_type_reference_impl(handle))
    }

    /// Map a method definition handle.
    ///
    /// Matches target methods by simple name, requiring declaring-type
    /// agreement when the candidate has one. The first match wins; parameter
    /// lists are not consulted, so a method with overloaded siblings may map
    /// to the wrong overload.
    ///
    /// # Errors
    /// [`Error::RowNotFound`] if the handle has no row in the source model
    pub fn map_method_definition(&self, handle: Token) -> Result<Mapping> {
        self.method_definitions
            .get_or_try_insert_with(handle, || self.map_method_definition_impl(handle))
    }

    /// Map a field definition handle.
    ///
    /// Maps the declaring type first, then scans its fields for a name
    /// match. A name match with a structurally equal signature is unique; a
    /// name match with a differing signature is ambiguous, carrying the
    /// comparator's mismatch reason; no name match is unmapped.
    ///
    /// # Errors
    /// - [`Error::RowNotFound`] if a handle has no row in its model
    /// - The comparator's hard failures for unsupported signature shapes
    pub fn map_field_definition(&self, handle: Token) -> Result<Mapping> {
        self.field_definitions
            .get_or_try_insert_with(handle, || self.map_field_definition_impl(handle))
    }

    /// Map an event definition handle.
    ///
    /// The declaring type is located through the adder accessor, which
    /// every event defines. The declaring type, adder and remover must all
    /// map uniquely (the raiser too, when the source event has one); the
    /// target event is then located by name on the mapped declaring type and
    /// its own accessors are re-verified against the independently computed
    /// accessor mappings. Any disagreement yields unmapped - never
    /// ambiguous - because a name match with rewired accessors is not the
    /// same event.
    ///
    /// # Errors
    /// [`Error::RowNotFound`] if a handle has no row in its model
    pub fn map_event_definition(&self, handle: Token) -> Result<Mapping> {
        self.event_definitions
            .get_or_try_insert_with(handle, || self.map_event_definition_impl(handle))
    }

    /// Map a constant handle.
    ///
    /// The constant's parent (a field, parameter or property) is mapped
    /// through the untyped dispatcher; the mapped parent's kind selects its
    /// default-value slot in the target model. An unmapped parent or an
    /// empty slot yields unmapped. A type-code mismatch or a raw-value
    /// mismatch yields an ambiguous outcome naming the difference.
    ///
    /// # Errors
    /// - Whatever the parent's resolver raises (a parameter or property
    ///   parent raises [`Error::MappingNotImplemented`])
    /// - [`Error::ConstantParent`] if the mapped parent has no default-value
    ///   slot
    pub fn map_constant(&self, handle: Token) -> Result<Mapping> {
        self.constants
            .get_or_try_insert_with(handle, || self.map_constant_impl(handle))
    }

    /// Map an assembly reference handle.
    ///
    /// Matches by name and culture; when the source reference carries a
    /// public key or token, the version and key bytes must match as well.
    /// First matching entry wins.
    ///
    /// # Errors
    /// [`Error::RowNotFound`] if the handle has no row in the source model
    pub fn map_assembly_reference(&self, handle: Token) -> Result<Mapping> {
        self.assembly_references
            .get_or_try_insert_with(handle, || self.map_assembly_reference_impl(handle))
    }

    /// Map an assembly file handle, matching by file name.
    ///
    /// # Errors
    /// [`Error::RowNotFound`] if the handle has no row in the source model
    pub fn map_assembly_file(&self, handle: Token) -> Result<Mapping> {
        self.assembly_files
            .get_or_try_insert_with(handle, || self.map_assembly_file_impl(handle))
    }

    fn map_type_definition_impl(&self, handle: Token) -> Result<Mapping> {
        let source_type = self.source.type_def(handle)?;

        for entry in self.target.type_defs().iter() {
            let candidate = entry.value();
            if !self.target.ident_eq(&candidate.name, &source_type.name) {
                continue;
            }
            if !self
                .target
                .ident_eq(&candidate.namespace, &source_type.namespace)
            {
                continue;
            }

            if !candidate.declaring_type.is_null() {
                if source_type.declaring_type.is_null() {
                    continue;
                }

                let declaring = self.map_type_definition(source_type.declaring_type)?;
                let Some(mapped) = declaring.target() else {
                    continue;
                };
                if mapped != candidate.declaring_type {
                    continue;
                }
            }

            return Ok(Mapping::unique(candidate.token));
        }

        Ok(Mapping::Unmapped)
    }

    fn map_type_reference_impl(&self, handle: Token) -> Result<Mapping> {
        let source_ref = self.source.type_ref(handle)?;

        for entry in self.target.type_refs().iter() {
            let candidate = entry.value();
            if !self.target.ident_eq(&candidate.name, &source_ref.name) {
                continue;
            }
            if !self
                .target
                .ident_eq(&candidate.namespace, &source_ref.namespace)
            {
                continue;
            }

            return Ok(Mapping::unique(candidate.token));
        }

        Ok(Mapping::Unmapped)
    }

    fn map_method_definition_impl(&self, handle: Token) -> Result<Mapping> {
        let source_method = self.source.method_def(handle)?;

        for entry in self.target.method_defs().iter() {
            let candidate = entry.value();
            if !self.target.ident_eq(&candidate.name, &source_method.name) {
                continue;
            }

            if !candidate.declaring_type.is_null() {
                if source_method.declaring_type.is_null() {
                    continue;
                }

                let declaring = self.map_type_definition(source_method.declaring_type)?;
                let Some(mapped) = declaring.target() else {
                    continue;
                };
                if mapped != candidate.declaring_type {
                    continue;
                }
            }

            return Ok(Mapping::unique(candidate.token));
        }

        Ok(Mapping::Unmapped)
    }

    fn map_field_definition_impl(&self, handle: Token) -> Result<Mapping> {
        let source_field = self.source.field(handle)?;

        let declaring = self.map_type_definition(source_field.declaring_type)?;
        let Some(target_declaring) = declaring.target() else {
            return Ok(Mapping::Unmapped);
        };

        let target_type = self.target.type_def(target_declaring)?;
        for (_, field_token) in target_type.fields.iter() {
            let candidate = self.target.field(*field_token)?;
            if !self.target.ident_eq(&candidate.name, &source_field.name) {
                continue;
            }

            // The name matches; the signature decides between a unique
            // target and an ambiguous candidate.
            return Ok(
                match self.compare_field_signatures(&source_field.signature, &candidate.signature)?
                {
                    None => Mapping::unique(candidate.token),
                    Some(reason) => Mapping::candidate(candidate.token, reason),
                },
            );
        }

        Ok(Mapping::Unmapped)
    }

    fn map_event_definition_impl(&self, handle: Token) -> Result<Mapping> {
        let source_event = self.source.event(handle)?;

        // events always have an adder, so use it to find the declaring type
        let adder = self.source.method_def(source_event.fn_on_add)?;
        let declaring = self.map_type_definition(adder.declaring_type)?;
        let Some(target_declaring) = declaring.target() else {
            return Ok(Mapping::Unmapped);
        };

        // each accessor must map uniquely; only the raiser is optional
        let Some(target_adder) = self.map_method_definition(source_event.fn_on_add)?.target()
        else {
            return Ok(Mapping::Unmapped);
        };
        let Some(target_remover) = self
            .map_method_definition(source_event.fn_on_remove)?
            .target()
        else {
            return Ok(Mapping::Unmapped);
        };
        let mut target_raiser = Token::nil();
        if !source_event.fn_on_raise.is_null() {
            match self.map_method_definition(source_event.fn_on_raise)?.target() {
                Some(mapped) => target_raiser = mapped,
                None => return Ok(Mapping::Unmapped),
            }
        }

        // locate the target event by declaring type and name
        let mut located: Option<EventRc> = None;
        for entry in self.target.events().iter() {
            let candidate = entry.value();
            let candidate_adder = self.target.method_def(candidate.fn_on_add)?;
            if candidate_adder.declaring_type != target_declaring {
                continue;
            }
            if !self.target.ident_eq(&candidate.name, &source_event.name) {
                continue;
            }

            located = Some(candidate.clone());
            break;
        }

        let Some(target_event) = located else {
            return Ok(Mapping::Unmapped);
        };

        // a same-name event with different accessor wiring is a different
        // event, not an imperfect match
        if target_event.fn_on_add != target_adder {
            return Ok(Mapping::Unmapped);
        }
        if target_event.fn_on_remove != target_remover {
            return Ok(Mapping::Unmapped);
        }
        if !source_event.fn_on_raise.is_null() && target_event.fn_on_raise != target_raiser {
            return Ok(Mapping::Unmapped);
        }

        Ok(Mapping::unique(target_event.token))
    }

    fn map_constant_impl(&self, handle: Token) -> Result<Mapping> {
        let source_constant = self.source.constant(handle)?;

        let parent = self.map_handle(source_constant.parent)?;
        let Some(target_parent) = parent.target() else {
            return Ok(Mapping::Unmapped);
        };

        let target_handle = match target_parent.kind() {
            Some(HandleKind::Param) => self.target.param(target_parent)?.default_value(),
            Some(HandleKind::Field) => self.target.field(target_parent)?.default_value(),
            Some(HandleKind::Property) => self.target.property(target_parent)?.default_value(),
            _ => return Err(Error::ConstantParent(target_parent)),
        };

        if target_handle.is_null() {
            return Ok(Mapping::Unmapped);
        }

        let target_constant = self.target.constant(target_handle)?;
        if source_constant.type_code != target_constant.type_code {
            return Ok(Mapping::candidate(
                target_handle,
                "Mapped constant has a different type.",
            ));
        }

        if source_constant.value != target_constant.value {
            return Ok(Mapping::candidate(
                target_handle,
                "Mapped constant has a different value.",
            ));
        }

        Ok(Mapping::unique(target_handle))
    }

    fn map_assembly_reference_impl(&self, handle: Token) -> Result<Mapping> {
        let source_ref = self.source.assembly_ref(handle)?;

        for entry in self.target.assembly_refs().iter() {
            let candidate = entry.value();
            if !self.target.ident_eq(&candidate.name, &source_ref.name) {
                continue;
            }
            if !self.culture_eq(source_ref.culture.as_deref(), candidate.culture.as_deref()) {
                continue;
            }

            // a strong-named source reference must also agree on version
            // and key material
            if !source_ref.public_key_or_token.is_empty() {
                if candidate.version() != source_ref.version() {
                    continue;
                }
                if candidate.public_key_or_token != source_ref.public_key_or_token {
                    continue;
                }
            }

            return Ok(Mapping::unique(candidate.token));
        }

        Ok(Mapping::Unmapped)
    }

    fn map_assembly_file_impl(&self, handle: Token) -> Result<Mapping> {
        let source_file = self.source.file(handle)?;

        for entry in self.target.files().iter() {
            let candidate = entry.value();
            if !self.target.ident_eq(&candidate.name, &source_file.name) {
                continue;
            }

            return Ok(Mapping::unique(candidate.token));
        }

        Ok(Mapping::Unmapped)
    }

    fn culture_eq(&self, source: Option<&str>, target: Option<&str>) -> bool {
        match (source, target) {
            (None, None) => true,
            (Some(a), Some(b)) => self.target.ident_eq(a, b),
            _ => false,
        }
    }

    /// Cross-model handle identity: does `source` translate to `target`?
    ///
    /// Nil-ness must agree; two nil handles are the same "no entity". For
    /// non-nil handles the source is mapped through the dispatcher and must
    /// come out as exactly `target`.
    pub(crate) fn is_same_handle(&self, source: Token, target: Token) -> Result<bool> {
        if source.is_null() != target.is_null() {
            return Ok(false);
        }
        if source.is_null() {
            return Ok(true);
        }

        match self.map_handle(source)?.target() {
            Some(mapped) => Ok(mapped == target),
            None => Ok(false),
        }
    }
}
