use crate::{
    metadata::{
        mapping::MetadataMapping,
        signatures::{SignatureField, TypeSignature},
        token::Token,
    },
    Error, Result,
};

/// Signature structural equivalence.
///
/// The comparator is pure apart from one load-bearing edge: deciding whether
/// two *named* types are the same entity requires translating the source
/// handle through the engine, which is what ties signature comparison back
/// into entity mapping (and through it, into the caches).
impl MetadataMapping {
    /// Compare a source-model field signature against a target-model one.
    ///
    /// Returns `None` when the signatures are equivalent, or a
    /// human-readable mismatch reason.
    ///
    /// # Errors
    /// [`Error::CustomModifiersNotImplemented`] when either side carries
    /// custom modifiers, plus any hard failure of the type comparison
    pub fn compare_field_signatures(
        &self,
        source: &SignatureField,
        target: &SignatureField,
    ) -> Result<Option<String>> {
        if !source.modifiers.is_empty() || !target.modifiers.is_empty() {
            return Err(Error::CustomModifiersNotImplemented);
        }

        self.compare_type_signatures(&source.base, &target.base)
    }

    /// Compare a source-model type signature against a target-model one.
    ///
    /// Returns `None` when the signatures are structurally equivalent, or a
    /// mismatch reason. Primitive kinds compare by discriminant alone; named
    /// types delegate identity to the mapping engine; generic instantiations
    /// compare the unbound type, the arity, and then each argument pair
    /// recursively; generic parameters compare by zero-based index only,
    /// never by name - parameter names are not part of the binary contract.
    ///
    /// # Errors
    /// - [`Error::SignatureNotImplemented`] for multi-dimensional arrays,
    ///   pointers and function pointers
    /// - [`Error::CustomModifiersNotImplemented`] for modified array
    ///   elements
    /// - [`Error::InvalidSignature`] for a generic instantiation whose
    ///   unbound type is not a named type
    pub fn compare_type_signatures(
        &self,
        source: &TypeSignature,
        target: &TypeSignature,
    ) -> Result<Option<String>> {
        match (source, target) {
            (TypeSignature::Boolean, TypeSignature::Boolean)
            | (TypeSignature::Char, TypeSignature::Char)
            | (TypeSignature::I1, TypeSignature::I1)
            | (TypeSignature::U1, TypeSignature::U1)
            | (TypeSignature::I2, TypeSignature::I2)
            | (TypeSignature::U2, TypeSignature::U2)
            | (TypeSignature::I4, TypeSignature::I4)
            | (TypeSignature::U4, TypeSignature::U4)
            | (TypeSignature::I8, TypeSignature::I8)
            | (TypeSignature::U8, TypeSignature::U8)
            | (TypeSignature::R4, TypeSignature::R4)
            | (TypeSignature::R8, TypeSignature::R8)
            | (TypeSignature::I, TypeSignature::I)
            | (TypeSignature::U, TypeSignature::U)
            | (TypeSignature::String, TypeSignature::String)
            | (TypeSignature::Object, TypeSignature::Object) => Ok(None),

            (TypeSignature::Class(source_token), TypeSignature::Class(target_token))
            | (TypeSignature::ValueType(source_token), TypeSignature::ValueType(target_token)) => {
                if self.is_same_handle(*source_token, *target_token)? {
                    Ok(None)
                } else {
                    Ok(Some("Type handle mismatch".to_string()))
                }
            }

            (
                TypeSignature::GenericInst(source_base, source_args),
                TypeSignature::GenericInst(target_base, target_args),
            ) => {
                let (Some(source_token), Some(target_token)) =
                    (named_type_token(source_base), named_type_token(target_base))
                else {
                    return Err(Error::InvalidSignature);
                };

                if !self.is_same_handle(source_token, target_token)? {
                    return Ok(Some("Unbound generic type does not match.".to_string()));
                }

                if source_args.len() != target_args.len() {
                    return Ok(Some("Generic arity does not match.".to_string()));
                }

                for (index, (source_arg, target_arg)) in
                    source_args.iter().zip(target_args).enumerate()
                {
                    if let Some(reason) = self.compare_type_signatures(source_arg, target_arg)? {
                        return Ok(Some(format!(
                            "Generic parameter {index} does not match: {reason}"
                        )));
                    }
                }

                Ok(None)
            }

            (
                TypeSignature::GenericParamType(source_index),
                TypeSignature::GenericParamType(target_index),
            )
            | (
                TypeSignature::GenericParamMethod(source_index),
                TypeSignature::GenericParamMethod(target_index),
            ) => {
                if source_index == target_index {
                    Ok(None)
                } else {
                    Ok(Some("Generic parameter index differs.".to_string()))
                }
            }

            (TypeSignature::SzArray(source_array), TypeSignature::SzArray(target_array)) => {
                if !source_array.modifiers.is_empty() || !target_array.modifiers.is_empty() {
                    return Err(Error::CustomModifiersNotImplemented);
                }

                Ok(self
                    .compare_type_signatures(&source_array.base, &target_array.base)?
                    .map(|reason| format!("SZArray element type mismatch: {reason}")))
            }

            (TypeSignature::Array(_), TypeSignature::Array(_)) => {
                Err(Error::SignatureNotImplemented("Array"))
            }
            (TypeSignature::Ptr(_), TypeSignature::Ptr(_)) => {
                Err(Error::SignatureNotImplemented("Pointer"))
            }
            (TypeSignature::FnPtr(_), TypeSignature::FnPtr(_)) => {
                Err(Error::SignatureNotImplemented("FunctionPointer"))
            }

            _ => Ok(Some("Type mismatch".to_string())),
        }
    }
}

fn named_type_token(signature: &TypeSignature) -> Option<Token> {
    match signature {
        TypeSignature::Class(token) | TypeSignature::ValueType(token) => Some(*token),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::metadata::{
        model::MetadataModelBuilder,
        signatures::{SignatureArray, SignatureSzArray},
        token::HandleKind,
    };

    fn empty_engine() -> MetadataMapping {
        MetadataMapping::new(
            Arc::new(MetadataModelBuilder::new().build()),
            Arc::new(MetadataModelBuilder::new().build()),
        )
    }

    /// source and target each define N.C; returns the engine and both tokens
    fn engine_with_named_type() -> (MetadataMapping, Token, Token) {
        let mut source = MetadataModelBuilder::new();
        let c = source.type_def("N", "C");
        let mut target = MetadataModelBuilder::new();
        let c2 = target.type_def("N", "C");
        (
            MetadataMapping::new(Arc::new(source.build()), Arc::new(target.build())),
            c,
            c2,
        )
    }

    #[test]
    fn test_primitives_compare_by_discriminant() {
        let engine = empty_engine();
        assert_eq!(
            engine
                .compare_type_signatures(&TypeSignature::I4, &TypeSignature::I4)
                .unwrap(),
            None
        );
        assert_eq!(
            engine
                .compare_type_signatures(&TypeSignature::I4, &TypeSignature::I8)
                .unwrap(),
            Some("Type mismatch".to_string())
        );
        assert_eq!(
            engine
                .compare_type_signatures(&TypeSignature::String, &TypeSignature::Object)
                .unwrap(),
            Some("Type mismatch".to_string())
        );
    }

    #[test]
    fn test_named_type_identity_goes_through_the_engine() {
        let (engine, c, c2) = engine_with_named_type();
        assert_eq!(
            engine
                .compare_type_signatures(&TypeSignature::Class(c), &TypeSignature::Class(c2))
                .unwrap(),
            None
        );

        // a target token the source type does not map to
        let other = Token::from_parts(HandleKind::TypeDef, 42);
        assert_eq!(
            engine
                .compare_type_signatures(&TypeSignature::Class(c), &TypeSignature::Class(other))
                .unwrap(),
            Some("Type handle mismatch".to_string())
        );
    }

    #[test]
    fn test_class_vs_valuetype_is_a_type_mismatch() {
        let (engine, c, c2) = engine_with_named_type();
        assert_eq!(
            engine
                .compare_type_signatures(&TypeSignature::Class(c), &TypeSignature::ValueType(c2))
                .unwrap(),
            Some("Type mismatch".to_string())
        );
    }

    #[test]
    fn test_generic_instantiation_arity_reason() {
        let (engine, c, c2) = engine_with_named_type();
        let source = TypeSignature::GenericInst(
            Box::new(TypeSignature::Class(c)),
            vec![TypeSignature::I4, TypeSignature::I4],
        );
        let target = TypeSignature::GenericInst(
            Box::new(TypeSignature::Class(c2)),
            vec![TypeSignature::I4],
        );
        assert_eq!(
            engine.compare_type_signatures(&source, &target).unwrap(),
            Some("Generic arity does not match.".to_string())
        );
    }

    #[test]
    fn test_generic_instantiation_argument_reason_carries_position() {
        let (engine, c, c2) = engine_with_named_type();
        let source = TypeSignature::GenericInst(
            Box::new(TypeSignature::Class(c)),
            vec![TypeSignature::I4, TypeSignature::String],
        );
        let target = TypeSignature::GenericInst(
            Box::new(TypeSignature::Class(c2)),
            vec![TypeSignature::I4, TypeSignature::Object],
        );
        assert_eq!(
            engine.compare_type_signatures(&source, &target).unwrap(),
            Some("Generic parameter 1 does not match: Type mismatch".to_string())
        );
    }

    #[test]
    fn test_generic_instantiation_unbound_type_reason() {
        let mut source_model = MetadataModelBuilder::new();
        let c = source_model.type_def("N", "C");
        let mut target_model = MetadataModelBuilder::new();
        let _ = target_model.type_def("N", "Other");
        let unrelated = target_model.type_def("N", "Unrelated");
        let engine = MetadataMapping::new(
            Arc::new(source_model.build()),
            Arc::new(target_model.build()),
        );

        let source =
            TypeSignature::GenericInst(Box::new(TypeSignature::Class(c)), vec![TypeSignature::I4]);
        let target = TypeSignature::GenericInst(
            Box::new(TypeSignature::Class(unrelated)),
            vec![TypeSignature::I4],
        );
        assert_eq!(
            engine.compare_type_signatures(&source, &target).unwrap(),
            Some("Unbound generic type does not match.".to_string())
        );
    }

    #[test]
    fn test_generic_instantiation_matches_recursively() {
        let (engine, c, c2) = engine_with_named_type();
        let source = TypeSignature::GenericInst(
            Box::new(TypeSignature::Class(c)),
            vec![TypeSignature::GenericParamType(0)],
        );
        let target = TypeSignature::GenericInst(
            Box::new(TypeSignature::Class(c2)),
            vec![TypeSignature::GenericParamType(0)],
        );
        assert_eq!(engine.compare_type_signatures(&source, &target).unwrap(), None);
    }

    #[test]
    fn test_generic_parameter_index_comparison() {
        let engine = empty_engine();
        assert_eq!(
            engine
                .compare_type_signatures(
                    &TypeSignature::GenericParamMethod(0),
                    &TypeSignature::GenericParamMethod(0)
                )
                .unwrap(),
            None
        );
        assert_eq!(
            engine
                .compare_type_signatures(
                    &TypeSignature::GenericParamType(0),
                    &TypeSignature::GenericParamType(1)
                )
                .unwrap(),
            Some("Generic parameter index differs.".to_string())
        );
        // a type-level parameter is not a method-level parameter
        assert_eq!(
            engine
                .compare_type_signatures(
                    &TypeSignature::GenericParamType(0),
                    &TypeSignature::GenericParamMethod(0)
                )
                .unwrap(),
            Some("Type mismatch".to_string())
        );
    }

    #[test]
    fn test_szarray_element_reason_is_wrapped() {
        let engine = empty_engine();
        let source = TypeSignature::SzArray(SignatureSzArray {
            modifiers: Vec::new(),
            base: Box::new(TypeSignature::I4),
        });
        let target = TypeSignature::SzArray(SignatureSzArray {
            modifiers: Vec::new(),
            base: Box::new(TypeSignature::I8),
        });
        assert_eq!(
            engine.compare_type_signatures(&source, &target).unwrap(),
            Some("SZArray element type mismatch: Type mismatch".to_string())
        );

        let same = TypeSignature::SzArray(SignatureSzArray {
            modifiers: Vec::new(),
            base: Box::new(TypeSignature::I4),
        });
        assert_eq!(engine.compare_type_signatures(&source, &same).unwrap(), None);
    }

    #[test]
    fn test_szarray_modifiers_fail_loudly() {
        let engine = empty_engine();
        let modified = TypeSignature::SzArray(SignatureSzArray {
            modifiers: vec![Token::from_parts(HandleKind::TypeRef, 1)],
            base: Box::new(TypeSignature::I4),
        });
        let plain = TypeSignature::SzArray(SignatureSzArray {
            modifiers: Vec::new(),
            base: Box::new(TypeSignature::I4),
        });
        assert!(matches!(
            engine.compare_type_signatures(&modified, &plain),
            Err(Error::CustomModifiersNotImplemented)
        ));
    }

    #[test]
    fn test_unimplemented_shapes_fail_loudly() {
        let engine = empty_engine();
        let array = TypeSignature::Array(SignatureArray {
            base: Box::new(TypeSignature::I4),
            rank: 2,
            dimensions: Vec::new(),
        });
        assert!(matches!(
            engine.compare_type_signatures(&array, &array.clone()),
            Err(Error::SignatureNotImplemented("Array"))
        ));

        // mismatched discriminants stay an ordinary mismatch, even when one
        // side is an unimplemented shape
        assert_eq!(
            engine
                .compare_type_signatures(&array, &TypeSignature::I4)
                .unwrap(),
            Some("Type mismatch".to_string())
        );
    }

    #[test]
    fn test_field_signature_modifiers_fail_loudly() {
        let engine = empty_engine();
        let modified = SignatureField {
            modifiers: vec![Token::from_parts(HandleKind::TypeRef, 1)],
            base: TypeSignature::I4,
        };
        let plain = SignatureField::new(TypeSignature::I4);
        assert!(matches!(
            engine.compare_field_signatures(&modified, &plain),
            Err(Error::CustomModifiersNotImplemented)
        ));
        assert!(matches!(
            engine.compare_field_signatures(&plain, &modified),
            Err(Error::CustomModifiersNotImplemented)
        ));
    }

    #[test]
    fn test_named_type_through_type_reference() {
        // named-type identity also works for type references, which map by
        // name alone
        let mut source_model = MetadataModelBuilder::new();
        let r = source_model.type_ref("System", "Uri");
        let mut target_model = MetadataModelBuilder::new();
        let r2 = target_model.type_ref("System", "Uri");
        let engine = MetadataMapping::new(
            Arc::new(source_model.build()),
            Arc::new(target_model.build()),
        );

        assert_eq!(
            engine
                .compare_type_signatures(&TypeSignature::Class(r), &TypeSignature::Class(r2))
                .unwrap(),
            None
        );
    }
}
