//! Definition resolution: turns declarations into closed variant sets.
//!
//! A declared type qualifies as a sum type when it names a capability set
//! (interface) that is *sealed*: it requires at least one module-private
//! method. Only types of the defining module can provide such a method, so
//! once the module's scope has been enumerated the variant set is closed.
//!
//! Variants are the module's type names whose value type or pointer type
//! implements the interface, in declaration order.

use thiserror::Error;
use tracing::debug;

use crate::decl::Declaration;
use crate::diagnostic::Diagnostic;
use crate::model::{CompilationUnit, MethodSig, TypeId, TypeTable};

/// Why a declaration did not produce a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no symbol with that name in module scope")]
    NotFound,
    #[error("symbol is not an interface type")]
    NotInterface,
    #[error("interface has no module-private method")]
    Unsealed,
    #[error("no type in the module implements the interface")]
    NoVariants,
}

impl ResolveError {
    /// The diagnostic reported for this failure. `NoVariants` is not reported:
    /// a sum type without variants cannot be matched inexhaustively.
    pub fn into_diagnostic(self, decl: &Declaration) -> Option<Diagnostic> {
        let decl = decl.clone();
        match self {
            ResolveError::NotFound => Some(Diagnostic::NotFound { decl }),
            ResolveError::NotInterface => Some(Diagnostic::NotInterface { decl }),
            ResolveError::Unsealed => Some(Diagnostic::Unsealed { decl }),
            ResolveError::NoVariants => None,
        }
    }
}

/// An interface type proven to be sealed.
///
/// Only [`SealedInterface::seal`] constructs one, so holding a value is the
/// proof that the variant set is closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedInterface {
    /// The underlying interface type.
    ty: TypeId,
}

impl SealedInterface {
    /// Seals the underlying interface of `ty`.
    pub fn seal(types: &TypeTable, ty: TypeId) -> Result<Self, ResolveError> {
        let underlying = types.underlying(ty);
        let methods = types
            .interface_methods(underlying)
            .ok_or(ResolveError::NotInterface)?;
        if !methods.iter().any(MethodSig::is_private) {
            return Err(ResolveError::Unsealed);
        }
        Ok(Self { ty: underlying })
    }

    /// The underlying interface type; match sites are compared against it.
    pub fn ty(&self) -> TypeId {
        self.ty
    }

    pub fn methods<'t>(&self, types: &'t TypeTable) -> &'t [MethodSig] {
        types.interface_methods(self.ty).unwrap_or(&[])
    }
}

/// A type belonging to a sum type's closed variant set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub name: String,
    pub ty: TypeId,
}

/// A resolved sum type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub decl: Declaration,
    pub interface: SealedInterface,
    /// In declaration order. Never empty.
    pub variants: Vec<Variant>,
}

impl Definition {
    pub fn type_name(&self) -> &str {
        &self.decl.type_name
    }

    /// Variants none of the `covered` types account for. Pointer indirection
    /// is stripped from both sides before comparing.
    pub fn missing<'d>(&'d self, types: &TypeTable, covered: &[TypeId]) -> Vec<&'d Variant> {
        self.variants
            .iter()
            .filter(|v| {
                let variant = types.indirect(v.ty);
                !covered
                    .iter()
                    .any(|c| types.identical(variant, types.indirect(*c)))
            })
            .collect()
    }
}

/// Resolves a single declaration against its module's scope.
pub fn resolve(unit: &CompilationUnit, decl: &Declaration) -> Result<Definition, ResolveError> {
    let sym = unit.lookup(&decl.type_name).ok_or(ResolveError::NotFound)?;
    // A variable of interface type does not declare a sum type.
    if !sym.is_type() {
        return Err(ResolveError::NotInterface);
    }

    let types = &unit.types;
    let interface = SealedInterface::seal(types, sym.ty)?;
    let required = interface.methods(types);

    let variants: Vec<Variant> = unit
        .type_names()
        .filter(|candidate| !types.identical(types.underlying(candidate.ty), interface.ty()))
        .filter(|candidate| {
            types.implements(candidate.ty, false, required)
                || types.implements(candidate.ty, true, required)
        })
        .map(|candidate| Variant {
            name: candidate.name.clone(),
            ty: candidate.ty,
        })
        .collect();

    if variants.is_empty() {
        return Err(ResolveError::NoVariants);
    }

    Ok(Definition {
        decl: decl.clone(),
        interface,
        variants,
    })
}

/// Resolves every declaration. Each failing declaration contributes at most
/// one diagnostic and never prevents the others from resolving.
pub fn find_definitions(
    unit: &CompilationUnit,
    decls: &[Declaration],
) -> (Vec<Definition>, Vec<Diagnostic>) {
    let mut defs = Vec::new();
    let mut diagnostics = Vec::new();

    for decl in decls {
        match resolve(unit, decl) {
            Ok(def) => {
                debug!(
                    sum_type = %def.type_name(),
                    variants = def.variants.len(),
                    "resolved sum type"
                );
                defs.push(def);
            }
            Err(err) => {
                debug!(sum_type = %decl.type_name, reason = %err, "declaration not resolved");
                diagnostics.extend(err.into_diagnostic(decl));
            }
        }
    }

    (defs, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Position, Receiver, UnitBuilder};

    fn decl(name: &str) -> Declaration {
        Declaration {
            module: "p".to_string(),
            type_name: name.to_string(),
            pos: Position::file_start("src.go"),
        }
    }

    /// `type T interface { sealed() }` with pointer-receiver variants.
    fn sum_type(variants: &[&str]) -> UnitBuilder {
        let mut b = UnitBuilder::new("p");
        let sealed = b.private_method("sealed");
        b.interface("T", vec![sealed.clone()]);
        for name in variants {
            let ty = b.struct_type(name);
            b.method(ty, Receiver::Pointer, sealed.clone());
        }
        b
    }

    fn variant_names(def: &Definition) -> Vec<&str> {
        def.variants.iter().map(|v| v.name.as_str()).collect()
    }

    #[test]
    fn test_resolves_variants_in_declaration_order() {
        let unit = sum_type(&["C", "A", "B"]).build();
        let def = resolve(&unit, &decl("T")).unwrap();
        assert_eq!(variant_names(&def), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_value_receiver_variant() {
        let mut b = sum_type(&["A"]);
        let sealed = b.private_method("sealed");
        let v = b.struct_type("V");
        b.method(v, Receiver::Value, sealed);
        let def = resolve(&b.build(), &decl("T")).unwrap();
        assert_eq!(variant_names(&def), vec!["A", "V"]);
    }

    #[test]
    fn test_not_found() {
        let unit = sum_type(&["A"]).build();
        assert_eq!(resolve(&unit, &decl("Nope")), Err(ResolveError::NotFound));
    }

    #[test]
    fn test_not_interface() {
        let mut b = sum_type(&["A"]);
        b.struct_type("S");
        let unit = b.build();
        assert_eq!(resolve(&unit, &decl("S")), Err(ResolveError::NotInterface));
    }

    #[test]
    fn test_value_symbol_is_not_a_type_declaration() {
        let mut b = sum_type(&["A"]);
        let t = b.symbol_type("T").unwrap();
        b.value("v", t);
        assert_eq!(resolve(&b.build(), &decl("v")), Err(ResolveError::NotInterface));
    }

    #[test]
    fn test_unsealed() {
        let mut b = UnitBuilder::new("p");
        let public = b.public_method("Area");
        b.interface("Shape", vec![public.clone()]);
        let sq = b.struct_type("Square");
        b.method(sq, Receiver::Value, public);
        let unit = b.build();
        assert_eq!(resolve(&unit, &decl("Shape")), Err(ResolveError::Unsealed));
    }

    #[test]
    fn test_empty_interface_is_unsealed() {
        let mut b = UnitBuilder::new("p");
        b.interface("Any", vec![]);
        assert_eq!(resolve(&b.build(), &decl("Any")), Err(ResolveError::Unsealed));
    }

    #[test]
    fn test_no_variants_is_silent() {
        let unit = sum_type(&[]).build();
        assert_eq!(resolve(&unit, &decl("T")), Err(ResolveError::NoVariants));
        let (defs, diags) = find_definitions(&unit, &[decl("T")]);
        assert!(defs.is_empty());
        assert!(diags.is_empty());
    }

    #[test]
    fn test_alias_of_sum_type_is_not_a_variant() {
        let mut b = sum_type(&["A"]);
        let t = b.symbol_type("T").unwrap();
        b.alias("Alias", t);
        let unit = b.build();
        let def = resolve(&unit, &decl("T")).unwrap();
        assert_eq!(variant_names(&def), vec!["A"]);

        let via_alias = resolve(&unit, &decl("Alias")).unwrap();
        assert_eq!(via_alias.interface.ty(), def.interface.ty());
    }

    #[test]
    fn test_type_without_required_method_is_not_a_variant() {
        let mut b = sum_type(&["A"]);
        let other = b.private_method("other");
        let x = b.struct_type("X");
        b.method(x, Receiver::Pointer, other);
        let def = resolve(&b.build(), &decl("T")).unwrap();
        assert_eq!(variant_names(&def), vec!["A"]);
    }

    #[test]
    fn test_find_definitions_isolates_failures() {
        let mut b = sum_type(&["A", "B"]);
        b.struct_type("S");
        let unit = b.build();
        let (defs, diags) = find_definitions(&unit, &[decl("Nope"), decl("T"), decl("S")]);

        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].type_name(), "T");
        let kinds: Vec<&str> = diags.iter().map(|d| d.kind()).collect();
        assert_eq!(kinds, vec!["not_found", "not_interface"]);
    }

    #[test]
    fn test_missing_strips_pointers() {
        let mut b = sum_type(&["A", "B"]);
        let a = b.symbol_type("A").unwrap();
        let pa = b.pointer(a);
        let unit = b.build();
        let def = resolve(&unit, &decl("T")).unwrap();

        let missing: Vec<&str> = def
            .missing(&unit.types, &[pa])
            .into_iter()
            .map(|v| v.name.as_str())
            .collect();
        assert_eq!(missing, vec!["B"]);
    }
}
