//! Type arena for a compilation unit and the structural relations on it.
//!
//! Every type the front-end resolved is stored once in a [`TypeTable`] and
//! referred to by [`TypeId`]. The relations the checker needs are all pure
//! functions over the table:
//!
//! - **identity** ([`TypeTable::identical`]): named types are identical only
//!   to themselves, composite types are compared structurally
//! - **underlying type** ([`TypeTable::underlying`]): the type a named type
//!   is defined over
//! - **method sets** ([`TypeTable::method_set`]): the methods callable on a
//!   value of a type, or on a pointer to it
//! - **conformance** ([`TypeTable::implements`]): whether a method set covers
//!   every method a capability set requires

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum nesting depth followed when comparing anonymous types.
///
/// Well-formed snapshots only recurse through named types, which stop the
/// comparison; the limit keeps a malformed snapshot from overflowing the stack.
const MAX_TYPE_DEPTH: usize = 64;

/// Index of a type in a [`TypeTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(pub u32);

impl TypeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Visibility of a method.
///
/// Private methods can only be declared (and therefore satisfied) by types of
/// the module that declares them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// How a method receives its receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Receiver {
    /// Callable on both `T` and `*T`.
    #[default]
    Value,
    /// Callable on `*T` only.
    Pointer,
}

/// A method signature, as required by a capability set or provided by a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSig {
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    /// Module that declares the method. Part of the identity of private methods.
    #[serde(default)]
    pub module: String,
    #[serde(default)]
    pub params: Vec<TypeId>,
    #[serde(default)]
    pub results: Vec<TypeId>,
    #[serde(default)]
    pub variadic: bool,
}

impl MethodSig {
    /// A method without parameters or results.
    pub fn new(name: impl Into<String>, visibility: Visibility, module: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility,
            module: module.into(),
            params: Vec::new(),
            results: Vec::new(),
            variadic: false,
        }
    }

    pub fn is_private(&self) -> bool {
        self.visibility == Visibility::Private
    }

    /// Whether both signatures name the same method.
    ///
    /// Public methods are identified by name alone. A private method is only
    /// the same as a private method of the same name from the same module.
    pub fn same_method(&self, other: &MethodSig) -> bool {
        if self.name != other.name || self.visibility != other.visibility {
            return false;
        }
        match self.visibility {
            Visibility::Public => true,
            Visibility::Private => self.module == other.module,
        }
    }
}

/// A method attached to a named type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    #[serde(flatten)]
    pub sig: MethodSig,
    #[serde(default)]
    pub receiver: Receiver,
}

/// A struct field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub ty: TypeId,
    #[serde(default)]
    pub embedded: bool,
}

/// A resolved static type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Type {
    /// A defined type. `methods` is its complete method set, including
    /// methods promoted from embedded fields.
    Named {
        name: String,
        #[serde(default)]
        module: String,
        underlying: TypeId,
        #[serde(default)]
        methods: Vec<Method>,
    },
    /// A capability set. `methods` is the flattened required method set.
    Interface {
        #[serde(default)]
        methods: Vec<MethodSig>,
    },
    Pointer {
        elem: TypeId,
    },
    Struct {
        #[serde(default)]
        fields: Vec<Field>,
    },
    Basic {
        name: String,
    },
    /// Anything the checker never needs to look inside (slices, maps,
    /// functions, channels...). Only identical to itself.
    Other {
        #[serde(default)]
        description: String,
    },
}

/// Arena of every type referenced by a compilation unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeTable {
    types: Vec<Type>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type and return its id.
    pub fn push(&mut self, ty: Type) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty);
        id
    }

    pub fn get(&self, id: TypeId) -> Option<&Type> {
        self.types.get(id.index())
    }

    pub fn get_mut(&mut self, id: TypeId) -> Option<&mut Type> {
        self.types.get_mut(id.index())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn contains(&self, id: TypeId) -> bool {
        id.index() < self.types.len()
    }

    /// Checks that every id referenced from inside the table is in range.
    ///
    /// Returns a description of the first dangling reference found.
    pub fn validate(&self) -> Result<(), String> {
        let check = |owner: usize, id: TypeId| {
            if self.contains(id) {
                Ok(())
            } else {
                Err(format!("type #{} references unknown type {}", owner, id))
            }
        };
        let check_sig = |owner: usize, sig: &MethodSig| {
            sig.params
                .iter()
                .chain(sig.results.iter())
                .try_for_each(|id| check(owner, *id))
        };

        for (idx, ty) in self.types.iter().enumerate() {
            match ty {
                Type::Named {
                    underlying,
                    methods,
                    ..
                } => {
                    check(idx, *underlying)?;
                    if underlying.index() == idx {
                        return Err(format!("named type #{} is its own underlying type", idx));
                    }
                    methods.iter().try_for_each(|m| check_sig(idx, &m.sig))?;
                }
                Type::Interface { methods } => {
                    methods.iter().try_for_each(|m| check_sig(idx, m))?;
                    for (pos, m) in methods.iter().enumerate() {
                        if methods[..pos].iter().any(|prev| prev.same_method(m)) {
                            return Err(format!(
                                "interface type #{} declares method '{}' twice",
                                idx, m.name
                            ));
                        }
                    }
                }
                Type::Pointer { elem } => check(idx, *elem)?,
                Type::Struct { fields } => {
                    fields.iter().try_for_each(|f| check(idx, f.ty))?;
                }
                Type::Basic { .. } | Type::Other { .. } => {}
            }
        }
        Ok(())
    }

    /// The underlying type of `id`: named types resolve to the type they are
    /// defined over, every other type is its own underlying type.
    pub fn underlying(&self, id: TypeId) -> TypeId {
        let mut current = id;
        // A chain longer than the table is a cycle.
        for _ in 0..=self.types.len() {
            match self.get(current) {
                Some(Type::Named { underlying, .. }) => current = *underlying,
                _ => return current,
            }
        }
        current
    }

    /// Strips every level of pointer indirection from `id`.
    pub fn indirect(&self, id: TypeId) -> TypeId {
        let mut current = id;
        for _ in 0..=self.types.len() {
            match self.get(current) {
                Some(Type::Pointer { elem }) => current = *elem,
                _ => return current,
            }
        }
        current
    }

    /// The required methods of `id` if its underlying type is a capability set.
    pub fn interface_methods(&self, id: TypeId) -> Option<&[MethodSig]> {
        match self.get(self.underlying(id)) {
            Some(Type::Interface { methods }) => Some(methods),
            _ => None,
        }
    }

    /// Whether `a` and `b` denote the same type.
    pub fn identical(&self, a: TypeId, b: TypeId) -> bool {
        self.identical_at(a, b, 0)
    }

    fn identical_at(&self, a: TypeId, b: TypeId, depth: usize) -> bool {
        if a == b {
            return true;
        }
        if depth > MAX_TYPE_DEPTH {
            return false;
        }
        match (self.get(a), self.get(b)) {
            (Some(Type::Pointer { elem: x }), Some(Type::Pointer { elem: y })) => {
                self.identical_at(*x, *y, depth + 1)
            }
            (Some(Type::Interface { methods: m }), Some(Type::Interface { methods: n })) => {
                m.len() == n.len()
                    && self.covers_methods(m, n, depth + 1)
                    && self.covers_methods(n, m, depth + 1)
            }
            (Some(Type::Struct { fields: f }), Some(Type::Struct { fields: g })) => {
                f.len() == g.len()
                    && f.iter().zip(g).all(|(x, y)| {
                        x.name == y.name
                            && x.embedded == y.embedded
                            && self.identical_at(x.ty, y.ty, depth + 1)
                    })
            }
            (Some(Type::Basic { name: x }), Some(Type::Basic { name: y })) => x == y,
            // Named and opaque types are only identical to themselves.
            _ => false,
        }
    }

    /// Every method of `required` has an identical counterpart in `methods`.
    fn covers_methods(&self, required: &[MethodSig], methods: &[MethodSig], depth: usize) -> bool {
        required.iter().all(|req| {
            methods
                .iter()
                .any(|other| req.same_method(other) && self.identical_sigs(req, other, depth))
        })
    }

    fn identical_sigs(&self, a: &MethodSig, b: &MethodSig, depth: usize) -> bool {
        let same_list = |xs: &[TypeId], ys: &[TypeId]| {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .zip(ys)
                    .all(|(x, y)| self.identical_at(*x, *y, depth))
        };
        a.variadic == b.variadic && same_list(&a.params, &b.params) && same_list(&a.results, &b.results)
    }

    /// Methods callable on a value of type `id` or, when `through_pointer` is
    /// set, on a value of type `*id`.
    pub fn method_set(&self, id: TypeId, through_pointer: bool) -> Vec<&MethodSig> {
        match self.get(id) {
            Some(Type::Named {
                underlying,
                methods,
                ..
            }) => {
                if let Some(required) = self.interface_methods(*underlying) {
                    // A pointer to an interface has no methods.
                    if through_pointer {
                        Vec::new()
                    } else {
                        required.iter().collect()
                    }
                } else {
                    methods
                        .iter()
                        .filter(|m| through_pointer || m.receiver == Receiver::Value)
                        .map(|m| &m.sig)
                        .collect()
                }
            }
            Some(Type::Interface { methods }) if !through_pointer => methods.iter().collect(),
            Some(Type::Pointer { elem }) if !through_pointer => match self.get(*elem) {
                Some(Type::Named { .. }) => self.method_set(*elem, true),
                _ => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    /// Whether the method set of `id` (or `*id`) provides every method of
    /// `required` with an identical signature.
    pub fn implements(&self, id: TypeId, through_pointer: bool, required: &[MethodSig]) -> bool {
        let provided = self.method_set(id, through_pointer);
        required.iter().all(|req| {
            provided
                .iter()
                .any(|have| have.same_method(req) && self.identical_sigs(have, req, 0))
        })
    }

    /// Human-readable rendering of a type, for logs and fixtures.
    pub fn display(&self, id: TypeId) -> String {
        self.display_at(id, 0)
    }

    fn display_at(&self, id: TypeId, depth: usize) -> String {
        if depth > MAX_TYPE_DEPTH {
            return "...".to_string();
        }
        match self.get(id) {
            Some(Type::Named { name, .. }) => name.clone(),
            Some(Type::Pointer { elem }) => format!("*{}", self.display_at(*elem, depth + 1)),
            Some(Type::Interface { methods }) if methods.is_empty() => "interface{}".to_string(),
            Some(Type::Interface { methods }) => {
                let names: Vec<&str> = methods.iter().map(|m| m.name.as_str()).collect();
                format!("interface{{ {} }}", names.join("; "))
            }
            Some(Type::Struct { fields }) if fields.is_empty() => "struct{}".to_string(),
            Some(Type::Struct { fields }) => {
                let parts: Vec<String> = fields
                    .iter()
                    .map(|f| format!("{} {}", f.name, self.display_at(f.ty, depth + 1)))
                    .collect();
                format!("struct{{ {} }}", parts.join("; "))
            }
            Some(Type::Basic { name }) => name.clone(),
            Some(Type::Other { description }) => description.clone(),
            None => format!("<unknown {}>", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sealed(module: &str) -> MethodSig {
        MethodSig::new("sealed", Visibility::Private, module)
    }

    fn named(table: &mut TypeTable, name: &str, underlying: TypeId, methods: Vec<Method>) -> TypeId {
        table.push(Type::Named {
            name: name.to_string(),
            module: "p".to_string(),
            underlying,
            methods,
        })
    }

    #[test]
    fn test_named_types_identical_only_to_themselves() {
        let mut t = TypeTable::new();
        let s = t.push(Type::Struct { fields: vec![] });
        let a = named(&mut t, "A", s, vec![]);
        let b = named(&mut t, "B", s, vec![]);
        assert!(t.identical(a, a));
        assert!(!t.identical(a, b));
        assert!(t.identical(t.underlying(a), t.underlying(b)));
    }

    #[test]
    fn test_structural_identity_of_anonymous_types() {
        let mut t = TypeTable::new();
        let int1 = t.push(Type::Basic { name: "int".into() });
        let int2 = t.push(Type::Basic { name: "int".into() });
        let p1 = t.push(Type::Pointer { elem: int1 });
        let p2 = t.push(Type::Pointer { elem: int2 });
        assert!(t.identical(p1, p2));

        let i1 = t.push(Type::Interface { methods: vec![sealed("p")] });
        let i2 = t.push(Type::Interface { methods: vec![sealed("p")] });
        let i3 = t.push(Type::Interface { methods: vec![sealed("q")] });
        assert!(t.identical(i1, i2));
        assert!(!t.identical(i1, i3), "private methods of other modules differ");
    }

    #[test]
    fn test_indirect_strips_every_level() {
        let mut t = TypeTable::new();
        let s = t.push(Type::Struct { fields: vec![] });
        let a = named(&mut t, "A", s, vec![]);
        let pa = t.push(Type::Pointer { elem: a });
        let ppa = t.push(Type::Pointer { elem: pa });
        assert_eq!(t.indirect(pa), a);
        assert_eq!(t.indirect(ppa), a);
        assert_eq!(t.indirect(a), a);
    }

    #[test]
    fn test_pointer_receiver_only_in_pointer_method_set() {
        let mut t = TypeTable::new();
        let s = t.push(Type::Struct { fields: vec![] });
        let a = named(
            &mut t,
            "A",
            s,
            vec![Method {
                sig: sealed("p"),
                receiver: Receiver::Pointer,
            }],
        );
        let required = vec![sealed("p")];
        assert!(!t.implements(a, false, &required));
        assert!(t.implements(a, true, &required));

        let pa = t.push(Type::Pointer { elem: a });
        assert!(t.implements(pa, false, &required));
    }

    #[test]
    fn test_value_receiver_in_both_method_sets() {
        let mut t = TypeTable::new();
        let s = t.push(Type::Struct { fields: vec![] });
        let a = named(
            &mut t,
            "A",
            s,
            vec![Method {
                sig: sealed("p"),
                receiver: Receiver::Value,
            }],
        );
        let required = vec![sealed("p")];
        assert!(t.implements(a, false, &required));
        assert!(t.implements(a, true, &required));
    }

    #[test]
    fn test_signature_mismatch_does_not_implement() {
        let mut t = TypeTable::new();
        let int = t.push(Type::Basic { name: "int".into() });
        let s = t.push(Type::Struct { fields: vec![] });
        let mut with_param = sealed("p");
        with_param.params.push(int);
        let a = named(
            &mut t,
            "A",
            s,
            vec![Method {
                sig: with_param,
                receiver: Receiver::Value,
            }],
        );
        assert!(!t.implements(a, false, &[sealed("p")]));
    }

    #[test]
    fn test_foreign_private_method_does_not_implement() {
        let mut t = TypeTable::new();
        let s = t.push(Type::Struct { fields: vec![] });
        let a = named(
            &mut t,
            "A",
            s,
            vec![Method {
                sig: sealed("q"),
                receiver: Receiver::Value,
            }],
        );
        assert!(!t.implements(a, false, &[sealed("p")]));
    }

    #[test]
    fn test_pointer_to_interface_has_no_methods() {
        let mut t = TypeTable::new();
        let iface = t.push(Type::Interface { methods: vec![sealed("p")] });
        let named_iface = named(&mut t, "T", iface, vec![]);
        assert_eq!(t.method_set(named_iface, false).len(), 1);
        assert!(t.method_set(named_iface, true).is_empty());
        assert_eq!(t.interface_methods(named_iface).map(<[_]>::len), Some(1));
    }

    #[test]
    fn test_validate_reports_dangling_reference() {
        let mut t = TypeTable::new();
        t.push(Type::Pointer { elem: TypeId(7) });
        let err = t.validate().unwrap_err();
        assert!(err.contains("#7"));
    }

    #[test]
    fn test_interface_identity_is_symmetric() {
        let mut t = TypeTable::new();
        let other = MethodSig::new("other", Visibility::Private, "p");
        let twice = t.push(Type::Interface { methods: vec![sealed("p"), sealed("p")] });
        let pair = t.push(Type::Interface { methods: vec![sealed("p"), other] });
        assert!(!t.identical(twice, pair));
        assert!(!t.identical(pair, twice));
    }

    #[test]
    fn test_validate_rejects_duplicate_interface_method() {
        let mut t = TypeTable::new();
        t.push(Type::Interface { methods: vec![sealed("p"), sealed("p")] });
        let err = t.validate().unwrap_err();
        assert!(err.contains("'sealed' twice"));

        let mut ok = TypeTable::new();
        ok.push(Type::Interface { methods: vec![sealed("p"), sealed("q")] });
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_display() {
        let mut t = TypeTable::new();
        let s = t.push(Type::Struct { fields: vec![] });
        let a = named(&mut t, "A", s, vec![]);
        let pa = t.push(Type::Pointer { elem: a });
        assert_eq!(t.display(pa), "*A");
        assert_eq!(t.display(s), "struct{}");
    }
}
