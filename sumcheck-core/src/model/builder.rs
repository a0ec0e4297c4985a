//! Programmatic construction of compilation units.
//!
//! Front-ends written in Rust and the test suites use this instead of
//! assembling type tables by hand:
//!
//! ```rust,ignore
//! let mut b = UnitBuilder::new("p");
//! let sealed = b.private_method("sealed");
//! let t = b.interface("T", vec![sealed.clone()]);
//! let a = b.struct_type("A");
//! b.method(a, Receiver::Pointer, sealed);
//! let unit = b.build();
//! ```

use super::syntax::{Expr, Position};
use super::types::{Method, MethodSig, Receiver, Type, TypeId, Visibility};
use super::unit::{CompilationUnit, SourceFile, Symbol, SymbolKind};

const DEFAULT_FILE: &str = "src.go";

#[derive(Debug)]
pub struct UnitBuilder {
    unit: CompilationUnit,
    file: String,
    next_line: u32,
}

impl UnitBuilder {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            unit: CompilationUnit::new(module),
            file: DEFAULT_FILE.to_string(),
            next_line: 1,
        }
    }

    /// File recorded in the positions of symbols declared from now on.
    pub fn in_file(&mut self, path: impl Into<String>) -> &mut Self {
        self.file = path.into();
        self.next_line = 1;
        self
    }

    pub fn module(&self) -> &str {
        &self.unit.module
    }

    /// The type a declared name refers to.
    pub fn symbol_type(&self, name: &str) -> Option<TypeId> {
        self.unit.lookup(name).map(|s| s.ty)
    }

    pub fn underlying(&self, ty: TypeId) -> TypeId {
        self.unit.types.underlying(ty)
    }

    pub fn private_method(&self, name: &str) -> MethodSig {
        MethodSig::new(name, Visibility::Private, self.unit.module.clone())
    }

    pub fn public_method(&self, name: &str) -> MethodSig {
        MethodSig::new(name, Visibility::Public, self.unit.module.clone())
    }

    /// An unnamed type with no symbol.
    pub fn anonymous(&mut self, ty: Type) -> TypeId {
        self.unit.types.push(ty)
    }

    pub fn basic(&mut self, name: &str) -> TypeId {
        self.anonymous(Type::Basic {
            name: name.to_string(),
        })
    }

    pub fn pointer(&mut self, elem: TypeId) -> TypeId {
        self.anonymous(Type::Pointer { elem })
    }

    /// Declares `type name <underlying>` and returns the named type.
    pub fn defined(&mut self, name: &str, underlying: TypeId) -> TypeId {
        let module = self.unit.module.clone();
        let id = self.unit.types.push(Type::Named {
            name: name.to_string(),
            module,
            underlying,
            methods: Vec::new(),
        });
        self.declare(name, SymbolKind::Type, id);
        id
    }

    /// Declares `type name interface { methods }`.
    pub fn interface(&mut self, name: &str, methods: Vec<MethodSig>) -> TypeId {
        let iface = self.anonymous(Type::Interface { methods });
        self.defined(name, iface)
    }

    /// Declares `type name struct {}`.
    pub fn struct_type(&mut self, name: &str) -> TypeId {
        let st = self.anonymous(Type::Struct { fields: Vec::new() });
        self.defined(name, st)
    }

    /// Attaches a method to a named type. Ignored for any other type.
    pub fn method(&mut self, ty: TypeId, receiver: Receiver, sig: MethodSig) -> &mut Self {
        if let Some(Type::Named { methods, .. }) = self.unit.types.get_mut(ty) {
            methods.push(Method { sig, receiver });
        }
        self
    }

    /// Declares `type name = ty`.
    pub fn alias(&mut self, name: &str, ty: TypeId) -> &mut Self {
        self.declare(name, SymbolKind::Type, ty);
        self
    }

    /// Declares a module-level variable.
    pub fn value(&mut self, name: &str, ty: TypeId) -> &mut Self {
        self.declare(name, SymbolKind::Value, ty);
        self
    }

    fn declare(&mut self, name: &str, kind: SymbolKind, ty: TypeId) {
        let pos = Position::new(self.file.clone(), self.next_line);
        self.next_line += 1;
        self.unit.scope.push(Symbol {
            name: name.to_string(),
            kind,
            ty,
            pos: Some(pos),
        });
    }

    /// A type expression naming `ty`, e.g. the `A` in `case A:`.
    pub fn type_expr(&self, ty: TypeId) -> Expr {
        Expr::ident(self.unit.types.display(ty)).typed(ty)
    }

    /// A pointer type expression, e.g. the `*A` in `case *A:`.
    pub fn pointer_expr(&mut self, elem: TypeId) -> Expr {
        let ptr = self.pointer(elem);
        Expr::star(self.type_expr(elem)).typed(ptr)
    }

    /// An expression of static type `ty`, e.g. the `T(nil)` in `switch T(nil).(type)`.
    pub fn value_expr(&self, ty: TypeId) -> Expr {
        Expr::call(self.type_expr(ty), vec![Expr::literal("nil")]).typed(ty)
    }

    pub fn file(&mut self, file: SourceFile) -> &mut Self {
        self.unit.files.push(file);
        self
    }

    pub fn build(self) -> CompilationUnit {
        self.unit
    }
}
