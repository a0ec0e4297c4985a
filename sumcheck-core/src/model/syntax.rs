//! Syntax tree handed over by the front-end.
//!
//! Only the shapes the checker inspects are modelled precisely: type switches,
//! their arms, and the expression forms needed to recognise a scrutinee or a
//! terminal call. Everything else collapses into an `Other` node.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::types::TypeId;

/// A source location. Lines and columns are 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Position {
    pub file: String,
    pub line: u32,
    #[serde(default)]
    pub column: u32,
}

impl Position {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column: 0,
        }
    }

    /// The root position of a file, used when nothing more precise is known.
    pub fn file_start(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line: 1,
            column: 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// An expression with its resolved static type, if it has one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expr {
    #[serde(flatten)]
    pub kind: ExprKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<TypeId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "expr", rename_all = "snake_case")]
pub enum ExprKind {
    Ident {
        name: String,
    },
    Call {
        callee: Box<Expr>,
        #[serde(default)]
        args: Vec<Expr>,
    },
    Selector {
        base: Box<Expr>,
        field: String,
    },
    /// `x.(T)`, or `x.(type)` in a type switch header when `asserted` is absent.
    TypeAssert {
        operand: Box<Expr>,
        #[serde(default)]
        asserted: Option<Box<Expr>>,
    },
    /// `*x`: a pointer type in type position, a dereference otherwise.
    Star {
        inner: Box<Expr>,
    },
    Literal {
        value: String,
    },
    Other,
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Self { kind, ty: None }
    }

    /// Attach the static type the front-end resolved for this expression.
    pub fn typed(mut self, ty: TypeId) -> Self {
        self.ty = Some(ty);
        self
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Self::new(ExprKind::Ident { name: name.into() })
    }

    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        Self::new(ExprKind::Call {
            callee: Box::new(callee),
            args,
        })
    }

    pub fn selector(base: Expr, field: impl Into<String>) -> Self {
        Self::new(ExprKind::Selector {
            base: Box::new(base),
            field: field.into(),
        })
    }

    /// The `x.(type)` form.
    pub fn type_switch_guard(operand: Expr) -> Self {
        Self::new(ExprKind::TypeAssert {
            operand: Box::new(operand),
            asserted: None,
        })
    }

    pub fn star(inner: Expr) -> Self {
        Self::new(ExprKind::Star {
            inner: Box::new(inner),
        })
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Self::new(ExprKind::Literal {
            value: value.into(),
        })
    }

    /// The identifier name if this is a bare identifier.
    pub fn as_ident(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Ident { name } => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stmt", rename_all = "snake_case")]
pub enum Stmt {
    Expr { expr: Expr },
    TypeSwitch(TypeSwitch),
    /// Any statement list: function bodies, loop and branch bodies.
    Block {
        #[serde(default)]
        stmts: Vec<Stmt>,
    },
    Other,
}

impl Stmt {
    pub fn expr(expr: Expr) -> Self {
        Stmt::Expr { expr }
    }

    pub fn block(stmts: Vec<Stmt>) -> Self {
        Stmt::Block { stmts }
    }
}

/// The header of a type switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum SwitchHeader {
    /// `switch v := x.(type)`
    Assign { binding: String, value: Expr },
    /// `switch x.(type)`
    Bare { value: Expr },
}

impl SwitchHeader {
    pub fn value(&self) -> &Expr {
        match self {
            SwitchHeader::Assign { value, .. } | SwitchHeader::Bare { value } => value,
        }
    }
}

/// One arm of a type switch. An arm listing no types is the fallback arm.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CaseClause {
    #[serde(default)]
    pub types: Vec<Expr>,
    #[serde(default)]
    pub body: Vec<Stmt>,
}

impl CaseClause {
    pub fn is_fallback(&self) -> bool {
        self.types.is_empty()
    }
}

/// A pattern-match construct discriminating on a value's dynamic type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSwitch {
    pub pos: Position,
    pub header: SwitchHeader,
    #[serde(default)]
    pub clauses: Vec<CaseClause>,
}

impl TypeSwitch {
    /// `switch scrutinee.(type) {}`
    pub fn on(pos: Position, scrutinee: Expr) -> Self {
        Self {
            pos,
            header: SwitchHeader::Bare {
                value: Expr::type_switch_guard(scrutinee),
            },
            clauses: Vec::new(),
        }
    }

    /// `switch binding := scrutinee.(type) {}`
    pub fn binding(pos: Position, binding: impl Into<String>, scrutinee: Expr) -> Self {
        Self {
            pos,
            header: SwitchHeader::Assign {
                binding: binding.into(),
                value: Expr::type_switch_guard(scrutinee),
            },
            clauses: Vec::new(),
        }
    }

    /// Append a `case T1, T2, ...:` arm.
    pub fn case(mut self, types: Vec<Expr>, body: Vec<Stmt>) -> Self {
        self.clauses.push(CaseClause { types, body });
        self
    }

    /// Append a `default:` arm.
    pub fn fallback(mut self, body: Vec<Stmt>) -> Self {
        self.clauses.push(CaseClause {
            types: Vec::new(),
            body,
        });
        self
    }
}
