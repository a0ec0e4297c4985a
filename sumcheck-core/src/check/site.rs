//! Extraction of match sites from type switch syntax.

use tracing::debug;

use crate::config::AnalysisConfig;
use crate::model::{Expr, ExprKind, Position, Stmt, TypeId, TypeQuery, TypeSwitch};

/// The fallback arm of a match site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Provably never returns control normally.
    Terminal,
    /// A real catch-all.
    CatchAll,
}

/// One type switch over a known type, reduced to what coverage needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSite {
    pub pos: Position,
    pub scrutinee: TypeId,
    /// Types listed by the arms, in arm order, without duplicates.
    pub covered: Vec<TypeId>,
    /// The first fallback arm, if any.
    pub fallback: Option<Fallback>,
}

impl MatchSite {
    /// Walks the arms of `switch`, whose scrutinee has type `scrutinee`.
    pub fn collect<Q: TypeQuery>(
        query: &Q,
        switch: &TypeSwitch,
        scrutinee: TypeId,
        config: &AnalysisConfig,
    ) -> Self {
        let mut covered = Vec::new();
        let mut fallback = None;

        for clause in &switch.clauses {
            if clause.is_fallback() {
                if fallback.is_none() {
                    fallback = Some(if is_terminal(&clause.body, config) {
                        Fallback::Terminal
                    } else {
                        Fallback::CatchAll
                    });
                }
                continue;
            }
            for expr in &clause.types {
                match query.type_of(expr) {
                    Some(ty) if !covered.contains(&ty) => covered.push(ty),
                    Some(_) => {}
                    None => debug!(pos = %switch.pos, "case type has no resolved type"),
                }
            }
        }

        Self {
            pos: switch.pos.clone(),
            scrutinee,
            covered,
            fallback,
        }
    }

    /// A catch-all arm is deliberate handling of every other case.
    pub fn suppresses_check(&self) -> bool {
        self.fallback == Some(Fallback::CatchAll)
    }
}

/// The value a type switch discriminates: the `x` of `x.(type)`, in both the
/// `switch v := x.(type)` and `switch x.(type)` forms.
pub fn scrutinee(switch: &TypeSwitch) -> Option<&Expr> {
    match &switch.header.value().kind {
        ExprKind::TypeAssert {
            operand,
            asserted: None,
        } => Some(operand),
        _ => None,
    }
}

/// Whether a fallback body provably aborts: exactly one statement, which is a
/// call of a bare abort function such as `panic(...)`.
///
/// Never claims a body that can return is terminal; more elaborate
/// unreachable bodies are missed.
pub fn is_terminal(body: &[Stmt], config: &AnalysisConfig) -> bool {
    let [Stmt::Expr { expr }] = body else {
        return false;
    };
    match &expr.kind {
        ExprKind::Call { callee, .. } => callee
            .as_ident()
            .is_some_and(|name| config.is_abort_function(name)),
        _ => false,
    }
}
