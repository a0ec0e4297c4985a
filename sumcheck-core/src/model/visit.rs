//! Syntax tree traversal.
//!
//! Mirrors the `syn::visit` style: implement the hooks you care about and call
//! the matching `walk_*` function to keep descending.

use super::syntax::{Stmt, TypeSwitch};
use super::unit::SourceFile;

pub trait Visit<'ast> {
    fn visit_file(&mut self, file: &'ast SourceFile) {
        walk_file(self, file);
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_type_switch(&mut self, switch: &'ast TypeSwitch) {
        walk_type_switch(self, switch);
    }
}

pub fn walk_file<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, file: &'ast SourceFile) {
    for stmt in &file.body {
        v.visit_stmt(stmt);
    }
}

pub fn walk_stmt<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, stmt: &'ast Stmt) {
    match stmt {
        Stmt::TypeSwitch(switch) => v.visit_type_switch(switch),
        Stmt::Block { stmts } => {
            for s in stmts {
                v.visit_stmt(s);
            }
        }
        Stmt::Expr { .. } | Stmt::Other => {}
    }
}

/// Descends into every arm body, so switches nested in arms are visited too.
pub fn walk_type_switch<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, switch: &'ast TypeSwitch) {
    for clause in &switch.clauses {
        for stmt in &clause.body {
            v.visit_stmt(stmt);
        }
    }
}

/// Collects every type switch in a file, outermost first.
pub fn type_switches(file: &SourceFile) -> Vec<&TypeSwitch> {
    struct Collector<'ast> {
        found: Vec<&'ast TypeSwitch>,
    }

    impl<'ast> Visit<'ast> for Collector<'ast> {
        fn visit_type_switch(&mut self, switch: &'ast TypeSwitch) {
            self.found.push(switch);
            walk_type_switch(self, switch);
        }
    }

    let mut collector = Collector { found: Vec::new() };
    collector.visit_file(file);
    collector.found
}
