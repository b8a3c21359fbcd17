// Copyright 2018-2024 the Deno authors. All rights reserved. MIT license.

use crate::swc::ast::*;
use crate::swc::atoms::Atom;
use crate::swc::common::util::take::Take;
use crate::swc::common::Span;
use crate::swc::common::SyntaxContext;
use crate::swc::utils::find_pat_ids;
use crate::swc::visit::Visit;
use crate::swc::visit::VisitMut;
use crate::swc::visit::VisitMutWith;
use crate::swc::visit::VisitWith;

use super::ast::member_expr;
use super::ast::str_lit;

/// A `require("<specifier>")` call site found in the unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequireCall {
  pub specifier: Atom,
  pub span: Span,
}

/// Gets the literal argument of a call to the global `require` with exactly
/// one string literal argument.
fn require_argument(expr: &Expr, unresolved: SyntaxContext) -> Option<&Str> {
  let Expr::Call(call) = expr else {
    return None;
  };
  let Callee::Expr(callee) = &call.callee else {
    return None;
  };
  let Expr::Ident(callee) = &**callee else {
    return None;
  };
  // a `require` bound anywhere in the unit resolves to another context
  if &*callee.sym != "require" || callee.ctxt != unresolved {
    return None;
  }
  let [arg] = call.args.as_slice() else {
    return None;
  };
  if arg.spread.is_some() {
    return None;
  }
  match &*arg.expr {
    Expr::Lit(Lit::Str(specifier)) => Some(specifier),
    _ => None,
  }
}

fn require_argument_mut(expr: &mut Expr) -> Option<&mut Str> {
  let Expr::Call(call) = expr else {
    return None;
  };
  match call.args.first_mut().map(|arg| &mut *arg.expr) {
    Some(Expr::Lit(Lit::Str(specifier))) => Some(specifier),
    _ => None,
  }
}

fn is_require_name(ident: Option<&Ident>) -> bool {
  ident.is_some_and(|ident| &*ident.sym == "require")
}

fn binds_require<'a>(pats: impl IntoIterator<Item = &'a Pat>) -> bool {
  pats.into_iter().any(|pat| {
    find_pat_ids::<_, Ident>(pat)
      .iter()
      .any(|id| &*id.sym == "require")
  })
}

fn skip_function(function: &Function) -> bool {
  binds_require(function.params.iter().map(|param| &param.pat))
}

/// Collects the `require()` call sites of a unit in source order.
pub(super) struct RequireCollector {
  pub unresolved: SyntaxContext,
  pub requires: Vec<RequireCall>,
}

impl Visit for RequireCollector {
  fn visit_expr(&mut self, expr: &Expr) {
    if let Some(specifier) = require_argument(expr, self.unresolved) {
      self.requires.push(RequireCall {
        specifier: specifier.value.clone(),
        span: specifier.span,
      });
      return;
    }
    expr.visit_children_with(self);
  }

  fn visit_fn_decl(&mut self, n: &FnDecl) {
    if !is_require_name(Some(&n.ident)) {
      n.visit_children_with(self);
    }
  }

  fn visit_fn_expr(&mut self, n: &FnExpr) {
    if !is_require_name(n.ident.as_ref()) {
      n.visit_children_with(self);
    }
  }

  fn visit_function(&mut self, n: &Function) {
    if !skip_function(n) {
      n.visit_children_with(self);
    }
  }

  fn visit_arrow_expr(&mut self, n: &ArrowExpr) {
    if !binds_require(&n.params) {
      n.visit_children_with(self);
    }
  }
}

/// Hands every `require()` call site to `on_require`, which may rewrite the
/// call expression in place. Arguments of a matched call are not visited.
pub(super) struct RequireRewriter<F: FnMut(&mut Expr, &Atom)> {
  pub unresolved: SyntaxContext,
  pub on_require: F,
}

impl<F: FnMut(&mut Expr, &Atom)> RequireRewriter<F> {
  pub fn new(unresolved: SyntaxContext, on_require: F) -> Self {
    RequireRewriter {
      unresolved,
      on_require,
    }
  }
}

impl<F: FnMut(&mut Expr, &Atom)> VisitMut for RequireRewriter<F> {
  fn visit_mut_expr(&mut self, expr: &mut Expr) {
    let specifier = require_argument(expr, self.unresolved)
      .map(|specifier| specifier.value.clone());
    match specifier {
      Some(specifier) => (self.on_require)(expr, &specifier),
      None => expr.visit_mut_children_with(self),
    }
  }

  fn visit_mut_fn_decl(&mut self, n: &mut FnDecl) {
    if !is_require_name(Some(&n.ident)) {
      n.visit_mut_children_with(self);
    }
  }

  fn visit_mut_fn_expr(&mut self, n: &mut FnExpr) {
    if !is_require_name(n.ident.as_ref()) {
      n.visit_mut_children_with(self);
    }
  }

  fn visit_mut_function(&mut self, n: &mut Function) {
    if !skip_function(n) {
      n.visit_mut_children_with(self);
    }
  }

  fn visit_mut_arrow_expr(&mut self, n: &mut ArrowExpr) {
    if !binds_require(&n.params) {
      n.visit_mut_children_with(self);
    }
  }
}

/// Replaces the literal argument of a matched `require()` call.
pub(super) fn rename_require(expr: &mut Expr, to: &str) {
  if let Some(specifier) = require_argument_mut(expr) {
    *specifier = Str {
      span: specifier.span,
      ..str_lit(to)
    };
  }
}

/// `require(x)` -> `require(x).default`
pub(super) fn defaultify_require(expr: &mut Expr) {
  let call = expr.take();
  *expr = Expr::Member(member_expr(call, "default"));
}

/// Looks for a free `module` or `exports` reference.
pub(super) struct CommonExportsFinder {
  pub unresolved: SyntaxContext,
  pub found: bool,
}

impl Visit for CommonExportsFinder {
  fn visit_ident(&mut self, ident: &Ident) {
    if ident.ctxt == self.unresolved
      && matches!(&*ident.sym, "module" | "exports")
    {
      self.found = true;
    }
  }

  fn visit_expr(&mut self, expr: &Expr) {
    if !self.found {
      expr.visit_children_with(self);
    }
  }
}
