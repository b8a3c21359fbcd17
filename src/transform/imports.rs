// Copyright 2018-2024 the Deno authors. All rights reserved. MIT license.

use std::collections::HashMap;

use crate::swc::ast::*;
use crate::swc::atoms::Atom;
use crate::swc::common::Span;
use crate::swc::common::SyntaxContext;
use crate::swc::common::DUMMY_SP;
use crate::swc::visit::VisitMut;
use crate::swc::visit::VisitMutWith;

use super::ast::expr_stmt;
use super::ast::ident;
use super::ast::member_expr;
use super::ast::require_call;
use super::ast::source_to_variable_name;
use super::ast::str_lit;
use super::ast::var_decl;
use super::TransformError;
use crate::Dependency;
use crate::RenameTable;
use crate::SyntaxContexts;

/// A top-level `import` declaration, classified once when the unit is
/// constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDeclaration {
  /// Specifier of the imported module. Updated when the specifier is renamed.
  pub source: Atom,
  pub span: Span,
  pub shape: ImportShape,
  /// Name of the synthesized variable holding the `require()` result, once
  /// the require declarations have been built. `None` when the import binds
  /// its local name directly.
  pub binding: Option<Atom>,
  /// Whether the dependency was known to be commonjs when the require was
  /// built. Its default binding is then the `require()` result itself.
  pub commonjs: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportShape {
  /// `import "x"`
  Bare,
  /// `import a from "x"`
  Default { local: Ident },
  /// `import { a, b as c } from "x"`, also `import a, { b } from "x"`
  Named { bindings: Vec<ImportBinding> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
  pub local: Ident,
  pub imported: Atom,
}

impl ImportDeclaration {
  pub(super) fn from_decl(decl: &ImportDecl) -> Result<Self, TransformError> {
    let source = decl.src.value.clone();
    let unsupported = |kind: &'static str| TransformError::UnsupportedImport {
      specifier: source.to_string(),
      kind,
    };
    if decl.type_only {
      return Err(unsupported("type-only import"));
    }
    let shape = match decl.specifiers.as_slice() {
      [] => ImportShape::Bare,
      [ImportSpecifier::Default(specifier)] => ImportShape::Default {
        local: specifier.local.clone(),
      },
      specifiers => {
        let mut bindings = Vec::with_capacity(specifiers.len());
        for specifier in specifiers {
          let binding = match specifier {
            ImportSpecifier::Default(specifier) => ImportBinding {
              local: specifier.local.clone(),
              imported: "default".into(),
            },
            ImportSpecifier::Named(specifier) => {
              if specifier.is_type_only {
                return Err(unsupported("type-only import specifier"));
              }
              let imported = match &specifier.imported {
                Some(ModuleExportName::Ident(imported)) => imported.sym.clone(),
                Some(ModuleExportName::Str(imported)) => imported.value.clone(),
                None => specifier.local.sym.clone(),
              };
              ImportBinding {
                local: specifier.local.clone(),
                imported,
              }
            }
            ImportSpecifier::Namespace(_) => {
              return Err(unsupported("namespace import"));
            }
          };
          bindings.push(binding);
        }
        ImportShape::Named { bindings }
      }
    };
    Ok(ImportDeclaration {
      source,
      span: decl.span,
      shape,
      binding: None,
      commonjs: false,
    })
  }

  /// Local names this import declares, paired with the imported name.
  pub fn bindings(&self) -> Vec<(&Ident, &str)> {
    match &self.shape {
      ImportShape::Bare => Vec::new(),
      ImportShape::Default { local } => vec![(local, "default")],
      ImportShape::Named { bindings } => bindings
        .iter()
        .map(|binding| (&binding.local, &*binding.imported))
        .collect(),
    }
  }
}

pub(super) fn collect_imports(
  module: &Module,
) -> Result<Vec<ImportDeclaration>, TransformError> {
  let mut imports = Vec::new();
  for item in &module.body {
    match item {
      ModuleItem::ModuleDecl(ModuleDecl::Import(decl)) => {
        imports.push(ImportDeclaration::from_decl(decl)?);
      }
      ModuleItem::ModuleDecl(ModuleDecl::TsImportEquals(decl)) => {
        return Err(TransformError::UnsupportedImport {
          specifier: decl.id.sym.to_string(),
          kind: "import equals declaration",
        });
      }
      _ => {}
    }
  }
  Ok(imports)
}

/// Hands out synthetic require variable names, one per source.
///
/// Sources that sanitize to the same name get a numeric suffix, so `"a-b"`
/// and `"a_b"` never share a variable.
#[derive(Debug)]
pub(super) struct SyntheticNames {
  sources: HashMap<Atom, Atom>,
}

impl SyntheticNames {
  pub fn new() -> Self {
    let mut sources = HashMap::new();
    // taken by the variable of an expression default export
    sources.insert(source_to_variable_name("default"), Atom::default());
    SyntheticNames { sources }
  }

  pub fn name_for(&mut self, source: &Atom) -> Atom {
    let base = source_to_variable_name(source);
    let mut name = base.clone();
    let mut suffix = 0;
    while let Some(owner) = self.sources.get(&name) {
      if owner == source {
        return name;
      }
      suffix += 1;
      name = format!("{}_{}", base, suffix).into();
    }
    self.sources.insert(name.clone(), source.clone());
    name
  }
}

/// Synthesizes the statement standing in for `import`, recording the
/// synthetic variable on the import when one is declared.
///
/// `import "x"` becomes `require("x");`. A default import of a commonjs
/// dependency binds its local name directly; anything else binds a synthetic
/// variable that references are rewritten to.
pub(super) fn build_import(
  import: &mut ImportDeclaration,
  dependency: Option<&Dependency>,
  names: &mut SyntheticNames,
  contexts: SyntaxContexts,
) -> Stmt {
  let require = require_call(&import.source, contexts.unresolved);
  import.commonjs = dependency.is_some_and(Dependency::is_commonjs);
  match &import.shape {
    ImportShape::Bare => expr_stmt(require),
    ImportShape::Default { local } if import.commonjs => {
      var_decl(local.clone(), require)
    }
    _ => {
      let name = names.name_for(&import.source);
      let stmt = var_decl(ident(name.clone(), contexts.top_level), require);
      import.binding = Some(name);
      stmt
    }
  }
}

/// Renames the source of every `import` in the tree found in `renames`.
pub(super) fn rename_import_sources(
  module: &mut Module,
  renames: &RenameTable,
) {
  for item in &mut module.body {
    if let ModuleItem::ModuleDecl(ModuleDecl::Import(decl)) = item {
      if let Some(to) = renames.get(&*decl.src.value) {
        decl.src = Box::new(Str {
          span: decl.src.span,
          ..str_lit(to)
        });
      }
    }
  }
}

pub(super) fn remove_imports(module: &mut Module) -> usize {
  let len = module.body.len();
  module.body.retain(|item| {
    !matches!(item, ModuleItem::ModuleDecl(ModuleDecl::Import(_)))
  });
  len - module.body.len()
}

/// Replaces every free reference to an imported binding with a member access
/// on the synthesized require variable.
///
/// Assigning to an import throws at runtime in a module. Such targets are
/// rewritten like any other reference rather than rejected.
pub(super) struct ReferenceRewriter {
  /// Local binding to the require variable and the member read from it.
  /// `None` reads the variable itself.
  pub references: HashMap<Id, (Atom, Option<Atom>)>,
  pub top_level: SyntaxContext,
  pub rewritten: usize,
}

impl ReferenceRewriter {
  pub fn new(imports: &[ImportDeclaration], top_level: SyntaxContext) -> Self {
    let mut references = HashMap::new();
    for import in imports {
      let Some(binding) = &import.binding else {
        continue;
      };
      for (local, imported) in import.bindings() {
        let imported = if import.commonjs && imported == "default" {
          None
        } else {
          Some(imported.into())
        };
        references.insert(local.to_id(), (binding.clone(), imported));
      }
    }
    ReferenceRewriter {
      references,
      top_level,
      rewritten: 0,
    }
  }

  fn reference_for(&mut self, ident: &Ident) -> Option<Expr> {
    let (binding, imported) = self.references.get(&ident.to_id())?.clone();
    let variable = ident_at(&binding, self.top_level, ident.span);
    self.rewritten += 1;
    tracing::trace!(
      local = &*ident.sym,
      binding = &*binding,
      imported = imported.as_deref().unwrap_or_default(),
      "rewrote imported reference"
    );
    let Some(imported) = imported else {
      return Some(Expr::Ident(variable));
    };
    let mut member = member_expr(Expr::Ident(variable), &imported);
    member.span = ident.span;
    Some(Expr::Member(member))
  }
}

fn ident_at(sym: &Atom, ctxt: SyntaxContext, span: Span) -> Ident {
  Ident {
    span,
    ..ident(sym.clone(), ctxt)
  }
}

impl VisitMut for ReferenceRewriter {
  fn visit_mut_expr(&mut self, expr: &mut Expr) {
    if let Expr::Ident(ident) = expr {
      if let Some(reference) = self.reference_for(ident) {
        *expr = reference;
      }
      return;
    }
    expr.visit_mut_children_with(self);
  }

  fn visit_mut_prop(&mut self, prop: &mut Prop) {
    if let Prop::Shorthand(ident) = prop {
      if let Some(reference) = self.reference_for(ident) {
        let key = IdentName::new(ident.sym.clone(), DUMMY_SP);
        *prop = Prop::KeyValue(KeyValueProp {
          key: PropName::Ident(key),
          value: Box::new(reference),
        });
      }
      return;
    }
    prop.visit_mut_children_with(self);
  }

  fn visit_mut_simple_assign_target(
    &mut self,
    target: &mut SimpleAssignTarget,
  ) {
    if let SimpleAssignTarget::Ident(binding) = target {
      match self.reference_for(&binding.id) {
        Some(Expr::Member(member)) => {
          *target = SimpleAssignTarget::Member(member);
        }
        Some(Expr::Ident(variable)) => {
          *target = SimpleAssignTarget::Ident(variable.into());
        }
        _ => {}
      }
      return;
    }
    target.visit_mut_children_with(self);
  }

  /// `[y] = ...`, also `for (y of ...)`
  fn visit_mut_pat(&mut self, pat: &mut Pat) {
    if let Pat::Ident(binding) = pat {
      if let Some(reference) = self.reference_for(&binding.id) {
        *pat = Pat::Expr(Box::new(reference));
      }
      return;
    }
    pat.visit_mut_children_with(self);
  }

  /// `({ y } = ...)` -> `({ y: __$mod_m.y } = ...)`
  fn visit_mut_object_pat_prop(&mut self, prop: &mut ObjectPatProp) {
    prop.visit_mut_children_with(self);
    let ObjectPatProp::Assign(assign) = prop else {
      return;
    };
    let Some(reference) = self.reference_for(&assign.key.id) else {
      return;
    };
    let target = Box::new(Pat::Expr(Box::new(reference)));
    let value = match assign.value.take() {
      Some(default) => Box::new(Pat::Assign(AssignPat {
        span: assign.span,
        left: target,
        right: default,
      })),
      None => target,
    };
    let key = IdentName::new(assign.key.id.sym.clone(), DUMMY_SP);
    *prop = ObjectPatProp::KeyValue(KeyValuePatProp {
      key: PropName::Ident(key),
      value,
    });
  }
}
