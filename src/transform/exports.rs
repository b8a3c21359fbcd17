// Copyright 2018-2024 the Deno authors. All rights reserved. MIT license.

use crate::swc::ast::*;
use crate::swc::atoms::Atom;
use crate::swc::common::SyntaxContext;
use crate::swc::utils::find_pat_ids;

use super::ast::exports_object_stmt;
use super::ast::getter_property;
use super::ast::ident;
use super::ast::source_to_variable_name;
use super::ast::var_decl;
use super::TransformError;

/// A top-level `export` declaration, classified once when the unit is
/// constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportDeclaration {
  /// `export default ...`
  Default(DefaultExport),
  /// `export { a, b as c }`
  NamedReExport { bindings: Vec<ExportBinding> },
  /// `export function a() {}`, `export var a = 1`, `export class A {}`
  Declaration(DeclarationExport),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultExport {
  /// `export default function a() {}`, which keeps its hoisted binding.
  Function(Ident),
  /// `export default class A {}`
  Class(Ident),
  /// Any other default export, bound to a synthetic variable.
  Expression,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationExport {
  Function(Ident),
  /// Every name bound by the declarators, destructuring included.
  Variable(Vec<Ident>),
  Class(Ident),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBinding {
  pub local: Ident,
  pub exported: Atom,
}

impl ExportDeclaration {
  pub fn is_default(&self) -> bool {
    matches!(self, ExportDeclaration::Default(_))
  }

  /// The `(local, exported)` pairs this declaration contributes to the
  /// exports object.
  pub fn bindings(&self, top_level: SyntaxContext) -> Vec<ExportBinding> {
    let same_name = |local: &Ident| ExportBinding {
      local: local.clone(),
      exported: local.sym.clone(),
    };
    match self {
      ExportDeclaration::Default(default) => {
        let local = match default {
          DefaultExport::Function(name) | DefaultExport::Class(name) => {
            name.clone()
          }
          DefaultExport::Expression => default_variable(top_level),
        };
        vec![ExportBinding {
          local,
          exported: "default".into(),
        }]
      }
      ExportDeclaration::NamedReExport { bindings } => bindings.clone(),
      ExportDeclaration::Declaration(declaration) => match declaration {
        DeclarationExport::Function(name) | DeclarationExport::Class(name) => {
          vec![same_name(name)]
        }
        DeclarationExport::Variable(names) => {
          names.iter().map(same_name).collect()
        }
      },
    }
  }
}

/// Synthetic variable holding the value of an expression default export.
fn default_variable(top_level: SyntaxContext) -> Ident {
  ident(source_to_variable_name("default"), top_level)
}

fn named(ident: &Ident, kind: &'static str) -> Result<Ident, TransformError> {
  if ident.sym.is_empty() {
    Err(TransformError::UnnamedExport { kind })
  } else {
    Ok(ident.clone())
  }
}

fn unsupported(kind: &'static str) -> TransformError {
  TransformError::UnsupportedExport { kind }
}

fn classify_default_decl(
  decl: &ExportDefaultDecl,
) -> Result<DefaultExport, TransformError> {
  match &decl.decl {
    DefaultDecl::Fn(FnExpr {
      ident: Some(name), ..
    }) => Ok(DefaultExport::Function(named(name, "function")?)),
    DefaultDecl::Class(ClassExpr {
      ident: Some(name), ..
    }) => Ok(DefaultExport::Class(named(name, "class")?)),
    DefaultDecl::Fn(_) | DefaultDecl::Class(_) => Ok(DefaultExport::Expression),
    DefaultDecl::TsInterfaceDecl(_) => {
      Err(unsupported("default interface export"))
    }
  }
}

fn classify_decl(decl: &Decl) -> Result<DeclarationExport, TransformError> {
  match decl {
    Decl::Fn(decl) => {
      Ok(DeclarationExport::Function(named(&decl.ident, "function")?))
    }
    Decl::Class(decl) => {
      Ok(DeclarationExport::Class(named(&decl.ident, "class")?))
    }
    Decl::Var(decl) => {
      let names = decl
        .decls
        .iter()
        .flat_map(|declarator| find_pat_ids::<_, Ident>(&declarator.name))
        .collect::<Vec<_>>();
      if names.is_empty() {
        return Err(TransformError::UnnamedExport { kind: "variable" });
      }
      Ok(DeclarationExport::Variable(names))
    }
    Decl::Using(_) => Err(unsupported("using declaration export")),
    Decl::TsInterface(_)
    | Decl::TsTypeAlias(_)
    | Decl::TsEnum(_)
    | Decl::TsModule(_) => Err(unsupported("typescript declaration export")),
  }
}

fn classify_named(
  export: &NamedExport,
) -> Result<ExportDeclaration, TransformError> {
  if export.src.is_some() {
    return Err(unsupported("re-export from another module"));
  }
  if export.type_only {
    return Err(unsupported("type-only export"));
  }
  let mut bindings = Vec::with_capacity(export.specifiers.len());
  for specifier in &export.specifiers {
    let ExportSpecifier::Named(specifier) = specifier else {
      return Err(unsupported("namespace or default export specifier"));
    };
    if specifier.is_type_only {
      return Err(unsupported("type-only export specifier"));
    }
    let ModuleExportName::Ident(local) = &specifier.orig else {
      return Err(unsupported("string export of a local binding"));
    };
    let exported = match &specifier.exported {
      Some(ModuleExportName::Ident(exported)) => exported.sym.clone(),
      Some(ModuleExportName::Str(exported)) => exported.value.clone(),
      None => local.sym.clone(),
    };
    if exported.is_empty() {
      return Err(TransformError::UnnamedExport { kind: "specifier" });
    }
    bindings.push(ExportBinding {
      local: local.clone(),
      exported,
    });
  }
  Ok(ExportDeclaration::NamedReExport { bindings })
}

pub(super) fn collect_exports(
  module: &Module,
) -> Result<Vec<ExportDeclaration>, TransformError> {
  let mut exports = Vec::new();
  for item in &module.body {
    let ModuleItem::ModuleDecl(decl) = item else {
      continue;
    };
    let export = match decl {
      ModuleDecl::Import(_) => continue,
      ModuleDecl::ExportDefaultDecl(decl) => {
        ExportDeclaration::Default(classify_default_decl(decl)?)
      }
      ModuleDecl::ExportDefaultExpr(_) => {
        ExportDeclaration::Default(DefaultExport::Expression)
      }
      ModuleDecl::ExportNamed(export) => classify_named(export)?,
      ModuleDecl::ExportDecl(decl) => {
        ExportDeclaration::Declaration(classify_decl(&decl.decl)?)
      }
      ModuleDecl::ExportAll(_) => return Err(unsupported("export all")),
      ModuleDecl::TsImportEquals(_) => continue,
      ModuleDecl::TsExportAssignment(_) => {
        return Err(unsupported("export assignment"));
      }
      ModuleDecl::TsNamespaceExport(_) => {
        return Err(unsupported("namespace export"));
      }
    };
    exports.push(export);
  }

  let defaults = exports.iter().filter(|export| export.is_default()).count();
  if defaults > 1 {
    return Err(TransformError::MultipleDefaultExports { count: defaults });
  }
  Ok(exports)
}

/// Builds the sealed exports object statement, or `None` when nothing is
/// exported.
pub(super) fn build_exports(
  exports: &[ExportDeclaration],
  unresolved: SyntaxContext,
  top_level: SyntaxContext,
) -> Option<Stmt> {
  let properties = exports
    .iter()
    .flat_map(|export| export.bindings(top_level))
    .map(|binding| getter_property(binding.local, &binding.exported))
    .collect::<Vec<_>>();
  if properties.is_empty() {
    return None;
  }
  Some(exports_object_stmt(properties, unresolved))
}

/// Strips the `export` syntax off every export declaration, leaving the
/// underlying bindings in place.
pub(super) fn remove_exports(module: &mut Module, top_level: SyntaxContext) {
  let body = std::mem::take(&mut module.body);
  module.body = body
    .into_iter()
    .filter_map(|item| {
      let ModuleItem::ModuleDecl(decl) = item else {
        return Some(item);
      };
      let stmt = match decl {
        ModuleDecl::ExportDefaultDecl(export) => match export.decl {
          DefaultDecl::Fn(FnExpr {
            ident: Some(ident),
            function,
          }) => Stmt::Decl(Decl::Fn(FnDecl {
            ident,
            declare: false,
            function,
          })),
          DefaultDecl::Class(ClassExpr {
            ident: Some(ident),
            class,
          }) => Stmt::Decl(Decl::Class(ClassDecl {
            ident,
            declare: false,
            class,
          })),
          DefaultDecl::Fn(expr) => {
            var_decl(default_variable(top_level), Expr::Fn(expr))
          }
          DefaultDecl::Class(expr) => {
            var_decl(default_variable(top_level), Expr::Class(expr))
          }
          decl => {
            return Some(ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(
              ExportDefaultDecl {
                span: export.span,
                decl,
              },
            )))
          }
        },
        ModuleDecl::ExportDefaultExpr(export) => {
          var_decl(default_variable(top_level), *export.expr)
        }
        ModuleDecl::ExportNamed(_) => return None,
        ModuleDecl::ExportDecl(export) => Stmt::Decl(export.decl),
        decl => return Some(ModuleItem::ModuleDecl(decl)),
      };
      Some(ModuleItem::Stmt(stmt))
    })
    .collect();
}
