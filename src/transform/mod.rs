// Copyright 2018-2024 the Deno authors. All rights reserved. MIT license.

use deno_error::JsError;
use once_cell::unsync::OnceCell;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::emit;
use crate::parse_program;
use crate::parsing::script_to_module;
use crate::swc::ast::Expr;
use crate::swc::ast::Module;
use crate::swc::ast::ModuleItem;
use crate::swc::ast::Program;
use crate::swc::atoms::Atom;
use crate::swc::common::SyntaxContext;
use crate::swc::transforms::resolver;
use crate::swc::visit::VisitMutWith;
use crate::swc::visit::VisitWith;
use crate::Dependency;
use crate::DependencyRegistry;
use crate::EmitError;
use crate::EmitOptions;
use crate::EmittedSourceText;
use crate::Globals;
use crate::ParseDiagnosticsError;
use crate::ParseParams;
use crate::ParsedSource;
use crate::RenameTable;
use crate::SyntaxContexts;
use crate::TransformOptions;

mod ast;
mod exports;
mod imports;
mod requires;

pub use ast::source_to_variable_name;
pub use exports::DeclarationExport;
pub use exports::DefaultExport;
pub use exports::ExportBinding;
pub use exports::ExportDeclaration;
pub use imports::ImportBinding;
pub use imports::ImportDeclaration;
pub use imports::ImportShape;
pub use requires::RequireCall;

use requires::CommonExportsFinder;
use requires::RequireCollector;
use requires::RequireRewriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
  /// Has at least one `import` or `export` declaration.
  Module,
  Commonjs,
}

impl UnitType {
  pub fn as_str(&self) -> &'static str {
    match self {
      UnitType::Module => "module",
      UnitType::Commonjs => "commonjs",
    }
  }
}

/// Import or export syntax the transform can't express with `require()` and
/// an exports object.
#[derive(Debug, Clone, PartialEq, Eq, Error, JsError)]
pub enum TransformError {
  #[class(syntax)]
  #[error("Unsupported {kind} of \"{specifier}\".")]
  UnsupportedImport {
    specifier: String,
    kind: &'static str,
  },
  #[class(syntax)]
  #[error("Unsupported {kind}.")]
  UnsupportedExport { kind: &'static str },
  #[class(syntax)]
  #[error("Unnamed {kind} export.")]
  UnnamedExport { kind: &'static str },
  #[class(syntax)]
  #[error("Expected at most one default export, found {count}.")]
  MultipleDefaultExports { count: usize },
}

/// Facts about a unit that a dependency graph builder needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitSummary {
  #[serde(rename = "type")]
  pub unit_type: UnitType,
  pub default: bool,
  /// Import sources and `require()` targets in source order.
  pub dependencies: Vec<String>,
  /// Renames that apply to this unit's dependencies.
  pub renames: RenameTable,
}

/// One translation unit on its way from `import`/`export` syntax to
/// `require()` and an exports object.
///
/// Derived facts are computed on first read and cached. `requires()` and
/// `has_common_exports()` walk the tree, so read them before running any
/// pass if they should describe the source as written.
pub struct Unit {
  module: Module,
  contexts: SyntaxContexts,
  options: TransformOptions,
  renamed: DependencyRegistry,
  imports: Vec<ImportDeclaration>,
  exports: Vec<ExportDeclaration>,
  unit_type: OnceCell<UnitType>,
  exports_default: OnceCell<bool>,
  requires: OnceCell<Vec<RequireCall>>,
  has_common_exports: OnceCell<bool>,
}

impl Unit {
  /// Resolves the scopes of `module` and classifies its top-level import and
  /// export declarations.
  pub fn new(
    mut module: Module,
    options: &TransformOptions,
  ) -> Result<Self, TransformError> {
    let globals = Globals::default();
    let contexts = globals.with(|marks| {
      module.visit_mut_with(&mut resolver(
        marks.unresolved,
        marks.top_level,
        true,
      ));
      SyntaxContexts {
        unresolved: SyntaxContext::empty().apply_mark(marks.unresolved),
        top_level: SyntaxContext::empty().apply_mark(marks.top_level),
      }
    });
    let imports = imports::collect_imports(&module)?;
    let exports = exports::collect_exports(&module)?;
    tracing::debug!(
      imports = imports.len(),
      exports = exports.len(),
      "classified unit"
    );
    Ok(Unit {
      module,
      contexts,
      options: options.clone(),
      renamed: Default::default(),
      imports,
      exports,
      unit_type: OnceCell::new(),
      exports_default: OnceCell::new(),
      requires: OnceCell::new(),
      has_common_exports: OnceCell::new(),
    })
  }

  /// Scripts are handled as a module without import or export declarations.
  pub fn from_program(
    program: Program,
    options: &TransformOptions,
  ) -> Result<Self, TransformError> {
    let module = match program {
      Program::Module(module) => module,
      Program::Script(script) => script_to_module(script),
    };
    Unit::new(module, options)
  }

  pub fn unit_type(&self) -> UnitType {
    *self.unit_type.get_or_init(|| {
      if self.imports.is_empty() && self.exports.is_empty() {
        UnitType::Commonjs
      } else {
        UnitType::Module
      }
    })
  }

  /// Whether the unit has an `export default`.
  pub fn exports_default(&self) -> bool {
    *self.exports_default.get_or_init(|| {
      self.exports.iter().filter(|e| e.is_default()).count() == 1
    })
  }

  pub fn imports(&self) -> &[ImportDeclaration] {
    &self.imports
  }

  pub fn exports(&self) -> &[ExportDeclaration] {
    &self.exports
  }

  /// `require()` calls to the global `require` with a single string literal.
  pub fn requires(&self) -> &[RequireCall] {
    self.requires.get_or_init(|| {
      let mut collector = RequireCollector {
        unresolved: self.contexts.unresolved,
        requires: Vec::new(),
      };
      self.module.visit_with(&mut collector);
      collector.requires
    })
  }

  /// Whether the unit references the free `module` or `exports` variables.
  pub fn has_common_exports(&self) -> bool {
    *self.has_common_exports.get_or_init(|| {
      let mut finder = CommonExportsFinder {
        unresolved: self.contexts.unresolved,
        found: false,
      };
      self.module.visit_with(&mut finder);
      finder.found
    })
  }

  /// Import sources and `require()` targets in source order. A specifier
  /// referenced more than once is listed each time.
  pub fn dependency_specifiers(&self) -> Vec<String> {
    let mut specifiers = self
      .imports
      .iter()
      .map(|import| (import.span.lo, &import.source))
      .chain(
        self
          .requires()
          .iter()
          .map(|require| (require.span.lo, &require.specifier)),
      )
      .collect::<Vec<_>>();
    specifiers.sort_by_key(|(pos, _)| *pos);
    specifiers
      .into_iter()
      .map(|(_, specifier)| specifier.to_string())
      .collect()
  }

  /// Dependency information for `name`, falling back to the entries recorded
  /// for renamed specifiers.
  pub fn lookup(&self, name: &str) -> Option<&Dependency> {
    lookup(&self.options.dependencies, &self.renamed, name)
  }

  /// Renamed specifier to the dependency entry of the original specifier.
  pub fn renamed(&self) -> &DependencyRegistry {
    &self.renamed
  }

  pub fn options(&self) -> &TransformOptions {
    &self.options
  }

  pub fn module(&self) -> &Module {
    &self.module
  }

  pub fn into_module(self) -> Module {
    self.module
  }

  pub fn summary(&self) -> UnitSummary {
    let dependencies = self.dependency_specifiers();
    let renames = self
      .options
      .renames
      .iter()
      .filter(|(from, _)| dependencies.contains(from))
      .map(|(from, to)| (from.clone(), to.clone()))
      .collect();
    UnitSummary {
      unit_type: self.unit_type(),
      default: self.exports_default(),
      dependencies,
      renames,
    }
  }

  /// `require("y")` -> `require("z")` for a `"y" -> "z"` rename.
  pub fn rename_requires(&mut self) {
    let Unit {
      module,
      contexts,
      options,
      renamed,
      ..
    } = self;
    let mut count = 0;
    module.visit_mut_with(&mut RequireRewriter::new(
      contexts.unresolved,
      |expr: &mut Expr, specifier: &Atom| {
        let Some(to) = options.renames.get(&**specifier) else {
          return;
        };
        tracing::trace!(
          from = &**specifier,
          to = to.as_str(),
          "renamed require"
        );
        requires::rename_require(expr, to);
        record_rename(&options.dependencies, renamed, specifier, to);
        count += 1;
      },
    ));
    tracing::debug!(count, "renamed requires");
  }

  /// Renames the source of every `import` declaration.
  pub fn rename_imports(&mut self) {
    let mut count = 0;
    for import in &mut self.imports {
      let Some(to) = self.options.renames.get(&*import.source) else {
        continue;
      };
      record_rename(
        &self.options.dependencies,
        &mut self.renamed,
        &import.source,
        to,
      );
      import.source = to.as_str().into();
      count += 1;
    }
    imports::rename_import_sources(&mut self.module, &self.options.renames);
    tracing::debug!(count, "renamed imports");
  }

  /// `require("y")` -> `require("y").default` when `"y"` is a module with a
  /// default export.
  pub fn defaultify_requires(&mut self) {
    let Unit {
      module,
      contexts,
      options,
      renamed,
      ..
    } = self;
    let mut count = 0;
    module.visit_mut_with(&mut RequireRewriter::new(
      contexts.unresolved,
      |expr: &mut Expr, specifier: &Atom| {
        let dependency = lookup(&options.dependencies, renamed, specifier);
        if dependency.is_some_and(Dependency::requires_default_member) {
          tracing::trace!(specifier = &**specifier, "defaultified require");
          requires::defaultify_require(expr);
          count += 1;
        }
      },
    ));
    tracing::debug!(count, "defaultified requires");
  }

  /// Prepends a `require()` statement for every import, in import order.
  pub fn build_imports(&mut self) {
    let mut body =
      Vec::with_capacity(self.imports.len() + self.module.body.len());
    let mut names = imports::SyntheticNames::new();
    for import in &mut self.imports {
      let dependency =
        lookup(&self.options.dependencies, &self.renamed, &import.source);
      let stmt =
        imports::build_import(import, dependency, &mut names, self.contexts);
      body.push(ModuleItem::Stmt(stmt));
    }
    tracing::debug!(count = body.len(), "built imports");
    body.append(&mut self.module.body);
    self.module.body = body;
  }

  pub fn remove_imports(&mut self) {
    let count = imports::remove_imports(&mut self.module);
    tracing::debug!(count, "removed imports");
  }

  /// Prepends the sealed exports object. Returns `false` when the unit
  /// exports nothing.
  pub fn build_exports(&mut self) -> bool {
    let stmt = exports::build_exports(
      &self.exports,
      self.contexts.unresolved,
      self.contexts.top_level,
    );
    let Some(stmt) = stmt else {
      return false;
    };
    self.module.body.insert(0, ModuleItem::Stmt(stmt));
    tracing::debug!("built exports");
    true
  }

  pub fn remove_exports(&mut self) {
    exports::remove_exports(&mut self.module, self.contexts.top_level);
  }

  /// Rewrites every free reference to an imported binding into a member
  /// access on its synthetic require variable. Requires `build_imports`.
  pub fn build_references(&mut self) {
    let mut rewriter =
      imports::ReferenceRewriter::new(&self.imports, self.contexts.top_level);
    self.module.visit_mut_with(&mut rewriter);
    tracing::debug!(count = rewriter.rewritten, "built references");
  }

  /// Runs every pass in order and returns the transformed module.
  ///
  /// A commonjs unit only has its `require()` calls renamed and defaultified.
  pub fn transform(mut self) -> Module {
    let unit_type = self.unit_type();
    let span =
      tracing::debug_span!("transform", unit_type = unit_type.as_str());
    let _enter = span.enter();

    self.rename_requires();
    if unit_type == UnitType::Module {
      self.rename_imports();
    }
    self.defaultify_requires();
    if unit_type == UnitType::Commonjs {
      return self.module;
    }

    self.build_imports();
    self.remove_imports();
    self.build_exports();
    self.remove_exports();
    self.build_references();
    self.module
  }
}

fn lookup<'a>(
  dependencies: &'a DependencyRegistry,
  renamed: &'a DependencyRegistry,
  name: &str,
) -> Option<&'a Dependency> {
  dependencies.get(name).or_else(|| renamed.get(name))
}

/// Records the entry of the original specifier under the renamed one.
fn record_rename(
  dependencies: &DependencyRegistry,
  renamed: &mut DependencyRegistry,
  from: &str,
  to: &str,
) {
  if let Some(dependency) = dependencies.get(from) {
    renamed.insert(to.to_string(), *dependency);
  }
}

#[derive(Debug, Error, JsError)]
pub enum TranspileError {
  #[class(inherit)]
  #[error(transparent)]
  Parse(#[from] ParseDiagnosticsError),
  #[class(inherit)]
  #[error(transparent)]
  Transform(#[from] TransformError),
  #[class(inherit)]
  #[error(transparent)]
  Emit(#[from] EmitError),
}

/// Parses, transforms and prints a single source text.
pub fn transpile(
  params: ParseParams,
  options: &TransformOptions,
  emit_options: &EmitOptions,
) -> Result<EmittedSourceText, TranspileError> {
  let parsed_source = parse_program(params)?;
  parsed_source.transpile(options, emit_options)
}

impl ParsedSource {
  /// Creates a unit from a copy of the parsed program.
  pub fn to_unit(
    &self,
    options: &TransformOptions,
  ) -> Result<Unit, TransformError> {
    Unit::from_program(self.program_ref().clone(), options)
  }

  /// Transforms the source and prints it along with its comments.
  pub fn transpile(
    self,
    options: &TransformOptions,
    emit_options: &EmitOptions,
  ) -> Result<EmittedSourceText, TranspileError> {
    let (program, comments, source_map) = self.into_parts();
    let module = Unit::from_program(program, options)?.transform();
    Ok(emit(&module, &comments, &source_map, emit_options)?)
  }
}

#[cfg(test)]
mod test {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::MediaType;
  use crate::SourceMapOption;

  fn parse(text: &str) -> ParsedSource {
    parse_program(ParseParams {
      specifier: "input.js".to_string(),
      text: text.to_string(),
      media_type: MediaType::JavaScript,
      maybe_syntax: None,
    })
    .unwrap()
  }

  fn unit(text: &str) -> Unit {
    parse(text).to_unit(&TransformOptions::default()).unwrap()
  }

  fn unit_error(text: &str) -> TransformError {
    parse(text)
      .to_unit(&TransformOptions::default())
      .err()
      .unwrap()
  }

  fn transform(text: &str, options: &TransformOptions) -> String {
    parse(text)
      .transpile(
        options,
        &EmitOptions {
          source_map: SourceMapOption::None,
          ..Default::default()
        },
      )
      .unwrap()
      .text
  }

  fn assert_no_module_syntax(code: &str) {
    for line in code.lines() {
      let line = line.trim_start();
      assert!(!line.starts_with("import "), "{}", code);
      assert!(!line.starts_with("export "), "{}", code);
    }
  }

  #[test]
  fn classifies_module() {
    let unit = unit("import x from \"y\";\nexport default x;");
    assert_eq!(unit.unit_type(), UnitType::Module);
    assert!(unit.exports_default());
    assert_eq!(unit.imports().len(), 1);
    assert_eq!(unit.exports().len(), 1);
  }

  #[test]
  fn classifies_commonjs() {
    let unit = unit("var x = require(\"y\");\nmodule.exports = x;");
    assert_eq!(unit.unit_type(), UnitType::Commonjs);
    assert!(!unit.exports_default());
    assert!(unit.has_common_exports());
  }

  #[test]
  fn common_exports_respect_local_bindings() {
    let unit = unit("function f(module, exports) { exports.a = module; }");
    assert!(!unit.has_common_exports());
  }

  #[test]
  fn classifies_import_shapes() {
    let unit = unit(concat!(
      "import \"a\";\n",
      "import b from \"b\";\n",
      "import { c, d as e } from \"c\";\n",
      "import f, { g } from \"f\";\n",
    ));
    let shapes = unit
      .imports()
      .iter()
      .map(|import| (&*import.source, import.bindings().len()))
      .collect::<Vec<_>>();
    assert_eq!(shapes, vec![("a", 0), ("b", 1), ("c", 2), ("f", 2)]);
    assert!(matches!(unit.imports()[0].shape, ImportShape::Bare));
    assert!(matches!(unit.imports()[1].shape, ImportShape::Default { .. }));
    let imported = unit.imports()[2]
      .bindings()
      .into_iter()
      .map(|(local, imported)| (local.sym.to_string(), imported.to_string()))
      .collect::<Vec<_>>();
    assert_eq!(
      imported,
      vec![
        ("c".to_string(), "c".to_string()),
        ("e".to_string(), "d".to_string()),
      ]
    );
    assert_eq!(unit.imports()[3].bindings()[0].1, "default");
  }

  #[test]
  fn classifies_export_shapes() {
    let unit = unit(concat!(
      "export default function main() {}\n",
      "var a = 1, b = 2;\n",
      "export { a, b as c };\n",
      "export function f() {}\n",
      "export var { g, h: [i] } = {};\n",
      "export class K {}\n",
    ));
    let exports = unit.exports();
    assert!(matches!(
      &exports[0],
      ExportDeclaration::Default(DefaultExport::Function(name))
        if &*name.sym == "main"
    ));
    let top_level = unit.contexts.top_level;
    let exported = exports
      .iter()
      .flat_map(|export| export.bindings(top_level))
      .map(|binding| {
        (binding.local.sym.to_string(), binding.exported.to_string())
      })
      .collect::<Vec<_>>();
    let expected = [
      ("main", "default"),
      ("a", "a"),
      ("b", "c"),
      ("f", "f"),
      ("g", "g"),
      ("i", "i"),
      ("K", "K"),
    ]
    .iter()
    .map(|(local, exported)| (local.to_string(), exported.to_string()))
    .collect::<Vec<_>>();
    assert_eq!(exported, expected);
  }

  #[test]
  fn rejects_unsupported_shapes() {
    assert_eq!(
      unit_error("import * as x from \"y\";"),
      TransformError::UnsupportedImport {
        specifier: "y".to_string(),
        kind: "namespace import",
      }
    );
    assert_eq!(
      unit_error("export * from \"y\";"),
      TransformError::UnsupportedExport { kind: "export all" }
    );
    assert_eq!(
      unit_error("export { x } from \"y\";"),
      TransformError::UnsupportedExport {
        kind: "re-export from another module"
      }
    );
  }

  #[test]
  fn rejects_multiple_default_exports() {
    // the parser rejects two `export default`s, so build the second by hand
    let mut module = match parse("export default 1;").into_program() {
      Program::Module(module) => module,
      Program::Script(_) => unreachable!(),
    };
    let duplicate = module.body[0].clone();
    module.body.push(duplicate);
    let err = Unit::new(module, &TransformOptions::default())
      .err()
      .unwrap();
    assert_eq!(err, TransformError::MultipleDefaultExports { count: 2 });
    assert_eq!(
      err.to_string(),
      "Expected at most one default export, found 2."
    );
  }

  #[test]
  fn collects_requires() {
    let unit = unit(concat!(
      "var a = require(\"a\");\n",
      "var b = require(\"b\", 1);\n",
      "var c = require(c);\n",
      "function f() { return require(\"d\"); }\n",
      "function g(require) { return require(\"e\"); }\n",
      "function require(x) {}\n",
    ));
    // a top-level `function require` shadows every call in the unit
    assert!(unit.requires().is_empty());

    let unit = self::unit(concat!(
      "var a = require(\"a\");\n",
      "var b = require(\"b\", 1);\n",
      "var c = require(c);\n",
      "function f() { return require(\"d\"); }\n",
      "function g(require) { return require(\"e\"); }\n",
      "var h = (require) => require(\"h\");\n",
      "var i = function require() { return require(\"i\"); };\n",
    ));
    let specifiers = unit
      .requires()
      .iter()
      .map(|require| require.specifier.to_string())
      .collect::<Vec<_>>();
    assert_eq!(specifiers, vec!["a", "d"]);
  }

  #[test]
  fn dependency_specifiers_in_source_order() {
    let unit = unit(concat!(
      "import \"a\";\n",
      "var b = require(\"b\");\n",
      "import c from \"c\";\n",
      "require(\"a\");\n",
    ));
    assert_eq!(unit.dependency_specifiers(), vec!["a", "b", "c", "a"]);
  }

  #[test]
  fn summary_serializes() {
    let unit = parse("import x from \"y\";\nexport default x;")
      .to_unit(&TransformOptions::default().with_rename("y", "z"))
      .unwrap();
    let summary = serde_json::to_value(unit.summary()).unwrap();
    assert_eq!(
      summary,
      serde_json::json!({
        "type": "module",
        "default": true,
        "dependencies": ["y"],
        "renames": { "y": "z" },
      })
    );
  }

  #[test]
  fn export_bindings_are_live() {
    let code = transform(
      concat!(
        "export var a = 1;\n",
        "export function update() {\n",
        "  a = 2;\n",
        "}\n",
      ),
      &TransformOptions::default(),
    );
    assert!(
      code.starts_with("Object.seal(Object.defineProperties(exports, {"),
      "{}",
      code
    );
    assert!(code.contains("return a;"), "{}", code);
    assert!(code.contains("return update;"), "{}", code);
    assert!(code.contains("enumerable: true"), "{}", code);
    assert!(code.contains("var a = 1;"), "{}", code);
    assert!(code.contains("function update() {"), "{}", code);
    assert_no_module_syntax(&code);
  }

  #[test]
  fn underscoreish() {
    let code = transform(
      concat!(
        "import x from \"y\";\n",
        "import { y as r } from \"r\";\n",
        "export default function () {\n",
        "  return x;\n",
        "}\n",
        "export function a() {\n",
        "  return r;\n",
        "}\n",
        "export function b() {\n",
        "  var r = 1;\n",
        "  return r;\n",
        "}\n",
      ),
      &TransformOptions::default(),
    );
    assert!(!code.contains("return x;"), "{}", code);
    assert!(code.contains("return __$mod_y.default;"), "{}", code);
    assert!(code.contains("return __$mod_r.y;"), "{}", code);
    // the nested declaration shadows the import
    assert!(code.contains("var r = 1;"), "{}", code);
    assert!(code.contains("return r;"), "{}", code);
    assert!(code.contains("var __$mod_y = require(\"y\");"), "{}", code);
    assert!(code.contains("var __$mod_r = require(\"r\");"), "{}", code);
    assert!(code.contains("var __$mod_default = function"), "{}", code);
    assert!(code.contains("return __$mod_default;"), "{}", code);
    assert_no_module_syntax(&code);
  }

  #[test]
  fn exports_go_above_requires() {
    let code = transform(
      "import \"a\";\nimport b from \"b\";\nexport default b;",
      &TransformOptions::default(),
    );
    let exports = code.find("Object.seal").unwrap();
    let bare = code.find("require(\"a\");").unwrap();
    let default = code.find("var __$mod_b = require(\"b\");").unwrap();
    let body = code.find("var __$mod_default = __$mod_b.default;").unwrap();
    assert!(exports < bare && bare < default && default < body, "{}", code);
  }

  #[test]
  fn export_default_string() {
    let code = transform(
      "export default \"LOL\";",
      &TransformOptions::default(),
    );
    assert!(code.contains("var __$mod_default = \"LOL\";"), "{}", code);
    assert!(code.contains("return __$mod_default;"), "{}", code);
  }

  #[test]
  fn export_default_named_class_keeps_binding() {
    let code = transform(
      "export default class Foo {}\nnew Foo();",
      &TransformOptions::default(),
    );
    assert!(code.contains("class Foo {"), "{}", code);
    assert!(code.contains("return Foo;"), "{}", code);
    assert!(!code.contains("__$mod_default"), "{}", code);
  }

  #[test]
  fn reexported_import_reads_through_require_variable() {
    let code = transform(
      "import { y } from \"m\";\nexport { y as z };",
      &TransformOptions::default(),
    );
    assert!(code.contains("z: {"), "{}", code);
    assert!(code.contains("return __$mod_m.y;"), "{}", code);
  }

  #[test]
  fn rewrites_shorthand_properties() {
    let code = transform(
      "import { y } from \"m\";\nvar o = { y };",
      &TransformOptions::default(),
    );
    assert!(code.contains("y: __$mod_m.y"), "{}", code);
  }

  #[test]
  fn domify_commonjs_default_import() {
    let options = TransformOptions::default()
      .with_dependency("domify@1.2.2", Dependency::commonjs());
    let code = transform(
      "import domify from \"domify@1.2.2\";\ndomify(\"<div>\");",
      &options,
    );
    assert!(
      code.contains("var domify = require(\"domify@1.2.2\");"),
      "{}",
      code
    );
    assert!(code.contains("domify(\"<div>\");"), "{}", code);
    assert!(!code.contains(".default"), "{}", code);
  }

  #[test]
  fn mixed_import_of_commonjs_dependency() {
    let options = TransformOptions::default()
      .with_dependency("x", Dependency::commonjs());
    let code = transform("import a, { b } from \"x\";\na(b);", &options);
    assert!(code.contains("var __$mod_x = require(\"x\");"), "{}", code);
    assert!(code.contains("__$mod_x(__$mod_x.b);"), "{}", code);
    assert!(!code.contains(".default"), "{}", code);
  }

  #[test]
  fn mixed_import_of_unknown_dependency_reads_default() {
    let code = transform(
      "import a, { b } from \"x\";\na(b);",
      &TransformOptions::default(),
    );
    assert!(code.contains("__$mod_x.default(__$mod_x.b);"), "{}", code);
  }

  #[test]
  fn colliding_synthetic_names_get_suffixed() {
    let code = transform(
      "import { p } from \"a-b\";\nimport { q } from \"a_b\";\np(q);",
      &TransformOptions::default(),
    );
    assert!(code.contains("var __$mod_a_b = require(\"a-b\");"), "{}", code);
    assert!(
      code.contains("var __$mod_a_b_1 = require(\"a_b\");"),
      "{}",
      code
    );
    assert!(code.contains("__$mod_a_b.p(__$mod_a_b_1.q);"), "{}", code);
  }

  #[test]
  fn repeated_source_shares_synthetic_name() {
    let code = transform(
      "import { p } from \"a\";\nimport { q } from \"a\";\np(q);",
      &TransformOptions::default(),
    );
    assert!(code.contains("__$mod_a.p(__$mod_a.q);"), "{}", code);
    assert!(!code.contains("__$mod_a_1"), "{}", code);
  }

  #[test]
  fn rewrites_destructuring_assignment_targets() {
    let code = transform(
      concat!(
        "import { y } from \"m\";\n",
        "[y] = [1];\n",
        "({ y } = o);\n",
        "({ y = 2 } = o);\n",
      ),
      &TransformOptions::default(),
    );
    assert!(code.contains("[__$mod_m.y] ="), "{}", code);
    assert!(code.contains("y: __$mod_m.y"), "{}", code);
    assert!(code.contains("y: __$mod_m.y = 2"), "{}", code);
  }

  #[test]
  fn domify_renamed() {
    let options = TransformOptions::default()
      .with_dependency("domify@1.2.2", Dependency::commonjs())
      .with_rename("domify@1.2.2", "component/domify@1.2.2");
    let code = transform(
      "import domify from \"domify@1.2.2\";\ndomify(\"<div>\");",
      &options,
    );
    assert!(
      code.contains("var domify = require(\"component/domify@1.2.2\");"),
      "{}",
      code
    );
    assert!(code.contains("domify(\"<div>\");"), "{}", code);
  }

  #[test]
  fn domify_renamed_with_entry_under_new_name() {
    let options = TransformOptions::default()
      .with_dependency("component/domify@1.2.2", Dependency::commonjs())
      .with_rename("domify@1.2.2", "component/domify@1.2.2");
    let code = transform(
      "import domify from \"domify@1.2.2\";\ndomify(\"<div>\");",
      &options,
    );
    assert!(
      code.contains("var domify = require(\"component/domify@1.2.2\");"),
      "{}",
      code
    );
  }

  #[test]
  fn module_default_import_goes_through_default_member() {
    let options =
      TransformOptions::default().with_dependency("y", Dependency::module(true));
    let code = transform("import x from \"y\";\nx();", &options);
    assert!(code.contains("var __$mod_y = require(\"y\");"), "{}", code);
    assert!(code.contains("__$mod_y.default();"), "{}", code);
  }

  #[test]
  fn renames_requires() {
    let options = TransformOptions::default().with_rename("y", "z");
    let code = transform("var x = require(\"y\");", &options);
    assert_eq!(code, "var x = require(\"z\");\n");
  }

  #[test]
  fn defaultifies_requires() {
    let options =
      TransformOptions::default().with_dependency("y", Dependency::module(true));
    let code = transform("var x = require(\"y\");", &options);
    assert_eq!(code, "var x = require(\"y\").default;\n");

    let options = TransformOptions::default()
      .with_dependency("y", Dependency::module(false))
      .with_dependency("z", Dependency::commonjs());
    let code =
      transform("var x = require(\"y\");\nvar w = require(\"z\");", &options);
    assert_eq!(code, "var x = require(\"y\");\nvar w = require(\"z\");\n");
  }

  #[test]
  fn defaultifies_renamed_requires_by_original_entry() {
    let options = TransformOptions::default()
      .with_dependency("y", Dependency::module(true))
      .with_rename("y", "z");
    let code = transform("var x = require(\"y\");", &options);
    assert_eq!(code, "var x = require(\"z\").default;\n");
  }

  #[test]
  fn defaultifies_renamed_requires_by_new_entry() {
    let options = TransformOptions::default()
      .with_dependency("z", Dependency::module(true))
      .with_rename("y", "z");
    let code = transform("var x = require(\"y\");", &options);
    assert_eq!(code, "var x = require(\"z\").default;\n");
  }

  #[test]
  fn lookup_falls_back_to_renamed() {
    let options = TransformOptions::default()
      .with_dependency("y", Dependency::module(true))
      .with_rename("y", "z");
    let mut unit = parse("var x = require(\"y\");").to_unit(&options).unwrap();
    assert_eq!(unit.lookup("z"), None);
    unit.rename_requires();
    assert_eq!(unit.lookup("z"), Some(&Dependency::module(true)));
    assert_eq!(unit.renamed().len(), 1);
  }

  #[test]
  fn leaves_shadowed_requires_alone() {
    let options =
      TransformOptions::default().with_dependency("y", Dependency::module(true));
    let code = transform(
      "function load(require) {\n  return require(\"y\");\n}\n",
      &options,
    );
    assert!(code.contains("return require(\"y\");"), "{}", code);
    assert!(!code.contains(".default"), "{}", code);
  }

  #[test]
  fn commonjs_unit_only_normalizes_requires() {
    let options = TransformOptions::default().with_rename("y", "z");
    let code = transform(
      concat!(
        "var x = require(\"y\");\n",
        "module.exports = function () {\n",
        "  return x;\n",
        "};\n",
      ),
      &options,
    );
    assert!(code.contains("var x = require(\"z\");"), "{}", code);
    assert!(code.contains("module.exports = function"), "{}", code);
    assert!(!code.contains("Object.seal"), "{}", code);
  }

  #[test]
  fn unit_without_exports_builds_no_exports_object() {
    let code = transform("import \"a\";\nfoo();", &TransformOptions::default());
    assert_eq!(code, "require(\"a\");\nfoo();\n");
  }

  #[test]
  fn transpile_reports_parse_errors() {
    let err = transpile(
      ParseParams {
        specifier: "input.js".to_string(),
        text: "import {".to_string(),
        media_type: MediaType::JavaScript,
        maybe_syntax: None,
      },
      &TransformOptions::default(),
      &EmitOptions::default(),
    )
    .err()
    .unwrap();
    assert!(matches!(err, TranspileError::Parse(_)));
  }
}
