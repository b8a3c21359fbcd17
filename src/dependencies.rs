// Copyright 2018-2024 the Deno authors. All rights reserved. MIT license.

use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;

/// Module convention a dependency exposes its bindings through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
  /// Declarative `import`/`export` syntax, transformed into a sealed
  /// exports object whose primary binding lives under `default`.
  Module,
  /// Dynamic `require()` with the primary value at the top level.
  Commonjs,
}

/// What the caller knows about a dependency.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
  /// `None` when the caller doesn't know the convention.
  #[serde(default, rename = "type", alias = "kind")]
  pub kind: Option<DependencyKind>,
  #[serde(default, rename = "default", alias = "hasDefault")]
  pub has_default: bool,
}

impl Dependency {
  pub fn module(has_default: bool) -> Self {
    Dependency {
      kind: Some(DependencyKind::Module),
      has_default,
    }
  }

  pub fn commonjs() -> Self {
    Dependency {
      kind: Some(DependencyKind::Commonjs),
      has_default: false,
    }
  }

  /// Whether `require()` of this dependency needs `.default` appended.
  pub fn requires_default_member(&self) -> bool {
    self.kind == Some(DependencyKind::Module) && self.has_default
  }

  pub fn is_commonjs(&self) -> bool {
    self.kind == Some(DependencyKind::Commonjs)
  }
}

/// Specifier to dependency information.
pub type DependencyRegistry = IndexMap<String, Dependency>;

/// Original specifier to replacement specifier.
pub type RenameTable = IndexMap<String, String>;

/// Options for transforming a single unit.
///
/// Both tables are read-only for the duration of a transform.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformOptions {
  #[serde(default)]
  pub dependencies: DependencyRegistry,
  #[serde(default)]
  pub renames: RenameTable,
}

impl TransformOptions {
  pub fn with_dependency(
    mut self,
    specifier: impl Into<String>,
    dependency: Dependency,
  ) -> Self {
    self.dependencies.insert(specifier.into(), dependency);
    self
  }

  pub fn with_rename(
    mut self,
    from: impl Into<String>,
    to: impl Into<String>,
  ) -> Self {
    self.renames.insert(from.into(), to.into());
    self
  }
}
