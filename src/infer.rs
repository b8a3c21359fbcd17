// Copyright 2018-2024 the Deno authors. All rights reserved. MIT license.

use deno_error::JsError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::parse_program;
use crate::ParseDiagnosticsError;
use crate::ParseParams;
use crate::TransformError;
use crate::TransformOptions;
use crate::UnitType;

static MODULE_SYNTAX_RE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"(?:^|[^\w$.])(?:import|export)(?:\s|\{|\*)")
    .expect("valid regex")
});
static DEFAULT_EXPORT_RE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"(?:^|[^\w$.])export\s+default\b").expect("valid regex")
});

/// What a build pipeline needs to know about a unit before transforming it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleInfo {
  #[serde(rename = "type")]
  pub unit_type: UnitType,
  pub default: bool,
  pub has_common_exports: bool,
  /// Import sources and `require()` targets in source order.
  pub dependencies: Vec<String>,
}

#[derive(Debug, Error, JsError)]
pub enum InferError {
  #[class(inherit)]
  #[error(transparent)]
  Parse(#[from] ParseDiagnosticsError),
  #[class(inherit)]
  #[error(transparent)]
  Transform(#[from] TransformError),
}

/// Parses the source and reads the unit facts without transforming it.
pub fn infer(params: ParseParams) -> Result<ModuleInfo, InferError> {
  let parsed_source = parse_program(params)?;
  let (program, _, _) = parsed_source.into_parts();
  let unit = crate::Unit::from_program(program, &TransformOptions::default())?;
  Ok(ModuleInfo {
    unit_type: unit.unit_type(),
    default: unit.exports_default(),
    has_common_exports: unit.has_common_exports(),
    dependencies: unit.dependency_specifiers(),
  })
}

/// Approximation of the unit type and default export flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FastInference {
  #[serde(rename = "type")]
  pub unit_type: UnitType,
  pub default: bool,
}

/// Classifies source text with a keyword scan instead of a parse.
///
/// Keywords inside strings and comments are counted, so this can report a
/// module for a unit that has no module syntax.
pub fn infer_fast(text: &str) -> FastInference {
  let is_module = MODULE_SYNTAX_RE.is_match(text);
  FastInference {
    unit_type: if is_module {
      UnitType::Module
    } else {
      UnitType::Commonjs
    },
    default: is_module && DEFAULT_EXPORT_RE.is_match(text),
  }
}
