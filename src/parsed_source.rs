// Copyright 2018-2024 the Deno authors. All rights reserved. MIT license.

use std::fmt;
use std::sync::Arc;

use crate::swc::ast::Program;
use crate::swc::common::comments::SingleThreadedComments;
use crate::swc::common::Mark;
use crate::swc::common::SyntaxContext;
use crate::MediaType;
use crate::SourceMap;

#[derive(Debug, Clone)]
pub struct Marks {
  pub unresolved: Mark,
  pub top_level: Mark,
}

/// Wrapper around the swc globals (mark and syntax context interner).
///
/// Every unit owns one of these so transforms never share hygiene data.
#[derive(Clone)]
pub struct Globals {
  marks: Marks,
  globals: Arc<crate::swc::common::Globals>,
}

impl Default for Globals {
  fn default() -> Self {
    let globals = crate::swc::common::Globals::new();
    let marks = crate::swc::common::GLOBALS.set(&globals, || Marks {
      unresolved: Mark::new(),
      top_level: Mark::fresh(Mark::root()),
    });
    Self {
      marks,
      globals: Arc::new(globals),
    }
  }
}

impl Globals {
  pub fn with<T>(&self, action: impl FnOnce(&Marks) -> T) -> T {
    crate::swc::common::GLOBALS.set(&self.globals, || action(&self.marks))
  }
}

/// Syntax contexts produced by scope analysis.
#[derive(Debug, Clone, Copy)]
pub struct SyntaxContexts {
  /// Context of identifiers that reference no binding in the unit.
  pub unresolved: SyntaxContext,
  /// Context of bindings declared at the top level of the unit.
  pub top_level: SyntaxContext,
}

/// A parsed source containing an AST, its comments and the source map the
/// AST's spans point into.
pub struct ParsedSource {
  specifier: String,
  media_type: MediaType,
  program: Program,
  comments: SingleThreadedComments,
  source_map: SourceMap,
}

impl ParsedSource {
  pub(crate) fn new(
    specifier: String,
    media_type: MediaType,
    program: Program,
    comments: SingleThreadedComments,
    source_map: SourceMap,
  ) -> Self {
    ParsedSource {
      specifier,
      media_type,
      program,
      comments,
      source_map,
    }
  }

  /// Gets the specifier of the source.
  pub fn specifier(&self) -> &str {
    &self.specifier
  }

  /// Gets the media type of the source.
  pub fn media_type(&self) -> MediaType {
    self.media_type
  }

  /// Gets the parsed program as a reference.
  pub fn program_ref(&self) -> &Program {
    &self.program
  }

  /// Takes the parsed program, dropping comments and the source map.
  pub fn into_program(self) -> Program {
    self.program
  }

  /// Splits the parsed source into its parts.
  pub fn into_parts(self) -> (Program, SingleThreadedComments, SourceMap) {
    (self.program, self.comments, self.source_map)
  }

  /// Gets the comments found in the source file.
  pub fn comments(&self) -> &SingleThreadedComments {
    &self.comments
  }

  /// Gets the source map holding the source text.
  pub fn source_map(&self) -> &SourceMap {
    &self.source_map
  }

  /// Gets if this source was parsed as a module.
  pub fn is_module(&self) -> bool {
    matches!(self.program, Program::Module(_))
  }
}

impl fmt::Debug for ParsedSource {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.debug_struct("ParsedSource")
      .field("specifier", &self.specifier)
      .field("media_type", &self.media_type)
      .field("program", &self.program)
      .finish()
  }
}
