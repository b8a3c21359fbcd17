// Copyright 2018-2024 the Deno authors. All rights reserved. MIT license.

use std::fmt;

use deno_error::JsError;

use crate::swc::common::Span;
use crate::swc::common::Spanned;
use crate::swc::parser::error::Error as SwcParseError;
use crate::SourceMap;

/// 1-indexed line and column used when displaying a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineAndColumnDisplay {
  pub line_number: usize,
  pub column_number: usize,
}

/// Parsing diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, JsError)]
#[class(syntax)]
pub struct ParseDiagnostic {
  /// Specifier of the source the diagnostic occurred in.
  pub specifier: String,
  /// 1-indexed display position the diagnostic occurred at.
  pub display_position: LineAndColumnDisplay,
  /// Message of the swc syntax error.
  pub message: String,
  pub span: Span,
}

impl ParseDiagnostic {
  pub fn from_swc_error(
    err: SwcParseError,
    specifier: &str,
    source_map: &SourceMap,
  ) -> ParseDiagnostic {
    let span = err.span();
    ParseDiagnostic {
      specifier: specifier.to_string(),
      display_position: source_map.line_and_column_display(span.lo),
      message: err.into_kind().msg().to_string(),
      span,
    }
  }
}

impl std::error::Error for ParseDiagnostic {}

impl fmt::Display for ParseDiagnostic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{} at {}:{}:{}",
      self.message,
      self.specifier,
      self.display_position.line_number,
      self.display_position.column_number,
    )
  }
}

/// Errors the parser recovered from but which still make the unit unusable.
#[derive(Debug, Clone, PartialEq, Eq, JsError)]
#[class(syntax)]
pub struct ParseDiagnosticsError(pub Vec<ParseDiagnostic>);

impl std::error::Error for ParseDiagnosticsError {}

impl fmt::Display for ParseDiagnosticsError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, diagnostic) in self.0.iter().enumerate() {
      if i > 0 {
        write!(f, "\n\n")?;
      }

      write!(f, "{}", diagnostic)?
    }

    Ok(())
  }
}
