// Copyright 2018-2021 the Deno authors. All rights reserved. MIT license.

use crate::swc::ast::EsVersion;
use crate::swc::ast::Module;
use crate::swc::ast::Program;
use crate::swc::ast::Script;
use crate::swc::common::comments::SingleThreadedComments;
use crate::swc::common::input::StringInput;
use crate::swc::parser::lexer::Lexer;
use crate::swc::parser::EsSyntax;
use crate::swc::parser::Parser;
use crate::swc::parser::Syntax;
use crate::swc::parser::TsSyntax;
use crate::MediaType;
use crate::ParseDiagnostic;
use crate::ParseDiagnosticsError;
use crate::ParsedSource;
use crate::SourceMap;

/// Ecmascript version used for lexing and parsing.
pub const ES_VERSION: EsVersion = EsVersion::Es2022;

/// Parameters for parsing.
pub struct ParseParams {
  /// Specifier of the source text. Also used as the file name in
  /// generated source maps.
  pub specifier: String,
  /// Source text.
  pub text: String,
  /// Media type of the source text.
  pub media_type: MediaType,
  /// Syntax to use when parsing.
  ///
  /// A default `Syntax` is picked based on the media type, but you may use
  /// this to provide a custom `Syntax`.
  pub maybe_syntax: Option<Syntax>,
}

/// Parses the provided information attempting to figure out if the provided
/// text is for a script or a module.
pub fn parse_program(
  params: ParseParams,
) -> Result<ParsedSource, ParseDiagnosticsError> {
  parse(params, ParseMode::Program)
}

/// Parses the provided information to a module.
pub fn parse_module(
  params: ParseParams,
) -> Result<ParsedSource, ParseDiagnosticsError> {
  parse(params, ParseMode::Module)
}

/// Parses the provided information to a script.
pub fn parse_script(
  params: ParseParams,
) -> Result<ParsedSource, ParseDiagnosticsError> {
  parse(params, ParseMode::Script)
}

enum ParseMode {
  Program,
  Module,
  Script,
}

fn parse(
  params: ParseParams,
  parse_mode: ParseMode,
) -> Result<ParsedSource, ParseDiagnosticsError> {
  let specifier = params.specifier;
  let media_type = params.media_type;
  let syntax = params
    .maybe_syntax
    .unwrap_or_else(|| get_syntax(media_type));
  let source_map = SourceMap::default();
  let source_file = source_map.new_source_file(specifier.clone(), params.text);
  let input = StringInput::from(&*source_file);
  let comments = SingleThreadedComments::default();
  let lexer = Lexer::new(syntax, ES_VERSION, input, Some(&comments));
  let mut parser = Parser::new_from(lexer);

  let result = match parse_mode {
    ParseMode::Program => parser.parse_program(),
    ParseMode::Module => parser.parse_module().map(Program::Module),
    ParseMode::Script => parser.parse_script().map(Program::Script),
  };
  let program = result.map_err(|err| {
    ParseDiagnosticsError(vec![ParseDiagnostic::from_swc_error(
      err,
      &specifier,
      &source_map,
    )])
  })?;

  let recovered = parser
    .take_errors()
    .into_iter()
    .map(|err| ParseDiagnostic::from_swc_error(err, &specifier, &source_map))
    .collect::<Vec<_>>();
  if !recovered.is_empty() {
    return Err(ParseDiagnosticsError(recovered));
  }

  Ok(ParsedSource::new(
    specifier,
    media_type,
    program,
    comments,
    source_map,
  ))
}

/// Gets the default `Syntax` used for the provided media type.
pub fn get_syntax(media_type: MediaType) -> Syntax {
  match media_type {
    MediaType::Jsx => Syntax::Es(get_es_config(true)),
    MediaType::TypeScript | MediaType::Mts | MediaType::Cts => {
      Syntax::Typescript(get_ts_config(false, false))
    }
    MediaType::Dts | MediaType::Dmts | MediaType::Dcts => {
      Syntax::Typescript(get_ts_config(false, true))
    }
    MediaType::Tsx => Syntax::Typescript(get_ts_config(true, false)),
    _ => Syntax::Es(get_es_config(false)),
  }
}

/// Gets the default `EsSyntax` used for the provided options.
pub fn get_es_config(jsx: bool) -> EsSyntax {
  EsSyntax {
    jsx,
    import_attributes: true,
    ..Default::default()
  }
}

/// Gets the default `TsSyntax` used for the provided options.
pub fn get_ts_config(tsx: bool, dts: bool) -> TsSyntax {
  TsSyntax {
    tsx,
    dts,
    decorators: true,
    no_early_errors: true,
    ..Default::default()
  }
}

/// Wraps the statements of a script in a module so every unit can be
/// handled through the same tree shape.
pub(crate) fn script_to_module(script: Script) -> Module {
  Module {
    span: script.span,
    body: script
      .body
      .into_iter()
      .map(crate::swc::ast::ModuleItem::Stmt)
      .collect(),
    shebang: script.shebang,
  }
}
