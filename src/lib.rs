// Copyright 2018-2024 the Deno authors. All rights reserved. MIT license.

#![deny(clippy::disallowed_methods)]
#![deny(clippy::disallowed_types)]

mod dependencies;
mod emit;
mod infer;
mod parsed_source;
mod parsing;
mod source_map;
mod transform;
mod types;

pub use dependencies::*;
pub use emit::*;
pub use infer::*;
pub use parsed_source::*;
pub use parsing::*;
pub use source_map::*;
pub use transform::*;
pub use types::*;

pub use deno_media_type::MediaType;

pub mod swc {
  pub use swc_atoms as atoms;
  pub use swc_common as common;
  pub use swc_ecma_ast as ast;
  pub use swc_ecma_codegen as codegen;
  pub use swc_ecma_parser as parser;
  pub mod transforms {
    pub use swc_ecma_transforms_base::resolver;
  }
  pub use swc_ecma_utils as utils;
  pub use swc_ecma_visit as visit;
}
