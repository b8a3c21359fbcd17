// Copyright 2018-2024 the Deno authors. All rights reserved. MIT license.

use crate::swc::common::sync::Lrc;
use crate::swc::common::BytePos;
use crate::swc::common::FileName;
use crate::swc::common::SourceFile;
use crate::LineAndColumnDisplay;

/// Source map holding the text of the unit being transformed.
///
/// Spans in a parsed tree point into this map, which is what allows the
/// printer to produce a source map for the rewritten output.
#[derive(Clone, Default)]
pub struct SourceMap {
  inner: Lrc<crate::swc::common::SourceMap>,
}

impl SourceMap {
  pub fn single(file_name: impl Into<String>, source: String) -> Self {
    let map = Self::default();
    map.new_source_file(file_name, source);
    map
  }

  pub fn inner(&self) -> &Lrc<crate::swc::common::SourceMap> {
    &self.inner
  }

  pub fn new_source_file(
    &self,
    file_name: impl Into<String>,
    source: String,
  ) -> Lrc<SourceFile> {
    self
      .inner
      .new_source_file(Lrc::new(FileName::Custom(file_name.into())), source)
  }

  /// 1-indexed line and column of a position in the map.
  pub fn line_and_column_display(&self, pos: BytePos) -> LineAndColumnDisplay {
    let loc = self.inner.lookup_char_pos(pos);
    LineAndColumnDisplay {
      line_number: loc.line,
      column_number: loc.col_display + 1,
    }
  }
}
