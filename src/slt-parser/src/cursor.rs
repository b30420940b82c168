// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! A line-oriented reader with one line of pushback.

use std::io::{self, BufRead};

use crate::error::{ParseError, ParseErrorKind};

/// Reads a sqllogictest file one trimmed line at a time.
///
/// The cursor supports exactly one line of lookahead via
/// [`LineCursor::push_back`], which the file parser uses to decide between a
/// statement and a query before committing to either.
pub struct LineCursor<R> {
    lines: io::Lines<R>,
    source: String,
    line_no: usize,
    pushed_back: Option<String>,
    done: bool,
}

impl<R: BufRead> LineCursor<R> {
    pub fn new(source: impl Into<String>, reader: R) -> LineCursor<R> {
        LineCursor {
            lines: reader.lines(),
            source: source.into(),
            line_no: 0,
            pushed_back: None,
            done: false,
        }
    }

    /// The name of the source being read, used in error messages.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The number of lines read from the underlying reader so far.
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    /// Whether the underlying reader has been exhausted.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Returns the next line with any `#` comment removed.
    ///
    /// Lines consisting only of a comment are skipped. At the end of the
    /// input this returns an empty string if `allow_end` is set and fails with
    /// [`ParseErrorKind::PrematureEof`] otherwise.
    pub fn next_line(&mut self, allow_end: bool) -> Result<String, ParseError> {
        loop {
            let line = self.next_raw_line(allow_end)?;
            match line.find('#') {
                Some(0) => continue,
                Some(sharp) => return Ok(line[..sharp].trim_end().to_owned()),
                None => return Ok(line),
            }
        }
    }

    /// Like [`LineCursor::next_line`], but leaves `#` characters alone, so a
    /// comment-only line comes back as is.
    pub fn next_raw_line(&mut self, allow_end: bool) -> Result<String, ParseError> {
        if let Some(line) = self.pushed_back.take() {
            return Ok(line);
        }
        if !self.done {
            match self.lines.next() {
                Some(Ok(line)) => {
                    self.line_no += 1;
                    return Ok(line.trim().to_owned());
                }
                Some(Err(e)) => {
                    return Err(self.error(ParseErrorKind::Io, e.to_string()));
                }
                None => self.done = true,
            }
        }
        if allow_end {
            Ok(String::new())
        } else {
            Err(self.error(ParseErrorKind::PrematureEof, "test file ends prematurely"))
        }
    }

    /// Arranges for `line` to be returned by the next read.
    ///
    /// Only one line may be pending at a time.
    pub fn push_back(&mut self, line: String) -> Result<(), ParseError> {
        if self.pushed_back.is_some() {
            return Err(self.error(
                ParseErrorKind::PushbackOveruse,
                "only one undo allowed",
            ));
        }
        self.pushed_back = Some(line);
        Ok(())
    }

    /// Builds an error located at the cursor's current line.
    pub fn error(&self, kind: ParseErrorKind, message: impl Into<String>) -> ParseError {
        ParseError::new(self.source.clone(), self.line_no, kind, message)
    }
}
