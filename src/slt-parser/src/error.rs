// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Errors produced while parsing sqllogictest files.

use std::fmt;

use thiserror::Error;

/// The category of a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// The input ended where another line was required.
    PrematureEof,
    /// A `query` header is missing required tokens, or a header or digest
    /// line contains tokens that could not be understood.
    MalformedDirective,
    /// A non-blank line appeared where a `query` or `statement` was required.
    UnexpectedLine,
    /// A line was pushed back while another pushed-back line was still
    /// waiting to be read.
    PushbackOveruse,
    /// The line following a `values hashing to` line was not blank.
    MissingSeparatorLine,
    /// The underlying reader failed.
    Io,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            ParseErrorKind::PrematureEof => "premature end of file",
            ParseErrorKind::MalformedDirective => "malformed directive",
            ParseErrorKind::UnexpectedLine => "unexpected line",
            ParseErrorKind::PushbackOveruse => "pushback overuse",
            ParseErrorKind::MissingSeparatorLine => "missing separator line",
            ParseErrorKind::Io => "i/o error",
        })
    }
}

/// A fatal error encountered while parsing a sqllogictest file.
///
/// Parsing stops at the first error. The error records the name of the
/// source being parsed and the line the cursor had reached.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{file}:{line}: {kind}: {message}")]
pub struct ParseError {
    /// The name of the file (or stream) being parsed.
    pub file: String,
    /// The 1-based line number at which the error was detected.
    pub line: usize,
    pub kind: ParseErrorKind,
    pub message: String,
}

impl ParseError {
    pub fn new(
        file: impl Into<String>,
        line: usize,
        kind: ParseErrorKind,
        message: impl Into<String>,
    ) -> ParseError {
        ParseError {
            file: file.into(),
            line,
            kind,
            message: message.into(),
        }
    }
}
