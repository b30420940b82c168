// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! A parser for [sqllogictest] files.
//!
//! Parsing turns a file into a list of [`TestOperation`]s: statements to run
//! and queries whose output is checked against either literal values or a
//! digest. Executing the operations is left to the caller.
//!
//! [sqllogictest]: https://www.sqlite.org/sqllogictest/doc/trunk/about.wiki

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

pub mod ast;
pub mod cursor;
pub mod error;
pub mod parser;
pub mod policy;
pub mod sink;
pub mod util;

pub use crate::ast::{ColumnType, ExpectedResult, OutputDescription, SortOrder, TestOperation};
pub use crate::error::{ParseError, ParseErrorKind};
pub use crate::parser::{ParseConfig, SltTestFile};
pub use crate::policy::{DirectivePolicy, Directives, PostgresPolicy};
pub use crate::sink::{MessageSink, TracingSink};

/// Returns every regular file at or below `root`, in a stable order.
pub fn walk_test_files(root: &Path) -> impl Iterator<Item = Result<PathBuf, ParseError>> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_file() => Some(Ok(entry.into_path())),
            Ok(_) => None,
            Err(err) => {
                let path = err
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                Some(Err(ParseError::new(
                    path,
                    0,
                    ParseErrorKind::Io,
                    format!("reading directory entry: {}", err),
                )))
            }
        })
}

/// Parses every file at or below each of `roots`.
///
/// Each file is parsed independently, so a failure in one file does not
/// prevent the others from being parsed.
pub fn parse_files<'a, I, P>(
    roots: I,
    config: &'a ParseConfig<'a>,
) -> impl Iterator<Item = (PathBuf, Result<SltTestFile, ParseError>)> + 'a
where
    I: IntoIterator<Item = P>,
    I::IntoIter: 'a,
    P: AsRef<Path> + 'a,
{
    roots
        .into_iter()
        .flat_map(|root| walk_test_files(root.as_ref()).collect::<Vec<_>>())
        .map(move |entry| match entry {
            Ok(path) => {
                let result = SltTestFile::open(&path, config);
                (path, result)
            }
            Err(err) => (PathBuf::from(&err.file), Err(err)),
        })
}
