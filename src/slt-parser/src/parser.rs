// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! A parser for sqllogictest files.
//!
//! The format is described at
//! <https://www.sqlite.org/sqllogictest/doc/trunk/about.wiki>. A file is a
//! sequence of records separated by blank lines:
//!
//! ```text
//! hash-threshold 8
//!
//! statement ok
//! CREATE TABLE t1(a INTEGER, b INTEGER)
//!
//! skipif mysql
//! query I nosort
//! SELECT a FROM t1 ORDER BY 1
//! ----
//! 30 values hashing to 3c13dee48d9356ae19af2515e05e6b54
//! ```
//!
//! Records may be preceded by any number of `skipif` and `onlyif` lines,
//! which are evaluated by a [`DirectivePolicy`] to decide whether the record
//! is kept. A `halt` record accepted by the policy ends the file.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::ast::{ColumnType, ExpectedResult, OutputDescription, SortOrder, TestOperation};
use crate::cursor::LineCursor;
use crate::error::{ParseError, ParseErrorKind};
use crate::policy::{DirectivePolicy, Directives, PostgresPolicy};
use crate::sink::{MessageSink, TracingSink};

const VALUES_HASHING_TO: &str = "values hashing to";
const QUERY_OUTPUT_DELIMITER: &str = "----";

/// Controls which records are kept and where progress is reported.
#[derive(Clone, Copy)]
pub struct ParseConfig<'a> {
    pub policy: &'a dyn DirectivePolicy,
    pub sink: &'a dyn MessageSink,
}

impl Default for ParseConfig<'static> {
    fn default() -> ParseConfig<'static> {
        ParseConfig {
            policy: &PostgresPolicy,
            sink: &TracingSink,
        }
    }
}

/// The parsed contents of one sqllogictest file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SltTestFile {
    /// The name the file was parsed under, used in error messages.
    pub name: String,
    /// The accepted statements and queries, in file order.
    pub operations: Vec<TestOperation>,
    /// The number of accepted queries.
    pub test_count: usize,
    /// The value of the last `hash-threshold` line, or `None` if there was no
    /// such line or its value is not a number.
    pub hash_threshold: Option<u64>,
    /// Whether an accepted `halt` stopped the parse before the end of the file.
    pub halted: bool,
}

impl SltTestFile {
    /// Parses the file at `path`.
    pub fn open(path: &Path, config: &ParseConfig) -> Result<SltTestFile, ParseError> {
        let name = path.display().to_string();
        let file = File::open(path)
            .map_err(|e| ParseError::new(name.clone(), 0, ParseErrorKind::Io, e.to_string()))?;
        SltTestFile::parse_reader(name, BufReader::new(file), config)
    }

    pub fn parse_str(
        name: impl Into<String>,
        input: &str,
        config: &ParseConfig,
    ) -> Result<SltTestFile, ParseError> {
        SltTestFile::parse_reader(name, input.as_bytes(), config)
    }

    pub fn parse_reader<R: BufRead>(
        name: impl Into<String>,
        reader: R,
        config: &ParseConfig,
    ) -> Result<SltTestFile, ParseError> {
        let mut parser = Parser {
            cursor: LineCursor::new(name, reader),
            policy: config.policy,
            sink: config.sink,
            operations: Vec::new(),
            test_count: 0,
            hash_threshold: None,
            halted: false,
        };
        parser.parse()?;
        let file = SltTestFile {
            name: parser.cursor.source().to_owned(),
            operations: parser.operations,
            test_count: parser.test_count,
            hash_threshold: parser.hash_threshold,
            halted: parser.halted,
        };
        debug!(
            file = %file.name,
            operations = file.operations.len(),
            tests = file.test_count,
            halted = file.halted,
            "parsed sqllogictest file"
        );
        Ok(file)
    }
}

impl fmt::Display for SltTestFile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}

struct Parser<'a, R> {
    cursor: LineCursor<R>,
    policy: &'a dyn DirectivePolicy,
    sink: &'a dyn MessageSink,
    operations: Vec<TestOperation>,
    test_count: usize,
    hash_threshold: Option<u64>,
    halted: bool,
}

impl<'a, R: BufRead> Parser<'a, R> {
    fn parse(&mut self) -> Result<(), ParseError> {
        loop {
            let line = self.cursor.next_line(true)?;
            if self.cursor.is_done() {
                return Ok(());
            }
            if line.is_empty() {
                continue;
            }
            if let Some(threshold) = line.strip_prefix("hash-threshold") {
                self.hash_threshold = threshold.trim().parse().ok();
                continue;
            }

            let (directives, line) = self.parse_directives(line)?;
            let accepted = directives.accepted_by(self.policy);

            if line.starts_with("halt") {
                if accepted {
                    self.halted = true;
                    return Ok(());
                }
                continue;
            }

            if line.starts_with("statement") {
                let statement = self.parse_statement(&line)?;
                if accepted {
                    self.add(statement);
                }
            } else {
                self.cursor.push_back(line)?;
                if let Some(query) = self.parse_query()? {
                    if accepted {
                        self.add(query);
                    }
                }
            }
        }
    }

    /// Collects the `skipif` and `onlyif` lines starting at `line`, returning
    /// them along with the first line that is neither.
    fn parse_directives(&mut self, mut line: String) -> Result<(Directives, String), ParseError> {
        let mut directives = Directives::default();
        loop {
            let (skip, condition) = if let Some(c) = line.strip_prefix("skipif") {
                (true, c.trim().to_owned())
            } else if let Some(c) = line.strip_prefix("onlyif") {
                (false, c.trim().to_owned())
            } else {
                break;
            };
            if skip {
                directives.skip.insert(condition);
            } else {
                directives.only.insert(condition);
            }
            line = self.cursor.next_line(false)?;
        }
        Ok((directives, line))
    }

    fn parse_statement(&mut self, header: &str) -> Result<TestOperation, ParseError> {
        let expect_success = header.starts_with("statement ok");
        let mut sql = String::new();
        let mut line = self.cursor.next_line(false)?;
        while !self.cursor.is_done() && !line.is_empty() {
            sql.push_str(&line);
            line = self.cursor.next_line(true)?;
        }
        Ok(TestOperation::Statement {
            sql,
            expect_success,
        })
    }

    /// Parses a query record. Returns `None` if the input ends before a
    /// query header is found.
    fn parse_query(&mut self) -> Result<Option<TestOperation>, ParseError> {
        let mut header = self.cursor.next_line(true)?;
        if self.cursor.is_done() {
            return Ok(None);
        }
        while header.is_empty() {
            header = self.cursor.next_line(false)?;
        }
        let (column_types, sort_order, label) = match header.strip_prefix("query") {
            Some(description) => parse_query_header(description)
                .map_err(|msg| self.cursor.error(ParseErrorKind::MalformedDirective, msg))?,
            None => {
                return Err(self.cursor.error(
                    ParseErrorKind::UnexpectedLine,
                    format!("unexpected line: '{}'", header),
                ));
            }
        };

        let mut sql = String::new();
        let mut line = self.cursor.next_line(false)?;
        while !self.cursor.is_done() && line != QUERY_OUTPUT_DELIMITER {
            sql.push(' ');
            sql.push_str(&line);
            line = self.cursor.next_line(true)?;
        }
        let source_line = self.cursor.line_no();

        let expected = if self.cursor.is_done() {
            ExpectedResult::Literal(Vec::new())
        } else {
            self.parse_expected_result()?
        };

        Ok(Some(TestOperation::Query {
            sql: sql.trim().to_owned(),
            source_line,
            output: OutputDescription {
                column_types,
                sort_order,
                expected,
            },
            label,
        }))
    }

    /// Parses whatever follows a query's `----` delimiter.
    fn parse_expected_result(&mut self) -> Result<ExpectedResult, ParseError> {
        let line = self.cursor.next_line(true)?;
        if self.cursor.is_done() {
            return Ok(ExpectedResult::Literal(Vec::new()));
        }

        if let Some(idx) = line.find(VALUES_HASHING_TO) {
            let count = line[..idx].trim_end();
            let value_count = count.parse().map_err(|_| {
                self.cursor.error(
                    ParseErrorKind::MalformedDirective,
                    format!("invalid value count '{}'", count),
                )
            })?;
            let digest = line[idx + VALUES_HASHING_TO.len()..].trim().to_owned();
            let separator = self.cursor.next_line(true)?;
            if !self.cursor.is_done() && !separator.is_empty() {
                return Err(self.cursor.error(
                    ParseErrorKind::MissingSeparatorLine,
                    format!("expected an empty line between tests: '{}'", separator),
                ));
            }
            return Ok(ExpectedResult::Digest {
                value_count,
                digest,
            });
        }

        // Result values are data, so only the first line (which may also be a
        // hash line) goes through comment handling.
        let mut lines = Vec::new();
        let mut line = line;
        while !line.is_empty() {
            lines.push(line);
            line = self.cursor.next_raw_line(true)?;
        }
        Ok(ExpectedResult::Literal(lines))
    }

    fn add(&mut self, operation: TestOperation) {
        self.sink
            .message(&format!("Operation added {}", operation), 2);
        if let TestOperation::Query { .. } = operation {
            self.test_count += 1;
        }
        self.operations.push(operation);
    }
}

/// Parses the part of a query header after the `query` keyword into its
/// column types, sort order and optional label.
fn parse_query_header(
    description: &str,
) -> Result<(Vec<ColumnType>, SortOrder, Option<String>), String> {
    let description = description.trim();
    if description.is_empty() {
        return Err("malformed query description: missing column types".into());
    }
    let (column_types, rest) = parse_column_types(description)?;
    let rest = rest.trim_start();
    if rest.is_empty() {
        return Err("malformed query description: missing sort order".into());
    }
    let (sort_order, rest) = parse_sort_order(rest)?;
    let label = rest.trim();
    let label = if label.is_empty() {
        None
    } else {
        Some(label.to_owned())
    };
    Ok((column_types, sort_order, label))
}

/// Splits `input` at the end of its first whitespace-delimited token.
fn split_token(input: &str) -> (&str, &str) {
    let end = input.find(char::is_whitespace).unwrap_or(input.len());
    input.split_at(end)
}

/// Parses one column type per character of the leading token of `input`.
fn parse_column_types(input: &str) -> Result<(Vec<ColumnType>, &str), String> {
    let (token, rest) = split_token(input);
    let column_types = token
        .chars()
        .map(|c| {
            ColumnType::from_char(c)
                .ok_or_else(|| format!("could not parse output column types: '{}'", token))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok((column_types, rest))
}

fn parse_sort_order(input: &str) -> Result<(SortOrder, &str), String> {
    let (token, rest) = split_token(input);
    let sort_order = match token {
        "nosort" => SortOrder::NoSort,
        "rowsort" => SortOrder::RowSort,
        "valuesort" => SortOrder::ValueSort,
        other => return Err(format!("did not understand sort order: '{}'", other)),
    };
    Ok((sort_order, rest))
}
