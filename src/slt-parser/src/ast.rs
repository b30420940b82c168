// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The operations a sqllogictest file parses into.

use std::fmt;

use serde::Serialize;

/// A single statement or query from a sqllogictest file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TestOperation {
    Statement {
        sql: String,
        /// Whether the statement is expected to succeed (`statement ok`).
        expect_success: bool,
    },
    Query {
        sql: String,
        /// The line at which the query's SQL text ended: the `----` delimiter,
        /// or the last line of the input if there is no delimiter.
        source_line: usize,
        output: OutputDescription,
        label: Option<String>,
    },
}

impl TestOperation {
    pub fn sql(&self) -> &str {
        match self {
            TestOperation::Statement { sql, .. } | TestOperation::Query { sql, .. } => sql,
        }
    }

    pub fn is_query(&self) -> bool {
        matches!(self, TestOperation::Query { .. })
    }
}

impl fmt::Display for TestOperation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TestOperation::Statement { expect_success, .. } => {
                let mode = if *expect_success { "ok" } else { "error" };
                write!(f, "statement {}", mode)?;
            }
            TestOperation::Query {
                source_line,
                output,
                label,
                ..
            } => {
                write!(f, "query {} at line {}", output, source_line)?;
                if let Some(label) = label {
                    write!(f, " [{}]", label)?;
                }
            }
        }
        write!(f, ": {}", self.sql())
    }
}

/// The type of one output column, as declared in a query header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnType {
    Integer,
    Text,
    Real,
    Bool,
    Oid,
}

impl ColumnType {
    pub fn from_char(c: char) -> Option<ColumnType> {
        match c {
            'I' => Some(ColumnType::Integer),
            'T' => Some(ColumnType::Text),
            'R' => Some(ColumnType::Real),
            'B' => Some(ColumnType::Bool),
            'O' => Some(ColumnType::Oid),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            ColumnType::Integer => 'I',
            ColumnType::Text => 'T',
            ColumnType::Real => 'R',
            ColumnType::Bool => 'B',
            ColumnType::Oid => 'O',
        }
    }
}

/// How a query's output must be ordered before it is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Compare the output in the order it was produced.
    NoSort,
    /// Sort rows before comparing.
    RowSort,
    /// Sort individual values before comparing.
    ValueSort,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::NoSort => "nosort",
            SortOrder::RowSort => "rowsort",
            SortOrder::ValueSort => "valuesort",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The output a query is expected to produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedResult {
    /// The expected values, one per line, in output order.
    Literal(Vec<String>),
    /// A count of values and a digest of them. The digest is opaque here;
    /// the executor recomputes it over the actual output.
    Digest { value_count: usize, digest: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputDescription {
    pub column_types: Vec<ColumnType>,
    pub sort_order: SortOrder,
    pub expected: ExpectedResult,
}

impl fmt::Display for OutputDescription {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for typ in &self.column_types {
            write!(f, "{}", typ.as_char())?;
        }
        write!(f, " {}", self.sort_order)?;
        match &self.expected {
            ExpectedResult::Literal(lines) => write!(f, " ({} lines)", lines.len()),
            ExpectedResult::Digest {
                value_count,
                digest,
            } => write!(f, " ({} values hashing to {})", value_count, digest),
        }
    }
}
