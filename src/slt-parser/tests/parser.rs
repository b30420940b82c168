// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fs;
use std::path::Path;

use slt_parser::{
    ColumnType, ExpectedResult, OutputDescription, ParseConfig, ParseErrorKind, SltTestFile,
    SortOrder, TestOperation,
};

fn parse(input: &str) -> SltTestFile {
    SltTestFile::parse_str("input.test", input, &ParseConfig::default()).unwrap()
}

fn statement(sql: &str, expect_success: bool) -> TestOperation {
    TestOperation::Statement {
        sql: sql.into(),
        expect_success,
    }
}

fn query(
    sql: &str,
    source_line: usize,
    column_types: Vec<ColumnType>,
    sort_order: SortOrder,
    expected: ExpectedResult,
    label: Option<&str>,
) -> TestOperation {
    TestOperation::Query {
        sql: sql.into(),
        source_line,
        output: OutputDescription {
            column_types,
            sort_order,
            expected,
        },
        label: label.map(Into::into),
    }
}

fn literal(lines: &[&str]) -> ExpectedResult {
    ExpectedResult::Literal(lines.iter().map(|s| s.to_string()).collect())
}

#[test]
fn test_parser() {
    struct TestCase {
        input: &'static str,
        output: Vec<TestOperation>,
    }

    let test_cases = vec![
        TestCase {
            input: "statement ok
SELECT 1",
            output: vec![statement("SELECT 1", true)],
        },
        TestCase {
            input: "statement error
SELECT blargh",
            output: vec![statement("SELECT blargh", false)],
        },
        TestCase {
            input: "statement count 7
SELECT 1",
            output: vec![statement("SELECT 1", false)],
        },
        TestCase {
            // Continuation lines are joined without a separator.
            input: "statement ok
INSERT INTO t1
VALUES(1)

statement ok
SELECT 2
",
            output: vec![
                statement("INSERT INTO t1VALUES(1)", true),
                statement("SELECT 2", true),
            ],
        },
        TestCase {
            input: "# leading comment
statement ok # trailing comment
SELECT 1 # another

# between records
statement ok
SELECT 2",
            output: vec![statement("SELECT 1", true), statement("SELECT 2", true)],
        },
        TestCase {
            input: "halt

statement ok
SELECT disappear",
            output: vec![],
        },
        TestCase {
            input: "skipif postgresql
statement ok
SELECT not_postgresql

onlyif postgresql
statement ok
SELECT only_postgresql

statement ok
SELECT everybody

skipif bloop
skipif blorp
statement ok
SELECT multiskip_not_us

skipif bloop
skipif postgresql
skipif blorp
statement ok
SELECT multiskip_including_us

onlyif postgresql
halt

statement ok
SELECT disappear",
            output: vec![
                statement("SELECT only_postgresql", true),
                statement("SELECT everybody", true),
                statement("SELECT multiskip_not_us", true),
            ],
        },
        TestCase {
            input: "onlyif mysql
halt

statement ok
SELECT survives_halt",
            output: vec![statement("SELECT survives_halt", true)],
        },
        TestCase {
            input: "query IT rowsort label-1
SELECT a, b
  FROM t1
----
1
one
2
two

statement ok
DROP TABLE t1",
            output: vec![
                query(
                    "SELECT a, b FROM t1",
                    4,
                    vec![ColumnType::Integer, ColumnType::Text],
                    SortOrder::RowSort,
                    literal(&["1", "one", "2", "two"]),
                    Some("label-1"),
                ),
                statement("DROP TABLE t1", true),
            ],
        },
        TestCase {
            input: "query R valuesort
SELECT 1.5
----
2 values hashing to abcd1234",
            output: vec![query(
                "SELECT 1.5",
                3,
                vec![ColumnType::Real],
                SortOrder::ValueSort,
                ExpectedResult::Digest {
                    value_count: 2,
                    digest: "abcd1234".into(),
                },
                None,
            )],
        },
        TestCase {
            input: "query I nosort
SELECT 1
----
1 values hashing to abc
# comments are skipped when looking for the separator

query I nosort
SELECT 2
----
",
            output: vec![
                query(
                    "SELECT 1",
                    3,
                    vec![ColumnType::Integer],
                    SortOrder::NoSort,
                    ExpectedResult::Digest {
                        value_count: 1,
                        digest: "abc".into(),
                    },
                    None,
                ),
                query(
                    "SELECT 2",
                    9,
                    vec![ColumnType::Integer],
                    SortOrder::NoSort,
                    literal(&[]),
                    None,
                ),
            ],
        },
        TestCase {
            input: "statement ok
# explain
CREATE TABLE t(a INT)

query I nosort
SELECT a
# from which table
FROM t
----
# expected rows
1
",
            output: vec![
                statement("CREATE TABLE t(a INT)", true),
                query(
                    "SELECT a FROM t",
                    9,
                    vec![ColumnType::Integer],
                    SortOrder::NoSort,
                    literal(&["1"]),
                    None,
                ),
            ],
        },
        TestCase {
            input: "hash-threshold eight

statement ok
SELECT 1

hash-threshold
statement ok
SELECT 2",
            output: vec![statement("SELECT 1", true), statement("SELECT 2", true)],
        },
        TestCase {
            // No delimiter before the end of the input.
            input: "query T nosort
SELECT 'a'
",
            output: vec![query(
                "SELECT 'a'",
                2,
                vec![ColumnType::Text],
                SortOrder::NoSort,
                literal(&[]),
                None,
            )],
        },
        TestCase {
            // A blank line straight after the delimiter means no rows.
            input: "query I nosort
SELECT 1 WHERE false
----

query B nosort
SELECT true
----
true
",
            output: vec![
                query(
                    "SELECT 1 WHERE false",
                    3,
                    vec![ColumnType::Integer],
                    SortOrder::NoSort,
                    literal(&[]),
                    None,
                ),
                query(
                    "SELECT true",
                    7,
                    vec![ColumnType::Bool],
                    SortOrder::NoSort,
                    literal(&["true"]),
                    None,
                ),
            ],
        },
        TestCase {
            input: "query T nosort
SELECT 'x'
----
x
# not a comment
",
            output: vec![query(
                "SELECT 'x'",
                3,
                vec![ColumnType::Text],
                SortOrder::NoSort,
                literal(&["x", "# not a comment"]),
                None,
            )],
        },
        TestCase {
            input: "skipif mysql

query I nosort
SELECT 1
----
1",
            output: vec![query(
                "SELECT 1",
                5,
                vec![ColumnType::Integer],
                SortOrder::NoSort,
                literal(&["1"]),
                None,
            )],
        },
    ];

    for tc in test_cases {
        let file = parse(tc.input);
        assert_eq!(file.operations, tc.output, "input:\n{}", tc.input);
        assert_eq!(
            file.test_count,
            tc.output.iter().filter(|op| op.is_query()).count()
        );
    }
}

#[test]
fn test_round_trip_example() {
    let file = parse(
        "hash-threshold 8

statement ok
CREATE TABLE t1(a INTEGER, b INTEGER)

query I nosort
SELECT a FROM t1 ORDER BY 1
----
30 values hashing to 3c13dee48d9356ae19af2515e05e6b54
",
    );
    assert_eq!(
        file,
        SltTestFile {
            name: "input.test".into(),
            operations: vec![
                statement("CREATE TABLE t1(a INTEGER, b INTEGER)", true),
                query(
                    "SELECT a FROM t1 ORDER BY 1",
                    8,
                    vec![ColumnType::Integer],
                    SortOrder::NoSort,
                    ExpectedResult::Digest {
                        value_count: 30,
                        digest: "3c13dee48d9356ae19af2515e05e6b54".into(),
                    },
                    None,
                ),
            ],
            test_count: 1,
            hash_threshold: Some(8),
            halted: false,
        }
    );
}

#[test]
fn test_hash_threshold() {
    assert_eq!(parse("hash-threshold 8\n").hash_threshold, Some(8));
    assert_eq!(parse("hash-threshold eight\n").hash_threshold, None);
    assert_eq!(parse("hash-threshold\n").hash_threshold, None);
    assert_eq!(
        parse("hash-threshold 8\nhash-threshold 10\n").hash_threshold,
        Some(10)
    );
}

#[test]
fn test_halt() {
    let file = parse(
        "statement ok
SELECT before

halt

query I nosort
SELECT after
----
1
",
    );
    assert!(file.halted);
    assert_eq!(file.operations, vec![statement("SELECT before", true)]);
    assert_eq!(file.test_count, 0);
}

#[test]
fn test_errors_discard_everything() {
    let err = SltTestFile::parse_str(
        "broken.test",
        "statement ok
SELECT 1

query I nosort
SELECT 1
----
3 values hashing to abc
oops
",
        &ParseConfig::default(),
    )
    .unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::MissingSeparatorLine);
    assert_eq!(err.file, "broken.test");
    assert_eq!(err.line, 8);
}

fn testdata(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("testdata")
        .join(name)
}

#[test]
fn test_testdata_file() {
    let path = testdata("select1.test");
    let file = SltTestFile::open(&path, &ParseConfig::default()).unwrap();

    assert_eq!(file.hash_threshold, Some(8));
    assert!(file.halted);
    assert_eq!(file.test_count, 2);
    assert_eq!(file.operations.len(), 5);
    assert_eq!(
        file.operations[3],
        query(
            "SELECT CASE WHEN c>(SELECT avg(c) FROM t1) THEN a*2 ELSE b*10 END FROM t1 ORDER BY 1",
            18,
            vec![ColumnType::Integer],
            SortOrder::NoSort,
            ExpectedResult::Digest {
                value_count: 2,
                digest: "0bbd5c1bd0b9a4b8d3a4d5e8c8f0a1e2".into(),
            },
            None,
        )
    );
    assert_eq!(
        file.operations[4],
        query(
            "SELECT a, label FROM t1_labels WHERE b IS NOT NULL",
            32,
            vec![ColumnType::Integer, ColumnType::Text],
            SortOrder::RowSort,
            literal(&["107", "x#105"]),
            Some("label-pairs"),
        )
    );

    let contents = fs::read_to_string(&path).unwrap();
    let from_str =
        SltTestFile::parse_str(path.display().to_string(), &contents, &ParseConfig::default())
            .unwrap();
    assert_eq!(file, from_str);
}

#[test]
fn test_parse_files_continues_past_failures() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a_bad.test"), "query I\nSELECT 1\n").unwrap();
    fs::write(
        dir.path().join("b_good.test"),
        "statement ok\nCREATE TABLE t (a INT)\n",
    )
    .unwrap();
    fs::create_dir(dir.path().join("c_nested")).unwrap();
    fs::write(
        dir.path().join("c_nested").join("d.test"),
        "query I nosort\nSELECT 1\n----\n1\n",
    )
    .unwrap();

    let config = ParseConfig::default();
    let results: Vec<_> = slt_parser::parse_files([dir.path()], &config).collect();
    assert_eq!(results.len(), 3);

    assert_eq!(results[0].0, dir.path().join("a_bad.test"));
    let err = results[0].1.as_ref().unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::MalformedDirective);

    assert_eq!(results[1].0, dir.path().join("b_good.test"));
    assert_eq!(results[1].1.as_ref().unwrap().operations.len(), 1);

    let nested = results[2].1.as_ref().unwrap();
    assert_eq!(nested.test_count, 1);
}

#[test]
fn test_parse_single_file_path() {
    let path = testdata("select1.test");
    let paths: Vec<_> = slt_parser::walk_test_files(&path)
        .map(|p| p.unwrap())
        .collect();
    assert_eq!(paths, vec![path]);
}
