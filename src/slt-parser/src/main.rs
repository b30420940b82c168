// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use slt_parser::util;
use slt_parser::{ParseConfig, ParseError, SltTestFile};

/// Parses sqllogictest scripts and reports what they contain.
#[derive(clap::Parser)]
struct Args {
    /// Increase verbosity.
    ///
    /// If specified once, print a summary for each source file.
    /// If specified twice, also list each accepted operation.
    /// If specified thrice, also trace the parser's progress.
    #[clap(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbosity: u8,
    /// Don't exit with a failing code if some files fail to parse.
    #[clap(long)]
    no_fail: bool,
    /// Print each parsed file as JSON.
    #[clap(long)]
    dump: bool,
    /// Save a JSON-formatted summary to FILE.
    #[clap(long, value_name = "FILE")]
    json_summary_file: Option<PathBuf>,
    /// Path to sqllogictest script to parse, or `-` for stdin.
    #[clap(value_name = "PATH", required = true)]
    paths: Vec<String>,
}

#[derive(Debug, Default, Serialize)]
struct Outcomes {
    files: usize,
    parse_failures: usize,
    statements: usize,
    queries: usize,
    halted: usize,
}

impl Outcomes {
    fn any_failed(&self) -> bool {
        self.parse_failures > 0
    }

    fn record(&mut self, file: &SltTestFile) {
        self.files += 1;
        self.queries += file.test_count;
        self.statements += file.operations.len() - file.test_count;
        if file.halted {
            self.halted += 1;
        }
    }
}

impl fmt::Display for Outcomes {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let status = if self.any_failed() {
            "FAIL!"
        } else {
            "SUCCESS!"
        };
        write!(
            f,
            "{} files={} parse-failure={} statements={} queries={} halted={}",
            status, self.files, self.parse_failures, self.statements, self.queries, self.halted,
        )
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbosity);

    match run(&args) {
        Ok(outcomes) => {
            if outcomes.any_failed() && !args.no_fail {
                process::exit(1);
            }
        }
        Err(err) => {
            eprintln!("error: {:#}", err);
            process::exit(2);
        }
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 | 1 => "warn",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("slt_parser={}", level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args) -> Result<Outcomes, anyhow::Error> {
    let config = ParseConfig::default();
    let mut outcomes = Outcomes::default();
    for path in &args.paths {
        if path == "-" {
            let result = SltTestFile::parse_reader("<stdin>", io::stdin().lock(), &config);
            report(args, &mut outcomes, result)?;
        } else {
            for (_, result) in slt_parser::parse_files([path], &config) {
                report(args, &mut outcomes, result)?;
            }
        }
    }

    println!("{}", outcomes);

    if let Some(filename) = &args.json_summary_file {
        let file = File::create(filename)
            .with_context(|| format!("creating {}", filename.display()))?;
        serde_json::to_writer(file, &outcomes).context("unable to write summary file")?;
    }
    Ok(outcomes)
}

fn report(
    args: &Args,
    outcomes: &mut Outcomes,
    result: Result<SltTestFile, ParseError>,
) -> Result<(), anyhow::Error> {
    let file = match result {
        Ok(file) => file,
        Err(err) => {
            eprintln!("error: parsing file: {}", err);
            outcomes.parse_failures += 1;
            return Ok(());
        }
    };
    outcomes.record(&file);

    let mut stdout = io::stdout().lock();
    if args.verbosity >= 1 {
        let summary = format!(
            "{}: statements={} queries={} hash-threshold={}{}",
            file.name,
            file.operations.len() - file.test_count,
            file.test_count,
            file.hash_threshold
                .map(|t| t.to_string())
                .unwrap_or_else(|| "none".into()),
            if file.halted { " (halted)" } else { "" },
        );
        writeln!(stdout, "{}", util::indent(&summary, 4))?;
    }
    if args.verbosity >= 2 {
        for operation in &file.operations {
            writeln!(stdout, "{}", util::indent(&operation.to_string(), 8))?;
        }
    }
    if args.dump {
        serde_json::to_writer_pretty(&mut stdout, &file)?;
        writeln!(stdout)?;
    }
    Ok(())
}
