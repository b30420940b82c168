// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

#![no_main]

use libfuzzer_sys::fuzz_target;
use slt_parser::{ParseConfig, PostgresPolicy, SltTestFile};

// We're just looking for crashes here, not Err
fuzz_target!(|data: &[u8]| {
    let sink = |_: &str, _: usize| {};
    let config = ParseConfig {
        policy: &PostgresPolicy,
        sink: &sink,
    };
    drop(SltTestFile::parse_reader("fuzz", data, &config));
});
