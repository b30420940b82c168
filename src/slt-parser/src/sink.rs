// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Where the parser reports progress.

use tracing::{debug, info, trace};

/// Receives progress messages from the parser.
///
/// `verbosity` is the level of detail the message belongs to: 0 is always of
/// interest, higher numbers are progressively chattier. The parser reports
/// every accepted operation at verbosity 2.
pub trait MessageSink {
    fn message(&self, message: &str, verbosity: usize);
}

impl<F> MessageSink for F
where
    F: Fn(&str, usize),
{
    fn message(&self, message: &str, verbosity: usize) {
        self(message, verbosity)
    }
}

/// Forwards messages to `tracing`, mapping verbosity to event level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl MessageSink for TracingSink {
    fn message(&self, message: &str, verbosity: usize) {
        match verbosity {
            0 => info!("{}", message),
            1 => debug!("{}", message),
            _ => trace!("{}", message),
        }
    }
}
