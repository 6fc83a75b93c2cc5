//! vetmed-e2e runs an end-to-end test suite against the VetMed Pro HTTP API.
//!
//! It registers a veterinarian, logs in, reads reference data, drives the
//! checkout flow, creates and analyses a consultation, and reads the
//! professional back. Every case is recorded as passed, failed or skipped,
//! and the process exit code tells CI whether anything failed.

// Copyright (c) 2025 Stephen Harrison
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use anyhow::Result;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

pub mod args;
pub mod tester;

#[cfg(test)]
pub mod tests;

pub use args::Args;
use tester::{Results, SuiteConfig, SuiteRunner};

/// Install the log subscriber. Records go to stderr so they never interleave
/// with the report on stdout. `RUST_LOG` overrides the default `warn` level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber may already be installed when the library is driven from tests
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Print the closing verdict line.
pub fn print_verdict<W: Write>(w: &mut W, results: &Results) -> io::Result<()> {
    if results.all_passed() {
        writeln!(w, "\n[SUCCESS] All tests passed!")
    } else {
        writeln!(w, "\n[WARNING] Some tests failed!")
    }
}

pub async fn run(args: Args) -> Result<Results> {
    let config = SuiteConfig::from_args(&args)?;

    let mut runner = SuiteRunner::new(config);
    runner.run().await?;
    let (results, mut out) = runner.into_parts();

    print_verdict(&mut out, &results)?;
    Ok(results)
}
