// vetmed-e2e - End-to-end checks for the VetMed Pro HTTP API
//
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

use anyhow::{Context, Result};
use floating_duration::TimeAsFloat;
use log::{info, warn};
use std::{
    io::{self, Write},
    time::Instant,
};

use super::cases::{self, CaseContext};
use super::client::ApiClient;
use super::fixtures::Fixtures;
use super::store::MembershipStore;
use super::types::{Case, CaseResult, CaseStatus, Results, RunState, SuiteConfig};

const RULE_WIDTH: usize = 50;

/// Runs every case in order against one service and reports to `out`
pub struct SuiteRunner<W: Write> {
    ctx: CaseContext,
    results: Results,
    out: W,
}

impl SuiteRunner<io::Stdout> {
    /// Create a runner that reports to stdout with freshly generated fixtures
    pub fn new(config: SuiteConfig) -> Self {
        Self::with_writer(config, io::stdout())
    }
}

impl<W: Write> SuiteRunner<W> {
    pub fn with_writer(config: SuiteConfig, out: W) -> Self {
        SuiteRunner {
            ctx: CaseContext::new(config, Fixtures::generate()),
            results: Results::new(),
            out,
        }
    }

    /// Replace the MongoDB-backed membership store
    pub fn with_store(mut self, store: Box<dyn MembershipStore>) -> Self {
        self.ctx = self.ctx.with_store(store);
        self
    }

    pub fn fixtures(&self) -> &Fixtures {
        &self.ctx.fixtures
    }

    pub fn state(&self) -> &RunState {
        &self.ctx.state
    }

    pub fn results(&self) -> &Results {
        &self.results
    }

    pub fn into_parts(self) -> (Results, W) {
        (self.results, self.out)
    }

    /// Run the whole suite and print the summary.
    ///
    /// Case failures never abort the run; only a broken base URL, a client
    /// that cannot be built, or a failing writer end it early.
    pub async fn run(&mut self) -> Result<&Results> {
        let base_url = self.ctx.config.base_url.clone();
        info!("Starting suite against {base_url}");

        writeln!(self.out, "[TEST] VetMed Pro Backend Testing Suite")?;
        writeln!(self.out, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(self.out, "Testing against: {base_url}")?;
        writeln!(self.out)?;

        let api = ApiClient::connect(&self.ctx.config)?;
        let completed = self.run_cases(&api).await;
        api.close();
        completed.context("Failed to write case result")?;

        print_summary(&mut self.out, &self.results)?;
        info!(
            "Suite finished: {} passed, {} failed, {} skipped",
            self.results.passed, self.results.failed, self.results.skipped
        );
        Ok(&self.results)
    }

    async fn run_cases(&mut self, api: &ApiClient) -> io::Result<()> {
        for case in Case::ALL {
            self.run_case(case, api).await?;
        }
        Ok(())
    }

    /// Execute one case inside its failure boundary and record the result.
    async fn run_case(&mut self, case: Case, api: &ApiClient) -> io::Result<()> {
        let started = Instant::now();
        let outcome = cases::execute(case, &mut self.ctx, api).await;
        let result = CaseResult::from_outcome(case, outcome, started.elapsed().as_fractional_millis());

        match (&result.status, &result.error) {
            (_, Some(error)) => warn!("{case} raised an error: {error}"),
            (CaseStatus::Failed, None) => info!("{case} failed"),
            (status, None) => info!("{case}: {status:?}"),
        }

        write_case_result(&mut self.out, &result)?;
        self.results.record(result);
        Ok(())
    }
}

/// Print the status line of a case with its message and error, if any.
pub fn write_case_result<W: Write>(w: &mut W, result: &CaseResult) -> io::Result<()> {
    let tag = if result.status.is_pass() { "[PASS]" } else { "[FAIL]" };
    writeln!(w, "{tag}: {} ({:.1} ms)", result.case, result.elapsed_ms)?;
    if let Some(message) = &result.message {
        writeln!(w, "   {message}")?;
    }
    if let Some(error) = &result.error {
        writeln!(w, "   Error: {error}")?;
    }
    writeln!(w)
}

/// Print totals, the success rate and every recorded error.
pub fn print_summary<W: Write>(w: &mut W, results: &Results) -> io::Result<()> {
    writeln!(w, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(w, "[SUMMARY] TEST SUMMARY")?;
    writeln!(w, "[PASS] Passed: {}", results.passed)?;
    writeln!(w, "[FAIL] Failed: {}", results.failed)?;
    writeln!(w, "[SKIP] Skipped: {}", results.skipped)?;
    writeln!(w, "[RATE] Success Rate: {:.1}%", results.pass_rate())?;

    if !results.errors.is_empty() {
        writeln!(w, "\n[ERROR] ERRORS ENCOUNTERED:")?;
        for error in &results.errors {
            writeln!(w, "   • {error}")?;
        }
    }
    Ok(())
}
