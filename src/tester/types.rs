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
use std::fmt;
use url::Url;

use crate::args::Args;

/// Configuration for a suite run
#[derive(Clone, Debug)]
pub struct SuiteConfig {
    /// Root URL of the service under test
    pub base_url: String,

    /// Timeout for each request in seconds (0 for the client default)
    pub timeout: u64,

    /// Whether a payment credential is configured
    pub payments_enabled: bool,

    /// Whether an LLM credential is configured
    pub llm_enabled: bool,

    /// MongoDB connection string for membership activation
    pub mongo_url: String,

    /// MongoDB database name
    pub db_name: String,
}

impl SuiteConfig {
    /// Build the configuration from parsed arguments. Only the presence of a
    /// credential matters; the values themselves are not kept.
    pub fn from_args(args: &Args) -> Result<Self> {
        let config = SuiteConfig {
            base_url: args.base_url.trim_end_matches('/').to_string(),
            timeout: args.timeout,
            payments_enabled: is_set(&args.stripe_api_key),
            llm_enabled: is_set(&args.anthropic_api_key) || is_set(&args.openai_api_key),
            mongo_url: args.mongo_url.clone(),
            db_name: args.db_name.clone(),
        };
        config.api_base()?;
        Ok(config)
    }

    /// The API root, always ending in `/api/` so relative joins stay under it.
    pub fn api_base(&self) -> Result<Url> {
        let root = format!("{}/", self.base_url.trim_end_matches('/'));
        Url::parse(&root)
            .with_context(|| format!("Invalid base URL: {}", self.base_url))?
            .join("api/")
            .context("Failed to derive API base URL")
    }
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// The cases of the suite, in execution order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Case {
    HealthCheck,
    Registration,
    Login,
    InvalidLogin,
    AnimalCategories,
    MembershipPackages,
    CheckoutSession,
    CheckoutStatus,
    CreateConsultation,
    ConsultationHistory,
    LlmAnalysis,
    Persistence,
}

impl Case {
    /// Later cases consume identifiers captured by earlier ones, so this order
    /// is fixed.
    pub const ALL: [Case; 12] = [
        Case::HealthCheck,
        Case::Registration,
        Case::Login,
        Case::InvalidLogin,
        Case::AnimalCategories,
        Case::MembershipPackages,
        Case::CheckoutSession,
        Case::CheckoutStatus,
        Case::CreateConsultation,
        Case::ConsultationHistory,
        Case::LlmAnalysis,
        Case::Persistence,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Case::HealthCheck => "Health Check",
            Case::Registration => "Veterinarian Registration",
            Case::Login => "Veterinarian Login",
            Case::InvalidLogin => "Invalid Login Test",
            Case::AnimalCategories => "Animal Categories",
            Case::MembershipPackages => "Membership Packages",
            Case::CheckoutSession => "Stripe Checkout Session",
            Case::CheckoutStatus => "Payment Status Check",
            Case::CreateConsultation => "Create Consultation",
            Case::ConsultationHistory => "Consultation History",
            Case::LlmAnalysis => "LLM Integration",
            Case::Persistence => "Database Persistence",
        }
    }
}

impl fmt::Display for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a case concluded, as opposed to an error raised while running it
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Passed(String),
    Failed(String),
    Skipped(String),
}

impl Outcome {
    pub fn passed(message: impl Into<String>) -> Self {
        Outcome::Passed(message.into())
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Outcome::Failed(message.into())
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Outcome::Skipped(reason.into())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaseStatus {
    Passed,
    Failed,
    Skipped,
}

impl CaseStatus {
    /// Skips count as passes for gating purposes.
    pub fn is_pass(&self) -> bool {
        !matches!(self, CaseStatus::Failed)
    }
}

/// The recorded result of a single case
#[derive(Clone, Debug)]
pub struct CaseResult {
    pub case: Case,
    pub status: CaseStatus,
    pub message: Option<String>,
    pub error: Option<String>,
    pub elapsed_ms: f64,
}

impl CaseResult {
    /// Convert the value returned by a case into a recordable result. An
    /// `Err` becomes a failure carrying the error text.
    pub fn from_outcome(case: Case, outcome: Result<Outcome>, elapsed_ms: f64) -> Self {
        let (status, message, error) = match outcome {
            Ok(Outcome::Passed(message)) => (CaseStatus::Passed, non_empty(message), None),
            Ok(Outcome::Failed(message)) => (CaseStatus::Failed, non_empty(message), None),
            Ok(Outcome::Skipped(reason)) => {
                (CaseStatus::Skipped, Some(format!("SKIPPED: {reason}")), None)
            }
            Err(e) => (CaseStatus::Failed, None, Some(format!("{e:#}"))),
        };

        CaseResult {
            case,
            status,
            message,
            error,
            elapsed_ms,
        }
    }
}

fn non_empty(message: String) -> Option<String> {
    if message.is_empty() {
        None
    } else {
        Some(message)
    }
}

/// Result accumulator for a suite run
#[derive(Debug, Default)]
pub struct Results {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
    pub cases: Vec<CaseResult>,
}

impl Results {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: CaseResult) {
        match result.status {
            CaseStatus::Passed => self.passed += 1,
            CaseStatus::Skipped => {
                self.passed += 1;
                self.skipped += 1;
            }
            CaseStatus::Failed => self.failed += 1,
        }

        if let Some(error) = &result.error {
            self.errors.push(format!("{}: {}", result.case, error));
        }

        self.cases.push(result);
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    /// Percentage of passing cases, 0 when nothing ran
    pub fn pass_rate(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.passed as f64 / self.total() as f64 * 100.0
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Process exit status: 0 when nothing failed, 1 otherwise
    pub fn exit_status(&self) -> u8 {
        if self.all_passed() {
            0
        } else {
            1
        }
    }
}

/// Identifiers captured from earlier responses and consumed by later cases
#[derive(Clone, Debug, Default)]
pub struct RunState {
    pub vet_id: Option<String>,
    pub consultation_id: Option<String>,
    pub checkout_session_id: Option<String>,
}
