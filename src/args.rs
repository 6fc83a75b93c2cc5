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

use clap::Parser;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_MONGO_URL: &str = "mongodb://localhost:27017";
pub const DEFAULT_DB_NAME: &str = "savant_vet_db";

/// Every option can also be supplied through the environment, so running the
/// binary with no flags at all is the normal case in CI.
#[derive(Debug, Parser, Clone)]
#[command(
    author,
    version,
    about = "Run the VetMed Pro backend test suite against a live service"
)]
pub struct Args {
    /// Root URL of the service. The API lives under `<base-url>/api/`.
    #[arg(long, env = "VETMED_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Timeout for each request in seconds. Use 0 for the client default.
    #[arg(short = 't', long, env = "VETMED_TIMEOUT", default_value = "0")]
    pub timeout: u64,

    /// Payment provider key. Without it the checkout cases are skipped.
    #[arg(long, env = "STRIPE_API_KEY", hide_env_values = true)]
    pub stripe_api_key: Option<String>,

    /// LLM provider key. Either this or the OpenAI key enables the analysis case.
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub anthropic_api_key: Option<String>,

    /// LLM provider key. Either this or the Anthropic key enables the analysis case.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// MongoDB connection string used to activate a test membership.
    #[arg(long, env = "MONGO_URL", default_value = DEFAULT_MONGO_URL)]
    pub mongo_url: String,

    /// MongoDB database holding the `veterinarians` collection.
    #[arg(long, env = "DB_NAME", default_value = DEFAULT_DB_NAME)]
    pub db_name: String,
}
