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

use crate::args::Args;
use crate::tester::SuiteConfig;
use clap::Parser;

fn parse(extra: &[&str]) -> Args {
    let mut argv = vec!["vetmed-e2e", "--base-url", "http://localhost:8000"];
    argv.extend_from_slice(extra);
    Args::try_parse_from(argv).unwrap()
}

fn without_credentials(mut args: Args) -> Args {
    args.stripe_api_key = None;
    args.anthropic_api_key = None;
    args.openai_api_key = None;
    args
}

#[test]
fn test_config_from_args() {
    let args = without_credentials(parse(&["-t", "30", "--db-name", "vet_ci"]));
    let config = SuiteConfig::from_args(&args).unwrap();

    assert_eq!(config.base_url, "http://localhost:8000");
    assert_eq!(config.timeout, 30);
    assert_eq!(config.db_name, "vet_ci");
    assert!(!config.payments_enabled);
    assert!(!config.llm_enabled);
}

#[test]
fn test_payment_credential_enables_payment_cases() {
    let mut args = without_credentials(parse(&[]));
    args.stripe_api_key = Some("sk_test_abc".to_string());
    let config = SuiteConfig::from_args(&args).unwrap();

    assert!(config.payments_enabled);
    assert!(!config.llm_enabled);
}

#[test]
fn test_either_llm_credential_enables_analysis() {
    let mut args = without_credentials(parse(&[]));
    args.anthropic_api_key = Some("sk-ant".to_string());
    assert!(SuiteConfig::from_args(&args).unwrap().llm_enabled);

    let mut args = without_credentials(parse(&[]));
    args.openai_api_key = Some("sk-openai".to_string());
    assert!(SuiteConfig::from_args(&args).unwrap().llm_enabled);
}

#[test]
fn test_blank_credentials_count_as_absent() {
    let mut args = without_credentials(parse(&[]));
    args.stripe_api_key = Some(String::new());
    args.anthropic_api_key = Some("   ".to_string());
    let config = SuiteConfig::from_args(&args).unwrap();

    assert!(!config.payments_enabled);
    assert!(!config.llm_enabled);
}

#[test]
fn test_api_base_is_under_api() {
    let args = without_credentials(parse(&[]));
    let config = SuiteConfig::from_args(&args).unwrap();

    assert_eq!(config.api_base().unwrap().as_str(), "http://localhost:8000/api/");
}

#[test]
fn test_api_base_keeps_path_prefix() {
    let mut args = without_credentials(parse(&[]));
    args.base_url = "https://example.com/vetmed/".to_string();
    let config = SuiteConfig::from_args(&args).unwrap();

    assert_eq!(config.base_url, "https://example.com/vetmed");
    assert_eq!(
        config.api_base().unwrap().as_str(),
        "https://example.com/vetmed/api/"
    );
}

#[test]
fn test_invalid_base_url_is_rejected() {
    let mut args = without_credentials(parse(&[]));
    args.base_url = "not a url".to_string();

    let err = SuiteConfig::from_args(&args).unwrap_err();
    assert!(err.to_string().contains("Invalid base URL"));
}
