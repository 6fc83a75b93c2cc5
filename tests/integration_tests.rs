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

use assert_cmd::prelude::*;
use predicates::str::contains;
use std::net::TcpListener;
use std::process::Command;
use test_utils::MockServer;

const CREDENTIAL_VARS: [&str; 3] = ["STRIPE_API_KEY", "ANTHROPIC_API_KEY", "OPENAI_API_KEY"];

fn suite_command(base_url: &str) -> Command {
    let mut cmd = Command::cargo_bin("vetmed-e2e").unwrap();
    cmd.env("VETMED_BASE_URL", base_url).env("VETMED_TIMEOUT", "5");
    for var in CREDENTIAL_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_suite_exits_zero_when_all_cases_pass() {
    let server = MockServer::start().await;

    suite_command(&server.url())
        .assert()
        .success()
        .stdout(contains("Testing against: "))
        .stdout(contains("SKIPPED: STRIPE_API_KEY not set"))
        .stdout(contains("[FAIL] Failed: 0"))
        .stdout(contains("[SUCCESS] All tests passed!"));

    assert!(server.request_count() > 0);
}

#[test]
fn test_suite_exits_one_when_service_is_down() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    suite_command(&format!("http://127.0.0.1:{port}"))
        .assert()
        .code(1)
        .stdout(contains("[FAIL]: Health Check"))
        .stdout(contains("[ERROR] ERRORS ENCOUNTERED:"))
        .stdout(contains("[WARNING] Some tests failed!"));
}

#[test]
fn test_invalid_base_url_is_a_startup_error() {
    suite_command("not a url")
        .assert()
        .failure()
        .stderr(contains("Invalid base URL"));
}
