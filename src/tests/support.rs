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

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use std::sync::{Arc, Mutex};
use test_utils::MembershipSwitch;

use crate::tester::{MembershipGrant, MembershipStore, SuiteConfig};

/// Configuration pointing at `base_url` with every integration disabled
pub fn test_config(base_url: &str) -> SuiteConfig {
    SuiteConfig {
        base_url: base_url.to_string(),
        timeout: 5,
        payments_enabled: false,
        llm_enabled: false,
        mongo_url: "mongodb://127.0.0.1:1".to_string(),
        db_name: "vetmed_e2e_test".to_string(),
    }
}

/// Membership store that writes through to the mock server and remembers
/// every activation it was asked for.
#[derive(Clone)]
pub struct InMemoryStore {
    switch: Option<MembershipSwitch>,
    pub activations: Arc<Mutex<Vec<(String, MembershipGrant)>>>,
}

impl InMemoryStore {
    pub fn backed_by(switch: MembershipSwitch) -> Self {
        InMemoryStore {
            switch: Some(switch),
            activations: Arc::default(),
        }
    }

    /// A store where no professional ever matches
    pub fn empty() -> Self {
        InMemoryStore {
            switch: None,
            activations: Arc::default(),
        }
    }
}

#[async_trait]
impl MembershipStore for InMemoryStore {
    async fn activate(&self, vet_id: &str, grant: &MembershipGrant) -> Result<u64> {
        self.activations
            .lock()
            .unwrap()
            .push((vet_id.to_string(), grant.clone()));

        let membership = json!({
            "membership_type": grant.membership_type,
            "consultations_remaining": grant.consultations_remaining,
            "membership_expires": grant.membership_expires.to_rfc3339(),
        });
        let matched = self
            .switch
            .as_ref()
            .is_some_and(|switch| switch.activate(vet_id, membership));
        Ok(u64::from(matched))
    }
}
