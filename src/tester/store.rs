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

//! Direct access to the backend's store.
//!
//! The analysis case needs a professional with an active membership. Going
//! through the payment provider is not possible in a test run, so the suite
//! writes the membership fields itself, the same way the payment webhook
//! would after a successful checkout.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use mongodb::bson::{doc, Document};
use mongodb::Client;

use super::fixtures::MembershipGrant;

pub const VETERINARIANS_COLLECTION: &str = "veterinarians";

#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Apply `grant` to the professional with id `vet_id` and return how many
    /// records matched. Zero means the professional does not exist.
    async fn activate(&self, vet_id: &str, grant: &MembershipGrant) -> Result<u64>;
}

/// The `$set` update the payment webhook applies after a successful checkout.
/// The expiry is written as an RFC 3339 string, which is what the service reads.
pub fn membership_update(grant: &MembershipGrant) -> Document {
    doc! {
        "$set": {
            "membership_type": grant.membership_type.as_str(),
            "consultations_remaining": grant.consultations_remaining,
            "membership_expires": grant.membership_expires.to_rfc3339(),
        }
    }
}

/// Membership store backed by the service's MongoDB database
pub struct MongoMembershipStore {
    client: Client,
    db_name: String,
}

impl MongoMembershipStore {
    pub async fn connect(mongo_url: &str, db_name: &str) -> Result<Self> {
        let client = Client::with_uri_str(mongo_url)
            .await
            .context("Failed to create MongoDB client")?;
        debug!("MongoDB client ready for database {db_name}");
        Ok(MongoMembershipStore {
            client,
            db_name: db_name.to_string(),
        })
    }
}

#[async_trait]
impl MembershipStore for MongoMembershipStore {
    async fn activate(&self, vet_id: &str, grant: &MembershipGrant) -> Result<u64> {
        let veterinarians = self
            .client
            .database(&self.db_name)
            .collection::<Document>(VETERINARIANS_COLLECTION);

        let result = veterinarians
            .update_one(doc! { "id": vet_id }, membership_update(grant))
            .await
            .with_context(|| format!("Failed to update membership for veterinarian {vet_id}"))?;

        debug!(
            "Membership update for {vet_id}: matched {}, modified {}",
            result.matched_count, result.modified_count
        );
        Ok(result.matched_count)
    }
}
