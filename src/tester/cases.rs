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
use chrono::Utc;
use reqwest::StatusCode;
use serde_json::Value;

use super::client::{object_keys, string_field, ApiClient};
use super::fixtures::{
    CheckoutRequest, ConsultationRequest, Fixtures, LoginRequest, MembershipGrant,
};
use super::store::{MembershipStore, MongoMembershipStore};
use super::types::{Case, Outcome, RunState, SuiteConfig};

pub const EXPECTED_CATEGORIES: [&str; 5] = ["caninos", "felinos", "aves", "reptiles", "exoticos"];
pub const EXPECTED_PACKAGES: [&str; 3] = ["basic", "professional", "premium"];

/// Substring of the 403 detail returned when a consultation needs a membership
pub const MEMBERSHIP_REQUIRED: &str = "Membresía requerida";

const CHECKOUT_PACKAGE: &str = "basic";
const GATED_CATEGORY: &str = "caninos";
const ANALYSIS_CATEGORY: &str = "pequeñas";

/// Everything a case may read or update
pub struct CaseContext {
    pub config: SuiteConfig,
    pub fixtures: Fixtures,
    pub state: RunState,
    store: Option<Box<dyn MembershipStore>>,
}

impl CaseContext {
    pub fn new(config: SuiteConfig, fixtures: Fixtures) -> Self {
        CaseContext {
            config,
            fixtures,
            state: RunState::default(),
            store: None,
        }
    }

    /// Use `store` instead of connecting to MongoDB.
    pub fn with_store(mut self, store: Box<dyn MembershipStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// The injected store, or a MongoDB store connected on first use
    async fn membership_store(&mut self) -> Result<&dyn MembershipStore> {
        let store: Box<dyn MembershipStore> = match self.store.take() {
            Some(store) => store,
            None => Box::new(
                MongoMembershipStore::connect(&self.config.mongo_url, &self.config.db_name)
                    .await?,
            ),
        };
        Ok(&**self.store.insert(store))
    }
}

/// Run a single case to completion.
pub async fn execute(case: Case, ctx: &mut CaseContext, api: &ApiClient) -> Result<Outcome> {
    match case {
        Case::HealthCheck => health_check(api).await,
        Case::Registration => register_veterinarian(ctx, api).await,
        Case::Login => login_veterinarian(ctx, api).await,
        Case::InvalidLogin => invalid_login(api).await,
        Case::AnimalCategories => animal_categories(api).await,
        Case::MembershipPackages => membership_packages(api).await,
        Case::CheckoutSession => create_checkout_session(ctx, api).await,
        Case::CheckoutStatus => checkout_status(ctx, api).await,
        Case::CreateConsultation => create_consultation(ctx, api).await,
        Case::ConsultationHistory => consultation_history(ctx, api).await,
        Case::LlmAnalysis => llm_analysis(ctx, api).await,
        Case::Persistence => verify_persistence(ctx, api).await,
    }
}

async fn health_check(api: &ApiClient) -> Result<Outcome> {
    let resp = api.get("animal-categories").await?;
    if !resp.is_ok() {
        return Ok(Outcome::failed(format!("HTTP {}", resp.status.as_u16())));
    }

    let data = resp.json()?;
    if data.get("categories").is_some() {
        Ok(Outcome::passed("Backend API is accessible and responding"))
    } else {
        Ok(Outcome::failed(format!("Unexpected response: {data}")))
    }
}

async fn register_veterinarian(ctx: &mut CaseContext, api: &ApiClient) -> Result<Outcome> {
    let resp = api.post_json("auth/register", &ctx.fixtures.vet).await?;
    if !resp.is_ok() {
        return Ok(Outcome::failed(resp.describe()));
    }

    let data = resp.json()?;
    ctx.state.vet_id = string_field(&data, "id");

    // The license is stored hashed, so only the email can be compared
    let email_matches =
        data.get("email").and_then(Value::as_str) == Some(ctx.fixtures.vet.email.as_str());
    match &ctx.state.vet_id {
        Some(id) if email_matches => Ok(Outcome::passed(format!("Registered vet ID: {id}"))),
        _ => Ok(Outcome::failed(format!("Invalid response data: {data}"))),
    }
}

async fn login_veterinarian(ctx: &mut CaseContext, api: &ApiClient) -> Result<Outcome> {
    let Some(vet_id) = ctx.state.vet_id.clone() else {
        return Ok(Outcome::failed("No registered vet to test login"));
    };

    let resp = api
        .post_json("auth/login", &ctx.fixtures.vet.credentials())
        .await?;
    if !resp.is_ok() {
        return Ok(Outcome::failed(resp.describe()));
    }

    let data = resp.json()?;
    match string_field(&data, "id") {
        Some(id) if id == vet_id => Ok(Outcome::passed("Login successful")),
        other => Ok(Outcome::failed(format!(
            "ID mismatch: expected {vet_id}, got {}",
            other.as_deref().unwrap_or("none")
        ))),
    }
}

async fn invalid_login(api: &ApiClient) -> Result<Outcome> {
    let resp = api
        .post_json("auth/login", &LoginRequest::fabricated())
        .await?;
    if resp.status == StatusCode::UNAUTHORIZED {
        Ok(Outcome::passed("Correctly rejected invalid credentials"))
    } else {
        Ok(Outcome::failed(format!(
            "Expected 401, got {}",
            resp.status.as_u16()
        )))
    }
}

async fn animal_categories(api: &ApiClient) -> Result<Outcome> {
    let resp = api.get("animal-categories").await?;
    if !resp.is_ok() {
        return Ok(Outcome::failed(format!("HTTP {}", resp.status.as_u16())));
    }

    let data = resp.json()?;
    let categories = object_keys(&data, "categories");
    if EXPECTED_CATEGORIES.iter().all(|c| categories.contains(c)) {
        Ok(Outcome::passed(format!(
            "Retrieved {} categories",
            categories.len()
        )))
    } else {
        Ok(Outcome::failed(format!(
            "Missing categories. Got: {categories:?}"
        )))
    }
}

async fn membership_packages(api: &ApiClient) -> Result<Outcome> {
    let resp = api.get("membership/packages").await?;
    if !resp.is_ok() {
        return Ok(Outcome::failed(format!("HTTP {}", resp.status.as_u16())));
    }

    let data = resp.json()?;
    let packages = object_keys(&data, "packages");
    if EXPECTED_PACKAGES.iter().all(|p| packages.contains(p)) {
        Ok(Outcome::passed(format!("Retrieved {} packages", packages.len())))
    } else {
        Ok(Outcome::failed(format!("Missing packages. Got: {packages:?}")))
    }
}

async fn create_checkout_session(ctx: &mut CaseContext, api: &ApiClient) -> Result<Outcome> {
    if !ctx.config.payments_enabled {
        return Ok(Outcome::skipped("STRIPE_API_KEY not set"));
    }

    let request = CheckoutRequest {
        package_id: CHECKOUT_PACKAGE,
        origin_url: &ctx.config.base_url,
    };
    let resp = api.post_json("payments/checkout/session", &request).await?;
    if !resp.is_ok() {
        return Ok(Outcome::failed(resp.describe()));
    }

    let data = resp.json()?;
    ctx.state.checkout_session_id = string_field(&data, "session_id");
    let checkout_url = string_field(&data, "checkout_url");

    match (&ctx.state.checkout_session_id, checkout_url) {
        (Some(session_id), Some(_)) => Ok(Outcome::passed(format!("Session ID: {session_id}"))),
        _ => Ok(Outcome::failed(format!("Missing session data: {data}"))),
    }
}

async fn checkout_status(ctx: &mut CaseContext, api: &ApiClient) -> Result<Outcome> {
    if !ctx.config.payments_enabled {
        return Ok(Outcome::skipped("STRIPE_API_KEY not set"));
    }
    let Some(session_id) = ctx.state.checkout_session_id.as_deref() else {
        return Ok(Outcome::failed("No session ID to check"));
    };

    let resp = api
        .get(&format!("payments/checkout/status/{session_id}"))
        .await?;
    if !resp.is_ok() {
        return Ok(Outcome::failed(resp.describe()));
    }

    let data = resp.json()?;
    match (
        string_field(&data, "status"),
        string_field(&data, "payment_status"),
    ) {
        (Some(status), Some(payment_status)) => Ok(Outcome::passed(format!(
            "Status: {status}, Payment: {payment_status}"
        ))),
        _ => Ok(Outcome::failed(format!("Missing status data: {data}"))),
    }
}

/// The professional has no membership yet, so either a created consultation
/// or the gated 403 is acceptable.
async fn create_consultation(ctx: &mut CaseContext, api: &ApiClient) -> Result<Outcome> {
    let Some(vet_id) = ctx.state.vet_id.as_deref() else {
        return Ok(Outcome::failed("No vet ID available"));
    };

    let request = ConsultationRequest {
        veterinarian_id: vet_id,
        category: GATED_CATEGORY,
        consultation_data: &ctx.fixtures.consultation,
    };
    let resp = api.post_json("consultations", &request).await?;

    match resp.status {
        StatusCode::OK => {
            let data = resp.json()?;
            ctx.state.consultation_id = string_field(&data, "id");
            Ok(Outcome::passed(format!(
                "Consultation ID: {}",
                ctx.state.consultation_id.as_deref().unwrap_or("none")
            )))
        }
        StatusCode::FORBIDDEN => {
            let data = resp.json()?;
            let detail = data.get("detail").and_then(Value::as_str).unwrap_or_default();
            if detail.contains(MEMBERSHIP_REQUIRED) {
                Ok(Outcome::passed("Correctly requires membership"))
            } else {
                Ok(Outcome::failed(format!("Unexpected 403 error: {data}")))
            }
        }
        _ => Ok(Outcome::failed(resp.describe())),
    }
}

async fn consultation_history(ctx: &mut CaseContext, api: &ApiClient) -> Result<Outcome> {
    let Some(vet_id) = ctx.state.vet_id.as_deref() else {
        return Ok(Outcome::failed("No vet ID available"));
    };

    let resp = api.get(&format!("consultations/{vet_id}/history")).await?;
    if !resp.is_ok() {
        return Ok(Outcome::failed(resp.describe()));
    }

    let data = resp.json()?;
    let count = data
        .get("consultations")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    Ok(Outcome::passed(format!("Retrieved {count} consultations")))
}

/// Activate a membership straight in the store, then create a consultation
/// and have it analysed.
async fn llm_analysis(ctx: &mut CaseContext, api: &ApiClient) -> Result<Outcome> {
    if !ctx.config.llm_enabled {
        return Ok(Outcome::skipped(
            "Neither ANTHROPIC_API_KEY nor OPENAI_API_KEY set",
        ));
    }
    let Some(vet_id) = ctx.state.vet_id.clone() else {
        return Ok(Outcome::failed("No vet ID available"));
    };

    let grant = MembershipGrant::basic(Utc::now());
    let matched = ctx.membership_store().await?.activate(&vet_id, &grant).await?;
    if matched == 0 {
        return Ok(Outcome::failed("Failed to update veterinarian membership"));
    }

    let request = ConsultationRequest {
        veterinarian_id: &vet_id,
        category: ANALYSIS_CATEGORY,
        consultation_data: &ctx.fixtures.consultation,
    };
    let resp = api.post_json("consultations", &request).await?;
    if !resp.is_ok() {
        return Ok(Outcome::failed(format!(
            "Consultation creation failed {}: {}",
            resp.status.as_u16(),
            resp.body
        )));
    }

    let Some(consultation_id) = string_field(&resp.json()?, "id") else {
        return Ok(Outcome::failed("No consultation ID returned"));
    };
    ctx.state.consultation_id = Some(consultation_id.clone());

    let resp = api
        .post_json(
            &format!("consultations/{consultation_id}/analyze"),
            &ctx.fixtures.observations,
        )
        .await?;
    if !resp.is_ok() {
        return Ok(Outcome::failed(format!(
            "Analysis failed {}: {}",
            resp.status.as_u16(),
            resp.body
        )));
    }

    let data = resp.json()?;
    let has_analysis = data
        .get("analysis")
        .and_then(Value::as_str)
        .is_some_and(|text| !text.is_empty());
    if has_analysis && data.get("consultation_id").is_some() {
        Ok(Outcome::passed("Consultation analysis completed successfully"))
    } else {
        Ok(Outcome::failed(format!("Invalid analysis response: {data}")))
    }
}

async fn verify_persistence(ctx: &mut CaseContext, api: &ApiClient) -> Result<Outcome> {
    let Some(vet_id) = ctx.state.vet_id.as_deref() else {
        return Ok(Outcome::failed("No vet ID to verify"));
    };

    let resp = api.get(&format!("veterinarians/{vet_id}")).await?;
    if !resp.is_ok() {
        return Ok(Outcome::failed(resp.describe()));
    }

    let data = resp.json()?;
    let vet = &ctx.fixtures.vet;
    let email_matches = data.get("email").and_then(Value::as_str) == Some(vet.email.as_str());
    let name_matches = data.get("nombre").and_then(Value::as_str) == Some(vet.name.as_str());

    if email_matches && name_matches {
        Ok(Outcome::passed(
            "Veterinarian data correctly stored and retrieved",
        ))
    } else {
        Ok(Outcome::failed("Data mismatch in stored veterinarian"))
    }
}
