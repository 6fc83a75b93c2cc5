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

//! In-process stand-in for the VetMed Pro backend, used by the unit and
//! integration tests.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const MEMBERSHIP_REQUIRED_DETAIL: &str =
    "Membresía requerida para crear consultas. Adquiera un paquete.";

/// Knobs for making the mock misbehave
#[derive(Clone, Debug)]
pub struct MockBehavior {
    /// Answer 403 to consultation writes from professionals without a membership
    pub gate_consultations: bool,
    /// Detail sent with the gated 403
    pub forbidden_detail: String,
    /// Accept any credentials on login, echoing a fixed id
    pub accept_any_login: bool,
    /// Return a different name when a professional is read back
    pub corrupt_profile_reads: bool,
    /// Status for the analysis endpoint
    pub analysis_status: u16,
}

impl Default for MockBehavior {
    fn default() -> Self {
        MockBehavior {
            gate_consultations: true,
            forbidden_detail: MEMBERSHIP_REQUIRED_DETAIL.to_string(),
            accept_any_login: false,
            corrupt_profile_reads: false,
            analysis_status: 200,
        }
    }
}

#[derive(Default)]
struct Store {
    vets: HashMap<String, Value>,
    memberships: HashMap<String, Value>,
    consultations: Vec<Value>,
    sessions: Vec<String>,
}

struct ServerState {
    behavior: MockBehavior,
    request_count: AtomicUsize,
    next_id: AtomicUsize,
    store: Mutex<Store>,
}

impl ServerState {
    fn next_id(&self, prefix: &str) -> String {
        format!("{prefix}-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn hit(&self) {
        self.request_count.fetch_add(1, Ordering::SeqCst);
    }
}

type Shared = Arc<ServerState>;

pub struct MockServer {
    port: u16,
    state: Shared,
    server_task: Option<tokio::task::JoinHandle<()>>,
}

impl MockServer {
    pub async fn start() -> Self {
        Self::start_with(MockBehavior::default()).await
    }

    pub async fn start_with(behavior: MockBehavior) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let state = Arc::new(ServerState {
            behavior,
            request_count: AtomicUsize::new(0),
            next_id: AtomicUsize::new(0),
            store: Mutex::new(Store::default()),
        });

        let app = router(state.clone());
        let server_task = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        MockServer {
            port,
            state,
            server_task: Some(server_task),
        }
    }

    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn request_count(&self) -> usize {
        self.state.request_count.load(Ordering::SeqCst)
    }

    pub fn registered_vets(&self) -> usize {
        self.state.store.lock().unwrap().vets.len()
    }

    pub fn consultation_count(&self) -> usize {
        self.state.store.lock().unwrap().consultations.len()
    }

    /// Handle for writing memberships directly, bypassing the HTTP API
    pub fn membership_switch(&self) -> MembershipSwitch {
        MembershipSwitch {
            state: Arc::clone(&self.state),
        }
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(task) = self.server_task.take() {
            task.abort();
        }
    }
}

/// Direct write access to the mock's membership records
#[derive(Clone)]
pub struct MembershipSwitch {
    state: Shared,
}

impl MembershipSwitch {
    /// Store `membership` for `vet_id`. Returns false when no such
    /// professional is registered.
    pub fn activate(&self, vet_id: &str, membership: Value) -> bool {
        let mut store = self.state.store.lock().unwrap();
        if !store.vets.contains_key(vet_id) {
            return false;
        }
        store.memberships.insert(vet_id.to_string(), membership);
        true
    }

    pub fn membership(&self, vet_id: &str) -> Option<Value> {
        self.state.store.lock().unwrap().memberships.get(vet_id).cloned()
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/animal-categories", get(animal_categories))
        .route("/api/membership/packages", get(membership_packages))
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/payments/checkout/session", post(checkout_session))
        .route(
            "/api/payments/checkout/status/:session_id",
            get(checkout_status),
        )
        .route("/api/consultations", post(create_consultation))
        // Sibling routes must share the parameter name of the segment
        .route("/api/consultations/:id/history", get(history))
        .route("/api/consultations/:id/analyze", post(analyze))
        .route("/api/veterinarians/:vet_id", get(veterinarian))
        .with_state(state)
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

async fn animal_categories(State(state): State<Shared>) -> Response {
    state.hit();
    Json(json!({
        "categories": {
            "caninos": "Perros",
            "felinos": "Gatos",
            "aves": "Aves",
            "reptiles": "Reptiles",
            "exoticos": "Exóticos",
            "pequeñas": "Pequeñas especies",
        }
    }))
    .into_response()
}

async fn membership_packages(State(state): State<Shared>) -> Response {
    state.hit();
    Json(json!({
        "packages": {
            "basic": { "name": "Básico", "price": 299.0, "consultations": 10 },
            "professional": { "name": "Profesional", "price": 599.0, "consultations": 30 },
            "premium": { "name": "Premium", "price": 999.0, "consultations": 100 },
        }
    }))
    .into_response()
}

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    state.hit();
    let email = body.get("email").and_then(Value::as_str).unwrap_or_default();
    let license = body
        .get("cedula_profesional")
        .and_then(Value::as_str)
        .unwrap_or_default();

    if license.len() <= 6 || !license.chars().all(|c| c.is_ascii_digit()) {
        return detail(StatusCode::BAD_REQUEST, "Cédula profesional inválida");
    }

    let mut store = state.store.lock().unwrap();
    if store
        .vets
        .values()
        .any(|v| v.get("email").and_then(Value::as_str) == Some(email))
    {
        return detail(StatusCode::BAD_REQUEST, "Email ya registrado");
    }

    let id = state.next_id("vet");
    let mut vet = body.clone();
    vet["id"] = json!(id);
    store.vets.insert(id, vet.clone());
    Json(vet).into_response()
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    state.hit();
    if state.behavior.accept_any_login {
        return Json(json!({ "id": "vet-any" })).into_response();
    }

    let store = state.store.lock().unwrap();
    let found = store.vets.values().find(|v| {
        v.get("email") == body.get("email")
            && v.get("cedula_profesional") == body.get("cedula_profesional")
    });
    match found {
        Some(vet) => Json(vet.clone()).into_response(),
        None => detail(StatusCode::UNAUTHORIZED, "Credenciales inválidas"),
    }
}

async fn checkout_session(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    state.hit();
    if body.get("package_id").and_then(Value::as_str).is_none() {
        return detail(StatusCode::BAD_REQUEST, "Paquete inválido");
    }

    let session_id = state.next_id("cs_test");
    state
        .store
        .lock()
        .unwrap()
        .sessions
        .push(session_id.clone());
    Json(json!({
        "session_id": session_id,
        "checkout_url": format!("https://checkout.stripe.test/pay/{session_id}"),
    }))
    .into_response()
}

async fn checkout_status(
    State(state): State<Shared>,
    Path(session_id): Path<String>,
) -> Response {
    state.hit();
    if !state.store.lock().unwrap().sessions.contains(&session_id) {
        return detail(StatusCode::NOT_FOUND, "Sesión no encontrada");
    }
    Json(json!({
        "status": "open",
        "payment_status": "unpaid",
        "amount_total": 29900,
        "currency": "mxn",
    }))
    .into_response()
}

async fn create_consultation(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    state.hit();
    let vet_id = body
        .get("veterinarian_id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let mut store = state.store.lock().unwrap();
    if !store.vets.contains_key(&vet_id) {
        return detail(StatusCode::NOT_FOUND, "Veterinario no encontrado");
    }
    if state.behavior.gate_consultations && !store.memberships.contains_key(&vet_id) {
        return detail(StatusCode::FORBIDDEN, &state.behavior.forbidden_detail);
    }

    let consultation = json!({
        "id": state.next_id("consulta"),
        "veterinarian_id": vet_id,
        "category": body.get("category").cloned().unwrap_or(Value::Null),
        "consultation_data": body.get("consultation_data").cloned().unwrap_or(Value::Null),
    });
    store.consultations.push(consultation.clone());
    Json(consultation).into_response()
}

async fn history(State(state): State<Shared>, Path(vet_id): Path<String>) -> Response {
    state.hit();
    let store = state.store.lock().unwrap();
    let consultations: Vec<Value> = store
        .consultations
        .iter()
        .filter(|c| c.get("veterinarian_id").and_then(Value::as_str) == Some(vet_id.as_str()))
        .cloned()
        .collect();
    Json(json!({ "consultations": consultations })).into_response()
}

async fn analyze(
    State(state): State<Shared>,
    Path(consultation_id): Path<String>,
) -> Response {
    state.hit();
    let status = StatusCode::from_u16(state.behavior.analysis_status)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status != StatusCode::OK {
        return detail(status, "Error en el análisis");
    }

    let store = state.store.lock().unwrap();
    let exists = store
        .consultations
        .iter()
        .any(|c| c.get("id").and_then(Value::as_str) == Some(consultation_id.as_str()));
    if !exists {
        return detail(StatusCode::NOT_FOUND, "Consulta no encontrada");
    }

    Json(json!({
        "consultation_id": consultation_id,
        "analysis": "Diagnóstico diferencial: gastritis aguda, cuerpo extraño, pancreatitis.",
    }))
    .into_response()
}

async fn veterinarian(State(state): State<Shared>, Path(vet_id): Path<String>) -> Response {
    state.hit();
    let store = state.store.lock().unwrap();
    match store.vets.get(&vet_id) {
        Some(vet) => {
            let mut vet = vet.clone();
            if state.behavior.corrupt_profile_reads {
                vet["nombre"] = json!("Dr. Otro Nombre");
            }
            Json(vet).into_response()
        }
        None => detail(StatusCode::NOT_FOUND, "Veterinario no encontrado"),
    }
}
