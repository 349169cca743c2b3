use rocket::{State, get, post, put, delete, http::Status, response::status, serde::json::Json};
use tracing::{error, instrument};
use std::sync::{Arc, Mutex};
use shared::{
    models::*,
    validation::{parse_history_update, validate_new_voter},
    ErrorCode, MemoryStore, VoterRegistry, VoterStore,
};
use crate::{
    error::ApiError,
    metrics::ApiMetrics,
    utils::{format_uptime, parse_poll_id, parse_voter_id},
};

/// The registry as the service holds it: backend chosen at startup.
pub type Registry = VoterRegistry<Box<dyn VoterStore + Send>>;

pub struct AppState {
    registry: Arc<Mutex<Registry>>,
    pub metrics: Arc<ApiMetrics>,
}

impl AppState {
    pub fn new(store: Box<dyn VoterStore + Send>) -> Self {
        Self {
            registry: Arc::new(Mutex::new(VoterRegistry::new(store))),
            metrics: Arc::new(ApiMetrics::default()),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    /// Runs `op` against the registry on the blocking pool. Registry calls
    /// may block on the store, and only one runs at a time.
    pub async fn with_registry<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut Registry) -> shared::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let registry = Arc::clone(&self.registry);
        tokio::task::spawn_blocking(move || {
            let mut registry = registry
                .lock()
                .map_err(|_| ApiError::Internal("registry lock poisoned".into()))?;
            op(&mut *registry).map_err(|e| {
                if e.code == ErrorCode::Backend {
                    error!("Voter store failure: {}", e);
                }
                ApiError::from(e)
            })
        })
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
    }
}

#[rocket::options("/<_..>")]
pub async fn all_options() -> Status {
    Status::Ok
}

#[get("/voters/health")]
pub fn health(state: &State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "OK".into(),
        uptime: format_uptime(state.metrics.uptime()),
        num_api_calls: state.metrics.calls(),
        num_api_errors: state.metrics.errors(),
    })
}

#[instrument(skip(state))]
#[get("/voters")]
pub async fn list_voters(state: &State<AppState>) -> Result<Json<Vec<Voter>>, ApiError> {
    state.with_registry(|r| r.get_voters()).await.map(Json)
}

#[instrument(skip(state))]
#[delete("/voters")]
pub async fn delete_voters(state: &State<AppState>) -> Result<String, ApiError> {
    state.with_registry(|r| r.delete_voters()).await?;
    Ok("All voters deleted".into())
}

#[instrument(skip(state))]
#[get("/voters/<id>")]
pub async fn get_voter(state: &State<AppState>, id: &str) -> Result<Json<Voter>, ApiError> {
    let voter_id = parse_voter_id(id)?;
    state.with_registry(move |r| r.get_voter(voter_id)).await.map(Json)
}

#[instrument(skip(state, request))]
#[post("/voters/<id>", data = "<request>")]
pub async fn add_voter(
    state: &State<AppState>,
    id: &str,
    request: Json<VoterRequest>,
) -> Result<status::Created<Json<Voter>>, ApiError> {
    let voter_id = parse_voter_id(id)?;
    let request = request.into_inner();
    validate_new_voter(&request)?;

    let voter = Voter::new(voter_id, request.name, request.email);
    let added = state.with_registry(move |r| r.add_voter(voter)).await?;
    Ok(status::Created::new(format!("/voters/{voter_id}")).body(Json(added)))
}

#[instrument(skip(state, request))]
#[put("/voters/<id>", data = "<request>")]
pub async fn update_voter(
    state: &State<AppState>,
    id: &str,
    request: Json<VoterRequest>,
) -> Result<Json<Voter>, ApiError> {
    let voter_id = parse_voter_id(id)?;
    let VoterRequest { name, email } = request.into_inner();
    state
        .with_registry(move |r| r.update_voter(voter_id, &name, &email))
        .await
        .map(Json)
}

#[instrument(skip(state))]
#[delete("/voters/<id>")]
pub async fn delete_voter(state: &State<AppState>, id: &str) -> Result<Json<Voter>, ApiError> {
    let voter_id = parse_voter_id(id)?;
    state.with_registry(move |r| r.delete_voter(voter_id)).await.map(Json)
}

#[instrument(skip(state))]
#[get("/voters/<id>/polls")]
pub async fn get_voter_histories(
    state: &State<AppState>,
    id: &str,
) -> Result<Json<Vec<VoterHistory>>, ApiError> {
    let voter_id = parse_voter_id(id)?;
    state
        .with_registry(move |r| r.get_voter_histories(voter_id))
        .await
        .map(Json)
}

#[instrument(skip(state))]
#[get("/voters/<id>/polls/<poll_id>")]
pub async fn get_voter_history(
    state: &State<AppState>,
    id: &str,
    poll_id: &str,
) -> Result<Json<VoterHistory>, ApiError> {
    let (voter_id, poll_id) = (parse_voter_id(id)?, parse_poll_id(poll_id)?);
    state
        .with_registry(move |r| r.get_voter_history(voter_id, poll_id))
        .await
        .map(Json)
}

#[instrument(skip(state, request))]
#[post("/voters/<id>/polls/<poll_id>", data = "<request>")]
pub async fn add_voter_history(
    state: &State<AppState>,
    id: &str,
    poll_id: &str,
    request: Json<AddVoterHistoryRequest>,
) -> Result<status::Created<Json<VoterHistory>>, ApiError> {
    let (voter_id, poll_id) = (parse_voter_id(id)?, parse_poll_id(poll_id)?);
    let vote_id = request.vote_id;

    let entry = state
        .with_registry(move |r| r.add_voter_history(voter_id, poll_id, vote_id))
        .await?;
    Ok(status::Created::new(format!("/voters/{voter_id}/polls/{poll_id}")).body(Json(entry)))
}

#[instrument(skip(state, request))]
#[put("/voters/<id>/polls/<poll_id>", data = "<request>")]
pub async fn update_voter_history(
    state: &State<AppState>,
    id: &str,
    poll_id: &str,
    request: Json<UpdateVoterHistoryRequest>,
) -> Result<Json<VoterHistory>, ApiError> {
    let (voter_id, poll_id) = (parse_voter_id(id)?, parse_poll_id(poll_id)?);
    let vote_date = parse_history_update(&request)?;
    let vote_id = request.vote_id;

    state
        .with_registry(move |r| r.update_voter_history(voter_id, poll_id, vote_id, vote_date))
        .await
        .map(Json)
}

#[instrument(skip(state))]
#[delete("/voters/<id>/polls/<poll_id>")]
pub async fn delete_voter_history(
    state: &State<AppState>,
    id: &str,
    poll_id: &str,
) -> Result<Json<VoterHistory>, ApiError> {
    let (voter_id, poll_id) = (parse_voter_id(id)?, parse_poll_id(poll_id)?);
    state
        .with_registry(move |r| r.delete_voter_history(voter_id, poll_id))
        .await
        .map(Json)
}
