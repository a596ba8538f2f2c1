// rest_api/src/lib.rs

use axum::{
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use log::{debug, error, info, warn};
use models::errors::PatientError;
use models::FieldMap;
use patient_lib::{Database, SortField, SortOrder};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};
use anyhow::{Context, Error as AnyhowError};

pub mod cli;
pub mod config;

use crate::config::AppConfig;

// Define the REST API error enum
#[derive(Debug, Error)]
pub enum RestApiError {
    #[error(transparent)]
    Patient(#[from] PatientError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

// Implement IntoResponse for RestApiError to convert it into an HTTP response
impl IntoResponse for RestApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            RestApiError::Patient(PatientError::Validation(e)) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "status": "error",
                    "message": e.to_string(),
                    "errors": e.violations,
                }),
            ),
            RestApiError::Patient(PatientError::NotFound(_)) => (
                StatusCode::NOT_FOUND,
                json!({ "status": "error", "message": "Patient not found" }),
            ),
            RestApiError::Patient(PatientError::Conflict(_)) => (
                StatusCode::BAD_REQUEST,
                json!({ "status": "error", "message": "Patient ID already exists" }),
            ),
            RestApiError::Patient(PatientError::InvalidInput(msg)) | RestApiError::InvalidInput(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "status": "error", "message": msg }),
            ),
            RestApiError::Patient(e) => {
                error!("Patient store failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "status": "error", "message": format!("Internal error: {}", e) }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct SortQuery {
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

fn body_fields(body: Value) -> Result<FieldMap, RestApiError> {
    match body {
        Value::Object(fields) => Ok(fields),
        _ => Err(RestApiError::InvalidInput("Request body must be a JSON object".to_string())),
    }
}

// Handler for the / endpoint
async fn root_handler() -> Json<Value> {
    Json(json!({ "message": "Welcome to the Patient Management API" }))
}

// Handler for the /about endpoint
async fn about_handler() -> Json<Value> {
    Json(json!({
        "message": "This API allows you to manage patient records including BMI calculation."
    }))
}

// Handler for the /health endpoint
async fn health_check_handler() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok", "message": "REST API is healthy" })))
}

// Handler for the /view endpoint
async fn view_patients_handler(State(db): State<Database>) -> Result<Json<Value>, RestApiError> {
    let patients = db.view_all().await?;
    debug!("Listing {} stored patients", patients.len());
    Ok(Json(Value::Object(patients)))
}

// Handler for the /patient/:patient_id endpoint
async fn get_patient_handler(
    State(db): State<Database>,
    Path(patient_id): Path<String>,
) -> Result<Json<Value>, RestApiError> {
    let record = db.get_patient(&patient_id).await?;
    Ok(Json(Value::Object(record.to_fields())))
}

// Handler for the /sort endpoint
async fn sort_patients_handler(
    State(db): State<Database>,
    Query(query): Query<SortQuery>,
) -> Result<Json<Vec<FieldMap>>, RestApiError> {
    let sort_by = query
        .sort_by
        .ok_or_else(|| RestApiError::InvalidInput("Missing required query parameter sort_by".to_string()))?;
    let field: SortField = sort_by.parse()?;
    let order = match query.order {
        Some(order) => order.parse::<SortOrder>()?,
        None => SortOrder::default(),
    };
    Ok(Json(db.sort_patients(field, order).await?))
}

// Handler for the /create endpoint
async fn create_patient_handler(
    State(db): State<Database>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Value>), RestApiError> {
    let fields = body_fields(payload)?;
    let record = db.create_patient(&fields).await.map_err(|e| {
        warn!("Rejected patient creation: {}", e);
        e
    })?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Patient created successfully",
            "patient": record,
        })),
    ))
}

// Handler for the /edit/:patient_id endpoint
async fn update_patient_handler(
    State(db): State<Database>,
    Path(patient_id): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, RestApiError> {
    let fields = body_fields(payload)?;
    let record = db.update_patient(&patient_id, &fields).await?;
    Ok(Json(json!({
        "message": "patient updated",
        "patient": record,
    })))
}

// Handler for the /delete/:patient_id endpoint
async fn delete_patient_handler(
    State(db): State<Database>,
    Path(patient_id): Path<String>,
) -> Result<Json<Value>, RestApiError> {
    db.delete_patient(&patient_id).await?;
    Ok(Json(json!({ "message": "patient deleted" })))
}

/// Builds the router with every patient route bound to `db`.
pub fn router(db: Database) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_origin(Any);

    Router::new()
        .route("/", get(root_handler))
        .route("/about", get(about_handler))
        .route("/health", get(health_check_handler))
        .route("/view", get(view_patients_handler))
        .route("/patient/:patient_id", get(get_patient_handler))
        .route("/sort", get(sort_patients_handler))
        .route("/create", post(create_patient_handler))
        .route("/edit/:patient_id", put(update_patient_handler))
        .route("/delete/:patient_id", delete(delete_patient_handler))
        .with_state(db)
        .layer(cors)
}

/// Serves the API on an already bound listener until `shutdown_rx` fires or
/// its sender is dropped.
pub async fn serve(
    listener: TcpListener,
    db: Database,
    shutdown_rx: oneshot::Receiver<()>,
) -> Result<(), AnyhowError> {
    let addr = listener.local_addr().context("Failed to read listener address")?;
    info!("REST API server listening on {} (storage: {})", addr, db.storage().get_type());

    axum::serve(listener, router(db).into_make_service())
        .with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
            info!("Received shutdown signal.");
        })
        .await
        .context("REST API server failed to start or run")?;

    info!("REST API server stopped.");
    Ok(())
}

// Main function to start the REST API server
pub async fn start_server(config: AppConfig, shutdown_rx: oneshot::Receiver<()>) -> Result<(), AnyhowError> {
    let addr = config.server.socket_addr().await?;
    let db = Database::from_config(&config.storage);

    let listener = TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind to address: {}", addr))?;

    serve(listener, db, shutdown_rx).await
}
