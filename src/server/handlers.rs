use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::validator::EmailAddress;
use crate::verify::{
    CheckOutcome, DeliverabilityVerdict, Verification, VerificationVerdict, Verifier,
};

pub(crate) const EMAIL_REQUIRED: &str = "Email is required.";
pub(crate) const INVALID_EMAIL_FORMAT: &str = "Invalid email format.";

#[derive(Debug, Default, Deserialize)]
pub struct ValidateRequest {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecksResponse {
    pub mx_check: CheckOutcome,
    pub smtp_check: CheckOutcome,
    pub dnsbl_check: CheckOutcome,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub email: String,
    pub score: u8,
    pub verdict: DeliverabilityVerdict,
    pub reasons: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    let body = ErrorResponse {
        error: message.to_string(),
    };
    (status, Json(body)).into_response()
}

/// Anything that is not a JSON object with a string `email` counts as a
/// missing address.
fn requested_email(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ValidateRequest>(body)
        .unwrap_or_default()
        .email
        .filter(|email| !email.trim().is_empty())
}

/// Runs `work` on its own task so a panic inside the pipeline surfaces as
/// `None` instead of tearing down the connection.
async fn run_isolated<F>(work: F) -> Option<Verification>
where
    F: Future<Output = Verification> + Send + 'static,
{
    match tokio::spawn(work).await {
        Ok(verification) => Some(verification),
        Err(err) => {
            error!(error = %err, "verification task failed");
            None
        }
    }
}

/// Parses the request for the endpoints that reject bad input with 400.
fn checked_address(verifier: &Verifier, body: &[u8]) -> Result<EmailAddress, Response> {
    let email = requested_email(body)
        .ok_or_else(|| error_response(StatusCode::BAD_REQUEST, EMAIL_REQUIRED))?;
    verifier
        .parse(&email)
        .map_err(|_| error_response(StatusCode::BAD_REQUEST, INVALID_EMAIL_FORMAT))
}

pub(crate) fn server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(VerificationVerdict::server_error()),
    )
        .into_response()
}

/// `POST /api/validate-email`: always answers with the status shape.
pub async fn validate_email(State(verifier): State<Arc<Verifier>>, body: Bytes) -> Response {
    let email = requested_email(&body).unwrap_or_default();
    let task = async move { verifier.verify(&email).await };
    match run_isolated(task).await {
        Some(verification) => (StatusCode::OK, Json(verification.verdict)).into_response(),
        None => server_error(),
    }
}

/// `POST /api/validate-email/checks`
pub async fn validate_email_checks(
    State(verifier): State<Arc<Verifier>>,
    body: Bytes,
) -> Response {
    let address = match checked_address(&verifier, &body) {
        Ok(address) => address,
        Err(response) => return response,
    };
    let task = async move { verifier.verify_address(&address).await };
    match run_isolated(task).await {
        Some(verification) => Json(ChecksResponse {
            mx_check: verification.mx_check,
            smtp_check: verification.smtp_check,
            dnsbl_check: verification.dnsbl_check,
        })
        .into_response(),
        None => server_error(),
    }
}

/// `POST /api/validate-email/score`
pub async fn validate_email_score(
    State(verifier): State<Arc<Verifier>>,
    body: Bytes,
) -> Response {
    let address = match checked_address(&verifier, &body) {
        Ok(address) => address,
        Err(response) => return response,
    };
    let task = async move { verifier.verify_address(&address).await };
    match run_isolated(task).await {
        Some(verification) => Json(ScoreResponse {
            email: verification.email,
            score: verification.score.score,
            verdict: verification.score.verdict,
            reasons: verification.score.reasons,
        })
        .into_response(),
        None => server_error(),
    }
}

pub async fn health() -> &'static str {
    "OK"
}
