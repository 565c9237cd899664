//! HTTP surface for the contact directory.
//!
//! # Responsibility
//! - Expose list/append/delete over `/contacts` with JSON bodies.
//! - Map store error classes onto the documented status codes.
//!
//! # Invariants
//! - Handlers never panic across the HTTP boundary; every failure becomes
//!   a classified JSON error reply.
//! - Store calls run on the blocking pool, never on the async executor.

use crate::context::AppContext;
use log::error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokenbook_core::{ContactId, StoreError, StoreResult};
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

const MAX_BODY_BYTES: u64 = 16 * 1024;

/// Append request body. Field names match the persisted wire format.
#[derive(Debug, Deserialize)]
struct NewContactRequest {
    email: String,
    #[serde(rename = "cryptoAddress")]
    address: String,
}

/// Delete request body: positional (`{"index": n}`) or stable-id
/// (`{"id": "..."}`). The id form cannot race against concurrent
/// mutations shifting positions.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DeleteRequest {
    ById { id: ContactId },
    ByIndex { index: i64 },
}

/// Query parameters for the list endpoint.
#[derive(Debug, Deserialize)]
struct ListParams {
    /// Address to filter out of the reply, normally the caller's own.
    exclude: Option<String>,
}

#[derive(Serialize)]
struct MessageBody {
    message: &'static str,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

/// Builds the complete route tree over the shared context.
pub fn routes(
    ctx: Arc<AppContext>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let list = warp::get()
        .and(warp::path("contacts"))
        .and(warp::path::end())
        .and(warp::query::<ListParams>())
        .and(with_context(ctx.clone()))
        .and_then(handle_list);

    let append = warp::post()
        .and(warp::path("contacts"))
        .and(warp::path::end())
        .and(json_body::<NewContactRequest>())
        .and(with_context(ctx.clone()))
        .and_then(handle_append);

    let delete = warp::delete()
        .and(warp::path("contacts"))
        .and(warp::path::end())
        .and(json_body::<DeleteRequest>())
        .and(with_context(ctx))
        .and_then(handle_delete);

    list.or(append).or(delete).recover(handle_rejection)
}

fn with_context(
    ctx: Arc<AppContext>,
) -> impl Filter<Extract = (Arc<AppContext>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || ctx.clone())
}

fn json_body<T: serde::de::DeserializeOwned + Send>(
) -> impl Filter<Extract = (T,), Error = Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

async fn handle_list(
    params: ListParams,
    ctx: Arc<AppContext>,
) -> Result<impl Reply, Rejection> {
    let result = run_store(move || match params.exclude.as_deref() {
        Some(address) => ctx.directory.list_excluding(address),
        None => ctx.directory.list(),
    })
    .await;

    Ok(match result {
        Ok(contacts) => warp::reply::with_status(warp::reply::json(&contacts), StatusCode::OK),
        Err(err) => {
            error!("event=http_list module=api status=error error={err}");
            error_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error reading contacts",
                None,
            )
        }
    })
}

async fn handle_append(
    request: NewContactRequest,
    ctx: Arc<AppContext>,
) -> Result<impl Reply, Rejection> {
    let result = run_store(move || ctx.directory.add_contact(request.email, request.address)).await;

    Ok(match result {
        Ok(_id) => message_reply(StatusCode::CREATED, "Contact added successfully"),
        Err(StoreError::Validation(err)) => {
            error_reply(StatusCode::BAD_REQUEST, err.to_string(), None)
        }
        Err(err) => {
            error!("event=http_append module=api status=error error={err}");
            error_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error adding contact",
                Some(err.to_string()),
            )
        }
    })
}

async fn handle_delete(
    request: DeleteRequest,
    ctx: Arc<AppContext>,
) -> Result<impl Reply, Rejection> {
    let result = match request {
        DeleteRequest::ById { id } => run_store(move || ctx.directory.delete_by_id(id)).await,
        DeleteRequest::ByIndex { index } => match usize::try_from(index) {
            Ok(index) => run_store(move || ctx.directory.delete_at(index)).await,
            Err(_) => {
                return Ok(error_reply(
                    StatusCode::BAD_REQUEST,
                    "Invalid contact index",
                    None,
                ))
            }
        },
    };

    Ok(match result {
        Ok(_removed) => message_reply(StatusCode::OK, "Contact deleted successfully"),
        Err(StoreError::OutOfRange { .. }) => {
            error_reply(StatusCode::BAD_REQUEST, "Invalid contact index", None)
        }
        Err(StoreError::NotFound(_)) => {
            error_reply(StatusCode::BAD_REQUEST, "Unknown contact id", None)
        }
        Err(err) => {
            error!("event=http_delete module=api status=error error={err}");
            error_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error deleting contact",
                None,
            )
        }
    })
}

/// Runs a store call on the blocking pool.
///
/// A failed join can only come from a panicking store call; it is reported
/// as a generic storage failure rather than propagated as a panic.
async fn run_store<T, F>(call: F) -> StoreResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> StoreResult<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(call).await {
        Ok(result) => result,
        Err(join_err) => {
            error!("event=store_task module=api status=error error={join_err}");
            Err(StoreError::Io {
                path: std::path::PathBuf::new(),
                source: std::io::Error::other("storage task failed"),
            })
        }
    }
}

async fn handle_rejection(rejection: Rejection) -> Result<impl Reply, Rejection> {
    let (status, message) = if rejection.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_string())
    } else if let Some(err) = rejection.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, format!("Invalid request body: {err}"))
    } else if rejection.find::<warp::reject::InvalidQuery>().is_some() {
        (StatusCode::BAD_REQUEST, "Invalid query string".to_string())
    } else if rejection.find::<warp::reject::LengthRequired>().is_some() {
        (
            StatusCode::LENGTH_REQUIRED,
            "Content length required".to_string(),
        )
    } else if rejection.find::<warp::reject::PayloadTooLarge>().is_some() {
        (
            StatusCode::PAYLOAD_TOO_LARGE,
            "Request body too large".to_string(),
        )
    } else if rejection.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "Method not allowed".to_string(),
        )
    } else {
        error!("event=http_rejection module=api status=error detail={rejection:?}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    };

    Ok(error_reply(status, message, None))
}

fn message_reply(
    status: StatusCode,
    message: &'static str,
) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(warp::reply::json(&MessageBody { message }), status)
}

fn error_reply(
    status: StatusCode,
    error: impl Into<String>,
    details: Option<String>,
) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(
        warp::reply::json(&ErrorBody {
            error: error.into(),
            details,
        }),
        status,
    )
}
