use std::convert::Infallible;
use std::fmt::{self, Display};

use serde::Serialize;
use warp::{
    http::StatusCode,
    reject::{self, Rejection},
    Reply,
};

use crate::database::schema::Uuid;
use crate::jwt::AuthError;

/// Client-facing error carried through warp's rejection machinery. `code`
/// doubles as the HTTP status and the `error` field of the envelope.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub code: u16,
    pub message: String,
}

impl ApiError {
    pub fn new(code: u16, message: &str) -> Self {
        Self {
            code,
            message: message.to_string(),
        }
    }

    /// An error carrying the status's canonical reason phrase.
    pub fn canonical(code: u16) -> Self {
        let message = StatusCode::from_u16(code)
            .ok()
            .and_then(|status| status.canonical_reason())
            .unwrap_or("Unknown Error");

        Self::new(code, message)
    }

    pub fn bad_request() -> Self {
        Self::canonical(400)
    }

    pub fn not_found() -> Self {
        Self::canonical(404)
    }

    pub fn unprocessable() -> Self {
        Self::canonical(422)
    }

    pub fn internal() -> Self {
        Self::canonical(500)
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

impl reject::Reject for ApiError {}

impl From<AuthError> for ApiError {
    fn from(value: AuthError) -> Self {
        Self {
            code: value.status,
            message: value.message,
        }
    }
}

#[derive(Serialize)]
struct DrinksBody<T> {
    success: bool,
    drinks: Vec<T>,
}

#[derive(Serialize)]
struct DeleteBody {
    success: bool,
    delete: Uuid,
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: u16,
    message: String,
}

pub fn drinks<T: Serialize>(drinks: Vec<T>) -> warp::reply::Json {
    warp::reply::json(&DrinksBody {
        success: true,
        drinks,
    })
}

pub fn deleted(id: Uuid) -> warp::reply::Json {
    warp::reply::json(&DeleteBody {
        success: true,
        delete: id,
    })
}

/// Renders every rejection through the uniform error envelope; the HTTP
/// status always matches the envelope's `error` field.
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let error = if let Some(e) = err.find::<ApiError>() {
        e.clone()
    } else if err.is_not_found() {
        ApiError::not_found()
    } else if err.find::<warp::body::BodyDeserializeError>().is_some() {
        ApiError::bad_request()
    } else if err.find::<reject::MethodNotAllowed>().is_some() {
        ApiError::canonical(405)
    } else {
        log::error!("Unhandled rejection: {err:?}");
        ApiError::internal()
    };

    let status = StatusCode::from_u16(error.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = warp::reply::json(&ErrorBody {
        success: false,
        error: error.code,
        message: error.message,
    });

    Ok(warp::reply::with_status(body, status))
}
