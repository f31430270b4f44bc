//! Blocking HTTP client for the dashboard backend.
//!
//! Every call is a single request: no retries, no caching, no auth. Failures
//! are classified for logging (`ApiError`), but the UI treats them all alike.

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::domain::{ConnectionStatus, SalesRecord};
use crate::error::AppError;

const STATUS_PATH: &str = "/api/status";
const SALES_PATH: &str = "/api/data/Sal";
const REFRESH_PATH: &str = "/api/refresh";
const ASK_PATH: &str = "/api/ask";
const CATEGORIES_PATH: &str = "/api/data/categories";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned status {status}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
    },
    #[error("failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    pub fn endpoint(&self) -> &'static str {
        match self {
            ApiError::Transport { endpoint, .. }
            | ApiError::Status { endpoint, .. }
            | ApiError::Decode { endpoint, .. } => endpoint,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SalesResponse {
    #[serde(default)]
    data: Option<Vec<SalesRecord>>,
}

#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    question: &'a str,
}

#[derive(Debug, Deserialize)]
struct AskResponse {
    answer: String,
}

pub struct DashboardClient {
    client: Client,
    settings: Settings,
}

impl DashboardClient {
    pub fn new(settings: Settings) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| AppError::runtime(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, settings })
    }

    pub fn api_base(&self) -> &str {
        &self.settings.api_base
    }

    /// `GET /api/status`.
    ///
    /// The backend answers 500 with a JSON body when its database is down, so
    /// the body is decoded whatever the status code; only an undecodable
    /// error response is reported as a status failure.
    pub fn status(&self) -> Result<ConnectionStatus, ApiError> {
        let resp = self.get(STATUS_PATH)?;
        let code = resp.status();
        match resp.json::<ConnectionStatus>() {
            Ok(status) => {
                tracing::debug!(status = %status.status, http = %code, "status check");
                Ok(status)
            }
            Err(_) if !code.is_success() => Err(ApiError::Status {
                endpoint: STATUS_PATH,
                status: code,
            }),
            Err(source) => Err(ApiError::Decode {
                endpoint: STATUS_PATH,
                source,
            }),
        }
    }

    /// `GET /api/data/Sal`. A payload without `data` is an empty series.
    pub fn sales_records(&self) -> Result<Vec<SalesRecord>, ApiError> {
        let resp = ensure_success(SALES_PATH, self.get(SALES_PATH)?)?;
        let body: SalesResponse = resp.json().map_err(|source| ApiError::Decode {
            endpoint: SALES_PATH,
            source,
        })?;
        let records = body.data.unwrap_or_default();
        tracing::info!(records = records.len(), "fetched sales records");
        Ok(records)
    }

    /// `GET /api/refresh`. Fire-and-forget: the body is ignored and only a
    /// transport failure counts as an error.
    pub fn trigger_refresh(&self) -> Result<(), ApiError> {
        let resp = self.get(REFRESH_PATH)?;
        if !resp.status().is_success() {
            tracing::warn!(http = %resp.status(), "refresh trigger answered with an error status");
        }
        Ok(())
    }

    /// `POST /api/ask` with `{question}`; returns the answer verbatim.
    pub fn ask(&self, question: &str) -> Result<String, ApiError> {
        tracing::info!(chars = question.chars().count(), "sending question");
        let resp = self
            .client
            .post(self.settings.endpoint(ASK_PATH))
            .json(&AskRequest { question })
            .send()
            .map_err(|source| ApiError::Transport {
                endpoint: ASK_PATH,
                source,
            })?;
        let resp = ensure_success(ASK_PATH, resp)?;
        let body: AskResponse = resp.json().map_err(|source| ApiError::Decode {
            endpoint: ASK_PATH,
            source,
        })?;
        Ok(body.answer)
    }

    /// `GET /api/data/categories`: distinct product categories.
    pub fn categories(&self) -> Result<Vec<String>, ApiError> {
        let resp = ensure_success(CATEGORIES_PATH, self.get(CATEGORIES_PATH)?)?;
        resp.json().map_err(|source| ApiError::Decode {
            endpoint: CATEGORIES_PATH,
            source,
        })
    }

    fn get(&self, path: &'static str) -> Result<Response, ApiError> {
        self.client
            .get(self.settings.endpoint(path))
            .send()
            .map_err(|source| ApiError::Transport {
                endpoint: path,
                source,
            })
    }
}

fn ensure_success(endpoint: &'static str, resp: Response) -> Result<Response, ApiError> {
    if resp.status().is_success() {
        Ok(resp)
    } else {
        Err(ApiError::Status {
            endpoint,
            status: resp.status(),
        })
    }
}
