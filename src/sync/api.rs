//! HTTP client for the scoreboard backend, used by court-control clients.

use std::sync::Arc;

use reqwest::{Client, Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::dto::{
    court::{CourtSummary, CourtUpdateRequest},
    game_state::{GameStateResponse, GameStateUpdate},
    match_history::{MatchRecordResponse, MatchResultRequest},
    settings::SettingsResponse,
};

/// Convenient result alias returning [`ApiError`] failures.
pub type ApiResult<T> = Result<T, ApiError>;

/// Failures that can occur while talking to the backend API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build API client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// A request could not be sent.
    #[error("failed to send request to `{path}`")]
    RequestSend {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// The backend returned an unexpected status code.
    #[error("unexpected response status {status} for `{path}`")]
    RequestStatus { path: String, status: StatusCode },
    /// Response payload could not be parsed into JSON.
    #[error("failed to decode response for `{path}`")]
    DecodeResponse {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// The addressed court is not provisioned on the backend.
    #[error("court {court} does not exist (configured courts: {count})")]
    UnknownCourt { court: u16, count: u16 },
}

/// Thin typed wrapper over the backend's REST surface.
#[derive(Clone)]
pub struct ScoreboardApi {
    client: Client,
    base_url: Arc<str>,
}

impl ScoreboardApi {
    /// Build a client for the backend at `base_url` (e.g.
    /// `http://localhost:8080`).
    pub fn new(base_url: impl AsRef<str>) -> ApiResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| ApiError::ClientBuilder { source })?;

        Ok(Self {
            client,
            base_url: Arc::<str>::from(base_url.as_ref().trim_end_matches('/')),
        })
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        self.client.request(method, url)
    }

    async fn expect_json<T>(&self, method: Method, path: &str) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self
            .request(method, path)
            .send()
            .await
            .map_err(|source| ApiError::RequestSend {
                path: path.to_string(),
                source,
            })?;

        decode_json(path, response).await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> ApiResult<T>
    where
        B: ?Sized + Serialize,
        T: DeserializeOwned,
    {
        let response = self
            .request(method, path)
            .json(body)
            .send()
            .await
            .map_err(|source| ApiError::RequestSend {
                path: path.to_string(),
                source,
            })?;

        decode_json(path, response).await
    }

    /// Global settings: court count and configuration flags.
    pub async fn get_settings(&self) -> ApiResult<SettingsResponse> {
        self.expect_json(Method::GET, "settings").await
    }

    /// Full game state for a court.
    pub async fn get_game_state(&self, court: u16) -> ApiResult<GameStateResponse> {
        self.expect_json(Method::GET, &format!("game-states/{court}"))
            .await
    }

    /// Upsert the game state for a court. `skip_auto_active` suppresses the
    /// server-side mark-active derivation (admin edits).
    pub async fn put_game_state(
        &self,
        court: u16,
        state: &GameStateUpdate,
        skip_auto_active: bool,
    ) -> ApiResult<()> {
        let path = if skip_auto_active {
            format!("game-states/{court}?skipAutoActive=true")
        } else {
            format!("game-states/{court}")
        };

        let response = self
            .request(Method::PUT, &path)
            .json(state)
            .send()
            .await
            .map_err(|source| ApiError::RequestSend {
                path: path.clone(),
                source,
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ApiError::RequestStatus {
                path,
                status: response.status(),
            })
        }
    }

    /// Administrator reset of a court's stored state.
    pub async fn delete_game_state(&self, court: u16) -> ApiResult<()> {
        let path = format!("game-states/{court}");
        let response = self
            .request(Method::DELETE, &path)
            .send()
            .await
            .map_err(|source| ApiError::RequestSend {
                path: path.clone(),
                source,
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ApiError::RequestStatus {
                path,
                status: response.status(),
            })
        }
    }

    /// Toggle court flags, e.g. marking a court inactive after a reset.
    pub async fn update_court(
        &self,
        court: u16,
        update: &CourtUpdateRequest,
    ) -> ApiResult<CourtSummary> {
        self.send_json(Method::PUT, &format!("courts/{court}"), update)
            .await
    }

    /// Record a completed match.
    pub async fn post_match_result(
        &self,
        result: &MatchResultRequest,
    ) -> ApiResult<MatchRecordResponse> {
        self.send_json(Method::POST, "match-history", result).await
    }
}

async fn decode_json<T>(path: &str, response: reqwest::Response) -> ApiResult<T>
where
    T: DeserializeOwned,
{
    if !response.status().is_success() {
        return Err(ApiError::RequestStatus {
            path: path.to_string(),
            status: response.status(),
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|source| ApiError::DecodeResponse {
            path: path.to_string(),
            source,
        })
}
