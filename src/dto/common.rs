use serde::Serialize;
use utoipa::ToSchema;

/// Plain acknowledgement body returned by mutating endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResponse {
    /// Always true; errors surface through the error body instead.
    pub success: bool,
}

impl ActionResponse {
    /// Successful acknowledgement.
    pub fn ok() -> Self {
        Self { success: true }
    }
}
