use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the scoreboard backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::game_states::get_game_state,
        crate::routes::game_states::put_game_state,
        crate::routes::game_states::delete_game_state,
        crate::routes::courts::list_courts,
        crate::routes::courts::get_court,
        crate::routes::courts::update_court,
        crate::routes::match_history::record_match,
        crate::routes::match_history::list_all,
        crate::routes::match_history::list_for_court,
        crate::routes::settings::get_settings,
        crate::routes::settings::set_court_count,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::common::ActionResponse,
            crate::dto::game_state::GameStateResponse,
            crate::dto::game_state::GameStateUpdate,
            crate::dto::game_state::PlayerPayload,
            crate::dto::game_state::SetRecordPayload,
            crate::dto::court::CourtSummary,
            crate::dto::court::CourtUpdateRequest,
            crate::dto::match_history::MatchResultRequest,
            crate::dto::match_history::MatchRecordResponse,
            crate::dto::settings::SettingsResponse,
            crate::dto::settings::CourtCountUpdate,
            crate::state::match_state::GameMode,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "game-states", description = "Per-court game state persistence"),
        (name = "courts", description = "Court administration"),
        (name = "match-history", description = "Completed match log"),
        (name = "settings", description = "Global scoreboard settings"),
    )
)]
pub struct ApiDoc;
