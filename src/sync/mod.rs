//! Court-control client: the scoring runtime that owns a match engine and
//! keeps it synchronized with the backend.
//!
//! Three background tasks run per session: the debounced save loop, the
//! reconciliation poll, and the 1 Hz rest break ticker. All countdowns and
//! elapsed displays derive from wall-clock timestamps, so a suspended client
//! catches up correctly on resume. Loss of connectivity degrades to offline
//! scoring: state stays locally authoritative and resyncs once saves go
//! through again.

pub mod api;
pub mod reconcile;
pub mod saver;

use std::sync::{Arc, Mutex as StdMutex, Weak};
use std::time::Duration;

use time::OffsetDateTime;
use tokio::sync::{Mutex, watch};
use tokio::time::{Instant, MissedTickBehavior, interval, sleep, sleep_until};
use tracing::{debug, info, warn};

use self::api::{ApiError, ApiResult, ScoreboardApi};
use self::reconcile::FieldFocus;
use self::saver::SaveScheduler;
use crate::config::PlaceholderNames;
use crate::dto::court::CourtUpdateRequest;
use crate::dto::game_state::GameStateUpdate;
use crate::dto::match_history::MatchResultRequest;
use crate::state::match_state::{MatchState, Side};
use crate::state::state_machine::{Effect, MatchEngine, MatchOutcome, RemovePointOutcome};
use crate::state::timer;

/// How often the backend is re-polled for externally made changes.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Scoring session for one court, wired to the backend.
///
/// Dropping the session stops its background tasks; call [`flush`] first to
/// push any still-pending state.
///
/// [`flush`]: CourtSession::flush
pub struct CourtSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    court: u16,
    api: ScoreboardApi,
    engine: Mutex<MatchEngine>,
    scheduler: StdMutex<SaveScheduler>,
    deadline: watch::Sender<Option<Instant>>,
    focus: StdMutex<FieldFocus>,
}

impl CourtSession {
    /// Connect a scoring session for `court`.
    ///
    /// The court number is validated against the backend settings when they
    /// are reachable. A failed initial state load is not fatal: scoring
    /// starts from placeholder defaults and resyncs through the save loop.
    pub async fn connect(
        api: ScoreboardApi,
        court: u16,
        placeholders: PlaceholderNames,
    ) -> ApiResult<Self> {
        match api.get_settings().await {
            Ok(settings) => {
                if court == 0 || court > settings.court_count {
                    return Err(ApiError::UnknownCourt {
                        court,
                        count: settings.court_count,
                    });
                }
            }
            Err(err) => {
                warn!(court, error = %err, "could not fetch settings; skipping court validation");
            }
        }

        let engine = match api.get_game_state(court).await {
            Ok(remote) => {
                let state = MatchState::from_entity(
                    remote.clone().into(),
                    remote.is_active,
                    remote.is_doubles,
                    remote.game_mode,
                );
                MatchEngine::from_state(state, placeholders)
            }
            Err(err) => {
                warn!(court, error = %err, "failed to load game state; starting from defaults");
                MatchEngine::new(placeholders)
            }
        };

        let (deadline_tx, _) = watch::channel(None);
        let inner = Arc::new(SessionInner {
            court,
            api,
            engine: Mutex::new(engine),
            scheduler: StdMutex::new(SaveScheduler::default()),
            deadline: deadline_tx,
            focus: StdMutex::new(FieldFocus::default()),
        });

        tokio::spawn(run_save_loop(Arc::downgrade(&inner)));
        tokio::spawn(run_poll_loop(Arc::downgrade(&inner)));
        tokio::spawn(run_break_ticker(Arc::downgrade(&inner)));

        Ok(Self { inner })
    }

    /// Court number this session scores.
    pub fn court(&self) -> u16 {
        self.inner.court
    }

    /// Snapshot of the current match state.
    pub async fn state(&self) -> MatchState {
        self.inner.engine.lock().await.state().clone()
    }

    /// Seconds remaining in a running rest break, 0 when idle.
    pub async fn rest_break_seconds_left(&self) -> u32 {
        self.inner.engine.lock().await.breaks().seconds_left()
    }

    /// Formatted match clock for display, derived from the timestamps.
    pub async fn clock_display(&self) -> String {
        let engine = self.inner.engine.lock().await;
        let elapsed = timer::elapsed_seconds(
            engine.state().match_start,
            engine.state().match_end,
            OffsetDateTime::now_utc(),
        );
        timer::format_clock(elapsed)
    }

    /// Record which name inputs the operator is editing; focused fields are
    /// protected from reconciliation overwrites.
    pub fn set_focus(&self, focus: FieldFocus) {
        *self.inner.focus.lock().expect("focus lock poisoned") = focus;
    }

    /// Award a point. Returned effects include the set/match-won prompts the
    /// caller must surface.
    pub async fn add_point(&self, side: Side) -> Vec<Effect> {
        let effects = {
            let mut engine = self.inner.engine.lock().await;
            engine.add_point(side, OffsetDateTime::now_utc())
        };
        self.inner.dispatch(&effects).await;
        effects
    }

    /// Take a point back; an [`RemovePointOutcome::UndoRequested`] result
    /// means the caller should confirm and then call [`undo_last_set`].
    ///
    /// [`undo_last_set`]: CourtSession::undo_last_set
    pub async fn remove_point(&self, side: Side) -> RemovePointOutcome {
        let outcome = {
            let mut engine = self.inner.engine.lock().await;
            engine.remove_point(side)
        };
        if let RemovePointOutcome::Removed(effects) = &outcome {
            self.inner.dispatch(effects).await;
        }
        outcome
    }

    /// Unwind the last completed set.
    pub async fn undo_last_set(&self) -> Vec<Effect> {
        self.run(|engine| engine.undo_last_set()).await
    }

    /// Confirm the match result, locking the match and recording it.
    pub async fn confirm_match_won(&self) -> Vec<Effect> {
        self.run(|engine| engine.confirm_match_won()).await
    }

    /// Continue play after a won set (interval break or immediate rollover).
    pub async fn continue_after_set(&self) -> Vec<Effect> {
        self.run(|engine| engine.continue_after_set()).await
    }

    /// Swap ends manually.
    pub async fn switch_sides(&self) -> Vec<Effect> {
        self.run(|engine| engine.switch_sides()).await
    }

    /// Zero both scores for a fresh set.
    pub async fn reset_scores(&self) -> Vec<Effect> {
        self.run(|engine| engine.reset_scores()).await
    }

    /// Reset everything for a new match on this court.
    pub async fn start_new_match(&self) -> Vec<Effect> {
        self.run(|engine| engine.start_new_match()).await
    }

    /// Clear the court entirely and mark it inactive.
    pub async fn clear_court(&self) -> Vec<Effect> {
        self.run(|engine| engine.clear_court()).await
    }

    /// End a running rest break early.
    pub async fn skip_rest_break(&self) -> Vec<Effect> {
        self.run(|engine| engine.skip_rest_break()).await
    }

    /// Rename a player.
    pub async fn set_player_name(&self, side: Side, name: String) -> Vec<Effect> {
        self.run(|engine| engine.set_player_name(side, name)).await
    }

    /// Rename a doubles partner.
    pub async fn set_partner_name(&self, side: Side, partner: String) -> Vec<Effect> {
        self.run(|engine| engine.set_partner_name(side, partner))
            .await
    }

    /// Toggle doubles display.
    pub async fn set_doubles(&self, is_doubles: bool) -> Vec<Effect> {
        self.run(|engine| engine.set_doubles(is_doubles)).await
    }

    /// Push any pending state immediately, bypassing the debounce. Call on
    /// shutdown.
    pub async fn flush(&self) {
        self.inner.save_now().await;
    }

    /// Fetch the backend state once and reconcile against it. The background
    /// poll does this on an interval; exposed for explicit refreshes.
    pub async fn poll_now(&self) {
        self.inner.poll_once().await;
    }

    async fn run(&self, op: impl FnOnce(&mut MatchEngine) -> Vec<Effect>) -> Vec<Effect> {
        let effects = {
            let mut engine = self.inner.engine.lock().await;
            op(&mut engine)
        };
        self.inner.dispatch(&effects).await;
        effects
    }
}

impl SessionInner {
    /// Execute the engine's emitted effects.
    async fn dispatch(self: &Arc<Self>, effects: &[Effect]) {
        for effect in effects {
            match effect {
                Effect::ScheduleSave => self.request_debounced_save(),
                Effect::SaveNow => self.save_now().await,
                Effect::MatchLocked(outcome) => self.record_match(outcome).await,
                Effect::MarkInactive { delay_secs } => self.mark_inactive_later(*delay_secs),
                Effect::DecidingGameSwitch => {
                    info!(
                        court = self.court,
                        "score reached 11 in the deciding game; sides switched"
                    );
                }
                _ => {}
            }
        }
    }

    fn request_debounced_save(&self) {
        let rearm = {
            let mut scheduler = self.scheduler.lock().expect("scheduler lock poisoned");
            scheduler.request_save()
        };
        if let Some(delay) = rearm {
            let _ = self.deadline.send(Some(Instant::now() + delay));
        }
    }

    async fn save_now(&self) {
        let start = {
            let mut scheduler = self.scheduler.lock().expect("scheduler lock poisoned");
            scheduler.flush()
        };
        if start {
            self.perform_save().await;
        }
    }

    async fn perform_save(&self) {
        let payload: GameStateUpdate = {
            let engine = self.engine.lock().await;
            engine.snapshot(OffsetDateTime::now_utc()).into()
        };

        let result = self.api.put_game_state(self.court, &payload, false).await;
        if let Err(err) = &result {
            warn!(court = self.court, error = %err, "failed to save game state; will retry");
        }

        let rearm = {
            let mut scheduler = self.scheduler.lock().expect("scheduler lock poisoned");
            scheduler.save_finished(result.is_ok())
        };
        if let Some(delay) = rearm {
            let _ = self.deadline.send(Some(Instant::now() + delay));
        }
    }

    async fn record_match(&self, outcome: &MatchOutcome) {
        let request = MatchResultRequest {
            court_id: self.court,
            winner_name: outcome.winner_name.clone(),
            loser_name: outcome.loser_name.clone(),
            games_won: outcome.games_won.clone(),
            duration: outcome.duration.clone(),
            set_scores: Some(outcome.set_scores.clone()),
        };

        if let Err(err) = self.api.post_match_result(&request).await {
            warn!(court = self.court, error = %err, "failed to record match result");
        }
    }

    /// Flip the court inactive after the given grace delay so the final
    /// score stays visible on displays for a moment.
    fn mark_inactive_later(self: &Arc<Self>, delay_secs: u16) {
        let inner = self.clone();
        tokio::spawn(async move {
            if delay_secs > 0 {
                sleep(Duration::from_secs(delay_secs.into())).await;
            }
            let update = CourtUpdateRequest {
                is_active: Some(false),
                ..Default::default()
            };
            if let Err(err) = inner.api.update_court(inner.court, &update).await {
                warn!(court = inner.court, error = %err, "failed to mark court inactive");
            }
        });
    }

    async fn poll_once(&self) {
        match self.api.get_game_state(self.court).await {
            Ok(remote) => {
                let focus = *self.focus.lock().expect("focus lock poisoned");
                let mut engine = self.engine.lock().await;
                let actions = reconcile::diff(engine.state(), &remote, focus);
                if actions.is_empty() {
                    return;
                }
                info!(
                    court = self.court,
                    count = actions.len(),
                    "adopting remote state changes"
                );
                reconcile::apply(&mut engine, &remote, &actions);
            }
            Err(err) => {
                // Skip this cycle; the next interval retries.
                debug!(court = self.court, error = %err, "poll failed");
            }
        }
    }
}

/// Debounce-driven save loop realizing the [`SaveScheduler`] transitions.
async fn run_save_loop(weak: Weak<SessionInner>) {
    let mut deadline_rx = match weak.upgrade() {
        Some(inner) => inner.deadline.subscribe(),
        None => return,
    };

    loop {
        let armed = *deadline_rx.borrow_and_update();
        match armed {
            Some(when) => {
                tokio::select! {
                    _ = sleep_until(when) => {
                        let Some(session) = weak.upgrade() else { return };
                        let start = {
                            let mut scheduler =
                                session.scheduler.lock().expect("scheduler lock poisoned");
                            scheduler.timer_fired()
                        };
                        let _ = session.deadline.send_replace(None);
                        if start {
                            session.perform_save().await;
                        }
                    }
                    changed = deadline_rx.changed() => {
                        if changed.is_err() {
                            return;
                        }
                    }
                }
            }
            None => {
                if deadline_rx.changed().await.is_err() {
                    return;
                }
            }
        }
    }
}

/// Interval poll detecting admin resets, unlocks, renames and mode toggles.
async fn run_poll_loop(weak: Weak<SessionInner>) {
    let mut ticker = interval(POLL_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let Some(session) = weak.upgrade() else { return };
        session.poll_once().await;
    }
}

/// 1 Hz driver for the rest break countdown.
async fn run_break_ticker(weak: Weak<SessionInner>) {
    let mut ticker = interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let Some(session) = weak.upgrade() else { return };
        let effects = {
            let mut engine = session.engine.lock().await;
            engine.tick_rest_break()
        };
        session.dispatch(&effects).await;
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use tokio::net::TcpListener;

    use super::*;
    use crate::config::AppConfig;
    use crate::dao::court_store::memory::MemoryCourtStore;
    use crate::routes;
    use crate::state::AppState;

    /// Boot the real router over a memory store on an ephemeral port.
    async fn spawn_backend() -> (ScoreboardApi, SocketAddr) {
        let state = AppState::new(AppConfig::default());
        state
            .install_court_store(Arc::new(MemoryCourtStore::new(4)))
            .await;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = routes::router(state);
        tokio::spawn(async move {
            axum::serve(listener, app.into_make_service()).await.unwrap();
        });

        let api = ScoreboardApi::new(format!("http://{addr}")).unwrap();
        (api, addr)
    }

    #[tokio::test]
    async fn session_scores_and_flushes_to_backend() {
        let (api, _) = spawn_backend().await;
        let session = CourtSession::connect(api.clone(), 1, PlaceholderNames::default())
            .await
            .unwrap();

        session.set_player_name(Side::One, "Anna".into()).await;
        session.add_point(Side::One).await;
        session.add_point(Side::One).await;
        session.flush().await;

        let remote = api.get_game_state(1).await.unwrap();
        assert_eq!(remote.player1.name, "Anna");
        assert_eq!(remote.player1.score, 2);
        assert!(remote.match_start_time.is_some());
        // The upsert derived the activity flag server-side.
        assert!(remote.is_active);
    }

    #[tokio::test]
    async fn session_adopts_admin_reset_on_poll() {
        let (api, _) = spawn_backend().await;
        let session = CourtSession::connect(api.clone(), 2, PlaceholderNames::default())
            .await
            .unwrap();

        for _ in 0..5 {
            session.add_point(Side::Two).await;
        }
        session.flush().await;
        assert_eq!(session.state().await.player2.score, 5);

        // Administrator resets the court behind our back.
        api.delete_game_state(2).await.unwrap();

        session.poll_now().await;
        let state = session.state().await;
        assert_eq!(state.player2.score, 0);
        assert!(state.match_start.is_none());
    }

    #[tokio::test]
    async fn connect_falls_back_to_defaults_without_backend() {
        let api = ScoreboardApi::new("http://127.0.0.1:1").unwrap();
        let session = CourtSession::connect(api, 1, PlaceholderNames::default())
            .await
            .unwrap();

        let state = session.state().await;
        assert_eq!(state.player1.name, "Player 1");
        assert_eq!(state.player1.score, 0);
    }

    #[tokio::test]
    async fn connect_rejects_out_of_range_court() {
        let (api, _) = spawn_backend().await;
        let result = CourtSession::connect(api, 99, PlaceholderNames::default()).await;
        assert!(matches!(result, Err(ApiError::UnknownCourt { .. })));
    }

    #[tokio::test]
    async fn confirmed_match_lock_reaches_the_backend() {
        let (api, _) = spawn_backend().await;
        let session = CourtSession::connect(api.clone(), 3, PlaceholderNames::default())
            .await
            .unwrap();

        session.set_player_name(Side::One, "Anna".into()).await;
        session.set_player_name(Side::Two, "Bo".into()).await;

        // Set one: Anna (slot one) to 21, skipping every break that starts.
        for _ in 0..21 {
            session.add_point(Side::One).await;
            session.skip_rest_break().await;
        }
        session.continue_after_set().await;
        session.skip_rest_break().await; // rollover swaps ends

        // Set two: Anna now scores from slot two.
        for _ in 0..21 {
            session.add_point(Side::Two).await;
            session.skip_rest_break().await;
        }

        let effects = session.confirm_match_won().await;
        assert!(
            effects
                .iter()
                .any(|e| matches!(e, Effect::MatchLocked(outcome) if outcome.winner_name == "Anna"))
        );
        session.flush().await;

        let remote = api.get_game_state(3).await.unwrap();
        assert!(remote.match_completed);
        assert_eq!(remote.set_scores_history.len(), 2);
    }
}
