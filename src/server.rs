//! HTTP transport over the game engine.
//!
//! A thin shell: handlers decode the wire format, offload the blocking
//! database work, and map engine errors to statuses. All rules and
//! persistence semantics live in the coordinator and below.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::task;
use tower::ServiceBuilder;
use tracing::{info, warn};

use crate::db::DbError;
use crate::error::EngineError;
use crate::game::{BOARD_SIZE, Disc};
use crate::service::GameCoordinator;

/// Shared handler state.
#[derive(Clone)]
struct AppState {
    coordinator: Arc<GameCoordinator>,
}

/// Builds the application router.
pub fn router(coordinator: GameCoordinator) -> Router {
    let state = AppState {
        coordinator: Arc::new(coordinator),
    };

    Router::new()
        .route("/api/games", post(start_game))
        .route("/api/games/latest/turns/{turn_count}", get(show_turn))
        .route("/api/games/latest/turns", post(register_turn))
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
        .with_state(state)
}

/// Wire shape of a turn of the latest game.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TurnResponse {
    turn_count: i32,
    /// 8x8 grid, `board[y][x]`, cells coded 0 = empty, 1 = dark, 2 = light.
    board: Vec<Vec<i32>>,
    next_disc: i32,
    winner_disc: Option<i32>,
}

/// Wire shape of a move registration.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterTurnRequest {
    turn_count: i32,
    #[serde(rename = "move")]
    mv: MoveBody,
}

#[derive(Debug, Deserialize)]
struct MoveBody {
    disc: i32,
    x: i32,
    y: i32,
}

/// Errors a handler can surface, mapped to a status and a JSON payload.
#[derive(Debug)]
enum ApiError {
    Engine(EngineError),
    BadRequest(String),
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        Self::Engine(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match &self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, "bad_request", message.clone())
            }
            ApiError::Engine(err) => {
                let (status, kind) = match err {
                    EngineError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
                    EngineError::IllegalMove { .. } => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "illegal_move")
                    }
                    EngineError::OutOfTurn { .. } => (StatusCode::CONFLICT, "out_of_turn"),
                    EngineError::Conflict { .. } => (StatusCode::CONFLICT, "conflict"),
                    EngineError::Storage { .. } => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "storage")
                    }
                };
                (status, kind, err.to_string())
            }
        };

        if status.is_server_error() {
            warn!(%status, kind, %message, "Request failed");
        } else {
            info!(%status, kind, %message, "Request rejected");
        }

        (status, Json(json!({ "type": kind, "message": message }))).into_response()
    }
}

/// Runs a blocking coordinator call off the async executor.
async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, EngineError> + Send + 'static,
{
    task::spawn_blocking(f)
        .await
        .map_err(|e| {
            ApiError::Engine(EngineError::storage(DbError::new(format!(
                "worker task failed: {}",
                e
            ))))
        })?
        .map_err(ApiError::Engine)
}

/// `POST /api/games` — starts a new game.
async fn start_game(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    let coordinator = state.coordinator.clone();
    run_blocking(move || coordinator.start_new_game()).await?;
    Ok(StatusCode::CREATED)
}

/// `GET /api/games/latest/turns/{turn_count}` — board at a turn of the
/// latest game.
async fn show_turn(
    State(state): State<AppState>,
    Path(turn_count): Path<u32>,
) -> Result<Json<TurnResponse>, ApiError> {
    let coordinator = state.coordinator.clone();
    let view = run_blocking(move || coordinator.find_turn(turn_count as i32)).await?;

    let board: Vec<Vec<i32>> = view
        .board()
        .rows()
        .iter()
        .map(|row| row.iter().map(|disc| disc.code()).collect())
        .collect();
    debug_assert_eq!(board.len(), BOARD_SIZE);

    Ok(Json(TurnResponse {
        turn_count: *view.turn_count(),
        board,
        next_disc: view.next_disc().code(),
        winner_disc: view.winner_disc().map(Disc::code),
    }))
}

/// `POST /api/games/latest/turns` — registers a move.
async fn register_turn(
    State(state): State<AppState>,
    Json(req): Json<RegisterTurnRequest>,
) -> Result<StatusCode, ApiError> {
    let disc = Disc::from_code(req.mv.disc)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    if !disc.is_player() {
        return Err(ApiError::BadRequest(
            "move.disc must be 1 (dark) or 2 (light)".to_string(),
        ));
    }

    let coordinator = state.coordinator.clone();
    let (turn_count, x, y) = (req.turn_count, req.mv.x, req.mv.y);
    run_blocking(move || coordinator.register_turn(turn_count, disc, x, y)).await?;
    Ok(StatusCode::CREATED)
}
