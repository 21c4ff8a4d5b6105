use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State as AxumState,
    },
    http::{header, Method, StatusCode},
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use futures::{
    stream::{SplitSink, SplitStream},
    SinkExt, StreamExt,
};
use poker_execution::{ChannelSink, Game, PlayerStore, TexasHoldem, TokioAlerter};
use std::{sync::Arc, time::Duration};
use tokio::task;
use tower_http::cors::{Any, CorsLayer};

mod config;

pub use config::{Config, ConfigError, ValidatedConfig};

/// Page served at `/game` unless the configuration supplies another one.
pub const GAME_PAGE: &str = include_str!("game.html");

/// Sent over the game socket when the first message is not a number.
pub const BAD_PLAYER_INPUT_MSG: &str =
    "Bad value received for number of players, please try again with a number";

#[derive(Clone)]
struct State {
    store: Arc<dyn PlayerStore>,
    page: Arc<str>,
    blind_unit: Duration,
}

pub struct Api {
    state: State,
}

impl Api {
    /// Serve `store`, with `page` at `/game` and games whose blinds rise every
    /// `5 + players` units of `blind_unit`.
    pub fn new(
        store: Arc<dyn PlayerStore>,
        page: impl Into<Arc<str>>,
        blind_unit: Duration,
    ) -> Self {
        Self {
            state: State {
                store,
                page: page.into(),
                blind_unit,
            },
        }
    }

    pub fn router(&self) -> Router {
        // Configure CORS
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]);

        Router::new()
            .route("/league", get(league))
            .route("/players/:name", get(get_score).post(post_win))
            .route("/game", get(game_page))
            .route("/ws", get(game_ws))
            .layer(cors)
            .with_state(self.state.clone())
    }
}

async fn league(AxumState(state): AxumState<State>) -> impl IntoResponse {
    Json(state.store.league())
}

async fn get_score(
    AxumState(state): AxumState<State>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    let score = state.store.player_score(&name);
    let status = if score == 0 {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };
    (status, score.to_string())
}

async fn post_win(AxumState(state): AxumState<State>, Path(name): Path<String>) -> StatusCode {
    // Persisting blocks on disk I/O
    let store = state.store.clone();
    let player = name.clone();
    match task::spawn_blocking(move || store.record_win(&player)).await {
        Ok(Ok(())) => StatusCode::ACCEPTED,
        Ok(Err(e)) => {
            tracing::error!(player = %name, error = %e, "failed to record win");
            StatusCode::INTERNAL_SERVER_ERROR
        }
        Err(e) => {
            tracing::error!(player = %name, error = ?e, "record win task failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

async fn game_page(AxumState(state): AxumState<State>) -> impl IntoResponse {
    Html(state.page.to_string())
}

async fn game_ws(AxumState(state): AxumState<State>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_game_ws(socket, state))
}

/// Wait for the next text frame, answering pings on the way.
async fn next_text(
    sender: &mut SplitSink<WebSocket, Message>,
    receiver: &mut SplitStream<WebSocket>,
) -> Option<String> {
    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => return Some(text),
            Ok(Message::Ping(data)) => {
                if sender.send(Message::Pong(data)).await.is_err() {
                    tracing::warn!("Failed to send pong, client disconnected");
                    return None;
                }
            }
            Ok(Message::Close(_)) => {
                tracing::info!("Client closed game WebSocket connection");
                return None;
            }
            Err(e) => {
                tracing::warn!("Game WebSocket error: {:?}", e);
                return None;
            }
            _ => {} // Ignore other message types
        }
    }
    None
}

/// One game per connection: the first text frame is the player count, the
/// next one the winner. Blind alerts are streamed back as text frames until
/// the winner arrives.
async fn handle_game_ws(socket: WebSocket, state: State) {
    tracing::info!("Game WebSocket connected");
    let (mut sender, mut receiver) = socket.split();

    let Some(players) = next_text(&mut sender, &mut receiver).await else {
        let _ = sender.close().await;
        return;
    };
    let players = match players.trim().parse::<i64>() {
        Ok(players) => players,
        Err(_) => {
            tracing::warn!(input = %players, "Rejecting non-numeric player count");
            let _ = sender
                .send(Message::Text(BAD_PLAYER_INPUT_MSG.to_string()))
                .await;
            let _ = sender.close().await;
            return;
        }
    };

    let game = Arc::new(TexasHoldem::with_unit(
        TokioAlerter::current(),
        state.store.clone(),
        state.blind_unit,
    ));
    let (sink, mut alerts) = ChannelSink::channel();
    game.start(players, Arc::new(sink));

    loop {
        tokio::select! {
            // Forward blind alerts
            Some(alert) = alerts.recv() => {
                if sender.send(Message::Text(alert)).await.is_err() {
                    tracing::warn!("Failed to send blind alert, client disconnected");
                    break;
                }
            }
            // Wait for the winner
            winner = next_text(&mut sender, &mut receiver) => {
                let Some(winner) = winner else {
                    break;
                };
                let winner = winner.trim().to_string();
                let session = game.clone();
                let name = winner.clone();
                match task::spawn_blocking(move || session.finish(&name)).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        tracing::error!(winner = %winner, error = %e, "Failed to record winner");
                    }
                    Err(e) => {
                        tracing::error!(winner = %winner, error = ?e, "Finish task failed");
                    }
                }
                break;
            }
        }
    }
    tracing::info!("Game WebSocket handler exiting");
    let _ = sender.close().await;
}
