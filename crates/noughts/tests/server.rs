//! Integration tests for the Noughts server, handler, and full connection flow.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use noughts::prelude::*;
use serde_json::{Value, json};
use tokio_tungstenite::tungstenite::Message;

// =========================================================================
// Helpers
// =========================================================================

type ClientWs = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// Starts a server on a random port; returns its address and stats store.
async fn start_server() -> (String, Arc<MemoryStatsStore>) {
    let store = Arc::new(MemoryStatsStore::new());
    let server = NoughtsServerBuilder::new()
        .bind("127.0.0.1:0")
        .build(Arc::clone(&store))
        .await
        .expect("server should build");

    let addr = server
        .local_addr()
        .expect("should have local addr")
        .to_string();

    tokio::spawn(async move {
        let _ = server.run().await;
    });

    (addr, store)
}

async fn connect(addr: &str) -> ClientWs {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("should connect");
    ws
}

async fn send(ws: &mut ClientWs, frame: Value) {
    ws.send(Message::Text(frame.to_string().into()))
        .await
        .expect("send should succeed");
}

/// Receives the next JSON event, failing the test after two seconds.
async fn recv(ws: &mut ClientWs) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("timed out waiting for an event")
            .expect("stream ended")
            .expect("websocket error");
        if let Message::Text(_) = msg {
            let text = msg.to_text().expect("text frame");
            return serde_json::from_str(text).expect("server sent valid JSON");
        }
    }
}

/// Asserts nothing arrives for a short while.
async fn assert_silent(ws: &mut ClientWs) {
    let next = tokio::time::timeout(Duration::from_millis(200), ws.next()).await;
    assert!(next.is_err(), "unexpected frame: {next:?}");
}

async fn join(ws: &mut ClientWs, name: &str) {
    send(ws, json!({"event": "join", "data": {"name": name}})).await;
    assert_eq!(recv(ws).await, json!({"event": "waiting", "data": {}}));
}

async fn play(ws: &mut ClientWs, game_id: &str, index: i64) {
    send(ws, json!({"event": "move", "data": {"gameId": game_id, "index": index}})).await;
}

/// One side of a started match.
struct Seat {
    ws: ClientWs,
    name: &'static str,
}

/// Pairs two fresh clients. Returns (X, O, game id) with both `state`
/// events already consumed.
async fn start_match(addr: &str) -> (Seat, Seat, String) {
    let mut ada = connect(addr).await;
    let mut grace = connect(addr).await;
    join(&mut ada, "ada").await;
    join(&mut grace, "grace").await;

    let ada_started = recv(&mut ada).await;
    let grace_started = recv(&mut grace).await;
    assert_eq!(ada_started["event"], "matchStarted");
    assert_eq!(grace_started["event"], "matchStarted");
    assert_eq!(ada_started["data"]["opponent"], "grace");
    assert_eq!(grace_started["data"]["opponent"], "ada");
    let game_id = ada_started["data"]["gameId"]
        .as_str()
        .expect("gameId is a string")
        .to_string();
    assert_eq!(grace_started["data"]["gameId"], game_id.as_str());

    let ada_state = recv(&mut ada).await;
    let grace_state = recv(&mut grace).await;
    assert_eq!(ada_state, grace_state);
    assert_eq!(ada_state["data"]["turn"], "X");

    let ada = Seat { ws: ada, name: "ada" };
    let grace = Seat {
        ws: grace,
        name: "grace",
    };
    if ada_started["data"]["youAre"] == "X" {
        assert_eq!(grace_started["data"]["youAre"], "O");
        (ada, grace, game_id)
    } else {
        assert_eq!(grace_started["data"]["youAre"], "X");
        (grace, ada, game_id)
    }
}

async fn wait_for_games(store: &MemoryStatsStore, name: &str, games: u64) -> PlayerStats {
    for _ in 0..100 {
        if let Some(stats) = store.player_stats(name).await.unwrap() {
            if stats.games() >= games {
                return stats;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("{name} never reached {games} recorded games");
}

// =========================================================================
// Matchmaking
// =========================================================================

#[tokio::test]
async fn test_two_joins_start_a_match() {
    let (addr, store) = start_server().await;
    let (_x, _o, game_id) = start_match(&addr).await;
    assert!(game_id.starts_with('m'));

    // Both names get registered with the store on join.
    let ada = wait_for_games(&store, "ada", 0).await;
    let grace = wait_for_games(&store, "grace", 0).await;
    assert_eq!(ada.games() + grace.games(), 0);
}

#[tokio::test]
async fn test_first_state_is_empty_board() {
    let (addr, _store) = start_server().await;
    let mut a = connect(&addr).await;
    let mut b = connect(&addr).await;
    join(&mut a, "ada").await;
    join(&mut b, "grace").await;
    recv(&mut a).await;

    let state = recv(&mut a).await;
    assert_eq!(state["event"], "state");
    assert_eq!(state["data"]["board"], Value::Array(vec![Value::Null; 9]));
}

#[tokio::test]
async fn test_join_twice_reports_already_joined() {
    let (addr, _store) = start_server().await;
    let mut ws = connect(&addr).await;
    join(&mut ws, "ada").await;

    send(&mut ws, json!({"event": "join", "data": {}})).await;

    assert_eq!(
        recv(&mut ws).await,
        json!({"event": "error", "data": {"message": "already joined"}})
    );
}

#[tokio::test]
async fn test_waiting_client_that_leaves_is_never_paired() {
    let (addr, _store) = start_server().await;
    let mut ghost = connect(&addr).await;
    join(&mut ghost, "ghost").await;
    ghost.close(None).await.unwrap();
    drop(ghost);
    // Let the disconnect reach the coordinator.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let mut a = connect(&addr).await;
    join(&mut a, "ada").await;
    assert_silent(&mut a).await;

    let mut b = connect(&addr).await;
    join(&mut b, "grace").await;
    let started = recv(&mut a).await;
    assert_eq!(started["data"]["opponent"], "grace");
}

// =========================================================================
// Moves
// =========================================================================

#[tokio::test]
async fn test_full_game_x_wins() {
    let (addr, store) = start_server().await;
    let (mut x, mut o, game_id) = start_match(&addr).await;

    for (to_x, index) in [(true, 0), (false, 3), (true, 1), (false, 4), (true, 2)] {
        let mover = if to_x { &mut x.ws } else { &mut o.ws };
        play(mover, &game_id, index).await;
        let x_state = recv(&mut x.ws).await;
        let o_state = recv(&mut o.ws).await;
        assert_eq!(x_state, o_state);
        assert_eq!(x_state["event"], "state");
    }

    let expected = json!({"event": "gameOver", "data": {"gameId": game_id, "result": "X"}});
    assert_eq!(recv(&mut x.ws).await, expected);
    assert_eq!(recv(&mut o.ws).await, expected);

    let winner = wait_for_games(&store, x.name, 1).await;
    let loser = wait_for_games(&store, o.name, 1).await;
    assert_eq!((winner.wins, winner.losses), (1, 0));
    assert_eq!((loser.wins, loser.losses), (0, 1));
}

#[tokio::test]
async fn test_full_game_draw() {
    let (addr, store) = start_server().await;
    let (mut x, mut o, game_id) = start_match(&addr).await;

    let moves = [
        (true, 0),
        (false, 1),
        (true, 2),
        (false, 4),
        (true, 3),
        (false, 5),
        (true, 7),
        (false, 6),
        (true, 8),
    ];
    for (to_x, index) in moves {
        let mover = if to_x { &mut x.ws } else { &mut o.ws };
        play(mover, &game_id, index).await;
        recv(&mut x.ws).await;
        recv(&mut o.ws).await;
    }

    let over = recv(&mut o.ws).await;
    assert_eq!(over["event"], "gameOver");
    assert_eq!(over["data"]["result"], "draw");

    let stats = wait_for_games(&store, x.name, 1).await;
    assert_eq!(stats.draws, 1);
}

#[tokio::test]
async fn test_move_out_of_turn_errors_sender_only() {
    let (addr, _store) = start_server().await;
    let (mut x, mut o, game_id) = start_match(&addr).await;

    play(&mut o.ws, &game_id, 4).await;

    assert_eq!(
        recv(&mut o.ws).await,
        json!({"event": "error", "data": {"message": "not your turn"}})
    );
    assert_silent(&mut x.ws).await;
}

#[tokio::test]
async fn test_move_validation_errors() {
    let (addr, _store) = start_server().await;
    let (mut x, mut o, game_id) = start_match(&addr).await;

    play(&mut x.ws, &game_id, 12).await;
    assert_eq!(recv(&mut x.ws).await["data"]["message"], "invalid position");

    play(&mut x.ws, &game_id, 4).await;
    recv(&mut x.ws).await;
    recv(&mut o.ws).await;

    play(&mut o.ws, &game_id, 4).await;
    assert_eq!(recv(&mut o.ws).await["data"]["message"], "cell occupied");
    assert_silent(&mut x.ws).await;
}

#[tokio::test]
async fn test_moves_after_game_over_are_ignored() {
    let (addr, _store) = start_server().await;
    let (mut x, mut o, game_id) = start_match(&addr).await;

    for (to_x, index) in [(true, 0), (false, 3), (true, 1), (false, 4), (true, 2)] {
        let mover = if to_x { &mut x.ws } else { &mut o.ws };
        play(mover, &game_id, index).await;
        recv(&mut x.ws).await;
        recv(&mut o.ws).await;
    }
    recv(&mut x.ws).await;
    recv(&mut o.ws).await;

    play(&mut o.ws, &game_id, 8).await;

    assert_silent(&mut o.ws).await;
    assert_silent(&mut x.ws).await;
}

#[tokio::test]
async fn test_invalid_message_is_reported_and_connection_survives() {
    let (addr, _store) = start_server().await;
    let mut ws = connect(&addr).await;

    ws.send(Message::Text("{not json".to_string().into()))
        .await
        .unwrap();
    let reply = recv(&mut ws).await;
    assert_eq!(reply["event"], "error");
    assert!(
        reply["data"]["message"]
            .as_str()
            .unwrap()
            .starts_with("invalid message")
    );

    send(&mut ws, json!({"event": "teleport", "data": {}})).await;
    assert_eq!(recv(&mut ws).await["event"], "error");

    // Still usable afterwards.
    join(&mut ws, "ada").await;
}

// =========================================================================
// Disconnects
// =========================================================================

#[tokio::test]
async fn test_disconnect_mid_match_forfeits_to_survivor() {
    let (addr, store) = start_server().await;
    let (mut x, mut o, game_id) = start_match(&addr).await;

    play(&mut x.ws, &game_id, 4).await;
    recv(&mut x.ws).await;
    recv(&mut o.ws).await;

    x.ws.close(None).await.unwrap();
    drop(x.ws);

    assert_eq!(
        recv(&mut o.ws).await,
        json!({"event": "gameOver", "data": {"gameId": game_id, "result": "O"}})
    );
    assert_silent(&mut o.ws).await;

    let survivor = wait_for_games(&store, o.name, 1).await;
    let departed = wait_for_games(&store, x.name, 1).await;
    assert_eq!(survivor.wins, 1);
    assert_eq!(departed.losses, 1);

    // The survivor's stale move goes nowhere.
    play(&mut o.ws, &game_id, 0).await;
    assert_silent(&mut o.ws).await;
}

#[tokio::test]
async fn test_survivor_can_join_again() {
    let (addr, _store) = start_server().await;
    let (x, mut o, _game_id) = start_match(&addr).await;
    drop(x.ws);
    assert_eq!(recv(&mut o.ws).await["event"], "gameOver");

    join(&mut o.ws, "grace").await;
    let mut newcomer = connect(&addr).await;
    join(&mut newcomer, "eve").await;

    let started = recv(&mut o.ws).await;
    assert_eq!(started["event"], "matchStarted");
    assert_eq!(started["data"]["opponent"], "eve");
}
