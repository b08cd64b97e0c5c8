//! Integration tests for the session actor, on paused Tokio time.
//!
//! Tick interval is 1s, the discussion window 3 ticks and the guess window
//! 2 ticks, so a game started at t=0 opens its guess window at t=3s and
//! returns to discussion at t=5s. Checks sit half a tick away from any tick.

use std::time::Duration;

use ghostguess_game::GameConfig;
use ghostguess_protocol::{
    ClientCommand, LifeState, Phase, PlayerId, ServerEvent, SessionSnapshot,
};
use ghostguess_room::{RoomConfig, RoomError, RoomHandle, spawn_room};
use ghostguess_tick::TickConfig;
use tokio::sync::mpsc;

const A: PlayerId = PlayerId(1);
const B: PlayerId = PlayerId(2);
const C: PlayerId = PlayerId(3);

// =========================================================================
// Helpers
// =========================================================================

fn config() -> RoomConfig {
    RoomConfig {
        tick: TickConfig::with_interval(Duration::from_secs(1)),
        game: GameConfig {
            main_window_ticks: 3,
            guess_window_ticks: 2,
            ..GameConfig::default()
        },
        seed: Some(7),
        ..RoomConfig::default()
    }
}

async fn connect(room: &RoomHandle, id: PlayerId) -> mpsc::UnboundedReceiver<ServerEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    room.connect(id, tx).await.unwrap();
    rx
}

async fn join(room: &RoomHandle, id: PlayerId, name: &str) {
    room.send_command(id, ClientCommand::Join { name: name.into() })
        .await
        .unwrap();
}

async fn send(room: &RoomHandle, id: PlayerId, cmd: ClientCommand) {
    room.send_command(id, cmd).await.unwrap();
}

async fn snapshot(room: &RoomHandle) -> SessionSnapshot {
    room.snapshot().await.unwrap()
}

async fn number_of(room: &RoomHandle, id: PlayerId) -> i64 {
    let snap = snapshot(room).await;
    i64::from(snap.player(id).unwrap().secret_number.unwrap())
}

fn drain(rx: &mut mpsc::UnboundedReceiver<ServerEvent>) -> Vec<ServerEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

async fn sleep_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

// =========================================================================
// Connections
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_connect_sends_current_state() {
    let room = spawn_room(config());
    let mut rx = connect(&room, A).await;

    match rx.try_recv() {
        Ok(ServerEvent::State { snapshot }) => {
            assert!(snapshot.players.is_empty());
            assert_eq!(snapshot.phase, Phase::Lobby);
        }
        other => panic!("expected initial state, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_connect_twice_is_rejected() {
    let room = spawn_room(config());
    let _rx = connect(&room, A).await;

    let (tx, _rx2) = mpsc::unbounded_channel();
    let result = room.connect(A, tx).await;
    assert!(matches!(result, Err(RoomError::AlreadyConnected(id)) if id == A));
}

#[tokio::test(start_paused = true)]
async fn test_broadcasts_reach_connections_that_have_not_joined() {
    let room = spawn_room(config());
    let _a = connect(&room, A).await;
    let mut watcher = connect(&room, C).await;
    drain(&mut watcher);

    join(&room, A, "ana").await;
    snapshot(&room).await;

    let events = drain(&mut watcher);
    assert_eq!(events.len(), 1);
    match &events[0] {
        ServerEvent::State { snapshot } => assert_eq!(snapshot.players.len(), 1),
        other => panic!("expected state, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_command_from_unknown_connection_is_ignored() {
    let room = spawn_room(config());
    join(&room, PlayerId(99), "ghost").await;
    assert!(snapshot(&room).await.players.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_disconnect_hands_host_to_next_player() {
    let room = spawn_room(config());
    let _a = connect(&room, A).await;
    let mut b = connect(&room, B).await;
    join(&room, A, "ana").await;
    join(&room, B, "bo").await;
    drain(&mut b);

    room.disconnect(A).await.unwrap();
    let snap = snapshot(&room).await;
    assert_eq!(snap.host, Some(B));
    assert_eq!(snap.players.len(), 1);
    assert_eq!(drain(&mut b).len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_closed_receiver_does_not_stall_the_room() {
    let room = spawn_room(config());
    let _a = connect(&room, A).await;
    let b = connect(&room, B).await;
    drop(b);

    join(&room, A, "ana").await;
    assert_eq!(snapshot(&room).await.players.len(), 1);
}

// =========================================================================
// Countdown
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_countdown_walks_main_guess_main() {
    let room = spawn_room(config());
    let _a = connect(&room, A).await;
    let _b = connect(&room, B).await;
    join(&room, A, "ana").await;
    join(&room, B, "bo").await;
    send(&room, A, ClientCommand::StartGame).await;

    let snap = snapshot(&room).await;
    assert_eq!(snap.phase, Phase::Main);
    assert_eq!(snap.time_left, 3);

    sleep_ms(3500).await;
    let snap = snapshot(&room).await;
    assert_eq!(snap.phase, Phase::Guess);
    assert_eq!(snap.time_left, 2);

    let n = number_of(&room, A).await;
    send(&room, A, ClientCommand::Guess { value: n }).await;

    sleep_ms(2000).await;
    let snap = snapshot(&room).await;
    assert_eq!(snap.phase, Phase::Main);
    assert_eq!(snap.time_left, 3);
    assert_eq!(snap.round, 1);

    assert_eq!(snap.player(A).unwrap().life, LifeState::Alive);
    let b = snap.player(B).unwrap();
    assert_eq!(b.life, LifeState::Ghost);
    assert_eq!(b.ghost_target, Some(A));
}

#[tokio::test(start_paused = true)]
async fn test_every_tick_broadcasts_time_left() {
    let room = spawn_room(config());
    let mut a = connect(&room, A).await;
    join(&room, A, "ana").await;
    send(&room, A, ClientCommand::StartGame).await;
    snapshot(&room).await;
    drain(&mut a);

    sleep_ms(2500).await;
    let times: Vec<u32> = drain(&mut a)
        .into_iter()
        .filter_map(|e| match e {
            ServerEvent::State { snapshot } => Some(snapshot.time_left),
            _ => None,
        })
        .collect();
    assert_eq!(times, vec![2, 1]);
}

#[tokio::test(start_paused = true)]
async fn test_force_advance_restarts_the_clock() {
    let room = spawn_room(config());
    let _a = connect(&room, A).await;
    join(&room, A, "ana").await;
    send(&room, A, ClientCommand::StartGame).await;

    sleep_ms(2500).await;
    assert_eq!(snapshot(&room).await.time_left, 1);

    send(&room, A, ClientCommand::ForceAdvance).await;
    let snap = snapshot(&room).await;
    assert_eq!(snap.phase, Phase::Guess);
    assert_eq!(snap.time_left, 2);

    // t=3.2s: the discussion clock would have ticked at 3s.
    sleep_ms(700).await;
    assert_eq!(snapshot(&room).await.time_left, 2);

    // t=3.7s: first guess-window tick landed at 3.5s.
    sleep_ms(500).await;
    assert_eq!(snapshot(&room).await.time_left, 1);
}

#[tokio::test(start_paused = true)]
async fn test_lobby_has_no_clock() {
    let room = spawn_room(config());
    let mut a = connect(&room, A).await;
    join(&room, A, "ana").await;
    snapshot(&room).await;
    drain(&mut a);

    sleep_ms(10_000).await;
    assert!(drain(&mut a).is_empty());
    assert_eq!(snapshot(&room).await.time_left, 0);
}

// =========================================================================
// Host actions
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_reset_notifies_everyone_and_stops_the_clock() {
    let room = spawn_room(config());
    let mut a = connect(&room, A).await;
    let mut b = connect(&room, B).await;
    join(&room, A, "ana").await;
    join(&room, B, "bo").await;
    send(&room, A, ClientCommand::StartGame).await;
    sleep_ms(1500).await;
    drain(&mut a);
    drain(&mut b);

    send(&room, A, ClientCommand::Reset).await;
    let snap = snapshot(&room).await;
    assert!(snap.players.is_empty());
    assert_eq!(snap.phase, Phase::Lobby);
    assert_eq!(snap.round, 1);
    assert!(!snap.started);

    for rx in [&mut a, &mut b] {
        let events = drain(rx);
        assert_eq!(events[0], ServerEvent::ResetAll);
        assert!(matches!(events[1], ServerEvent::State { .. }));
    }

    sleep_ms(5000).await;
    assert!(drain(&mut a).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_kicked_player_is_told_and_stays_connected() {
    let room = spawn_room(config());
    let _a = connect(&room, A).await;
    let mut b = connect(&room, B).await;
    join(&room, A, "ana").await;
    join(&room, B, "bo").await;
    snapshot(&room).await;
    drain(&mut b);

    send(&room, A, ClientCommand::Kick { target: B }).await;
    let snap = snapshot(&room).await;
    assert!(snap.player(B).is_none());

    let events = drain(&mut b);
    assert_eq!(events[0], ServerEvent::Kicked);
    assert!(matches!(events[1], ServerEvent::State { .. }));

    // Still connected: can join again under a new name.
    join(&room, B, "bo2").await;
    assert!(snapshot(&room).await.player(B).is_some());
}

#[tokio::test(start_paused = true)]
async fn test_revival_is_sent_only_to_the_revived_player() {
    let room = spawn_room(config());
    let mut a = connect(&room, A).await;
    let mut b = connect(&room, B).await;
    join(&room, A, "ana").await;
    join(&room, B, "bo").await;
    send(&room, A, ClientCommand::StartGame).await;

    send(&room, A, ClientCommand::ForceAdvance).await;
    let n = number_of(&room, A).await;
    send(&room, A, ClientCommand::Guess { value: n }).await;
    send(&room, B, ClientCommand::Guess { value: 0 }).await;
    send(&room, A, ClientCommand::AdvanceRound).await;

    send(&room, A, ClientCommand::ForceAdvance).await;
    send(&room, A, ClientCommand::Guess { value: 0 }).await;
    snapshot(&room).await;
    drain(&mut a);
    drain(&mut b);

    send(&room, A, ClientCommand::AdvanceRound).await;
    let snap = snapshot(&room).await;
    assert_eq!(snap.round, 3);
    let revived = snap.player(B).unwrap();
    assert_eq!(revived.life, LifeState::Alive);
    assert!(revived.ever_revived);

    assert_eq!(drain(&mut b)[0], ServerEvent::Revived);
    assert!(!drain(&mut a).contains(&ServerEvent::Revived));
}

// =========================================================================
// Shutdown
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_shutdown_makes_handle_unavailable() {
    let room = spawn_room(config());
    room.shutdown().await.unwrap();
    sleep_ms(10).await;

    assert!(room.is_closed());
    assert!(matches!(room.snapshot().await, Err(RoomError::Unavailable)));
}
