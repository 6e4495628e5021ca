//! BDD step definitions for the relay tree

use cucumber::{given, then, when};

use switch_control::types::CHANNEL_COUNT;
use switch_control::{SwitchControlError, SwitchKey, TreeState, Verification};

use crate::world::SwitchControlWorld;

fn confirmed() -> Verification {
    Verification::now(true)
}

#[given("a switch tree backend")]
fn backend_ready(world: &mut SwitchControlWorld) {
    world.backend = Some(Default::default());
}

#[given(expr = "the backend reports activated channel {int}")]
fn backend_channel(world: &mut SwitchControlWorld, channel: i64) {
    world.backend().set_tree(TreeState {
        activated_channel: channel,
        ..TreeState::default()
    });
}

#[given(expr = "the backend answers {string} with status {int}")]
fn backend_fails(world: &mut SwitchControlWorld, path: String, status: u16) {
    world.backend().fail(&path, status);
}

#[given("the panel is initialized")]
async fn panel_initialized(world: &mut SwitchControlWorld) {
    let result = world.panel().init().await;
    world.record(result);
    assert!(world.last_error.is_none(), "{:?}", world.last_error);
}

#[when("the panel initializes")]
async fn panel_initializes(world: &mut SwitchControlWorld) {
    let result = world.panel().init().await;
    world.record(result);
}

#[given("a tree observer")]
fn tree_observer(world: &mut SwitchControlWorld) {
    let rx = world.panel().tree().subscribe();
    world.observer = Some(rx);
}

#[when(expr = "the operator selects channel index {int}")]
async fn select_channel(world: &mut SwitchControlWorld, idx: i64) {
    world.before = Some(world.panel().tree().snapshot());
    let result = world.panel().tree().to_channel(idx, confirmed()).await;
    world.record(result);
}

#[when(expr = "the operator toggles {string}")]
async fn toggle(world: &mut SwitchControlWorld, key: String) {
    world.before = Some(world.panel().tree().snapshot());
    let result = world.panel().tree().toggle(&key, confirmed()).await;
    world.record(result);
}

#[when("the operator resets the tree")]
async fn reset(world: &mut SwitchControlWorld) {
    let result = world.panel().tree().reset_tree(confirmed()).await;
    world.record(result);
}

#[then(expr = "only button {int} is highlighted")]
fn only_button(world: &mut SwitchControlWorld, idx: usize) {
    let mut expected = [false; CHANNEL_COUNT];
    expected[idx] = true;
    assert_eq!(world.panel().tree().button_colors(), expected);
}

#[then("no button is highlighted")]
fn no_button(world: &mut SwitchControlWorld) {
    assert!(world.panel().tree().button_colors().iter().all(|c| !c));
}

#[then(expr = "the activated channel is {int}")]
fn activated_channel(world: &mut SwitchControlWorld, channel: i64) {
    assert_eq!(world.panel().tree().tree().activated_channel, channel);
}

#[then(expr = "relay {string} points left")]
fn relay_left(world: &mut SwitchControlWorld, key: String) {
    let key: SwitchKey = key.parse().unwrap();
    assert!(world.panel().tree().tree().switch(key).pos);
}

#[then(expr = "the backend received {string} with number {int}")]
fn backend_received(world: &mut SwitchControlWorld, path: String, number: i64) {
    let request = world.backend().last_request().expect("no request sent");
    assert!(request.url.ends_with(&path), "{}", request.url);
    let body = request.body.expect("request had no body");
    assert_eq!(body["number"], number);
    assert_eq!(body["verification"]["verified"], true);
}

#[then("the tree is unchanged")]
fn tree_unchanged(world: &mut SwitchControlWorld) {
    let before = world.before.clone().expect("no snapshot taken");
    assert_eq!(world.panel().tree().snapshot(), before);
}

#[then(expr = "the operation fails with status {int}")]
fn fails_with_status(world: &mut SwitchControlWorld, expected: u16) {
    match world.last_error.as_ref() {
        Some(SwitchControlError::Status { status, .. }) => assert_eq!(*status, expected),
        other => panic!("expected status error, got {:?}", other),
    }
}

#[then("the operation fails with an invalid relay key")]
fn fails_invalid_key(world: &mut SwitchControlWorld) {
    assert!(matches!(
        world.last_error,
        Some(SwitchControlError::InvalidSwitchKey(_))
    ));
}

#[then("the operation succeeds")]
fn succeeds(world: &mut SwitchControlWorld) {
    assert!(world.last_error.is_none(), "{:?}", world.last_error);
}

#[then("no request was sent after initialization")]
fn nothing_sent(world: &mut SwitchControlWorld) {
    let requests = world.backend().requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.ends_with("/initialize"));
}

#[then("the tree observer was notified")]
fn observer_notified(world: &mut SwitchControlWorld) {
    let rx = world.observer.as_mut().expect("no observer");
    assert!(rx.has_changed().unwrap());
    let snap = rx.borrow_and_update().clone();
    assert!(snap.initialized);
}

#[then("the panel is initialized with the backend tree")]
fn initialized_with_backend(world: &mut SwitchControlWorld) {
    assert!(world.panel().tree().is_initialized());
}

#[then("the panel is not initialized")]
fn not_initialized(world: &mut SwitchControlWorld) {
    assert!(!world.panel().tree().is_initialized());
}
