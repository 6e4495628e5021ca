//! BDD step definitions for labels, title and settings

use cucumber::{given, then, when};

use switch_control::ButtonLabels;

use crate::world::SwitchControlWorld;

#[given(expr = "the backend title is {string}")]
fn backend_title(world: &mut SwitchControlWorld, title: String) {
    world.backend().set_title(&title);
}

#[given(expr = "the operator sets cryo voltage to {float}")]
fn set_cryo_voltage(world: &mut SwitchControlWorld, volts: f64) {
    world.panel().tree().edit_settings(|s| {
        s.cryo_mode = true;
        s.cryo_voltage = volts;
    });
}

#[when(expr = "the operator saves the title {string}")]
async fn save_title(world: &mut SwitchControlWorld, title: String) {
    world.panel().config().set_title(title);
    let result = world.panel().config().save_title().await;
    world.record(result);
}

#[when(expr = "the operator renames channel {int} to {string}")]
async fn rename_channel(world: &mut SwitchControlWorld, channel: usize, text: String) {
    let mut labels = world.panel().config().button_labels();
    *labels.get_mut(channel - 1).expect("channel out of range") = text;
    let result = world.panel().config().save_labels(labels).await;
    world.record(result);
}

#[when("the operator saves the settings")]
async fn save_settings(world: &mut SwitchControlWorld) {
    world.panel().tree().save_settings().await;
}

#[then(expr = "the panel title is {string}")]
fn panel_title(world: &mut SwitchControlWorld, title: String) {
    assert_eq!(world.panel().config().title(), title);
}

#[then(expr = "the backend stores the title {string}")]
fn stored_title(world: &mut SwitchControlWorld, title: String) {
    assert_eq!(world.backend().stored_title().as_deref(), Some(title.as_str()));
}

#[then(expr = "the settings request carried cryo voltage {float}")]
fn settings_request(world: &mut SwitchControlWorld, volts: f64) {
    let request = world.backend().last_request().expect("no request sent");
    assert!(request.url.ends_with("/settings"));
    let body = request.body.expect("request had no body");
    assert_eq!(body["cryo_mode"], true);
    assert_eq!(body["cryo_voltage"], volts);
    assert_eq!(body["regular_voltage"], 2.0);
    assert_eq!(body["tree_memory_mode"], false);
}

#[then(expr = "button {int} is labelled {string}")]
fn button_label(world: &mut SwitchControlWorld, channel: usize, text: String) {
    let labels = world.panel().config().button_labels();
    assert_eq!(labels.get(channel - 1), Some(text.as_str()));
}

#[then("the labels are the defaults")]
fn default_labels(world: &mut SwitchControlWorld) {
    assert_eq!(world.panel().config().button_labels(), ButtonLabels::default());
}

#[then(expr = "the local cryo voltage is {float}")]
fn local_cryo_voltage(world: &mut SwitchControlWorld, volts: f64) {
    assert_eq!(world.panel().tree().settings().cryo_voltage, volts);
}
