//! BDD step definitions for deployment context resolution

use cucumber::{given, then};

use switch_control::DeploymentContext;

use crate::world::SwitchControlWorld;

#[given("the panel runs inside the embedded shell")]
fn embedded(world: &mut SwitchControlWorld) {
    world.config.deployment = DeploymentContext::Embedded;
}

#[given(expr = "the panel is served from {string}")]
fn browser(world: &mut SwitchControlWorld, origin: String) {
    world.config.deployment = DeploymentContext::Browser;
    world.config.origin = origin;
}

#[then(expr = "requests for {string} go to {string}")]
fn resolves_to(world: &mut SwitchControlWorld, path: String, url: String) {
    assert_eq!(world.panel().api().transport().url(&path), url);
}

#[then(expr = "the first request went to {string}")]
fn first_request(world: &mut SwitchControlWorld, url: String) {
    let requests = world.backend().requests();
    assert_eq!(requests.first().map(|r| r.url.as_str()), Some(url.as_str()));
}
