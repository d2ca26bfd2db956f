//! BDD step definitions for the device cards feature

use cucumber::{given, then, when};

use curing_dashboard::config::DeviceSource;
use curing_dashboard::state::{DashboardView, DeviceCards};
use curing_dashboard::view::{Indicator, SensorCardView};

use crate::world::CuringWorld;

fn sensor_card<'a>(view: &'a DashboardView, name: &str) -> &'a SensorCardView {
    match name {
        "beton" => &view.devices.beton,
        "povrsina" => &view.devices.povrsina,
        other => panic!("Unknown sensor: {}", other),
    }
}

#[given(expr = "the backend answers {string} with {string}")]
async fn backend_answers(world: &mut CuringWorld, path: String, body: String) {
    world.backend.set_document(&path, &body).await;
}

#[given("the backend is unreachable")]
fn backend_unreachable(world: &mut CuringWorld) {
    world.backend.set_unreachable(true);
}

#[given(expr = "the device source is {string}")]
fn device_source(world: &mut CuringWorld, source: String) {
    world.config.backend.device_source = match source.as_str() {
        "per_device" => DeviceSource::PerDevice,
        "combined" => DeviceSource::Combined,
        other => panic!("Unknown device source: {}", other),
    };
}

#[given("the devices were refreshed")]
async fn devices_were_refreshed(world: &mut CuringWorld) {
    world.dashboard().poller.refresh_devices().await;
}

#[when("the devices are refreshed")]
async fn refresh_devices(world: &mut CuringWorld) {
    world.dashboard().poller.refresh_devices().await;
}

#[then(expr = "the connection status shows {string}")]
async fn connection_status(world: &mut CuringWorld, expected: String) {
    let view = world.view().await;
    assert_eq!(view.connection.label(), expected);
}

#[then(expr = "the {string} sensor card shows temperature {string} and humidity {string}")]
async fn sensor_values(
    world: &mut CuringWorld,
    name: String,
    temperature: String,
    humidity: String,
) {
    let view = world.view().await;
    let card = sensor_card(&view, &name);
    assert_eq!(card.temperature, temperature);
    assert_eq!(card.humidity, humidity);
}

#[then(expr = "the {string} sensor card is offline")]
async fn sensor_offline(world: &mut CuringWorld, name: String) {
    let view = world.view().await;
    assert_eq!(sensor_card(&view, &name).indicator, Indicator::Offline);
}

#[then(expr = "the {string} sensor card is online")]
async fn sensor_online(world: &mut CuringWorld, name: String) {
    let view = world.view().await;
    assert_eq!(sensor_card(&view, &name).indicator, Indicator::Online);
}

#[then(expr = "the {string} battery shows {string} at level {string}")]
async fn battery_level(world: &mut CuringWorld, name: String, text: String, level: String) {
    let view = world.view().await;
    let battery = &sensor_card(&view, &name).battery;
    assert_eq!(battery.text, text);
    assert_eq!(battery.level.css_class(), level);
}

#[then(expr = "the pump card shows {string}")]
async fn pump_label(world: &mut CuringWorld, expected: String) {
    let view = world.view().await;
    assert_eq!(view.devices.pump.label, expected);
}

#[then(expr = "the heater card shows {string} with detail {string}")]
async fn heater_label(world: &mut CuringWorld, label: String, detail: String) {
    let view = world.view().await;
    assert_eq!(view.devices.heater.label, label);
    assert_eq!(view.devices.heater.detail, detail);
}

#[then("every device card is offline")]
async fn all_offline(world: &mut CuringWorld) {
    let view = world.view().await;
    assert_eq!(view.devices, DeviceCards::offline());
}
