//! The built-in demo fleet.

use hmbridge_domain::device::RemoteDevice;
use hmbridge_domain::node::ChannelBinding;
use hmbridge_domain::value::Value;

/// A device plus the initial `(channel, node, value)` readings the
/// simulated paramsets start from.
pub(crate) type SeededDevice = (RemoteDevice, Vec<(u32, &'static str, Value)>);

fn common_attributes(device: &mut RemoteDevice) {
    device
        .attribute_nodes
        .insert("UNREACH".to_string(), ChannelBinding::Fixed(0));
    device
        .attribute_nodes
        .insert("RSSI_DEVICE".to_string(), ChannelBinding::Fixed(0));
}

fn desk_switch() -> SeededDevice {
    let mut device = RemoteDevice::new("NEQ0123456", "Desk Switch", "Switch");
    common_attributes(&mut device);
    device
        .write_nodes
        .insert("STATE".to_string(), ChannelBinding::ChannelBound);
    let seeds = vec![
        (0, "UNREACH", Value::Bool(false)),
        (0, "RSSI_DEVICE", Value::Int(-62)),
        (1, "STATE", Value::Bool(false)),
    ];
    (device, seeds)
}

fn living_room_dimmer() -> SeededDevice {
    let mut device = RemoteDevice::new("OEQ0775472", "Living Room Dimmer", "Dimmer");
    common_attributes(&mut device);
    device
        .write_nodes
        .insert("LEVEL".to_string(), ChannelBinding::ChannelBound);
    let seeds = vec![
        (0, "UNREACH", Value::Bool(false)),
        (0, "RSSI_DEVICE", Value::Int(-71)),
        (1, "LEVEL", Value::Float(0.0)),
    ];
    (device, seeds)
}

fn hall_motion() -> SeededDevice {
    let mut device = RemoteDevice::new("LEQ1335596", "Hall Motion", "Motion");
    common_attributes(&mut device);
    device
        .attribute_nodes
        .insert("LOWBAT".to_string(), ChannelBinding::Fixed(0));
    device
        .binary_nodes
        .insert("MOTION".to_string(), ChannelBinding::ChannelBound);
    device
        .sensor_nodes
        .insert("BRIGHTNESS".to_string(), ChannelBinding::ChannelBound);
    let seeds = vec![
        (0, "UNREACH", Value::Bool(false)),
        (0, "RSSI_DEVICE", Value::Int(-80)),
        (0, "LOWBAT", Value::Bool(false)),
        (1, "MOTION", Value::Bool(false)),
        (1, "BRIGHTNESS", Value::Int(112)),
    ];
    (device, seeds)
}

fn wall_remote() -> SeededDevice {
    let mut device = RemoteDevice::new("KEQ0839576", "Wall Remote", "Remote");
    common_attributes(&mut device);
    device.element_count = 4;
    for node in ["PRESS_SHORT", "PRESS_LONG"] {
        device
            .event_nodes
            .insert(node.to_string(), ChannelBinding::ChannelBound);
        device
            .action_nodes
            .insert(node.to_string(), ChannelBinding::ChannelBound);
    }
    let seeds = vec![
        (0, "UNREACH", Value::Bool(false)),
        (0, "RSSI_DEVICE", Value::Int(-58)),
    ];
    (device, seeds)
}

/// A switch, a dimmer, a motion sensor, and a four-key remote.
pub(crate) fn demo_fleet() -> Vec<SeededDevice> {
    vec![desk_switch(), living_room_dimmer(), hall_motion(), wall_remote()]
}
