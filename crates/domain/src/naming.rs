//! Entity naming rules.

/// Compose the display name for an entity from its device name, channel,
/// and optional parameter.
///
/// A single-channel device without a parameter keeps its plain name; extra
/// channels and parameters are appended space-separated, channel first.
#[must_use]
pub fn compose_name(base: &str, channel: u32, param: Option<&str>) -> String {
    match (channel, param) {
        (1, None) => base.to_string(),
        (channel, None) => format!("{base} {channel}"),
        (1, Some(param)) => format!("{base} {param}"),
        (channel, Some(param)) => format!("{base} {channel} {param}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_keep_plain_name_for_first_channel_without_param() {
        assert_eq!(compose_name("Lamp", 1, None), "Lamp");
    }

    #[test]
    fn should_append_channel_for_higher_channels() {
        assert_eq!(compose_name("Lamp", 2, None), "Lamp 2");
    }

    #[test]
    fn should_append_param_on_first_channel() {
        assert_eq!(compose_name("Lamp", 1, Some("BRIGHTNESS")), "Lamp BRIGHTNESS");
    }

    #[test]
    fn should_append_channel_then_param() {
        assert_eq!(
            compose_name("Lamp", 2, Some("BRIGHTNESS")),
            "Lamp 2 BRIGHTNESS"
        );
    }
}
