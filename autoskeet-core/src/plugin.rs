// src/plugin.rs

//! Descriptor a host uses to present the notifier: the description line and
//! the settings panel layout.

use serde::{Deserialize, Serialize};
use crate::settings::{
    KEY_LIVE_DESCRIPTION, KEY_MESSAGE_TEMPLATE, KEY_PASSWORD, KEY_PLATFORM_SELECTION,
    KEY_THUMBNAIL_URL, KEY_TWITCH_URL, KEY_USERNAME, KEY_YOUTUBE_URL,
};

pub const DESCRIPTION: &str = "Automatically skeet to BlueSky when going live on YouTube or Twitch.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOption {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PropertyKind {
    Text,
    Password,
    Multiline,
    /// Dropdown that also accepts typed values.
    EditableList { options: Vec<ListOption> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingProperty {
    pub key: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: PropertyKind,
}

impl SettingProperty {
    fn new(key: &str, label: &str, kind: PropertyKind) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind,
        }
    }
}

/// Settings panel, in display order.
pub fn settings_schema() -> Vec<SettingProperty> {
    let platform_options = [("YouTube", "youtube"), ("Twitch", "twitch"), ("Both", "both")]
        .into_iter()
        .map(|(label, value)| ListOption {
            label: label.to_string(),
            value: value.to_string(),
        })
        .collect();

    vec![
        SettingProperty::new(KEY_USERNAME, "BlueSky Username", PropertyKind::Text),
        SettingProperty::new(KEY_PASSWORD, "BlueSky Password", PropertyKind::Password),
        SettingProperty::new(KEY_MESSAGE_TEMPLATE, "Skeet Message Template", PropertyKind::Multiline),
        SettingProperty::new(KEY_THUMBNAIL_URL, "Thumbnail URL (optional)", PropertyKind::Text),
        SettingProperty::new(KEY_YOUTUBE_URL, "YouTube Stream URL", PropertyKind::Text),
        SettingProperty::new(KEY_TWITCH_URL, "Twitch Stream URL", PropertyKind::Text),
        SettingProperty::new(KEY_LIVE_DESCRIPTION, "Live Stream Description", PropertyKind::Multiline),
        SettingProperty::new(
            KEY_PLATFORM_SELECTION,
            "Platform Selection",
            PropertyKind::EditableList { options: platform_options },
        ),
    ]
}
