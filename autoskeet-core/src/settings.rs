// File: autoskeet-core/src/settings.rs

use std::fmt;
use std::str::FromStr;
use serde_json::{Map, Value};

pub const KEY_USERNAME: &str = "bsky_username";
pub const KEY_PASSWORD: &str = "bsky_password";
pub const KEY_MESSAGE_TEMPLATE: &str = "skeet_message_template";
pub const KEY_THUMBNAIL_URL: &str = "thumbnail_url";
pub const KEY_YOUTUBE_URL: &str = "youtube_link";
pub const KEY_TWITCH_URL: &str = "twitch_link";
pub const KEY_PLATFORM_SELECTION: &str = "platform_selection";
pub const KEY_LIVE_DESCRIPTION: &str = "live_description";

pub const DEFAULT_MESSAGE_TEMPLATE: &str =
    "hey cuties, i'm 🔴 live now! 🔴 | {title} - come hang out: {link}";
pub const DEFAULT_LIVE_DESCRIPTION: &str = "join me now for hangs, games, and good vibes 🍃";

/// A streaming platform an announcement can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    YouTube,
    Twitch,
}

impl Platform {
    /// Post title used for the link card and the `{title}` placeholder.
    pub fn live_title(&self) -> &'static str {
        match self {
            Platform::YouTube => "Live on YouTube!",
            Platform::Twitch => "Live on Twitch!",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::YouTube => write!(f, "youtube"),
            Platform::Twitch => write!(f, "twitch"),
        }
    }
}

/// Which platform links get announced. The host renders this as an editable
/// dropdown, so free text has to be representable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformSelection {
    YouTube,
    Twitch,
    Both,
    Unrecognized(String),
}

impl PlatformSelection {
    pub fn includes(&self, platform: Platform) -> bool {
        matches!(
            (self, platform),
            (PlatformSelection::Both, _)
                | (PlatformSelection::YouTube, Platform::YouTube)
                | (PlatformSelection::Twitch, Platform::Twitch)
        )
    }
}

impl fmt::Display for PlatformSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformSelection::YouTube => write!(f, "youtube"),
            PlatformSelection::Twitch => write!(f, "twitch"),
            PlatformSelection::Both => write!(f, "both"),
            PlatformSelection::Unrecognized(raw) => write!(f, "{}", raw),
        }
    }
}

impl From<&str> for PlatformSelection {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "youtube" => PlatformSelection::YouTube,
            "twitch" => PlatformSelection::Twitch,
            "both" => PlatformSelection::Both,
            _ => PlatformSelection::Unrecognized(s.to_string()),
        }
    }
}

impl FromStr for PlatformSelection {
    type Err = std::convert::Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(PlatformSelection::from(s))
    }
}

/// User-configured notifier settings.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub username: String,
    pub password: String,
    pub message_template: String,
    pub thumbnail_url: Option<String>,
    pub youtube_url: Option<String>,
    pub twitch_url: Option<String>,
    pub platform_selection: PlatformSelection,
    pub live_description: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            message_template: DEFAULT_MESSAGE_TEMPLATE.to_string(),
            thumbnail_url: None,
            youtube_url: None,
            twitch_url: None,
            platform_selection: PlatformSelection::YouTube,
            live_description: DEFAULT_LIVE_DESCRIPTION.to_string(),
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("message_template", &self.message_template)
            .field("thumbnail_url", &self.thumbnail_url)
            .field("youtube_url", &self.youtube_url)
            .field("twitch_url", &self.twitch_url)
            .field("platform_selection", &self.platform_selection)
            .field("live_description", &self.live_description)
            .finish()
    }
}

impl Settings {
    /// Rebuilds every field from the host's settings object. Missing or
    /// non-string entries read as empty strings; nothing is validated.
    pub fn from_host_data(data: &Map<String, Value>) -> Self {
        let get = |key: &str| -> String {
            data.get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Self {
            username: get(KEY_USERNAME),
            password: get(KEY_PASSWORD),
            message_template: get(KEY_MESSAGE_TEMPLATE),
            thumbnail_url: non_empty(get(KEY_THUMBNAIL_URL)),
            youtube_url: non_empty(get(KEY_YOUTUBE_URL)),
            twitch_url: non_empty(get(KEY_TWITCH_URL)),
            platform_selection: PlatformSelection::from(get(KEY_PLATFORM_SELECTION).as_str()),
            live_description: get(KEY_LIVE_DESCRIPTION),
        }
    }

    /// Serializes back into the host's key/value layout.
    pub fn to_host_data(&self) -> Map<String, Value> {
        let mut data = Map::new();
        let mut put = |key: &str, value: &str| {
            data.insert(key.to_string(), Value::String(value.to_string()));
        };
        put(KEY_USERNAME, &self.username);
        put(KEY_PASSWORD, &self.password);
        put(KEY_MESSAGE_TEMPLATE, &self.message_template);
        put(KEY_THUMBNAIL_URL, self.thumbnail_url.as_deref().unwrap_or_default());
        put(KEY_YOUTUBE_URL, self.youtube_url.as_deref().unwrap_or_default());
        put(KEY_TWITCH_URL, self.twitch_url.as_deref().unwrap_or_default());
        put(KEY_PLATFORM_SELECTION, &self.platform_selection.to_string());
        put(KEY_LIVE_DESCRIPTION, &self.live_description);
        data
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Starts from the defaults and overrides whatever `lookup` provides for
    /// the `AUTOSKEET_*` variables.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();
        if let Some(v) = lookup("AUTOSKEET_USERNAME") {
            settings.username = v;
        }
        if let Some(v) = lookup("AUTOSKEET_PASSWORD") {
            settings.password = v;
        }
        if let Some(v) = lookup("AUTOSKEET_MESSAGE_TEMPLATE") {
            settings.message_template = v;
        }
        if let Some(v) = lookup("AUTOSKEET_THUMBNAIL_URL") {
            settings.thumbnail_url = non_empty(v);
        }
        if let Some(v) = lookup("AUTOSKEET_YOUTUBE_URL") {
            settings.youtube_url = non_empty(v);
        }
        if let Some(v) = lookup("AUTOSKEET_TWITCH_URL") {
            settings.twitch_url = non_empty(v);
        }
        if let Some(v) = lookup("AUTOSKEET_PLATFORM") {
            settings.platform_selection = PlatformSelection::from(v.as_str());
        }
        if let Some(v) = lookup("AUTOSKEET_LIVE_DESCRIPTION") {
            settings.live_description = v;
        }
        settings
    }

    pub fn link_for(&self, platform: Platform) -> Option<&str> {
        match platform {
            Platform::YouTube => self.youtube_url.as_deref(),
            Platform::Twitch => self.twitch_url.as_deref(),
        }
    }

    /// Platforms to announce, in posting order, with their links. A selected
    /// platform without a link is skipped.
    pub fn targets(&self) -> Vec<(Platform, String)> {
        [Platform::YouTube, Platform::Twitch]
            .into_iter()
            .filter(|p| self.platform_selection.includes(*p))
            .filter_map(|p| self.link_for(p).map(|link| (p, link.to_string())))
            .collect()
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn host_data(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_from_host_data_overwrites_every_field() {
        let data = host_data(json!({
            "bsky_username": "streamer.bsky.social",
            "bsky_password": "app-password",
            "skeet_message_template": "{title} {link}",
            "thumbnail_url": "",
            "youtube_link": "https://youtube.com/live/x",
            "twitch_link": "https://twitch.tv/x",
            "platform_selection": "both",
            "live_description": "cozy games"
        }));

        let settings = Settings::from_host_data(&data);
        assert_eq!(settings.username, "streamer.bsky.social");
        assert_eq!(settings.password, "app-password");
        assert_eq!(settings.message_template, "{title} {link}");
        assert_eq!(settings.thumbnail_url, None);
        assert_eq!(settings.youtube_url.as_deref(), Some("https://youtube.com/live/x"));
        assert_eq!(settings.twitch_url.as_deref(), Some("https://twitch.tv/x"));
        assert_eq!(settings.platform_selection, PlatformSelection::Both);
        assert_eq!(settings.live_description, "cozy games");
    }

    #[test]
    fn test_missing_keys_read_as_empty() {
        let settings = Settings::from_host_data(&Map::new());
        assert_eq!(settings.message_template, "");
        assert_eq!(settings.live_description, "");
        assert_eq!(settings.platform_selection, PlatformSelection::Unrecognized(String::new()));
    }

    #[test]
    fn test_host_data_round_trip_keeps_keys() {
        let settings = Settings {
            thumbnail_url: Some("https://cdn.example.com/t.png".into()),
            ..Settings::default()
        };
        let data = settings.to_host_data();
        assert_eq!(data.len(), 8);
        assert_eq!(Settings::from_host_data(&data), settings);
    }

    #[test]
    fn test_platform_selection_parsing() {
        assert_eq!(PlatformSelection::from("YouTube"), PlatformSelection::YouTube);
        assert_eq!(PlatformSelection::from(" twitch "), PlatformSelection::Twitch);
        assert_eq!(PlatformSelection::from("Both"), PlatformSelection::Both);
        assert_eq!(
            PlatformSelection::from("kick"),
            PlatformSelection::Unrecognized("kick".into())
        );
    }

    #[test]
    fn test_targets_follow_selection_and_links() {
        let mut settings = Settings {
            youtube_url: Some("https://youtube.com/x".into()),
            twitch_url: Some("https://twitch.tv/x".into()),
            platform_selection: PlatformSelection::Both,
            ..Settings::default()
        };
        assert_eq!(
            settings.targets(),
            vec![
                (Platform::YouTube, "https://youtube.com/x".to_string()),
                (Platform::Twitch, "https://twitch.tv/x".to_string()),
            ]
        );

        settings.platform_selection = PlatformSelection::Twitch;
        assert_eq!(settings.targets(), vec![(Platform::Twitch, "https://twitch.tv/x".to_string())]);

        settings.twitch_url = None;
        assert!(settings.targets().is_empty());

        settings.platform_selection = PlatformSelection::Unrecognized("kick".into());
        assert!(settings.targets().is_empty());
    }

    #[test]
    fn test_from_lookup_overrides_defaults() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("AUTOSKEET_USERNAME", "streamer.bsky.social"),
            ("AUTOSKEET_PLATFORM", "twitch"),
            ("AUTOSKEET_TWITCH_URL", "https://twitch.tv/x"),
            ("AUTOSKEET_THUMBNAIL_URL", ""),
        ]);
        let settings = Settings::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(settings.username, "streamer.bsky.social");
        assert_eq!(settings.platform_selection, PlatformSelection::Twitch);
        assert_eq!(settings.twitch_url.as_deref(), Some("https://twitch.tv/x"));
        assert_eq!(settings.thumbnail_url, None);
        assert_eq!(settings.message_template, DEFAULT_MESSAGE_TEMPLATE);
    }

    #[test]
    fn test_debug_redacts_password() {
        let settings = Settings {
            password: "hunter2".into(),
            ..Settings::default()
        };
        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
