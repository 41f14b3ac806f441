// src/lib.rs

pub mod debounce;
pub mod error;
pub mod events;
pub mod http;
pub mod notifier;
pub mod plugin;
pub mod settings;
pub mod social;
pub mod template;

pub use error::{Error, Result};
pub use events::{dispatch, HostEvent, StreamListener};
pub use http::{DefaultHttpClient, HttpClient, HttpResponse};
pub use notifier::{LiveStartOutcome, Notifier, PostAttempt};
pub use settings::{Platform, PlatformSelection, Settings};
pub use social::SocialClient;
