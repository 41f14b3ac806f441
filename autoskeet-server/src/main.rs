use clap::Parser;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use anyhow::Context;
use futures_util::{Stream, StreamExt};
use serde_json::{Map, Value};
use tracing::{error, info, warn};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, EnvFilter};

use autoskeet_bsky::client::DEFAULT_SERVICE;
use autoskeet_bsky::{BskyClient, BskyConfig};
use autoskeet_core::{dispatch, plugin, DefaultHttpClient, HostEvent, Notifier, Settings};
use autoskeet_obs::{ObsClient, ObsInstance};

mod reload;
use reload::ReloadSignal;

#[derive(Parser, Debug, Clone)]
#[command(name = "autoskeet")]
#[command(author, version, about = "autoskeet - skeet to BlueSky when the stream goes live")]
struct Args {
    /// obs-websocket host
    #[arg(long, default_value = "127.0.0.1")]
    obs_host: String,

    /// obs-websocket port
    #[arg(long, default_value_t = 4455)]
    obs_port: u16,

    #[arg(long)]
    obs_password: Option<String>,

    /// JSON file holding the plugin settings as the host stores them.
    /// Without it, settings come from AUTOSKEET_* environment variables.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// BlueSky PDS base URL
    #[arg(long, default_value = DEFAULT_SERVICE)]
    service: String,

    /// Log posts instead of creating them
    #[arg(long, default_value = "false")]
    dry_run: bool,

    /// Print the plugin description and settings schema as JSON, then exit
    #[arg(long, default_value = "false")]
    print_schema: bool,
}

fn init_tracing() -> anyhow::Result<()> {
    tracing_log::LogTracer::init()?;
    let filter = EnvFilter::from_default_env()
        .add_directive("autoskeet=info".parse::<Directive>()?);
    let sub = fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(sub)?;
    Ok(())
}

/// Reads host settings data. Accepts either the bare key/value object or
/// one nested under `"settings"`, the way OBS stores script settings.
fn load_settings_file(path: &Path) -> anyhow::Result<Settings> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading settings file {}", path.display()))?;
    let mut data: Map<String, Value> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing settings file {}", path.display()))?;

    if let Some(Value::Object(nested)) = data.remove("settings") {
        data = nested;
    }
    Ok(Settings::from_host_data(&data))
}

fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    match path {
        Some(path) => load_settings_file(path),
        None => Ok(Settings::from_env()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    if args.print_schema {
        let descriptor = serde_json::json!({
            "description": plugin::DESCRIPTION,
            "properties": plugin::settings_schema(),
        });
        println!("{}", serde_json::to_string_pretty(&descriptor)?);
        return Ok(());
    }

    init_tracing()?;
    info!("autoskeet starting. obs={}:{}, service={}, dry_run={}",
          args.obs_host, args.obs_port, args.service, args.dry_run);

    let bsky = BskyClient::new(
        BskyConfig::default()
            .with_service(&args.service)
            .with_dry_run(args.dry_run),
    )?;
    let mut notifier = Notifier::new(
        Settings::default(),
        Arc::new(bsky),
        Arc::new(DefaultHttpClient::new()),
    );
    notifier.update_settings(load_settings(args.settings.as_deref())?);

    let mut obs = ObsClient::new(ObsInstance {
        host: args.obs_host.clone(),
        port: args.obs_port,
        password: args.obs_password.clone(),
    });
    obs.connect().await?;
    match obs.get_version().await {
        Ok(version) => info!("{}", version),
        Err(e) => warn!("Could not query OBS version: {}", e),
    }

    let result = match obs.host_events() {
        Ok(events) => {
            run_event_loop(
                events,
                tokio::signal::ctrl_c(),
                &mut notifier,
                args.settings.as_deref(),
            )
            .await
        }
        Err(e) => Err(e.into()),
    };
    obs.disconnect().await;
    if let Err(e) = &result {
        error!("Event loop error: {:?}", e);
    }
    info!("autoskeet finished. Goodbye!");
    result
}

/// Feeds host events to the notifier until the host exits, the stream ends
/// or `shutdown` resolves. `shutdown` is polled for the whole run, including
/// while an announcement is in flight.
async fn run_event_loop<E, S>(
    events: E,
    shutdown: S,
    notifier: &mut Notifier,
    settings_path: Option<&Path>,
) -> anyhow::Result<()>
where
    E: Stream<Item = HostEvent>,
    S: Future<Output = std::io::Result<()>>,
{
    tokio::pin!(events);
    tokio::pin!(shutdown);
    let mut reload = ReloadSignal::new()?;

    info!("Waiting for OBS to start streaming");
    loop {
        tokio::select! {
            next = events.next() => {
                let Some(event) = next else {
                    warn!("OBS event stream closed");
                    break;
                };
                if event == HostEvent::Exit {
                    info!("OBS is shutting down");
                    break;
                }
                dispatch(&event, notifier).await;
            }
            _ = reload.recv() => {
                match load_settings(settings_path) {
                    Ok(settings) => {
                        info!("Settings reloaded");
                        notifier.update_settings(settings);
                    }
                    Err(e) => error!("Failed to reload settings: {:?}", e),
                }
            }
            result = &mut shutdown => {
                match result {
                    Ok(()) => info!("Ctrl-C received, shutting down"),
                    Err(e) => error!("Shutdown signal failed: {}", e),
                }
                break;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use autoskeet_bsky::{BlobRef, ExternalEmbed, PostReference};
    use autoskeet_core::{Error, PlatformSelection, SocialClient};
    use futures_util::stream;
    use std::io::Write;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::oneshot;

    /// Fires the shutdown channel from inside `login`, i.e. mid-announcement.
    struct ShutdownDuringLogin {
        trigger: Mutex<Option<oneshot::Sender<()>>>,
    }

    #[async_trait]
    impl SocialClient for ShutdownDuringLogin {
        async fn login(&self, _username: &str, _password: &str) -> Result<(), Error> {
            if let Some(tx) = self.trigger.lock().unwrap().take() {
                let _ = tx.send(());
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
            Err(Error::Auth("rejected".into()))
        }

        async fn upload_blob(&self, _data: Vec<u8>, _mime_type: &str) -> Result<BlobRef, Error> {
            Err(Error::Auth("not logged in".into()))
        }

        async fn send_post(&self, _text: &str, _embed: ExternalEmbed) -> Result<PostReference, Error> {
            Err(Error::Auth("not logged in".into()))
        }
    }

    fn test_notifier(social: Arc<dyn SocialClient>) -> Notifier {
        let settings = Settings {
            username: "streamer.bsky.social".into(),
            password: "app-password".into(),
            youtube_url: Some("https://youtube.com/x".into()),
            platform_selection: PlatformSelection::YouTube,
            ..Settings::default()
        };
        Notifier::new(settings, social, Arc::new(DefaultHttpClient::new()))
    }

    #[tokio::test]
    async fn test_shutdown_during_announcement_stops_loop() -> anyhow::Result<()> {
        let (tx, rx) = oneshot::channel();
        let social = Arc::new(ShutdownDuringLogin {
            trigger: Mutex::new(Some(tx)),
        });
        let mut notifier = test_notifier(social);

        let events = stream::iter(vec![HostEvent::StreamingStarted]).chain(stream::pending());
        let shutdown = async move { rx.await.map_err(std::io::Error::other) };

        tokio::time::timeout(
            Duration::from_secs(5),
            run_event_loop(events, shutdown, &mut notifier, None),
        )
        .await??;

        assert!(notifier.last_post_time().is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_exit_event_stops_loop_before_later_events() -> anyhow::Result<()> {
        let social = Arc::new(ShutdownDuringLogin {
            trigger: Mutex::new(None),
        });
        let mut notifier = test_notifier(social);

        let events = stream::iter(vec![HostEvent::Exit, HostEvent::StreamingStarted]);
        run_event_loop(events, std::future::pending(), &mut notifier, None).await?;

        assert_eq!(notifier.last_post_time(), None);
        Ok(())
    }

    #[test]
    fn test_settings_file_accepts_nested_object() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(
            file,
            r#"{{"settings": {{"bsky_username": "streamer.bsky.social", "platform_selection": "both", "twitch_link": "https://twitch.tv/x"}}}}"#
        )?;

        let settings = load_settings_file(file.path())?;
        assert_eq!(settings.username, "streamer.bsky.social");
        assert_eq!(settings.platform_selection, PlatformSelection::Both);
        assert_eq!(settings.twitch_url.as_deref(), Some("https://twitch.tv/x"));
        Ok(())
    }

    #[test]
    fn test_settings_file_accepts_flat_object() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, r#"{{"bsky_username": "flat.bsky.social", "thumbnail_url": ""}}"#)?;

        let settings = load_settings_file(file.path())?;
        assert_eq!(settings.username, "flat.bsky.social");
        assert_eq!(settings.thumbnail_url, None);
        Ok(())
    }

    #[test]
    fn test_missing_settings_file_is_an_error() {
        assert!(load_settings_file(Path::new("/nonexistent/autoskeet.json")).is_err());
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["autoskeet"]);
        assert_eq!(args.obs_host, "127.0.0.1");
        assert_eq!(args.obs_port, 4455);
        assert_eq!(args.service, DEFAULT_SERVICE);
        assert!(!args.dry_run);
        assert!(args.settings.is_none());
    }
}
