//! Circely client shell
//!
//! Boots the headless client core: logging, the local stores, the domain
//! services, the hash router, and the sobriety ticker. Runs until ctrl-c.
//!
//! Configuration comes from the environment:
//! - `CIRCELY_SERVICE_URL`: base URL of the Circely service
//! - `CIRCELY_DATA_DIR`: directory holding session and preference files

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};

use app_core::account::AccountService;
use app_core::auth::AuthService;
use app_core::sobriety::{
    CounterMode, SobrietyClock, SobrietyCounter, DEFAULT_SOBRIETY_DAYS,
};
use app_state::{QueryClient, SessionState, SosChannel, SosEvent};
use app_ui::{HashRouter, InMemoryHashStation, Theme, ThemeVariant};
use circely_api::{AccountClient, ApiClient, ApiClientConfig, SessionStore};
use storage::{CacheConfig, ColorMode, KvConfig, PreferencesStore};

/// Environment variable naming the Circely service URL
const SERVICE_URL_VAR: &str = "CIRCELY_SERVICE_URL";

/// Environment variable naming the local data directory
const DATA_DIR_VAR: &str = "CIRCELY_DATA_DIR";

/// Data directory used when the environment does not name one
const DEFAULT_DATA_DIR: &str = "circely-data";

/// Interval between sobriety counter refreshes
const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let data_dir = std::env::var(DATA_DIR_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;
    info!(path = %data_dir.display(), "using data directory");

    // Preferences drive the theme and the counter display mode.
    let preferences = PreferencesStore::open(KvConfig::new(data_dir.join("kv.db")))
        .context("failed to open preference store")?;
    let prefs = preferences.load().context("failed to load preferences")?;

    // System mode follows the platform color scheme; the headless shell has
    // no platform signal, so it renders light.
    let variant = match prefs.color_mode {
        ColorMode::Dark => ThemeVariant::Dark,
        ColorMode::Light | ColorMode::System => ThemeVariant::Light,
    };
    let theme = Theme::for_variant(variant);
    info!(dark = theme.is_dark(), "theme loaded");

    let session_store = Arc::new(
        SessionStore::open(data_dir.join("session.json"))
            .await
            .context("failed to open session store")?,
    );
    let query_client = Arc::new(QueryClient::new(CacheConfig::default()));
    let session_state = SessionState::new(Arc::clone(&session_store), Arc::clone(&query_client));
    let auth = AuthService::new(session_state.clone());

    let api_config = match std::env::var(SERVICE_URL_VAR) {
        Ok(url) => ApiClientConfig::new(url),
        Err(_) => ApiClientConfig::default(),
    };
    info!(service_url = %api_config.service_url, "using service endpoint");
    let account = AccountService::new(Arc::new(AccountClient::new(ApiClient::new(api_config))));

    let sos = Arc::new(SosChannel::new());

    let station = Arc::new(InMemoryHashStation::new());
    let router = HashRouter::new(station);
    info!(path = %router.current_path(), "router ready");

    let counter = SobrietyCounter::resolve(None, DEFAULT_SOBRIETY_DAYS);
    let clock = Arc::new(SobrietyClock::new(counter, CounterMode::from_id(&prefs.counter_mode)));
    let ticker = clock.start_ticking(TICK_INTERVAL);
    let snapshot = clock.snapshot();
    info!(mode = snapshot.mode.label(), days = snapshot.days, "sobriety clock started");

    let session = auth.session().current_session().await?;
    if session.is_signed_in {
        info!(username = %session.member.username, "session restored");
        match account.profile().await {
            Ok(member) => info!(username = %member.username, "account profile refreshed"),
            Err(error) => warn!(%error, "profile refresh failed, keeping stored session"),
        }
    } else {
        info!("no stored session, starting signed out");
    }

    let mut paths = router.subscribe();
    tokio::spawn(async move {
        while paths.changed().await.is_ok() {
            let path = paths.borrow().clone();
            info!(%path, "route changed");
        }
    });

    let mut sos_events = sos.subscribe_events();
    tokio::spawn(async move {
        while let Ok(event) = sos_events.recv().await {
            match event {
                SosEvent::Opened => info!("presenting emergency support overlay"),
                SosEvent::Closed => info!("emergency support overlay dismissed"),
            }
        }
    });

    info!("circely client ready");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    info!("shutdown requested");

    ticker.stop();
    router.stop();
    info!("circely client stopped");

    Ok(())
}
