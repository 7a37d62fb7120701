//! Kitchen display server binary.

use std::sync::Arc;

use tokio::sync::{Notify, RwLock};
use tracing_subscriber::EnvFilter;

use kitchen_display::adapters::audio::BroadcastAudioOutput;
use kitchen_display::adapters::clock::SystemClock;
use kitchen_display::adapters::http::{
    app_router, AdminHandlers, AudioHandlers, BoardHandlers,
};
use kitchen_display::adapters::postgres::{
    build_pool, PgConnectionManager, PostgresCategorySource, PostgresOrderCommands,
    PostgresOrderSource, SharedPool,
};
use kitchen_display::adapters::storage::{FileSettingsStore, FileTimerStore, LocalSoundStorage};
use kitchen_display::application::handlers::{
    FinishOrderHandler, ListCategoriesHandler, ReconnectHandler, RefreshBoardHandler,
    SoundSettingsHandler,
};
use kitchen_display::application::BoardPoller;
use kitchen_display::config::AppConfig;
use kitchen_display::domain::alert::AlertDispatcher;
use kitchen_display::domain::countdown::CountdownEngine;
use kitchen_display::ports::SettingsStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!(
        environment = ?config.server.environment,
        "starting kitchen display server"
    );

    let pool = build_pool(&config.database).await?;
    if config.database.run_migrations {
        tracing::info!("running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }
    let pool: SharedPool = Arc::new(RwLock::new(pool));

    // The diagnostics label must never carry credentials.
    let server_label = config
        .database
        .url
        .rsplit('@')
        .next()
        .unwrap_or_default()
        .to_string();

    let clock = Arc::new(SystemClock);
    let timer_store = Arc::new(FileTimerStore::new(&config.display.state_dir)?);
    let engine = Arc::new(CountdownEngine::new(timer_store, clock.clone()));
    let settings_store = Arc::new(FileSettingsStore::new(&config.display.state_dir));
    let sound_storage = Arc::new(LocalSoundStorage::new(
        &config.audio.sound_dir,
        config.audio.max_upload_bytes as usize,
    ));
    let output = Arc::new(BroadcastAudioOutput::new(64));

    let sound_settings = match settings_store.load_sound_settings().await {
        Ok(Some(settings)) => settings,
        Ok(None) => Default::default(),
        Err(error) => {
            tracing::warn!(%error, "failed to load sound settings, using defaults");
            Default::default()
        }
    };
    let alerts = Arc::new(AlertDispatcher::new(
        output.clone(),
        sound_storage.clone(),
        clock.clone(),
        config.display.mute_window(),
        sound_settings,
    ));

    let board = Arc::new(RefreshBoardHandler::new(
        Arc::new(PostgresOrderSource::new(pool.clone(), server_label)),
        settings_store.clone(),
        engine,
        alerts.clone(),
        clock,
    ));

    let refresh = Arc::new(Notify::new());
    let finish = Arc::new(FinishOrderHandler::new(
        Arc::new(PostgresOrderCommands::new(pool.clone())),
        board.clone(),
        refresh.clone(),
    ));
    let reconnect = Arc::new(ReconnectHandler::new(
        Arc::new(PgConnectionManager::new(pool.clone(), config.database.clone())),
        refresh.clone(),
    ));
    let categories = Arc::new(ListCategoriesHandler::new(
        Arc::new(PostgresCategorySource::new(pool)),
        settings_store.clone(),
    ));
    let sounds = Arc::new(SoundSettingsHandler::new(
        settings_store,
        sound_storage,
        alerts,
    ));

    // Run until the server exits; aborted implicitly on shutdown.
    let (_poll_task, _tick_task) = BoardPoller::new(
        board.clone(),
        refresh,
        config.display.poll_interval(),
        config.display.tick_interval(),
    )
    .spawn();

    let router = app_router(
        BoardHandlers::new(board, finish),
        AudioHandlers::new(sounds, output),
        AdminHandlers::new(reconnect, categories),
        &config.server,
        config.audio.max_upload_bytes as usize,
    );

    let addr = config.server.socket_addr();
    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
