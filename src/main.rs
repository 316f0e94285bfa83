//! Application entry point: headless vocabulary ear-training player.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create the [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Build the service client; optionally pull the playback rhythm.
//! 5. Open the audio output off the runtime workers, falling back to a
//!    silent device.
//!
//! With `drill.exam` set, the due reviews of that kind are walked on the
//! console instead and the steps below are skipped.
//!
//! 6. Build the sequencer and navigation controller, load the queue.  A
//!    failed load is reported and can be retried with the play/pause key.
//! 7. Spawn the hotkey listener thread.
//! 8. Drive the controller from hotkeys and drill events until the session
//!    completes or Ctrl-C.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use ear_drill::{
    audio::{AudioPlayer, PlaybackDevice, PlaybackError, RodioDevice},
    config::AppConfig,
    drill::{
        new_shared_queue, new_shared_state, DrillEvent, DrillQueue, NavigationController, Phase,
        Sequencer,
    },
    exam::{parse_rating, ExamSession},
    hotkey::{HotkeyBindings, HotkeyListener, NavCommand},
    remote::{ApiClient, ExamKind, Rating},
};

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("ear-drill starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime (playback drain + network calls)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    rt.block_on(run(config))
}

async fn run(mut config: AppConfig) -> anyhow::Result<()> {
    // 4. Service client
    let api = Arc::new(ApiClient::from_config(&config.server));
    if config.rhythm.sync_from_server {
        match api.fetch_playback_rhythm().await {
            Ok(remote) => {
                config.rhythm.apply_remote(&remote);
                log::info!("Playback rhythm synced from {}", api.base_url());
            }
            Err(e) => log::warn!("Could not fetch playback rhythm ({e}); using local gaps"),
        }
    }

    // 5. Audio output (degrade gracefully without a device)
    let device: Arc<dyn PlaybackDevice> =
        match RodioDevice::open_in_background(&config.audio, api.http().clone()).await {
            Ok(device) => Arc::new(device),
            Err(e) => {
                log::warn!("Audio output unavailable ({e}). Cues will complete silently.");
                Arc::new(SilentDevice)
            }
        };
    let player = Arc::new(AudioPlayer::new(device));

    match config.drill.exam {
        Some(kind) => run_exam(kind, api, &player).await,
        None => run_drill(&config, api, player).await,
    }
}

// ---------------------------------------------------------------------------
// Drill player
// ---------------------------------------------------------------------------

async fn run_drill(
    config: &AppConfig,
    api: Arc<ApiClient>,
    player: Arc<AudioPlayer>,
) -> anyhow::Result<()> {
    // 6. Sequencer + controller
    let (event_tx, mut event_rx) = mpsc::channel::<DrillEvent>(64);
    let sequencer = Sequencer::new(
        player,
        api.clone(),
        api.clone(),
        new_shared_queue(DrillQueue::empty(config.drill.mode, config.drill.filter)),
        new_shared_state(),
        event_tx,
    )
    .with_rhythm(config.rhythm.clone())
    .with_increment(config.drill.progress_increment);

    let mut nav = NavigationController::new(Arc::new(sequencer), api.clone());
    let loaded = load_queue(&mut nav, config, api.base_url()).await;

    // 7. Hotkey listener thread
    let (command_tx, mut command_rx) = mpsc::channel::<NavCommand>(16);
    let bindings = HotkeyBindings::from_config(&config.hotkey);
    let _hotkey_listener = match HotkeyListener::start(bindings, command_tx) {
        Ok(listener) => Some(listener),
        Err(e) => {
            log::warn!("Hotkeys unavailable: {e}");
            None
        }
    };

    if !loaded {
        println!("Press {:?} to retry loading.", bindings.play_pause);
    } else if config.drill.autoplay {
        nav.play().await;
    } else {
        println!("Press {:?} to start drilling.", bindings.play_pause);
    }

    // 8. Event loop
    loop {
        tokio::select! {
            Some(command) = command_rx.recv() => match command {
                NavCommand::PlayPause => {
                    let failed = nav.sequencer().state().lock().unwrap().load_error.is_some();
                    if !failed {
                        nav.toggle().await;
                    } else if load_queue(&mut nav, config, api.base_url()).await {
                        nav.play().await;
                    }
                }
                NavCommand::Previous => {
                    nav.previous().await;
                }
                NavCommand::Next => {
                    nav.next().await;
                }
            },

            Some(event) = event_rx.recv() => {
                print_event(&nav, &event);
                if event == DrillEvent::SessionComplete {
                    break;
                }
            }

            _ = tokio::signal::ctrl_c() => {
                log::info!("Interrupted");
                break;
            }
        }
    }

    nav.shutdown().await;
    Ok(())
}

/// Load the configured mode.  A failure is reported and leaves the empty
/// queue in place; the caller keeps running so the load can be retried.
async fn load_queue(nav: &mut NavigationController, config: &AppConfig, base_url: &str) -> bool {
    match nav.load(config.drill.mode).await {
        Ok(loaded) => {
            log::info!("{loaded} items ready ({:?}, {:?})", config.drill.mode, config.drill.filter);
            true
        }
        Err(e) => {
            log::error!("Failed to load drill items from {base_url}: {e}");
            println!("Could not load drill items: {e}");
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Assessment
// ---------------------------------------------------------------------------

async fn run_exam(kind: ExamKind, api: Arc<ApiClient>, player: &AudioPlayer) -> anyhow::Result<()> {
    let mut session = match ExamSession::load(api.clone(), kind).await {
        Ok(session) => session,
        Err(e) => {
            log::error!("Failed to load due reviews from {}: {e}", api.base_url());
            println!("Could not load due reviews: {e}");
            return Ok(());
        }
    };
    if session.is_empty() {
        println!("Nothing due for {kind:?} review.");
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(item) = session.current().cloned() {
        println!("[{}/{}] {kind:?}", session.position() + 1, session.len());
        session.present(player).await;

        match kind {
            ExamKind::Listening => {
                println!("Enter reveals the answer, r replays.");
                loop {
                    let Some(line) = lines.next_line().await? else {
                        return Ok(());
                    };
                    if line.trim() != "r" {
                        break;
                    }
                    session.play_prompt(player).await;
                }
                session.reveal();
            }
            ExamKind::Spelling => {
                println!("Type the word; an empty line plays it.");
                loop {
                    let Some(line) = lines.next_line().await? else {
                        return Ok(());
                    };
                    if line.trim().is_empty() {
                        if session.play_prompt(player).await.is_none() {
                            println!("(no recording)");
                        }
                        continue;
                    }
                    if let Some(check) = session.check_spelling(&line) {
                        if check.correct {
                            println!("Correct.");
                        } else {
                            println!("Expected {}.", check.expected);
                        }
                    }
                    break;
                }
            }
        }

        let phonetic = item.phonetic.as_deref().unwrap_or_default();
        let tag = item.tag.as_deref().unwrap_or_default();
        println!("  {} {phonetic}  {tag} {}", item.primary_text, item.translation);

        loop {
            println!("Rate: [a]gain / [g]ood");
            let Some(line) = lines.next_line().await? else {
                return Ok(());
            };
            let Some(rating) = parse_rating(&line) else {
                continue;
            };
            match session.rate(rating).await {
                Ok(result) => {
                    println!("  next review: {}", result.next_review_display);
                    break;
                }
                Err(e) => println!("  {e}; rate again to retry."),
            }
        }
    }

    let again = session
        .results()
        .iter()
        .filter(|r| r.rating == Rating::Again)
        .count();
    println!(
        "{kind:?} review complete: {} rated, {again} to repeat soon.",
        session.results().len()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Console output
// ---------------------------------------------------------------------------

fn print_event(nav: &NavigationController, event: &DrillEvent) {
    let state = nav.sequencer().state().lock().unwrap().clone();
    match event {
        DrillEvent::RunStarted { .. } => {
            if let Some(item) = &state.current {
                let phonetic = item.phonetic.as_deref().unwrap_or_default();
                println!(
                    "[{}/{}] {} {}  ({}/{})",
                    state.position + 1,
                    state.length,
                    item.primary_text,
                    phonetic,
                    item.repeat_count,
                    item.repeat_target
                );
            }
        }
        DrillEvent::PhaseChanged {
            phase: Phase::RevealingTranslation,
        } => {
            if let Some(item) = &state.current {
                let tag = item.tag.as_deref().unwrap_or_default();
                println!("        {tag} {}", item.translation);
            }
        }
        DrillEvent::ItemRetired { item_id } => println!("        retired {item_id}"),
        DrillEvent::PassFinished { remaining } => {
            println!("Pass finished, {remaining} items left. Press play for the next pass.")
        }
        DrillEvent::SessionComplete => println!("Session complete."),
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// SilentDevice: fallback PlaybackDevice when no output can be opened
// ---------------------------------------------------------------------------

struct SilentDevice;

#[async_trait]
impl PlaybackDevice for SilentDevice {
    async fn play(&self, _locator: &str) -> Result<(), PlaybackError> {
        Ok(())
    }

    fn stop(&self) {}
}
