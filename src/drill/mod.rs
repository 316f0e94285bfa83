//! Drill engine: queue, phase machine, sequencer and navigation.
//!
//! # Architecture
//!
//! ```text
//! hotkeys / CLI
//!        │
//!        ▼
//! NavigationController ── owns at most one run (CancellationToken + JoinHandle)
//!        │ spawn / cancel
//!        ▼
//! Sequencer::run()  ← async tokio task
//!        ├─ AudioPlayer           primary audio, rendered translation
//!        ├─ SpeechRenderer        "{tag}, {translation}" → locator
//!        ├─ ProgressCommitter     bounded mode only
//!        └─ SharedQueue           advance / remove / update_progress
//!
//! SharedState (Arc<Mutex<DrillState>>) ←── read by the presentation layer
//! DrillEvent (mpsc, try_send)          ──▶ skipped cues, commits, completion
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tokio::sync::mpsc;
//! use ear_drill::audio::{AudioPlayer, RodioDevice};
//! use ear_drill::config::AppConfig;
//! use ear_drill::drill::{
//!     new_shared_queue, new_shared_state, DrillQueue, NavigationController, Sequencer,
//! };
//! use ear_drill::remote::ApiClient;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let config = AppConfig::default();
//! let api = Arc::new(ApiClient::from_config(&config.server));
//! let device = RodioDevice::open_in_background(&config.audio, api.http().clone()).await?;
//!
//! let (events_tx, _events_rx) = mpsc::channel(64);
//! let sequencer = Sequencer::new(
//!     Arc::new(AudioPlayer::new(Arc::new(device))),
//!     api.clone(),
//!     api.clone(),
//!     new_shared_queue(DrillQueue::empty(config.drill.mode, config.drill.filter)),
//!     new_shared_state(),
//!     events_tx,
//! );
//!
//! let mut nav = NavigationController::new(Arc::new(sequencer), api);
//! nav.load(config.drill.mode).await?;
//! nav.play().await;
//! # Ok(())
//! # }
//! ```

pub mod controller;
pub mod item;
pub mod queue;
pub mod sequencer;
pub mod state;
pub mod timing;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use controller::NavigationController;
pub use item::{DrillFilter, DrillItem, DrillMode};
pub use queue::{Advance, DrillQueue};
pub use sequencer::{new_shared_queue, Sequencer, SharedQueue};
pub use state::{new_shared_state, DrillEvent, DrillState, Phase, SharedState, PRIMARY_REPEATS};
pub use timing::{check, guard, wait, Cancelled};
