//! Dedicated OS-thread hotkey listener using `rdev::listen`.
//!
//! `rdev::listen` cannot be interrupted.  Dropping [`HotkeyListener`] sets a
//! stop flag so the callback discards further events; the blocked thread
//! remains until the process exits and holds nothing that needs cleanup.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tokio::sync::mpsc;

use super::{HotkeyBindings, NavCommand};

/// Handle to the running listener thread.  Drop it to stop forwarding.
pub struct HotkeyListener {
    stop: Arc<AtomicBool>,
    // Never joined: `rdev::listen` does not return.
    _thread: std::thread::JoinHandle<()>,
}

impl HotkeyListener {
    /// Spawn the listener thread.  Each key press bound in `bindings` is sent
    /// on `tx` as its [`NavCommand`]; releases and unbound keys are ignored.
    ///
    /// Returns an error only when the OS refuses to create the thread.
    pub fn start(bindings: HotkeyBindings, tx: mpsc::Sender<NavCommand>) -> std::io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let thread = std::thread::Builder::new()
            .name("hotkey-listener".into())
            .spawn(move || {
                let result = rdev::listen(move |event| {
                    if stop_flag.load(Ordering::Relaxed) {
                        return;
                    }
                    let rdev::EventType::KeyPress(key) = event.event_type else {
                        return;
                    };
                    if let Some(command) = bindings.command_for(key) {
                        // A full queue drops the press; the user can repeat it.
                        if let Err(e) = tx.try_send(command) {
                            log::debug!("hotkey-listener: {command:?} dropped ({e})");
                        }
                    }
                });

                if let Err(e) = result {
                    log::error!("hotkey-listener: rdev::listen exited with error: {e:?}");
                }
            })?;

        log::info!(
            "hotkeys: play/pause {:?}, previous {:?}, next {:?}",
            bindings.play_pause,
            bindings.previous,
            bindings.next
        );

        Ok(Self {
            stop,
            _thread: thread,
        })
    }
}

impl Drop for HotkeyListener {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}
