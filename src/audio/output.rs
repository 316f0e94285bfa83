//! Speaker output via `rodio`, with device lookup through `cpal`.
//!
//! `rodio::OutputStream` is not `Send`, so [`RodioDevice::open`] creates it
//! on a dedicated `audio-output` thread that keeps it alive and hands back
//! the `Send` stream handle.  Dropping the device releases that thread.
//!
//! Each `play` downloads (or reads) the whole resource, decodes it into a
//! fresh `Sink` and waits for the sink to drain on the blocking pool.

use std::io::Cursor;
use std::sync::{mpsc, Arc, Mutex};

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use thiserror::Error;

use crate::config::AudioConfig;

use super::player::{PlaybackDevice, PlaybackError};

// ---------------------------------------------------------------------------
// DeviceError
// ---------------------------------------------------------------------------

/// Errors raised while opening the output device.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("no output device named {0:?}")]
    NotFound(String),

    #[error("failed to enumerate output devices: {0}")]
    Enumerate(#[from] cpal::DevicesError),

    #[error("failed to open output stream: {0}")]
    Stream(#[from] rodio::StreamError),

    #[error("audio-output thread failed: {0}")]
    Thread(String),
}

// ---------------------------------------------------------------------------
// Device lookup
// ---------------------------------------------------------------------------

fn find_output_device(name: &str) -> Result<cpal::Device, DeviceError> {
    let host = cpal::default_host();
    host.output_devices()?
        .find(|d| d.name().is_ok_and(|n| n == name))
        .ok_or_else(|| DeviceError::NotFound(name.to_string()))
}

fn open_stream(name: Option<&str>) -> Result<(OutputStream, OutputStreamHandle), DeviceError> {
    match name {
        Some(name) => {
            let device = find_output_device(name)?;
            Ok(OutputStream::try_from_device(&device)?)
        }
        None => Ok(OutputStream::try_default()?),
    }
}

// ---------------------------------------------------------------------------
// StreamThread
// ---------------------------------------------------------------------------

/// RAII guard for the thread that owns the `OutputStream`.
struct StreamThread {
    shutdown: Option<mpsc::Sender<()>>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl Drop for StreamThread {
    fn drop(&mut self) {
        // Closing the channel wakes the thread, which then drops the stream.
        self.shutdown.take();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

// ---------------------------------------------------------------------------
// RodioDevice
// ---------------------------------------------------------------------------

pub struct RodioDevice {
    handle: OutputStreamHandle,
    http: reqwest::Client,
    volume: f32,
    current: Mutex<Option<Arc<Sink>>>,
    _stream: StreamThread,
}

impl RodioDevice {
    /// Open the configured output device (or the system default).
    ///
    /// `http` downloads `http(s)://` resources; anything else is read as a
    /// local path.
    ///
    /// Blocks until the output thread has opened the stream.  Async callers
    /// use [`open_in_background`](Self::open_in_background).
    pub fn open(config: &AudioConfig, http: reqwest::Client) -> Result<Self, DeviceError> {
        let device_name = config.output_device.clone();
        let (ready_tx, ready_rx) = mpsc::channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let thread = std::thread::Builder::new()
            .name("audio-output".into())
            .spawn(move || match open_stream(device_name.as_deref()) {
                Ok((stream, handle)) => {
                    let _ = ready_tx.send(Ok(handle));
                    // Blocks until the device is dropped.
                    let _ = shutdown_rx.recv();
                    drop(stream);
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                }
            })
            .map_err(|e| DeviceError::Thread(e.to_string()))?;

        let stream = StreamThread {
            shutdown: Some(shutdown_tx),
            thread: Some(thread),
        };

        let handle = ready_rx
            .recv()
            .map_err(|_| DeviceError::Thread("exited before opening the stream".into()))??;

        log::info!(
            "audio output opened on {}",
            config.output_device.as_deref().unwrap_or("default device")
        );

        Ok(Self {
            handle,
            http,
            volume: config.volume,
            current: Mutex::new(None),
            _stream: stream,
        })
    }

    /// [`open`](Self::open) on the blocking pool, keeping runtime workers
    /// free while the device starts.
    pub async fn open_in_background(
        config: &AudioConfig,
        http: reqwest::Client,
    ) -> Result<Self, DeviceError> {
        let config = config.clone();
        tokio::task::spawn_blocking(move || Self::open(&config, http))
            .await
            .map_err(|e| DeviceError::Thread(e.to_string()))?
    }

    async fn load(&self, locator: &str) -> Result<Vec<u8>, PlaybackError> {
        if locator.starts_with("http://") || locator.starts_with("https://") {
            let response = self
                .http
                .get(locator)
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| PlaybackError::Fetch(e.to_string()))?;
            let bytes = response
                .bytes()
                .await
                .map_err(|e| PlaybackError::Fetch(e.to_string()))?;
            Ok(bytes.to_vec())
        } else {
            let path = locator.strip_prefix("file://").unwrap_or(locator);
            tokio::fs::read(path)
                .await
                .map_err(|e| PlaybackError::Fetch(format!("{path}: {e}")))
        }
    }
}

#[async_trait]
impl PlaybackDevice for RodioDevice {
    async fn play(&self, locator: &str) -> Result<(), PlaybackError> {
        let bytes = self.load(locator).await?;
        let source =
            Decoder::new(Cursor::new(bytes)).map_err(|e| PlaybackError::Decode(e.to_string()))?;

        let sink = Sink::try_new(&self.handle).map_err(|e| PlaybackError::Output(e.to_string()))?;
        sink.set_volume(self.volume);
        sink.append(source);
        let sink = Arc::new(sink);

        // Only one sound at a time on the shared device.
        if let Some(previous) = self.current.lock().unwrap().replace(Arc::clone(&sink)) {
            previous.stop();
        }

        let draining = Arc::clone(&sink);
        tokio::task::spawn_blocking(move || draining.sleep_until_end())
            .await
            .map_err(|e| PlaybackError::Output(e.to_string()))?;

        let mut current = self.current.lock().unwrap();
        if current.as_ref().is_some_and(|c| Arc::ptr_eq(c, &sink)) {
            *current = None;
        }
        Ok(())
    }

    fn stop(&self) {
        if let Some(sink) = self.current.lock().unwrap().take() {
            sink.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_is_usable_as_trait_object() {
        fn assert_device<T: PlaybackDevice + 'static>() {}
        assert_device::<RodioDevice>();
    }

    #[test]
    fn unknown_device_name_is_reported() {
        // Headless CI hosts may have no devices at all; either way the lookup
        // must fail cleanly rather than fall back to another device.
        match find_output_device("no-such-device-3f9a") {
            Err(DeviceError::NotFound(name)) => assert_eq!(name, "no-such-device-3f9a"),
            Err(DeviceError::Enumerate(_)) => {}
            other => panic!("unexpected lookup result: {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn background_open_reports_missing_device() {
        let config = AudioConfig {
            output_device: Some("no-such-device-3f9a".into()),
            ..AudioConfig::default()
        };
        let result = RodioDevice::open_in_background(&config, reqwest::Client::new()).await;
        assert!(matches!(
            result,
            Err(DeviceError::NotFound(_) | DeviceError::Enumerate(_))
        ));
    }
}
