//! Flash session: the connect/flash orchestrator.

use strum::Display;

use crate::FirmwareImage;
use crate::engine::{EngineFactory, FlashEngine, FlashSize, WriteFlashParams};
use crate::error::{Error, Result};
use crate::progress::ProgressCallback;
use crate::terminal::Terminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SessionState {
    Idle,
    Connecting,
    Connected,
    Flashing,
}

/// Single-device flash session.
///
/// Owns all mutable flashing state: the engine handle, the detected chip,
/// the materialized image list and the state machine. One session per
/// device, no concurrent sessions. The engine handle is held for the
/// session's lifetime once acquired; there is no disconnect.
pub struct FlashSession {
    terminal: Box<dyn Terminal>,
    open_engine: EngineFactory,
    engine: Option<Box<dyn FlashEngine>>,
    chip: Option<String>,
    images: Vec<FirmwareImage>,
    state: SessionState,
}

impl FlashSession {
    pub fn new(terminal: Box<dyn Terminal>, open_engine: EngineFactory) -> Self {
        Self {
            terminal,
            open_engine,
            engine: None,
            chip: None,
            images: Vec::new(),
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    fn set_state(&mut self, state: SessionState) {
        if state != self.state {
            tracing::debug!(from = %self.state, to = %state, "session state");
            self.state = state;
        }
    }

    /// Chip identifier of the connected device, if any.
    pub fn chip(&self) -> Option<&str> {
        self.chip.as_deref()
    }

    pub fn is_connected(&self) -> bool {
        self.chip.is_some()
    }

    pub fn images(&self) -> &[FirmwareImage] {
        &self.images
    }

    /// Install a fully materialized image list.
    ///
    /// Callers must only pass complete lists; [`crate::materialize_release`]
    /// never returns a partial one.
    pub fn set_images(&mut self, images: Vec<FirmwareImage>) {
        self.images = images;
    }

    /// Whether the connect affordance should be enabled.
    pub fn can_connect(&self) -> bool {
        self.chip.is_none()
            && !matches!(self.state, SessionState::Connecting | SessionState::Flashing)
    }

    /// Whether the flash affordance should be enabled: a device is
    /// connected and at least one image is materialized.
    pub fn can_flash(&self) -> bool {
        self.chip.is_some() && !self.images.is_empty()
    }

    /// Acquire a device (prompting through the engine factory if none is
    /// held yet) and run the engine handshake.
    ///
    /// Failures are recovered locally: a cancelled port selection or a
    /// failed handshake is logged to the terminal and the session returns
    /// to its previous state. Nothing escapes the orchestrator; callers
    /// check [`FlashSession::is_connected`] afterwards. A second connect
    /// after a successful one reuses the held engine without prompting.
    pub fn connect(&mut self) {
        if matches!(self.state, SessionState::Connecting | SessionState::Flashing) {
            return;
        }
        self.set_state(SessionState::Connecting);

        if self.engine.is_none() {
            match (self.open_engine)() {
                Ok(engine) => self.engine = Some(engine),
                Err(err) => {
                    tracing::warn!(%err, "port selection failed");
                    self.terminal.write_line(&format!("Connect cancelled: {err}"));
                    self.set_state(SessionState::Idle);
                    return;
                }
            }
        }

        let result = match self.engine.as_mut() {
            Some(engine) => engine.initialize(self.terminal.as_mut()),
            None => {
                self.set_state(SessionState::Idle);
                return;
            }
        };
        match result {
            Ok(chip) => {
                tracing::info!(%chip, "connected");
                self.terminal.write_line(&format!("Connected to {chip}"));
                self.chip = Some(chip);
                self.set_state(SessionState::Connected);
            }
            Err(err) => {
                tracing::error!(%err, "handshake failed");
                self.terminal.write_line(&format!("Error: {err}"));
                self.set_state(if self.chip.is_some() {
                    SessionState::Connected
                } else {
                    SessionState::Idle
                });
            }
        }
    }

    /// Write the materialized images to the device.
    ///
    /// Preconditions are hard, not just UI gating: a missing connection is
    /// [`Error::NotConnected`], an empty image list [`Error::NoImages`],
    /// and the engine is never invoked in either case. An engine failure
    /// is written to the terminal and returned; the session stays
    /// connected and nothing is rolled back or retried (flashing may have
    /// partially applied).
    pub fn flash_full(&mut self, progress: &mut dyn ProgressCallback) -> Result<()> {
        if self.chip.is_none() {
            return Err(Error::NotConnected);
        }
        if self.images.is_empty() {
            return Err(Error::NoImages);
        }
        if self.engine.is_none() {
            return Err(Error::NotConnected);
        }

        self.set_state(SessionState::Flashing);
        let result = match self.engine.as_mut() {
            Some(engine) => {
                let params = WriteFlashParams {
                    files: &self.images,
                    flash_size: FlashSize::Keep,
                    erase_all: true,
                    compress: true,
                };
                engine.write_flash(&params, progress, self.terminal.as_mut())
            }
            None => return Err(Error::NotConnected),
        };
        self.set_state(SessionState::Connected);

        if let Err(err) = &result {
            tracing::error!(%err, "flash failed");
            self.terminal.write_line(&format!("Error: {err}"));
        }
        result
    }
}
