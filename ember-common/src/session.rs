// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Blocking update session driver.
//!
//! A [`Session`] borrows a byte-stream transport for the duration of one
//! update and walks it through the protocol in strict sequence: handshake,
//! metadata, data frames, terminator. Exactly one frame is in flight at any
//! time; every write is followed by a blocking read of one status byte
//! before the next write is issued.
//!
//! The progression is tracked explicitly as a [`SessionState`] so that
//! out-of-order calls are rejected instead of silently corrupting the wire
//! stream, and so that failure points are observable in tests.

use std::io::{ErrorKind, Read, Write};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{ProtocolError, Result};
use crate::protocol::{self, FirmwareImage, Metadata, FRAME_SIZE, HANDSHAKE_BYTE, RESP_OK};

/// Delay after each acknowledged data frame, matching the bootloader's
/// flash page-write timing.
pub const DEFAULT_PAGE_WRITE_DELAY: Duration = Duration::from_millis(100);

/// Default upper bound on the wait for the bootloader to echo the
/// handshake byte.
pub const DEFAULT_HANDSHAKE_DEADLINE: Duration = Duration::from_secs(10);

/// Where an update session currently stands.
///
/// Transitions are one-directional; any fatal error lands in `Aborted` and
/// the session cannot be resumed. A fresh session (and usually a bootloader
/// reset) is required after that.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing sent yet.
    Idle,
    /// Handshake byte written, waiting for the echo / metadata ACK.
    Handshaking,
    /// Metadata acknowledged, no data frame sent yet.
    MetadataSent,
    /// At least one data frame acknowledged.
    TransferringFrames,
    /// Terminator frame acknowledged, update complete.
    Terminated,
    /// A fatal error occurred; the transfer is dead.
    Aborted,
}

impl SessionState {
    /// Whether a data frame or the terminator may be sent from this state.
    pub fn accepts_frames(self) -> bool {
        matches!(self, Self::MetadataSent | Self::TransferringFrames)
    }

    /// Whether the session has reached an end state.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Terminated | Self::Aborted)
    }
}

/// Tunables for one update session.
#[derive(Clone, Copy, Debug)]
pub struct SessionConfig {
    /// Maximum data bytes per frame.
    pub frame_size: usize,
    /// Pause after each acknowledged data frame.
    pub page_write_delay: Duration,
    /// Upper bound on the handshake echo wait; `None` blocks forever, which
    /// is what the original updater did.
    pub handshake_deadline: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            frame_size: FRAME_SIZE,
            page_write_delay: DEFAULT_PAGE_WRITE_DELAY,
            handshake_deadline: Some(DEFAULT_HANDSHAKE_DEADLINE),
        }
    }
}

/// One firmware update session over a borrowed transport.
pub struct Session<'a, T: Read + Write> {
    transport: &'a mut T,
    config: SessionConfig,
    state: SessionState,
}

impl<'a, T: Read + Write> Session<'a, T> {
    /// Start a session with default configuration.
    pub fn new(transport: &'a mut T) -> Self {
        Self::with_config(transport, SessionConfig::default())
    }

    pub fn with_config(transport: &'a mut T, config: SessionConfig) -> Self {
        Self {
            transport,
            config,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Bring the bootloader into update mode and send the metadata record.
    ///
    /// Writes the handshake byte, discards transport bytes until it is
    /// echoed back (bounded by `handshake_deadline`), then writes the raw
    /// 4-byte metadata record and checks its acknowledgement.
    pub fn handshake(&mut self, metadata: &Metadata) -> Result<()> {
        if self.state != SessionState::Idle {
            return Err(ProtocolError::BadState(self.state));
        }
        self.state = SessionState::Handshaking;

        match self.try_handshake(metadata) {
            Ok(()) => {
                self.state = SessionState::MetadataSent;
                Ok(())
            }
            Err(e) => {
                self.state = SessionState::Aborted;
                Err(e)
            }
        }
    }

    fn try_handshake(&mut self, metadata: &Metadata) -> Result<()> {
        self.transport.write_all(&[HANDSHAKE_BYTE])?;
        self.transport.flush()?;

        let deadline = self.config.handshake_deadline.map(|d| Instant::now() + d);
        let mut byte = [0u8; 1];
        loop {
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    return Err(ProtocolError::HandshakeTimeout);
                }
            }
            match self.transport.read(&mut byte) {
                Ok(1) if byte[0] == HANDSHAKE_BYTE => break,
                Ok(_) => continue,
                Err(e) if e.kind() == ErrorKind::TimedOut => continue,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        self.transport.write_all(&metadata.to_bytes())?;
        self.transport.flush()?;
        self.read_ack()
    }

    /// Send one data frame and wait for its acknowledgement.
    ///
    /// An empty chunk is skipped entirely: a zero-length frame is
    /// indistinguishable from the terminator on the wire and must only be
    /// produced by [`Session::finish`].
    pub fn send_frame(&mut self, chunk: &[u8]) -> Result<()> {
        if !self.state.accepts_frames() {
            return Err(ProtocolError::BadState(self.state));
        }
        if chunk.is_empty() {
            return Ok(());
        }
        debug_assert!(chunk.len() <= self.config.frame_size);

        match self.write_and_ack(&protocol::encode_frame(chunk)) {
            Ok(()) => {
                self.state = SessionState::TransferringFrames;
                if !self.config.page_write_delay.is_zero() {
                    thread::sleep(self.config.page_write_delay);
                }
                Ok(())
            }
            Err(e) => {
                self.state = SessionState::Aborted;
                Err(e)
            }
        }
    }

    /// Send the zero-length terminator frame and wait for its
    /// acknowledgement, completing the update.
    pub fn finish(&mut self) -> Result<()> {
        if !self.state.accepts_frames() {
            return Err(ProtocolError::BadState(self.state));
        }

        match self.write_and_ack(&protocol::terminator_frame()) {
            Ok(()) => {
                self.state = SessionState::Terminated;
                Ok(())
            }
            Err(e) => {
                self.state = SessionState::Aborted;
                Err(e)
            }
        }
    }

    /// Stream a whole payload as data frames followed by the terminator.
    pub fn transfer(&mut self, payload: &[u8]) -> Result<()> {
        let frame_size = self.config.frame_size;
        for chunk in payload.chunks(frame_size) {
            self.send_frame(chunk)?;
        }
        self.finish()
    }

    /// Run a complete update from a raw firmware image.
    pub fn upload(&mut self, image: &[u8]) -> Result<()> {
        let image = FirmwareImage::parse(image)?;
        self.handshake(&image.metadata)?;
        self.transfer(image.payload)
    }

    // One frame as one logical wire unit: single buffered write, flush,
    // then block for exactly one status byte.
    fn write_and_ack(&mut self, frame: &[u8]) -> Result<()> {
        self.transport.write_all(frame)?;
        self.transport.flush()?;
        self.read_ack()
    }

    fn read_ack(&mut self) -> Result<()> {
        let mut resp = [0u8; 1];
        self.transport.read_exact(&mut resp)?;
        if resp[0] != RESP_OK {
            return Err(ProtocolError::BootloaderRejected(resp[0]));
        }
        Ok(())
    }
}
