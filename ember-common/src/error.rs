// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Error taxonomy for the update protocol.

use std::io;

use thiserror::Error;

use crate::protocol::METADATA_LEN;
use crate::session::SessionState;

pub type Result<T> = core::result::Result<T, ProtocolError>;

/// Everything that can go fatally wrong during one update session.
///
/// There is no retry path: any of these aborts the in-progress update and
/// the whole protocol must be restarted from scratch.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The firmware image is too short to contain the 4-byte metadata record.
    #[error("metadata record must be {METADATA_LEN} bytes, image provided {0}")]
    InvalidMetadata(usize),

    /// The bootloader answered with a status byte other than `RESP_OK`.
    #[error("bootloader rejected the transfer with status 0x{0:02x}")]
    BootloaderRejected(u8),

    /// The bootloader never echoed the handshake byte within the deadline.
    #[error("bootloader did not enter update mode before the handshake deadline")]
    HandshakeTimeout,

    /// A session operation was called out of sequence.
    #[error("operation not permitted in session state {0:?}")]
    BadState(SessionState),

    /// Transport-level read/write failure, propagated uninterpreted.
    #[error("transport error")]
    Transport(#[from] io::Error),
}
