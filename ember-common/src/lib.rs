// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Protocol core for the ember firmware uploader.
//!
//! Implements the length-prefixed serial update protocol spoken by the
//! ember bootloader: a handshake into update mode, a 4-byte metadata
//! record, a stream of length-prefixed data frames each acknowledged by a
//! single status byte, and a zero-length terminator frame.
//!
//! This crate is pure logic over any `Read + Write` byte stream; the
//! serial port handling lives in `ember-upload`.

pub mod error;
pub mod protocol;
pub mod session;

// Re-export commonly used types
pub use error::{ProtocolError, Result};
pub use protocol::{FirmwareImage, Metadata};
pub use protocol::{FRAME_HEADER_LEN, FRAME_SIZE, HANDSHAKE_BYTE, METADATA_LEN, RESP_OK};
pub use session::{Session, SessionConfig, SessionState};
