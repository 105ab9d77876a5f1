// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Wire format for bootloader <-> host communication.
//!
//! The update protocol is byte-oriented and deliberately small:
//!
//! ```text
//! host -> boot:  'U'                                 handshake
//! boot -> host:  ...junk... 'U'                      echo, update mode entered
//! host -> boot:  version:u16 LE, size:u16 LE         metadata record
//! boot -> host:  status byte (0x00 = ok)
//! host -> boot:  len:u16 BE, data[len]               one frame per chunk
//! boot -> host:  status byte                         after every frame
//! host -> boot:  0x00 0x00                           terminator frame
//! boot -> host:  status byte
//! ```

use crate::error::{ProtocolError, Result};

// --- Wire constants ---

/// Handshake byte sent by the host and echoed back by the bootloader.
pub const HANDSHAKE_BYTE: u8 = b'U';

/// Status byte the bootloader returns when it accepted the last write.
pub const RESP_OK: u8 = 0x00;

/// Maximum number of data bytes carried by one frame.
pub const FRAME_SIZE: usize = 256;

/// Length of the metadata record at the head of a firmware image.
pub const METADATA_LEN: usize = 4;

/// Length of the big-endian frame length prefix.
pub const FRAME_HEADER_LEN: usize = 2;

// --- Metadata record ---

/// Decoded 4-byte metadata record (version, size), both little-endian.
///
/// The size field is informational; it is forwarded to the bootloader but
/// never validated against the actual payload length here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Metadata {
    pub version: u16,
    pub size: u16,
}

impl Metadata {
    /// Decode a metadata record from exactly [`METADATA_LEN`] bytes.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != METADATA_LEN {
            return Err(ProtocolError::InvalidMetadata(bytes.len()));
        }
        Ok(Self {
            version: u16::from_le_bytes([bytes[0], bytes[1]]),
            size: u16::from_le_bytes([bytes[2], bytes[3]]),
        })
    }

    /// Re-encode the record into the exact bytes sent on the wire.
    pub fn to_bytes(&self) -> [u8; METADATA_LEN] {
        let v = self.version.to_le_bytes();
        let s = self.size.to_le_bytes();
        [v[0], v[1], s[0], s[1]]
    }
}

// --- Firmware image ---

/// A firmware image split into its metadata record and payload.
#[derive(Clone, Copy, Debug)]
pub struct FirmwareImage<'a> {
    pub metadata: Metadata,
    pub payload: &'a [u8],
}

impl<'a> FirmwareImage<'a> {
    /// Split a raw image into metadata and payload.
    ///
    /// Fails with [`ProtocolError::InvalidMetadata`] when the image is
    /// shorter than the metadata record.
    pub fn parse(image: &'a [u8]) -> Result<Self> {
        if image.len() < METADATA_LEN {
            return Err(ProtocolError::InvalidMetadata(image.len()));
        }
        Ok(Self {
            metadata: Metadata::parse(&image[..METADATA_LEN])?,
            payload: &image[METADATA_LEN..],
        })
    }
}

// --- Frames ---

/// Encode one frame: 2-byte big-endian length prefix followed by the data.
///
/// An empty `data` slice yields the terminator frame `[0x00, 0x00]`.
pub fn encode_frame(data: &[u8]) -> Vec<u8> {
    debug_assert!(data.len() <= u16::MAX as usize);
    let mut frame = Vec::with_capacity(FRAME_HEADER_LEN + data.len());
    frame.extend_from_slice(&(data.len() as u16).to_be_bytes());
    frame.extend_from_slice(data);
    frame
}

/// The zero-length frame that ends a transfer.
pub fn terminator_frame() -> [u8; FRAME_HEADER_LEN] {
    [0x00, 0x00]
}
