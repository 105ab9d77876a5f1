// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Unit tests for the wire format: constants, metadata record, framing.

use ember_common::protocol::{
    encode_frame, terminator_frame, FirmwareImage, Metadata, FRAME_HEADER_LEN, FRAME_SIZE,
    HANDSHAKE_BYTE, METADATA_LEN, RESP_OK,
};
use ember_common::ProtocolError;

// --- Wire constants tests ---

#[test]
fn test_handshake_byte_is_u() {
    assert_eq!(HANDSHAKE_BYTE, 0x55);
    assert_eq!(HANDSHAKE_BYTE, b'U');
}

#[test]
fn test_resp_ok_is_zero() {
    assert_eq!(RESP_OK, 0x00);
}

#[test]
fn test_frame_size() {
    assert_eq!(FRAME_SIZE, 256);
}

#[test]
fn test_metadata_len() {
    assert_eq!(METADATA_LEN, 4);
}

#[test]
fn test_frame_header_len() {
    assert_eq!(FRAME_HEADER_LEN, 2);
}

// --- Metadata record tests ---

#[test]
fn test_metadata_parse_little_endian() {
    // version = 1, size = 100
    let md = Metadata::parse(&[0x01, 0x00, 0x64, 0x00]).unwrap();
    assert_eq!(md.version, 1);
    assert_eq!(md.size, 100);
}

#[test]
fn test_metadata_parse_multi_byte_values() {
    let md = Metadata::parse(&[0x34, 0x12, 0xCD, 0xAB]).unwrap();
    assert_eq!(md.version, 0x1234);
    assert_eq!(md.size, 0xABCD);
}

#[test]
fn test_metadata_parse_rejects_short_input() {
    let err = Metadata::parse(&[0x01, 0x00]).unwrap_err();
    assert!(matches!(err, ProtocolError::InvalidMetadata(2)));
}

#[test]
fn test_metadata_parse_rejects_long_input() {
    let err = Metadata::parse(&[0; 5]).unwrap_err();
    assert!(matches!(err, ProtocolError::InvalidMetadata(5)));
}

#[test]
fn test_metadata_round_trip() {
    let raw = [0x01, 0x00, 0x64, 0x00];
    let md = Metadata::parse(&raw).unwrap();
    assert_eq!(md.to_bytes(), raw);
}

#[test]
fn test_metadata_to_bytes_encodes_little_endian() {
    let md = Metadata {
        version: 0x1234,
        size: 0xABCD,
    };
    assert_eq!(md.to_bytes(), [0x34, 0x12, 0xCD, 0xAB]);
}

// --- Firmware image tests ---

#[test]
fn test_image_parse_splits_metadata_and_payload() {
    let image = [0x01, 0x00, 0x64, 0x00, 0xDE, 0xAD, 0xBE, 0xEF];
    let fw = FirmwareImage::parse(&image).unwrap();
    assert_eq!(fw.metadata.version, 1);
    assert_eq!(fw.metadata.size, 100);
    assert_eq!(fw.payload, &[0xDE, 0xAD, 0xBE, 0xEF]);
}

#[test]
fn test_image_parse_metadata_only() {
    let fw = FirmwareImage::parse(&[0x02, 0x00, 0x00, 0x00]).unwrap();
    assert_eq!(fw.metadata.version, 2);
    assert!(fw.payload.is_empty());
}

#[test]
fn test_image_parse_rejects_short_image() {
    let err = FirmwareImage::parse(&[0x01, 0x00, 0x64]).unwrap_err();
    assert!(matches!(err, ProtocolError::InvalidMetadata(3)));
}

#[test]
fn test_image_parse_rejects_empty_image() {
    let err = FirmwareImage::parse(&[]).unwrap_err();
    assert!(matches!(err, ProtocolError::InvalidMetadata(0)));
}

// --- Frame encoding tests ---

#[test]
fn test_frame_length_prefix_is_big_endian() {
    let data = [0xAAu8; 300];
    let frame = encode_frame(&data);
    // 300 = 0x012C
    assert_eq!(frame[0], 0x01);
    assert_eq!(frame[1], 0x2C);
}

#[test]
fn test_frame_prefix_matches_data_length() {
    for len in [1usize, 2, 88, 255, 256] {
        let data = vec![0x5Au8; len];
        let frame = encode_frame(&data);
        let prefix = u16::from_be_bytes([frame[0], frame[1]]) as usize;
        assert_eq!(prefix, len);
        assert_eq!(frame.len(), FRAME_HEADER_LEN + len);
    }
}

#[test]
fn test_frame_carries_data_verbatim() {
    let data: Vec<u8> = (0u8..=255).collect();
    let frame = encode_frame(&data);
    assert_eq!(&frame[FRAME_HEADER_LEN..], &data[..]);
}

#[test]
fn test_full_frame_layout() {
    let frame = encode_frame(&[0x11, 0x22, 0x33]);
    assert_eq!(frame, vec![0x00, 0x03, 0x11, 0x22, 0x33]);
}

#[test]
fn test_empty_frame_equals_terminator() {
    assert_eq!(encode_frame(&[]), terminator_frame().to_vec());
}

#[test]
fn test_terminator_frame_is_zero_length() {
    assert_eq!(terminator_frame(), [0x00, 0x00]);
}

// --- Chunking law (round-trip) ---

#[test]
fn test_chunking_round_trip_law() {
    for len in [0usize, 1, 255, 256, 257, 600, 512, 1024, 1000] {
        let payload: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
        let chunks: Vec<&[u8]> = payload.chunks(FRAME_SIZE).collect();

        // count == ceil(len / FRAME_SIZE)
        assert_eq!(chunks.len(), len.div_ceil(FRAME_SIZE));

        // every chunk but the last is full, none is empty
        for chunk in &chunks {
            assert!(!chunk.is_empty());
        }
        for chunk in chunks.iter().take(chunks.len().saturating_sub(1)) {
            assert_eq!(chunk.len(), FRAME_SIZE);
        }

        // concatenation restores the payload
        let rejoined: Vec<u8> = chunks.concat();
        assert_eq!(rejoined, payload);
    }
}

#[test]
fn test_chunking_600_bytes() {
    let payload = vec![0u8; 600];
    let lens: Vec<usize> = payload.chunks(FRAME_SIZE).map(|c| c.len()).collect();
    assert_eq!(lens, vec![256, 256, 88]);
}

#[test]
fn test_chunking_exact_multiple_has_no_empty_chunk() {
    let payload = vec![0u8; 512];
    let lens: Vec<usize> = payload.chunks(FRAME_SIZE).map(|c| c.len()).collect();
    assert_eq!(lens, vec![256, 256]);
}
