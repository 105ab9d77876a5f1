// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Command implementations for bootloader operations.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use ember_common::protocol::{self, FRAME_SIZE};
use ember_common::{FirmwareImage, Session, SessionConfig};

use crate::transport::SerialLink;

/// Upload a firmware image to the bootloader.
pub fn update(
    link: &mut SerialLink,
    file: &Path,
    debug: bool,
    handshake_timeout_secs: u64,
) -> Result<()> {
    let blob = fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let image = FirmwareImage::parse(&blob)?;

    println!("Port:     {}", link.port_name());
    println!("Firmware: {} ({} bytes)", file.display(), blob.len());
    println!("Version:  {}", image.metadata.version);
    println!("Size:     {} bytes (metadata field)", image.metadata.size);
    println!();

    let config = SessionConfig {
        handshake_deadline: Some(Duration::from_secs(handshake_timeout_secs)),
        ..SessionConfig::default()
    };
    let mut session = Session::with_config(link, config);

    print!("Waiting for bootloader to enter update mode... ");
    io::stdout().flush()?;

    if debug {
        println!();
        println!("metadata: {:02x?}", image.metadata.to_bytes());
    }

    session.handshake(&image.metadata).context("Handshake failed")?;
    println!("OK");

    if debug {
        // Per-frame dump instead of a progress bar.
        for (idx, chunk) in image.payload.chunks(FRAME_SIZE).enumerate() {
            let frame = protocol::encode_frame(chunk);
            session
                .send_frame(chunk)
                .with_context(|| format!("Frame {} failed", idx))?;
            println!("Wrote frame {} ({} bytes)", idx, frame.len());
            println!("  {:02x?}", frame);
        }
    } else {
        let pb = ProgressBar::new(image.payload.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})",
                )?
                .progress_chars("#>-"),
        );

        for (idx, chunk) in image.payload.chunks(FRAME_SIZE).enumerate() {
            if let Err(e) = session.send_frame(chunk) {
                pb.abandon();
                return Err(e).with_context(|| format!("Frame {} failed", idx));
            }
            pb.inc(chunk.len() as u64);
        }

        pb.finish_with_message("Transfer complete");
    }

    // Zero-length frame tells the bootloader to flush its last page write.
    session.finish().context("Terminator frame rejected")?;

    println!();
    println!("Firmware uploaded successfully!");

    Ok(())
}
