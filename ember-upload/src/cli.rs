// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Command-line interface definitions.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use crate::transport::SerialLink;

/// Command-line arguments.
#[derive(Parser)]
#[command(name = "ember-upload")]
#[command(about = "Firmware upload tool for the ember bootloader")]
pub struct Cli {
    /// Serial port (e.g., /dev/ttyACM0)
    #[arg(short, long)]
    pub port: String,

    /// Serial baud rate
    #[arg(short, long, default_value = "115200")]
    pub baud: u32,

    /// Serial read timeout in milliseconds
    #[arg(long, default_value_t = crate::transport::DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Upload a firmware image to the bootloader
    Update {
        /// Firmware image file (4-byte metadata header + payload)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Dump the raw bytes of every frame
        #[arg(short, long)]
        debug: bool,

        /// Seconds to wait for the bootloader to enter update mode
        #[arg(long, default_value = "10")]
        handshake_timeout_secs: u64,
    },
}

/// Execute the parsed CLI command.
pub fn run(cli: Cli) -> Result<()> {
    let mut link = SerialLink::open_with_timeout(&cli.port, cli.baud, cli.timeout_ms)?;

    match cli.command {
        Commands::Update {
            file,
            debug,
            handshake_timeout_secs,
        } => commands::update(&mut link, &file, debug, handshake_timeout_secs),
    }
}
