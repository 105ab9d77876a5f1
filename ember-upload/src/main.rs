// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Firmware upload tool for the ember bootloader over serial.
//!
//! Usage:
//!   ember-upload --port /dev/ttyACM0 update firmware.bin
//!   ember-upload --port /dev/ttyACM0 update firmware.bin --debug

mod cli;
mod commands;
mod transport;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    cli::run(args)
}
