// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! TaskFlow CLI - command-line client for the TaskFlow service

pub mod cli;
pub mod commands;

pub use clap::Parser;
pub use cli::{Cli, Commands};
