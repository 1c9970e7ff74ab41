// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! TaskFlow REST API contract types and validation
//!
//! This crate defines the schema types and validation for the remote
//! TaskFlow HTTP API. These types are shared between the production
//! REST client, the mock gateway used in tests, and the controller.

pub mod error;
pub mod types;
pub mod validation;

pub use error::*;
pub use types::*;
pub use validation::*;
