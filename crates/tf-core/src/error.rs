// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Controller error type

use thiserror::Error;

use crate::session::StoreError;
use tf_client_api::GatewayError;

/// Errors surfaced by controller operations.
///
/// Local refusals (`NotAuthenticated`, `ServiceOffline`, `Validation`)
/// mean no request was issued; `Gateway` wraps a classified remote
/// failure after its side effects (health transition, session teardown,
/// surfaced message) have already been applied.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("not signed in")]
    NotAuthenticated,

    #[error("service is temporarily unavailable; waiting for recovery")]
    ServiceOffline,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
