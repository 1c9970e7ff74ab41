// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Gateway error taxonomy
//!
//! Every remote call resolves into one of four outcomes beyond success:
//! the request never got a response (`Transport`), the service answered
//! with a structured 503 fallback (`Degraded`), the credential was
//! rejected (`Unauthorized`), or the request itself was refused
//! (`Rejected`). The first two feed the service health monitor; the
//! latter two never do.

use thiserror::Error;

/// Classified failure of a remote gateway call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The request never reached the service, or no response arrived.
    /// Malformed success bodies land here as well: the caller cannot
    /// distinguish a half-dead service from an unreachable one.
    #[error("connection error: {0}")]
    Transport(String),

    /// HTTP 503 carrying the gateway's structured fallback body.
    #[error("service unavailable: {message}")]
    Degraded { message: String },

    /// HTTP 401. The bearer token is no longer accepted.
    #[error("authorization required")]
    Unauthorized,

    /// Any other non-2xx response, with the raw body as detail.
    #[error("request rejected ({status}): {detail}")]
    Rejected { status: u16, detail: String },
}

impl GatewayError {
    /// Whether this failure signals a service outage (drives the health
    /// monitor OFFLINE).
    pub fn is_outage(&self) -> bool {
        matches!(self, GatewayError::Transport(_) | GatewayError::Degraded { .. })
    }

    /// Best-effort human message for a rejection body.
    ///
    /// The remote services answer validation failures with
    /// `{"message": "..."}`; anything else is surfaced verbatim.
    pub fn rejection_message(&self) -> Option<String> {
        match self {
            GatewayError::Rejected { detail, .. } => {
                let parsed = serde_json::from_str::<serde_json::Value>(detail)
                    .ok()
                    .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from));
                Some(parsed.unwrap_or_else(|| detail.clone()))
            }
            _ => None,
        }
    }
}

/// Result alias for gateway calls
pub type GatewayResult<T> = Result<T, GatewayError>;
