// SPDX-License-Identifier: AGPL-3.0
// Buswatch Core - Type definitions

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minutes until the next three buses for one shortcut.
///
/// `None` means unknown / not yet fetched. A failed lookup degrades the whole
/// row to [`FAILED_ARRIVALS`] so the UI can tell the two states apart.
pub type Arrivals = [Option<u32>; 3];

/// Arrivals for a shortcut that has not been fetched yet.
pub const UNKNOWN_ARRIVALS: Arrivals = [None, None, None];

/// Arrivals for a shortcut whose last lookup failed.
pub const FAILED_ARRIVALS: Arrivals = [Some(0), Some(0), Some(0)];

/// One saved (service, stop) pairing with cached arrival estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shortcut {
    /// Stable identity; arrival completions resolve by this, never by position
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Transit line identifier, e.g. "196"
    pub service: String,
    /// Stop identifier, e.g. "12345"
    pub stop_number: String,
    /// Display label
    #[serde(default)]
    pub name: String,
    /// Transient: stripped on persist, reconstructed on load
    #[serde(default)]
    pub arrivals: Arrivals,
}

impl Shortcut {
    /// Create a shortcut with a fresh id and unknown arrivals.
    /// A blank display name falls back to the generated "Bus X - Stop Y" form.
    pub fn new(service: &str, stop_number: &str, name: &str) -> Self {
        let name = if name.trim().is_empty() {
            format!("Bus {} - Stop {}", service, stop_number)
        } else {
            name.to_string()
        };

        Self {
            id: Uuid::new_v4(),
            service: service.to_string(),
            stop_number: stop_number.to_string(),
            name,
            arrivals: UNKNOWN_ARRIVALS,
        }
    }
}

/// Named collection of shortcuts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub name: String,
    #[serde(default)]
    pub shortcuts: Vec<Shortcut>,
}

/// Target group selection in the add form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GroupChoice {
    /// An already-existing group, selected by name
    Existing { name: String },
    /// A group to create (idempotently) before adding the shortcut
    New { name: String },
}

impl Default for GroupChoice {
    fn default() -> Self {
        Self::Existing {
            name: String::new(),
        }
    }
}

/// Working buffer for shortcut creation; discarded after submit or cancel
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DraftShortcut {
    pub service: String,
    pub stop_number: String,
    pub name: String,
    pub group: GroupChoice,
}

/// Staged deletion target awaiting user confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingDelete {
    Shortcut {
        group_index: usize,
        shortcut_index: usize,
    },
    Group {
        group_index: usize,
    },
}

/// What a confirmed deletion removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    Shortcut,
    Group,
}

/// One shortcut's lookup coordinates, snapshotted for the refresh walk
#[derive(Debug, Clone)]
pub struct FetchTarget {
    pub id: Uuid,
    pub service: String,
    pub stop_number: String,
}

/// Toast severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

/// Short-lived status message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub kind: ToastKind,
}

/// Application settings (GUI-agnostic)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Base URL of the arrival lookup service
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Overall timeout for one lookup request, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Theme preference: "dark", "light", or "system"
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_api_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_theme() -> String {
    "system".to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            theme: default_theme(),
        }
    }
}

/// Error types for the application
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("File I/O error: {0}")]
    FileIo(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid import: {0}")]
    ImportFormat(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::FileIo(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err.to_string())
    }
}
