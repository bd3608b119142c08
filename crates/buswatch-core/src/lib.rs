// SPDX-License-Identifier: AGPL-3.0
// Buswatch Core - Shared logic for the desktop shell
//
// This crate provides:
// - Group/Shortcut types, AppSettings and AppError
// - ShortcutStore for the persistent canonical collection
// - ArrivalsClient for the remote arrival lookup
// - View filtering, toast bookkeeping and import/export
//
// Shell-specific code lives in the buswatch-tauri crate.

pub mod arrivals;
pub mod filter;
pub mod settings;
pub mod store;
pub mod toasts;
pub mod transfer;
pub mod types;

// Re-export commonly used items
pub use arrivals::{interpret_arrivals, ArrivalsClient};
pub use filter::filter_groups;
pub use settings::SettingsStore;
pub use store::ShortcutStore;
pub use toasts::{NotificationSink, MAX_ACTIVE_TOASTS, TOAST_TTL};
pub use transfer::{export_json, import_json, EXPORT_FILE_NAME};
pub use types::{
    AppError, AppSettings, Arrivals, DeleteTarget, DraftShortcut, FetchTarget, Group, GroupChoice,
    PendingDelete, Shortcut, Toast, ToastKind, FAILED_ARRIVALS, UNKNOWN_ARRIVALS,
};
