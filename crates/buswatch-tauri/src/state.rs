// SPDX-License-Identifier: AGPL-3.0
// Buswatch Tauri - Application State

use crate::fetch_bridge::FetchBridge;
use buswatch_core::{ArrivalsClient, NotificationSink, SettingsStore, ShortcutStore};
use std::sync::Arc;

/// Global application state managed by Tauri
pub struct AppState {
    pub store: Arc<ShortcutStore>,
    pub settings: SettingsStore,
    pub sink: Arc<NotificationSink>,
    pub bridge: FetchBridge,
}

impl AppState {
    /// Create new application state with all stores initialized
    pub fn new() -> Result<Self, buswatch_core::AppError> {
        let settings = SettingsStore::new()?;
        let store = Arc::new(ShortcutStore::new()?);
        let sink = Arc::new(NotificationSink::new());

        let client = ArrivalsClient::new(&settings.get());
        let bridge = FetchBridge::new(store.clone(), sink.clone(), client);

        Ok(Self {
            store,
            settings,
            sink,
            bridge,
        })
    }
}
