// SPDX-License-Identifier: AGPL-3.0
// Buswatch Tauri - Main entry point
//
// Desktop bus arrival shortcuts using Tauri + a webview frontend.

#![cfg_attr(
    all(not(debug_assertions), target_os = "linux"),
    windows_subsystem = "windows"
)]

mod commands;
mod fetch_bridge;
mod state;

use fetch_bridge::{AppCommand, AppEvent};
use state::AppState;
use std::sync::Arc;
use std::thread;
use tauri::Emitter;

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("buswatch_tauri=info".parse().unwrap())
                .add_directive("buswatch_core=info".parse().unwrap()),
        )
        .init();

    // Create application state
    let app_state = Arc::new(AppState::new().expect("Failed to initialize application state"));

    tauri::Builder::default()
        .plugin(tauri_plugin_shell::init())
        .plugin(tauri_plugin_dialog::init())
        .manage(app_state.clone())
        .setup(move |app| {
            let handle = app.handle().clone();
            let event_rx = app_state.bridge.event_receiver();

            // Spawn event listener thread
            thread::spawn(move || {
                while let Ok(event) = event_rx.recv_blocking() {
                    let (name, payload) = app_event_to_json(&event);
                    let _ = handle.emit(name, payload);
                }
            });

            // Populate arrivals for the hydrated collection, once
            let tx = app_state.bridge.command_sender();
            let _ = tx.try_send(AppCommand::FetchAll);

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::list_groups,
            commands::filter_groups,
            commands::add_shortcut,
            commands::delete_shortcut,
            commands::delete_group,
            commands::confirm_delete,
            commands::cancel_delete,
            commands::refresh_arrivals,
            commands::export_data,
            commands::import_data,
            commands::active_toasts,
            commands::get_settings,
            commands::save_settings,
            commands::get_version,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

/// Convert a bridge event to its webview name and JSON payload
fn app_event_to_json(event: &AppEvent) -> (&'static str, serde_json::Value) {
    match event {
        AppEvent::ArrivalsUpdated {
            id,
            group_index,
            shortcut_index,
            arrivals,
        } => (
            "arrivals-updated",
            serde_json::json!({
                "id": id,
                "groupIndex": group_index,
                "shortcutIndex": shortcut_index,
                "arrivals": arrivals
            }),
        ),
        AppEvent::ToastShown(toast) => (
            "toast-shown",
            serde_json::json!({
                "toast": toast
            }),
        ),
        AppEvent::ToastDismissed { id } => (
            "toast-dismissed",
            serde_json::json!({
                "id": id
            }),
        ),
    }
}
