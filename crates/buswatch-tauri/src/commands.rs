// SPDX-License-Identifier: AGPL-3.0
// Buswatch Tauri - Command Handlers

use crate::fetch_bridge::AppCommand;
use crate::state::AppState;
use buswatch_core::{
    AppSettings, DeleteTarget, DraftShortcut, Group, Shortcut, Toast, ToastKind, EXPORT_FILE_NAME,
};
use std::sync::Arc;
use tauri::State;

type CommandResult<T> = Result<T, String>;

/// Exported collection plus the suggested download name
#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload {
    pub file_name: String,
    pub document: String,
}

async fn notify(state: &AppState, message: String, kind: ToastKind) {
    let _ = state
        .bridge
        .command_sender()
        .send(AppCommand::ShowToast { message, kind })
        .await;
}

/// Snapshot of the canonical collection
#[tauri::command]
pub fn list_groups(state: State<'_, Arc<AppState>>) -> Vec<Group> {
    state.store.groups()
}

/// Derive the display subset for a search term
#[tauri::command]
pub fn filter_groups(state: State<'_, Arc<AppState>>, term: String) -> Vec<Group> {
    buswatch_core::filter::filter_groups(&state.store.groups(), &term)
}

/// Validate the add-form draft and append a new shortcut. On success one
/// arrival fetch is enqueued for it; the queue is FIFO, so the success toast
/// enqueued behind the fetch shows once the lookup resolves.
#[tauri::command]
pub async fn add_shortcut(
    state: State<'_, Arc<AppState>>,
    draft: DraftShortcut,
) -> CommandResult<Shortcut> {
    match state.store.add_shortcut(&draft) {
        Ok(shortcut) => {
            let tx = state.bridge.command_sender();
            tx.send(AppCommand::FetchOne { id: shortcut.id })
                .await
                .map_err(|e| e.to_string())?;
            tx.send(AppCommand::ShowToast {
                message: "Shortcut added successfully".to_string(),
                kind: ToastKind::Success,
            })
            .await
            .map_err(|e| e.to_string())?;
            Ok(shortcut)
        }
        Err(e) => {
            notify(&state, e.to_string(), ToastKind::Error).await;
            Err(e.to_string())
        }
    }
}

/// Stage a shortcut deletion; returns the confirmation prompt
#[tauri::command]
pub fn delete_shortcut(
    state: State<'_, Arc<AppState>>,
    group_index: usize,
    shortcut_index: usize,
) -> CommandResult<String> {
    state
        .store
        .stage_delete_shortcut(group_index, shortcut_index)
        .map_err(|e| e.to_string())
}

/// Stage a group deletion; returns the confirmation prompt
#[tauri::command]
pub fn delete_group(state: State<'_, Arc<AppState>>, group_index: usize) -> CommandResult<String> {
    state
        .store
        .stage_delete_group(group_index)
        .map_err(|e| e.to_string())
}

/// Execute the staged deletion. Returns false when nothing was staged.
#[tauri::command]
pub async fn confirm_delete(state: State<'_, Arc<AppState>>) -> CommandResult<bool> {
    match state.store.confirm_delete() {
        Ok(Some(DeleteTarget::Shortcut)) => {
            notify(
                &state,
                "Shortcut deleted successfully".to_string(),
                ToastKind::Success,
            )
            .await;
            Ok(true)
        }
        Ok(Some(DeleteTarget::Group)) => {
            notify(
                &state,
                "Group deleted successfully".to_string(),
                ToastKind::Success,
            )
            .await;
            Ok(true)
        }
        Ok(None) => Ok(false),
        Err(e) => {
            notify(&state, e.to_string(), ToastKind::Error).await;
            Err(e.to_string())
        }
    }
}

/// Clear the staged deletion
#[tauri::command]
pub fn cancel_delete(state: State<'_, Arc<AppState>>) {
    state.store.cancel_delete();
}

/// Re-walk the whole collection, one lookup at a time
#[tauri::command]
pub async fn refresh_arrivals(state: State<'_, Arc<AppState>>) -> CommandResult<()> {
    state
        .bridge
        .command_sender()
        .send(AppCommand::FetchAll)
        .await
        .map_err(|e| e.to_string())
}

/// Serialize the full collection, arrivals included, for download
#[tauri::command]
pub async fn export_data(state: State<'_, Arc<AppState>>) -> CommandResult<ExportPayload> {
    match buswatch_core::export_json(&state.store.groups()) {
        Ok(document) => {
            notify(
                &state,
                "Data exported successfully".to_string(),
                ToastKind::Success,
            )
            .await;
            Ok(ExportPayload {
                file_name: EXPORT_FILE_NAME.to_string(),
                document,
            })
        }
        Err(e) => {
            notify(&state, e.to_string(), ToastKind::Error).await;
            Err(e.to_string())
        }
    }
}

/// Replace the collection wholesale from an uploaded document.
/// Returns the number of imported groups.
#[tauri::command]
pub async fn import_data(state: State<'_, Arc<AppState>>, document: String) -> CommandResult<usize> {
    let groups = match buswatch_core::import_json(&document) {
        Ok(groups) => groups,
        Err(e) => {
            notify(&state, e.to_string(), ToastKind::Error).await;
            return Err(e.to_string());
        }
    };

    let count = groups.len();
    if let Err(e) = state.store.replace_all(groups) {
        notify(&state, e.to_string(), ToastKind::Error).await;
        return Err(e.to_string());
    }

    notify(
        &state,
        "Data imported successfully!".to_string(),
        ToastKind::Success,
    )
    .await;
    Ok(count)
}

/// Snapshot of the active toasts
#[tauri::command]
pub fn active_toasts(state: State<'_, Arc<AppState>>) -> Vec<Toast> {
    state.sink.active()
}

/// Get current settings
#[tauri::command]
pub fn get_settings(state: State<'_, Arc<AppState>>) -> AppSettings {
    state.settings.get()
}

/// Save settings and rebuild the lookup client
#[tauri::command]
pub fn save_settings(state: State<'_, Arc<AppState>>, settings: AppSettings) -> CommandResult<bool> {
    state
        .settings
        .update(settings.clone())
        .map_err(|e| e.to_string())?;

    let tx = state.bridge.command_sender();
    tx.try_send(AppCommand::UpdateClient { settings })
        .map_err(|e| e.to_string())?;

    Ok(true)
}

/// Get application version
#[tauri::command]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
