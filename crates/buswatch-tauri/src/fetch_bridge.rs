// SPDX-License-Identifier: AGPL-3.0
// Buswatch Tauri - Fetch Bridge
//
// Bridges the synchronous shortcut store with the async arrival lookups.
// One task drains the command queue, so fetches are strictly sequential:
// a full refresh awaits each lookup before issuing the next, and no two
// lookups are ever in flight at once.

use async_channel::{Receiver, Sender};
use buswatch_core::{
    AppSettings, Arrivals, ArrivalsClient, FetchTarget, NotificationSink, ShortcutStore, Toast,
    ToastKind, FAILED_ARRIVALS, TOAST_TTL,
};
use std::sync::Arc;
use tokio::runtime::Runtime;
use uuid::Uuid;

/// Commands that can be sent to the bridge
#[derive(Debug)]
pub enum AppCommand {
    /// Fetch arrivals for one shortcut, addressed by stable id
    FetchOne { id: Uuid },
    /// Walk the whole collection, one lookup at a time
    FetchAll,
    /// Show a toast and schedule its expiry
    ShowToast { message: String, kind: ToastKind },
    /// Rebuild the lookup client after a settings change
    UpdateClient { settings: AppSettings },
}

/// Events published for the webview
#[derive(Debug, Clone)]
pub enum AppEvent {
    ArrivalsUpdated {
        id: Uuid,
        group_index: usize,
        shortcut_index: usize,
        arrivals: Arrivals,
    },
    ToastShown(Toast),
    ToastDismissed {
        id: u64,
    },
}

/// Bridge between the Tauri shell and the async lookup work
pub struct FetchBridge {
    command_tx: Sender<AppCommand>,
    event_rx: Receiver<AppEvent>,
    _runtime: Arc<Runtime>,
}

impl FetchBridge {
    pub fn new(
        store: Arc<ShortcutStore>,
        sink: Arc<NotificationSink>,
        client: ArrivalsClient,
    ) -> Self {
        let (command_tx, command_rx) = async_channel::bounded::<AppCommand>(32);
        let (event_tx, event_rx) = async_channel::bounded::<AppEvent>(64);

        let runtime = Arc::new(
            tokio::runtime::Builder::new_multi_thread()
                .worker_threads(2)
                .enable_all()
                .build()
                .expect("Failed to create Tokio runtime"),
        );

        let rt = runtime.clone();
        runtime.spawn(async move {
            Self::run(store, sink, client, command_rx, event_tx).await;
        });

        Self {
            command_tx,
            event_rx,
            _runtime: rt,
        }
    }

    async fn run(
        store: Arc<ShortcutStore>,
        sink: Arc<NotificationSink>,
        mut client: ArrivalsClient,
        command_rx: Receiver<AppCommand>,
        event_tx: Sender<AppEvent>,
    ) {
        while let Ok(cmd) = command_rx.recv().await {
            match cmd {
                AppCommand::FetchOne { id } => {
                    let target = store.fetch_targets().into_iter().find(|t| t.id == id);
                    match target {
                        Some(target) => {
                            Self::fetch_and_publish(&store, &sink, &client, &event_tx, &target)
                                .await;
                        }
                        // Deleted before the fetch started
                        None => tracing::debug!("Skipping fetch for missing shortcut {}", id),
                    }
                }
                AppCommand::FetchAll => {
                    let targets = store.fetch_targets();
                    tracing::info!("Refreshing arrivals for {} shortcuts", targets.len());
                    for target in targets {
                        Self::fetch_and_publish(&store, &sink, &client, &event_tx, &target).await;
                    }
                }
                AppCommand::ShowToast { message, kind } => {
                    Self::show_toast(&sink, &event_tx, message, kind).await;
                }
                AppCommand::UpdateClient { settings } => {
                    client = ArrivalsClient::new(&settings);
                }
            }
        }
    }

    /// One lookup: apply the outcome to the store and publish the update.
    /// A failed lookup degrades the row to the failure sentinel and raises
    /// an error toast; a completion whose shortcut is gone is dropped.
    async fn fetch_and_publish(
        store: &Arc<ShortcutStore>,
        sink: &Arc<NotificationSink>,
        client: &ArrivalsClient,
        event_tx: &Sender<AppEvent>,
        target: &FetchTarget,
    ) {
        let arrivals = match client.fetch(&target.stop_number, &target.service).await {
            Ok(arrivals) => arrivals,
            Err(e) => {
                tracing::error!(
                    "Arrival lookup failed for bus {} at stop {}: {}",
                    target.service,
                    target.stop_number,
                    e
                );
                Self::show_toast(
                    sink,
                    event_tx,
                    format!(
                        "Error fetching arrival time for Bus {} at Stop {}",
                        target.service, target.stop_number
                    ),
                    ToastKind::Error,
                )
                .await;
                FAILED_ARRIVALS
            }
        };

        match store.update_arrivals(target.id, arrivals) {
            Ok(Some((group_index, shortcut_index))) => {
                let _ = event_tx
                    .send(AppEvent::ArrivalsUpdated {
                        id: target.id,
                        group_index,
                        shortcut_index,
                        arrivals,
                    })
                    .await;
            }
            Ok(None) => {
                tracing::debug!("Dropped arrivals for deleted shortcut {}", target.id);
            }
            Err(e) => {
                tracing::error!("Failed to apply arrivals: {}", e);
            }
        }
    }

    async fn show_toast(
        sink: &Arc<NotificationSink>,
        event_tx: &Sender<AppEvent>,
        message: String,
        kind: ToastKind,
    ) {
        let (toast, evicted) = sink.push(message, kind);
        if let Some(id) = evicted {
            let _ = event_tx.send(AppEvent::ToastDismissed { id }).await;
        }
        let _ = event_tx.send(AppEvent::ToastShown(toast.clone())).await;

        // Self-destruct by id after the fixed interval; dismissal by exact
        // id means an already-evicted toast is left alone.
        let sink = sink.clone();
        let event_tx = event_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(TOAST_TTL).await;
            if sink.dismiss(toast.id) {
                let _ = event_tx.send(AppEvent::ToastDismissed { id: toast.id }).await;
            }
        });
    }

    pub fn command_sender(&self) -> Sender<AppCommand> {
        self.command_tx.clone()
    }

    pub fn event_receiver(&self) -> Receiver<AppEvent> {
        self.event_rx.clone()
    }
}
