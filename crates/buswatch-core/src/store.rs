// SPDX-License-Identifier: AGPL-3.0
// Buswatch Core - Shortcut store
//
// Owns the canonical group/shortcut collection, persisted to a local JSON
// file. Arrival estimates are transient: every write goes through a stripped
// copy, and every load reconstructs them as unknown.

use crate::types::{
    AppError, Arrivals, DeleteTarget, DraftShortcut, FetchTarget, Group, GroupChoice,
    PendingDelete, Shortcut, UNKNOWN_ARRIVALS,
};
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;
use uuid::Uuid;

/// Canonical collection of groups and shortcuts
pub struct ShortcutStore {
    groups: RwLock<Vec<Group>>,
    pending_delete: RwLock<Option<PendingDelete>>,
    file_path: PathBuf,
}

// On-disk shape: the persisted array omits each shortcut's arrivals.
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredGroup {
    name: String,
    shortcuts: Vec<StoredShortcut>,
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredShortcut {
    #[serde(default = "Uuid::new_v4")]
    id: Uuid,
    service: String,
    stop_number: String,
    #[serde(default)]
    name: String,
}

impl ShortcutStore {
    /// Create a store backed by the platform config dir, loading from disk
    /// if a previous snapshot exists.
    pub fn new() -> Result<Self, AppError> {
        Self::with_path(Self::default_path()?)
    }

    /// Create a store backed by an explicit file path (tests use a temp dir).
    pub fn with_path(file_path: PathBuf) -> Result<Self, AppError> {
        let groups = if file_path.exists() {
            let content = fs::read_to_string(&file_path)
                .map_err(|e| AppError::FileIo(format!("Failed to read shortcuts: {}", e)))?;

            let stored: Vec<StoredGroup> = serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse shortcuts, starting empty: {}", e);
                Vec::new()
            });

            stored
                .into_iter()
                .map(|group| Group {
                    name: group.name,
                    shortcuts: group
                        .shortcuts
                        .into_iter()
                        .map(|s| Shortcut {
                            id: s.id,
                            service: s.service,
                            stop_number: s.stop_number,
                            name: s.name,
                            arrivals: UNKNOWN_ARRIVALS,
                        })
                        .collect(),
                })
                .collect()
        } else {
            Vec::new()
        };

        Ok(Self {
            groups: RwLock::new(groups),
            pending_delete: RwLock::new(None),
            file_path,
        })
    }

    /// Get the path to the shortcuts file
    fn default_path() -> Result<PathBuf, AppError> {
        let config_dir = directories::ProjectDirs::from("com", "buswatch", "buswatch")
            .ok_or_else(|| AppError::FileIo("Could not determine config directory".to_string()))?
            .config_dir()
            .to_path_buf();

        fs::create_dir_all(&config_dir)
            .map_err(|e| AppError::FileIo(format!("Failed to create config dir: {}", e)))?;

        Ok(config_dir.join("shortcuts.json"))
    }

    /// Persist the collection to disk, minus the transient arrivals
    fn persist(&self) -> Result<(), AppError> {
        let groups = self.groups.read().unwrap();
        let stored: Vec<StoredGroup> = groups
            .iter()
            .map(|group| StoredGroup {
                name: group.name.clone(),
                shortcuts: group
                    .shortcuts
                    .iter()
                    .map(|s| StoredShortcut {
                        id: s.id,
                        service: s.service.clone(),
                        stop_number: s.stop_number.clone(),
                        name: s.name.clone(),
                    })
                    .collect(),
            })
            .collect();

        let content = serde_json::to_string_pretty(&stored)
            .map_err(|e| AppError::Serialization(format!("Failed to serialize shortcuts: {}", e)))?;

        fs::write(&self.file_path, content)
            .map_err(|e| AppError::FileIo(format!("Failed to write shortcuts: {}", e)))?;

        Ok(())
    }

    /// Snapshot of the canonical collection
    pub fn groups(&self) -> Vec<Group> {
        self.groups.read().unwrap().clone()
    }

    /// Validate the draft and append a new shortcut, creating the target
    /// group if needed. Returns the appended shortcut so the caller can
    /// enqueue its arrival fetch.
    pub fn add_shortcut(&self, draft: &DraftShortcut) -> Result<Shortcut, AppError> {
        let service = draft.service.trim();
        let stop_number = draft.stop_number.trim();

        if service.is_empty() || stop_number.is_empty() {
            return Err(AppError::Validation(
                "Please enter both bus service and stop number".to_string(),
            ));
        }

        let (group_name, create_if_missing) = match &draft.group {
            GroupChoice::New { name } => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(AppError::Validation(
                        "Please enter a name for the new group".to_string(),
                    ));
                }
                (name.to_string(), true)
            }
            GroupChoice::Existing { name } => (name.clone(), false),
        };

        let shortcut = {
            let mut groups = self.groups.write().unwrap();

            if create_if_missing && !groups.iter().any(|g| g.name == group_name) {
                groups.push(Group {
                    name: group_name.clone(),
                    shortcuts: Vec::new(),
                });
            }

            let group = groups
                .iter_mut()
                .find(|g| g.name == group_name)
                .ok_or_else(|| {
                    AppError::Validation(format!("Group \"{}\" does not exist", group_name))
                })?;

            let duplicate = group
                .shortcuts
                .iter()
                .any(|s| s.service == service && s.stop_number == stop_number);
            if duplicate {
                return Err(AppError::Validation(
                    "This bus service and stop already exists in this group".to_string(),
                ));
            }

            let shortcut = Shortcut::new(service, stop_number, &draft.name);
            group.shortcuts.push(shortcut.clone());
            shortcut
        };

        self.persist()?;
        tracing::info!(
            "Added shortcut for bus {} at stop {}",
            shortcut.service,
            shortcut.stop_number
        );
        Ok(shortcut)
    }

    /// Stage a shortcut deletion and return the confirmation prompt.
    /// Nothing is mutated until [`ShortcutStore::confirm_delete`].
    pub fn stage_delete_shortcut(
        &self,
        group_index: usize,
        shortcut_index: usize,
    ) -> Result<String, AppError> {
        {
            let groups = self.groups.read().unwrap();
            let group = groups
                .get(group_index)
                .ok_or_else(|| AppError::Validation("No such group".to_string()))?;
            group
                .shortcuts
                .get(shortcut_index)
                .ok_or_else(|| AppError::Validation("No such shortcut".to_string()))?;
        }

        *self.pending_delete.write().unwrap() = Some(PendingDelete::Shortcut {
            group_index,
            shortcut_index,
        });
        Ok("Are you sure you want to delete this shortcut?".to_string())
    }

    /// Stage a group deletion and return the confirmation prompt.
    pub fn stage_delete_group(&self, group_index: usize) -> Result<String, AppError> {
        let group_name = {
            let groups = self.groups.read().unwrap();
            groups
                .get(group_index)
                .map(|g| g.name.clone())
                .ok_or_else(|| AppError::Validation("No such group".to_string()))?
        };

        *self.pending_delete.write().unwrap() = Some(PendingDelete::Group { group_index });
        Ok(format!(
            "Are you sure you want to delete the group \"{}\" and all its shortcuts?",
            group_name
        ))
    }

    /// Execute the staged deletion. Removing the last shortcut of a group
    /// also removes the group. Returns `Ok(None)` when nothing was staged or
    /// the staged indices no longer resolve (nothing is mutated either way).
    pub fn confirm_delete(&self) -> Result<Option<DeleteTarget>, AppError> {
        let staged = self.pending_delete.write().unwrap().take();
        let Some(staged) = staged else {
            return Ok(None);
        };

        let deleted = {
            let mut groups = self.groups.write().unwrap();
            match staged {
                PendingDelete::Shortcut {
                    group_index,
                    shortcut_index,
                } => {
                    let Some(group) = groups.get_mut(group_index) else {
                        return Ok(None);
                    };
                    if shortcut_index >= group.shortcuts.len() {
                        return Ok(None);
                    }
                    group.shortcuts.remove(shortcut_index);
                    if group.shortcuts.is_empty() {
                        groups.remove(group_index);
                    }
                    DeleteTarget::Shortcut
                }
                PendingDelete::Group { group_index } => {
                    if group_index >= groups.len() {
                        return Ok(None);
                    }
                    groups.remove(group_index);
                    DeleteTarget::Group
                }
            }
        };

        self.persist()?;
        Ok(Some(deleted))
    }

    /// Clear the staged deletion without mutating the collection
    pub fn cancel_delete(&self) {
        *self.pending_delete.write().unwrap() = None;
    }

    /// Replace the addressed shortcut's arrivals. Resolves by stable id, so a
    /// completion for a shortcut deleted mid-flight is a silent drop:
    /// `Ok(None)`. On a hit, returns the shortcut's current canonical
    /// position for the UI event.
    pub fn update_arrivals(
        &self,
        id: Uuid,
        arrivals: Arrivals,
    ) -> Result<Option<(usize, usize)>, AppError> {
        let position = {
            let mut groups = self.groups.write().unwrap();
            let mut position = None;
            'groups: for (group_index, group) in groups.iter_mut().enumerate() {
                for (shortcut_index, shortcut) in group.shortcuts.iter_mut().enumerate() {
                    if shortcut.id == id {
                        shortcut.arrivals = arrivals;
                        position = Some((group_index, shortcut_index));
                        break 'groups;
                    }
                }
            }
            position
        };

        match position {
            Some(position) => {
                self.persist()?;
                Ok(Some(position))
            }
            None => Ok(None),
        }
    }

    /// Lookup coordinates for every shortcut, in group-then-shortcut order
    pub fn fetch_targets(&self) -> Vec<FetchTarget> {
        self.groups
            .read()
            .unwrap()
            .iter()
            .flat_map(|group| {
                group.shortcuts.iter().map(|s| FetchTarget {
                    id: s.id,
                    service: s.service.clone(),
                    stop_number: s.stop_number.clone(),
                })
            })
            .collect()
    }

    /// Wholesale replacement of the collection (import). No merge.
    pub fn replace_all(&self, new_groups: Vec<Group>) -> Result<(), AppError> {
        {
            let mut groups = self.groups.write().unwrap();
            *groups = new_groups;
        }
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (ShortcutStore, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = ShortcutStore::with_path(dir.path().join("shortcuts.json")).unwrap();
        (store, dir)
    }

    fn draft(service: &str, stop: &str, group: GroupChoice) -> DraftShortcut {
        DraftShortcut {
            service: service.to_string(),
            stop_number: stop.to_string(),
            name: String::new(),
            group,
        }
    }

    fn new_group(name: &str) -> GroupChoice {
        GroupChoice::New {
            name: name.to_string(),
        }
    }

    #[test]
    fn test_add_rejects_missing_fields() {
        let (store, _dir) = test_store();

        let err = store
            .add_shortcut(&draft("", "12345", new_group("Home")))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = store
            .add_shortcut(&draft("196", "   ", new_group("Home")))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        assert!(store.groups().is_empty());
    }

    #[test]
    fn test_add_rejects_blank_new_group_name() {
        let (store, _dir) = test_store();

        let err = store
            .add_shortcut(&draft("196", "12345", new_group("  ")))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(store.groups().is_empty());
    }

    #[test]
    fn test_add_creates_group_and_defaults_name() {
        let (store, _dir) = test_store();

        let shortcut = store
            .add_shortcut(&draft("196", "12345", new_group("Home")))
            .unwrap();
        assert_eq!(shortcut.name, "Bus 196 - Stop 12345");
        assert_eq!(shortcut.arrivals, UNKNOWN_ARRIVALS);

        let groups = store.groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Home");
        assert_eq!(groups[0].shortcuts.len(), 1);
    }

    #[test]
    fn test_add_new_group_choice_reuses_existing_group() {
        let (store, _dir) = test_store();

        store
            .add_shortcut(&draft("196", "12345", new_group("Home")))
            .unwrap();
        store
            .add_shortcut(&draft("147", "12345", new_group("Home")))
            .unwrap();

        let groups = store.groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].shortcuts.len(), 2);
    }

    #[test]
    fn test_add_rejects_duplicate_pair_within_group() {
        let (store, _dir) = test_store();

        store
            .add_shortcut(&draft("196", "12345", new_group("Home")))
            .unwrap();
        let err = store
            .add_shortcut(&draft("196", "12345", new_group("Home")))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(store.groups()[0].shortcuts.len(), 1);

        // Same pair in a different group is fine
        store
            .add_shortcut(&draft("196", "12345", new_group("Work")))
            .unwrap();
        assert_eq!(store.groups().len(), 2);
    }

    #[test]
    fn test_add_to_missing_existing_group_fails() {
        let (store, _dir) = test_store();

        let err = store
            .add_shortcut(&draft(
                "196",
                "12345",
                GroupChoice::Existing {
                    name: "Nowhere".to_string(),
                },
            ))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(store.groups().is_empty());
    }

    #[test]
    fn test_delete_last_shortcut_removes_group() {
        let (store, _dir) = test_store();

        store
            .add_shortcut(&draft("196", "12345", new_group("Home")))
            .unwrap();
        store.stage_delete_shortcut(0, 0).unwrap();
        let deleted = store.confirm_delete().unwrap();

        assert_eq!(deleted, Some(DeleteTarget::Shortcut));
        assert!(store.groups().is_empty());
    }

    #[test]
    fn test_delete_keeps_siblings_in_order() {
        let (store, _dir) = test_store();

        store
            .add_shortcut(&draft("196", "11111", new_group("Home")))
            .unwrap();
        store
            .add_shortcut(&draft("147", "22222", new_group("Home")))
            .unwrap();
        store
            .add_shortcut(&draft("33", "33333", new_group("Home")))
            .unwrap();

        store.stage_delete_shortcut(0, 1).unwrap();
        store.confirm_delete().unwrap();

        let groups = store.groups();
        assert_eq!(groups.len(), 1);
        let services: Vec<&str> = groups[0]
            .shortcuts
            .iter()
            .map(|s| s.service.as_str())
            .collect();
        assert_eq!(services, vec!["196", "33"]);
    }

    #[test]
    fn test_delete_group_cascades() {
        let (store, _dir) = test_store();

        store
            .add_shortcut(&draft("196", "11111", new_group("Home")))
            .unwrap();
        store
            .add_shortcut(&draft("147", "22222", new_group("Home")))
            .unwrap();
        store
            .add_shortcut(&draft("33", "33333", new_group("Work")))
            .unwrap();

        let prompt = store.stage_delete_group(0).unwrap();
        assert!(prompt.contains("Home"));
        let deleted = store.confirm_delete().unwrap();

        assert_eq!(deleted, Some(DeleteTarget::Group));
        let groups = store.groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Work");
    }

    #[test]
    fn test_confirm_without_stage_is_noop() {
        let (store, _dir) = test_store();

        store
            .add_shortcut(&draft("196", "12345", new_group("Home")))
            .unwrap();
        assert_eq!(store.confirm_delete().unwrap(), None);
        assert_eq!(store.groups().len(), 1);
    }

    #[test]
    fn test_cancel_delete_clears_stage() {
        let (store, _dir) = test_store();

        store
            .add_shortcut(&draft("196", "12345", new_group("Home")))
            .unwrap();
        store.stage_delete_shortcut(0, 0).unwrap();
        store.cancel_delete();

        assert_eq!(store.confirm_delete().unwrap(), None);
        assert_eq!(store.groups().len(), 1);
    }

    #[test]
    fn test_update_arrivals_by_id() {
        let (store, _dir) = test_store();

        let shortcut = store
            .add_shortcut(&draft("196", "12345", new_group("Home")))
            .unwrap();
        let position = store
            .update_arrivals(shortcut.id, [Some(4), Some(9), Some(17)])
            .unwrap();

        assert_eq!(position, Some((0, 0)));
        assert_eq!(
            store.groups()[0].shortcuts[0].arrivals,
            [Some(4), Some(9), Some(17)]
        );
    }

    #[test]
    fn test_update_arrivals_stale_id_is_dropped() {
        let (store, _dir) = test_store();

        let shortcut = store
            .add_shortcut(&draft("196", "12345", new_group("Home")))
            .unwrap();
        store.stage_delete_shortcut(0, 0).unwrap();
        store.confirm_delete().unwrap();

        let position = store
            .update_arrivals(shortcut.id, [Some(4), Some(9), Some(17)])
            .unwrap();
        assert_eq!(position, None);
        assert!(store.groups().is_empty());
    }

    #[test]
    fn test_persistence_strips_arrivals() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shortcuts.json");

        let shortcut_id = {
            let store = ShortcutStore::with_path(path.clone()).unwrap();
            let shortcut = store
                .add_shortcut(&draft("196", "12345", new_group("Home")))
                .unwrap();
            store
                .update_arrivals(shortcut.id, [Some(4), Some(9), Some(17)])
                .unwrap();
            shortcut.id
        };

        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("arrivals"));

        let reloaded = ShortcutStore::with_path(path).unwrap();
        let groups = reloaded.groups();
        assert_eq!(groups[0].shortcuts[0].id, shortcut_id);
        assert_eq!(groups[0].shortcuts[0].arrivals, UNKNOWN_ARRIVALS);
    }

    #[test]
    fn test_unparseable_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shortcuts.json");
        fs::write(&path, "not json at all").unwrap();

        let store = ShortcutStore::with_path(path).unwrap();
        assert!(store.groups().is_empty());
    }

    #[test]
    fn test_replace_all_persists() {
        let (store, _dir) = test_store();

        store
            .add_shortcut(&draft("196", "12345", new_group("Home")))
            .unwrap();
        store.replace_all(Vec::new()).unwrap();
        assert!(store.groups().is_empty());
    }
}
