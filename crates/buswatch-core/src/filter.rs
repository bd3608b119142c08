// SPDX-License-Identifier: AGPL-3.0
// Buswatch Core - View filtering

use crate::types::Group;

/// Derive the display subset of groups for a search term.
///
/// Matches case-insensitively against group names only, never shortcut
/// fields. An empty term yields an identity copy in insertion order.
pub fn filter_groups(groups: &[Group], term: &str) -> Vec<Group> {
    if term.is_empty() {
        return groups.to_vec();
    }

    let term = term.to_lowercase();
    groups
        .iter()
        .filter(|group| group.name.to_lowercase().contains(&term))
        .cloned()
        .collect()
}
