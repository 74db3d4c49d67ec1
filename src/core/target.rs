//! Resolves requested printer IDs against the roster.

use crate::config::{DeviceEntry, DeviceId, Roster};
use crate::error::{InvalidTargetId, UnknownTargets};

/// Parses a comma-separated ID list such as `1, 2,3,`.
///
/// Whitespace around each token is trimmed and empty tokens are dropped. Duplicates are kept.
pub fn parse_ids(raw: &str) -> Result<Vec<DeviceId>, InvalidTargetId> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.parse::<DeviceId>().map_err(|_| InvalidTargetId {
                token: token.to_owned(),
            })
        })
        .collect()
}

/// Returns the roster entries for `requested`, in request order.
///
/// Each occurrence of a duplicated ID yields the same entry again. If any ID is missing from the
/// roster, nothing is returned and the error lists every missing ID.
pub fn select<'r>(
    roster: &'r Roster,
    requested: &[DeviceId],
) -> Result<Vec<&'r DeviceEntry>, UnknownTargets> {
    let mut selected = Vec::with_capacity(requested.len());
    let mut missing = Vec::new();

    for &id in requested {
        match roster.get(id) {
            Some(entry) => selected.push(entry),
            None => missing.push(id),
        }
    }

    if missing.is_empty() {
        Ok(selected)
    } else {
        Err(UnknownTargets { ids: missing })
    }
}
