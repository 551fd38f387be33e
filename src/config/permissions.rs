//! Owner-only access checks for configuration files.
//!
//! Configuration files may carry credentials, so anything beyond owner
//! read/write is refused before the file is opened.

use crate::error::PermissionProblem;

#[cfg(unix)]
const GROUP_READ: u32 = 0o040;
#[cfg(unix)]
const GROUP_WRITE: u32 = 0o020;
#[cfg(unix)]
const WORLD_READ: u32 = 0o004;
#[cfg(unix)]
const WORLD_WRITE: u32 = 0o002;

/// First offending bit in `mode`, checked group-read, group-write,
/// world-read, world-write in that order.
#[cfg(unix)]
pub fn check_mode(mode: u32) -> Option<PermissionProblem> {
    [
        (GROUP_READ, PermissionProblem::GroupReadable),
        (GROUP_WRITE, PermissionProblem::GroupWritable),
        (WORLD_READ, PermissionProblem::WorldReadable),
        (WORLD_WRITE, PermissionProblem::WorldWritable),
    ]
    .into_iter()
    .find(|(bit, _)| mode & bit != 0)
    .map(|(_, problem)| problem)
}

/// Check the permissions of an already-stat'ed file.
#[cfg(unix)]
pub fn check_metadata(metadata: &std::fs::Metadata) -> Option<PermissionProblem> {
    use std::os::unix::fs::PermissionsExt;
    check_mode(metadata.permissions().mode())
}

/// No group/world mode bits exist off Unix; nothing to refuse.
#[cfg(not(unix))]
pub fn check_metadata(_metadata: &std::fs::Metadata) -> Option<PermissionProblem> {
    None
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_owner_only_modes_pass() {
        for mode in [0o600, 0o400, 0o200, 0o700, 0o100600] {
            assert_eq!(check_mode(mode), None, "mode {:o}", mode);
        }
    }

    #[test]
    fn test_every_group_or_world_bit_is_refused() {
        for bits in 1..=0o77u32 {
            let mode = 0o600 | bits;
            let unsafe_bits = bits & 0o066;
            assert_eq!(
                check_mode(mode).is_some(),
                unsafe_bits != 0,
                "mode {:o}",
                mode
            );
        }
    }

    #[test]
    fn test_group_read_is_reported_first() {
        assert_eq!(check_mode(0o666), Some(PermissionProblem::GroupReadable));
        assert_eq!(check_mode(0o626), Some(PermissionProblem::GroupWritable));
        assert_eq!(check_mode(0o606), Some(PermissionProblem::WorldReadable));
        assert_eq!(check_mode(0o602), Some(PermissionProblem::WorldWritable));
    }
}
