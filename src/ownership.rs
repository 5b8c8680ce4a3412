//! Volume ownership fix-up.
//!
//! Mounted volumes arrive owned by whoever created them on the host,
//! usually root. Before dropping privileges the entrypoint re-owns the
//! configured data directories to the application user so the exec'd
//! process can write to them.

use std::fs;
use std::path::Path;

use nix::unistd::{Gid, Group, Uid, User, chown};
use tracing::debug;

use crate::error::EntrykitError;

/// Resolved uid/gid the application runs as.
#[derive(Debug, Clone, Copy)]
pub struct Owner {
    pub uid: Uid,
    pub gid: Gid,
}

/// Look up `user` (and `group`, when given) in the system user
/// database. Without an explicit group the user's primary group is
/// used. Unknown names are fatal.
pub fn resolve_owner(user: &str, group: Option<&str>) -> Result<Owner, EntrykitError> {
    let user_entry = User::from_name(user)?
        .ok_or_else(|| EntrykitError::UnknownUser(user.to_string()))?;
    let gid = match group {
        Some(name) => {
            Group::from_name(name)?
                .ok_or_else(|| EntrykitError::UnknownGroup(name.to_string()))?
                .gid
        }
        None => user_entry.gid,
    };
    Ok(Owner {
        uid: user_entry.uid,
        gid,
    })
}

/// Recursively chown `path` to `owner`, returning the number of
/// entries changed. Symlinks are neither followed nor chowned.
pub fn chown_recursive(path: &Path, owner: &Owner) -> Result<u64, EntrykitError> {
    let meta = fs::symlink_metadata(path)?;
    if meta.file_type().is_symlink() {
        debug!(path = %path.display(), "skipping symlink");
        return Ok(0);
    }

    chown(path, Some(owner.uid), Some(owner.gid))?;
    let mut changed = 1;

    if meta.is_dir() {
        for entry in fs::read_dir(path)? {
            changed += chown_recursive(&entry?.path(), owner)?;
        }
    }
    Ok(changed)
}
