//! Final handoff: drop privileges and replace this process with the
//! application command.

use std::convert::Infallible;
use std::ffi::CString;

use nix::unistd::{execvp, setgid, setgroups, setuid};
use tracing::info;

use crate::error::EntrykitError;
use crate::ownership::Owner;

/// Exec `argv`, dropping to `owner` first when one is given (i.e. when
/// the entrypoint started as root). Group list must be dropped before
/// setuid, while we still have the privilege to do so.
///
/// On success this never returns: the process image is replaced and
/// the command inherits our environment and pid.
pub fn exec_as(owner: Option<&Owner>, argv: &[String]) -> Result<Infallible, EntrykitError> {
    if argv.is_empty() {
        return Err(EntrykitError::InvalidConfig(
            "no command to exec".to_string(),
        ));
    }

    let c_argv = argv
        .iter()
        .map(|arg| CString::new(arg.as_str()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| {
            EntrykitError::InvalidConfig("command argument contains a NUL byte".to_string())
        })?;

    if let Some(owner) = owner {
        setgroups(&[owner.gid])?;
        setgid(owner.gid)?;
        setuid(owner.uid)?;
        info!(uid = %owner.uid, gid = %owner.gid, command = %argv[0], "dropping privileges and handing off");
    } else {
        info!(command = %argv[0], "handing off");
    }

    execvp(&c_argv[0], &c_argv)?;
    unreachable!();
}
