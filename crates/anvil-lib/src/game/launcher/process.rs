/// Game process spawning
use crate::error::{LauncherError, LauncherResult};
use crate::utils::process::DetachExt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchedProcess {
    pub pid: Option<u32>,
    /// Only known for attached runs.
    pub exit_code: Option<i32>,
}

/// Bare program names are looked up on `PATH`, anything with a directory
/// component is used as given.
fn resolve_executable(executable: &Path) -> LauncherResult<PathBuf> {
    if executable.components().count() > 1 || executable.is_absolute() {
        return Ok(executable.to_path_buf());
    }
    which::which(executable).map_err(|e| LauncherError::Spawn {
        executable: executable.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()),
    })
}

/// Start `executable` with `argv` in `work_dir`.
///
/// Attached runs inherit stdout/stderr and wait for exit, failing with
/// `ProcessExit` on a non-zero status. Detached runs discard all output,
/// start in their own session/process group and return right after spawn.
pub async fn run(
    executable: &Path,
    argv: &[String],
    work_dir: &Path,
    attach: bool,
) -> LauncherResult<LaunchedProcess> {
    tokio::fs::create_dir_all(work_dir)
        .await
        .map_err(|e| LauncherError::io(work_dir, e))?;

    let program = resolve_executable(executable)?;
    let mut command = Command::new(&program);
    command.args(argv).current_dir(work_dir).stdin(Stdio::null());

    if attach {
        command.stdout(Stdio::inherit()).stderr(Stdio::inherit());
    } else {
        command
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(false)
            .detach();
    }

    let mut child = command.spawn().map_err(|e| LauncherError::Spawn {
        executable: program.clone(),
        source: e,
    })?;
    let pid = child.id();
    log::info!("Started {:?} (pid {:?}, attached: {})", program, pid, attach);

    if !attach {
        return Ok(LaunchedProcess {
            pid,
            exit_code: None,
        });
    }

    let status = child.wait().await.map_err(|e| LauncherError::Spawn {
        executable: program.clone(),
        source: e,
    })?;
    log::info!("Process {:?} exited with {}", pid, status);

    if !status.success() {
        return Err(LauncherError::ProcessExit {
            code: status.code(),
        });
    }

    Ok(LaunchedProcess {
        pid,
        exit_code: status.code(),
    })
}
