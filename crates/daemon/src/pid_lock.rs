// SPDX-License-Identifier: MIT

//! PID-lock acquisition (§4.9): "write the current process id to a file
//! atomically; if the file already exists and the referenced process
//! responds to a null signal, refuse to start; otherwise treat the file as
//! stale and take it over."
//!
//! The teacher's `lifecycle/startup.rs` takes a pure `fs2::FileExt`
//! advisory lock with no liveness check of its own. That alone does not
//! match the contract above, which asks for an explicit `kill(pid, 0)`
//! probe so a lock file orphaned by e.g. a hard power-loss (no chance to
//! unlock) is recognized as stale rather than treated as a live daemon
//! forever. Both mechanisms are applied: the fs2 lock guards against two
//! processes racing to take over the same stale file, and the signal probe
//! supplies the liveness judgment spec.md asks for.

use crate::error::{DaemonError, Result};
use fs2::FileExt;
use nix::sys::signal::kill;
use nix::unistd::Pid;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct PidLock {
    path: PathBuf,
    file: File,
}

impl PidLock {
    /// Acquire the lock at `path`, taking over a stale file left by a dead
    /// process. Fails with [`DaemonError::LockHeld`] when the recorded pid
    /// answers a null signal (i.e. the process is still alive).
    pub fn acquire(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().read(true).write(true).create(true).truncate(false).open(&path)?;

        if let Some(existing_pid) = read_pid(&mut file) {
            if process_is_alive(existing_pid) {
                return Err(DaemonError::LockHeld(path, existing_pid));
            }
        }

        // Either no pid was recorded, or it belongs to a dead process: take
        // the file over. The exclusive fs2 lock arbitrates between
        // concurrent callers racing this same takeover.
        file.try_lock_exclusive().map_err(|_| DaemonError::LockHeld(path.clone(), std::process::id() as i32))?;

        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        writeln!(file, "{}", std::process::id())?;
        file.flush()?;

        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock and remove the file. Idempotent.
    pub fn release(self) {
        let _ = fs2::FileExt::unlock(&self.file);
        let _ = std::fs::remove_file(&self.path);
    }
}

fn read_pid(file: &mut File) -> Option<i32> {
    let mut contents = String::new();
    file.read_to_string(&mut contents).ok()?;
    contents.trim().parse().ok()
}

fn process_is_alive(pid: i32) -> bool {
    kill(Pid::from_raw(pid), None).is_ok()
}

#[cfg(test)]
#[path = "pid_lock_tests.rs"]
mod tests;
