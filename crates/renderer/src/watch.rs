//! Background watcher that feeds shader file changes into the reload handoff.

use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use crossbeam_channel::unbounded;
use notify::{Event, RecursiveMode, Watcher};
use tracing::{debug, error, info};

use crate::reload::ReloadSender;

/// Spawns the watcher thread for the given shader file.
///
/// The thread lives for the rest of the process and is never joined. If the
/// filesystem subscription cannot be established it logs the failure and
/// exits, leaving the render loop running on its current program with live
/// reload disabled.
pub(crate) fn spawn_source_watcher(
    path: PathBuf,
    sender: ReloadSender,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("fragview-watcher".into())
        .spawn(move || watch_source(path, sender))
}

fn watch_source(path: PathBuf, sender: ReloadSender) {
    let (event_tx, event_rx) = unbounded();
    let mut watcher =
        match notify::recommended_watcher(move |result: Result<Event, notify::Error>| {
            let _ = event_tx.send(result);
        }) {
            Ok(watcher) => watcher,
            Err(err) => {
                error!(error = %err, "failed to create file watcher; live reload disabled");
                return;
            }
        };

    if let Err(err) = watcher.watch(&path, RecursiveMode::NonRecursive) {
        error!(
            path = %path.display(),
            error = %err,
            "failed to watch shader file; live reload disabled"
        );
        return;
    }
    info!(path = %path.display(), "watching shader file for changes");

    for result in event_rx {
        match result {
            Ok(event) => {
                if !(event.kind.is_modify() || event.kind.is_create()) {
                    continue;
                }
                debug!(kind = ?event.kind, "shader file changed");
                let source = match std::fs::read_to_string(&path) {
                    Ok(source) => source,
                    Err(err) => {
                        error!(
                            path = %path.display(),
                            error = %err,
                            "failed to re-read shader file"
                        );
                        std::process::exit(1);
                    }
                };
                if !sender.offer(source) {
                    return;
                }
            }
            Err(err) => error!(error = %err, "file watcher error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::thread;
    use std::time::{Duration, Instant};

    use super::*;
    use crate::reload::reload_handoff;

    #[test]
    fn watcher_delivers_modified_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shader.frag");
        fs::write(&path, "void main() {}\n").unwrap();

        let (tx, rx) = reload_handoff();
        let _watcher = spawn_source_watcher(path.clone(), tx).unwrap();

        // Give the subscription a moment to establish before writing.
        thread::sleep(Duration::from_millis(200));
        fs::write(&path, "void main() { /* updated */ }\n").unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        let source = loop {
            if let Some(source) = rx.try_take() {
                break source;
            }
            assert!(
                Instant::now() < deadline,
                "no reload arrived within the deadline"
            );
            thread::sleep(Duration::from_millis(10));
        };
        assert!(source.contains("updated"));
    }

    #[test]
    fn watcher_exits_when_the_path_cannot_be_watched() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = reload_handoff();
        let watcher = spawn_source_watcher(dir.path().join("missing.frag"), tx).unwrap();

        watcher.join().unwrap();
        assert!(rx.try_take().is_none());
    }
}
