use crate::error::{RepochatError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Watches the open workspace roots and reports newly created source files.
///
/// Only `Create` events pass through, filtered to the extensions the backend
/// indexes. Dropping the watcher stops the stream.
pub struct WorkspaceWatcher {
    _watcher: RecommendedWatcher,
}

impl WorkspaceWatcher {
    /// Start watching. Returns a receiver of created-file paths.
    pub fn watch(
        roots: &[PathBuf],
        extensions: &[String],
    ) -> Result<(Self, mpsc::UnboundedReceiver<PathBuf>)> {
        let filter = source_file_globs(extensions)?;
        let (tx, rx) = mpsc::unbounded_channel();

        let mut watcher = RecommendedWatcher::new(
            move |result: std::result::Result<Event, notify::Error>| {
                if let Ok(event) = result {
                    if !matches!(event.kind, EventKind::Create(_)) {
                        return;
                    }
                    for path in event.paths {
                        if filter.is_match(&path) {
                            // Receiver may be gone during shutdown.
                            let _ = tx.send(path);
                        }
                    }
                }
            },
            Config::default(),
        )
        .map_err(|e| RepochatError::Watch(format!("failed to create watcher: {e}")))?;

        for root in roots {
            watcher
                .watch(root, RecursiveMode::Recursive)
                .map_err(|e| {
                    RepochatError::Watch(format!("failed to watch {}: {e}", root.display()))
                })?;
        }

        Ok((Self { _watcher: watcher }, rx))
    }
}

fn source_file_globs(extensions: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for ext in extensions {
        let ext = ext.trim_start_matches('.');
        let glob = Glob::new(&format!("**/*.{ext}"))
            .map_err(|e| RepochatError::Config(format!("bad watch extension {ext:?}: {e}")))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| RepochatError::Config(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob_set_matches_configured_extensions() {
        let set = source_file_globs(&["py".to_string(), ".ts".to_string()]).unwrap();
        assert!(set.is_match("/proj/src/app.py"));
        assert!(set.is_match("/proj/web/index.ts"));
        assert!(!set.is_match("/proj/build/app.o"));
        assert!(!set.is_match("/proj/Makefile"));
    }
}
