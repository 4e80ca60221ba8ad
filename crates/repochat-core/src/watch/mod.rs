mod watcher;

pub use watcher::WorkspaceWatcher;
