mod clean;
mod core;
mod watcher;

pub use clean::{clean_all, clean_folder};
pub use core::{BatchOutcome, build_all, build_folder, find_source};
pub use watcher::{WatchProvider, default_providers, select_provider, watch};
