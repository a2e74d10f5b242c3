use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use crossbeam_channel::{unbounded, Sender};

use crate::scan::domain::file_classifier::FileClassifier;

/// Recursively enumerate files under `paths` and return those accepted by
/// `classifier`, in no particular order.
///
/// Traversal and classification run as two decoupled worker pools connected
/// by a channel, so an expensive classifier (container probing) never stalls
/// directory walking. Unreadable directories are skipped with a warning and
/// never fail the scan.
pub fn scan(paths: &[PathBuf], classifier: &dyn FileClassifier) -> Vec<PathBuf> {
    let workers = worker_count();

    let (root_tx, root_rx) = unbounded::<PathBuf>();
    let (file_tx, file_rx) = unbounded::<PathBuf>();
    let (match_tx, match_rx) = unbounded::<PathBuf>();

    for path in paths {
        if !path.exists() {
            log::warn!("input path not found: {}", path.display());
            continue;
        }
        let _ = root_tx.send(path.clone());
    }
    drop(root_tx);

    thread::scope(|s| {
        for _ in 0..workers {
            let root_rx = root_rx.clone();
            let file_tx = file_tx.clone();
            s.spawn(move || {
                for root in root_rx {
                    walk(&root, &file_tx);
                }
            });
        }
        drop(root_rx);
        drop(file_tx);

        for _ in 0..workers {
            let file_rx = file_rx.clone();
            let match_tx = match_tx.clone();
            s.spawn(move || {
                for file in file_rx {
                    if classifier.is_match(&file) {
                        let _ = match_tx.send(file);
                    }
                }
            });
        }
        drop(file_rx);
        drop(match_tx);

        match_rx.iter().collect()
    })
}

fn walk(path: &Path, file_tx: &Sender<PathBuf>) {
    if path.is_file() {
        let _ = file_tx.send(absolute(path));
        return;
    }
    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("skipping unreadable directory {}: {e}", path.display());
            return;
        }
    };
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("skipping unreadable entry under {}: {e}", path.display());
                continue;
            }
        };
        let child = entry.path();
        if child.is_dir() {
            walk(&child, file_tx);
        } else {
            let _ = file_tx.send(absolute(&child));
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn worker_count() -> usize {
    // Both phases are I/O bound; oversubscribe relative to core count.
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        * 2
}
