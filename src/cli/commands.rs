//! CLI command implementations.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::archive::{ArchiveReader, ArchiveWriter};
use crate::location::PortableResolver;
use crate::store::{bootstrap_archive, FavoriteStore};
use crate::types::{SidelistError, SidelistResult, Value};

/// Environment variable overriding the container file location.
pub const FILE_ENV: &str = "SIDELIST_FILE";

/// Environment variable holding a shell command to run after each save.
pub const RELOAD_ENV: &str = "SIDELIST_RELOAD_CMD";

/// Resolve the container file path: `$SIDELIST_FILE`, else the user data
/// directory.
pub fn default_store_path() -> SidelistResult<PathBuf> {
    if let Some(path) = std::env::var_os(FILE_ENV) {
        return Ok(PathBuf::from(path));
    }
    let base = std::env::var_os("XDG_DATA_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".local/share")));
    match base {
        Some(dir) => Ok(dir.join("sidelist").join("favorites.slar")),
        None => Err(SidelistError::PathUnresolvable {
            path: "favorites.slar".to_string(),
            reason: "neither XDG_DATA_HOME nor HOME is set".to_string(),
        }),
    }
}

/// Read the container file, synthesizing and writing a minimal archive when
/// it does not exist yet. Absence is not an error.
pub fn load_or_bootstrap(path: &Path) -> SidelistResult<Value> {
    if path.exists() {
        return ArchiveReader::read_from_file(path);
    }
    let archive = bootstrap_archive();
    save(path, &archive)?;
    Ok(archive)
}

/// Persist the archive, creating parent directories on first write.
pub fn save(path: &Path, archive: &Value) -> SidelistResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    ArchiveWriter::write_to_file(archive, path)
}

/// Ask interested processes to pick up the new list.
///
/// Runs `$SIDELIST_RELOAD_CMD` through the shell when set. A broken reload
/// command is a warning, never an error: the save already succeeded.
pub fn signal_reload() {
    let Some(cmd) = std::env::var_os(RELOAD_ENV) else {
        return;
    };
    match Command::new("sh").arg("-c").arg(&cmd).status() {
        Ok(status) if status.success() => {}
        Ok(status) => eprintln!("Warning: reload command exited with {}", status),
        Err(e) => eprintln!("Warning: reload command failed: {}", e),
    }
}

/// Print the favorites in stored order.
pub fn cmd_list(path: &Path, json: bool) -> SidelistResult<()> {
    let archive = load_or_bootstrap(path)?;
    let resolver = PortableResolver::new();
    let store = FavoriteStore::new(&resolver);
    let entries = store.list(&archive)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&entries).unwrap_or_default()
        );
    } else {
        for entry in &entries {
            if entry.stale {
                println!("{} (stale)", entry.path);
            } else {
                println!("{}", entry.path);
            }
        }
    }
    Ok(())
}

/// Add favorites for the given paths, each attempted independently.
///
/// Persists when at least one path succeeded; errors (and persists nothing)
/// only when every path failed.
pub fn cmd_add(path: &Path, paths: &[String], json: bool) -> SidelistResult<()> {
    let mut archive = load_or_bootstrap(path)?;
    let resolver = PortableResolver::new();
    let store = FavoriteStore::new(&resolver);

    let outcome = store.add_all(&mut archive, paths)?;
    for (failed, error) in &outcome.failures {
        eprintln!("Error adding {}: {}", failed, error);
    }
    if outcome.all_failed() {
        return Err(SidelistError::AllAddsFailed(outcome.failures.len()));
    }

    save(path, &archive)?;
    signal_reload();

    if json {
        let uuids: Vec<&str> = outcome.added.iter().map(|item| item.uuid.as_str()).collect();
        println!(
            "{}",
            serde_json::json!({"added": uuids, "failed": outcome.failures.len()})
        );
    } else {
        println!(
            "Added {} favorite(s) to {}",
            outcome.added.len(),
            path.display()
        );
    }
    Ok(())
}

/// Remove the favorite matching a path. No match is a no-op, not an error.
pub fn cmd_remove(path: &Path, target: &str, json: bool) -> SidelistResult<()> {
    let mut archive = load_or_bootstrap(path)?;
    let resolver = PortableResolver::new();
    let store = FavoriteStore::new(&resolver);

    let removed = store.remove(&mut archive, target)?;
    if removed {
        save(path, &archive)?;
        signal_reload();
    }

    if json {
        println!("{}", serde_json::json!({"removed": removed}));
    } else if removed {
        println!("Removed {}", target);
    } else {
        println!("No favorite matches {}", target);
    }
    Ok(())
}

/// Remove every favorite, leaving `properties` untouched.
pub fn cmd_clear(path: &Path, json: bool) -> SidelistResult<()> {
    let mut archive = load_or_bootstrap(path)?;
    let resolver = PortableResolver::new();
    let store = FavoriteStore::new(&resolver);

    store.clear(&mut archive)?;
    save(path, &archive)?;
    signal_reload();

    if json {
        println!("{}", serde_json::json!({"cleared": true}));
    } else {
        println!("Cleared favorites in {}", path.display());
    }
    Ok(())
}
