//! Durable storage for the whole state tree.
//!
//! The state is written as one JSON blob `{ "version": N, "state": {...} }`
//! under a fixed key. A blob with any other version, or one that does not
//! parse, or whose module list is not the six-module curriculum, is copied
//! aside as `<key>.v<N>.bak` and the store starts fresh.
//! There is no migration between schema versions.

use nucleo_shared::curriculum::MODULE_IDS;
use nucleo_shared::{GameState, NucleoError, Result, SCHEMA_VERSION};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Somewhere a state blob can live
pub trait StateBackend {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&self, key: &str, blob: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;

    /// Human-readable location, for logs and `status`
    fn describe(&self) -> String;
}

/// One `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl StateBackend for FileBackend {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            debug!("No state file at {:?}", path);
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn save(&self, key: &str, blob: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        // Readers never see a half-written blob
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, blob)?;
        fs::rename(&tmp, &path)?;
        debug!("Wrote {} bytes to {:?}", blob.len(), path);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

/// Shared in-memory map. Clones see the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    blobs: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<String> {
        match self.blobs.lock() {
            Ok(blobs) => {
                let mut keys: Vec<_> = blobs.keys().cloned().collect();
                keys.sort();
                keys
            }
            Err(_) => Vec::new(),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.blobs
            .lock()
            .map_err(|e| NucleoError::Backend(format!("memory backend poisoned: {}", e)))
    }
}

impl StateBackend for MemoryBackend {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn save(&self, key: &str, blob: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), blob.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    state: &'a GameState,
}

#[derive(Deserialize)]
struct Envelope {
    version: Option<u64>,
    state: Option<serde_json::Value>,
}

/// How the state came back from storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing stored yet
    Fresh,
    /// Stored state restored as-is
    Restored,
    /// Stored blob was unusable and has been set aside
    Reset {
        found_version: Option<u64>,
        backup_key: String,
    },
}

/// Serialize and write the state under `key`
pub fn save_state(backend: &dyn StateBackend, key: &str, state: &GameState) -> Result<()> {
    let blob = serde_json::to_string(&EnvelopeRef {
        version: SCHEMA_VERSION,
        state,
    })?;
    backend.save(key, &blob)
}

/// Load the state stored under `key`, falling back to defaults.
///
/// Only a backend read error is returned as `Err`; bad contents never are.
pub fn load_state(backend: &dyn StateBackend, key: &str) -> Result<(GameState, LoadOutcome)> {
    let blob = match backend.load(key)? {
        Some(blob) => blob,
        None => return Ok((GameState::default(), LoadOutcome::Fresh)),
    };

    let envelope: Option<Envelope> = serde_json::from_str(&blob).ok();
    let found_version = envelope.as_ref().and_then(|e| e.version);

    if found_version == Some(u64::from(SCHEMA_VERSION)) {
        if let Some(raw) = envelope.and_then(|e| e.state) {
            match serde_json::from_value::<GameState>(raw) {
                Ok(state) => match curriculum_mismatch(&state) {
                    None => {
                        info!("Restored state v{} from {}", SCHEMA_VERSION, backend.describe());
                        return Ok((state, LoadOutcome::Restored));
                    }
                    Some(problem) => warn!("Stored state rejected: {}", problem),
                },
                Err(e) => warn!("Stored state does not match schema v{}: {}", SCHEMA_VERSION, e),
            }
        }
    } else {
        warn!(
            "Stored state version {:?} does not match v{}, starting fresh",
            found_version, SCHEMA_VERSION
        );
    }

    let backup_key = match found_version {
        Some(v) => format!("{}.v{}.bak", key, v),
        None => format!("{}.unknown.bak", key),
    };
    if let Err(e) = backend.save(&backup_key, &blob) {
        warn!("Could not set aside stale state as {}: {}", backup_key, e);
    }

    Ok((
        GameState::default(),
        LoadOutcome::Reset {
            found_version,
            backup_key,
        },
    ))
}

/// Why a parsed state cannot be used, if it cannot. The module list must be
/// the six curriculum modules in order and the active index must point
/// into it.
fn curriculum_mismatch(state: &GameState) -> Option<String> {
    let ids: Vec<&str> = state.module_progress.iter().map(|m| m.id.as_str()).collect();
    if ids != MODULE_IDS {
        return Some(format!("module list {:?} is not the curriculum", ids));
    }
    if state.current_module >= MODULE_IDS.len() {
        return Some(format!("current module {} out of range", state.current_module));
    }
    None
}
