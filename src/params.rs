//! Persisted user preferences.
//!
//! Resolution never touches a global store: a [`ParamsReader`] is handed to it explicitly. [`FileParams`] reads the on-device layout (one file per key, `1` meaning true), [`MemoryParams`] is used in tests and tools.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use bstr::ByteSlice;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use tracing::debug;

/// Preference keys read during resolution. The string form is the on-disk key name.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString)]
pub enum ParamKey {
    /// Adaptive cruise messages live on the camera bus (bus 2) instead of bus 0.
    SccOnBus2,
    /// Keep cruise button handling with the factory cruise module.
    CruiseStateControl,
    /// Command the blinkers on next-generation platforms, silencing the ECU that owns them at startup.
    EnableBlinkers,
}

/// Read-only access to persisted preferences.
pub trait ParamsReader {
    fn get_bool(&self, key: ParamKey) -> bool;
}

/// In-memory preferences.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryParams {
    values: HashMap<ParamKey, bool>,
}

impl MemoryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: ParamKey, value: bool) -> Self {
        self.values.insert(key, value);
        self
    }

    pub fn set(&mut self, key: ParamKey, value: bool) {
        self.values.insert(key, value);
    }
}

impl ParamsReader for MemoryParams {
    fn get_bool(&self, key: ParamKey) -> bool {
        self.values.get(&key).copied().unwrap_or(false)
    }
}

/// Preferences stored as one file per key inside a directory. A missing or unreadable file reads as false.
#[derive(Debug, Clone)]
pub struct FileParams {
    path: PathBuf,
}

impl FileParams {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn key_path(&self, key: ParamKey) -> PathBuf {
        self.path.join(key.as_ref())
    }
}

impl ParamsReader for FileParams {
    fn get_bool(&self, key: ParamKey) -> bool {
        match std::fs::read(self.key_path(key)) {
            Ok(value) => value.trim() == b"1",
            Err(e) => {
                debug!("Param {} not readable: {}", key, e);
                false
            }
        }
    }
}
