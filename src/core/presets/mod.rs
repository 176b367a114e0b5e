//! Model preset store: JSON-backed CRUD over named sampling-parameter
//! bundles, with dirty tracking against the last-persisted snapshot.

pub(crate) mod validation;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::util;

pub use validation::is_valid_preset_name;

/// A named, persisted bundle of generation/sampling parameters.
///
/// Identity is by `name`, which doubles as the filename stem
/// (`<name>.json`). `id` is a display-order index reassigned on
/// save and delete.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelPreset {
    pub id: i32,
    #[serde(rename = "lastModified")]
    pub last_modified: i64,
    pub name: String,
    #[serde(rename = "systemPrompt")]
    pub system_prompt: String,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: f32,
    pub random_seed: i32,
    pub min_length: f32,
    pub max_new_tokens: f32,
}

impl ModelPreset {
    /// True when every user-editable field matches `other`.
    /// `id` and `last_modified` are bookkeeping and do not count as edits.
    fn same_settings(&self, other: &ModelPreset) -> bool {
        self.name == other.name
            && self.system_prompt == other.system_prompt
            && self.temperature == other.temperature
            && self.top_p == other.top_p
            && self.top_k == other.top_k
            && self.random_seed == other.random_seed
            && self.min_length == other.min_length
            && self.max_new_tokens == other.max_new_tokens
    }
}

/// Error loading or saving presets.
#[derive(Debug, thiserror::Error)]
pub enum PresetError {
    #[error("Invalid preset name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },
    #[error("Preset storage error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn validate_name(name: &str) -> Result<(), PresetError> {
    match validation::name_error(name) {
        Some(reason) => Err(PresetError::InvalidName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Store of model presets backed by one JSON file per preset.
///
/// `loaded` holds the working copies the UI edits; `originals` holds the
/// last-persisted snapshot of each, index-aligned, so unsaved edits can be
/// detected and discarded. Both stay sorted by `last_modified` descending.
pub struct PresetStore {
    dir: PathBuf,
    loaded: Vec<ModelPreset>,
    originals: Vec<ModelPreset>,
    default_preset: ModelPreset,
    current: Option<usize>,
    has_seeded: bool,
}

impl PresetStore {
    /// Open a store over `dir`, creating the directory if needed.
    ///
    /// Fails when the directory cannot be created or written to. A scan
    /// failure during the initial load is logged and leaves the store
    /// empty rather than failing construction.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, PresetError> {
        let dir = dir.into();
        ensure_writable_dir(&dir)?;

        let mut store = PresetStore {
            dir,
            loaded: Vec::new(),
            originals: Vec::new(),
            default_preset: builtin_default_preset(),
            current: None,
            has_seeded: false,
        };
        if let Err(e) = store.load_presets() {
            log::error!("Failed to load presets: {}", e);
        }
        Ok(store)
    }

    /// Reload all presets from disk.
    ///
    /// Files that fail to parse are logged and skipped. When the directory
    /// holds no parseable preset and defaults were never seeded, the
    /// built-in default preset is written once per store lifetime. Fails
    /// only on an unexpected filesystem error during the scan.
    pub fn load_presets(&mut self) -> Result<(), PresetError> {
        self.loaded.clear();
        self.originals.clear();

        let mut found = false;
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match read_preset_file(&path) {
                Ok(preset) => {
                    self.loaded.push(preset.clone());
                    self.originals.push(preset);
                    found = true;
                }
                Err(e) => {
                    log::warn!("Skipping preset file {}: {}", path.display(), e);
                }
            }
        }

        if !found && !self.has_seeded {
            self.seed_default_preset();
        }

        self.sort_by_last_modified();
        self.current = if self.loaded.is_empty() { None } else { Some(0) };
        Ok(())
    }

    /// Save a preset to disk and update the in-memory lists.
    ///
    /// Stamps `last_modified` with the current time. With `create_new`,
    /// the name is disambiguated (`_1`, `_2`, ...) against existing files
    /// and the preset is appended; otherwise the file for that name is
    /// overwritten and the matching entry updated in place. A name with no
    /// in-memory match takes the create path so the lists never diverge
    /// from disk. Afterwards both lists are re-sorted, ids renumbered, and
    /// the selection moved to the end of the re-sorted list. Returns the
    /// name the preset was saved under.
    pub fn save_preset(
        &mut self,
        preset: &ModelPreset,
        create_new: bool,
    ) -> Result<String, PresetError> {
        validate_name(&preset.name)?;

        let mut preset = preset.clone();
        preset.last_modified = util::now_unix();

        if create_new {
            let base = preset.name.clone();
            let mut counter = 1;
            while self.preset_file_path(&preset.name).exists() {
                preset.name = format!("{}_{}", base, counter);
                counter += 1;
            }
        }

        let json = util::to_pretty_json(&preset)?;
        fs::write(self.preset_file_path(&preset.name), json)?;

        let saved_name = preset.name.clone();
        let matched = self.loaded.iter().position(|p| p.name == preset.name);
        match matched {
            Some(i) if !create_new => {
                self.loaded[i] = preset.clone();
                self.originals[i] = preset;
            }
            _ => {
                self.loaded.push(preset.clone());
                self.originals.push(preset);
            }
        }

        self.sort_by_last_modified();
        self.renumber_ids();
        self.switch_preset(self.loaded.len() - 1);
        Ok(saved_name)
    }

    /// Write a preset as pretty JSON to an arbitrary path, creating parent
    /// directories as needed. Leaves in-memory state and timestamps alone;
    /// used for export.
    pub fn save_preset_to_path(&self, preset: &ModelPreset, path: &Path) -> Result<(), PresetError> {
        validate_name(&preset.name)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = util::to_pretty_json(preset)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Delete a preset by name: drop it from both lists, clamp the
    /// selection, renumber the remaining ids 1..N, then remove the backing
    /// file if present. The in-memory entry and the file are removed
    /// independently; only a failed removal of an existing file is an error.
    pub fn delete_preset(&mut self, name: &str) -> Result<(), PresetError> {
        if let Some(index) = self.loaded.iter().position(|p| p.name == name) {
            self.loaded.remove(index);
            self.originals.remove(index);

            if let Some(current) = self.current
                && current >= self.loaded.len()
            {
                self.current = self.loaded.len().checked_sub(1);
            }
            self.renumber_ids();
        }

        let path = self.preset_file_path(name);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    /// Select the preset at `index`. Out-of-bounds indices are ignored.
    /// Unsaved edits on the previously selected preset are discarded.
    pub fn switch_preset(&mut self, index: usize) {
        if index >= self.loaded.len() {
            return;
        }
        if self.has_unsaved_changes() {
            self.reset_current_preset();
        }
        self.current = Some(index);
    }

    /// True when the selected preset differs from its last-persisted
    /// snapshot in any user-editable field.
    pub fn has_unsaved_changes(&self) -> bool {
        let Some(index) = self.current else {
            return false;
        };
        match (self.loaded.get(index), self.originals.get(index)) {
            (Some(current), Some(original)) => !current.same_settings(original),
            _ => false,
        }
    }

    /// Discard in-memory edits on the selected preset.
    pub fn reset_current_preset(&mut self) {
        if let Some(index) = self.current
            && let Some(original) = self.originals.get(index).cloned()
        {
            self.loaded[index] = original;
        }
    }

    /// Apply an edit to the selected preset. Returns false when nothing is
    /// selected. Edits are in-memory only until `save_preset` is called.
    pub fn update_current_preset(&mut self, edit: impl FnOnce(&mut ModelPreset)) -> bool {
        let Some(index) = self.current else {
            return false;
        };
        match self.loaded.get_mut(index) {
            Some(preset) => {
                edit(preset);
                true
            }
            None => false,
        }
    }

    /// All loaded presets, most recently modified first.
    pub fn presets(&self) -> &[ModelPreset] {
        &self.loaded
    }

    /// Index of the selected preset, if any.
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// The selected preset, if any.
    pub fn current_preset(&self) -> Option<&ModelPreset> {
        self.current.and_then(|i| self.loaded.get(i))
    }

    /// The built-in default preset (the seed written into empty stores).
    pub fn default_preset(&self) -> &ModelPreset {
        &self.default_preset
    }

    /// Path of the backing file for a preset name.
    pub fn preset_file_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }

    /// The store directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn seed_default_preset(&mut self) {
        let preset = self.default_preset.clone();
        if let Err(e) = self.save_preset(&preset, true) {
            log::error!("Failed to seed default preset: {}", e);
        }
        // Sticky for the store's lifetime: a later manual full delete must
        // not trigger a reseed.
        self.has_seeded = true;
    }

    fn sort_by_last_modified(&mut self) {
        self.loaded
            .sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        self.originals
            .sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
    }

    fn renumber_ids(&mut self) {
        for (i, preset) in self.loaded.iter_mut().enumerate() {
            preset.id = (i + 1) as i32;
        }
        for (i, preset) in self.originals.iter_mut().enumerate() {
            preset.id = (i + 1) as i32;
        }
    }
}

/// Filter presets by case-insensitive query on name or system prompt.
/// Returns all presets when the query is empty.
pub fn filter_presets<'a>(presets: &'a [ModelPreset], query: &str) -> Vec<&'a ModelPreset> {
    if query.is_empty() {
        return presets.iter().collect();
    }
    let q = query.to_lowercase();
    presets
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&q) || p.system_prompt.to_lowercase().contains(&q)
        })
        .collect()
}

fn builtin_default_preset() -> ModelPreset {
    ModelPreset {
        id: 0,
        last_modified: util::now_unix(),
        name: "default".to_string(),
        system_prompt: "You are a helpful assistant.".to_string(),
        temperature: 0.7,
        top_p: 0.9,
        top_k: 50.0,
        random_seed: 42,
        min_length: 0.0,
        max_new_tokens: 2048.0,
    }
}

/// Create the store directory if missing and probe that it accepts writes.
fn ensure_writable_dir(dir: &Path) -> Result<(), PresetError> {
    fs::create_dir_all(dir)?;

    let probe = dir.join(".write-test");
    fs::write(&probe, b"")?;
    if let Err(e) = fs::remove_file(&probe) {
        log::warn!("Could not remove write probe {}: {}", probe.display(), e);
    }
    Ok(())
}

fn read_preset_file(path: &Path) -> Result<ModelPreset, PresetError> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}
