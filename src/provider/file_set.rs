//! Weighted file-set provider
//!
//! Hands out files drawn from several folders. Which folder serves a call is
//! decided by walking the 100-slot [`Dispersion`] sequence with the
//! parameter's policy; the folder's own cursor then picks the file, skipping
//! files whose name does not match the folder pattern.

use super::ParameterDataProvider;
use crate::config::{FileSetConfig, FolderConfig, ParameterLevel};
use crate::error::{InitFailure, ProviderError, ProviderResult};
use crate::files::FileContainer;
use crate::selection::{CyclicCursor, Dispersion, DISPERSION_SLOTS};
use crate::value::{ArgumentValue, CallerId, Value};
use rayon::prelude::*;
use tracing::{debug, info};

#[derive(Debug)]
struct FileSetState {
    containers: Vec<FileContainer>,
    dispersion: Dispersion,
    cursor: CyclicCursor,
}

/// Provider of file names or paths from weighted folders
#[derive(Debug)]
pub struct FileSetProvider {
    name: String,
    level: ParameterLevel,
    folders: Vec<FolderConfig>,
    recursive: bool,
    full_path: bool,
    shuffle_seed: Option<u64>,
    state: Option<FileSetState>,
}

impl FileSetProvider {
    pub fn new(config: &FileSetConfig) -> Self {
        Self {
            name: config.name.clone(),
            level: config.level,
            folders: config.folders.clone(),
            recursive: config.recursive,
            full_path: config.full_path,
            shuffle_seed: config.shuffle_seed,
            state: None,
        }
    }

    /// Loaded containers, in declaration order (empty before initialization)
    pub fn containers(&self) -> &[FileContainer] {
        self.state
            .as_ref()
            .map(|state| state.containers.as_slice())
            .unwrap_or(&[])
    }

    /// Dispersion sequence built by the last initialization
    pub fn dispersion(&self) -> Option<&Dispersion> {
        self.state.as_ref().map(|state| &state.dispersion)
    }

    fn load_containers(&self) -> Result<Vec<FileContainer>, InitFailure> {
        if self.folders.is_empty() {
            return Err(InitFailure::NoContainers);
        }

        self.folders
            .par_iter()
            .enumerate()
            .map(|(index, folder)| {
                let seed = self.shuffle_seed.map(|seed| seed.wrapping_add(index as u64));
                FileContainer::load(folder, self.recursive, seed)
            })
            .collect()
    }

    fn next(&self, caller: CallerId, resolved: &[ArgumentValue]) -> ProviderResult<ArgumentValue> {
        let state = self.state.as_ref().ok_or_else(|| ProviderError::NotInitialized {
            parameter: self.name.clone(),
        })?;

        let slot = state.cursor.select(self.level, caller);
        let container = state
            .dispersion
            .container_at(slot)
            .and_then(|index| state.containers.get(index))
            .ok_or_else(|| ProviderError::NotInitialized {
                parameter: self.name.clone(),
            })?;

        let file = container.next_file(&self.name, self.level, caller, resolved)?;
        let value = if self.full_path {
            file.path.to_string_lossy().into_owned()
        } else {
            file.name.clone()
        };
        Ok(ArgumentValue::new(self.name.as_str(), Value::Text(value)))
    }
}

impl ParameterDataProvider for FileSetProvider {
    fn parameter_name(&self) -> &str {
        &self.name
    }

    fn level(&self) -> ParameterLevel {
        self.level
    }

    fn initialize(&mut self) -> ProviderResult<()> {
        self.state = None;

        let containers = self
            .load_containers()
            .map_err(|source| ProviderError::init(&self.name, source))?;

        let percentages: Vec<u8> = containers.iter().map(|c| c.percentage()).collect();
        let dispersion = Dispersion::build(&percentages);

        for (index, container) in containers.iter().enumerate() {
            debug!(
                parameter = %self.name,
                folder = %container.folder().display(),
                files = container.len(),
                percentage = container.percentage(),
                "loaded folder {}",
                index
            );
        }
        info!(
            parameter = %self.name,
            folders = containers.len(),
            files = containers.iter().map(|c| c.len()).sum::<usize>(),
            "initialized file-set provider"
        );

        self.state = Some(FileSetState {
            containers,
            dispersion,
            cursor: CyclicCursor::new(DISPERSION_SLOTS),
        });
        Ok(())
    }

    fn per_invocation(&self, resolved: &[ArgumentValue]) -> ProviderResult<ArgumentValue> {
        self.next(CallerId(0), resolved)
    }

    fn per_caller(&self, caller: CallerId, resolved: &[ArgumentValue]) -> ProviderResult<ArgumentValue> {
        self.next(caller, resolved)
    }

    fn per_caller_sticky(&self, caller: CallerId, resolved: &[ArgumentValue]) -> ProviderResult<ArgumentValue> {
        self.next(caller, resolved)
    }
}
