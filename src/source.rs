// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::path::{Path, PathBuf};

use tracing::warn;

/// Bitwig package root relative to the user's home directory on macOS.
const BITWIG_PACKAGES_MAC: &str =
    "Library/Application Support/Bitwig/Bitwig Studio/installed-packages/1.0";

/// Preset directory of the drum package relative to the package root.
const DRUM_PRESETS: &str = "presets/Bitwig/Nektar's Acoustic Drums";

/// Errors raised while locating presets and samples on the host.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("sorry, only macOS Bitwig installs can be discovered automatically; set a preset glob and sample root instead")]
    UnsupportedPlatform,

    #[error("unable to find the home directory to locate Bitwig samples")]
    NoHomeDirectory,

    #[error("invalid preset glob '{pattern}': {source}")]
    Glob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

/// Supplies the preset documents to export and the library their samples live in.
pub trait SampleSourceProvider {
    /// Lists preset documents in the order they should be processed.
    fn list_presets(&self) -> Result<Vec<PathBuf>, SourceError>;

    /// The directory sample references are relative to.
    fn sample_root(&self) -> PathBuf;
}

/// The Bitwig Studio package layout under a user's home directory.
pub struct BitwigLibrary {
    home: PathBuf,
}

impl BitwigLibrary {
    /// Locates the Bitwig install for the current user. Only macOS is supported.
    pub fn detect() -> Result<BitwigLibrary, SourceError> {
        if !cfg!(target_os = "macos") {
            return Err(SourceError::UnsupportedPlatform);
        }

        let home = dirs::home_dir().ok_or(SourceError::NoHomeDirectory)?;
        Ok(BitwigLibrary::with_home(home))
    }

    pub fn with_home(home: PathBuf) -> BitwigLibrary {
        BitwigLibrary { home }
    }

    fn packages(&self) -> PathBuf {
        self.home.join(BITWIG_PACKAGES_MAC)
    }

    /// The glob matching every drum kit preset.
    pub fn preset_glob(&self) -> String {
        let presets = self.packages().join(DRUM_PRESETS);
        format!(
            "{}/*.bwpreset",
            glob::Pattern::escape(&presets.to_string_lossy())
        )
    }
}

impl SampleSourceProvider for BitwigLibrary {
    fn list_presets(&self) -> Result<Vec<PathBuf>, SourceError> {
        glob_presets(&self.preset_glob())
    }

    fn sample_root(&self) -> PathBuf {
        self.packages().join("samples")
    }
}

/// A library described by an explicit preset glob and sample root, usable on any host.
pub struct ConfiguredLibrary {
    preset_glob: String,
    sample_root: PathBuf,
}

impl ConfiguredLibrary {
    pub fn new(preset_glob: String, sample_root: PathBuf) -> ConfiguredLibrary {
        ConfiguredLibrary {
            preset_glob,
            sample_root,
        }
    }
}

impl SampleSourceProvider for ConfiguredLibrary {
    fn list_presets(&self) -> Result<Vec<PathBuf>, SourceError> {
        glob_presets(&self.preset_glob)
    }

    fn sample_root(&self) -> PathBuf {
        self.sample_root.clone()
    }
}

/// Picks the provider for the given overrides. Anything not overridden comes from the
/// detected Bitwig install, which requires a supported platform.
pub fn resolve_provider(
    preset_glob: Option<String>,
    sample_root: Option<PathBuf>,
) -> Result<Box<dyn SampleSourceProvider>, SourceError> {
    resolve_provider_with(preset_glob, sample_root, BitwigLibrary::detect)
}

/// Same as [`resolve_provider`], with the Bitwig install located by `detect`. Detection only
/// runs when at least one of the overrides is missing.
pub fn resolve_provider_with<F>(
    preset_glob: Option<String>,
    sample_root: Option<PathBuf>,
    detect: F,
) -> Result<Box<dyn SampleSourceProvider>, SourceError>
where
    F: FnOnce() -> Result<BitwigLibrary, SourceError>,
{
    if let (Some(preset_glob), Some(sample_root)) = (&preset_glob, &sample_root) {
        return Ok(Box::new(ConfiguredLibrary::new(
            expand_home(preset_glob).to_string_lossy().into_owned(),
            expand_home(&sample_root.to_string_lossy()),
        )));
    }

    let bitwig = detect()?;
    if preset_glob.is_none() && sample_root.is_none() {
        return Ok(Box::new(bitwig));
    }

    Ok(Box::new(ConfiguredLibrary::new(
        preset_glob
            .map(|glob| expand_home(&glob).to_string_lossy().into_owned())
            .unwrap_or_else(|| bitwig.preset_glob()),
        sample_root
            .map(|root| expand_home(&root.to_string_lossy()))
            .unwrap_or_else(|| bitwig.sample_root()),
    )))
}

/// Returns every path matching the glob, sorted. Unreadable entries are skipped.
fn glob_presets(pattern: &str) -> Result<Vec<PathBuf>, SourceError> {
    let entries = glob::glob(pattern).map_err(|source| SourceError::Glob {
        pattern: pattern.to_string(),
        source,
    })?;

    Ok(entries
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(path = ?e.path(), err = %e.error(), "Skipping unreadable preset path");
                None
            }
        })
        .collect())
}

fn expand_home(input: &str) -> PathBuf {
    if let Some(stripped) = input.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    Path::new(input).to_path_buf()
}
