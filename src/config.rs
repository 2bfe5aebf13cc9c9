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

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

mod error;

pub use error::ConfigError;

/// Directory exports are written to when nothing else is configured.
pub const DEFAULT_EXPORT_DIR: &str = "export";

/// Prefix for environment variable overrides, e.g. `KITEXPORT_EXPORT_DIR`.
const ENV_PREFIX: &str = "KITEXPORT";

/// Settings for an export run. Classification rules are fixed and not part of this.
#[derive(Deserialize, Debug, Clone)]
pub struct ExportConfig {
    /// Where exported samples are written.
    export_dir: PathBuf,
    /// Root of the sample library, overriding the detected Bitwig install.
    sample_root: Option<PathBuf>,
    /// Glob matching the preset documents, overriding the detected Bitwig install.
    preset_glob: Option<String>,
}

impl ExportConfig {
    /// Loads the configuration from defaults, the optional YAML file, then the
    /// environment, with later sources taking precedence.
    pub fn load(path: Option<&Path>) -> Result<ExportConfig, ConfigError> {
        let mut builder = Config::builder().set_default("export_dir", DEFAULT_EXPORT_DIR)?;

        if let Some(path) = path {
            if !path.is_file() {
                return Err(ConfigError::Missing(path.to_path_buf()));
            }
            builder = builder.add_source(File::from(path).format(FileFormat::Yaml));
        }

        Ok(builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?)
    }

    /// Applies command line overrides on top of the loaded configuration.
    pub fn with_overrides(
        mut self,
        export_dir: Option<PathBuf>,
        sample_root: Option<PathBuf>,
        preset_glob: Option<String>,
    ) -> ExportConfig {
        if let Some(export_dir) = export_dir {
            self.export_dir = export_dir;
        }
        if sample_root.is_some() {
            self.sample_root = sample_root;
        }
        if preset_glob.is_some() {
            self.preset_glob = preset_glob;
        }
        self
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    pub fn sample_root(&self) -> Option<&Path> {
        self.sample_root.as_deref()
    }

    pub fn preset_glob(&self) -> Option<&str> {
        self.preset_glob.as_deref()
    }
}
