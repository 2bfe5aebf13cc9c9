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
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// Errors that can occur while copying a single sample.
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("{} is not a regular file", .0.display())]
    NotRegularFile(PathBuf),

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CopyError {
    fn io(path: &Path) -> impl FnOnce(io::Error) -> CopyError + '_ {
        move |source| CopyError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Copies the source file to the destination, creating any missing parent directories
/// and replacing whatever is already at the destination. Returns the number of bytes
/// copied. A failed copy may leave a partially written destination behind.
pub fn copy_sample(source: &Path, destination: &Path) -> Result<u64, CopyError> {
    let metadata = match fs::symlink_metadata(source) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(CopyError::NotFound(source.to_path_buf()))
        }
        Err(e) => return Err(CopyError::io(source)(e)),
    };

    if !metadata.file_type().is_file() {
        return Err(CopyError::NotRegularFile(source.to_path_buf()));
    }

    let mut reader = File::open(source).map_err(CopyError::io(source))?;

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(CopyError::io(parent))?;
    }

    let mut writer = File::create(destination).map_err(CopyError::io(destination))?;
    io::copy(&mut reader, &mut writer).map_err(CopyError::io(destination))
}
