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
use std::path::Path;

use regex::Regex;

use crate::extract::SampleReference;

/// File extension used by Bitwig presets.
pub const PRESET_SUFFIX: &str = ".bwpreset";

/// Prefix shared by every sample in the Nektar's Acoustic Drums package.
pub const DRUM_LIBRARY_PREFIX: &str = "Bitwig/Nektar's Acoustic Drums/samples/";

const PRESET_NAME_PATTERN: &str = r"^([\w -]+)\.bwpreset$";
const VELOCITY_PATTERN: &str = r"([A-Za-z0-9]{1,2})\.wav$";

/// Derives the naming facets used to lay out exported samples. All derivations are
/// best effort: a pattern miss falls back to a simpler heuristic and never fails.
pub trait Classifier {
    /// The name of the preset stored at the given path.
    fn preset_name(&self, preset_path: &Path) -> String;

    /// The instrument zone of the sample, e.g. "Kick" or "Snare".
    fn sample_type(&self, sample: &SampleReference) -> String;

    /// The velocity or articulation layer of the sample, e.g. "v5".
    fn sample_velocity(&self, sample: &SampleReference) -> String;
}

/// Classifier for the Nektar's Acoustic Drums sample layout.
pub struct DrumKitClassifier {
    preset_name: Regex,
    velocity: Regex,
}

impl DrumKitClassifier {
    pub fn new() -> Result<DrumKitClassifier, regex::Error> {
        Ok(DrumKitClassifier {
            preset_name: Regex::new(PRESET_NAME_PATTERN)?,
            velocity: Regex::new(VELOCITY_PATTERN)?,
        })
    }
}

impl Classifier for DrumKitClassifier {
    fn preset_name(&self, preset_path: &Path) -> String {
        let path = preset_path.to_string_lossy();
        let file_name = base_name(&path);

        match self.preset_name.captures(file_name) {
            Some(captures) => captures[1].to_string(),
            None => match file_name.strip_suffix(PRESET_SUFFIX) {
                // A bare ".bwpreset" would otherwise name the preset directory "".
                Some(stripped) if !stripped.is_empty() => stripped.to_string(),
                _ => file_name.to_string(),
            },
        }
    }

    fn sample_type(&self, sample: &SampleReference) -> String {
        // Samples outside of the drum library keep whatever their first segment is.
        let relative = sample
            .as_str()
            .strip_prefix(DRUM_LIBRARY_PREFIX)
            .unwrap_or(sample.as_str());
        relative.split('/').next().unwrap_or_default().to_string()
    }

    fn sample_velocity(&self, sample: &SampleReference) -> String {
        if let Some(captures) = self.velocity.captures(sample.as_str()) {
            return captures[1].to_string();
        }

        let file_name = base_name(sample.as_str());
        let stem = file_name.strip_suffix(".wav").unwrap_or(file_name);
        // Trailing spaces would leave an empty token and no category directory.
        stem.split(' ')
            .filter(|token| !token.is_empty())
            .next_back()
            .unwrap_or(file_name)
            .to_string()
    }
}

/// The final path segment. References always use forward slashes, regardless of host.
fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
