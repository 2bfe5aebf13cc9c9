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
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::classify::Classifier;
use crate::copier::{copy_sample, CopyError};
use crate::extract::{ExtractError, SampleReference, SampleScanner};
use crate::source::{SampleSourceProvider, SourceError};
use crate::util::filename_display;

mod observer;
mod report;

pub use observer::{ConsoleObserver, ExportObserver, NoopObserver, TracingObserver};
pub use report::{
    print_plan, print_report, write_plan, ExportReport, PresetSummary, SampleFailure,
};

/// Samples whose path contains this are rim shots, which get their own folder.
const RIM_MARKER: &str = "Rim";

/// Folder holding rim shot samples.
const RIM_DIR: &str = "rim";

/// Folder holding every sample of a preset.
pub const ALL_DIR: &str = "all";

/// Fatal errors that abort an export run.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Scanner(#[from] ExtractError),

    #[error("failed to prepare export directory {}: {source}", .path.display())]
    ExportDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("export path {} exists but is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to extract samples: {source}")]
    Extract {
        preset: PathBuf,
        #[source]
        source: ExtractError,
    },
}

/// The folder a sample is sorted into besides the "all" folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    Rim,
    Velocity(String),
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Rim => write!(f, "{}", RIM_DIR),
            Category::Velocity(velocity) => write!(f, "{}", velocity),
        }
    }
}

/// Everything needed to export one sample.
#[derive(Debug, Clone)]
pub struct SamplePlan {
    pub reference: SampleReference,
    pub sample_type: String,
    pub velocity: String,
    pub category: Category,
    /// The sample's location inside the library.
    pub source: PathBuf,
    /// The category copy followed by the "all" copy.
    pub destinations: [PathBuf; 2],
}

/// The samples of one preset, in the order they appear in the document.
#[derive(Debug, Clone)]
pub struct PresetPlan {
    pub name: String,
    pub path: PathBuf,
    pub samples: Vec<SamplePlan>,
}

/// Exports preset samples into `<export>/<preset>/<category>` and `<export>/<preset>/all`.
pub struct Exporter<'a> {
    scanner: SampleScanner,
    classifier: &'a dyn Classifier,
    observer: &'a dyn ExportObserver,
    export_dir: PathBuf,
}

impl<'a> Exporter<'a> {
    pub fn new(
        classifier: &'a dyn Classifier,
        observer: &'a dyn ExportObserver,
        export_dir: PathBuf,
    ) -> Result<Exporter<'a>, ExportError> {
        let scanner = SampleScanner::new()?;

        Ok(Exporter {
            scanner,
            classifier,
            observer,
            export_dir,
        })
    }

    /// Plans every preset the provider knows about without copying anything.
    pub fn plan(
        &self,
        provider: &dyn SampleSourceProvider,
    ) -> Result<Vec<PresetPlan>, ExportError> {
        let sample_root = provider.sample_root();
        provider
            .list_presets()?
            .iter()
            .map(|preset| self.plan_preset(preset, &sample_root))
            .collect()
    }

    /// Extracts and classifies the samples of a single preset.
    pub fn plan_preset(&self, preset: &Path, sample_root: &Path) -> Result<PresetPlan, ExportError> {
        let references = self
            .scanner
            .scan_path(preset)
            .map_err(|source| ExportError::Extract {
                preset: preset.to_path_buf(),
                source,
            })?;

        let name = self.classifier.preset_name(preset);
        let samples = references
            .into_iter()
            .map(|reference| self.plan_sample(&name, sample_root, reference))
            .collect();

        Ok(PresetPlan {
            name,
            path: preset.to_path_buf(),
            samples,
        })
    }

    /// Works out where a single sample comes from and where it goes.
    pub fn plan_sample(
        &self,
        preset_name: &str,
        sample_root: &Path,
        reference: SampleReference,
    ) -> SamplePlan {
        let sample_type = self.classifier.sample_type(&reference);
        let velocity = self.classifier.sample_velocity(&reference);
        let source = sample_root.join(reference.relative_path());

        let category = if source.to_string_lossy().contains(RIM_MARKER) {
            Category::Rim
        } else {
            Category::Velocity(velocity.clone())
        };

        let file_name = filename_display(&source);
        let preset_dir = self.export_dir.join(preset_name);
        let destinations = [
            preset_dir.join(category.to_string()).join(file_name),
            preset_dir.join(ALL_DIR).join(file_name),
        ];

        SamplePlan {
            reference,
            sample_type,
            velocity,
            category,
            source,
            destinations,
        }
    }

    /// Exports every preset in discovery order. Unreadable presets abort the run, while
    /// samples that fail to copy are reported and skipped.
    pub fn run(&self, provider: &dyn SampleSourceProvider) -> Result<ExportReport, ExportError> {
        let presets = provider.list_presets()?;
        let sample_root = provider.sample_root();
        ensure_export_dir(&self.export_dir)?;

        let mut report = ExportReport::default();
        for preset in presets.iter() {
            let plan = self.plan_preset(preset, &sample_root)?;
            report.presets.push(self.export_preset(&plan));
        }

        Ok(report)
    }

    /// Copies every sample of a planned preset.
    pub fn export_preset(&self, preset: &PresetPlan) -> PresetSummary {
        self.observer.preset_started(preset);

        let mut summary = PresetSummary {
            name: preset.name.clone(),
            path: preset.path.clone(),
            copied: 0,
            failures: Vec::new(),
        };

        for sample in preset.samples.iter() {
            match copy_to_destinations(sample) {
                Ok(()) => {
                    self.observer.sample_copied(&preset.name, sample);
                    summary.copied += 1;
                }
                Err(e) => {
                    self.observer.sample_failed(&preset.name, sample, &e);
                    summary.failures.push(SampleFailure {
                        reference: sample.reference.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        summary
    }
}

/// Copies the sample to each destination, stopping at the first failure.
fn copy_to_destinations(sample: &SamplePlan) -> Result<(), CopyError> {
    for destination in sample.destinations.iter() {
        copy_sample(&sample.source, destination)?;
    }
    Ok(())
}

/// Creates the export directory if it doesn't exist yet.
pub fn ensure_export_dir(path: &Path) -> Result<(), ExportError> {
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(ExportError::NotADirectory(path.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "Creating export directory");
            fs::create_dir_all(path).map_err(|source| ExportError::ExportDirectory {
                path: path.to_path_buf(),
                source,
            })
        }
        Err(source) => Err(ExportError::ExportDirectory {
            path: path.to_path_buf(),
            source,
        }),
    }
}
