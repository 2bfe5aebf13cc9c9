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
use std::io;

use tracing::{error, info};

use super::report::write_preset_header;
use super::{PresetPlan, SamplePlan};
use crate::copier::CopyError;

/// Receives progress from an export run. The exporter never logs on its own, so callers
/// decide where events go.
pub trait ExportObserver {
    /// Called once a preset's samples have been extracted, before anything is copied.
    fn preset_started(&self, preset: &PresetPlan);

    /// Called after a sample has been copied to all of its destinations.
    fn sample_copied(&self, preset: &str, sample: &SamplePlan);

    /// Called when a sample could not be copied. The run continues afterwards.
    fn sample_failed(&self, preset: &str, sample: &SamplePlan, err: &CopyError);
}

/// Emits structured `tracing` events.
pub struct TracingObserver;

impl ExportObserver for TracingObserver {
    fn preset_started(&self, preset: &PresetPlan) {
        info!(
            preset = preset.name,
            path = %preset.path.display(),
            samples = preset.samples.len(),
            "Exporting samples for preset"
        );
    }

    fn sample_copied(&self, preset: &str, sample: &SamplePlan) {
        info!(
            preset,
            sample = %sample.source.display(),
            category = %sample.category,
            "Copied sample"
        );
    }

    fn sample_failed(&self, preset: &str, sample: &SamplePlan, err: &CopyError) {
        error!(
            preset,
            sample = %sample.reference,
            err = %err,
            "Failed to process sample"
        );
    }
}

/// Announces each preset on stdout before handing every event to [`TracingObserver`].
pub struct ConsoleObserver;

impl ExportObserver for ConsoleObserver {
    fn preset_started(&self, preset: &PresetPlan) {
        if let Err(e) = write_preset_header(&mut io::stdout().lock(), preset) {
            error!(err = %e, "Unable to write to stdout");
        }
        TracingObserver.preset_started(preset);
    }

    fn sample_copied(&self, preset: &str, sample: &SamplePlan) {
        TracingObserver.sample_copied(preset, sample);
    }

    fn sample_failed(&self, preset: &str, sample: &SamplePlan, err: &CopyError) {
        TracingObserver.sample_failed(preset, sample, err);
    }
}

/// Discards every event.
pub struct NoopObserver;

impl ExportObserver for NoopObserver {
    fn preset_started(&self, _: &PresetPlan) {}

    fn sample_copied(&self, _: &str, _: &SamplePlan) {}

    fn sample_failed(&self, _: &str, _: &SamplePlan, _: &CopyError) {}
}
