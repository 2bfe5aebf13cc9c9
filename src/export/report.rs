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

use std::io::{self, Write};
use std::path::PathBuf;

use super::PresetPlan;
use crate::extract::SampleReference;

/// A sample that could not be exported.
#[derive(Debug, Clone)]
pub struct SampleFailure {
    pub reference: SampleReference,
    pub message: String,
}

/// The outcome of exporting a single preset.
#[derive(Debug, Clone)]
pub struct PresetSummary {
    pub name: String,
    pub path: PathBuf,
    pub copied: usize,
    pub failures: Vec<SampleFailure>,
}

/// Result of an export run.
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    pub presets: Vec<PresetSummary>,
}

impl ExportReport {
    pub fn is_clean(&self) -> bool {
        self.presets.iter().all(|preset| preset.failures.is_empty())
    }

    /// The number of samples copied across all presets.
    pub fn copied(&self) -> usize {
        self.presets.iter().map(|preset| preset.copied).sum()
    }

    /// The number of samples that failed across all presets.
    pub fn failed(&self) -> usize {
        self.presets.iter().map(|preset| preset.failures.len()).sum()
    }
}

/// Prints an export report grouped by preset.
pub fn print_report(report: &ExportReport) {
    if report.presets.is_empty() {
        println!("No presets found.");
        return;
    }

    for preset in &report.presets {
        let icon = if preset.failures.is_empty() {
            "\u{2705}"
        } else {
            "\u{274c}"
        };
        println!(
            "{} {} ({} sample(s) copied)",
            icon, preset.name, preset.copied
        );
        for failure in &preset.failures {
            println!("   \u{274c} {}: {}", failure.reference, failure.message);
        }
    }

    println!(
        "\nSummary: {} sample(s) copied, {} failed across {} preset(s).",
        report.copied(),
        report.failed(),
        report.presets.len()
    );
}

/// Prints the copy plan for each preset without touching the filesystem.
pub fn print_plan(presets: &[PresetPlan], show_destinations: bool) -> io::Result<()> {
    write_plan(&mut io::stdout().lock(), presets, show_destinations)
}

/// Writes the line announcing the samples of a preset.
pub fn write_preset_header<W: Write>(out: &mut W, preset: &PresetPlan) -> io::Result<()> {
    writeln!(
        out,
        "samples for preset '{}' (path: {}):",
        preset.name,
        preset.path.display()
    )
}

/// Writes the copy plan for each preset.
pub fn write_plan<W: Write>(
    out: &mut W,
    presets: &[PresetPlan],
    show_destinations: bool,
) -> io::Result<()> {
    if presets.is_empty() {
        return writeln!(out, "No presets found.");
    }

    for preset in presets {
        write_preset_header(out, preset)?;
        for sample in &preset.samples {
            writeln!(
                out,
                "- {} [type: {}, velocity: {}, category: {}]",
                sample.reference, sample.sample_type, sample.velocity, sample.category
            )?;
            if show_destinations {
                for destination in &sample.destinations {
                    writeln!(out, "    -> {}", destination.display())?;
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{Category, SamplePlan};

    fn summary(name: &str, copied: usize, failures: usize) -> PresetSummary {
        PresetSummary {
            name: name.to_string(),
            path: PathBuf::from(format!("{}.bwpreset", name)),
            copied,
            failures: (0..failures)
                .map(|i| SampleFailure {
                    reference: SampleReference::normalize(&format!("Bitwig/x/{}.wav", i)),
                    message: "missing".to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_report_totals() {
        let report = ExportReport {
            presets: vec![summary("Warm Kit", 10, 0), summary("Dry Kit", 4, 2)],
        };
        assert_eq!(14, report.copied());
        assert_eq!(2, report.failed());
        assert!(!report.is_clean());
    }

    fn kick_plan() -> PresetPlan {
        PresetPlan {
            name: "MyKit".to_string(),
            path: PathBuf::from("/presets/MyKit.bwpreset"),
            samples: vec![SamplePlan {
                reference: SampleReference::normalize("Bitwig/d/samples/Kick/Kick 1 v5.wav"),
                sample_type: "Kick".to_string(),
                velocity: "v5".to_string(),
                category: Category::Velocity("v5".to_string()),
                source: PathBuf::from("/library/Bitwig/d/samples/Kick/Kick 1 v5.wav"),
                destinations: [
                    PathBuf::from("export/MyKit/v5/Kick 1 v5.wav"),
                    PathBuf::from("export/MyKit/all/Kick 1 v5.wav"),
                ],
            }],
        }
    }

    #[test]
    fn test_write_plan_list() -> Result<(), Box<dyn std::error::Error>> {
        let mut out = Vec::new();
        write_plan(&mut out, &[kick_plan()], false)?;
        assert_eq!(
            "samples for preset 'MyKit' (path: /presets/MyKit.bwpreset):\n\
             - Bitwig/d/samples/Kick/Kick 1 v5.wav [type: Kick, velocity: v5, category: v5]\n",
            String::from_utf8(out)?
        );
        Ok(())
    }

    #[test]
    fn test_write_plan_destinations() -> Result<(), Box<dyn std::error::Error>> {
        let mut out = Vec::new();
        write_plan(&mut out, &[kick_plan()], true)?;
        let out = String::from_utf8(out)?;
        assert!(out.ends_with(
            "    -> export/MyKit/v5/Kick 1 v5.wav\n    -> export/MyKit/all/Kick 1 v5.wav\n"
        ));
        Ok(())
    }

    #[test]
    fn test_write_plan_empty() -> Result<(), Box<dyn std::error::Error>> {
        let mut out = Vec::new();
        write_plan(&mut out, &[], true)?;
        assert_eq!("No presets found.\n", String::from_utf8(out)?);
        Ok(())
    }

    #[test]
    fn test_empty_report_is_clean() {
        let report = ExportReport::default();
        assert!(report.is_clean());
        assert_eq!(0, report.copied());
    }
}
