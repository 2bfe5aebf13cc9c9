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

#[cfg(test)]
use std::{error::Error, fs, fs::File, path::Path, path::PathBuf};

#[cfg(test)]
use hound::{Sample, SampleFormat, WavSpec, WavWriter};

/// Writes a 32 bit WAV file, one inner Vec per channel.
#[cfg(test)]
pub fn write_wav<S: Sample + Copy + 'static>(
    path: PathBuf,
    samples: Vec<Vec<S>>,
    sample_rate: u32,
) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tempwav = File::create(path)?;

    // Determine sample format based on the type
    let sample_format = if std::any::TypeId::of::<S>() == std::any::TypeId::of::<f32>() {
        SampleFormat::Float
    } else if std::any::TypeId::of::<S>() == std::any::TypeId::of::<i32>() {
        SampleFormat::Int
    } else {
        return Err("Unsupported sample format".into());
    };

    let num_channels = samples.len();
    assert!(num_channels <= u16::MAX.into(), "Too many channels!");
    let mut writer = WavWriter::new(
        tempwav,
        WavSpec {
            channels: num_channels as u16,
            sample_rate,
            bits_per_sample: 32,
            sample_format,
        },
    )?;

    for channel in samples.iter() {
        for sample in channel {
            writer.write_sample(*sample)?;
        }
    }
    writer.finalize()?;

    Ok(())
}

/// Writes a preset document that embeds the given sample references the way Bitwig does:
/// each reference sits on its own line surrounded by binary noise.
#[cfg(test)]
pub fn write_preset(path: &Path, references: &[&str]) -> Result<(), Box<dyn Error>> {
    let mut contents: Vec<u8> = b"BtWg\x00\x01preset header\n".to_vec();
    for reference in references {
        contents.extend_from_slice(b"\x00\x00\x0a\xff");
        contents.extend_from_slice(reference.as_bytes());
        contents.extend_from_slice(b"\x00\x12\n");
    }
    fs::write(path, contents)?;
    Ok(())
}

/// Creates a WAV file for each reference beneath the sample root.
#[cfg(test)]
pub fn write_library(root: &Path, references: &[&str]) -> Result<(), Box<dyn Error>> {
    for (i, reference) in references.iter().enumerate() {
        write_wav(root.join(reference), vec![vec![i as i32, 1_i32]], 44100)?;
    }
    Ok(())
}
