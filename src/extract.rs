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
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use regex::Regex;

/// Matches a sample reference embedded in a preset document. Whitespace is limited to
/// ASCII so that binary noise such as vertical tabs or NBSP never joins a reference.
const SAMPLE_PATTERN: &str = r"Bitwig[A-Za-z0-9_\t\n\f\r /:'\-]+\.wav";

/// Library-internal path marker that Bitwig inserts into sample references.
pub const LIBRARY_MARKER: &str = ":7/samples";

/// Errors that can occur while scanning a preset document.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("unable to read preset {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid sample pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// A normalized reference to a sample inside the Bitwig sample library.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SampleReference(String);

impl SampleReference {
    /// Creates a reference from raw preset text, stripping the library marker.
    pub fn normalize(raw: &str) -> SampleReference {
        let mut normalized = raw.to_string();
        // Removing one marker can never produce a longer string, so this terminates.
        while let Some(idx) = normalized.find(LIBRARY_MARKER) {
            normalized.replace_range(idx..idx + LIBRARY_MARKER.len(), "");
        }
        SampleReference(normalized)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The reference as a path relative to the sample library root.
    pub fn relative_path(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl fmt::Display for SampleReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Finds sample references inside preset documents.
pub struct SampleScanner {
    pattern: Regex,
}

impl SampleScanner {
    /// Creates a new scanner. Fails only if the built in pattern does not compile.
    pub fn new() -> Result<SampleScanner, ExtractError> {
        Ok(SampleScanner {
            pattern: Regex::new(SAMPLE_PATTERN)?,
        })
    }

    /// Scans the preset document at the given path.
    pub fn scan_path(&self, path: &Path) -> Result<Vec<SampleReference>, ExtractError> {
        let file = File::open(path).map_err(|source| ExtractError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        self.scan_reader(BufReader::new(file))
            .map_err(|source| ExtractError::Io {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Scans any line oriented reader. Preset documents are mostly binary, so lines are
    /// decoded lossily rather than rejected.
    pub fn scan_reader<R: BufRead>(&self, mut reader: R) -> io::Result<Vec<SampleReference>> {
        let mut samples = Vec::new();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }

            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches('\n').trim_end_matches('\r');
            if let Some(sample) = self.scan_line(line) {
                samples.push(sample);
            }
        }

        Ok(samples)
    }

    /// Scans in-memory preset text.
    pub fn scan_text(&self, text: &str) -> Vec<SampleReference> {
        text.lines()
            .filter_map(|line| self.scan_line(line))
            .collect()
    }

    /// Returns the last reference on the line. Presets repeat metadata ahead of the real
    /// reference, so earlier matches on the same line are discarded.
    fn scan_line(&self, line: &str) -> Option<SampleReference> {
        self.pattern
            .find_iter(line)
            .last()
            .map(|m| SampleReference::normalize(m.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;
    use std::fs;
    use std::io::Cursor;

    use super::*;

    const KICK: &str = "Bitwig/Nektar's Acoustic Drums/samples/Kick/Kick 1 v5.wav";

    fn refs(samples: &[SampleReference]) -> Vec<&str> {
        samples.iter().map(|s| s.as_str()).collect()
    }

    #[test]
    fn test_single_reference() -> Result<(), Box<dyn Error>> {
        let scanner = SampleScanner::new()?;
        let text = format!("\u{1}\u{5}junk{}\u{0}more junk", KICK);
        assert_eq!(vec![KICK], refs(&scanner.scan_text(&text)));
        Ok(())
    }

    #[test]
    fn test_last_match_on_line_wins() -> Result<(), Box<dyn Error>> {
        let scanner = SampleScanner::new()?;
        let text = "Bitwig/meta/first.wav|Bitwig/meta/second.wav|Bitwig/real/third.wav";
        assert_eq!(
            vec!["Bitwig/real/third.wav"],
            refs(&scanner.scan_text(text))
        );
        Ok(())
    }

    #[test]
    fn test_file_order_preserved() -> Result<(), Box<dyn Error>> {
        let scanner = SampleScanner::new()?;
        let text = "Bitwig/a/Snare 1 v1.wav\nnothing here\nBitwig/a/Kick 1 v2.wav\r\n";
        assert_eq!(
            vec!["Bitwig/a/Snare 1 v1.wav", "Bitwig/a/Kick 1 v2.wav"],
            refs(&scanner.scan_reader(Cursor::new(text))?)
        );
        Ok(())
    }

    #[test]
    fn test_non_ascii_whitespace_breaks_reference() -> Result<(), Box<dyn Error>> {
        let scanner = SampleScanner::new()?;
        assert!(scanner
            .scan_text("Bitwig/a/Kick\u{a0}1\u{b}v5.wav")
            .is_empty());
        assert!(scanner.scan_text("Bitwig/a/Kick 1\u{b}v5.wav").is_empty());
        assert_eq!(
            vec!["Bitwig/a/Kick\t1 v5.wav"],
            refs(&scanner.scan_text("Bitwig/a/Kick\t1 v5.wav"))
        );
        Ok(())
    }

    #[test]
    fn test_no_references() -> Result<(), Box<dyn Error>> {
        let scanner = SampleScanner::new()?;
        assert!(scanner.scan_text("no samples\nat all.wav\n").is_empty());
        assert!(scanner.scan_text("").is_empty());
        Ok(())
    }

    #[test]
    fn test_marker_stripped() -> Result<(), Box<dyn Error>> {
        let scanner = SampleScanner::new()?;
        let text = "Bitwig/Nektar's Acoustic Drums:7/samples/samples/Kick/Kick 1 v5.wav";
        let samples = scanner.scan_text(text);
        assert_eq!(vec![KICK], refs(&samples));
        assert!(!samples[0].as_str().contains(LIBRARY_MARKER));
        Ok(())
    }

    #[test]
    fn test_normalize_idempotent() {
        for raw in [
            KICK,
            "Bitwig/x:7/samples/y.wav",
            "Bitwig/x:7/samples:7/samples/y.wav",
            "Bitwig/x:7/:7/samplessamples/y.wav",
        ] {
            let once = SampleReference::normalize(raw);
            assert!(!once.as_str().contains(LIBRARY_MARKER), "{}", raw);
            assert_eq!(once, SampleReference::normalize(once.as_str()));
        }
    }

    #[test]
    fn test_invalid_utf8_tolerated() -> Result<(), Box<dyn Error>> {
        let scanner = SampleScanner::new()?;
        let mut bytes = vec![0xff, 0xfe, b'\n'];
        bytes.extend_from_slice(KICK.as_bytes());
        bytes.extend_from_slice(&[0xc3, b'\n']);
        assert_eq!(vec![KICK], refs(&scanner.scan_reader(Cursor::new(bytes))?));
        Ok(())
    }

    #[test]
    fn test_scan_path() -> Result<(), Box<dyn Error>> {
        let scanner = SampleScanner::new()?;
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("Warm Kit.bwpreset");
        fs::write(&path, format!("header\n{}\n", KICK))?;
        assert_eq!(vec![KICK], refs(&scanner.scan_path(&path)?));
        Ok(())
    }

    #[test]
    fn test_scan_missing_path() -> Result<(), Box<dyn Error>> {
        let scanner = SampleScanner::new()?;
        let dir = tempfile::tempdir()?;
        let missing = dir.path().join("missing.bwpreset");
        match scanner.scan_path(&missing) {
            Err(ExtractError::Io { path, .. }) => assert_eq!(missing, path),
            other => panic!("expected IO error, got {:?}", other),
        }
        Ok(())
    }
}
