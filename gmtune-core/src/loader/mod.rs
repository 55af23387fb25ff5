//! Loader for gmtune-core.
//!
//! Responsibilities:
//! - Detect which music format the provided ROM bytes are.
//! - Construct the matching playback backend behind the [`Engine`] trait.
//!
//! Notes:
//! - libretro provides the ROM bytes; extension sniffing is unreliable in
//!   some setups, so we sniff the bytes themselves.

use std::path::Path;

use crate::player::{self, Engine, MetaLine};

/// Error returned by loader helpers.
#[derive(Debug)]
pub enum LoadError {
    /// The input was empty or not recognized as any supported format.
    UnrecognizedFormat,
    /// XM module parsing failed.
    XmParseFailed,
    /// QOA decoding failed.
    QoaDecodeFailed,
    /// WAV decoding failed.
    WavDecodeFailed(hound::Error),
    /// More channels than the stereo output can take.
    UnsupportedChannels(u16),
}

impl core::fmt::Display for LoadError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LoadError::UnrecognizedFormat => {
                write!(f, "unrecognized music format (expected xm, wav or qoa)")
            }
            LoadError::XmParseFailed => write!(f, "failed to parse XM module"),
            LoadError::QoaDecodeFailed => write!(f, "failed to decode QOA stream"),
            LoadError::WavDecodeFailed(e) => write!(f, "failed to decode WAV: {e}"),
            LoadError::UnsupportedChannels(n) => write!(f, "unsupported channel count: {n}"),
        }
    }
}

impl std::error::Error for LoadError {}

/// What kind of music file the loader inferred from the bytes.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DetectedFormat {
    Xm,
    Wav,
    Qoa,
}

/// Best-effort detection by magic bytes.
///
/// Rules:
/// - `Extended Module: ` header => XM
/// - `RIFF....WAVE` => WAV
/// - `qoaf` => QOA
pub fn detect_format(bytes: &[u8]) -> Option<DetectedFormat> {
    if bytes.starts_with(b"Extended Module: ") {
        return Some(DetectedFormat::Xm);
    }
    if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE" {
        return Some(DetectedFormat::Wav);
    }
    if bytes.starts_with(b"qoaf") {
        return Some(DetectedFormat::Qoa);
    }
    None
}

/// Detect the format and open the matching backend.
///
/// `path` only feeds the fallback title for formats without embedded
/// metadata; it never drives format selection.
pub fn open_engine(
    bytes: &[u8],
    path: Option<&str>,
    sample_rate: u32,
) -> Result<Box<dyn Engine>, LoadError> {
    let format = detect_format(bytes).ok_or(LoadError::UnrecognizedFormat)?;
    let fallback_title = title_from_path(path);

    let engine = match format {
        DetectedFormat::Xm => player::xm::open(bytes, sample_rate, &fallback_title)?,
        DetectedFormat::Wav => player::wav::open(bytes, MetaLine::new(&fallback_title))?,
        DetectedFormat::Qoa => player::qoa::open(bytes, MetaLine::new(&fallback_title))?,
    };

    log::info!(
        "loaded {:?} file: \"{}\", {} track(s)",
        format,
        engine.title(),
        engine.track_count()
    );

    Ok(Box::new(engine))
}

fn title_from_path(path: Option<&str>) -> String {
    path.and_then(|p| Path::new(p).file_stem())
        .and_then(|s| s.to_str())
        .unwrap_or("Unknown")
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_xm_header() {
        assert_eq!(
            detect_format(b"Extended Module: some song"),
            Some(DetectedFormat::Xm)
        );
    }

    #[test]
    fn detects_riff_wave() {
        assert_eq!(
            detect_format(b"RIFF\x24\x00\x00\x00WAVEfmt "),
            Some(DetectedFormat::Wav)
        );
    }

    #[test]
    fn detects_qoa_magic() {
        assert_eq!(detect_format(b"qoaf\x00\x00\x00\x10"), Some(DetectedFormat::Qoa));
    }

    #[test]
    fn riff_without_wave_is_not_wav() {
        assert_eq!(detect_format(b"RIFF\x24\x00\x00\x00AVI LIST"), None);
    }

    #[test]
    fn unrecognized_returns_none() {
        assert_eq!(detect_format(b"not music"), None);
        assert_eq!(detect_format(b""), None);
    }

    #[test]
    fn open_engine_rejects_unknown_bytes() {
        assert!(matches!(
            open_engine(b"garbage", None, 44100),
            Err(LoadError::UnrecognizedFormat)
        ));
    }

    #[test]
    fn title_falls_back_to_file_stem() {
        assert_eq!(title_from_path(Some("/roms/music/tune.xm")), "tune");
        assert_eq!(title_from_path(None), "Unknown");
    }
}
