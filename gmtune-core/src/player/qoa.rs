//! QOA backend via `qoaudio`.

use super::{MetaLine, PcmEngine, PcmTrack};
use crate::loader::LoadError;

/// Decode a QOA blob into a single-track engine.
pub fn open(data: &[u8], title: MetaLine) -> Result<PcmEngine, LoadError> {
    let decoder = qoaudio::QoaDecoder::new(data).map_err(|_| LoadError::QoaDecodeFailed)?;

    let channels = decoder.channels() as usize;
    let samples: Vec<i16> = match decoder.decoded_samples() {
        Some(s) => s.into_iter().collect(),
        None => return Err(LoadError::QoaDecodeFailed),
    };

    let pcm_stereo: Vec<i16> = match channels {
        1 => samples.into_iter().flat_map(|s| [s, s]).collect(),
        2 => samples,
        n => return Err(LoadError::UnsupportedChannels(n as u16)),
    };

    Ok(PcmEngine::new(
        title.clone(),
        vec![PcmTrack {
            name: title,
            pcm_stereo,
        }],
    ))
}
