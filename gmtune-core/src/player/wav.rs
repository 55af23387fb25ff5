//! WAV backend: 16-bit PCM via `hound`.

use std::io::Cursor;

use super::{MetaLine, PcmEngine, PcmTrack};
use crate::loader::LoadError;

/// Decode a WAV blob into a single-track engine.
///
/// Mono input is duplicated to stereo; anything beyond two channels is
/// rejected. Sample rates other than the output rate play back unresampled.
pub fn open(data: &[u8], title: MetaLine) -> Result<PcmEngine, LoadError> {
    let reader = hound::WavReader::new(Cursor::new(data)).map_err(LoadError::WavDecodeFailed)?;
    let spec = reader.spec();

    let mut samples: Vec<i16> = Vec::new();
    for sample in reader.into_samples::<i16>() {
        samples.push(sample.map_err(LoadError::WavDecodeFailed)?);
    }

    let pcm_stereo = match spec.channels {
        1 => samples.into_iter().flat_map(|s| [s, s]).collect(),
        2 => samples,
        n => return Err(LoadError::UnsupportedChannels(n)),
    };

    Ok(PcmEngine::new(
        title.clone(),
        vec![PcmTrack {
            name: title,
            pcm_stereo,
        }],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Engine;

    fn wav_bytes(channels: u16, samples: &[i16]) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut bytes = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut bytes, spec).expect("wav header");
            for &s in samples {
                writer.write_sample(s).expect("wav sample");
            }
            writer.finalize().expect("wav finalize");
        }
        bytes.into_inner()
    }

    #[test]
    fn mono_input_is_duplicated_to_stereo() {
        let data = wav_bytes(1, &[100, -200]);
        let mut engine = open(&data, MetaLine::new("m")).expect("open failed");
        let mut out = [0i16; 4];
        engine.render(&mut out);
        assert_eq!(out, [100, 100, -200, -200]);
    }

    #[test]
    fn stereo_input_passes_through() {
        let data = wav_bytes(2, &[1, 2, 3, 4]);
        let mut engine = open(&data, MetaLine::new("s")).expect("open failed");
        assert_eq!(engine.track_count(), 1);
        let mut out = [0i16; 4];
        engine.render(&mut out);
        assert_eq!(out, [1, 2, 3, 4]);
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        assert!(open(b"not a wav", MetaLine::new("x")).is_err());
    }
}
