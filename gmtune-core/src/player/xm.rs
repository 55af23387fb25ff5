//! FastTracker II module backend via `xmrs` + `xmrsplayer`.
//!
//! The whole song is rendered to PCM once at open. Chiptune modules decode
//! to at most a few minutes of stereo PCM, and paying the cost up front
//! keeps the per-frame path allocation-free.

use xmrs::import::xm::xmmodule::XmModule;
use xmrs::prelude::Module;
use xmrsplayer::prelude::XmrsPlayer;

use super::{MetaLine, PcmEngine, PcmTrack};
use crate::loader::LoadError;

/// Parse and render an XM module into a single-track engine.
pub fn open(data: &[u8], sample_rate: u32, fallback_title: &str) -> Result<PcmEngine, LoadError> {
    let xm = XmModule::load(data).map_err(|_| LoadError::XmParseFailed)?;
    let module = Box::new(xm.to_module());

    let name = module.name.trim().to_owned();
    let title = if name.is_empty() {
        MetaLine::new(fallback_title)
    } else {
        MetaLine::new(&name)
    };

    // The player borrows the module for its own lifetime, so the module is
    // leaked for the duration of the render and reclaimed afterwards.
    let module_ref: &'static Module = Box::leak(module);
    let mut pcm_stereo: Vec<i16> = Vec::new();
    {
        let mut player = XmrsPlayer::new(module_ref, sample_rate as f32, 1024, false);
        player.set_max_loop_count(1); // render the song exactly once

        while let Some((left, right)) = player.sample(true) {
            pcm_stereo.push((left * 32767.0) as i16);
            pcm_stereo.push((right * 32767.0) as i16);
        }
    }
    // SAFETY: the pointer came from Box::leak above and the only borrower
    // (the player) has been dropped.
    unsafe {
        drop(Box::from_raw(module_ref as *const Module as *mut Module));
    }

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

    #[test]
    fn garbage_bytes_are_rejected() {
        assert!(open(b"Extended Module: but not really", 44100, "t").is_err());
    }
}
