//! Sound-effect playback. Without the `audio` feature requests are only logged.

use xorx_core::SoundSet;
use xorx_rendering::SoundBank;

#[cfg(feature = "audio")]
use macroquad::audio::{load_sound_from_bytes, play_sound_once, Sound};
#[cfg(feature = "audio")]
use xorx_core::SoundEffect;

/// Samples uploaded to the mixer, one slot per effect.
#[cfg(feature = "audio")]
pub(crate) struct SoundPlayer {
    bank: SoundBank,
    slots: Vec<Option<Sound>>,
}

#[cfg(feature = "audio")]
impl SoundPlayer {
    /// Uploads every sample. Must run inside the macroquad window context.
    pub(crate) async fn load(bank: SoundBank) -> Self {
        let mut slots = Vec::with_capacity(SoundEffect::ALL.len());
        for effect in SoundEffect::ALL {
            let sound = match bank.get(effect) {
                Some(sample) => match load_sound_from_bytes(sample.wav()).await {
                    Ok(sound) => Some(sound),
                    Err(error) => {
                        log::warn!("sound {:02} rejected by the mixer: {error:?}", effect.id());
                        None
                    }
                },
                None => None,
            };
            slots.push(sound);
        }
        log::info!("{} sound effects loaded", slots.iter().flatten().count());
        Self { bank, slots }
    }

    pub(crate) fn play(&self, requested: SoundSet) {
        for effect in self.bank.voices(requested) {
            if let Some(Some(sound)) = self.slots.get(usize::from(effect.id())) {
                play_sound_once(*sound);
            }
        }
    }
}

/// Stand-in used when macroquad is built without its audio stack.
#[cfg(not(feature = "audio"))]
pub(crate) struct SoundPlayer {
    bank: SoundBank,
}

#[cfg(not(feature = "audio"))]
impl SoundPlayer {
    pub(crate) async fn load(bank: SoundBank) -> Self {
        if !bank.is_empty() {
            log::info!("built without audio, {} sound effects stay silent", bank.len());
        }
        Self { bank }
    }

    pub(crate) fn play(&self, requested: SoundSet) {
        for effect in self.bank.voices(requested) {
            log::trace!("sound {:02} requested", effect.id());
        }
    }
}
