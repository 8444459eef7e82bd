//! Sound-effect samples handed to backends, one slot per effect.

use xorx_core::{SoundEffect, SoundSet};

use crate::RenderingError;

/// Sample rate every effect must be recorded at.
pub const SAMPLE_RATE: u32 = 22_050;

/// Effects started per frame at most; further requests are dropped.
pub const VOICES: usize = 4;

const PCM: u16 = 1;
const CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;

/// A validated RIFF/WAVE file holding signed 16-bit mono PCM at [`SAMPLE_RATE`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SoundSample {
    wav: Vec<u8>,
    frames: usize,
}

impl SoundSample {
    /// Checks the header of `wav` and keeps the file bytes for the backend.
    pub fn from_wav(wav: Vec<u8>) -> Result<Self, RenderingError> {
        let header = parse_header(&wav).ok_or(RenderingError::SampleHeader)?;
        let format = header.format.ok_or(RenderingError::SampleHeader)?;
        if format.tag != PCM
            || format.channels != CHANNELS
            || format.sample_rate != SAMPLE_RATE
            || format.bits_per_sample != BITS_PER_SAMPLE
        {
            return Err(RenderingError::SampleFormat {
                tag: format.tag,
                channels: format.channels,
                sample_rate: format.sample_rate,
                bits_per_sample: format.bits_per_sample,
            });
        }
        let data = header.data.ok_or(RenderingError::SampleHeader)?;
        Ok(Self {
            wav,
            frames: data / usize::from(BITS_PER_SAMPLE / 8),
        })
    }

    /// Complete file contents, header included.
    #[must_use]
    pub fn wav(&self) -> &[u8] {
        &self.wav
    }

    /// Number of samples in the data chunk.
    #[must_use]
    pub fn frames(&self) -> usize {
        self.frames
    }
}

struct Format {
    tag: u16,
    channels: u16,
    sample_rate: u32,
    bits_per_sample: u16,
}

#[derive(Default)]
struct Header {
    format: Option<Format>,
    data: Option<usize>,
}

fn parse_header(bytes: &[u8]) -> Option<Header> {
    if bytes.get(0..4)? != b"RIFF" || bytes.get(8..12)? != b"WAVE" {
        return None;
    }
    let mut header = Header::default();
    let mut offset = 12;
    while let (Some(id), Some(size)) = (bytes.get(offset..offset + 4), read_u32(bytes, offset + 4))
    {
        let size = usize::try_from(size).ok()?;
        let body = offset + 8;
        match id {
            b"fmt " => {
                header.format = Some(Format {
                    tag: read_u16(bytes, body)?,
                    channels: read_u16(bytes, body + 2)?,
                    sample_rate: read_u32(bytes, body + 4)?,
                    bits_per_sample: read_u16(bytes, body + 14)?,
                });
            }
            b"data" => header.data = Some(size.min(bytes.len().saturating_sub(body))),
            _ => {}
        }
        // Chunks are padded to an even length.
        offset = body.checked_add(size)?.checked_add(size & 1)?;
    }
    Some(header)
}

fn read_u16(bytes: &[u8], at: usize) -> Option<u16> {
    Some(u16::from_le_bytes(bytes.get(at..at + 2)?.try_into().ok()?))
}

fn read_u32(bytes: &[u8], at: usize) -> Option<u32> {
    Some(u32::from_le_bytes(bytes.get(at..at + 4)?.try_into().ok()?))
}

/// Loaded samples indexed by [`SoundEffect::id`]. Empty slots stay silent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SoundBank {
    slots: Vec<Option<SoundSample>>,
}

impl SoundBank {
    /// Creates a bank with every slot empty.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: vec![None; SoundEffect::ALL.len()],
        }
    }

    /// Stores the sample played for `effect`.
    pub fn insert(&mut self, effect: SoundEffect, sample: SoundSample) {
        if let Some(slot) = self.slots.get_mut(usize::from(effect.id())) {
            *slot = Some(sample);
        }
    }

    /// Sample stored for `effect`, if any.
    #[must_use]
    pub fn get(&self, effect: SoundEffect) -> Option<&SoundSample> {
        self.slots.get(usize::from(effect.id()))?.as_ref()
    }

    /// Number of effects with a sample.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Whether no effect has a sample.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Effects from `requested` that should start now: loaded ones, lowest
    /// identifier first, at most [`VOICES`] of them.
    pub fn voices(&self, requested: SoundSet) -> impl Iterator<Item = SoundEffect> + '_ {
        SoundEffect::ALL
            .into_iter()
            .filter(move |effect| requested.contains(*effect) && self.get(*effect).is_some())
            .take(VOICES)
    }
}
