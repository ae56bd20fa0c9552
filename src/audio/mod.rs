//! Assembled, time-addressable audio buffers.
//!
//! Wraps decoded PCM samples into an immutable buffer ready for playback or
//! export. No resampling or mixing happens here; sample rate and channel
//! count are passed through unchanged from the backend's declared format.

use crate::codec::{decode_pcm16, encode_pcm16};
use crate::error::{LibrettoError, Result};
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Write;

/// An immutable PCM audio buffer with normalized float samples.
#[derive(Debug, Clone)]
pub struct PcmAudioBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl PcmAudioBuffer {
    /// Create a buffer from decoded per-channel samples.
    ///
    /// All channels must have the same length and there must be at least one.
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> Result<Self> {
        let frame_count = channels
            .first()
            .map(|c| c.len())
            .ok_or_else(|| LibrettoError::Format("Audio buffer needs at least one channel".to_string()))?;

        if channels.iter().any(|c| c.len() != frame_count) {
            return Err(LibrettoError::Format(
                "Audio channels must have equal length".to_string(),
            ));
        }

        Ok(Self {
            sample_rate,
            channels,
        })
    }

    /// Decode raw interleaved PCM16 bytes and assemble a buffer in one step.
    pub fn from_pcm16(bytes: &[u8], sample_rate: u32, channel_count: usize) -> Result<Self> {
        let channels = decode_pcm16(bytes, channel_count)?;
        Self::new(sample_rate, channels)
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of frames (samples per channel).
    pub fn frame_count(&self) -> usize {
        self.channels.first().map(|c| c.len()).unwrap_or(0)
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate as f64
    }

    /// Samples for a single channel.
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(|c| c.as_slice())
    }

    /// Write the buffer as a 16-bit PCM RIFF/WAVE file.
    pub fn write_wav<W: Write>(&self, writer: &mut W) -> Result<()> {
        let data = encode_pcm16(&self.channels)?;
        let channel_count = self.channel_count() as u16;
        let byte_rate = self.sample_rate * channel_count as u32 * 2;
        let block_align = channel_count * 2;

        writer.write_all(b"RIFF")?;
        writer.write_u32::<LittleEndian>(36 + data.len() as u32)?;
        writer.write_all(b"WAVE")?;

        writer.write_all(b"fmt ")?;
        writer.write_u32::<LittleEndian>(16)?;
        writer.write_u16::<LittleEndian>(1)?; // PCM
        writer.write_u16::<LittleEndian>(channel_count)?;
        writer.write_u32::<LittleEndian>(self.sample_rate)?;
        writer.write_u32::<LittleEndian>(byte_rate)?;
        writer.write_u16::<LittleEndian>(block_align)?;
        writer.write_u16::<LittleEndian>(16)?; // bits per sample

        writer.write_all(b"data")?;
        writer.write_u32::<LittleEndian>(data.len() as u32)?;
        writer.write_all(&data)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_accessors() {
        let buffer = PcmAudioBuffer::new(24000, vec![vec![0.0; 12000]]).unwrap();
        assert_eq!(buffer.sample_rate(), 24000);
        assert_eq!(buffer.channel_count(), 1);
        assert_eq!(buffer.frame_count(), 12000);
        assert_eq!(buffer.duration_seconds(), 0.5);
        assert_eq!(buffer.channel(0).unwrap().len(), 12000);
        assert!(buffer.channel(1).is_none());
    }

    #[test]
    fn test_buffer_rejects_uneven_channels() {
        let result = PcmAudioBuffer::new(24000, vec![vec![0.0; 10], vec![0.0; 9]]);
        assert!(matches!(result, Err(LibrettoError::Format(_))));
    }

    #[test]
    fn test_buffer_rejects_zero_channels() {
        let result = PcmAudioBuffer::new(24000, Vec::new());
        assert!(matches!(result, Err(LibrettoError::Format(_))));
    }

    #[test]
    fn test_from_pcm16_mono_frame_count() {
        // 48000 raw bytes of mono PCM16 is 24000 frames, one second at 24kHz
        let bytes = vec![0u8; 48000];
        let buffer = PcmAudioBuffer::from_pcm16(&bytes, 24000, 1).unwrap();
        assert_eq!(buffer.frame_count(), 24000);
        assert_eq!(buffer.duration_seconds(), 1.0);
    }

    #[test]
    fn test_write_wav_layout() {
        let buffer = PcmAudioBuffer::new(24000, vec![vec![0.0, 0.5, -0.5, 1.0]]).unwrap();
        let mut out = Vec::new();
        buffer.write_wav(&mut out).unwrap();

        assert_eq!(&out[0..4], b"RIFF");
        assert_eq!(&out[8..12], b"WAVE");
        assert_eq!(&out[12..16], b"fmt ");
        assert_eq!(&out[36..40], b"data");
        // 44-byte header plus 2 bytes per sample
        assert_eq!(out.len(), 44 + 4 * 2);
        // Data chunk size field
        assert_eq!(u32::from_le_bytes([out[40], out[41], out[42], out[43]]), 8);
    }
}
