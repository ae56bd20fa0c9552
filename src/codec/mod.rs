//! Base64 and PCM16 transcoding.
//!
//! The backend ships inline media as base64 text; audio arrives as raw
//! interleaved 16-bit signed little-endian PCM inside that base64 payload.
//! This module handles both layers losslessly.

use crate::error::{LibrettoError, Result};
use base64::Engine;

/// Encode raw bytes as standard base64.
///
/// Total and deterministic; inverse of [`decode_base64`].
pub fn encode_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Decode a standard base64 string into raw bytes.
///
/// Fails with [`LibrettoError::Format`] on non-alphabet characters or
/// incorrect padding.
pub fn decode_base64(input: &str) -> Result<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(input)
        .map_err(|e| LibrettoError::Format(format!("Invalid base64: {}", e)))
}

/// Decode interleaved 16-bit signed little-endian PCM into normalized
/// per-channel samples.
///
/// Each sample is divided by 32768.0, giving the range `(-1.0, 1.0]`.
/// Samples are de-interleaved into `channel_count` separate vectors in
/// temporal order. The byte length must be an exact multiple of
/// `2 * channel_count`, otherwise this fails with [`LibrettoError::Format`].
pub fn decode_pcm16(bytes: &[u8], channel_count: usize) -> Result<Vec<Vec<f32>>> {
    if channel_count == 0 {
        return Err(LibrettoError::Format(
            "PCM data must have at least one channel".to_string(),
        ));
    }

    let bytes_per_frame = 2 * channel_count;
    if bytes.len() % bytes_per_frame != 0 {
        return Err(LibrettoError::Format(format!(
            "PCM byte length {} is not a multiple of {} ({} channels, 2 bytes per sample)",
            bytes.len(),
            bytes_per_frame,
            channel_count
        )));
    }

    let frame_count = bytes.len() / bytes_per_frame;
    let mut channels = vec![Vec::with_capacity(frame_count); channel_count];

    for frame in bytes.chunks_exact(bytes_per_frame) {
        for (channel, sample_bytes) in frame.chunks_exact(2).enumerate() {
            let value = i16::from_le_bytes([sample_bytes[0], sample_bytes[1]]);
            channels[channel].push(value as f32 / 32768.0);
        }
    }

    Ok(channels)
}

/// Re-quantize normalized per-channel samples back into interleaved
/// 16-bit signed little-endian PCM bytes.
///
/// Inverse of [`decode_pcm16`] within one quantization step. All channels
/// must have equal length.
pub fn encode_pcm16(channels: &[Vec<f32>]) -> Result<Vec<u8>> {
    let frame_count = channels
        .first()
        .map(|c| c.len())
        .ok_or_else(|| LibrettoError::Format("PCM data must have at least one channel".to_string()))?;

    if channels.iter().any(|c| c.len() != frame_count) {
        return Err(LibrettoError::Format(
            "All PCM channels must have the same length".to_string(),
        ));
    }

    let mut bytes = Vec::with_capacity(frame_count * channels.len() * 2);
    for frame in 0..frame_count {
        for channel in channels {
            let value = (channel[frame] * 32768.0).round().clamp(-32768.0, 32767.0) as i16;
            bytes.extend_from_slice(&value.to_le_bytes());
        }
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_round_trip() {
        let data: Vec<u8> = (0..=255).collect();
        let encoded = encode_base64(&data);
        assert_eq!(decode_base64(&encoded).unwrap(), data);
    }

    #[test]
    fn test_base64_empty() {
        assert_eq!(encode_base64(&[]), "");
        assert_eq!(decode_base64("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_decode_base64_rejects_garbage() {
        assert!(matches!(
            decode_base64("not base64!!"),
            Err(LibrettoError::Format(_))
        ));
        // Incorrect padding
        assert!(matches!(
            decode_base64("AAA"),
            Err(LibrettoError::Format(_))
        ));
    }

    #[test]
    fn test_decode_pcm16_scaling() {
        let bytes = [
            0x00, 0x80, // -32768
            0x00, 0x40, // 16384
            0xFF, 0x7F, // 32767
            0x00, 0x00, // 0
        ];
        let channels = decode_pcm16(&bytes, 1).unwrap();
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0], vec![-1.0, 0.5, 32767.0 / 32768.0, 0.0]);
    }

    #[test]
    fn test_decode_pcm16_deinterleaves() {
        // Two channels: L = [1, 3], R = [2, 4]
        let bytes = [1i16, 2, 3, 4]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect::<Vec<u8>>();
        let channels = decode_pcm16(&bytes, 2).unwrap();
        assert_eq!(channels[0], vec![1.0 / 32768.0, 3.0 / 32768.0]);
        assert_eq!(channels[1], vec![2.0 / 32768.0, 4.0 / 32768.0]);
    }

    #[test]
    fn test_decode_pcm16_odd_length_fails() {
        assert!(matches!(
            decode_pcm16(&[0u8, 1, 2], 1),
            Err(LibrettoError::Format(_))
        ));
    }

    #[test]
    fn test_decode_pcm16_partial_frame_fails() {
        // 6 bytes is 3 samples, not a whole number of stereo frames
        assert!(matches!(
            decode_pcm16(&[0u8; 6], 2),
            Err(LibrettoError::Format(_))
        ));
    }

    #[test]
    fn test_decode_pcm16_zero_channels_fails() {
        assert!(matches!(
            decode_pcm16(&[0u8; 4], 0),
            Err(LibrettoError::Format(_))
        ));
    }

    #[test]
    fn test_pcm16_round_trip_within_one_step() {
        let original: Vec<u8> = [-32768i16, -12345, -1, 0, 1, 999, 32767]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        let channels = decode_pcm16(&original, 1).unwrap();
        let rebuilt = encode_pcm16(&channels).unwrap();

        assert_eq!(original.len(), rebuilt.len());
        for (a, b) in original.chunks_exact(2).zip(rebuilt.chunks_exact(2)) {
            let a = i16::from_le_bytes([a[0], a[1]]) as i32;
            let b = i16::from_le_bytes([b[0], b[1]]) as i32;
            assert!((a - b).abs() <= 1, "samples differ by more than one step");
        }
    }

    #[test]
    fn test_encode_pcm16_mismatched_channels_fail() {
        let channels = vec![vec![0.0f32; 4], vec![0.0f32; 3]];
        assert!(matches!(
            encode_pcm16(&channels),
            Err(LibrettoError::Format(_))
        ));
    }
}
