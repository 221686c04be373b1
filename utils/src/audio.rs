use base64::Engine;
use multimodal_live_types::audio::{MediaChunk, INPUT_SAMPLE_RATE_HZ, OUTPUT_SAMPLE_RATE_HZ};
use rubato::{FastFixedIn, PolynomialDegree};

pub const LIVE_API_INPUT_SAMPLE_RATE: f64 = INPUT_SAMPLE_RATE_HZ as f64;
pub const LIVE_API_OUTPUT_SAMPLE_RATE: f64 = OUTPUT_SAMPLE_RATE_HZ as f64;

pub fn create_resampler(in_sampling_rate: f64, out_sampling_rate: f64, chunk_size: usize) -> anyhow::Result<FastFixedIn<f32>> {
    let resampler = FastFixedIn::<f32>::new(
        out_sampling_rate / in_sampling_rate,
        1.0,
        PolynomialDegree::Cubic,
        chunk_size,
        1
    )?;
    Ok(resampler)
}

pub fn split_for_chunks(samples: &[f32], chunk_size: usize) -> Vec<Vec<f32>> {
    samples.chunks(chunk_size).map(|chunk| {
        let mut chunk = chunk.to_vec();
        chunk.resize(chunk_size, 0.0);
        chunk
    }).collect()
}

/// Splits mono 16 kHz samples into PCM16 realtime chunks ready for
/// `send_realtime_input`.
pub fn to_media_chunks(samples: &[f32], chunk_size: usize) -> Vec<MediaChunk> {
    split_for_chunks(samples, chunk_size)
        .iter()
        .map(|chunk| MediaChunk::pcm(encode(chunk)))
        .collect()
}

pub fn decode_all(fragments: Vec<String>) -> Vec<f32> {
    fragments.iter().flat_map(|fragment| decode(fragment)).collect()
}

pub fn decode(fragment: &str) -> Vec<f32> {
    if let Ok(pcm16) = base64::engine::general_purpose::STANDARD.decode(fragment) {
        pcm16.chunks_exact(2).map(|chunk| {
            let v = i16::from_le_bytes([chunk[0], chunk[1]]);
            (v as f32 / i16::MAX as f32).clamp(-1.0, 1.0)
        }).collect()
    } else {
        tracing::error!("Failed to decode base64 fragment");
        Vec::new()
    }
}

pub fn encode(pcm32: &[f32]) -> String {
    let pcm16: Vec<u8> = pcm32.iter().flat_map(|&sample| {
        ((sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16).to_le_bytes()
    }).collect();
    base64::engine::general_purpose::STANDARD.encode(&pcm16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use multimodal_live_types::audio::PCM_INPUT_MIME_TYPE;

    #[test]
    fn test_encode_is_little_endian_pcm16() {
        let encoded = encode(&[0.0, 1.0, -1.0]);
        let bytes = base64::engine::general_purpose::STANDARD.decode(&encoded).unwrap();
        assert_eq!(bytes, vec![0x00, 0x00, 0xff, 0x7f, 0x01, 0x80]);
    }

    #[test]
    fn test_encode_clamps_out_of_range_samples() {
        assert_eq!(encode(&[2.0]), encode(&[1.0]));
        assert_eq!(encode(&[-3.5]), encode(&[-1.0]));
    }

    #[test]
    fn test_decode_restores_samples() {
        let decoded = decode(&encode(&[0.0, 0.5, -0.5]));
        assert_eq!(decoded.len(), 3);
        assert!(decoded[0].abs() < 1e-4);
        assert!((decoded[1] - 0.5).abs() < 1e-4);
        assert!((decoded[2] + 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_decode_invalid_base64_yields_nothing() {
        assert!(decode("%%%not-base64%%%").is_empty());
    }

    #[test]
    fn test_split_for_chunks_pads_last_chunk() {
        let chunks = split_for_chunks(&[0.1, 0.2, 0.3], 2);
        assert_eq!(chunks, vec![vec![0.1, 0.2], vec![0.3, 0.0]]);
    }

    #[test]
    fn test_to_media_chunks() {
        let chunks = to_media_chunks(&[0.0; 5], 2);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.mime_type() == PCM_INPUT_MIME_TYPE));
        assert_eq!(decode(chunks[2].data()).len(), 2);
    }

    #[test]
    fn test_create_resampler() {
        let resampler = create_resampler(48000.0, LIVE_API_INPUT_SAMPLE_RATE, 480);
        assert!(resampler.is_ok());
    }
}
