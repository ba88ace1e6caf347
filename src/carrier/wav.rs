//! WAV carrier normalization.
//!
//! Parses a WAV container into 16-bit PCM samples plus the header fields
//! needed to reconstruct an identical container around modified samples.
//! Compressed and float formats are rejected - LSB embedding only makes
//! sense on integer PCM.

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::Cursor;

use crate::error::StegoError;

/// A normalized PCM audio carrier.
pub struct PcmCarrier {
    /// Original WAV header metadata, preserved unchanged on output.
    spec: WavSpec,
    /// Ordered 16-bit samples across all channels.
    samples: Vec<i16>,
}

impl PcmCarrier {
    /// Parses WAV bytes into a PCM carrier.
    ///
    /// Only 16-bit integer PCM is supported; anything else is
    /// `UnsupportedFormat`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StegoError> {
        let reader = WavReader::new(Cursor::new(bytes))
            .map_err(|e| StegoError::UnsupportedFormat(format!("WAV parse: {e}")))?;
        let spec = reader.spec();

        if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
            return Err(StegoError::UnsupportedFormat(format!(
                "only 16-bit PCM WAV is supported, got {} bits {:?}",
                spec.bits_per_sample, spec.sample_format
            )));
        }

        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StegoError::UnsupportedFormat(format!("WAV samples: {e}")))?;

        Ok(Self { spec, samples })
    }

    /// Builds a carrier directly from a spec and samples.
    pub fn new(spec: WavSpec, samples: Vec<i16>) -> Self {
        Self { spec, samples }
    }

    /// Embedding capacity in bits: one LSB per sample.
    pub fn capacity_bits(&self) -> usize {
        self.samples.len()
    }

    /// The preserved WAV header metadata.
    pub fn spec(&self) -> &WavSpec {
        &self.spec
    }

    /// The normalized sample array.
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Mutable access for the embedder.
    pub fn samples_mut(&mut self) -> &mut [i16] {
        &mut self.samples
    }

    /// Serializes the carrier back into WAV bytes with the original spec.
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>, StegoError> {
        let mut bytes = Vec::new();
        {
            let mut writer = WavWriter::new(Cursor::new(&mut bytes), self.spec)
                .map_err(|e| StegoError::CarrierProcessing(format!("WAV write: {e}")))?;
            for &sample in &self.samples {
                writer
                    .write_sample(sample)
                    .map_err(|e| StegoError::CarrierProcessing(format!("WAV write: {e}")))?;
            }
            writer
                .finalize()
                .map_err(|e| StegoError::CarrierProcessing(format!("WAV finalize: {e}")))?;
        }
        Ok(bytes)
    }
}

/// Builds a synthetic sine-wave carrier for tests.
#[cfg(test)]
pub fn sine_carrier(sample_count: usize) -> PcmCarrier {
    let spec = WavSpec {
        channels: 1,
        sample_rate: 44100,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let samples: Vec<i16> = (0..sample_count)
        .map(|i| {
            let t = i as f64 / 44100.0;
            (f64::sin(2.0 * std::f64::consts::PI * 440.0 * t) * 16000.0) as i16
        })
        .collect();
    PcmCarrier::new(spec, samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wav_bytes_roundtrip() {
        let carrier = sine_carrier(4410);
        let bytes = carrier.to_wav_bytes().unwrap();
        let parsed = PcmCarrier::from_bytes(&bytes).unwrap();
        assert_eq!(parsed.samples(), carrier.samples());
        assert_eq!(parsed.spec(), carrier.spec());
    }

    #[test]
    fn test_capacity_is_sample_count() {
        let carrier = sine_carrier(10000);
        assert_eq!(carrier.capacity_bits(), 10000);
    }

    #[test]
    fn test_garbage_rejected() {
        let result = PcmCarrier::from_bytes(b"definitely not a wav file");
        assert!(matches!(result, Err(StegoError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_float_wav_rejected() {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut bytes = Vec::new();
        {
            let mut writer = WavWriter::new(Cursor::new(&mut bytes), spec).unwrap();
            for i in 0..100 {
                writer.write_sample(i as f32 / 100.0).unwrap();
            }
            writer.finalize().unwrap();
        }
        assert!(matches!(
            PcmCarrier::from_bytes(&bytes),
            Err(StegoError::UnsupportedFormat(_))
        ));
    }
}
