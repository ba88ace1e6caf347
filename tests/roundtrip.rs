//! Integration tests for the veilbox engine.
//!
//! Covers the cross-media round-trip, wrong-key rejection, ECC damage
//! tolerance, capacity boundaries, and the text watermark properties,
//! using synthetic carriers built in-test. The video path runs against an
//! in-memory frame bridge so the suite does not depend on an installed
//! ffmpeg.

use hound::{SampleFormat, WavSpec, WavWriter};
use image::RgbImage;
use std::io::Cursor;

use veilbox::{
    capacity_bytes, decode, decode_video_with_bridge, encode, encode_video_with_bridge,
    CarrierKind, DecodeOptions, EncodeOptions, Payload, StegoError, VideoFrameBridge,
};

/// One second of 16-bit mono WAV at 44.1 kHz.
fn one_second_wav() -> Vec<u8> {
    wav_with_samples(44100)
}

fn wav_with_samples(count: usize) -> Vec<u8> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: 44100,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut bytes = Vec::new();
    {
        let mut writer = WavWriter::new(Cursor::new(&mut bytes), spec).unwrap();
        for i in 0..count {
            let t = i as f64 / 44100.0;
            let sample = (f64::sin(2.0 * std::f64::consts::PI * 440.0 * t) * 16000.0) as i16;
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();
    }
    bytes
}

fn png_carrier(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([
            ((x * 7 + y) % 256) as u8,
            ((y * 13 + x) % 256) as u8,
            (((x ^ y) * 29) % 256) as u8,
        ])
    });
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

/// In-memory frame bridge: a "video" is the prefix `VID!` + a PNG frame.
struct MemoryBridge;

impl VideoFrameBridge for MemoryBridge {
    fn extract_frame(&self, video: &[u8]) -> Result<Vec<u8>, StegoError> {
        video
            .strip_prefix(b"VID!".as_slice())
            .map(|png| png.to_vec())
            .ok_or_else(|| StegoError::CarrierProcessing("unreadable container".into()))
    }

    fn recombine(&self, _video: &[u8], frame_png: &[u8]) -> Result<(Vec<u8>, String), StegoError> {
        let mut out = b"VID!".to_vec();
        out.extend_from_slice(frame_png);
        Ok((out, "mkv".to_string()))
    }
}

#[test]
fn audio_message_roundtrip() {
    // 1-second 16-bit mono WAV, message "test", ECC off.
    let carrier = one_second_wav();
    let payload = Payload::Message("test".to_string());

    let stego = encode(
        &carrier,
        CarrierKind::Audio,
        &payload,
        "password",
        &EncodeOptions::default(),
    )
    .unwrap();
    assert_eq!(stego.extension, "wav");

    let decoded = decode(
        &stego.bytes,
        CarrierKind::Audio,
        "password",
        &DecodeOptions::default(),
    )
    .unwrap();
    assert_eq!(decoded, Payload::Message("test".to_string()));
}

#[test]
fn audio_ecc_survives_one_flip_per_group() {
    // Same carrier, ECC on, one bit flipped per 7-bit group of the body.
    let carrier = one_second_wav();
    let stego = encode(
        &carrier,
        CarrierKind::Audio,
        &Payload::Message("test".to_string()),
        "password",
        &EncodeOptions {
            ecc: true,
            ..Default::default()
        },
    )
    .unwrap();

    // Reparse the stego WAV and damage the body region sample by sample.
    let mut reader = hound::WavReader::new(Cursor::new(&stego.bytes[..])).unwrap();
    let spec = reader.spec();
    let mut samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();

    // Header is 72 raw bits; the length field (bits 40..72) gives the blob size.
    let len_bits: Vec<u8> = samples[40..72].iter().map(|&s| (s & 1) as u8).collect();
    let mut blob_len = 0u32;
    for bit in len_bits {
        blob_len = (blob_len << 1) | bit as u32;
    }
    let body_bits = (blob_len as usize * 8).div_ceil(4) * 7;
    for group_start in (0..body_bits).step_by(7) {
        let offset = group_start / 7 % 7;
        samples[72 + group_start + offset] ^= 1;
    }

    let mut damaged = Vec::new();
    {
        let mut writer = WavWriter::new(Cursor::new(&mut damaged), spec).unwrap();
        for s in &samples {
            writer.write_sample(*s).unwrap();
        }
        writer.finalize().unwrap();
    }

    let decoded = decode(
        &damaged,
        CarrierKind::Audio,
        "password",
        &DecodeOptions::default(),
    )
    .unwrap();
    assert_eq!(decoded, Payload::Message("test".to_string()));
}

#[test]
fn audio_wrong_password_rejected() {
    let carrier = one_second_wav();
    let stego = encode(
        &carrier,
        CarrierKind::Audio,
        &Payload::Message("secret".to_string()),
        "k1",
        &EncodeOptions::default(),
    )
    .unwrap();

    let result = decode(
        &stego.bytes,
        CarrierKind::Audio,
        "k2",
        &DecodeOptions::default(),
    );
    assert!(matches!(result, Err(StegoError::CorruptPayload)));
}

#[test]
fn audio_capacity_boundary() {
    // Audio blob: salt(16) + iv(16) + frame(9 + message len) bytes.
    // A message of L bytes needs 72 + (41 + L) * 8 sample LSBs.
    let message = "x".repeat(100);
    let needed_samples = 72 + (41 + message.len()) * 8;

    let exact = wav_with_samples(needed_samples);
    let stego = encode(
        &exact,
        CarrierKind::Audio,
        &Payload::Message(message.clone()),
        "pw",
        &EncodeOptions::default(),
    )
    .unwrap();
    let decoded = decode(
        &stego.bytes,
        CarrierKind::Audio,
        "pw",
        &DecodeOptions::default(),
    )
    .unwrap();
    assert_eq!(decoded, Payload::Message(message.clone()));

    let short = wav_with_samples(needed_samples - 1);
    let result = encode(
        &short,
        CarrierKind::Audio,
        &Payload::Message(message),
        "pw",
        &EncodeOptions::default(),
    );
    assert!(matches!(result, Err(StegoError::CapacityExceeded { .. })));
}

#[test]
fn image_file_roundtrip() {
    let carrier = png_carrier(200, 150);
    let payload = Payload::File {
        name: "report.pdf".to_string(),
        content_type: "application/pdf".to_string(),
        bytes: (0..2000).map(|i| (i % 253) as u8).collect(),
    };

    let stego = encode(
        &carrier,
        CarrierKind::Image,
        &payload,
        "pixels",
        &EncodeOptions::default(),
    )
    .unwrap();
    assert_eq!(stego.extension, "png");
    // Output must itself be a decodable PNG.
    image::load_from_memory(&stego.bytes).unwrap();

    let decoded = decode(
        &stego.bytes,
        CarrierKind::Image,
        "pixels",
        &DecodeOptions::default(),
    )
    .unwrap();
    assert_eq!(decoded, payload);
}

#[test]
fn image_wrong_password_rejected() {
    let carrier = png_carrier(100, 100);
    let stego = encode(
        &carrier,
        CarrierKind::Image,
        &Payload::Message("hidden".to_string()),
        "right",
        &EncodeOptions::default(),
    )
    .unwrap();
    let result = decode(
        &stego.bytes,
        CarrierKind::Image,
        "wrong",
        &DecodeOptions::default(),
    );
    // Padding check catches nearly every wrong key; the payload frame's
    // magic catches the rare accidental unpad.
    assert!(matches!(
        result,
        Err(StegoError::Decrypt) | Err(StegoError::CorruptPayload)
    ));
}

#[test]
fn image_from_jpeg_input_emits_png() {
    // Re-encode the synthetic carrier as (lossy) JPEG input; the engine
    // normalizes and always emits PNG, and the payload still survives
    // because embedding happens after normalization.
    let img = image::load_from_memory(&png_carrier(160, 120)).unwrap();
    let mut jpeg = Vec::new();
    img.write_to(&mut Cursor::new(&mut jpeg), image::ImageFormat::Jpeg)
        .unwrap();

    let payload = Payload::Message("lossless after this point".to_string());
    let stego = encode(
        &jpeg,
        CarrierKind::Image,
        &payload,
        "pw",
        &EncodeOptions::default(),
    )
    .unwrap();
    assert_eq!(stego.extension, "png");
    let decoded = decode(
        &stego.bytes,
        CarrierKind::Image,
        "pw",
        &DecodeOptions::default(),
    )
    .unwrap();
    assert_eq!(decoded, payload);
}

#[test]
fn video_roundtrip_via_bridge() {
    let mut video = b"VID!".to_vec();
    video.extend_from_slice(&png_carrier(160, 120));
    let payload = Payload::File {
        name: "plans.zip".to_string(),
        content_type: "application/zip".to_string(),
        bytes: vec![0x50, 0x4B, 0x03, 0x04, 1, 2, 3],
    };

    let stego = encode_video_with_bridge(
        &MemoryBridge,
        &video,
        &payload,
        "motion",
        &EncodeOptions::default(),
    )
    .unwrap();
    assert_eq!(stego.extension, "mkv");

    let decoded = decode_video_with_bridge(
        &MemoryBridge,
        &stego.bytes,
        "motion",
        &DecodeOptions::default(),
    )
    .unwrap();
    assert_eq!(decoded, payload);
}

#[test]
fn text_watermark_concrete_scenario() {
    // Host "hello world", secret "hi", password "k1".
    let host = b"hello world";
    let stego = encode(
        host,
        CarrierKind::Text,
        &Payload::Message("hi".to_string()),
        "k1",
        &EncodeOptions::default(),
    )
    .unwrap();
    let watermarked = String::from_utf8(stego.bytes.clone()).unwrap();

    // Visible rendering unchanged; N zero-width code points appended.
    assert!(watermarked.starts_with("hello world"));
    let appended = watermarked.chars().count() - "hello world".chars().count();
    assert!(appended > 0);
    assert!(watermarked
        .chars()
        .skip("hello world".chars().count())
        .all(|c| c == '\u{200B}' || c == '\u{200C}'));

    // Correct password recovers "hi".
    let decoded = decode(
        &stego.bytes,
        CarrierKind::Text,
        "k1",
        &DecodeOptions::default(),
    )
    .unwrap();
    assert_eq!(decoded, Payload::Message("hi".to_string()));

    // Wrong password never yields "hi".
    match decode(
        &stego.bytes,
        CarrierKind::Text,
        "k2",
        &DecodeOptions::default(),
    ) {
        Err(_) => {}
        Ok(Payload::Message(m)) => assert_ne!(m, "hi"),
        Ok(other) => panic!("unexpected payload: {other:?}"),
    }
}

#[test]
fn text_watermark_survives_self_concatenation() {
    // Pasting the watermarked text after other watermarked text must
    // still leave one clean contiguous trailing run.
    let stego = encode(
        b"carrier prose",
        CarrierKind::Text,
        &Payload::Message("payload".to_string()),
        "pw",
        &EncodeOptions::default(),
    )
    .unwrap();
    let once = String::from_utf8(stego.bytes).unwrap();
    let twice = format!("{once}{once}");

    let decoded = decode(
        twice.as_bytes(),
        CarrierKind::Text,
        "pw",
        &DecodeOptions::default(),
    )
    .unwrap();
    assert_eq!(decoded, Payload::Message("payload".to_string()));
}

#[test]
fn text_stripped_watermark_reported() {
    let stego = encode(
        b"host",
        CarrierKind::Text,
        &Payload::Message("msg".to_string()),
        "pw",
        &EncodeOptions::default(),
    )
    .unwrap();
    let mut text = String::from_utf8(stego.bytes).unwrap();
    text.pop();
    let result = decode(
        text.as_bytes(),
        CarrierKind::Text,
        "pw",
        &DecodeOptions::default(),
    );
    assert!(matches!(result, Err(StegoError::TruncatedWatermark)));

    let plain = decode(
        b"no watermark here",
        CarrierKind::Text,
        "pw",
        &DecodeOptions::default(),
    );
    assert!(matches!(plain, Err(StegoError::WatermarkNotFound)));
}

#[test]
fn capacity_reporting() {
    let wav = wav_with_samples(8072);
    // (8072 - 72) / 8 = 1000 bytes.
    assert_eq!(
        capacity_bytes(&wav, CarrierKind::Audio).unwrap(),
        Some(1000)
    );

    let png = png_carrier(100, 100);
    // (100 * 100 * 3 - 64) / 8 = 3742 bytes.
    assert_eq!(
        capacity_bytes(&png, CarrierKind::Image).unwrap(),
        Some(3742)
    );

    assert_eq!(
        capacity_bytes(b"plain text", CarrierKind::Text).unwrap(),
        None
    );
}

#[test]
fn invocations_are_independent() {
    // Two encodes of the same input differ (fresh IV/salt) but both
    // decode to the same payload - no state leaks between calls.
    let carrier = png_carrier(80, 80);
    let payload = Payload::Message("idempotent".to_string());

    let a = encode(
        &carrier,
        CarrierKind::Image,
        &payload,
        "pw",
        &EncodeOptions::default(),
    )
    .unwrap();
    let b = encode(
        &carrier,
        CarrierKind::Image,
        &payload,
        "pw",
        &EncodeOptions::default(),
    )
    .unwrap();
    assert_ne!(a.bytes, b.bytes);

    for stego in [a, b] {
        let decoded = decode(
            &stego.bytes,
            CarrierKind::Image,
            "pw",
            &DecodeOptions::default(),
        )
        .unwrap();
        assert_eq!(decoded, payload);
    }
}
