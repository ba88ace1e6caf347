//! Video frame bridge - first-frame extraction and remux.
//!
//! Only the first frame of a video is decoded, modified, and re-encoded;
//! every other frame and the audio track pass through untouched. The
//! multimedia toolkit sits behind the [`VideoFrameBridge`] trait so the
//! codec core stays decoupled from whichever tool is linked (or shelled
//! out to).
//!
//! [`FfmpegFrameBridge`] is the default implementation. It invokes the
//! `ffmpeg` binary (`FFMPEG_PATH` overrides the lookup) in a temporary
//! directory. The modified first frame is spliced in with an overlay
//! enabled for frame 0 only, the video stream is re-encoded with FFV1 and
//! the audio stream is copied. FFV1 because the frame's LSBs must survive:
//! a lossy re-encode would destroy the embedded bits. Output container is
//! Matroska, which carries FFV1 without complaint.

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

use crate::error::StegoError;

/// Abstracts first-frame extraction and recombination over a video file.
pub trait VideoFrameBridge {
    /// Decodes the first frame of the video into PNG bytes.
    fn extract_frame(&self, video: &[u8]) -> Result<Vec<u8>, StegoError>;

    /// Rebuilds the video with `frame_png` substituted for frame 0,
    /// remuxing the original audio track. Returns the output bytes and
    /// their file extension.
    fn recombine(&self, video: &[u8], frame_png: &[u8]) -> Result<(Vec<u8>, String), StegoError>;
}

/// Frame bridge that shells out to the ffmpeg binary.
pub struct FfmpegFrameBridge {
    binary: String,
}

impl Default for FfmpegFrameBridge {
    fn default() -> Self {
        Self {
            binary: std::env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
        }
    }
}

impl FfmpegFrameBridge {
    /// Creates a bridge using an explicit ffmpeg binary path.
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Runs ffmpeg with `-y` plus the given arguments, mapping a nonzero
    /// exit status (with its stderr) to `CarrierProcessing`.
    fn run(&self, args: &[&str]) -> Result<(), StegoError> {
        let output = Command::new(&self.binary)
            .arg("-y")
            .args(args)
            .output()
            .map_err(|e| StegoError::CarrierProcessing(format!("cannot run ffmpeg: {e}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .unwrap_or("ffmpeg failed");
            return Err(StegoError::CarrierProcessing(format!(
                "ffmpeg exited with {}: {detail}",
                output.status
            )));
        }
        Ok(())
    }

    fn workdir(&self) -> Result<TempDir, StegoError> {
        TempDir::new().map_err(|e| StegoError::CarrierProcessing(format!("temp dir: {e}")))
    }
}

fn read_output(path: &Path, what: &str) -> Result<Vec<u8>, StegoError> {
    fs::read(path).map_err(|_| StegoError::CarrierProcessing(format!("{what} was not produced")))
}

impl VideoFrameBridge for FfmpegFrameBridge {
    fn extract_frame(&self, video: &[u8]) -> Result<Vec<u8>, StegoError> {
        let dir = self.workdir()?;
        let input = dir.path().join("input");
        let frame = dir.path().join("frame.png");
        fs::write(&input, video)?;

        self.run(&[
            "-i",
            input.to_str().expect("temp path is UTF-8"),
            "-map",
            "0:v:0",
            "-frames:v",
            "1",
            frame.to_str().expect("temp path is UTF-8"),
        ])?;
        // ffmpeg exits zero but writes nothing for a zero-frame stream.
        read_output(&frame, "first frame")
    }

    fn recombine(&self, video: &[u8], frame_png: &[u8]) -> Result<(Vec<u8>, String), StegoError> {
        let dir = self.workdir()?;
        let input = dir.path().join("input");
        let frame = dir.path().join("stego_frame.png");
        let output = dir.path().join("output.mkv");
        fs::write(&input, video)?;
        fs::write(&frame, frame_png)?;

        self.run(&[
            "-i",
            input.to_str().expect("temp path is UTF-8"),
            "-i",
            frame.to_str().expect("temp path is UTF-8"),
            "-filter_complex",
            "[0:v][1:v]overlay=eof_action=pass:enable=eq(n\\,0)",
            "-map",
            "0:a?",
            "-c:v",
            "ffv1",
            "-c:a",
            "copy",
            output.to_str().expect("temp path is UTF-8"),
        ])?;
        let bytes = read_output(&output, "remuxed video")?;
        Ok((bytes, "mkv".to_string()))
    }
}
