//! Video metadata reader
//!
//! Reads decodable container metadata only (pixel dimensions and duration)
//! by shelling out to ffprobe, the same external tool the rest of the video
//! pipeline is built on. Codec-level or EXIF-style tag extraction is never
//! attempted for video.

use serde::Deserialize;
use std::io::Write;
use verigate_core::models::{MediaKind, NormalizedMetadata, Resolution};

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// Probe a video container. Returns `None` when ffprobe is unavailable, the
/// container is unreadable, or no video stream is present; callers degrade
/// that to `MediaKind::Unknown`.
pub async fn read_video_metadata(ffprobe_path: &str, data: &[u8]) -> Option<NormalizedMetadata> {
    // ffprobe wants a path; the temp file lives until the probe returns.
    let tmp = match write_temp_file(data) {
        Ok(tmp) => tmp,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to stage video bytes for ffprobe");
            return None;
        }
    };

    let output = tokio::process::Command::new(ffprobe_path)
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(tmp.path())
        .output()
        .await;

    let output = match output {
        Ok(output) if output.status.success() => output,
        Ok(output) => {
            tracing::debug!(
                status = %output.status,
                stderr = %String::from_utf8_lossy(&output.stderr),
                "ffprobe rejected container"
            );
            return None;
        }
        Err(e) => {
            tracing::debug!(error = %e, ffprobe_path, "Failed to spawn ffprobe");
            return None;
        }
    };

    let probe: ProbeOutput = match serde_json::from_slice(&output.stdout) {
        Ok(probe) => probe,
        Err(e) => {
            tracing::debug!(error = %e, "Unparseable ffprobe output");
            return None;
        }
    };

    let stream = probe
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))?;

    let resolution = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => Some(Resolution {
            width: w,
            height: h,
        }),
        _ => None,
    };
    let duration_seconds = probe
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .and_then(parse_duration);

    Some(NormalizedMetadata {
        kind: MediaKind::Video,
        resolution,
        duration_seconds,
        ..NormalizedMetadata::unknown()
    })
}

fn write_temp_file(data: &[u8]) -> std::io::Result<tempfile::NamedTempFile> {
    let mut tmp = tempfile::NamedTempFile::new()?;
    tmp.write_all(data)?;
    tmp.flush()?;
    Ok(tmp)
}

fn parse_duration(raw: &str) -> Option<f64> {
    let seconds: f64 = raw.trim().parse().ok()?;
    if seconds.is_finite() && seconds > 0.0 {
        Some(seconds)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_parsing() {
        assert_eq!(parse_duration("12.48"), Some(12.48));
        assert_eq!(parse_duration(" 3 "), Some(3.0));
        assert!(parse_duration("0").is_none());
        assert!(parse_duration("-1.5").is_none());
        assert!(parse_duration("N/A").is_none());
        assert!(parse_duration("inf").is_none());
    }

    #[tokio::test]
    async fn missing_ffprobe_degrades_to_none() {
        let result = read_video_metadata("/nonexistent/ffprobe", b"not a video").await;
        assert!(result.is_none());
    }

    #[test]
    fn probe_output_decoding() {
        let raw = r#"{
            "streams": [
                { "codec_type": "audio" },
                { "codec_type": "video", "width": 1920, "height": 1080 }
            ],
            "format": { "duration": "14.500000" }
        }"#;
        let probe: ProbeOutput = serde_json::from_str(raw).expect("decode");
        let stream = probe
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"))
            .expect("video stream");
        assert_eq!(stream.width, Some(1920));
        assert_eq!(
            probe.format.and_then(|f| f.duration),
            Some("14.500000".to_string())
        );
    }
}
