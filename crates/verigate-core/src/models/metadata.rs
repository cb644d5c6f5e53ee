//! Normalized media metadata
//!
//! The canonical, format-agnostic record derived from a raw file. Produced
//! once per file by the extractor and treated as immutable afterwards; rule
//! evaluation only ever reads it.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Broad media classification. Anything that is not decodable as an image or
/// a video ends up as `Unknown` with no other fields populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Unknown,
}

/// GPS coordinates. Both components are present or the whole point is absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GpsPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GpsPoint {
    /// A point is only usable for gating when both components are finite.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// Pixel dimensions as displayed (after any EXIF orientation swap).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn long_edge(&self) -> u32 {
        self.width.max(self.height)
    }

    pub fn short_edge(&self) -> u32 {
        self.width.min(self.height)
    }
}

/// Displayed orientation, derived from resolution + EXIF orientation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrientationLabel {
    Portrait,
    Landscape,
    Square,
}

impl OrientationLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrientationLabel::Portrait => "portrait",
            OrientationLabel::Landscape => "landscape",
            OrientationLabel::Square => "square",
        }
    }
}

/// Camera identification strings. Informational only, never used for gating.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CameraInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub software: Option<String>,
}

impl CameraInfo {
    pub fn is_empty(&self) -> bool {
        self.make.is_none() && self.model.is_none() && self.software.is_none()
    }
}

/// Normalized metadata record for a single file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedMetadata {
    pub kind: MediaKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gps: Option<GpsPoint>,
    /// ISO-8601 capture instant, first valid candidate tag wins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,
    /// Raw EXIF orientation tag (images only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation_label: Option<OrientationLabel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraInfo>,
}

impl NormalizedMetadata {
    /// Record for a file whose media type or contents could not be read.
    pub fn unknown() -> Self {
        Self {
            kind: MediaKind::Unknown,
            gps: None,
            timestamp: None,
            resolution: None,
            orientation_code: None,
            orientation_label: None,
            duration_seconds: None,
            camera: None,
        }
    }
}

impl Default for NormalizedMetadata {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Whether an EXIF orientation code belongs to the 90-degree rotation family
/// (codes 5-8), which transpose the sensor's width/height axes on display.
pub fn orientation_transposes_axes(code: u16) -> bool {
    matches!(code, 5..=8)
}

/// Resolution as displayed: raw sensor dimensions with the axes swapped when
/// the orientation code indicates a 90-degree-family rotation.
pub fn displayed_resolution(raw: Resolution, orientation_code: Option<u16>) -> Resolution {
    match orientation_code {
        Some(code) if orientation_transposes_axes(code) => Resolution {
            width: raw.height,
            height: raw.width,
        },
        _ => raw,
    }
}

/// Classify displayed dimensions into portrait/landscape/square.
pub fn derive_orientation_label(resolution: Resolution) -> OrientationLabel {
    if resolution.height > resolution.width {
        OrientationLabel::Portrait
    } else if resolution.width > resolution.height {
        OrientationLabel::Landscape
    } else {
        OrientationLabel::Square
    }
}
