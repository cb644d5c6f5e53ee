//! Image metadata reader
//!
//! Reads a conservative, explicit allow-list of EXIF tags plus pixel
//! dimensions. Large binary blocks, vendor maker-notes, and embedded
//! thumbnails are deliberately never touched: this bounds payload size and
//! avoids leaking serial numbers into submission records.

use std::io::Cursor;

use exif::{Exif, In, Rational, Tag, Value};
use verigate_core::models::{
    derive_orientation_label, displayed_resolution, CameraInfo, GpsPoint, MediaKind,
    NormalizedMetadata, Resolution,
};

/// Timestamp candidates in priority order: capture-original, create, modify.
const TIMESTAMP_TAGS: [Tag; 3] = [Tag::DateTimeOriginal, Tag::DateTimeDigitized, Tag::DateTime];

/// Read image metadata from raw bytes. Returns `None` only when neither the
/// EXIF block nor the pixel data is decodable.
pub fn read_image_metadata(data: &[u8]) -> Option<NormalizedMetadata> {
    let exif = exif::Reader::new()
        .read_from_container(&mut Cursor::new(data))
        .ok();

    let decoded_dimensions = decode_dimensions(data);
    if exif.is_none() && decoded_dimensions.is_none() {
        return None;
    }

    let orientation_code = exif.as_ref().and_then(read_orientation);
    let raw_resolution = exif
        .as_ref()
        .and_then(read_pixel_dimensions)
        .or(decoded_dimensions);

    // Swap axes for 90-degree-family rotations so the label reflects the
    // displayed orientation, not the raw sensor orientation.
    let resolution = raw_resolution.map(|raw| displayed_resolution(raw, orientation_code));
    let orientation_label = resolution.map(derive_orientation_label);

    let camera = exif.as_ref().map(read_camera).filter(|c| !c.is_empty());

    Some(NormalizedMetadata {
        kind: MediaKind::Image,
        gps: exif.as_ref().and_then(read_gps),
        timestamp: exif.as_ref().and_then(read_timestamp),
        resolution,
        orientation_code,
        orientation_label,
        duration_seconds: None,
        camera,
    })
}

fn decode_dimensions(data: &[u8]) -> Option<Resolution> {
    let (width, height) = image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()?;
    if width == 0 || height == 0 {
        return None;
    }
    Some(Resolution { width, height })
}

fn ascii_value(exif: &Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match &field.value {
        Value::Ascii(chunks) => {
            let first = chunks.first()?;
            let text = String::from_utf8_lossy(first).trim().to_string();
            if text.is_empty() {
                None
            } else {
                Some(text)
            }
        }
        _ => None,
    }
}

fn uint_value(exif: &Exif, tag: Tag) -> Option<u32> {
    exif.get_field(tag, In::PRIMARY)
        .and_then(|f| f.value.get_uint(0))
}

fn read_orientation(exif: &Exif) -> Option<u16> {
    uint_value(exif, Tag::Orientation).and_then(|v| u16::try_from(v).ok())
}

fn read_pixel_dimensions(exif: &Exif) -> Option<Resolution> {
    let width = uint_value(exif, Tag::PixelXDimension)?;
    let height = uint_value(exif, Tag::PixelYDimension)?;
    if width == 0 || height == 0 {
        return None;
    }
    Some(Resolution { width, height })
}

fn read_camera(exif: &Exif) -> CameraInfo {
    CameraInfo {
        make: ascii_value(exif, Tag::Make),
        model: ascii_value(exif, Tag::Model),
        software: ascii_value(exif, Tag::Software),
    }
}

/// First present candidate tag wins; an unparseable winner is treated as
/// absent rather than falling through to later candidates.
fn read_timestamp(exif: &Exif) -> Option<String> {
    let raw = TIMESTAMP_TAGS
        .iter()
        .find_map(|&tag| ascii_value(exif, tag))?;
    parse_exif_timestamp(&raw)
}

/// Parse the EXIF `YYYY:MM:DD HH:MM:SS` form into an ISO-8601 instant.
pub(crate) fn parse_exif_timestamp(raw: &str) -> Option<String> {
    chrono::NaiveDateTime::parse_from_str(raw.trim(), "%Y:%m:%d %H:%M:%S")
        .ok()
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
}

fn read_gps(exif: &Exif) -> Option<GpsPoint> {
    let lat = read_gps_axis(exif, Tag::GPSLatitude, Tag::GPSLatitudeRef, "S")?;
    let lng = read_gps_axis(exif, Tag::GPSLongitude, Tag::GPSLongitudeRef, "W")?;
    let point = GpsPoint { lat, lng };
    // Both components must parse as finite numbers or neither is kept.
    if point.is_finite() {
        Some(point)
    } else {
        None
    }
}

fn read_gps_axis(exif: &Exif, value_tag: Tag, ref_tag: Tag, negative_ref: &str) -> Option<f64> {
    let field = exif.get_field(value_tag, In::PRIMARY)?;
    let degrees = match &field.value {
        Value::Rational(parts) => dms_to_decimal(parts)?,
        _ => return None,
    };
    let sign = match ascii_value(exif, ref_tag) {
        Some(r) if r.eq_ignore_ascii_case(negative_ref) => -1.0,
        _ => 1.0,
    };
    Some(sign * degrees)
}

/// Convert a degrees/minutes/seconds rational triple to decimal degrees.
/// Shorter triples are accepted (some devices write degrees only).
pub(crate) fn dms_to_decimal(parts: &[Rational]) -> Option<f64> {
    if parts.is_empty() {
        return None;
    }
    let mut total = 0.0;
    for (i, part) in parts.iter().take(3).enumerate() {
        let value = part.to_f64();
        if !value.is_finite() {
            return None;
        }
        total += value / 60f64.powi(i as i32);
    }
    Some(total)
}
