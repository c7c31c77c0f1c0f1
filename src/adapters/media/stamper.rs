//! Post-download metadata stamping: filesystem mtime plus embedded
//! capture metadata (EXIF for JPEG, iTunes-style atoms for MP4).
//!
//! Every operation here is best-effort and independently caught: a stamping
//! failure is logged and must never invalidate the already-downloaded file.
//! Re-stamping with the same timestamp replaces tags, it does not accumulate
//! them.
//!
//! Metadata is written in place: only the metadata segment/atoms are
//! rewritten, image and stream data are never re-encoded.

use crate::domain::DomainError;
use chrono::{DateTime, TimeZone, Utc};
use filetime::FileTime;
use little_exif::exif_tag::ExifTag;
use little_exif::metadata::Metadata;
use std::path::Path;
use tracing::{debug, warn};

/// Written into the EXIF Software tag and the MP4 ©too atom.
const TOOL_NAME: &str = "vk-archiver";

/// Stamp `path` with the original capture timestamp. Embeds format-specific
/// metadata first, then sets mtime/atime; each step fails independently.
pub fn stamp(path: &Path, unix_ts: i64) {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let embed = match ext.as_str() {
        "jpg" | "jpeg" => write_photo_exif(path, unix_ts),
        "mp4" => write_video_atoms(path, unix_ts),
        _ => Ok(()),
    };
    if let Err(e) = embed {
        warn!(path = %path.display(), error = %e, "embedding capture metadata failed");
    }

    if let Err(e) = set_file_times(path, unix_ts) {
        warn!(path = %path.display(), error = %e, "setting file times failed");
    } else {
        debug!(path = %path.display(), unix_ts, "stamped");
    }
}

fn utc(unix_ts: i64) -> Result<DateTime<Utc>, DomainError> {
    Utc.timestamp_opt(unix_ts, 0)
        .single()
        .ok_or_else(|| DomainError::Metadata(format!("timestamp out of range: {unix_ts}")))
}

/// EXIF datetime format, e.g. "2023:11:14 22:13:20" (UTC).
fn exif_timestamp(unix_ts: i64) -> Result<String, DomainError> {
    Ok(utc(unix_ts)?.format("%Y:%m:%d %H:%M:%S").to_string())
}

/// ISO-8601 without offset, e.g. "2023-11-14T22:13:20" (UTC).
fn iso_timestamp(unix_ts: i64) -> Result<String, DomainError> {
    Ok(utc(unix_ts)?.format("%Y-%m-%dT%H:%M:%S").to_string())
}

/// JPEG: DateTimeOriginal/CreateDate/ModifyDate plus a Software tag.
fn write_photo_exif(path: &Path, unix_ts: i64) -> Result<(), DomainError> {
    let stamp = exif_timestamp(unix_ts)?;

    let mut metadata = Metadata::new();
    metadata.set_tag(ExifTag::DateTimeOriginal(stamp.clone()));
    metadata.set_tag(ExifTag::CreateDate(stamp.clone()));
    metadata.set_tag(ExifTag::ModifyDate(stamp));
    metadata.set_tag(ExifTag::Software(TOOL_NAME.to_string()));
    metadata
        .write_to_file(path)
        .map_err(|e| DomainError::Metadata(e.to_string()))
}

/// MP4: creation-date (©day), title (©nam), comment (©cmt) and tool (©too)
/// atoms. Rewrites the metadata atom only; streams are not re-encoded.
fn write_video_atoms(path: &Path, unix_ts: i64) -> Result<(), DomainError> {
    let iso = iso_timestamp(unix_ts)?;

    let mut tag = mp4ameta::Tag::read_from_path(path).unwrap_or_default();
    tag.set_year(iso.clone());
    tag.set_title("Media from VK");
    tag.set_comment(format!("Original VK upload date: {iso}"));
    tag.set_encoder(TOOL_NAME);
    tag.write_to_path(path)
        .map_err(|e| DomainError::Metadata(e.to_string()))
}

/// Filesystem mtime and atime both set to the capture timestamp.
fn set_file_times(path: &Path, unix_ts: i64) -> Result<(), DomainError> {
    let t = FileTime::from_unix_time(unix_ts, 0);
    filetime::set_file_times(path, t, t).map_err(|e| DomainError::Metadata(e.to_string()))
}
