use anyhow::{Context, Result};
use bytes::Bytes;
use std::io::Write;
use zipdrop_core::constants::default_entry_name;

/// A downloaded file waiting to be written into the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedEntry {
    pub name: String,
    pub data: Bytes,
}

/// Sanitize a declared name into a relative archive path.
///
/// Directory components are kept so `kitchen/photo.jpg` and `bedroom/photo.jpg` stay
/// distinct. Segments that could escape the extraction root are dropped: `..`, `.`,
/// empty segments (leading `/`, doubled separators) and a leading drive prefix. Both `/`
/// and `\` separate segments; the result always uses `/`.
pub fn sanitize_archive_filename(filename: &str, fallback: &str) -> String {
    let segments: Vec<&str> = filename
        .trim()
        .split(['/', '\\'])
        .enumerate()
        .filter(|(index, segment)| !(*index == 0 && is_drive_prefix(segment)))
        .map(|(_, segment)| segment.trim())
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .collect();

    if segments.is_empty() {
        fallback.to_string()
    } else {
        segments.join("/")
    }
}

fn is_drive_prefix(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Entry name for the file at 1-based `position`: the declared name when usable,
/// otherwise `file_<position>.jpg`.
pub fn entry_name(declared: Option<&str>, position: usize) -> String {
    let fallback = default_entry_name(position);
    match declared {
        Some(name) => sanitize_archive_filename(name, &fallback),
        None => fallback,
    }
}

/// Serialize staged entries into a deflate-compressed ZIP. Entry names must be unique.
pub fn write_zip(entries: &[StagedEntry]) -> Result<Vec<u8>> {
    use zip::write::{FileOptions, ZipWriter};
    use zip::CompressionMethod;

    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(std::io::Cursor::new(&mut buffer));
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);

        for entry in entries {
            zip.start_file(entry.name.as_str(), options)
                .with_context(|| format!("Failed to add file to ZIP: {}", entry.name))?;
            zip.write_all(&entry.data)
                .with_context(|| format!("Failed to write file data to ZIP: {}", entry.name))?;
        }

        zip.finish().context("Failed to finalize ZIP archive")?;
    }

    Ok(buffer)
}
