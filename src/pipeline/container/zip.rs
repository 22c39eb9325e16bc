//! Minimal ZIP entry extraction by local-file-header scanning.
//!
//! Office containers (.xlsx, .docx) are ZIP archives; the pipeline only
//! ever needs one named entry from each, so instead of a full archive
//! library this walks local file headers linearly and inflates the one
//! matching payload. All length fields are validated against the
//! remaining buffer before use — a corrupt header stops the scan cleanly
//! rather than reading out of bounds.

use std::io::Read;

use flate2::read::DeflateDecoder;

use super::ContainerError;

/// `PK\x03\x04` — local file header signature.
const LOCAL_HEADER_SIG: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Fixed part of a local file header, signature included.
const LOCAL_HEADER_LEN: usize = 30;

const METHOD_STORED: u16 = 0;
const METHOD_DEFLATE: u16 = 8;

fn read_u16_le(bytes: &[u8], at: usize) -> Option<u16> {
    let b = bytes.get(at..at + 2)?;
    Some(u16::from_le_bytes([b[0], b[1]]))
}

fn read_u32_le(bytes: &[u8], at: usize) -> Option<u32> {
    let b = bytes.get(at..at + 4)?;
    Some(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

/// Extract one named entry from ZIP-structured container bytes.
///
/// `target` matches the stored filename exactly or as a suffix (so
/// `"document.xml"` finds `"word/document.xml"`). Returns the entry's
/// decompressed UTF-8 text, or `EntryNotFound` when the path never
/// appears before the end of the buffer.
pub fn extract_entry(bytes: &[u8], target: &str) -> Result<String, ContainerError> {
    let mut pos = 0usize;

    while pos + LOCAL_HEADER_LEN <= bytes.len() {
        if bytes[pos..pos + 4] != LOCAL_HEADER_SIG {
            pos += 1;
            continue;
        }

        // Header fields at fixed little-endian offsets from the signature.
        let method = read_u16_le(bytes, pos + 8);
        let compressed_size = read_u32_le(bytes, pos + 18).map(|v| v as usize);
        let uncompressed_size = read_u32_le(bytes, pos + 22).map(|v| v as usize);
        let name_len = read_u16_le(bytes, pos + 26).map(|v| v as usize);
        let extra_len = read_u16_le(bytes, pos + 28).map(|v| v as usize);

        let (method, compressed_size, uncompressed_size, name_len, extra_len) =
            match (method, compressed_size, uncompressed_size, name_len, extra_len) {
                (Some(m), Some(c), Some(u), Some(n), Some(e)) => (m, c, u, n, e),
                _ => break, // header runs past end of buffer
            };

        let name_start = pos + LOCAL_HEADER_LEN;
        let Some(name_bytes) = bytes.get(name_start..name_start + name_len) else {
            break;
        };
        let name = String::from_utf8_lossy(name_bytes);

        let data_start = name_start + name_len + extra_len;
        if data_start > bytes.len() {
            break;
        }

        if name == target || name.ends_with(target) {
            let data_end = data_start
                .checked_add(compressed_size)
                .filter(|&end| end <= bytes.len())
                .ok_or(ContainerError::Truncated(data_start))?;
            let data = &bytes[data_start..data_end];

            let raw = match method {
                METHOD_STORED => data.to_vec(),
                METHOD_DEFLATE => inflate_raw(data, uncompressed_size)?,
                other => return Err(ContainerError::UnsupportedCompression(other)),
            };
            return String::from_utf8(raw).map_err(|_| ContainerError::Encoding);
        }

        // Skip this entry's data and keep scanning. Entries written with a
        // data descriptor declare a zero size; fall back to resuming the
        // signature scan just past this header.
        pos = if compressed_size > 0 {
            match data_start.checked_add(compressed_size) {
                Some(next) if next <= bytes.len() => next,
                _ => break,
            }
        } else {
            data_start
        };
    }

    Err(ContainerError::EntryNotFound(target.to_string()))
}

/// Inflate a raw DEFLATE payload to roughly the declared uncompressed size.
fn inflate_raw(data: &[u8], declared_size: usize) -> Result<Vec<u8>, ContainerError> {
    let mut out = Vec::with_capacity(declared_size.min(16 * 1024 * 1024));
    DeflateDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(|e| ContainerError::Inflate(e.to_string()))?;
    if declared_size > 0 && out.len() != declared_size {
        tracing::warn!(
            declared = declared_size,
            actual = out.len(),
            "inflated entry size differs from header"
        );
    }
    Ok(out)
}
