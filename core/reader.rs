use byte_unit::{Byte, UnitType};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Read a file's bytes, capping at `max_bytes` when set.
///
/// Total function: a missing path or I/O failure yields a placeholder
/// message encoded as bytes instead of an error. When the file is larger
/// than the cap, exactly `max_bytes` content bytes are returned followed by
/// a truncation notice.
pub fn read_bytes(path: &Path, max_bytes: Option<u64>) -> Vec<u8> {
    if !path.exists() {
        return format!("[file not found: {}]", path.display()).into_bytes();
    }
    match read_capped(path, max_bytes) {
        Ok(data) => data,
        Err(e) => {
            log::debug!("Read failed for {}: {}", path.display(), e);
            format!("[error reading {}: {}]", path.display(), e).into_bytes()
        }
    }
}

fn read_capped(path: &Path, max_bytes: Option<u64>) -> std::io::Result<Vec<u8>> {
    let size = path.metadata()?.len();
    let mut file = File::open(path)?;
    if let Some(limit) = max_bytes
        && size > limit
    {
        let mut data = Vec::with_capacity(limit as usize);
        file.take(limit).read_to_end(&mut data)?;
        let readable = Byte::from_u64(limit).get_appropriate_unit(UnitType::Binary);
        let notice = format!("\n[... excerpt; file larger than {readable:.2}, truncated ...]\n");
        data.extend_from_slice(notice.as_bytes());
        return Ok(data);
    }
    let mut data = Vec::with_capacity(size as usize);
    file.read_to_end(&mut data)?;
    Ok(data)
}

/// Decode bytes to text through an ordered chain of attempts: UTF-8 with
/// BOM stripping, strict UTF-8, Latin-1, Windows-1252, ending in a lossy
/// UTF-8 decode that cannot fail. Stricter decoders run first so files in
/// legacy single-byte encodings are recovered faithfully.
pub fn decode_text(bytes: &[u8]) -> String {
    decode_utf8_bom(bytes)
        .or_else(|| decode_utf8(bytes))
        .or_else(|| decode_latin1(bytes))
        .or_else(|| decode_windows_1252(bytes))
        .unwrap_or_else(|| String::from_utf8_lossy(bytes).into_owned())
}

/// `read_bytes` + `decode_text` in one step.
pub fn read_text(path: &Path, max_bytes: Option<u64>) -> String {
    decode_text(&read_bytes(path, max_bytes))
}

fn decode_utf8_bom(bytes: &[u8]) -> Option<String> {
    let body = bytes.strip_prefix(&UTF8_BOM)?;
    std::str::from_utf8(body).ok().map(str::to_owned)
}

fn decode_utf8(bytes: &[u8]) -> Option<String> {
    std::str::from_utf8(bytes).ok().map(str::to_owned)
}

fn decode_latin1(bytes: &[u8]) -> Option<String> {
    Some(encoding_rs::mem::decode_latin1(bytes).into_owned())
}

fn decode_windows_1252(bytes: &[u8]) -> Option<String> {
    encoding_rs::WINDOWS_1252
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|cow| cow.into_owned())
}
