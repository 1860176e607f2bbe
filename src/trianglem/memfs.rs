//! Index catalog parsing (memfs container, RSON format)

use byteorder::{ByteOrder, LittleEndian};
use encoding_rs::UTF_16LE;
use log::{debug, info, trace};

use super::error::{FormatError, Result};
use super::models::FileEntry;

/// Leading signature of a memfs index container.
pub const MAGIC: &[u8] = b"RSON";

/// Header size: magic + version word + reserved words.
const HEADER_LEN: usize = 16;

/// Fixed-size portion of one catalog record, ahead of the path text.
const ENTRY_FIXED_LEN: usize = 14;

/// Parse a memfs index container into its ordered catalog of entries.
///
/// Container layout:
/// - 4 bytes: ASCII magic `RSON`
/// - 4 bytes: format version (little-endian)
/// - 8 bytes: reserved
/// - Entry records until the end of the buffer:
///   - 4 bytes: metadata offset (little-endian)
///   - 4 bytes: type tag (two UTF-16LE code units, e.g. `01`)
///   - 4 bytes: extension tag (two UTF-16LE code units, e.g. `.t`)
///   - 2 bytes: path prefix (little-endian, semantics unconfirmed)
///   - N bytes: path text (UTF-16LE), terminated by a 2-byte NUL
///
/// The engine stores short metadata values as character pairs, not
/// integers: the tag fields must be decoded as UTF-16LE text. No entry is
/// dropped or reordered.
pub fn parse(data: &[u8]) -> Result<Vec<FileEntry>> {
    info!("Parsing memfs index ({} bytes)", data.len());

    if data.len() < HEADER_LEN || &data[..MAGIC.len()] != MAGIC {
        return Err(FormatError::BadMagic {
            container: "memfs",
            expected: MAGIC,
            found: data.get(..MAGIC.len()).unwrap_or(data).to_vec(),
        });
    }
    let version = LittleEndian::read_u32(&data[4..8]);
    debug!("memfs header ok: version={}", version);

    let mut entries = Vec::new();
    let mut reader = &data[HEADER_LEN..];

    while !reader.is_empty() {
        let offset = data.len() - reader.len();
        entries.push(parse_entry(&mut reader, offset)?);
    }

    info!("memfs catalog parsed: {} entries", entries.len());
    Ok(entries)
}

/// Parse one catalog record and advance the reader past it.
///
/// `offset` is the record's position in the whole container, reported on
/// truncation.
fn parse_entry(reader: &mut &[u8], offset: usize) -> Result<FileEntry> {
    if reader.len() < ENTRY_FIXED_LEN {
        return Err(FormatError::TruncatedEntry { offset });
    }

    let metadata_offset = LittleEndian::read_u32(&reader[0..4]);
    let type_tag = decode_char_pair(&reader[4..8]);
    let extension_tag = decode_char_pair(&reader[8..12]);
    let path_prefix = LittleEndian::read_u16(&reader[12..14]);
    *reader = &reader[ENTRY_FIXED_LEN..];

    let path = read_utf16_string(reader, offset)?;

    trace!(
        "entry at {}: path={:?}, type={:?}, ext={:?}",
        offset,
        path,
        type_tag,
        extension_tag
    );

    Ok(FileEntry {
        path,
        metadata_offset,
        type_tag,
        extension_tag,
        path_prefix,
    })
}

/// Decode a 4-byte field as two UTF-16LE code units.
fn decode_char_pair(bytes: &[u8]) -> String {
    let (decoded, _, _) = UTF_16LE.decode(bytes);
    decoded.into_owned()
}

/// Read a 2-byte-NUL-terminated UTF-16LE string and advance the reader past
/// the text and its terminator.
fn read_utf16_string(reader: &mut &[u8], offset: usize) -> Result<String> {
    let end = reader
        .chunks_exact(2)
        .position(|chunk| chunk == [0, 0])
        .map(|chunk_index| chunk_index * 2)
        .ok_or(FormatError::TruncatedEntry { offset })?;

    let (decoded, _, _) = UTF_16LE.decode(&reader[..end]);
    *reader = &reader[end + 2..];

    Ok(decoded.into_owned())
}
