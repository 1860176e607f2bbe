//! Payload container decompression (membody container, RZ format)

use std::io::Read;

use byteorder::{BigEndian, ByteOrder};
use flate2::read::ZlibDecoder;
use log::{debug, info, warn};

use super::error::{FormatError, Result};
use super::models::DecodedBlob;

/// Leading signature of a membody container.
pub const MAGIC: &[u8] = b"RZ";

/// How far past the declared-size field to scan for the stream signature.
const SCAN_WINDOW: usize = 100;

/// The two canonical zlib stream headers.
const ZLIB_DEFAULT: [u8; 2] = [0x78, 0x9C];
const ZLIB_BEST: [u8; 2] = [0x78, 0xDA];

/// Decompress a membody container into its raw byte stream.
///
/// Container layout:
/// - 2 bytes: ASCII magic `RZ`
/// - 4 bytes: declared decompressed size (big-endian)
/// - unknown header bytes, then a zlib stream running to the end of the
///   buffer
///
/// The stream start is discovered by a bounded signature scan, never
/// computed from the header. The declared size is informational only: on a
/// mismatch the result carries `size_mismatch = true` and the actual
/// inflated bytes win, since the declared field is unreliable across packer
/// tools.
pub fn decompress(data: &[u8]) -> Result<DecodedBlob> {
    info!("Decompressing membody container ({} bytes)", data.len());

    if data.len() < MAGIC.len() + 4 || &data[..MAGIC.len()] != MAGIC {
        return Err(FormatError::BadMagic {
            container: "membody",
            expected: MAGIC,
            found: data.get(..MAGIC.len()).unwrap_or(data).to_vec(),
        });
    }
    let declared_size = BigEndian::read_u32(&data[2..6]);
    let payload = &data[6..];

    let stream_start =
        find_stream_start(payload).ok_or(FormatError::StreamNotFound { window: SCAN_WINDOW })?;
    debug!(
        "Deflate stream found at container offset {} ({} bytes past the size field)",
        6 + stream_start,
        stream_start
    );

    let mut decoder = ZlibDecoder::new(&payload[stream_start..]);
    let mut decompressed = Vec::with_capacity(declared_size as usize);
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| FormatError::InflateError(e.to_string()))?;

    let size_mismatch = decompressed.len() as u64 != u64::from(declared_size);
    if size_mismatch {
        warn!(
            "membody declared {} decompressed bytes but produced {}; keeping actual bytes",
            declared_size,
            decompressed.len()
        );
    }
    info!(
        "membody decompressed: {} -> {} bytes",
        payload.len() - stream_start,
        decompressed.len()
    );

    Ok(DecodedBlob {
        data: decompressed,
        declared_size,
        size_mismatch,
    })
}

/// Locate a zlib stream header within the bounded scan window.
///
/// Returns the signature's offset relative to `payload`, or `None` when no
/// signature occurs within the window. Absence is always explicit; the
/// caller must not fall through to treating the payload as starting at the
/// buffer head.
pub fn find_stream_start(payload: &[u8]) -> Option<usize> {
    let window = payload.len().min(SCAN_WINDOW);
    payload[..window]
        .windows(2)
        .position(|pair| pair == ZLIB_DEFAULT || pair == ZLIB_BEST)
}
