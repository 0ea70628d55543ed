//! PNG encoding for grayscale image slices.
//!
//! Supports the two output encodings of a rendered stack:
//! - **8-bit grayscale (color type 0, depth 8)** for raw quantized output.
//! - **16-bit grayscale (color type 0, depth 16)** for auto-contrast output.
//!   Samples are written big-endian as PNG requires.

use std::io::Write;

use storm_common::{StormError, StormResult};

/// PNG file signature.
const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// PNG color type for grayscale without alpha.
const COLOR_TYPE_GRAY: u8 = 0;

/// Encode a row-major 8-bit grayscale image.
pub fn encode_gray8(pixels: &[u8], width: usize, height: usize) -> StormResult<Vec<u8>> {
    check_len(pixels.len(), width, height)?;
    encode(pixels, width, height, 8)
}

/// Encode a row-major 16-bit grayscale image.
pub fn encode_gray16(pixels: &[u16], width: usize, height: usize) -> StormResult<Vec<u8>> {
    check_len(pixels.len(), width, height)?;
    let bytes: Vec<u8> = pixels.iter().flat_map(|v| v.to_be_bytes()).collect();
    encode(&bytes, width, height, 16)
}

fn check_len(len: usize, width: usize, height: usize) -> StormResult<()> {
    if width == 0 || height == 0 {
        return Err(StormError::EncodeError(format!(
            "empty image {}x{}",
            width, height
        )));
    }
    if len != width * height {
        return Err(StormError::EncodeError(format!(
            "expected {} pixels for {}x{}, got {}",
            width * height,
            width,
            height,
            len
        )));
    }
    Ok(())
}

fn encode(samples: &[u8], width: usize, height: usize, bit_depth: u8) -> StormResult<Vec<u8>> {
    let mut png = Vec::new();

    png.extend_from_slice(&SIGNATURE);

    // IHDR chunk
    let mut ihdr_data = Vec::with_capacity(13);
    ihdr_data.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr_data.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr_data.push(bit_depth);
    ihdr_data.push(COLOR_TYPE_GRAY);
    ihdr_data.push(0); // compression method
    ihdr_data.push(0); // filter method
    ihdr_data.push(0); // interlace method
    write_chunk(&mut png, b"IHDR", &ihdr_data);

    let row_bytes = width * (bit_depth as usize / 8);
    let idat_data = deflate_idat(samples, row_bytes, height)
        .map_err(|e| StormError::EncodeError(format!("IDAT compression failed: {}", e)))?;
    write_chunk(&mut png, b"IDAT", &idat_data);

    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Write a PNG chunk
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Deflate scanlines, each prefixed with filter type 0 (none).
fn deflate_idat(samples: &[u8], row_bytes: usize, height: usize) -> std::io::Result<Vec<u8>> {
    let mut uncompressed = Vec::with_capacity(height * (1 + row_bytes));
    for row in samples.chunks_exact(row_bytes) {
        uncompressed.push(0);
        uncompressed.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder.write_all(&uncompressed)?;
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    /// Split a PNG into (type, data) chunks, checking every CRC.
    fn chunks(png: &[u8]) -> Vec<([u8; 4], Vec<u8>)> {
        assert_eq!(&png[..8], &SIGNATURE);
        let mut out = Vec::new();
        let mut pos = 8;
        while pos < png.len() {
            let len = u32::from_be_bytes(png[pos..pos + 4].try_into().unwrap()) as usize;
            let kind: [u8; 4] = png[pos + 4..pos + 8].try_into().unwrap();
            let data = png[pos + 8..pos + 8 + len].to_vec();
            let crc = u32::from_be_bytes(png[pos + 8 + len..pos + 12 + len].try_into().unwrap());
            assert_eq!(crc, crc32fast::hash(&[&kind[..], &data[..]].concat()));
            out.push((kind, data));
            pos += 12 + len;
        }
        out
    }

    fn inflate(data: &[u8]) -> Vec<u8> {
        let mut decoder = flate2::read::ZlibDecoder::new(data);
        let mut out = Vec::new();
        decoder.read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn test_gray8_layout() {
        let png = encode_gray8(&[0, 64, 128, 255, 1, 2], 3, 2).unwrap();
        let chunks = chunks(&png);
        assert_eq!(&chunks[0].0, b"IHDR");
        assert_eq!(&chunks[0].1[..8], &[0, 0, 0, 3, 0, 0, 0, 2]);
        assert_eq!(chunks[0].1[8], 8);
        assert_eq!(chunks[0].1[9], COLOR_TYPE_GRAY);
        assert_eq!(&chunks.last().unwrap().0, b"IEND");

        let raw = inflate(&chunks[1].1);
        assert_eq!(raw, vec![0, 0, 64, 128, 0, 255, 1, 2]);
    }

    #[test]
    fn test_gray16_is_big_endian() {
        let png = encode_gray16(&[0x0102, 0xFFFF], 2, 1).unwrap();
        let chunks = chunks(&png);
        assert_eq!(chunks[0].1[8], 16);
        let raw = inflate(&chunks[1].1);
        assert_eq!(raw, vec![0, 0x01, 0x02, 0xFF, 0xFF]);
    }

    #[test]
    fn test_size_mismatch_rejected() {
        assert!(encode_gray8(&[1, 2, 3], 2, 2).is_err());
        assert!(encode_gray16(&[], 0, 0).is_err());
    }
}
