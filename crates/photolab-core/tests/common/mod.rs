use std::io::Write;

use tempfile::NamedTempFile;

pub const FITS_BLOCK_SIZE: usize = 2880;
pub const FITS_CARD_SIZE: usize = 80;

/// Format one 80-character header card. String values must arrive already
/// quoted (e.g. `"'RGGB'"`).
pub fn card(key: &str, value: &str) -> Vec<u8> {
    let text = format!("{key:<8}= {value:<70}");
    assert_eq!(text.len(), FITS_CARD_SIZE);
    text.into_bytes()
}

/// Assemble a header from cards, append END and pad to a full block.
pub fn build_header(cards: &[(&str, String)]) -> Vec<u8> {
    let mut buf = Vec::new();
    for (key, value) in cards {
        buf.extend_from_slice(&card(key, value));
    }
    buf.extend_from_slice(format!("{:<80}", "END").as_bytes());
    while buf.len() % FITS_BLOCK_SIZE != 0 {
        buf.push(b' ');
    }
    buf
}

fn pad_data(buf: &mut Vec<u8>) {
    while buf.len() % FITS_BLOCK_SIZE != 0 {
        buf.push(0);
    }
}

/// Build a 2-D Bayer mosaic FITS file with BITPIX 16 and the unsigned
/// integer convention (BZERO 32768).
pub fn build_mosaic_fits(width: usize, height: usize, bayer: &str, pixels: &[u16]) -> Vec<u8> {
    assert_eq!(pixels.len(), width * height);
    let cards = [
        ("SIMPLE", "T".to_string()),
        ("BITPIX", "16".to_string()),
        ("NAXIS", "2".to_string()),
        ("NAXIS1", width.to_string()),
        ("NAXIS2", height.to_string()),
        ("BSCALE", "1".to_string()),
        ("BZERO", "32768".to_string()),
        ("BAYER", format!("'{bayer}'")),
        ("EXPTIME", "2.5".to_string()),
        ("CAMERA", "'SYNTH-CAM'".to_string()),
    ];
    let mut buf = build_header(&cards);
    for &value in pixels {
        let raw = (value as i32 - 32768) as i16;
        buf.extend_from_slice(&raw.to_be_bytes());
    }
    pad_data(&mut buf);
    buf
}

/// Build a 3-D FITS cube of already demultiplexed planes, BITPIX -32.
/// `planes` holds each plane's pixels in R, Gr, Gb, B order.
pub fn build_cube_fits(width: usize, height: usize, planes: &[Vec<f32>]) -> Vec<u8> {
    for plane in planes {
        assert_eq!(plane.len(), width * height);
    }
    let cards = [
        ("SIMPLE", "T".to_string()),
        ("BITPIX", "-32".to_string()),
        ("NAXIS", "3".to_string()),
        ("NAXIS1", width.to_string()),
        ("NAXIS2", height.to_string()),
        ("NAXIS3", planes.len().to_string()),
    ];
    let mut buf = build_header(&cards);
    for plane in planes {
        for &value in plane {
            buf.extend_from_slice(&value.to_be_bytes());
        }
    }
    pad_data(&mut buf);
    buf
}

/// Write the bytes to a temp file carrying a FITS extension.
pub fn write_fits(data: &[u8]) -> NamedTempFile {
    let mut tmpfile = tempfile::Builder::new()
        .suffix(".fit")
        .tempfile()
        .unwrap();
    tmpfile.write_all(data).unwrap();
    tmpfile.flush().unwrap();
    tmpfile
}

/// An 8x8 RGGB mosaic with constant values per channel:
/// R=1000, Gr=2000, Gb=3000, B=4000.
pub fn constant_rggb_mosaic() -> Vec<u8> {
    let (width, height) = (8, 8);
    let mut pixels = vec![0u16; width * height];
    for y in 0..height {
        for x in 0..width {
            pixels[y * width + x] = match (y % 2, x % 2) {
                (0, 0) => 1000,
                (0, 1) => 2000,
                (1, 0) => 3000,
                _ => 4000,
            };
        }
    }
    build_mosaic_fits(width, height, "RGGB", &pixels)
}
