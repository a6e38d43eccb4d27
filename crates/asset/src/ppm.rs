//! ASCII PPM (`P3`) image loader for the scene textures.
//!
//! The format is line-oriented text: a `P3` magic token, optional `#`
//! comment lines, `width height maxValue`, then `width * height` RGB
//! integer triples. Channels are rescaled to 0..255 when `maxValue`
//! differs from 255, and rows are flipped vertically: texture
//! coordinates in the scene treat v=0 as the bottom of the image.

use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::texture::TextureData;

/// Errors surfaced by the PPM loader. Callers may recover (e.g. by
/// substituting a placeholder texture); nothing here aborts.
#[derive(Debug, Error)]
pub enum PpmError {
    #[error("failed to open image file {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read image source: {0}")]
    Read(#[from] io::Error),
    #[error("not a P3 PPM image (header begins with {found:?})")]
    Magic { found: String },
    #[error("malformed {what} in PPM header")]
    Header { what: &'static str },
    #[error("PPM pixel data ended early: expected {expected} samples, found {found}")]
    Truncated { expected: usize, found: usize },
}

/// Load a `P3` PPM image from a file path.
pub fn load_ppm_from_path(path: impl AsRef<Path>) -> Result<TextureData, PpmError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| PpmError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let image = parse_ppm(&text)?;
    log::info!(
        "loaded PPM texture {} ({}x{})",
        path.display(),
        image.width,
        image.height
    );
    Ok(image)
}

/// Load a `P3` PPM image from any reader.
pub fn load_ppm_from_reader<R: Read>(mut reader: R) -> Result<TextureData, PpmError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_ppm(&text)
}

/// Parse a `P3` PPM image from a string.
pub fn load_ppm_from_str(text: &str) -> Result<TextureData, PpmError> {
    parse_ppm(text)
}

fn parse_ppm(text: &str) -> Result<TextureData, PpmError> {
    // Everything after '#' on a line is a comment; the rest of the
    // format is plain whitespace-separated tokens.
    let mut tokens = text.lines().flat_map(|line| {
        let line = match line.find('#') {
            Some(at) => &line[..at],
            None => line,
        };
        line.split_whitespace()
    });

    let magic = tokens.next().unwrap_or("");
    if magic != "P3" {
        return Err(PpmError::Magic {
            found: magic.to_owned(),
        });
    }

    let width = parse_dimension(tokens.next(), "width")?;
    let height = parse_dimension(tokens.next(), "height")?;
    let max_value: u32 = tokens
        .next()
        .and_then(|t| t.parse().ok())
        .filter(|&m| m > 0)
        .ok_or(PpmError::Header { what: "max value" })?;

    let expected = (width * height * 3) as usize;
    let mut samples = Vec::with_capacity(expected);
    for (found, token) in tokens.take(expected).enumerate() {
        let value: u32 = token.parse().map_err(|_| PpmError::Truncated {
            expected,
            found,
        })?;
        samples.push(rescale(value, max_value));
    }
    if samples.len() < expected {
        return Err(PpmError::Truncated {
            expected,
            found: samples.len(),
        });
    }

    // PPM rows run top to bottom; the scene's texture coordinates put
    // v=0 at the image bottom, so store the rows reversed.
    let row_bytes = (width * 3) as usize;
    let mut data = Vec::with_capacity(expected);
    for row in (0..height as usize).rev() {
        let start = row * row_bytes;
        data.extend_from_slice(&samples[start..start + row_bytes]);
    }

    Ok(TextureData::new_rgb8(width, height, data))
}

fn parse_dimension(token: Option<&str>, what: &'static str) -> Result<u32, PpmError> {
    token
        .and_then(|t| t.parse::<u32>().ok())
        .filter(|&d| d > 0)
        .ok_or(PpmError::Header { what })
}

/// Scale a channel sample to 0..255 for arbitrary `maxValue` headers.
fn rescale(value: u32, max_value: u32) -> u8 {
    if max_value == 255 {
        value.min(255) as u8
    } else {
        ((value * 255 + max_value / 2) / max_value).min(255) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::TextureFormat;

    #[test]
    fn parses_minimal_image() {
        let src = "P3\n2 2 255\n255 0 0  0 255 0\n0 0 255  255 255 255\n";
        let image = load_ppm_from_str(src).expect("parse");
        assert_eq!(image.width, 2);
        assert_eq!(image.height, 2);
        assert_eq!(image.format, TextureFormat::Rgb8);
        // Rows flipped: the file's second row comes out on top.
        assert_eq!(&image.data[0..6], &[0, 0, 255, 255, 255, 255]);
        assert_eq!(&image.data[6..12], &[255, 0, 0, 0, 255, 0]);
    }

    #[test]
    fn comments_are_ignored() {
        let src = "P3\n# made by hand\n# another note\n1 1 255\n1 2 3\n";
        let image = load_ppm_from_str(src).expect("parse");
        assert_eq!(image.data, vec![1, 2, 3]);
    }

    #[test]
    fn max_value_rescales_channels() {
        let src = "P3\n1 1 15\n15 0 7\n";
        let image = load_ppm_from_str(src).expect("parse");
        assert_eq!(image.data[0], 255);
        assert_eq!(image.data[1], 0);
        assert_eq!(image.data[2], 119);
    }

    #[test]
    fn wrong_magic_is_distinguishable() {
        let err = load_ppm_from_str("P6\n1 1 255\n0 0 0\n").unwrap_err();
        match err {
            PpmError::Magic { found } => assert_eq!(found, "P6"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn truncated_pixels_are_reported() {
        let err = load_ppm_from_str("P3\n2 1 255\n0 0 0 255\n").unwrap_err();
        assert!(matches!(
            err,
            PpmError::Truncated {
                expected: 6,
                found: 4,
            }
        ));
    }

    #[test]
    fn bad_dimension_is_a_header_error() {
        let err = load_ppm_from_str("P3\n0 1 255\n").unwrap_err();
        assert!(matches!(err, PpmError::Header { what: "width" }));
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let err = load_ppm_from_path("no/such/texture.ppm").unwrap_err();
        assert!(matches!(err, PpmError::Open { .. }));
    }
}
