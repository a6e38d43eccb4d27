//! Texture data structures in CPU-friendly format before GPU upload.

/// Decoded image rows, top-down, tightly packed.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

/// Supported texel layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureFormat {
    Rgb8,
    Rgba8,
}

impl TextureFormat {
    pub fn bytes_per_pixel(self) -> u32 {
        match self {
            TextureFormat::Rgb8 => 3,
            TextureFormat::Rgba8 => 4,
        }
    }
}

impl TextureData {
    /// Wrap RGB8 rows as produced by the PPM loader.
    pub fn new_rgb8(width: u32, height: u32, data: Vec<u8>) -> Self {
        assert_eq!(
            data.len(),
            (width * height * 3) as usize,
            "data size doesn't match RGB8 dimensions"
        );
        Self {
            data,
            width,
            height,
            format: TextureFormat::Rgb8,
        }
    }

    pub fn new_rgba8(width: u32, height: u32, data: Vec<u8>) -> Self {
        assert_eq!(
            data.len(),
            (width * height * 4) as usize,
            "data size doesn't match RGBA8 dimensions"
        );
        Self {
            data,
            width,
            height,
            format: TextureFormat::Rgba8,
        }
    }

    /// Convert to RGBA8 for upload; RGB8 gains an opaque alpha.
    pub fn into_rgba8(self) -> Self {
        match self.format {
            TextureFormat::Rgba8 => self,
            TextureFormat::Rgb8 => {
                let mut data = Vec::with_capacity((self.width * self.height * 4) as usize);
                for rgb in self.data.chunks_exact(3) {
                    data.extend_from_slice(rgb);
                    data.push(255);
                }
                Self::new_rgba8(self.width, self.height, data)
            }
        }
    }

    /// Placeholder checkerboard, used when a scene texture fails to
    /// load and the caller chooses to carry on.
    pub fn checkerboard(size: u32) -> Self {
        let mut data = Vec::with_capacity((size * size * 3) as usize);
        for y in 0..size {
            for x in 0..size {
                if ((x / 4) + (y / 4)) % 2 == 0 {
                    data.extend_from_slice(&[220, 220, 220]);
                } else {
                    data.extend_from_slice(&[96, 96, 96]);
                }
            }
        }
        Self::new_rgb8(size, size, data)
    }

    /// Check that the byte count matches dimensions and format.
    pub fn is_valid(&self) -> bool {
        let expected = (self.width * self.height * self.format.bytes_per_pixel()) as usize;
        self.data.len() == expected && self.width > 0 && self.height > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_to_rgba_inserts_opaque_alpha() {
        let rgb = TextureData::new_rgb8(2, 1, vec![1, 2, 3, 4, 5, 6]);
        let rgba = rgb.into_rgba8();
        assert_eq!(rgba.format, TextureFormat::Rgba8);
        assert_eq!(rgba.data, vec![1, 2, 3, 255, 4, 5, 6, 255]);
        assert!(rgba.is_valid());
    }

    #[test]
    fn checkerboard_is_valid() {
        let tex = TextureData::checkerboard(16);
        assert!(tex.is_valid());
        assert_eq!(tex.width, 16);
        assert_eq!(tex.format, TextureFormat::Rgb8);
    }
}
