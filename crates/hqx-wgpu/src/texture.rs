//! Image decoding and GPU texture upload
//!
//! Loads 8-bit RGBA images into single-mip 2D textures. Filters reason in
//! source-pixel space, so textures carry exactly one mip level and are meant
//! to be sampled with nearest filtering — automatic mip generation would blur
//! the lookup data the filters depend on.

use std::path::Path;

use crate::error::HqxError;

/// A GPU-resident 2D texture together with its pixel dimensions.
///
/// Used for both the source picture being displayed and the per-filter
/// lookup textures. The caller owns the texture; it lives until dropped.
#[derive(Debug)]
pub struct LoadedTexture {
    /// The uploaded texture, `Rgba8Unorm`, one mip level
    pub texture: wgpu::Texture,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Decodes an image file into 8-bit RGBA pixel data.
///
/// Fails with [`HqxError::Decode`] if the file is missing, unreadable, or
/// malformed; the decoder's diagnostic is attached.
pub fn decode_rgba8(path: &Path) -> Result<image::RgbaImage, HqxError> {
    let image = image::open(path).map_err(|source| HqxError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.to_rgba8())
}

/// Decodes an image file and uploads it to a new GPU texture.
///
/// # Arguments
/// * `device` - The wgpu device for texture creation
/// * `queue` - Command queue used for the pixel upload
/// * `path` - Path to the image file
/// * `label` - Debug label for the texture
///
/// # Returns
/// The uploaded texture with its dimensions; the caller takes ownership.
pub fn load_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    path: &Path,
    label: &str,
) -> Result<LoadedTexture, HqxError> {
    let image = decode_rgba8(path)?;
    let (width, height) = image.dimensions();

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        image.as_raw(),
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(width * 4),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );

    Ok(LoadedTexture { texture, width, height })
}

/// Creates the nearest-neighbor sampler shared by every filter program.
///
/// Clamp-to-edge addressing avoids artifacts when the filters sample at the
/// image boundary.
pub fn create_nearest_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("Nearest sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Nearest,
        min_filter: wgpu::FilterMode::Nearest,
        mipmap_filter: wgpu::FilterMode::Nearest,
        lod_min_clamp: 0.0,
        lod_max_clamp: 0.0,
        compare: None,
        anisotropy_clamp: 1,
        border_color: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_png_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("hqx-wgpu-test-{}-{name}.png", std::process::id()))
    }

    #[test]
    fn test_decode_roundtrip() {
        let path = temp_png_path("roundtrip");
        let mut image = image::RgbaImage::new(4, 4);
        image.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        image.put_pixel(3, 3, image::Rgba([0, 255, 0, 128]));
        image.save(&path).unwrap();

        let decoded = decode_rgba8(&path).unwrap();
        assert_eq!(decoded.dimensions(), (4, 4));
        assert_eq!(decoded.get_pixel(0, 0), &image::Rgba([255, 0, 0, 255]));
        assert_eq!(decoded.get_pixel(3, 3), &image::Rgba([0, 255, 0, 128]));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_file_is_decode_error() {
        let path = temp_png_path("does-not-exist");
        let err = decode_rgba8(&path).unwrap_err();
        match err {
            HqxError::Decode { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("expected Decode, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_file_is_decode_error() {
        let path = temp_png_path("malformed");
        std::fs::write(&path, b"definitely not a png").unwrap();

        assert!(matches!(decode_rgba8(&path), Err(HqxError::Decode { .. })));

        std::fs::remove_file(&path).ok();
    }
}
