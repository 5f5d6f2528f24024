use std::path::Path;

use pairviz_image::{concat::hconcat, crop::crop_region, CropRegion, ImageSize};
use pairviz_io::png::{read_image_png_rgba8, write_image_png_rgba8};

use crate::error::CompositeError;

/// The crop applied to every rendered frame before concatenation.
///
/// The window is a `crop_size` square centered in the frame and shifted
/// horizontally by `margin_left - margin_right`, which keeps renderer overlays
/// such as the bounding frame off one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CropGeometry {
    /// Edge length of the square crop in pixels.
    pub crop_size: usize,
    /// Shift of the window to the right, in pixels.
    pub margin_left: usize,
    /// Shift of the window to the left, in pixels.
    pub margin_right: usize,
}

impl Default for CropGeometry {
    fn default() -> Self {
        Self {
            crop_size: 720,
            margin_left: 120,
            margin_right: 120,
        }
    }
}

impl CropGeometry {
    /// Compute the crop rectangle for frames of the given size.
    ///
    /// Example:
    ///
    /// ```
    /// use pairviz_image::{CropRegion, ImageSize};
    /// use pairviz_render::CropGeometry;
    ///
    /// let crop = CropGeometry { crop_size: 480, margin_left: 30, margin_right: 10 };
    /// let region = crop.region(ImageSize { width: 720, height: 720 });
    /// assert_eq!(region, CropRegion { x: 140, y: 120, width: 480, height: 480 });
    /// ```
    pub fn region(&self, frame: ImageSize) -> CropRegion {
        let half = (self.crop_size / 2) as i64;
        let shift = self.margin_left as i64 - self.margin_right as i64;
        CropRegion {
            x: (frame.width / 2) as i64 - half + shift,
            y: (frame.height / 2) as i64 - half,
            width: self.crop_size,
            height: self.crop_size,
        }
    }
}

/// Crop rendered frames identically and concatenate them left to right.
///
/// Frames are read in order and must all share the size of the first one. The
/// composite keeps the alpha channel.
///
/// # Arguments
///
/// * `image_paths` - The rendered frames, in caption order.
/// * `output_path` - Where the composite PNG is written.
/// * `crop` - The crop applied to every frame.
///
/// # Returns
///
/// The size of the composite, `(N * crop_size, crop_size)`.
///
/// # Errors
///
/// Missing frames surface as [`pairviz_io::IoError::FileDoesNotExist`]. Frames
/// of different sizes are a [`CompositeError::SizeMismatch`] and a crop window
/// that leaves the frame is a [`pairviz_image::ImageError::CropOutOfBounds`].
pub fn composite_images<P: AsRef<Path>>(
    image_paths: &[P],
    output_path: impl AsRef<Path>,
    crop: &CropGeometry,
) -> Result<ImageSize, CompositeError> {
    if image_paths.is_empty() {
        return Err(CompositeError::NoImages);
    }

    let images = image_paths
        .iter()
        .map(read_image_png_rgba8)
        .collect::<Result<Vec<_>, _>>()?;

    let expected = images[0].size();
    for (index, image) in images.iter().enumerate() {
        if image.size() != expected {
            return Err(CompositeError::SizeMismatch {
                index,
                expected,
                actual: image.size(),
            });
        }
    }

    let region = crop.region(expected);
    log::debug!("cropping {} frames of {expected} to {region:?}", images.len());

    let cropped = images
        .iter()
        .map(|image| crop_region(image, &region))
        .collect::<Result<Vec<_>, _>>()?;
    let composite = hconcat(&cropped)?;

    let output_path = output_path.as_ref();
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(pairviz_io::IoError::from)?;
        }
    }
    write_image_png_rgba8(output_path, &composite)?;
    log::info!(
        "wrote composite {} ({})",
        output_path.display(),
        composite.size()
    );

    Ok(composite.size())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairviz_image::{Image, ImageError};
    use std::path::PathBuf;

    // frame whose pixel encodes its own coordinates and the frame index
    fn write_frame(
        dir: &Path,
        name: &str,
        size: ImageSize,
        tag: u8,
    ) -> Result<PathBuf, CompositeError> {
        let mut data = Vec::with_capacity(size.width * size.height * 4);
        for y in 0..size.height {
            for x in 0..size.width {
                data.extend_from_slice(&[(x % 251) as u8, (y % 251) as u8, tag, 255]);
            }
        }
        let image = Image::<u8, 4>::new(size, data)?;
        let path = dir.join(name);
        write_image_png_rgba8(&path, &image)?;
        Ok(path)
    }

    #[test]
    fn test_region_centered() {
        let crop = CropGeometry {
            crop_size: 480,
            margin_left: 20,
            margin_right: 20,
        };
        let region = crop.region(ImageSize {
            width: 720,
            height: 720,
        });
        assert_eq!(
            region,
            CropRegion {
                x: 120,
                y: 120,
                width: 480,
                height: 480
            }
        );
    }

    #[test]
    fn test_two_frames_720_crop_480() -> Result<(), CompositeError> {
        let tmp_dir = tempfile::tempdir().map_err(pairviz_io::IoError::from)?;
        let size = ImageSize {
            width: 720,
            height: 720,
        };
        let a = write_frame(tmp_dir.path(), "1.png", size, 1)?;
        let b = write_frame(tmp_dir.path(), "2.png", size, 2)?;
        let out = tmp_dir.path().join("sample.png");

        let crop = CropGeometry {
            crop_size: 480,
            margin_left: 20,
            margin_right: 20,
        };
        let composite_size = composite_images(&[a.clone(), b.clone()], &out, &crop)?;
        assert_eq!(
            composite_size,
            ImageSize {
                width: 960,
                height: 480
            }
        );

        let composite = read_image_png_rgba8(&out)?;
        assert_eq!(composite.size(), composite_size);

        let region = crop.region(size);
        for (i, path) in [a, b].iter().enumerate() {
            let expected = crop_region(&read_image_png_rgba8(path)?, &region)?;
            for y in 0..480 {
                for x in 0..480 {
                    assert_eq!(composite.pixel(i * 480 + x, y), expected.pixel(x, y));
                }
            }
        }

        Ok(())
    }

    #[test]
    fn test_output_is_n_times_crop() -> Result<(), CompositeError> {
        let tmp_dir = tempfile::tempdir().map_err(pairviz_io::IoError::from)?;
        let size = ImageSize {
            width: 64,
            height: 48,
        };
        let paths = (0..5)
            .map(|i| write_frame(tmp_dir.path(), &format!("{i}.png"), size, i as u8))
            .collect::<Result<Vec<_>, _>>()?;
        let crop = CropGeometry {
            crop_size: 40,
            margin_left: 4,
            margin_right: 0,
        };
        let out = tmp_dir.path().join("nested").join("out.png");
        let composite_size = composite_images(&paths, &out, &crop)?;
        assert_eq!(
            composite_size,
            ImageSize {
                width: 200,
                height: 40
            }
        );

        let composite = read_image_png_rgba8(&out)?;
        // block i carries the tag of frame i
        for i in 0..5 {
            let px = composite.pixel(i * 40 + 3, 7).map(|p| p[2]);
            assert_eq!(px, Some(i as u8));
        }
        // the window starts at x = 32 - 20 + 4 = 16
        assert_eq!(composite.pixel(0, 0).map(|p| p[0]), Some(16));
        Ok(())
    }

    #[test]
    fn test_size_mismatch() -> Result<(), CompositeError> {
        let tmp_dir = tempfile::tempdir().map_err(pairviz_io::IoError::from)?;
        let a = write_frame(
            tmp_dir.path(),
            "a.png",
            ImageSize {
                width: 32,
                height: 32,
            },
            0,
        )?;
        let b = write_frame(
            tmp_dir.path(),
            "b.png",
            ImageSize {
                width: 32,
                height: 30,
            },
            1,
        )?;
        let crop = CropGeometry {
            crop_size: 16,
            margin_left: 0,
            margin_right: 0,
        };
        let res = composite_images(&[a, b], tmp_dir.path().join("out.png"), &crop);
        assert!(matches!(
            res,
            Err(CompositeError::SizeMismatch { index: 1, .. })
        ));
        Ok(())
    }

    #[test]
    fn test_missing_frame() -> Result<(), CompositeError> {
        let tmp_dir = tempfile::tempdir().map_err(pairviz_io::IoError::from)?;
        let missing = tmp_dir.path().join("missing.png");
        let res = composite_images(
            &[missing],
            tmp_dir.path().join("out.png"),
            &CropGeometry::default(),
        );
        assert!(matches!(
            res,
            Err(CompositeError::Io(pairviz_io::IoError::FileDoesNotExist(_)))
        ));
        Ok(())
    }

    #[test]
    fn test_crop_larger_than_frame() -> Result<(), CompositeError> {
        let tmp_dir = tempfile::tempdir().map_err(pairviz_io::IoError::from)?;
        let a = write_frame(
            tmp_dir.path(),
            "a.png",
            ImageSize {
                width: 32,
                height: 32,
            },
            0,
        )?;
        let res = composite_images(&[a], tmp_dir.path().join("out.png"), &CropGeometry::default());
        assert!(matches!(
            res,
            Err(CompositeError::Image(ImageError::CropOutOfBounds { .. }))
        ));
        Ok(())
    }

    #[test]
    fn test_no_images() {
        let paths: Vec<PathBuf> = Vec::new();
        assert!(matches!(
            composite_images(&paths, "out.png", &CropGeometry::default()),
            Err(CompositeError::NoImages)
        ));
    }
}
