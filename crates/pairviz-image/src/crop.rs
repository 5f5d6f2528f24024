use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

use crate::{Image, ImageError, ImageSize};

/// A rectangular region of an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropRegion {
    /// The x-coordinate of the top-left corner, possibly negative before validation.
    pub x: i64,
    /// The y-coordinate of the top-left corner, possibly negative before validation.
    pub y: i64,
    /// Width of the region in pixels.
    pub width: usize,
    /// Height of the region in pixels.
    pub height: usize,
}

impl CropRegion {
    /// Size of the region.
    pub fn size(&self) -> ImageSize {
        ImageSize {
            width: self.width,
            height: self.height,
        }
    }

    /// Check that the region lies inside an image of the given size.
    ///
    /// # Returns
    ///
    /// The top-left corner as unsigned coordinates.
    pub fn validate(&self, image: ImageSize) -> Result<(usize, usize), ImageError> {
        let fits = self.x >= 0
            && self.y >= 0
            && self.x as usize + self.width <= image.width
            && self.y as usize + self.height <= image.height;
        if !fits {
            return Err(ImageError::CropOutOfBounds {
                x: self.x,
                y: self.y,
                width: self.width,
                height: self.height,
                image,
            });
        }
        Ok((self.x as usize, self.y as usize))
    }
}

/// Crop an image to a specified region.
///
/// The size of the region is taken from `dst`.
///
/// # Arguments
///
/// * `src` - The source image to crop.
/// * `dst` - The destination image to store the cropped image.
/// * `x` - The x-coordinate of the top-left corner of the region to crop.
/// * `y` - The y-coordinate of the top-left corner of the region to crop.
///
/// # Errors
///
/// Returns [`ImageError::CropOutOfBounds`] if the region exceeds the source image.
///
/// # Examples
///
/// ```rust
/// use pairviz_image::{Image, ImageSize};
/// use pairviz_image::crop::crop_image;
///
/// let image = Image::<_, 1>::new(ImageSize { width: 4, height: 4 }, vec![
///     0u8, 1, 2, 3,
///     4u8, 5, 6, 7,
///     8u8, 9, 10, 11,
///     12u8, 13, 14, 15
/// ]).unwrap();
///
/// let mut cropped = Image::<_, 1>::from_size_val(ImageSize { width: 2, height: 2 }, 0u8).unwrap();
///
/// crop_image(&image, &mut cropped, 1, 1).unwrap();
///
/// assert_eq!(cropped.as_slice(), &[5u8, 6, 9, 10]);
/// ```
pub fn crop_image<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    x: usize,
    y: usize,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    let region = CropRegion {
        x: x as i64,
        y: y as i64,
        width: dst.cols(),
        height: dst.rows(),
    };
    region.validate(src.size())?;

    let dst_cols = dst.cols();
    if dst_cols == 0 {
        return Ok(());
    }
    let src_cols = src.cols();
    let src_data = src.as_slice();

    dst.as_slice_mut()
        .par_chunks_exact_mut(dst_cols * C)
        .enumerate()
        .for_each(|(i, dst_row)| {
            // get the slice at the top left corner
            let offset = (y + i) * src_cols * C + x * C;
            let src_slice = &src_data[offset..offset + dst_cols * C];

            // copy the slice to the destination
            dst_row.copy_from_slice(src_slice);
        });

    Ok(())
}

/// Crop an image to a region, allocating the destination.
pub fn crop_region<T, const C: usize>(
    src: &Image<T, C>,
    region: &CropRegion,
) -> Result<Image<T, C>, ImageError>
where
    T: Copy + Default + Send + Sync,
{
    let (x, y) = region.validate(src.size())?;
    let mut dst = Image::from_size_val(region.size(), T::default())?;
    crop_image(src, &mut dst, x, y)?;
    Ok(dst)
}
