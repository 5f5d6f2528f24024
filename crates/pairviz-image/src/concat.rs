use crate::{Image, ImageError, ImageSize};

/// Concatenate images side by side, left to right.
///
/// The output width is the sum of the input widths and its height is the common
/// input height. Images are copied without gaps, overlap or scaling.
///
/// # Errors
///
/// Returns [`ImageError::Empty`] for an empty input and
/// [`ImageError::HeightMismatch`] if the heights differ.
///
/// # Examples
///
/// ```rust
/// use pairviz_image::{Image, ImageSize};
/// use pairviz_image::concat::hconcat;
///
/// let a = Image::<u8, 1>::new(ImageSize { width: 1, height: 2 }, vec![1, 2]).unwrap();
/// let b = Image::<u8, 1>::new(ImageSize { width: 2, height: 2 }, vec![3, 4, 5, 6]).unwrap();
///
/// let out = hconcat(&[a, b]).unwrap();
/// assert_eq!(out.as_slice(), &[1, 3, 4, 2, 5, 6]);
/// ```
pub fn hconcat<T, const C: usize>(images: &[Image<T, C>]) -> Result<Image<T, C>, ImageError>
where
    T: Copy + Default,
{
    let first = images.first().ok_or(ImageError::Empty)?;
    let height = first.height();

    for (index, image) in images.iter().enumerate() {
        if image.height() != height {
            return Err(ImageError::HeightMismatch {
                index,
                expected: height,
                actual: image.height(),
            });
        }
    }

    let width = images.iter().map(|image| image.width()).sum();
    let mut output = Image::from_size_val(ImageSize { width, height }, T::default())?;
    let out_stride = width * C;

    let mut offset = 0;
    for image in images {
        let row_len = image.width() * C;
        if row_len == 0 {
            continue;
        }
        for (y, src_row) in image.as_slice().chunks_exact(row_len).enumerate() {
            let start = y * out_stride + offset;
            output.as_slice_mut()[start..start + row_len].copy_from_slice(src_row);
        }
        offset += row_len;
    }

    Ok(output)
}
