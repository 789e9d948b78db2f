//! Binary pixel sources.
//!
//! Every source thresholds an 8-bit luminance sample to `{0, 1}`: any nonzero
//! sample is foreground. `BinaryView` borrows a strided buffer without copying,
//! `BinaryImage` owns a contiguous one. Both validate their geometry on
//! construction so that `get` never leaves the buffer for in-range `(x, y)`.

use crate::util::{HuError, HuResult};

#[cfg(feature = "image-io")]
pub mod io;

/// Read access to a thresholded 2-D mask.
///
/// Callers only ask for `x < width()` and `y < height()`.
pub trait PixelSource {
    /// Returns the mask width in pixels.
    fn width(&self) -> usize;

    /// Returns the mask height in pixels.
    fn height(&self) -> usize;

    /// Returns 1 for a foreground pixel and 0 for background.
    fn get(&self, x: usize, y: usize) -> u8;
}

impl<S: PixelSource + ?Sized> PixelSource for &S {
    fn width(&self) -> usize {
        (**self).width()
    }

    fn height(&self) -> usize {
        (**self).height()
    }

    fn get(&self, x: usize, y: usize) -> u8 {
        (**self).get(x, y)
    }
}

#[inline]
fn threshold(sample: u8) -> u8 {
    u8::from(sample != 0)
}

/// Borrowed binary view into a grayscale buffer with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct BinaryView<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> BinaryView<'a> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [u8], width: usize, height: usize) -> HuResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(data: &'a [u8], width: usize, height: usize, stride: usize) -> HuResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(HuError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the raw (unthresholded) row `y`, or `None` when out of range.
    pub fn row(&self, y: usize) -> Option<&'a [u8]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }

    /// Returns the number of foreground pixels.
    pub fn foreground_count(&self) -> usize {
        (0..self.height)
            .filter_map(|y| self.row(y))
            .map(|row| row.iter().filter(|&&v| v != 0).count())
            .sum()
    }
}

impl PixelSource for BinaryView<'_> {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn get(&self, x: usize, y: usize) -> u8 {
        threshold(self.data[y * self.stride + x])
    }
}

/// Owned binary image in contiguous row-major layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl BinaryImage {
    /// Creates an image from a contiguous grayscale buffer.
    ///
    /// Samples are stored as given and thresholded on access. Trailing
    /// samples past `width * height` are dropped.
    pub fn new(mut data: Vec<u8>, width: usize, height: usize) -> HuResult<Self> {
        let needed = required_len(width, height, width)?;
        if data.len() < needed {
            return Err(HuError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        data.truncate(needed);
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Builds an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> HuResult<Self>
    where
        F: FnMut(usize, usize) -> bool,
    {
        let mut data = Vec::with_capacity(width.saturating_mul(height));
        for y in 0..height {
            for x in 0..width {
                data.push(threshold(u8::from(f(x, y))));
            }
        }
        Self::new(data, width, height)
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> BinaryView<'_> {
        BinaryView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }

    /// Returns the raw samples.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl PixelSource for BinaryImage {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn get(&self, x: usize, y: usize) -> u8 {
        threshold(self.data[y * self.width + x])
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> HuResult<usize> {
    if width == 0 || height == 0 {
        return Err(HuError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(HuError::InvalidStride { width, stride });
    }
    (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(HuError::InvalidDimensions { width, height })
}
