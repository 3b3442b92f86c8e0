// Copyright 2024-Present the Tempo Engine developers.
// SPDX-License-Identifier: Apache-2.0

use crate::slice::ByteSlice;
use std::mem::ManuallyDrop;

/// A decoded image handed across the ABI.
///
/// The pixel buffer is owned by this library's allocator and must be released
/// through [`tempo_img_free`], never a general-purpose deallocator.
#[repr(C)]
#[derive(Debug)]
pub struct DecodedImage {
    /// Tightly packed rows, 8 bits per channel. Null when decoding failed.
    pub pixels: *mut u8,
    /// Raw parts of the backing allocation; opaque to callers.
    len: usize,
    capacity: usize,
    pub width: u32,
    pub height: u32,
    pub channels: u32,
}

impl DecodedImage {
    const fn empty() -> Self {
        Self {
            pixels: std::ptr::null_mut(),
            len: 0,
            capacity: 0,
            width: 0,
            height: 0,
            channels: 0,
        }
    }

    fn from_decoded(decoded: tempo_image::DecodedImage) -> Self {
        let mut pixels = ManuallyDrop::new(decoded.pixels);
        Self {
            pixels: pixels.as_mut_ptr(),
            len: pixels.len(),
            capacity: pixels.capacity(),
            width: decoded.width,
            height: decoded.height,
            channels: decoded.channels,
        }
    }
}

#[no_mangle]
#[must_use]
/// Decodes an encoded image (any format the codec library recognizes) into
/// pixel data. `desired_channels == 0` keeps the image's native channel
/// count; 1-4 force Luma/LumaA/Rgb/Rgba.
///
/// Malformed input yields an image with a null `pixels` pointer; there is
/// nothing to free in that case.
///
/// # Safety
/// `encoded` must uphold the requirements of [`ByteSlice`].
pub unsafe extern "C" fn tempo_img_decode(
    encoded: ByteSlice,
    desired_channels: u32,
) -> DecodedImage {
    match tempo_image::decode(encoded.as_slice(), desired_channels) {
        Ok(decoded) => DecodedImage::from_decoded(decoded),
        Err(e) => {
            log::error!("image decode failed: {e}");
            DecodedImage::empty()
        }
    }
}

#[no_mangle]
/// Releases the pixel buffer of a decoded image. Null-tolerant on both the
/// argument and the buffer; an empty image is left behind so an accidental
/// second free is harmless.
///
/// # Safety
/// Only pass null or a valid reference to an image produced by
/// [`tempo_img_decode`].
pub unsafe extern "C" fn tempo_img_free(image: Option<&mut DecodedImage>) {
    if let Some(image) = image {
        if image.pixels.is_null() {
            return;
        }
        // Safety: the raw parts can only come from `from_decoded`.
        drop(Vec::from_raw_parts(image.pixels, image.len, image.capacity));
        *image = DecodedImage::empty();
    }
}
