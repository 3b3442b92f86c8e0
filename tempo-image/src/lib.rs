// Copyright 2024-Present the Tempo Engine developers.
// SPDX-License-Identifier: Apache-2.0

//! Image decoding for the engine's texture loader.
//!
//! A two-function pass-through to the codec crate with no format logic of its
//! own: decode bytes into an 8-bit-per-channel pixel buffer, hand the buffer
//! out, and let the paired free on the FFI side release it. Pixel data is
//! always owned by this library's allocator.

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("image decoding failed: {0}")]
    Codec(#[from] image::ImageError),
    #[error("unsupported channel count {0} (expected 0 for native, or 1-4)")]
    UnsupportedChannelCount(u32),
}

/// A decoded image: tightly packed rows, 8 bits per channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub channels: u32,
}

/// Decodes `encoded` into pixel data.
///
/// `desired_channels == 0` keeps the image's native channel count; 1-4 force
/// Luma/LumaA/Rgb/Rgba. Sixteen-bit sources are narrowed to 8 bits per
/// channel. Malformed input is an error, never undefined behavior.
pub fn decode(encoded: &[u8], desired_channels: u32) -> Result<DecodedImage, DecodeError> {
    let decoded = image::load_from_memory(encoded)?;
    let channels = match desired_channels {
        0 => u32::from(decoded.color().channel_count()),
        n @ 1..=4 => n,
        n => return Err(DecodeError::UnsupportedChannelCount(n)),
    };

    let width = decoded.width();
    let height = decoded.height();
    let pixels = match channels {
        1 => decoded.into_luma8().into_raw(),
        2 => decoded.into_luma_alpha8().into_raw(),
        3 => decoded.into_rgb8().into_raw(),
        _ => decoded.into_rgba8().into_raw(),
    };

    Ok(DecodedImage {
        pixels,
        width,
        height,
        channels,
    })
}
