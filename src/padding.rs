use rand::Rng;

use crate::{
    error::{CodecError, Result},
    utils::{ceil_sqrt, div_ceil},
};

/// Bytes per RGB pixel.
pub(crate) const PIXEL_BYTES: usize = 3;

/// Size of the square raster chosen for a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaddingPlan {
    /// Width and height of the raster, in pixels.
    pub side: u32,
    /// Random bytes appended so the payload fills the raster exactly.
    pub extra_bytes: usize,
}
impl PaddingPlan {
    /// Payload bytes the raster holds, `3 * side^2`.
    pub fn capacity(&self) -> usize {
        raster_capacity(self.side as usize)
    }
}

pub(crate) fn raster_capacity(side: usize) -> usize {
    PIXEL_BYTES * side * side
}

/// Picks the smallest square raster holding `payload_len` bytes.
///
/// An empty payload still gets a 1x1 raster, filled entirely with padding.
pub fn plan(payload_len: usize) -> Result<PaddingPlan> {
    let pixels = div_ceil(payload_len, PIXEL_BYTES);
    let side = ceil_sqrt(pixels).max(1);
    let capacity = side
        .checked_mul(side)
        .and_then(|area| area.checked_mul(PIXEL_BYTES))
        .filter(|_| side <= u32::MAX as usize)
        .ok_or_else(|| {
            CodecError::Format(format!("{payload_len} bytes don't fit in a single image"))
        })?;
    Ok(PaddingPlan {
        side: side as u32,
        extra_bytes: capacity - payload_len,
    })
}

/// What the filler bytes look like. Their content is discarded on decode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PaddingStyle {
    /// Random ASCII letters.
    #[default]
    Letters,
    /// Random bytes over the full range.
    Random,
}

pub fn generate_padding(n: usize, style: PaddingStyle) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    match style {
        PaddingStyle::Letters => (0..n)
            .map(|_| {
                let letter = rng.gen_range(b'A'..=b'Z');
                if rng.gen() {
                    letter.to_ascii_lowercase()
                } else {
                    letter
                }
            })
            .collect(),
        PaddingStyle::Random => {
            let mut bytes = vec![0; n];
            rng.fill(&mut bytes[..]);
            bytes
        }
    }
}
