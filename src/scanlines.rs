use crate::{
    chunks::ihdr::IHDRChunk,
    error::{CodecError, Result},
    padding::PIXEL_BYTES,
    utils::{ceil_sqrt, div_ceil},
};

/// Filter type byte that leads every scanline. No other filter is written.
pub(crate) const FILTER_NONE: u8 = 0;

/// Splits raster bytes into rows and prefixes each with its filter type.
pub(crate) fn to_scanlines(data: &[u8], header: &IHDRChunk) -> Vec<u8> {
    let row_width = header.scanline_size() - 1;
    let mut scanlines = Vec::with_capacity(header.height as usize * header.scanline_size());
    for row in data.chunks(row_width) {
        scanlines.push(FILTER_NONE);
        scanlines.extend(row);
    }
    scanlines
}

/// Removes exactly one filter byte from the start of every row.
pub(crate) fn strip_scanlines(data: &[u8], header: &IHDRChunk) -> Result<Vec<u8>> {
    let stride = header.scanline_size();
    let height = header.height as usize;
    if stride.checked_mul(height) != Some(data.len()) {
        return Err(CodecError::Format(format!(
            "expected {height} scanlines of {stride} bytes, got {} bytes",
            data.len()
        )));
    }
    let mut raster = Vec::with_capacity(data.len() - height);
    for (index, row) in data.chunks_exact(stride).enumerate() {
        if let Some((&filter, pixels)) = row.split_first() {
            if filter != FILTER_NONE {
                return Err(CodecError::Format(format!(
                    "unsupported filter type {filter} on scanline {index}"
                )));
            }
            raster.extend(pixels);
        }
    }
    Ok(raster)
}

/// Recovers the side of a square RGB raster from its filtered length,
/// `side * (1 + 3 * side)`.
pub(crate) fn side_from_scanlines(len: usize) -> Option<u32> {
    let guess = ceil_sqrt(div_ceil(len, PIXEL_BYTES));
    [guess.saturating_sub(1), guess]
        .into_iter()
        .filter(|&side| side > 0)
        .find(|&side| {
            side.checked_mul(PIXEL_BYTES)
                .and_then(|row| row.checked_add(1))
                .and_then(|stride| stride.checked_mul(side))
                == Some(len)
        })
        .and_then(|side| u32::try_from(side).ok())
}
