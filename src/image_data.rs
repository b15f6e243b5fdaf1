use miniz_oxide::{
    deflate::compress_to_vec_zlib,
    inflate::{decompress_to_vec_zlib_with_limit, TINFLStatus},
};

use crate::{
    chunks::ihdr::IHDRChunk,
    error::{CodecError, Result},
    scanlines::to_scanlines,
};

/// Upper bound on how far deflate can expand data, used to cap inflation
/// when no header says how large the image is.
pub(crate) const MAX_INFLATE_RATIO: usize = 1032;

pub(crate) fn compress_data(data: &[u8], header: &IHDRChunk, level: u8) -> Vec<u8> {
    compress_to_vec_zlib(&to_scanlines(data, header), level)
}

/// Inflates image data, giving up once more than `limit` bytes come out.
pub(crate) fn decompress_data(compressed_data: &[u8], limit: usize) -> Result<Vec<u8>> {
    decompress_to_vec_zlib_with_limit(compressed_data, limit).map_err(|e| match e.status {
        TINFLStatus::HasMoreOutput => {
            CodecError::Format(format!("image data inflates past {limit} bytes"))
        }
        _ => CodecError::Decompression(e.to_string()),
    })
}
