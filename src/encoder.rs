use log::debug;

use crate::{
    chunks::{
        idat::IDATChunk,
        iend,
        ihdr::IHDRChunk,
        text::{TextChunk, EXTRA_BYTES_KEY, FILE_NAME_KEY, SOFTWARE_KEY},
        ParseableChunk, SIGNATURE,
    },
    error::{CodecError, Result},
    image_data::compress_data,
    padding::{generate_padding, plan, PaddingStyle},
};

/// Largest `IDAT` payload written by default.
pub const DEFAULT_IDAT_CAPACITY: usize = 16_000;

/// Knobs for [`encode_with`]. The defaults match [`encode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Maximum number of compressed bytes per `IDAT` chunk.
    pub idat_capacity: usize,
    /// zlib level, 0 to 10.
    pub compression_level: u8,
    /// Producer tag stored in a `Software` text chunk, if any.
    pub software: Option<String>,
    pub padding: PaddingStyle,
}
impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            idat_capacity: DEFAULT_IDAT_CAPACITY,
            compression_level: 9,
            software: Some(env!("CARGO_PKG_NAME").to_owned()),
            padding: PaddingStyle::default(),
        }
    }
}
impl EncoderConfig {
    pub fn with_idat_capacity(mut self, idat_capacity: usize) -> Self {
        self.idat_capacity = idat_capacity;
        self
    }

    pub fn with_compression_level(mut self, compression_level: u8) -> Self {
        self.compression_level = compression_level;
        self
    }

    pub fn with_software(mut self, software: Option<String>) -> Self {
        self.software = software;
        self
    }

    pub fn with_padding(mut self, padding: PaddingStyle) -> Self {
        self.padding = padding;
        self
    }
}

/// Wraps `payload` in a PNG container with the default settings.
pub fn encode(payload: &[u8], file_name: Option<&str>) -> Result<Vec<u8>> {
    encode_with(payload, file_name, &EncoderConfig::default())
}

/// Wraps `payload` in a PNG container.
///
/// The payload is padded to fill a square 8-bit RGB raster, the padding length
/// is recorded in an `xtra` text chunk, and the compressed scanlines are split
/// across as many `IDAT` chunks as `config.idat_capacity` requires.
pub fn encode_with(
    payload: &[u8],
    file_name: Option<&str>,
    config: &EncoderConfig,
) -> Result<Vec<u8>> {
    let plan = plan(payload.len())?;
    debug!(
        "{} payload bytes in a {side}x{side} image, {} bytes of padding",
        payload.len(),
        plan.extra_bytes,
        side = plan.side,
    );

    let mut raster = Vec::with_capacity(plan.capacity());
    raster.extend(payload);
    raster.extend(generate_padding(plan.extra_bytes, config.padding));

    let header = IHDRChunk::square(plan.side);
    let extra_bytes = u32::try_from(plan.extra_bytes)
        .map_err(|_| CodecError::Format(format!("{} bytes of padding", plan.extra_bytes)))?
        .to_be_bytes();
    let mut texts = vec![TextChunk {
        keyword: EXTRA_BYTES_KEY,
        text: &extra_bytes,
    }];
    if let Some(software) = &config.software {
        texts.push(TextChunk {
            keyword: SOFTWARE_KEY,
            text: software.as_bytes(),
        });
    }
    if let Some(file_name) = file_name {
        texts.push(TextChunk {
            keyword: FILE_NAME_KEY,
            text: file_name.as_bytes(),
        });
    }

    let compressed = compress_data(&raster, &header, config.compression_level.min(10));
    let idats = compressed
        .chunks(config.idat_capacity.max(1))
        .map(|data| IDATChunk { data }.to_bytes())
        .collect::<Result<Vec<_>>>()?;
    debug!(
        "{} compressed bytes across {} IDAT chunks",
        compressed.len(),
        idats.len()
    );

    let mut bytes = SIGNATURE.to_vec();
    bytes.extend(header.to_bytes()?);
    for text in &texts {
        bytes.extend(text.to_bytes()?);
    }
    for idat in &idats {
        bytes.extend(idat);
    }
    bytes.extend(iend::write_end());
    Ok(bytes)
}
