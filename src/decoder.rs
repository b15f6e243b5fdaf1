use std::{collections::HashMap, marker::PhantomData};

use log::{debug, warn};

use crate::{
    chunks::{
        ihdr::IHDRChunk,
        iter_chunks, parse_signature,
        text::{EXTRA_BYTES_KEY, FILE_NAME_KEY},
        Chunk,
    },
    error::{CodecError, Result},
    image_data::{decompress_data, MAX_INFLATE_RATIO},
    scanlines::{side_from_scanlines, strip_scanlines},
};

/// Payload recovered from a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub payload: Vec<u8>,
    /// Name stored alongside the payload, if the encoder was given one.
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Reject chunks whose stored CRC doesn't match their contents.
    pub verify_checksums: bool,
}
impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            verify_checksums: true,
        }
    }
}

/// Recovers the payload from a container, verifying chunk checksums.
pub fn decode(bytes: &[u8]) -> Result<Decoded> {
    decode_with(bytes, &DecoderConfig::default())
}

pub fn decode_with(bytes: &[u8], config: &DecoderConfig) -> Result<Decoded> {
    PNGDecoder::new(bytes)?.read_chunks(config)?.into_decoded()
}

pub(crate) struct PNGDecoder<'a, State> {
    state: State,
    _marker: PhantomData<&'a [u8]>,
}

pub(crate) struct Start<'a> {
    input: &'a [u8],
}

/// Everything the chunk walk gathered, not yet interpreted.
#[derive(Default)]
pub(crate) struct Collected<'a> {
    header: Option<IHDRChunk>,
    texts: HashMap<&'a [u8], &'a [u8]>,
    image_data: Vec<u8>,
    idat_count: usize,
}

impl<'a> PNGDecoder<'a, Start<'a>> {
    pub(crate) fn new(data: &'a [u8]) -> Result<Self> {
        parse_signature(data).map_err(|_| CodecError::InvalidSignature)?;
        Ok(Self {
            state: Start { input: data },
            _marker: PhantomData,
        })
    }

    pub(crate) fn read_chunks(
        self,
        config: &DecoderConfig,
    ) -> Result<PNGDecoder<'a, Collected<'a>>> {
        let mut collected = Collected::default();
        for raw in iter_chunks(self.state.input, config.verify_checksums) {
            match Chunk::from_raw(raw?)? {
                Chunk::IHDR(header) => collected.header = Some(header),
                Chunk::tEXT(text) => {
                    collected.texts.insert(text.keyword, text.text);
                }
                Chunk::IDAT(idat) => {
                    collected.image_data.extend(idat.data);
                    collected.idat_count += 1;
                }
                Chunk::IEND => (),
                Chunk::Unknown(raw) => warn!("Skipping unknown {} chunk", raw.type_name()),
            }
        }
        debug!(
            "{} compressed bytes from {} IDAT chunks, {} text entries",
            collected.image_data.len(),
            collected.idat_count,
            collected.texts.len()
        );
        Ok(PNGDecoder {
            state: collected,
            _marker: PhantomData,
        })
    }
}

impl<'a> PNGDecoder<'a, Collected<'a>> {
    pub(crate) fn into_decoded(self) -> Result<Decoded> {
        let Collected {
            header,
            texts,
            image_data,
            ..
        } = self.state;

        // Cap inflation at the header's raster size, or at the deflate ratio
        // bound without a header. Exact length is checked when stripping rows.
        let limit = match &header {
            Some(header) => {
                header.validate()?;
                header
                    .scanline_size()
                    .checked_mul(header.height as usize)
                    .ok_or_else(|| {
                        CodecError::Format(format!("{header:?} is too large to decode"))
                    })?
            }
            None => image_data.len().saturating_mul(MAX_INFLATE_RATIO),
        };
        let scanlines = decompress_data(&image_data, limit.saturating_add(1))?;
        let extra_bytes = texts
            .get(EXTRA_BYTES_KEY)
            .ok_or(CodecError::MissingMetadata("xtra"))
            .and_then(|value| read_extra_bytes(value))?;

        let header = match header {
            Some(header) => header,
            None => {
                let side = side_from_scanlines(scanlines.len()).ok_or_else(|| {
                    CodecError::Format(format!(
                        "{} bytes of image data don't form a square image",
                        scanlines.len()
                    ))
                })?;
                debug!("No IHDR chunk, inferred a {side}x{side} image");
                IHDRChunk::square(side)
            }
        };

        let mut payload = strip_scanlines(&scanlines, &header)?;
        if extra_bytes > payload.len() {
            return Err(CodecError::Format(format!(
                "{extra_bytes} bytes of padding in a {} byte image",
                payload.len()
            )));
        }
        payload.truncate(payload.len() - extra_bytes);

        let file_name = texts
            .get(FILE_NAME_KEY)
            .map(|name| String::from_utf8_lossy(name).into_owned());
        Ok(Decoded { payload, file_name })
    }
}

pub(crate) fn read_extra_bytes(value: &[u8]) -> Result<usize> {
    let bytes = <[u8; 4]>::try_from(value).map_err(|_| {
        CodecError::Format(format!(
            "padding length should be 4 bytes, found {}",
            value.len()
        ))
    })?;
    Ok(u32::from_be_bytes(bytes) as usize)
}
