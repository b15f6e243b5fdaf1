use log::warn;

use crate::{
    chunks::{
        ihdr::IHDRChunk,
        iter_chunks, parse_signature,
        text::{EXTRA_BYTES_KEY, FILE_NAME_KEY},
        Chunk,
    },
    decoder::read_extra_bytes,
    error::{CodecError, Result},
};

/// One chunk as found in a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSummary {
    pub chunk_type: String,
    /// Byte offset of the chunk's length field.
    pub offset: usize,
    /// Length of the chunk's data.
    pub length: usize,
    pub crc_valid: bool,
    /// Keyword of a text chunk.
    pub keyword: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerSummary {
    pub chunks: Vec<ChunkSummary>,
    pub side: Option<u32>,
    pub extra_bytes: Option<usize>,
    pub file_name: Option<String>,
}
impl ContainerSummary {
    pub fn idat_count(&self) -> usize {
        self.chunks
            .iter()
            .filter(|chunk| chunk.chunk_type == "IDAT")
            .count()
    }
}

/// Lists the chunks of a container without decompressing anything.
///
/// Checksums and a malformed `xtra` value are reported rather than enforced,
/// but a container that ends before `IEND` is still an error.
pub fn inspect(bytes: &[u8]) -> Result<ContainerSummary> {
    parse_signature(bytes).map_err(|_| CodecError::InvalidSignature)?;
    let mut summary = ContainerSummary::default();
    let mut chunks = iter_chunks(bytes, false);
    loop {
        let offset = chunks.offset();
        let Some(raw) = chunks.next() else {
            break;
        };
        let raw = raw?;
        let mut keyword = None;
        match Chunk::from_raw(raw)? {
            Chunk::IHDR(IHDRChunk { width, .. }) => summary.side = Some(width),
            Chunk::tEXT(text) => {
                if text.keyword == EXTRA_BYTES_KEY {
                    summary.extra_bytes = read_extra_bytes(text.text)
                        .map_err(|e| warn!("{e}"))
                        .ok();
                } else if text.keyword == FILE_NAME_KEY {
                    summary.file_name = Some(String::from_utf8_lossy(text.text).into_owned());
                }
                keyword = Some(String::from_utf8_lossy(text.keyword).into_owned());
            }
            _ => (),
        }
        summary.chunks.push(ChunkSummary {
            chunk_type: raw.type_name(),
            offset,
            length: raw.data.len(),
            crc_valid: raw.crc == raw.computed_crc(),
            keyword,
        });
    }
    Ok(summary)
}
