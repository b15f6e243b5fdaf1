use log::trace;
use nom::{
    bytes::complete::{tag, take},
    combinator::map_res,
    number::complete::be_u32,
    sequence::tuple,
    IResult,
};

use crate::{
    crc::chunk_checksum,
    error::{CodecError, Result},
};

pub(crate) mod idat;
pub(crate) mod iend;
pub(crate) mod ihdr;
pub(crate) mod text;

pub(crate) const SIGNATURE: &[u8; 8] = b"\x89PNG\x0d\x0a\x1a\x0a";

/// Length, type and checksum fields around every chunk's data.
pub(crate) const CHUNK_OVERHEAD: usize = 12;

#[allow(non_camel_case_types, clippy::upper_case_acronyms)]
#[derive(Debug)]
pub(crate) enum Chunk<'a> {
    IHDR(ihdr::IHDRChunk),
    tEXT(text::TextChunk<'a>),
    IDAT(idat::IDATChunk<'a>),
    IEND,
    Unknown(RawChunk<'a>),
}
impl<'a> Chunk<'a> {
    pub(crate) fn from_raw(raw: RawChunk<'a>) -> Result<Self> {
        let malformed = |_| CodecError::Format(format!("unreadable {} chunk", raw.type_name()));
        match raw.chunk_type {
            ihdr::HEADER => Ok(Chunk::IHDR(
                ihdr::IHDRChunk::from_bytes(raw.data).map_err(malformed)?.1,
            )),
            text::HEADER | text::STANDARD_HEADER => Ok(Chunk::tEXT(
                text::TextChunk::from_bytes(raw.data).map_err(malformed)?.1,
            )),
            idat::HEADER => Ok(Chunk::IDAT(
                idat::IDATChunk::from_bytes(raw.data).map_err(malformed)?.1,
            )),
            iend::HEADER => Ok(Chunk::IEND),
            _ => Ok(Chunk::Unknown(raw)),
        }
    }
}

/// One framed chunk as it sits in the stream, before its data is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawChunk<'a> {
    pub(crate) chunk_type: &'a [u8; 4],
    pub(crate) data: &'a [u8],
    pub(crate) crc: u32,
}
impl RawChunk<'_> {
    pub(crate) fn computed_crc(&self) -> u32 {
        chunk_checksum(self.chunk_type, self.data)
    }

    pub(crate) fn type_name(&self) -> String {
        String::from_utf8_lossy(self.chunk_type).into_owned()
    }

    pub(crate) fn verify(&self) -> Result<()> {
        let found = self.computed_crc();
        if found != self.crc {
            return Err(CodecError::ChecksumMismatch {
                chunk_type: self.type_name(),
                expected: self.crc,
                found,
            });
        }
        Ok(())
    }
}

/// Frames `data` as `length | type | data | crc(type | data)`.
pub(crate) fn frame(chunk_type: &[u8; 4], data: &[u8]) -> Result<Vec<u8>> {
    let len = u32::try_from(data.len()).map_err(|_| {
        CodecError::Format(format!(
            "{} bytes don't fit in a single chunk",
            data.len()
        ))
    })?;
    let mut bytes = Vec::with_capacity(data.len() + CHUNK_OVERHEAD);
    bytes.extend(len.to_be_bytes());
    bytes.extend(chunk_type);
    bytes.extend(data);
    bytes.extend(chunk_checksum(chunk_type, data).to_be_bytes());
    Ok(bytes)
}

pub(crate) fn parse_signature(input: &[u8]) -> IResult<&[u8], &[u8]> {
    tag(SIGNATURE)(input)
}

/// Reads the chunk starting at `offset`, returning it with the offset of the
/// chunk that follows. The checksum field is read but not checked.
pub(crate) fn parse_next(stream: &[u8], offset: usize) -> Result<(RawChunk<'_>, usize)> {
    let input = stream.get(offset..).unwrap_or_default();
    match raw_chunk(input) {
        Ok((rest, chunk)) => Ok((chunk, stream.len() - rest.len())),
        Err(_) => Err(CodecError::TruncatedInput {
            offset,
            needed: declared_size(input),
            available: input.len(),
        }),
    }
}

fn raw_chunk(input: &[u8]) -> IResult<&[u8], RawChunk<'_>> {
    let (input, (length, chunk_type)) = tuple((
        be_u32,
        map_res(take(4usize), |v: &[u8]| <&[u8; 4]>::try_from(v)),
    ))(input)?;
    let (input, (data, crc)) = tuple((take(length), be_u32))(input)?;
    Ok((
        input,
        RawChunk {
            chunk_type,
            data,
            crc,
        },
    ))
}

fn declared_size(input: &[u8]) -> usize {
    match be_u32::<_, nom::error::Error<&[u8]>>(input) {
        Ok((_, length)) => length as usize + CHUNK_OVERHEAD,
        Err(_) => CHUNK_OVERHEAD,
    }
}

/// Walks the chunks of a container that starts with the signature, ending
/// after `IEND`. Running out of input before `IEND` is reported as truncation.
pub(crate) fn iter_chunks(source: &[u8], verify_checksums: bool) -> ChunkIter {
    ChunkIter {
        source,
        offset: SIGNATURE.len(),
        verify_checksums,
        finished: false,
    }
}

pub(crate) struct ChunkIter<'a> {
    source: &'a [u8],
    offset: usize,
    verify_checksums: bool,
    finished: bool,
}

impl<'a> ChunkIter<'a> {
    pub(crate) fn offset(&self) -> usize {
        self.offset
    }
}

impl<'a> Iterator for ChunkIter<'a> {
    type Item = Result<RawChunk<'a>>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let parsed = parse_next(self.source, self.offset).and_then(|(chunk, next)| {
            if self.verify_checksums {
                chunk.verify()?;
            }
            Ok((chunk, next))
        });
        match parsed {
            Ok((chunk, next)) => {
                trace!(
                    "{} chunk at byte {}, {} bytes",
                    chunk.type_name(),
                    self.offset,
                    chunk.data.len()
                );
                self.offset = next;
                if chunk.chunk_type == iend::HEADER {
                    self.finished = true;
                }
                Some(Ok(chunk))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

pub(crate) trait ParseableChunk<'a>: Sized {
    const HEADER: &'static [u8; 4];

    fn from_bytes(chunk_data: &'a [u8]) -> IResult<&'a [u8], Self>;
    fn write_data(&self, out: &mut Vec<u8>);

    fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut data = vec![];
        self.write_data(&mut data);
        frame(Self::HEADER, &data)
    }
}
