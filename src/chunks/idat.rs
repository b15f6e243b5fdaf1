use super::ParseableChunk;
use nom::IResult;

#[derive(Debug)]
pub(crate) struct IDATChunk<'a> {
    pub(crate) data: &'a [u8],
}
impl<'a> ParseableChunk<'a> for IDATChunk<'a> {
    const HEADER: &'static [u8; 4] = HEADER;

    fn from_bytes(chunk_data: &'a [u8]) -> IResult<&'a [u8], Self> {
        Ok((&chunk_data[0..0], IDATChunk { data: chunk_data }))
    }

    fn write_data(&self, out: &mut Vec<u8>) {
        out.extend(self.data);
    }
}

pub(crate) const HEADER: &[u8; 4] = b"IDAT";
