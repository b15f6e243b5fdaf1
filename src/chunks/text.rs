use nom::{
    bytes::complete::{tag, take_till},
    combinator::{opt, rest},
    sequence::tuple,
    IResult,
};

use super::ParseableChunk;

/// Tag the encoder writes for text chunks.
pub(crate) const HEADER: &[u8; 4] = b"tEXT";
/// Tag the PNG specification assigns to text chunks, also accepted on decode.
pub(crate) const STANDARD_HEADER: &[u8; 4] = b"tEXt";

/// Keyword under which the padding length is stored, as a big-endian `u32`.
pub(crate) const EXTRA_BYTES_KEY: &[u8] = b"xtra";
pub(crate) const FILE_NAME_KEY: &[u8] = b"filename";
pub(crate) const SOFTWARE_KEY: &[u8] = b"Software";

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct TextChunk<'a> {
    pub(crate) keyword: &'a [u8],
    pub(crate) text: &'a [u8],
}
impl<'a> ParseableChunk<'a> for TextChunk<'a> {
    const HEADER: &'static [u8; 4] = HEADER;

    fn from_bytes(chunk_data: &'a [u8]) -> IResult<&'a [u8], Self> {
        let (input, (keyword, _, text)) =
            tuple((take_till(|b: u8| b == 0), opt(tag(b"\0")), rest))(chunk_data)?;
        Ok((input, TextChunk { keyword, text }))
    }

    fn write_data(&self, out: &mut Vec<u8>) {
        out.extend(self.keyword);
        out.push(0);
        out.extend(self.text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_at_first_null() {
        let (_, chunk) = TextChunk::from_bytes(b"filename\0a\0b.txt").unwrap();
        assert_eq!(chunk.keyword, b"filename");
        assert_eq!(chunk.text, b"a\0b.txt");
    }

    #[test]
    fn missing_separator_leaves_empty_text() {
        let (_, chunk) = TextChunk::from_bytes(b"lonely").unwrap();
        assert_eq!(chunk.keyword, b"lonely");
        assert!(chunk.text.is_empty());
    }

    #[test]
    fn extra_bytes_chunk() {
        let chunk = TextChunk {
            keyword: EXTRA_BYTES_KEY,
            text: &7u32.to_be_bytes(),
        };
        let hex: String = chunk
            .to_bytes()
            .unwrap()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect();
        insta::assert_snapshot!(hex, @"0000000974455854787472610000000007ea21fcda");
    }
}
