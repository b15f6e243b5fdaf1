use crate::{
    error::{CodecError, Result},
    utils::div_ceil,
};
use nom::{
    combinator::map_res,
    number::complete::{be_u32, u8},
    sequence::tuple,
    IResult,
};

use super::ParseableChunk;

pub(crate) const HEADER: &[u8; 4] = b"IHDR";

#[derive(Debug, Default, PartialEq, Eq)]
pub struct IHDRChunk {
    pub width: u32,
    pub height: u32,
    pub(crate) bit_depth: u8,
    pub(crate) color_type: ColorType,
    pub(crate) compression_method: u8,
    pub(crate) filter_method: u8,
    pub(crate) interlace_method: Interlacing,
}
impl IHDRChunk {
    /// Header of the `side` x `side`, 8-bit RGB raster that carries a payload.
    pub(crate) fn square(side: u32) -> Self {
        Self {
            width: side,
            height: side,
            bit_depth: 8,
            color_type: ColorType::Truecolor,
            ..Default::default()
        }
    }

    pub(crate) fn pixel_width(&self) -> u8 {
        self.color_type.channel_count() * self.bit_depth
    }

    pub(crate) fn scanline_size(&self) -> usize {
        div_ceil(self.width as usize * self.pixel_width() as usize, 8) + 1
    }

    /// Checks the header describes the kind of raster the encoder writes.
    pub(crate) fn validate(&self) -> Result<u32> {
        let square_rgb8 = self.width == self.height
            && self.bit_depth == 8
            && matches!(self.color_type, ColorType::Truecolor)
            && self.compression_method == 0
            && self.filter_method == 0
            && matches!(self.interlace_method, Interlacing::None);
        if !square_rgb8 || self.width == 0 {
            return Err(CodecError::Format(format!(
                "unsupported image header {self:?}"
            )));
        }
        Ok(self.width)
    }
}
impl<'a> ParseableChunk<'a> for IHDRChunk {
    const HEADER: &'static [u8; 4] = HEADER;

    fn from_bytes(chunk_data: &'a [u8]) -> IResult<&'a [u8], Self> {
        let (
            rest,
            (width, height, bit_depth, color_type, compression_method, filter_method, interlace_method),
        ) = tuple((
            be_u32,
            be_u32,
            u8,
            map_res(u8, ColorType::try_from),
            u8,
            u8,
            map_res(u8, Interlacing::try_from),
        ))(chunk_data)?;
        Ok((
            rest,
            IHDRChunk {
                width,
                height,
                bit_depth,
                color_type,
                compression_method,
                filter_method,
                interlace_method,
            },
        ))
    }

    fn write_data(&self, out: &mut Vec<u8>) {
        out.extend(&self.width.to_be_bytes());
        out.extend(&self.height.to_be_bytes());
        out.extend(&[
            self.bit_depth,
            self.color_type as u8,
            self.compression_method,
            self.filter_method,
            self.interlace_method as u8,
        ]);
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColorType {
    #[default]
    Greyscale = 0,
    Truecolor = 2,
    IndexedColor = 3,
    GreyscaleWithAlpha = 4,
    TruecolorWithAlpha = 6,
}
impl TryFrom<u8> for ColorType {
    type Error = u8;
    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Greyscale),
            2 => Ok(Self::Truecolor),
            3 => Ok(Self::IndexedColor),
            4 => Ok(Self::GreyscaleWithAlpha),
            6 => Ok(Self::TruecolorWithAlpha),
            other => Err(other),
        }
    }
}
impl ColorType {
    pub(crate) fn channel_count(&self) -> u8 {
        match self {
            Self::Greyscale => 1,
            Self::IndexedColor => 1,
            Self::GreyscaleWithAlpha => 2,
            Self::Truecolor => 3,
            Self::TruecolorWithAlpha => 4,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Interlacing {
    #[default]
    None,
    Adam7,
}
impl TryFrom<u8> for Interlacing {
    type Error = u8;
    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Adam7),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_header_bytes() {
        let bytes = IHDRChunk::square(2).to_bytes().unwrap();
        let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        insta::assert_snapshot!(hex, @"0000000d4948445200000002000000020802000000fdd49a73");
    }

    #[test]
    fn parses_written_header() {
        let header = IHDRChunk::square(41);
        let mut data = vec![];
        header.write_data(&mut data);
        let (rest, parsed) = IHDRChunk::from_bytes(&data).unwrap();
        assert!(rest.is_empty());
        assert_eq!(parsed, header);
        assert_eq!(parsed.validate(), Ok(41));
        assert_eq!(parsed.scanline_size(), 1 + 41 * 3);
    }

    #[test]
    fn rejects_unknown_color_type() {
        let data = [0, 0, 0, 1, 0, 0, 0, 1, 8, 5, 0, 0, 0];
        assert!(IHDRChunk::from_bytes(&data).is_err());
    }

    #[test]
    fn validate_rejects_foreign_rasters() {
        let mut header = IHDRChunk::square(4);
        header.height = 5;
        assert!(header.validate().is_err());

        let mut header = IHDRChunk::square(4);
        header.color_type = ColorType::TruecolorWithAlpha;
        assert!(header.validate().is_err());

        assert!(IHDRChunk::square(0).validate().is_err());
    }
}
