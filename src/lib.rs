//! Stores arbitrary bytes inside a valid PNG image and gets them back out.
//!
//! The payload is padded to fill a square 8-bit RGB raster, compressed as
//! ordinary image data, and framed with the metadata needed to undo the
//! padding. See [`encode`] and [`decode`].

mod chunks;
mod crc;
mod decoder;
mod encoder;
mod error;
mod image_data;
mod inspect;
mod padding;
mod scanlines;
mod utils;

pub use crc::checksum;
pub use decoder::{decode, decode_with, Decoded, DecoderConfig};
pub use encoder::{encode, encode_with, EncoderConfig, DEFAULT_IDAT_CAPACITY};
pub use error::{CodecError, Result};
pub use inspect::{inspect, ChunkSummary, ContainerSummary};
pub use padding::{generate_padding, plan, PaddingPlan, PaddingStyle};
