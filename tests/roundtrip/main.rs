use png_stash::{
    checksum, decode, encode, encode_with, inspect, plan, CodecError, Decoded, EncoderConfig,
    PaddingStyle, DEFAULT_IDAT_CAPACITY,
};

/// Deterministic bytes that deflate can't squeeze much.
fn noise(len: usize) -> Vec<u8> {
    let mut state: u32 = 0x2545_f491;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect()
}

fn chunks(bytes: &[u8]) -> Vec<(&[u8], &[u8], u32)> {
    let mut offset = 8;
    let mut chunks = vec![];
    while offset < bytes.len() {
        let length = u32::from_be_bytes(bytes[offset..offset + 4].try_into().unwrap()) as usize;
        let chunk_type = &bytes[offset + 4..offset + 8];
        let data = &bytes[offset + 8..offset + 8 + length];
        let crc_at = offset + 8 + length;
        let crc = u32::from_be_bytes(bytes[crc_at..crc_at + 4].try_into().unwrap());
        chunks.push((chunk_type, data, crc));
        offset = crc_at + 4;
    }
    chunks
}

#[test]
fn round_trips_assorted_lengths() {
    for len in [0, 1, 2, 3, 4, 5, 11, 12, 13, 100, 1000, 4096, 65537] {
        let payload = noise(len);
        let decoded = decode(&encode(&payload, None).unwrap()).unwrap();
        assert_eq!(
            decoded,
            Decoded {
                payload,
                file_name: None
            },
            "length {len}"
        );
    }
}

#[test]
fn round_trips_with_file_name() {
    let payload = b"fn main() {}\n".to_vec();
    let image = encode(&payload, Some("main.rs")).unwrap();
    let decoded = decode(&image).unwrap();
    assert_eq!(decoded.payload, payload);
    assert_eq!(decoded.file_name.as_deref(), Some("main.rs"));
}

#[test]
fn round_trips_unusual_file_names() {
    let long_name = format!("{}.txt", "n".repeat(20_000));
    let names = [
        "résumé – 履歴書 📄.pdf",
        "before\0after",
        "\0",
        " ",
        "dir/sub dir/file.tar.gz",
        long_name.as_str(),
    ];
    let payload = noise(777);
    for name in names {
        let image = encode(&payload, Some(name)).unwrap();
        let decoded = decode(&image).unwrap();
        assert_eq!(decoded.payload, payload, "{name:?}");
        assert_eq!(decoded.file_name.as_deref(), Some(name), "{name:?}");
    }
}

#[test]
fn payload_made_of_zeroes_survives() {
    let payload = vec![0; 301];
    let config = EncoderConfig::default().with_padding(PaddingStyle::Random);
    let image = encode_with(&payload, None, &config).unwrap();
    assert_eq!(decode(&image).unwrap().payload, payload);
}

#[test]
fn hello() {
    let plan = plan(5).unwrap();
    assert_eq!((plan.side, plan.extra_bytes), (2, 7));

    let image = encode(b"Hello", None).unwrap();
    let summary = inspect(&image).unwrap();
    assert_eq!(summary.side, Some(2));
    assert_eq!(summary.extra_bytes, Some(7));
    assert_eq!(decode(&image).unwrap().payload, b"Hello");
}

#[test]
fn empty_payload() {
    let image = encode(b"", None).unwrap();
    let summary = inspect(&image).unwrap();
    assert_eq!(summary.side, Some(1));
    assert_eq!(summary.extra_bytes, Some(3));
    assert!(decode(&image).unwrap().payload.is_empty());
}

#[test]
fn every_chunk_carries_its_checksum() {
    let image = encode(&noise(5000), Some("noise.bin")).unwrap();
    let chunks = chunks(&image);
    assert_eq!(chunks.first().unwrap().0, b"IHDR");
    assert_eq!(chunks.last().unwrap().0, b"IEND");
    for (chunk_type, data, crc) in chunks {
        let mut covered = chunk_type.to_vec();
        covered.extend(data);
        assert_eq!(checksum(&covered), crc);
    }
    assert_eq!(
        &image[image.len() - 12..],
        [0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xae, 0x42, 0x60, 0x82]
    );
}

#[test]
fn large_payload_spans_several_idat_chunks() {
    let payload = noise(100_000);
    let image = encode(&payload, None).unwrap();
    let idats: Vec<usize> = chunks(&image)
        .into_iter()
        .filter(|(chunk_type, _, _)| *chunk_type == b"IDAT")
        .map(|(_, data, _)| data.len())
        .collect();
    assert!(idats.len() >= 2);
    let (last, full) = idats.split_last().unwrap();
    assert!(full.iter().all(|&len| len == DEFAULT_IDAT_CAPACITY));
    assert!(*last <= DEFAULT_IDAT_CAPACITY);
    assert_eq!(decode(&image).unwrap().payload, payload);
}

#[test]
fn cut_short_data_chunk_is_reported() {
    let image = encode(&noise(40_000), None).unwrap();
    let idat_count = chunks(&image)
        .iter()
        .filter(|(chunk_type, _, _)| *chunk_type == b"IDAT")
        .count();
    assert!(idat_count > 1);

    // Drop IEND and the tail of the final IDAT.
    let truncated = &image[..image.len() - 12 - 100];
    assert!(matches!(
        decode(truncated),
        Err(CodecError::TruncatedInput { .. })
    ));

    // Whole chunks but no IEND.
    let unterminated = &image[..image.len() - 12];
    assert!(matches!(
        decode(unterminated),
        Err(CodecError::TruncatedInput { .. })
    ));
}

#[test]
fn flipped_payload_byte_is_caught() {
    let mut image = encode(b"some secret notes", None).unwrap();
    let idat = image.len() - 12 - 4 - 5;
    image[idat] ^= 0x40;
    assert!(matches!(
        decode(&image),
        Err(CodecError::ChecksumMismatch { ref chunk_type, .. }) if chunk_type == "IDAT"
    ));
}

#[test]
fn not_a_png() {
    assert_eq!(
        decode(b"just some text, not an image"),
        Err(CodecError::InvalidSignature)
    );
}
