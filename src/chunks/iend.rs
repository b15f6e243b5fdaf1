use crate::crc::chunk_checksum;

pub(crate) const HEADER: &[u8; 4] = b"IEND";

pub(crate) fn write_end() -> [u8; 12] {
    let mut data = [0, 0, 0, 0, b'I', b'E', b'N', b'D', 0, 0, 0, 0];
    let crc = chunk_checksum(HEADER, &[]).to_be_bytes();
    for (i, b) in crc.into_iter().enumerate() {
        data[i + 8] = b;
    }
    data
}

#[cfg(test)]
mod tests {
    use super::write_end;

    #[test]
    fn terminator_is_the_fixed_constant() {
        assert_eq!(
            write_end(),
            [0, 0, 0, 0, 0x49, 0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82]
        );
    }
}
