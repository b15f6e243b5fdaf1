const CRC_TABLE: [u32; 256] = {
    let mut table = [0; 256];
    let mut n = 0;
    while n < 256 {
        let mut c = n as u32;
        let mut i = 0;
        while i < 8 {
            if c & 1 != 0 {
                c = 0xedb88320 ^ (c >> 1);
            } else {
                c >>= 1;
            }
            i += 1;
        }
        table[n as usize] = c;
        n += 1;
    }
    table
};

fn update_crc(crc: u32, data: &[u8]) -> u32 {
    let mut new_crc = crc;
    for &b in data {
        let index = (new_crc ^ b as u32) & 0xff;
        new_crc = CRC_TABLE[index as usize] ^ (new_crc >> 8);
    }
    new_crc
}

/// CRC-32 (IEEE) of `data`, as stamped on every chunk.
pub fn checksum(data: &[u8]) -> u32 {
    chunk_checksum(data, &[])
}

/// CRC-32 over a chunk's type tag followed by its data, without joining them.
pub(crate) fn chunk_checksum(chunk_type: &[u8], chunk_data: &[u8]) -> u32 {
    let crc = update_crc(0xffffffff, chunk_type);
    update_crc(crc, chunk_data) ^ 0xffffffff
}
