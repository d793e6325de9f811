/// 按 LSB 优先的顺序从字节序列中逐位读取。
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    bytes: &'a [u8],
    bit_pos: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, bit_pos: 0 }
    }

    /// 尚未完全读完的字节数。
    pub fn bytes_left_to_read(&self) -> usize {
        self.bits_left_to_read().div_ceil(8)
    }

    pub fn bits_left_to_read(&self) -> usize {
        self.bytes.len() * 8 - self.bit_pos
    }

    /// 读取接下来的 `n` 位 (`1..=8`)，右对齐返回。
    ///
    /// 读到末尾之后只返回剩余的位，高位补零；调用方应事先确认容量。
    pub fn read_bits(&mut self, n: u8) -> u8 {
        debug_assert!((1..=8).contains(&n));
        let n = n.min(8);
        let byte_idx = self.bit_pos / 8;
        let shift = self.bit_pos % 8;

        let lo = self.bytes.get(byte_idx).copied().unwrap_or(0) as u16;
        let hi = self.bytes.get(byte_idx + 1).copied().unwrap_or(0) as u16;
        let window = ((hi << 8) | lo) >> shift;

        self.bit_pos = (self.bit_pos + n as usize).min(self.bytes.len() * 8);
        (window as u8) & low_mask(n)
    }
}

/// 低 `n` 位为 1 的掩码，`n` 取 `0..=8`。
pub fn low_mask(n: u8) -> u8 {
    match n {
        0 => 0,
        n => u8::MAX >> (8 - n.min(8)),
    }
}

/// 清除通道字节的低 `n` 位并写入 `value`，保留高 `8 - n` 位。
pub fn fill_channel_lsbs(channel: u8, n: u8, value: u8) -> u8 {
    write_channel_bits(channel, 0, n, value)
}

/// 把 `value` 的低 `count` 位写到通道字节第 `offset` 位开始的位置，其余位不变。
pub fn write_channel_bits(channel: u8, offset: u8, count: u8, value: u8) -> u8 {
    debug_assert!(offset < 8 && offset + count <= 8);
    let mask = low_mask(count) << offset;
    (channel & !mask) | ((value << offset) & mask)
}

/// 读出通道字节第 `offset` 位开始的 `count` 位。
pub fn read_channel_bits(channel: u8, offset: u8, count: u8) -> u8 {
    debug_assert!(offset < 8 && offset + count <= 8);
    (channel >> offset) & low_mask(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 10000000 00000111 11111111 01100101
    const SOURCE: [u8; 4] = [128, 7, 255, 101];

    #[test]
    fn test_read_bits_golden_vectors() {
        let expected: [&[u8]; 8] = [
            &[
                0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 1, 0,
                0, 1, 1,
            ],
            &[0, 0, 0, 2, 3, 1, 0, 0, 3, 3, 3, 3, 1, 1, 2, 1],
            &[0, 0, 6, 3, 0, 6, 7, 7, 5, 4, 1],
            &[0, 8, 7, 0, 15, 15, 5, 6],
            &[0, 28, 1, 30, 31, 18, 1],
            &[0, 30, 48, 63, 37, 1],
            &[0, 15, 124, 47, 6],
            &[128, 7, 255, 101],
        ];

        for (bits, expected_values) in (1u8..=8).zip(expected) {
            let mut reader = BitReader::new(&SOURCE);
            for (iter, &value) in expected_values.iter().enumerate() {
                assert_eq!(
                    reader.read_bits(bits),
                    value,
                    "{bits} bits per read, iteration {}",
                    iter + 1
                );
            }
        }
    }

    #[test]
    fn test_remaining_counts() {
        let mut reader = BitReader::new(&SOURCE);
        assert_eq!(reader.bits_left_to_read(), 32);
        assert_eq!(reader.bytes_left_to_read(), 4);

        reader.read_bits(3);
        assert_eq!(reader.bits_left_to_read(), 29);
        assert_eq!(reader.bytes_left_to_read(), 4);

        reader.read_bits(5);
        assert_eq!(reader.bytes_left_to_read(), 3);

        for _ in 0..4 {
            reader.read_bits(7);
        }
        assert_eq!(reader.bits_left_to_read(), 0);
        assert_eq!(reader.bytes_left_to_read(), 0);
        assert_eq!(reader.read_bits(8), 0);
    }

    #[test]
    fn test_fill_channel_lsbs_keeps_high_bits() {
        assert_eq!(fill_channel_lsbs(0b1010_1111, 3, 0b010), 0b1010_1010);
        assert_eq!(fill_channel_lsbs(0xFF, 1, 0), 0xFE);
        assert_eq!(fill_channel_lsbs(0x00, 8, 0xA5), 0xA5);
        // 超出宽度的位会被忽略
        assert_eq!(fill_channel_lsbs(0x00, 2, 0xFF), 0b11);
    }

    #[test]
    fn test_channel_bits_at_offset() {
        let channel = write_channel_bits(0b1111_0000, 2, 3, 0b101);
        assert_eq!(channel, 0b1111_0100);
        assert_eq!(read_channel_bits(channel, 2, 3), 0b101);
        assert_eq!(read_channel_bits(channel, 0, 2), 0);
        assert_eq!(read_channel_bits(0xFF, 5, 3), 0b111);
    }
}
