//! 像素遍历策略与读写游标。
//!
//! 通道按 `(像素, 通道)` 的光栅顺序访问，只访问 R、G、B；
//! Alpha 不等于 255 的像素整体跳过，既不写入也不读取。

use crate::config::LsbWidth;
use crate::constants::{ALPHA_OFFSET, BYTES_PER_PIXEL, OPAQUE_ALPHA};

pub fn is_opaque_pixel(pixels: &[u8], pixel: usize) -> bool {
    pixels.get(pixel * BYTES_PER_PIXEL + ALPHA_OFFSET) == Some(&OPAQUE_ALPHA)
}

/// 光栅顺序中第一个完全不透明像素的索引。
pub fn first_opaque_pixel(pixels: &[u8]) -> Option<usize> {
    pixels
        .chunks_exact(BYTES_PER_PIXEL)
        .position(|pixel| pixel[ALPHA_OFFSET] == OPAQUE_ALPHA)
}

/// 一次编码或解码会话的位置状态。
///
/// `position` 是下一个要访问的通道在像素缓冲区中的字节索引，
/// `bit_offset` 是该通道中已经写入 (或读取) 的位数，始终小于 `lsb_width`。
/// 游标只会前进，不会回到已经访问过的位置。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    lsb_width: LsbWidth,
    position: usize,
    bit_offset: u8,
    consumed_bits: u64,
}

impl Cursor {
    /// 指向头部像素之后第一个通道的游标。
    pub(crate) fn after_header(header_pixel: usize, lsb_width: LsbWidth) -> Self {
        Self {
            lsb_width,
            position: (header_pixel + 1) * BYTES_PER_PIXEL,
            bit_offset: 0,
            consumed_bits: 0,
        }
    }

    pub fn lsb_width(&self) -> LsbWidth {
        self.lsb_width
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn bit_offset(&self) -> u8 {
        self.bit_offset
    }

    /// 头部之后已经写入或读取的位数。
    pub fn consumed_bits(&self) -> u64 {
        self.consumed_bits
    }

    /// 当前通道中还能写入或读取的位数。
    pub(crate) fn bits_left_in_channel(&self) -> u8 {
        self.lsb_width.get() - self.bit_offset
    }

    /// 把游标移动到下一个可用通道 (跳过 Alpha 和非不透明像素) 并返回其索引。
    /// 通道用完时返回 `None`。
    ///
    /// 通道写到一半时游标已经停在有效位置上，不会移动。
    pub(crate) fn settle(&mut self, pixels: &[u8]) -> Option<usize> {
        loop {
            if self.position >= pixels.len() {
                return None;
            }
            let pixel = self.position / BYTES_PER_PIXEL;
            if self.position % BYTES_PER_PIXEL == ALPHA_OFFSET || !is_opaque_pixel(pixels, pixel) {
                debug_assert_eq!(self.bit_offset, 0);
                self.position = (pixel + 1) * BYTES_PER_PIXEL;
                continue;
            }
            return Some(self.position);
        }
    }

    /// 记录当前通道中又处理了 `bits` 位，通道用满后前进到下一个通道。
    pub(crate) fn advance(&mut self, bits: u8) {
        debug_assert!(bits <= self.bits_left_in_channel());
        self.bit_offset += bits;
        self.consumed_bits += bits as u64;
        if self.bit_offset >= self.lsb_width.get() {
            self.bit_offset = 0;
            self.position += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixels_with_alpha(alphas: &[u8]) -> Vec<u8> {
        alphas.iter().flat_map(|&a| [10, 20, 30, a]).collect()
    }

    #[test]
    fn test_first_opaque_pixel() {
        assert_eq!(first_opaque_pixel(&pixels_with_alpha(&[0, 254, 255, 255])), Some(2));
        assert_eq!(first_opaque_pixel(&pixels_with_alpha(&[255])), Some(0));
        assert_eq!(first_opaque_pixel(&pixels_with_alpha(&[0, 128])), None);
        assert_eq!(first_opaque_pixel(&[]), None);
    }

    #[test]
    fn test_walk_skips_alpha_and_translucent_pixels() {
        let pixels = pixels_with_alpha(&[255, 255, 100, 255, 0]);
        let width = LsbWidth::new(1).unwrap();
        let mut cursor = Cursor::after_header(0, width);

        let mut visited = Vec::new();
        while let Some(position) = cursor.settle(&pixels) {
            visited.push(position);
            cursor.advance(1);
        }
        assert_eq!(visited, vec![4, 5, 6, 12, 13, 14]);
        assert_eq!(cursor.consumed_bits(), 6);
    }

    #[test]
    fn test_partial_channel_stays_put() {
        let pixels = pixels_with_alpha(&[255, 255]);
        let width = LsbWidth::new(3).unwrap();
        let mut cursor = Cursor::after_header(0, width);

        assert_eq!(cursor.settle(&pixels), Some(4));
        cursor.advance(2);
        assert_eq!(cursor.bit_offset(), 2);
        assert_eq!(cursor.settle(&pixels), Some(4));
        assert_eq!(cursor.bits_left_in_channel(), 1);

        cursor.advance(1);
        assert_eq!(cursor.bit_offset(), 0);
        assert_eq!(cursor.settle(&pixels), Some(5));
    }
}
