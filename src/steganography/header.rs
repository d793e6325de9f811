//! 自描述头部：把 `LSB 宽度 - 1` 写进第一个不透明像素，
//! 每个 R/G/B 通道固定只用 1 位，与实际配置的宽度无关。

use super::bits::{BitReader, fill_channel_lsbs};
use super::walker::{Cursor, first_opaque_pixel};
use crate::config::LsbWidth;
use crate::constants::{BYTES_PER_PIXEL, HEADER_BITS};
use crate::error::{Error, Result};

/// 写入头部，返回指向头部之后第一个通道的游标。
///
/// # Errors
///
/// 图像中没有不透明像素时返回 [`Error::HeaderNotFound`]，此时缓冲区不会被修改。
pub fn write_header(pixels: &mut [u8], lsb_width: LsbWidth) -> Result<Cursor> {
    let header_pixel = first_opaque_pixel(pixels).ok_or(Error::HeaderNotFound)?;
    let packed = [lsb_width.packed()];
    let mut reader = BitReader::new(&packed);

    let start = header_pixel * BYTES_PER_PIXEL;
    for channel in &mut pixels[start..start + HEADER_BITS as usize] {
        *channel = fill_channel_lsbs(*channel, 1, reader.read_bits(1));
    }

    log::debug!("wrote LSB width {lsb_width} into header pixel {header_pixel}");
    Ok(Cursor::after_header(header_pixel, lsb_width))
}

/// 读取头部，返回恢复出的宽度所对应的游标。
///
/// # Errors
///
/// 图像中没有不透明像素时返回 [`Error::HeaderNotFound`]。
pub fn read_header(pixels: &[u8]) -> Result<Cursor> {
    let header_pixel = first_opaque_pixel(pixels).ok_or(Error::HeaderNotFound)?;
    let start = header_pixel * BYTES_PER_PIXEL;

    let packed = pixels[start..start + HEADER_BITS as usize]
        .iter()
        .enumerate()
        .fold(0u8, |acc, (bit, channel)| acc | ((channel & 1) << bit));
    let lsb_width = LsbWidth::from_packed(packed);

    log::debug!("read LSB width {lsb_width} from header pixel {header_pixel}");
    Ok(Cursor::after_header(header_pixel, lsb_width))
}
