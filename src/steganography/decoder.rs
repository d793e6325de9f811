use super::bits::read_channel_bits;
use super::capacity;
use super::check_pixel_buffer;
use super::header::read_header;
use super::payload::HiddenFile;
use super::walker::Cursor;
use crate::config::{DecoderConfig, LsbWidth};
use crate::constants::LENGTH_FIELD_BYTES;
use crate::error::{Error, Result};
use crate::stats::DecodeStats;
use std::time::Instant;

/// 从 RGBA 像素缓冲区中读出隐藏的数据，不修改缓冲区。
///
/// 缓冲区可能根本不是本工具生成的，所以每次按长度前缀读取之前都会检查
/// 分配上限和剩余容量，读取过程中游标一旦越界立即失败。
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    pixels: &'a [u8],
    cursor: Cursor,
    available_bits: u64,
    config: DecoderConfig,
    stats: DecodeStats,
}

impl<'a> Decoder<'a> {
    /// 读取头部，恢复 LSB 宽度，并把游标放在头部之后的第一个通道上。
    ///
    /// # Errors
    ///
    /// * 缓冲区长度不是 4 的倍数时返回 [`Error::MalformedPixelBuffer`]。
    /// * 图像中没有不透明像素时返回 [`Error::HeaderNotFound`]。
    pub fn new(pixels: &'a [u8]) -> Result<Self> {
        Self::with_config(pixels, DecoderConfig::default())
    }

    pub fn with_config(pixels: &'a [u8], config: DecoderConfig) -> Result<Self> {
        config.validate()?;
        check_pixel_buffer(pixels)?;
        let cursor = read_header(pixels)?;
        let available_bits =
            capacity::available_bits(capacity::count_opaque_pixels(pixels), cursor.lsb_width());

        Ok(Self {
            pixels,
            cursor,
            available_bits,
            config,
            stats: DecodeStats::default(),
        })
    }

    /// 按目录格式解码全部文件，顺序与编码时一致。
    ///
    /// # Errors
    ///
    /// * 长度字段要求的分配超过上限时返回 [`Error::AllocationGuardTripped`]。
    /// * 读取越过图像末尾时返回 [`Error::DecodeBoundsExceeded`]。
    pub fn decode_files(&mut self) -> Result<Vec<HiddenFile>> {
        let start = Instant::now();
        let result = self.read_directory();
        self.stats.data_decoding += start.elapsed();
        result
    }

    /// 读取 `len` 个无目录结构的原始字节，对应 [`Encoder::encode`](super::Encoder::encode)。
    pub fn decode(&mut self, len: u64) -> Result<Vec<u8>> {
        let start = Instant::now();
        let result = self.read_bytes(len);
        self.stats.data_decoding += start.elapsed();
        result
    }

    pub fn lsb_width(&self) -> LsbWidth {
        self.cursor.lsb_width()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// 图像中尚未读取的位数。
    pub fn remaining_bits(&self) -> u64 {
        self.available_bits.saturating_sub(self.cursor.consumed_bits())
    }

    pub fn stats(&self) -> DecodeStats {
        self.stats
    }

    fn read_directory(&mut self) -> Result<Vec<HiddenFile>> {
        let file_count = self.read_u64()?;
        log::debug!("image claims to hold {file_count} files");

        // 文件数可能是垃圾数据，不按它预分配
        let mut files = Vec::new();
        for _ in 0..file_count {
            let name_len = self.read_u64()?;
            let name = self.read_bytes(name_len)?;
            let content_len = self.read_u64()?;
            let content = self.read_bytes(content_len)?;

            let file = HiddenFile {
                name: String::from_utf8_lossy(&name).into_owned(),
                content,
            };
            log::debug!("decoded {} ({} bytes)", file.name, file.content.len());
            files.push(file);
        }
        Ok(files)
    }

    fn read_u64(&mut self) -> Result<u64> {
        let mut bytes = [0u8; LENGTH_FIELD_BYTES];
        for byte in &mut bytes {
            *byte = self.read_byte()?;
        }
        Ok(u64::from_be_bytes(bytes))
    }

    fn read_bytes(&mut self, len: u64) -> Result<Vec<u8>> {
        if len > self.config.max_allocation {
            return Err(Error::AllocationGuardTripped {
                requested: len,
                limit: self.config.max_allocation,
            });
        }
        if len.saturating_mul(8) > self.remaining_bits() {
            return Err(Error::DecodeBoundsExceeded);
        }
        let len = usize::try_from(len).map_err(|_| Error::AllocationGuardTripped {
            requested: len,
            limit: self.config.max_allocation,
        })?;

        let mut bytes = Vec::with_capacity(len);
        for _ in 0..len {
            bytes.push(self.read_byte()?);
        }
        Ok(bytes)
    }

    fn read_byte(&mut self) -> Result<u8> {
        let mut byte = 0u8;
        let mut filled = 0u8;
        while filled < 8 {
            let position = self
                .cursor
                .settle(self.pixels)
                .ok_or(Error::DecodeBoundsExceeded)?;
            let count = self.cursor.bits_left_in_channel().min(8 - filled);
            byte |= read_channel_bits(self.pixels[position], self.cursor.bit_offset(), count) << filled;
            self.cursor.advance(count);
            filled += count;
        }
        Ok(byte)
    }
}
