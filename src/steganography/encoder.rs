use super::bits::{BitReader, write_channel_bits};
use super::capacity::{self, CapacityPlan};
use super::header::{read_header, write_header};
use super::payload::{self, HiddenFile};
use super::walker::{Cursor, is_opaque_pixel};
use super::check_pixel_buffer;
use crate::config::{EncoderConfig, LsbWidth};
use crate::constants::{ALPHA_OFFSET, BYTES_PER_PIXEL};
use crate::error::{Error, Result};
use crate::stats::EncodeStats;
use std::time::Instant;

/// 把数据写入 RGBA 像素缓冲区的最低有效位。
///
/// 编码器在构造时写入头部，之后每次调用都从上一次停下的位置继续，
/// 包括写到一半的通道。要么只调用一次 [`Encoder::encode_files`]，
/// 要么多次调用 [`Encoder::encode`] 组成一个无目录结构的载荷，两者不能混用。
#[derive(Debug)]
pub struct Encoder<'a> {
    pixels: &'a mut [u8],
    cursor: Cursor,
    config: EncoderConfig,
    stats: EncodeStats,
    /// 第一次容量检查时扫描得到。编码只写 RGB，借用期间不透明像素的数量不会变化。
    opaque_pixels: Option<u64>,
}

impl<'a> Encoder<'a> {
    /// 以给定的 LSB 宽度 (`1..=8`) 创建编码器并写入头部。
    ///
    /// # Errors
    ///
    /// * 宽度不在 `1..=8` 内时返回 [`Error::InvalidLsbWidth`]。
    /// * 缓冲区长度不是 4 的倍数时返回 [`Error::MalformedPixelBuffer`]。
    /// * 图像中没有不透明像素时返回 [`Error::HeaderNotFound`]。
    pub fn new(pixels: &'a mut [u8], lsb_width: u8) -> Result<Self> {
        Self::with_config(pixels, EncoderConfig::with_lsb_width(LsbWidth::new(lsb_width)?))
    }

    pub fn with_config(pixels: &'a mut [u8], config: EncoderConfig) -> Result<Self> {
        let start = Instant::now();
        config.validate()?;
        check_pixel_buffer(pixels)?;
        let cursor = write_header(pixels, config.lsb_width)?;

        Ok(Self {
            pixels,
            cursor,
            config,
            stats: EncodeStats {
                setup: start.elapsed(),
                ..EncodeStats::default()
            },
            opaque_pixels: None,
        })
    }

    /// 用之前会话交出的游标继续编码，不会重写头部。
    ///
    /// # Errors
    ///
    /// 游标的宽度与图像头部不一致、游标位置不在缓冲区内，
    /// 或者游标停在半写通道上而该位置在这张图像中不是不透明像素的 RGB 通道时，
    /// 返回 [`Error::InvalidConfig`]。
    pub fn resume(pixels: &'a mut [u8], cursor: Cursor) -> Result<Self> {
        Self::resume_with_config(pixels, cursor, EncoderConfig::with_lsb_width(cursor.lsb_width()))
    }

    pub fn resume_with_config(
        pixels: &'a mut [u8],
        cursor: Cursor,
        config: EncoderConfig,
    ) -> Result<Self> {
        let start = Instant::now();
        config.validate()?;
        check_pixel_buffer(pixels)?;

        let header = read_header(pixels)?;
        if header.lsb_width() != cursor.lsb_width() || config.lsb_width != cursor.lsb_width() {
            return Err(Error::InvalidConfig(format!(
                "cursor uses {} LSBs but the image header says {}",
                cursor.lsb_width(),
                header.lsb_width()
            )));
        }
        if cursor.position() < header.position() || cursor.position() > pixels.len() {
            return Err(Error::InvalidConfig(format!(
                "cursor position {} does not belong to this image",
                cursor.position()
            )));
        }
        if cursor.bit_offset() > 0 && !is_data_channel(pixels, cursor.position()) {
            return Err(Error::InvalidConfig(format!(
                "cursor stopped inside channel {} which is not an opaque colour channel here",
                cursor.position()
            )));
        }

        Ok(Self {
            pixels,
            cursor,
            config,
            stats: EncodeStats {
                setup: start.elapsed(),
                ..EncodeStats::default()
            },
            opaque_pixels: None,
        })
    }

    /// 以目录格式编码一组文件。
    ///
    /// 容量检查和不透明像素扫描都在写入第一位之前完成，
    /// 容量不足时缓冲区保持不变。
    ///
    /// # Errors
    ///
    /// 载荷放不下时返回 [`Error::InsufficientCapacity`]。
    pub fn encode_files(&mut self, files: &[HiddenFile]) -> Result<()> {
        let start = Instant::now();
        let plan = self.plan(|| payload::framed_len(files))?;

        let chunk_size = self.chunk_size(plan);
        let mut chunk = Vec::with_capacity(chunk_size);
        for segment in payload::segments(files) {
            let mut bytes = segment.as_bytes();
            while !bytes.is_empty() {
                let take = bytes.len().min(chunk_size - chunk.len());
                chunk.extend_from_slice(&bytes[..take]);
                bytes = &bytes[take..];
                if chunk.len() == chunk_size {
                    self.write_chunk(&chunk)?;
                    chunk.clear();
                }
            }
        }
        if !chunk.is_empty() {
            self.write_chunk(&chunk)?;
        }

        log::debug!(
            "encoded {} files ({} bits) with {} LSBs",
            files.len(),
            plan.required_bits,
            self.cursor.lsb_width()
        );
        self.stats.data_encoding += start.elapsed();
        Ok(())
    }

    /// 不加任何目录结构地编码原始字节，可以多次调用组成一个载荷。
    ///
    /// # Errors
    ///
    /// 剩余容量不足时返回 [`Error::InsufficientCapacity`]，缓冲区保持不变。
    pub fn encode(&mut self, bytes: &[u8]) -> Result<()> {
        let start = Instant::now();
        let plan = self.plan(|| bytes.len() as u64)?;

        let chunk_size = self.chunk_size(plan);
        for chunk in bytes.chunks(chunk_size) {
            self.write_chunk(chunk)?;
        }

        self.stats.data_encoding += start.elapsed();
        Ok(())
    }

    /// 剩余可写入的位数。还没有做过容量检查时需要扫描整个缓冲区。
    pub fn remaining_bits(&self) -> u64 {
        let opaque_pixels = self
            .opaque_pixels
            .unwrap_or_else(|| capacity::count_opaque_pixels(&*self.pixels));
        capacity::available_bits(opaque_pixels, self.lsb_width())
            .saturating_sub(self.cursor.consumed_bits())
    }

    pub fn lsb_width(&self) -> LsbWidth {
        self.cursor.lsb_width()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// 结束本次借用并交出游标，之后可以用 [`Encoder::resume`] 继续。
    pub fn into_cursor(self) -> Cursor {
        self.cursor
    }

    pub fn stats(&self) -> EncodeStats {
        self.stats
    }

    /// 只有第一次调用会并发扫描像素，之后复用缓存的不透明像素数量。
    fn plan<F>(&mut self, payload_len: F) -> Result<CapacityPlan>
    where
        F: FnOnce() -> u64,
    {
        let lsb_width = self.cursor.lsb_width();
        let consumed_bits = self.cursor.consumed_bits();
        match self.opaque_pixels {
            Some(opaque_pixels) => {
                capacity::check(opaque_pixels, lsb_width, consumed_bits, payload_len())
            }
            None => {
                let (opaque_pixels, payload_bytes) = capacity::scan(&*self.pixels, payload_len);
                self.opaque_pixels = Some(opaque_pixels);
                capacity::check(opaque_pixels, lsb_width, consumed_bits, payload_bytes)
            }
        }
    }

    /// 暂存块大小，不超过载荷本身。
    fn chunk_size(&self, plan: CapacityPlan) -> usize {
        let configured = self.config.chunk_size().unwrap_or(usize::MAX);
        let payload = usize::try_from(plan.required_bits / 8).unwrap_or(usize::MAX);
        configured.min(payload).max(1)
    }

    /// 把一个块的所有位写入像素，调用前必须已经通过容量检查。
    fn write_chunk(&mut self, bytes: &[u8]) -> Result<()> {
        let mut reader = BitReader::new(bytes);
        while reader.bits_left_to_read() > 0 {
            let position = self.cursor.settle(&*self.pixels).ok_or(Error::InsufficientCapacity {
                required_bits: reader.bits_left_to_read() as u64,
                available_bits: 0,
            })?;
            let count = (self.cursor.bits_left_in_channel() as usize)
                .min(reader.bits_left_to_read()) as u8;
            let value = reader.read_bits(count);
            self.pixels[position] =
                write_channel_bits(self.pixels[position], self.cursor.bit_offset(), count, value);
            self.cursor.advance(count);
        }
        log::trace!("flushed {} byte chunk, cursor at {}", bytes.len(), self.cursor.position());
        Ok(())
    }
}

/// `position` 是否是不透明像素的 R、G 或 B 通道。
fn is_data_channel(pixels: &[u8], position: usize) -> bool {
    position < pixels.len()
        && position % BYTES_PER_PIXEL != ALPHA_OFFSET
        && is_opaque_pixel(pixels, position / BYTES_PER_PIXEL)
}
