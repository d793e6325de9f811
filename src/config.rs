//! # 配置模块
//!
//! 编码器与解码器的运行配置，以及经过校验的 LSB 宽度类型。

use crate::constants::{
    CHANNELS_PER_PIXEL, DEFAULT_CHUNK_SIZE_MULTIPLIER, DEFAULT_LSB_WIDTH, DEFAULT_MAX_ALLOCATION,
    MAX_LSB_WIDTH, MIN_LSB_WIDTH,
};
use crate::error::{Error, Result};
use clap::ValueEnum;
use std::fmt;

/// 每个颜色通道中用于承载数据的最低有效位数，保证处于 `1..=8`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LsbWidth(u8);

impl LsbWidth {
    /// 校验并创建一个 LSB 宽度。
    ///
    /// # Errors
    ///
    /// 当 `bits` 不在 `1..=8` 范围内时返回 [`Error::InvalidLsbWidth`]。
    pub fn new(bits: u8) -> Result<Self> {
        if (MIN_LSB_WIDTH..=MAX_LSB_WIDTH).contains(&bits) {
            Ok(Self(bits))
        } else {
            Err(Error::InvalidLsbWidth(bits))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// 头部中存储的值 (`宽度 - 1`)，可以放进 3 位。
    pub(crate) fn packed(self) -> u8 {
        self.0 - 1
    }

    /// 从头部存储的 3 位值恢复宽度。
    pub(crate) fn from_packed(packed: u8) -> Self {
        Self((packed & 0b111) + 1)
    }
}

impl Default for LsbWidth {
    fn default() -> Self {
        Self(DEFAULT_LSB_WIDTH)
    }
}

impl TryFrom<u8> for LsbWidth {
    type Error = Error;

    fn try_from(bits: u8) -> Result<Self> {
        Self::new(bits)
    }
}

impl fmt::Display for LsbWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 输出 PNG 的压缩级别。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PngCompression {
    #[default]
    Default,
    Fast,
    Best,
    /// 不压缩，输出最大但写入最快
    None,
}

/// 编码器配置。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    /// 每个通道使用的 LSB 位数。
    pub lsb_width: LsbWidth,

    /// 暂存块大小倍数，块大小为 `lsb_width * 3 * chunk_size_multiplier` 字节。
    /// 只影响峰值内存，不影响输出。
    pub chunk_size_multiplier: usize,

    /// 输出 PNG 的压缩级别。
    pub png_compression: PngCompression,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            lsb_width: LsbWidth::default(),
            chunk_size_multiplier: DEFAULT_CHUNK_SIZE_MULTIPLIER,
            png_compression: PngCompression::default(),
        }
    }
}

impl EncoderConfig {
    /// 使用给定的 LSB 宽度和其余默认值创建配置。
    pub fn with_lsb_width(lsb_width: LsbWidth) -> Self {
        Self {
            lsb_width,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size_multiplier == 0 {
            return Err(Error::InvalidConfig(
                "chunk size multiplier must be greater than 0".to_string(),
            ));
        }
        self.chunk_size()
            .map(|_| ())
            .ok_or_else(|| Error::InvalidConfig("chunk size overflows usize".to_string()))
    }

    /// 暂存块的字节数。
    pub(crate) fn chunk_size(&self) -> Option<usize> {
        (self.lsb_width.get() as usize * CHANNELS_PER_PIXEL)
            .checked_mul(self.chunk_size_multiplier)
    }
}

/// 解码器配置。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    /// 单个长度前缀读取允许分配的最大字节数。
    pub max_allocation: u64,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_allocation: DEFAULT_MAX_ALLOCATION,
        }
    }
}

impl DecoderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_allocation == 0 {
            return Err(Error::InvalidConfig(
                "maximum allocation must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
