//! # 常量模块
//!
//! 嵌入格式以及默认配置使用的全部常量。

/// 每个像素在 RGBA 缓冲区中占用的字节数。
pub const BYTES_PER_PIXEL: usize = 4;

/// 每个像素中可写入数据的通道数 (R, G, B)。Alpha 通道从不写入。
pub const CHANNELS_PER_PIXEL: usize = 3;

/// Alpha 通道在像素内的偏移量。
pub const ALPHA_OFFSET: usize = 3;

/// 完全不透明像素的 Alpha 值。只有这样的像素才会承载数据。
pub const OPAQUE_ALPHA: u8 = 255;

/// 头部占用的位数：`LSB 宽度 - 1` (0..=7)，每个 R/G/B 通道各 1 位。
pub const HEADER_BITS: u8 = 3;

/// 所有长度字段 (文件数、文件名长度、内容长度) 的字节数，固定为 64 位大端序。
pub const LENGTH_FIELD_BYTES: usize = 8;

/// 允许的最小 LSB 宽度。
pub const MIN_LSB_WIDTH: u8 = 1;

/// 允许的最大 LSB 宽度。
pub const MAX_LSB_WIDTH: u8 = 8;

/// 未指定时使用的 LSB 宽度。
pub const DEFAULT_LSB_WIDTH: u8 = 3;

/// 暂存块大小的默认倍数。
/// 实际块大小为 `LSB 宽度 * 3 * 倍数` 字节。
pub const DEFAULT_CHUNK_SIZE_MULTIPLIER: usize = 32 * 1024;

/// 解码时单次长度前缀读取允许分配的最大字节数 (256 MiB)。
pub const DEFAULT_MAX_ALLOCATION: u64 = 256 * 1024 * 1024;
