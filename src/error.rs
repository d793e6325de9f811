//! # 错误类型模块
//!
//! 隐写编解码核心返回的全部错误。

use thiserror::Error;

/// 编解码操作的结果类型。
pub type Result<T> = std::result::Result<T, Error>;

/// 编解码过程中可能出现的错误。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// 载荷在当前 LSB 宽度下放不进图像。像素缓冲区保持不变。
    #[error(
        "Not enough space in the image to hide the payload. Required: {required_bits} bits, Available: {available_bits} bits. Choose a larger image or increase the LSBs to use"
    )]
    InsufficientCapacity {
        required_bits: u64,
        available_bits: u64,
    },

    /// 图像中没有任何完全不透明的像素，无法写入或读取头部。
    #[error("No fully opaque pixel found, the image cannot carry a header")]
    HeaderNotFound,

    /// 解码游标将越过像素缓冲区的末尾。
    #[error("Decoding exceeded image bounds, the image was likely not encoded by this tool or is truncated")]
    DecodeBoundsExceeded,

    /// 解码出的长度字段要求的分配超过了安全上限。
    #[error(
        "Refusing to allocate {requested} bytes while decoding (limit is {limit}), the image was likely not encoded by this tool"
    )]
    AllocationGuardTripped { requested: u64, limit: u64 },

    /// LSB 宽度不在 1..=8 范围内。
    #[error("Invalid LSB width {0}, expected a value between 1 and 8")]
    InvalidLsbWidth(u8),

    /// 像素缓冲区长度不是 RGBA 四元组的整数倍。
    #[error("Pixel buffer of {len} bytes is not a whole number of RGBA pixels")]
    MalformedPixelBuffer { len: usize },

    /// 配置无效。
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
