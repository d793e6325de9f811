//! # 统计模块
//!
//! 编码和解码各阶段的耗时。

use std::time::Duration;

/// 编码各阶段的耗时。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeStats {
    /// 构造编码器 (包括写入头部) 的耗时。
    pub setup: Duration,
    /// 累计写入载荷数据的耗时。
    pub data_encoding: Duration,
    /// 生成输出图像的耗时，由调用方填写。
    pub output_image_encoding: Duration,
}

/// 解码耗时。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
    pub data_decoding: Duration,
}
