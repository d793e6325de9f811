//! # 隐写核心模块
//!
//! 在 RGBA 像素的 R、G、B 通道最低有效位中隐藏任意文件。
//!
//! * [`bits`]：按 LSB 优先顺序的位流读取与通道位操作。
//! * [`walker`]：跳过非不透明像素的遍历策略与会话游标。
//! * [`header`]：写入第一个不透明像素的自描述头部。
//! * [`capacity`]：写入前的容量检查。
//! * [`payload`]：文件目录的线上格式。
//! * [`Encoder`] / [`Decoder`]：组合以上部分完成编码与解码。

pub mod bits;
pub mod capacity;
mod decoder;
mod encoder;
pub mod header;
pub mod payload;
pub mod walker;

pub use decoder::Decoder;
pub use encoder::Encoder;
pub use payload::HiddenFile;
pub use walker::Cursor;

use crate::constants::BYTES_PER_PIXEL;
use crate::error::{Error, Result};

fn check_pixel_buffer(pixels: &[u8]) -> Result<()> {
    if pixels.len() % BYTES_PER_PIXEL != 0 {
        return Err(Error::MalformedPixelBuffer { len: pixels.len() });
    }
    Ok(())
}
