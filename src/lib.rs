//! # lsb_stow 库
//!
//! 本库包含 LSB 隐写工具的核心逻辑：把任意文件隐藏在 RGBA 图像不透明像素的
//! R、G、B 通道最低有效位中，并在之后恢复。
//!
//! ```rust
//! use lsb_stow::steganography::{Decoder, Encoder, HiddenFile};
//!
//! // 16 x 16 的全不透明图像
//! let mut pixels: Vec<u8> = (0..256).flat_map(|_| [90, 120, 200, 255]).collect();
//! let files = vec![HiddenFile::new("secret.txt", b"Hidden data".to_vec())];
//!
//! Encoder::new(&mut pixels, 2)?.encode_files(&files)?;
//!
//! let mut decoder = Decoder::new(&pixels)?;
//! assert_eq!(decoder.lsb_width().get(), 2);
//! assert_eq!(decoder.decode_files()?, files);
//! # Ok::<(), lsb_stow::Error>(())
//! ```

// 声明库包含的所有模块。

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod handler;
pub mod raster;
pub mod stats;
pub mod steganography;

pub use config::{DecoderConfig, EncoderConfig, LsbWidth, PngCompression};
pub use error::{Error, Result};
pub use steganography::{Cursor, Decoder, Encoder, HiddenFile};
