//! # 图像读写模块
//!
//! 把压缩图像文件解码为 RGBA8 像素缓冲区，并把修改后的缓冲区写成 PNG。
//! 输出始终是无损的 PNG，否则隐藏的位会在重新压缩时丢失。

use crate::config::PngCompression;
use anyhow::{Context, Result};
use colored::Colorize;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// 读取任意受支持格式的图像，并转换为每通道 8 位的 RGBA。
///
/// # Errors
///
/// 文件无法打开或不是受支持的图像格式时返回错误。
pub fn load_rgba(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path).with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;
    Ok(image.to_rgba8())
}

/// 以指定压缩级别把 RGBA 图像写成 PNG。
///
/// # Errors
///
/// 目标文件无法创建或 PNG 编码失败时返回错误。
pub fn save_png(image: &RgbaImage, path: &Path, compression: PngCompression) -> Result<()> {
    let file = File::create(path).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;

    let compression = match compression {
        PngCompression::Default => CompressionType::Default,
        PngCompression::Fast => CompressionType::Fast,
        PngCompression::Best => CompressionType::Best,
        PngCompression::None => CompressionType::Uncompressed,
    };
    let mut writer = BufWriter::new(file);
    PngEncoder::new_with_quality(&mut writer, compression, FilterType::Adaptive)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
        .with_context(|| {
            format!(
                "Failed to encode PNG image: {}",
                path.to_string_lossy().red().bold()
            )
        })?;
    writer.flush().with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            path.to_string_lossy().red().bold()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::tempdir;

    #[test]
    fn test_png_round_trip_is_lossless() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("pixels.png");
        let image = RgbaImage::from_fn(7, 5, |x, y| {
            Rgba([x as u8 * 31, y as u8 * 47, (x + y) as u8, if x == 3 { 128 } else { 255 }])
        });

        for compression in [
            PngCompression::Default,
            PngCompression::Fast,
            PngCompression::Best,
            PngCompression::None,
        ] {
            save_png(&image, &path, compression)?;
            assert_eq!(load_rgba(&path)?, image);
        }
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let err = load_rgba(Path::new("definitely/not/here.png")).unwrap_err();
        assert!(err.to_string().contains("Unable to read image file"));
    }
}
