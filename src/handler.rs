//! # 命令处理逻辑模块
//!
//! 包含处理 `hide` 和 `recover` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心隐写算法以及向用户报告结果。

use crate::cli::{HideArgs, RecoverArgs};
use crate::config::{EncoderConfig, LsbWidth};
use crate::raster::{load_rgba, save_png};
use crate::steganography::{Decoder, Encoder, HiddenFile};
use anyhow::{Context, Result};
use colored::Colorize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取图像和待隐藏的文件、检查隐写空间是否足够、调用编码器写入全部文件，
/// 最后将结果保存为 PNG。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径和编码参数的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`。
/// * 两个待隐藏文件的文件名相同。
/// * 无法读取输入的图像或待隐藏的文件。
/// * 图像中没有足够的空间来隐藏这些文件。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let dest = args
        .dest
        .clone()
        .unwrap_or_else(|| default_hidden_image_path(&args.image));
    ensure_writable(&dest, args.force)?;

    let files = args
        .files
        .iter()
        .map(|path| read_hidden_file(path))
        .collect::<Result<Vec<_>>>()?;
    let mut names = HashSet::new();
    for file in &files {
        anyhow::ensure!(
            names.insert(file.name.as_str()),
            "Two files to hide share the name {}. \nRename one of them first.",
            file.name.red().bold()
        );
    }

    let mut picture = load_rgba(&args.image)?;
    let config = EncoderConfig {
        lsb_width: LsbWidth::new(args.lsbs)?,
        chunk_size_multiplier: args.chunk_size_multiplier,
        png_compression: args.compression,
    };
    let compression = config.png_compression;

    let mut stats = {
        let mut encoder = Encoder::with_config(&mut picture, config).with_context(|| {
            format!(
                "Unable to prepare {} for hiding files.",
                args.image.to_string_lossy().red().bold()
            )
        })?;
        encoder.encode_files(&files)?;
        encoder.stats()
    };

    let output_start = Instant::now();
    save_png(&picture, &dest, compression)?;
    stats.output_image_encoding = output_start.elapsed();

    log::info!("Encoder setup time: {:?}", stats.setup);
    log::info!("Data encode time: {:?}", stats.data_encoding);
    log::info!("Output image encode time: {:?}", stats.output_image_encoding);

    println!(
        "{} files have been successfully hidden and saved: {}",
        files.len().to_string().green().bold(),
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、调用解码器恢复全部隐藏文件，
/// 最后将它们写入输出目录。
///
/// # Arguments
///
/// * `args` - 包含输入图像和输出目录的 `RecoverArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像文件。
/// * 图像中没有隐藏数据或数据已损坏。
/// * 恢复出的文件已存在且未指定 `--force`。
/// * 两个隐藏文件的名称归结到同一个输出路径。
/// * 无法写入到输出目录。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let picture = load_rgba(&args.image)?;

    let mut decoder = Decoder::new(&picture).with_context(|| {
        format!(
            "Failed to read the header of '{}'. \nThe image contains no fully opaque pixel.",
            args.image.to_string_lossy().red().bold()
        )
    })?;
    let files = decoder.decode_files().with_context(|| {
        format!(
            "Failed to recover files from '{}'. \nThe image may not contain hidden files or is corrupted.",
            args.image.to_string_lossy().red().bold()
        )
    })?;
    log::info!("Data decode time: {:?}", decoder.stats().data_decoding);

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| default_recovered_dir(&args.image));

    let mut seen = HashSet::new();
    let targets = files
        .iter()
        .map(|file| -> Result<PathBuf> {
            let target = output_dir.join(sanitize_file_name(&file.name)?);
            anyhow::ensure!(
                seen.insert(target.clone()),
                "Two recovered files would both be written to {}.",
                target.to_string_lossy().red().bold()
            );
            ensure_writable(&target, args.force)?;
            Ok(target)
        })
        .collect::<Result<Vec<_>>>()?;

    fs::create_dir_all(&output_dir).with_context(|| {
        format!(
            "Unable to create output directory: {}",
            output_dir.to_string_lossy().red().bold()
        )
    })?;

    for (file, target) in files.iter().zip(&targets) {
        fs::write(target, &file.content).with_context(|| {
            format!(
                "Unable to write to target file: {}",
                target.to_string_lossy().red().bold()
            )
        })?;
        log::debug!("wrote {} ({} bytes)", target.display(), file.content.len());
    }

    println!(
        "{} files have been successfully recovered and saved: {}",
        files.len().to_string().green().bold(),
        output_dir.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 未指定输出路径时隐写结果的默认路径：输入图像旁的 `doctored_<名称>.png`。
pub fn default_hidden_image_path(image: &Path) -> PathBuf {
    image.with_file_name(format!("doctored_{}.png", file_stem(image)))
}

/// 未指定输出目录时的默认目录：图像旁的 `recovered_<名称>`。
pub fn default_recovered_dir(image: &Path) -> PathBuf {
    image.with_file_name(format!("recovered_{}", file_stem(image)))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string())
}

fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 读取一个待隐藏的文件，只保留文件名部分作为隐藏名称。
fn read_hidden_file(path: &Path) -> Result<HiddenFile> {
    let content = fs::read(path).with_context(|| {
        format!(
            "Unable to read file to hide: {}",
            path.to_string_lossy().red().bold()
        )
    })?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| {
            format!(
                "Not a file name: {}",
                path.to_string_lossy().red().bold()
            )
        })?;
    Ok(HiddenFile::new(name, content))
}

/// 把解码出的文件名限制为单个路径组件，防止写到输出目录之外。
fn sanitize_file_name(name: &str) -> Result<&str> {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    anyhow::ensure!(
        !base.is_empty() && base != "." && base != "..",
        "Recovered file has an unusable name: {}",
        name.red().bold()
    );
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let image = Path::new("/tmp/photos/cat.jpg");
        assert_eq!(
            default_hidden_image_path(image),
            PathBuf::from("/tmp/photos/doctored_cat.png")
        );
        assert_eq!(
            default_recovered_dir(image),
            PathBuf::from("/tmp/photos/recovered_cat")
        );
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("notes.txt").unwrap(), "notes.txt");
        assert_eq!(sanitize_file_name("../../etc/passwd").unwrap(), "passwd");
        assert_eq!(sanitize_file_name("dir\\evil.bat").unwrap(), "evil.bat");
        assert!(sanitize_file_name("").is_err());
        assert!(sanitize_file_name("..").is_err());
        assert!(sanitize_file_name("trailing/").is_err());
    }
}
