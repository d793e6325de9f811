//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use crate::config::PngCompression;
use crate::constants::{DEFAULT_CHUNK_SIZE_MULTIPLIER, DEFAULT_LSB_WIDTH};
use clap::Parser;
use std::path::PathBuf;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在图像的不透明像素中隐藏或恢复任意文件。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在图像的不透明像素中隐藏或恢复任意文件。结果始终保存为 PNG。"
)]
pub struct Cli {
    /// 输出调试日志。
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：hide (隐藏) 和 recover (恢复)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 把一个或多个文件隐藏到图像中，并保存为 PNG。
    Hide(HideArgs),

    /// 从经过隐写的图像中恢复全部隐藏文件。
    Recover(RecoverArgs),
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 用于隐写的输入图像文件路径 (PNG, JPEG, BMP, TIFF, WebP, QOI)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的文件，可以用逗号分隔，也可以多次指定。
    #[arg(short, long, required = true, num_args = 1.., value_delimiter = ',')]
    pub files: Vec<PathBuf>,

    /// 隐写完成后保存结果图像的路径。默认为输入图像旁的 `doctored_<名称>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 每个颜色通道使用的最低有效位数 (1-8)。位数越多容量越大，图像失真也越明显。
    #[arg(short, long, default_value_t = DEFAULT_LSB_WIDTH, value_parser = clap::value_parser!(u8).range(1..=8))]
    pub lsbs: u8,

    /// 暂存块大小倍数，只影响内存占用。
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE_MULTIPLIER)]
    pub chunk_size_multiplier: usize,

    /// 输出 PNG 的压缩级别。
    #[arg(long, value_enum, default_value_t = PngCompression::Default)]
    pub compression: PngCompression,

    /// 目标文件已存在时强制覆盖。
    #[arg(long)]
    pub force: bool,
}

/// 'recover' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RecoverArgs {
    /// 已隐藏文件的图像路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 保存恢复文件的目录。默认为图像旁的 `recovered_<名称>` 目录。
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// 恢复出的文件已存在时强制覆盖。
    #[arg(long)]
    pub force: bool,
}
