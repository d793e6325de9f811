//! 文件目录的线上格式：
//!
//! ```text
//! fileCount:  8 字节 (u64 大端序)
//! 重复 fileCount 次:
//!   nameLen:    8 字节
//!   name:       nameLen 字节
//!   contentLen: 8 字节
//!   content:    contentLen 字节
//! ```

use crate::constants::LENGTH_FIELD_BYTES;

/// 一个被隐藏 (或恢复) 的文件。编码顺序即解码顺序。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiddenFile {
    pub name: String,
    pub content: Vec<u8>,
}

impl HiddenFile {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// 该文件在目录格式中占用的字节数。
    pub fn framed_len(&self) -> u64 {
        2 * LENGTH_FIELD_BYTES as u64 + self.name.len() as u64 + self.content.len() as u64
    }
}

/// 目录格式中的一个连续片段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Length([u8; LENGTH_FIELD_BYTES]),
    Bytes(&'a [u8]),
}

impl Segment<'_> {
    fn length(value: u64) -> Self {
        Segment::Length(value.to_be_bytes())
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Segment::Length(bytes) => bytes,
            Segment::Bytes(bytes) => bytes,
        }
    }
}

/// 整个目录编码后的字节数。
pub fn framed_len(files: &[HiddenFile]) -> u64 {
    files
        .iter()
        .fold(LENGTH_FIELD_BYTES as u64, |total, file| {
            total.saturating_add(file.framed_len())
        })
}

/// 按编码顺序列出目录的各个片段，不复制文件内容。
pub fn segments(files: &[HiddenFile]) -> impl Iterator<Item = Segment<'_>> {
    std::iter::once(Segment::length(files.len() as u64)).chain(files.iter().flat_map(|file| {
        [
            Segment::length(file.name.len() as u64),
            Segment::Bytes(file.name.as_bytes()),
            Segment::length(file.content.len() as u64),
            Segment::Bytes(&file.content),
        ]
    }))
}
