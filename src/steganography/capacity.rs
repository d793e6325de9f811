//! 容量规划：在修改任何像素之前，确认载荷能够完整放进图像。

use crate::config::LsbWidth;
use crate::constants::{ALPHA_OFFSET, BYTES_PER_PIXEL, CHANNELS_PER_PIXEL, OPAQUE_ALPHA};
use crate::error::{Error, Result};
use std::thread;

/// 一次容量检查的结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityPlan {
    pub opaque_pixels: u64,
    /// 头部之后仍可使用的位数。
    pub available_bits: u64,
    pub required_bits: u64,
}

impl CapacityPlan {
    pub fn fits(&self) -> bool {
        self.required_bits <= self.available_bits
    }
}

pub fn count_opaque_pixels(pixels: &[u8]) -> u64 {
    pixels
        .chunks_exact(BYTES_PER_PIXEL)
        .filter(|pixel| pixel[ALPHA_OFFSET] == OPAQUE_ALPHA)
        .count() as u64
}

/// 图像在给定宽度下的总容量 (位)，不含头部像素。
pub fn available_bits(opaque_pixels: u64, lsb_width: LsbWidth) -> u64 {
    opaque_pixels.saturating_sub(1) * CHANNELS_PER_PIXEL as u64 * lsb_width.get() as u64
}

/// 扫描不透明像素的同时计算载荷字节数，两者汇合后比较容量。
///
/// `consumed_bits` 是本会话此前已经写入的位数。
///
/// # Errors
///
/// 载荷放不下时返回 [`Error::InsufficientCapacity`]。
pub fn plan<F>(
    pixels: &[u8],
    lsb_width: LsbWidth,
    consumed_bits: u64,
    payload_len: F,
) -> Result<CapacityPlan>
where
    F: FnOnce() -> u64,
{
    let (opaque_pixels, payload_bytes) = scan(pixels, payload_len);
    check(opaque_pixels, lsb_width, consumed_bits, payload_bytes)
}

/// 在独立线程中统计不透明像素，同时在调用线程上执行 `payload_len`，
/// 两者都完成后才返回 `(不透明像素数, 载荷字节数)`。
pub fn scan<F>(pixels: &[u8], payload_len: F) -> (u64, u64)
where
    F: FnOnce() -> u64,
{
    thread::scope(|scope| {
        let scan = scope.spawn(|| count_opaque_pixels(pixels));
        let payload_bytes = payload_len();
        let opaque_pixels = scan
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
        (opaque_pixels, payload_bytes)
    })
}

/// 已知不透明像素数量时的容量检查，不再扫描缓冲区。
///
/// # Errors
///
/// 载荷放不下时返回 [`Error::InsufficientCapacity`]。
pub fn check(
    opaque_pixels: u64,
    lsb_width: LsbWidth,
    consumed_bits: u64,
    payload_bytes: u64,
) -> Result<CapacityPlan> {
    let plan = CapacityPlan {
        opaque_pixels,
        available_bits: available_bits(opaque_pixels, lsb_width).saturating_sub(consumed_bits),
        required_bits: payload_bytes.saturating_mul(8),
    };
    log::debug!(
        "capacity plan: {} opaque pixels, {} bits available, {} bits required",
        plan.opaque_pixels,
        plan.available_bits,
        plan.required_bits
    );

    if !plan.fits() {
        return Err(Error::InsufficientCapacity {
            required_bits: plan.required_bits,
            available_bits: plan.available_bits,
        });
    }
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(alphas: &[u8]) -> Vec<u8> {
        alphas.iter().flat_map(|&a| [0, 0, 0, a]).collect()
    }

    #[test]
    fn test_count_opaque_pixels() {
        assert_eq!(count_opaque_pixels(&image(&[255, 0, 255, 254, 255])), 3);
        assert_eq!(count_opaque_pixels(&[]), 0);
    }

    #[test]
    fn test_available_bits_excludes_header() {
        let width = LsbWidth::new(2).unwrap();
        assert_eq!(available_bits(0, width), 0);
        assert_eq!(available_bits(1, width), 0);
        assert_eq!(available_bits(5, width), 4 * 3 * 2);
    }

    #[test]
    fn test_plan_boundary() {
        // 9 个不透明像素，宽度 1：8 * 3 = 24 位 = 3 字节
        let pixels = image(&[255; 9]);
        let width = LsbWidth::new(1).unwrap();

        let exact = plan(&pixels, width, 0, || 3).unwrap();
        assert_eq!(exact.available_bits, 24);
        assert_eq!(exact.required_bits, 24);
        assert_eq!(exact.opaque_pixels, 9);

        assert_eq!(
            plan(&pixels, width, 0, || 4),
            Err(Error::InsufficientCapacity {
                required_bits: 32,
                available_bits: 24
            })
        );
    }

    #[test]
    fn test_plan_accounts_for_consumed_bits() {
        let pixels = image(&[255; 9]);
        let width = LsbWidth::new(1).unwrap();

        assert!(plan(&pixels, width, 8, || 2).is_ok());
        assert!(plan(&pixels, width, 9, || 2).is_err());
    }

    #[test]
    fn test_check_matches_plan() {
        let pixels = image(&[255, 0, 255, 255, 255]);
        let width = LsbWidth::new(4).unwrap();
        assert_eq!(
            check(4, width, 5, 2),
            plan(&pixels, width, 5, || 2)
        );
        assert!(check(4, width, 30, 1).is_err());
        assert_eq!(scan(&pixels, || 7), (4, 7));
    }
}
