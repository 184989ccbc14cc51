use klinesight_core::indicator::error::IndicatorError;
use serde::{Deserialize, Serialize};

/// # Summary
/// 固定容量的滚动窗口，保存最近 N 个数值并提供窗口统计。
///
/// # Invariants
/// - 内存空间在初始化时一次性分配，后续不再扩容。
/// - 始终保持最近 N 个数值。
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RollingWindow {
    // 内部存储容器
    data: Vec<f64>,
    // 最大容量
    capacity: usize,
    // 当前插入位置索引
    cursor: usize,
}

impl RollingWindow {
    /// # Summary
    /// 创建一个新的滚动窗口。
    ///
    /// # Arguments
    /// * `capacity`: 窗口长度。
    pub fn new(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
            cursor: 0,
        }
    }

    /// # Summary
    /// 推入新值。
    ///
    /// # Logic
    /// 1. 未满时直接 push。
    /// 2. 已满时覆盖 cursor 位置的最旧值，并递增（取模）cursor。
    pub fn push(&mut self, value: f64) {
        if self.capacity == 0 {
            return;
        }
        if self.data.len() < self.capacity {
            self.data.push(value);
        } else {
            self.data[self.cursor] = value;
            self.cursor = (self.cursor + 1) % self.capacity;
        }
    }

    /// 清空窗口，遇到缺失值时重新累积
    pub fn clear(&mut self) {
        self.data.clear();
        self.cursor = 0;
    }

    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.data.len() == self.capacity
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    /// 窗口均值，未满时为 None
    pub fn mean(&self) -> Option<f64> {
        self.is_full().then(|| self.sum() / len_f64(self.capacity))
    }

    /// 窗口最大值，未满时为 None
    pub fn max(&self) -> Option<f64> {
        if !self.is_full() {
            return None;
        }
        self.data.iter().copied().reduce(f64::max)
    }

    /// 窗口最小值，未满时为 None
    pub fn min(&self) -> Option<f64> {
        if !self.is_full() {
            return None;
        }
        self.data.iter().copied().reduce(f64::min)
    }

    /// # Summary
    /// 窗口总体标准差 (ddof = 0)。
    ///
    /// # Logic
    /// 1. 未满时返回 None。
    /// 2. 窗口内所有值相同时精确返回 0。
    /// 3. 否则按两遍法计算。
    pub fn std_pop(&self) -> Option<f64> {
        let mean = self.mean()?;
        if self.max() == self.min() {
            return Some(0.0);
        }
        let var = self
            .data
            .iter()
            .map(|v| (v - mean) * (v - mean))
            .sum::<f64>()
            / len_f64(self.capacity);
        Some(var.sqrt())
    }
}

/// usize 到 f64 的转换；窗口长度远小于 2^52，不会丢失精度
#[allow(clippy::cast_precision_loss)]
pub(crate) fn len_f64(n: usize) -> f64 {
    n as f64
}

/// 窗口长度为 0 时返回错误
pub(crate) fn check_window(indicator: &str, window: usize) -> Result<(), IndicatorError> {
    if window == 0 {
        return Err(IndicatorError::InvalidWindow {
            indicator: indicator.to_string(),
            window,
        });
    }
    Ok(())
}
