use parking_lot::Mutex;
use std::time::Instant;

/// 硬件时钟控制接口
///
/// 流水线不实现音画同步算法，只消费一个共享的时钟基准：
/// 暂停/恢复通过 set_scale(0.0 / 1.0) 体现，Seek 通过 reset_reference 重建基准
pub trait ClockControl: Send + Sync {
    /// 当前播放时间（微秒）
    fn current_time(&self) -> i64;

    /// 设置时钟速率（1.0 = 正常，0.0 = 暂停）
    fn set_scale(&self, scale: f64);

    /// 重置时钟基准到指定时间戳（微秒），Seek 后调用
    fn reset_reference(&self, timestamp_us: i64);

    /// 停止时钟（停止后时间冻结）
    fn stop(&self);
}

/// 软件时钟 - ClockControl 的参考实现
///
/// 没有硬件时钟组件的环境（以及测试）使用它提供播放时间基准
pub struct SoftwareClock {
    inner: Mutex<ClockInner>,
}

struct ClockInner {
    base_pts: i64,         // 基准 PTS（微秒）
    base_instant: Instant, // 基准时刻
    scale: f64,            // 时钟速率（1.0 = 正常，0.0 = 暂停）
    running: bool,
}

impl SoftwareClock {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(ClockInner {
                base_pts: 0,
                base_instant: Instant::now(),
                scale: 0.0,
                running: true,
            }),
        }
    }

    fn now_unlocked(inner: &ClockInner) -> i64 {
        if !inner.running || inner.scale == 0.0 {
            inner.base_pts
        } else {
            let elapsed = inner.base_instant.elapsed().as_micros() as i64;
            inner.base_pts + (elapsed as f64 * inner.scale) as i64
        }
    }
}

impl ClockControl for SoftwareClock {
    fn current_time(&self) -> i64 {
        let inner = self.inner.lock();
        Self::now_unlocked(&inner)
    }

    fn set_scale(&self, scale: f64) {
        let mut inner = self.inner.lock();
        if !inner.running {
            return;
        }
        // 先把当前时间折算进基准，再切换速率，避免时间跳变
        inner.base_pts = Self::now_unlocked(&inner);
        inner.base_instant = Instant::now();
        inner.scale = scale;
    }

    fn reset_reference(&self, timestamp_us: i64) {
        let mut inner = self.inner.lock();
        inner.base_pts = timestamp_us;
        inner.base_instant = Instant::now();
    }

    fn stop(&self) {
        let mut inner = self.inner.lock();
        inner.base_pts = Self::now_unlocked(&inner);
        inner.running = false;
    }
}

impl Default for SoftwareClock {
    fn default() -> Self {
        Self::new()
    }
}
