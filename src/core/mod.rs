// 核心模块 - 基础类型、错误与时钟

pub mod clock;
pub mod error;
pub mod types;

pub use clock::{ClockControl, SoftwareClock};
pub use error::{PlayerError, Result};
pub use types::{MediaInfo, Packet, PipelineState, QueueStats, StreamKind};
