//! 硬件加速播放器的流水线核心
//!
//! 一个解封装线程（生产者）把数据包分拣进按流划分的有界队列，
//! 每条在用流一个解码线程（消费者）把包喂给解码下游；
//! 暂停/停止/Seek 通过共享控制面协调。解封装源与解码下游
//! 通过 [`player::DemuxSource`] / [`player::DecodeSink`] 接入，
//! 核心本身不绑定具体的容器格式或解码硬件

pub mod core;
pub mod player;

pub use crate::core::{
    ClockControl, MediaInfo, Packet, PipelineState, PlayerError, QueueStats, Result,
    SoftwareClock, StreamKind,
};
pub use crate::player::{
    DecodeSink, DemuxSource, PacketQueue, Pipeline, PipelineConfig, PlaybackControl, PushResult,
    SubmitMode, SubmitStatus,
};
