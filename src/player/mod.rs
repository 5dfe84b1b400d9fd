// 播放流水线模块 - 队列、控制面与线程编排

pub mod control;
pub mod packet_queue;
pub mod pipeline;
pub mod source;

mod decode_thread;
mod demux_thread;

pub use control::PlaybackControl;
pub use packet_queue::{PacketQueue, PushResult};
pub use pipeline::{Pipeline, PipelineConfig};
pub use source::{DecodeSink, DemuxSource, SubmitMode, SubmitStatus};
