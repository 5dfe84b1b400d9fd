use serde::{Deserialize, Serialize};

/// 流类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamKind {
    Video,
    Audio,
    /// 字幕/数据等不参与解码流水线的流
    Other,
}

impl StreamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamKind::Video => "视频",
            StreamKind::Audio => "音频",
            StreamKind::Other => "其他",
        }
    }
}

/// 数据包 - 解封装后的一帧压缩数据（可跨线程传递）
///
/// 入队后不可变。所有权单向转移：
/// 生产者（解封装线程）→ 队列 → 消费者（解码线程），消费者提交后释放
#[derive(Debug, Clone)]
pub struct Packet {
    /// 压缩数据载荷（对流水线不透明）
    pub payload: Vec<u8>,
    /// 解封装器申报的字节大小
    ///
    /// 正常情况等于 payload.len()。个别解封装器会给出负值，
    /// 这类包按无操作跳过（不视为错误，也不入队）
    pub size: i64,
    /// 目标流
    pub stream: StreamKind,
    /// 显示时间戳（微秒）
    pub pts: i64,
}

impl Packet {
    pub fn new(stream: StreamKind, pts: i64, payload: Vec<u8>) -> Self {
        let size = payload.len() as i64;
        Self {
            payload,
            size,
            stream,
            pts,
        }
    }
}

/// 流水线状态
///
/// Idle → Running → {Paused ⇄ Running} → Stopped（终态）
/// Stopped 也可在读取完毕且所有队列排空后隐式到达
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineState {
    Idle,
    Running,
    Paused,
    Stopped,
}

/// 媒体信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaInfo {
    pub duration: i64, // 总时长（微秒）
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub video_codec: String,
    pub audio_codec: String,
    pub sample_rate: u32,
    pub channels: u16,
}

impl Default for MediaInfo {
    fn default() -> Self {
        Self {
            duration: 0,
            width: 0,
            height: 0,
            fps: 0.0,
            video_codec: String::new(),
            audio_codec: String::new(),
            sample_rate: 0,
            channels: 0,
        }
    }
}

/// 缓冲状态信息（用于监控和调试）
#[derive(Debug, Clone, Default)]
pub struct QueueStats {
    /// 视频数据包队列长度
    pub video_packets: usize,

    /// 视频队列缓冲字节数
    pub video_bytes: usize,

    /// 音频数据包队列长度
    pub audio_packets: usize,

    /// 音频队列缓冲字节数
    pub audio_bytes: usize,
}
