use crate::core::{MediaInfo, Packet, Result};

/// 解封装数据源抽象接口
///
/// 这个 trait 定义了所有解封装实现必须提供的方法。
/// 不同的媒体源（本地文件、内存流、硬件解封装器等）可以实现这个接口
pub trait DemuxSource: Send {
    /// 读取下一个数据包
    ///
    /// 返回：
    /// - Ok(Some(packet)): 成功读取一个包
    /// - Ok(None): 到达流末尾
    /// - Err(e): 读取错误
    fn next_frame(&mut self) -> Result<Option<Packet>>;

    /// Seek 到指定位置（微秒）
    fn seek(&mut self, position_us: i64) -> Result<()>;

    /// 获取媒体信息
    fn media_info(&self) -> &MediaInfo;

    /// 是否包含视频流
    fn has_video(&self) -> bool;

    /// 是否包含音频流
    fn has_audio(&self) -> bool;

    /// 查询容器元数据（标题、作者等）
    fn metadata(&self, key: &str) -> Option<String>;

    /// 获取描述信息（用于调试）
    fn description(&self) -> String;
}

/// 数据包提交模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMode {
    /// 普通数据包
    Normal,
    /// 该流（重新）起播后的第一个数据包，下游以它重建起播时间基准
    StartOfStream,
}

/// 数据包提交结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitStatus {
    /// 已接收
    Accepted,
    /// 下游缓冲暂不可用，稍后重试（数据包未被消费）
    Busy,
}

/// 解码下游抽象接口（每条流一个）
///
/// submit 可能因等待硬件缓冲而阻塞；返回 Err 视为该流不可恢复，
/// 只会终止这一条流的解码线程，不影响兄弟流
pub trait DecodeSink: Send {
    /// 提交一个数据包用于解码/渲染
    fn submit(&mut self, packet: &Packet, mode: SubmitMode) -> Result<SubmitStatus>;

    /// 冲刷下游在途的硬件缓冲（Seek/停止时调用）
    fn flush(&mut self) -> Result<()>;
}
