use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("无法打开媒体源: {0}")]
    OpenError(String),

    #[error("无法找到音频或视频流")]
    NoStreams,

    #[error("解封装错误: {0}")]
    DemuxError(String),

    #[error("Seek 失败: {0}")]
    SeekError(String),

    #[error("解码下游错误: {0}")]
    SinkError(String),

    #[error("流水线已经启动")]
    AlreadyStarted,

    #[error("流水线已停止")]
    Stopped,

    #[error("其他错误: {0}")]
    Other(String),

    #[error("Anyhow 错误: {0}")]
    AnyhowError(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PlayerError>;
