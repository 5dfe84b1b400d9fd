use crate::core::{
    ClockControl, MediaInfo, PipelineState, PlayerError, QueueStats, Result,
};
use crate::core::StreamKind;
use crate::player::control::PlaybackControl;
use crate::player::decode_thread::{decode_loop, DecodeContext};
use crate::player::demux_thread::{demux_loop, DemuxContext};
use crate::player::packet_queue::PacketQueue;
use crate::player::source::{DecodeSink, DemuxSource};
use log::{error, info, warn};
use parking_lot::Mutex;
use std::process;
use std::sync::Arc;
use std::thread;

fn log_ctx() -> String {
    format!("[pid:{} tid:{:?}]", process::id(), thread::current().id())
}

/// 流水线配置
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// 每条队列的字节预算（缓冲字节总量硬上限）
    pub byte_budget: usize,
    /// 每条队列的初始槽位数，同时也是扩容增量
    pub initial_slots: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            byte_budget: 1024 * 1024 * 5, // 每条流 5 MiB 压缩数据，约数秒缓冲
            initial_slots: 1000,
        }
    }
}

/// 播放流水线 - 整体控制解封装/解码线程与队列
///
/// 一个解封装线程（生产者）+ 每条在用流一个解码线程（消费者），
/// 通过共享的 PlaybackControl 控制面协调暂停/停止/Seek。
/// 队列、控制标志、线程句柄都归流水线对象所有，没有进程级全局状态
pub struct Pipeline {
    control: Arc<PlaybackControl>,
    source: Arc<Mutex<Box<dyn DemuxSource>>>,
    clock: Arc<dyn ClockControl>,
    media_info: MediaInfo,

    video_queue: Option<Arc<PacketQueue>>,
    audio_queue: Option<Arc<PacketQueue>>,
    video_sink: Option<Arc<Mutex<Box<dyn DecodeSink>>>>,
    audio_sink: Option<Arc<Mutex<Box<dyn DecodeSink>>>>,

    demux_thread: Option<thread::JoinHandle<()>>,
    video_decode_thread: Option<thread::JoinHandle<()>>,
    audio_decode_thread: Option<thread::JoinHandle<()>>,
    started: bool,
}

impl Pipeline {
    /// 打开流水线：按源的流布局分配队列，但不启动线程
    ///
    /// 每条在用流需要源报告该流存在且提供了对应的下游；
    /// 音视频流一条都没有时打开失败（结构性错误）
    pub fn open(
        source: Box<dyn DemuxSource>,
        video_sink: Option<Box<dyn DecodeSink>>,
        audio_sink: Option<Box<dyn DecodeSink>>,
        clock: Arc<dyn ClockControl>,
        config: PipelineConfig,
    ) -> Result<Self> {
        info!("{} 🎮 打开播放流水线: {}", log_ctx(), source.description());

        let has_video = source.has_video() && video_sink.is_some();
        let has_audio = source.has_audio() && audio_sink.is_some();
        if !has_video && !has_audio {
            error!("{} ❌ 源中既没有可用的音频流也没有视频流", log_ctx());
            return Err(PlayerError::NoStreams);
        }

        let media_info = source.media_info().clone();
        info!("{} 媒体信息: {:?}", log_ctx(), media_info);

        let make_queue = || Arc::new(PacketQueue::with_slots(config.byte_budget, config.initial_slots));
        Ok(Self {
            control: Arc::new(PlaybackControl::new(has_video, has_audio)),
            source: Arc::new(Mutex::new(source)),
            clock,
            media_info,
            video_queue: has_video.then(make_queue),
            audio_queue: has_audio.then(make_queue),
            video_sink: if has_video {
                video_sink.map(|s| Arc::new(Mutex::new(s)))
            } else {
                None
            },
            audio_sink: if has_audio {
                audio_sink.map(|s| Arc::new(Mutex::new(s)))
            } else {
                None
            },
            demux_thread: None,
            video_decode_thread: None,
            audio_decode_thread: None,
            started: false,
        })
    }

    /// 启动播放线程并让时钟开始走动
    pub fn start(&mut self) -> Result<()> {
        if self.started {
            return Err(PlayerError::AlreadyStarted);
        }
        if self.control.is_stopped() {
            return Err(PlayerError::Stopped);
        }
        self.started = true;
        self.control.mark_started();

        // 解封装线程（生产者）
        let demux_ctx = DemuxContext {
            source: self.source.clone(),
            control: self.control.clone(),
            video_queue: self.video_queue.clone(),
            audio_queue: self.audio_queue.clone(),
        };
        self.demux_thread = Some(thread::spawn(move || demux_loop(demux_ctx)));

        // 每条在用流一个解码线程（消费者）
        if let (Some(queue), Some(sink)) = (&self.video_queue, &self.video_sink) {
            let ctx = DecodeContext {
                kind: StreamKind::Video,
                queue: queue.clone(),
                sink: sink.clone(),
                control: self.control.clone(),
            };
            self.video_decode_thread = Some(thread::spawn(move || decode_loop(ctx)));
        }
        if let (Some(queue), Some(sink)) = (&self.audio_queue, &self.audio_sink) {
            let ctx = DecodeContext {
                kind: StreamKind::Audio,
                queue: queue.clone(),
                sink: sink.clone(),
                control: self.control.clone(),
            };
            self.audio_decode_thread = Some(thread::spawn(move || decode_loop(ctx)));
        }

        self.clock.set_scale(1.0);
        info!("{} ✅ 播放线程已启动", log_ctx());
        Ok(())
    }

    /// 暂停：时钟速率归零，生产者和消费者在下一个检查点阻塞
    pub fn pause(&self) {
        if self.control.is_stopped() {
            return;
        }
        info!("{} ⏸️  暂停", log_ctx());
        self.clock.set_scale(0.0);
        self.control.pause();
    }

    /// 恢复：广播唤醒所有阻塞的线程并恢复时钟
    pub fn resume(&self) {
        if self.control.is_stopped() {
            return;
        }
        info!("{} ▶️  恢复播放", log_ctx());
        self.control.resume();
        self.clock.set_scale(1.0);
    }

    /// 停止播放（终态，不可恢复；重新播放需要重新 open）
    ///
    /// 停止是协作式的：线程在各自的循环检查点观察到标志后退出，
    /// 可能再完成最多一次 push/pop/提交
    pub fn stop(&mut self) {
        info!("{} ⏹️  停止播放", log_ctx());
        self.control.request_stop();

        if let Some(thread) = self.demux_thread.take() {
            let _ = thread.join();
            info!("{} ✅ 解封装线程已结束", log_ctx());
        }
        if let Some(thread) = self.video_decode_thread.take() {
            let _ = thread.join();
            info!("{} ✅ 视频解码线程已结束", log_ctx());
        }
        if let Some(thread) = self.audio_decode_thread.take() {
            let _ = thread.join();
            info!("{} ✅ 音频解码线程已结束", log_ctx());
        }

        self.clock.stop();

        // 清空队列，释放缓冲的数据包
        if let Some(queue) = &self.video_queue {
            queue.flush();
        }
        if let Some(queue) = &self.audio_queue {
            queue.flush();
        }
        info!("{} ✅ 停止播放完成，所有线程已清理", log_ctx());
    }

    /// ==================== Seek 协调 ====================
    ///
    /// 同步执行的破坏性 Seek，步骤：
    /// 1. 独占两条流的流锁（比暂停更粗的持锁，挡住消费者的 pop/提交）
    /// 2. 冲刷两个下游的在途硬件缓冲
    /// 3. 清空两条数据包队列 —— 已缓冲未解码的数据在 Seek 时丢弃，属预期
    /// 4. 对解封装源执行 Seek
    /// 5. 重新置位各流"等待首包"标志并重置时钟基准
    /// 6. 释放流锁
    ///
    /// 第 4 步失败会作为错误返回给调用方；队列无论如何都已清空，
    /// 继续播放还是停止由调用方决定（刻意保留的部分失败状态，不自动恢复）
    pub fn seek(&self, position_us: i64) -> Result<()> {
        info!("{} 🎯 Seek 到: {} us", log_ctx(), position_us);

        // 1. 流锁
        let mut video_hold = self.video_sink.as_ref().map(|s| s.lock());
        let mut audio_hold = self.audio_sink.as_ref().map(|s| s.lock());

        // 2. 冲刷下游（失败只降级，不中断 Seek）
        if let Some(sink) = video_hold.as_deref_mut() {
            if let Err(e) = sink.flush() {
                warn!("{} ⚠️ 冲刷视频下游失败: {}", log_ctx(), e);
            }
        }
        if let Some(sink) = audio_hold.as_deref_mut() {
            if let Err(e) = sink.flush() {
                warn!("{} ⚠️ 冲刷音频下游失败: {}", log_ctx(), e);
            }
        }

        // 3. 清空队列
        let mut discarded = 0;
        if let Some(queue) = &self.video_queue {
            discarded += queue.len();
            queue.flush();
        }
        if let Some(queue) = &self.audio_queue {
            discarded += queue.len();
            queue.flush();
        }
        if discarded > 0 {
            info!("{} 🧹 Seek 丢弃 {} 个缓冲数据包", log_ctx(), discarded);
        }

        // 4. 源 Seek
        let seek_result = self.source.lock().seek(position_us);

        // 5. 重建起播基准（即使源 Seek 失败也重置，状态与已清空的队列保持一致）
        self.control.reset_first_frames();
        self.clock.reset_reference(position_us);

        // 6. 释放流锁（hold 随作用域结束释放）
        drop(video_hold);
        drop(audio_hold);

        match seek_result {
            Ok(()) => {
                info!("{} ✅ Seek 完成: {} us", log_ctx(), position_us);
                Ok(())
            }
            Err(e) => {
                error!("{} ❌ Seek 失败: {}", log_ctx(), e);
                Err(PlayerError::SeekError(e.to_string()))
            }
        }
    }

    /// 当前播放时间（微秒），来自共享时钟基准
    pub fn current_time(&self) -> i64 {
        self.clock.current_time()
    }

    /// 查询容器元数据
    pub fn metadata(&self, key: &str) -> Option<String> {
        self.source.lock().metadata(key)
    }

    /// 当前流水线状态
    pub fn state(&self) -> PipelineState {
        self.control.state()
    }

    pub fn media_info(&self) -> &MediaInfo {
        &self.media_info
    }

    /// 队列缓冲状态（用于监控和调试）
    pub fn queue_stats(&self) -> QueueStats {
        let mut stats = QueueStats::default();
        if let Some(queue) = &self.video_queue {
            stats.video_packets = queue.len();
            stats.video_bytes = queue.byte_total();
        }
        if let Some(queue) = &self.audio_queue {
            stats.audio_packets = queue.len();
            stats.audio_bytes = queue.byte_total();
        }
        stats
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        if self.demux_thread.is_some()
            || self.video_decode_thread.is_some()
            || self.audio_decode_thread.is_some()
        {
            warn!(
                "{} ⚠ Pipeline 被 drop 但未调用 stop()，正在尝试优雅停止",
                log_ctx()
            );
            self.stop();
        }
    }
}
