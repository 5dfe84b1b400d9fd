use crate::core::{PipelineState, StreamKind};
use parking_lot::{Condvar, Mutex};

/// 控制面标志位
#[derive(Debug, Clone, Copy, Default)]
struct Flags {
    started: bool,
    stopped: bool,
    paused: bool,
    done_reading: bool,
    /// 各流"等待首包"标志：置位时，该流下一个被消费的包
    /// 作为起播时间基准提交给下游（起播与 Seek 后重建基准）
    first_video: bool,
    first_audio: bool,
    /// 各流的解码线程是否已退出
    video_stopped: bool,
    audio_stopped: bool,
}

/// 播放控制 - 生产者/消费者共享的控制面
///
/// 所有标志位修改都在同一把互斥锁下进行，暂停用独立的条件变量：
/// 生产者和所有消费者观察到 paused 后阻塞在条件变量上，
/// resume/stop 广播唤醒全部等待者
pub struct PlaybackControl {
    flags: Mutex<Flags>,
    pause_cond: Condvar,
    has_video: bool,
    has_audio: bool,
}

impl PlaybackControl {
    pub fn new(has_video: bool, has_audio: bool) -> Self {
        Self {
            flags: Mutex::new(Flags {
                first_video: has_video,
                first_audio: has_audio,
                ..Flags::default()
            }),
            pause_cond: Condvar::new(),
            has_video,
            has_audio,
        }
    }

    /// 当前流水线状态
    pub fn state(&self) -> PipelineState {
        let flags = self.flags.lock();
        if flags.stopped {
            PipelineState::Stopped
        } else if flags.paused {
            PipelineState::Paused
        } else if flags.started {
            PipelineState::Running
        } else {
            PipelineState::Idle
        }
    }

    pub fn mark_started(&self) {
        self.flags.lock().started = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.flags.lock().stopped
    }

    pub fn is_paused(&self) -> bool {
        self.flags.lock().paused
    }

    pub fn is_done_reading(&self) -> bool {
        self.flags.lock().done_reading
    }

    /// 暂停：生产者和消费者在下一个检查点阻塞
    pub fn pause(&self) {
        self.flags.lock().paused = true;
    }

    /// 恢复：清除暂停标志并广播唤醒所有等待者
    pub fn resume(&self) {
        let mut flags = self.flags.lock();
        flags.paused = false;
        self.pause_cond.notify_all();
    }

    /// 停止（终态）。同时广播，让暂停中的线程也能退出
    pub fn request_stop(&self) {
        let mut flags = self.flags.lock();
        flags.stopped = true;
        flags.paused = false;
        self.pause_cond.notify_all();
    }

    /// 暂停期间阻塞调用线程；resume 或 stop 后返回
    pub fn wait_while_paused(&self) {
        let mut flags = self.flags.lock();
        while flags.paused && !flags.stopped {
            self.pause_cond.wait(&mut flags);
        }
    }

    /// 解封装源读取完毕（与用户停止不同：消费者排空队列后自然结束）
    pub fn set_done_reading(&self) {
        self.flags.lock().done_reading = true;
    }

    /// 取走某条流的"等待首包"标志。返回 true 表示当前包是起播基准
    pub fn take_first_frame(&self, stream: StreamKind) -> bool {
        let mut flags = self.flags.lock();
        let flag = match stream {
            StreamKind::Video => &mut flags.first_video,
            StreamKind::Audio => &mut flags.first_audio,
            StreamKind::Other => return false,
        };
        std::mem::take(flag)
    }

    /// 重新置位所有在用流的"等待首包"标志（Seek 后调用）
    pub fn reset_first_frames(&self) {
        let mut flags = self.flags.lock();
        flags.first_video = self.has_video;
        flags.first_audio = self.has_audio;
    }

    /// 标记某条流的解码线程已退出。
    /// 读取完毕且所有在用流都退出后，流水线隐式进入 Stopped
    pub fn mark_stream_stopped(&self, stream: StreamKind) {
        let mut flags = self.flags.lock();
        match stream {
            StreamKind::Video => flags.video_stopped = true,
            StreamKind::Audio => flags.audio_stopped = true,
            StreamKind::Other => return,
        }
        let all_stopped = (!self.has_video || flags.video_stopped)
            && (!self.has_audio || flags.audio_stopped);
        if all_stopped && flags.done_reading {
            flags.stopped = true;
            self.pause_cond.notify_all();
        }
    }
}
