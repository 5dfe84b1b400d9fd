use crate::core::StreamKind;
use crate::player::control::PlaybackControl;
use crate::player::demux_thread::FIFO_RETRY_INTERVAL;
use crate::player::packet_queue::PacketQueue;
use crate::player::source::{DecodeSink, SubmitMode, SubmitStatus};
use log::{error, info};
use parking_lot::Mutex;
use std::process;
use std::sync::Arc;
use std::thread;

fn log_ctx() -> String {
    format!("[pid:{} tid:{:?}]", process::id(), thread::current().id())
}

/// 解码线程上下文（每条流一个）
pub(crate) struct DecodeContext {
    pub kind: StreamKind,
    pub queue: Arc<PacketQueue>,
    /// 下游的互斥锁同时充当本流的流锁：
    /// 消费者在 pop + submit 期间持有，Seek 协调器整段持有以独占两条流
    pub sink: Arc<Mutex<Box<dyn DecodeSink>>>,
    pub control: Arc<PlaybackControl>,
}

/// 解码循环（消费者，在独立线程中运行）
///
/// 轮询本流的数据包队列，把包交给解码下游。队列空时退避重试；
/// 读取完毕且队列已排空时自然结束；下游出错只终止本流线程
pub(crate) fn decode_loop(ctx: DecodeContext) {
    info!("{} 🎬 {}解码线程启动", log_ctx(), ctx.kind.as_str());

    let mut submitted: usize = 0;
    loop {
        if ctx.control.is_stopped() {
            break;
        }
        // 自然结束：源读完且本流队列已排空（与用户停止不同）
        if ctx.control.is_done_reading() && ctx.queue.is_empty() {
            info!(
                "{} 📄 {}流播放完毕（共提交 {} 个包）",
                log_ctx(),
                ctx.kind.as_str(),
                submitted
            );
            break;
        }
        ctx.control.wait_while_paused();
        if ctx.control.is_stopped() {
            break;
        }

        // 流锁盖住 pop + submit：Seek 期间不会有包越过冲刷点溜进下游
        let mut sink = ctx.sink.lock();
        let Some(packet) = ctx.queue.pop() else {
            drop(sink);
            thread::sleep(FIFO_RETRY_INTERVAL);
            continue;
        };

        // 起播/Seek 后的第一个包作为本流新的起播时间基准提交
        let mode = if ctx.control.take_first_frame(ctx.kind) {
            SubmitMode::StartOfStream
        } else {
            SubmitMode::Normal
        };

        let result = loop {
            match sink.submit(&packet, mode) {
                Ok(SubmitStatus::Accepted) => break Ok(()),
                Ok(SubmitStatus::Busy) => {
                    // 下游硬件缓冲暂不可用，有界退避后重试同一个包
                    if ctx.control.is_stopped() {
                        break Ok(());
                    }
                    thread::sleep(FIFO_RETRY_INTERVAL);
                }
                Err(e) => break Err(e),
            }
        };
        drop(sink);
        // 数据包所有权到此为止，无论提交结果如何都释放
        drop(packet);

        match result {
            Ok(()) => submitted += 1,
            Err(e) => {
                error!(
                    "{} ❌ {}流提交解码失败，结束本流线程: {}",
                    log_ctx(),
                    ctx.kind.as_str(),
                    e
                );
                break;
            }
        }
    }

    ctx.control.mark_stream_stopped(ctx.kind);
    info!("{} 🛑 {}解码线程退出", log_ctx(), ctx.kind.as_str());
}
