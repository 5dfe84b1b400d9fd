use crate::core::{Packet, StreamKind};
use crate::player::control::PlaybackControl;
use crate::player::packet_queue::{PacketQueue, PushResult};
use crate::player::source::DemuxSource;
use log::{debug, error, info};
use parking_lot::Mutex;
use std::process;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn log_ctx() -> String {
    format!("[pid:{} tid:{:?}]", process::id(), thread::current().id())
}

/// 队列满/空时的重试间隔（有界轮询退避，不是忙等）
pub(crate) const FIFO_RETRY_INTERVAL: Duration = Duration::from_millis(10);

/// 解封装线程上下文
pub(crate) struct DemuxContext {
    pub source: Arc<Mutex<Box<dyn DemuxSource>>>,
    pub control: Arc<PlaybackControl>,
    pub video_queue: Option<Arc<PacketQueue>>,
    pub audio_queue: Option<Arc<PacketQueue>>,
}

/// 解封装循环（生产者，在独立线程中运行）
///
/// 不断从源读取数据包，按流分拣进对应队列；队列满时退避重试，
/// 形成对源的背压。读到流末尾或源出错时置 done_reading 后退出，
/// 让消费者排空队列后自然结束
pub(crate) fn demux_loop(ctx: DemuxContext) {
    info!(
        "{} 🎬 解封装线程启动: {}",
        log_ctx(),
        ctx.source.lock().description()
    );

    let mut packet_count: usize = 0;
    while !ctx.control.is_stopped() {
        // 锁的持有范围只盖住一次读取，Seek 协调器可以在包间隙拿到源
        let next = ctx.source.lock().next_frame();
        match next {
            Ok(Some(packet)) => {
                packet_count += 1;
                if !enqueue_packet(&ctx, packet) {
                    break;
                }
            }
            Ok(None) => {
                info!("{} 📄 读取完毕，共处理 {} 个包", log_ctx(), packet_count);
                ctx.control.set_done_reading();
                break;
            }
            Err(e) => {
                error!(
                    "{} ❌ 读取数据包失败: {}（已处理 {} 个包）",
                    log_ctx(),
                    e,
                    packet_count
                );
                // 源出错按读取结束处理：消费者排空后自然结束，不拖垮整条流水线
                ctx.control.set_done_reading();
                break;
            }
        }
    }

    info!("{} 🛑 解封装线程退出（共读取 {} 个包）", log_ctx(), packet_count);
}

/// 将数据包分拣进目标队列，队列满时退避重试。
/// 返回 false 表示重试期间收到停止信号，读取循环应当退出
fn enqueue_packet(ctx: &DemuxContext, packet: Packet) -> bool {
    // 负大小的包按无操作跳过（个别解封装器的退化输出，不视为错误）
    if packet.size < 0 {
        debug!("{} 跳过负大小数据包 (size={})", log_ctx(), packet.size);
        return true;
    }

    let queue = match packet.stream {
        StreamKind::Video => ctx.video_queue.as_ref(),
        StreamKind::Audio => ctx.audio_queue.as_ref(),
        StreamKind::Other => None,
    };
    // 不感兴趣的流直接丢弃，不缓冲
    let Some(queue) = queue else {
        return true;
    };

    // 比整个字节预算还大的包永远无法入队，重试没有意义：记错误后丢弃
    if packet.size as usize > queue.byte_budget() {
        error!(
            "{} ❌ 数据包超出队列字节预算，丢弃: {} > {} 字节",
            log_ctx(),
            packet.size,
            queue.byte_budget()
        );
        return true;
    }

    let mut pending = packet;
    while !ctx.control.is_stopped() {
        ctx.control.wait_while_paused();
        match queue.push(pending) {
            PushResult::Pushed => return true,
            PushResult::Full(p) => {
                // 队列满：等消费者腾出空间，睡一小段时间省 CPU
                pending = p;
                thread::sleep(FIFO_RETRY_INTERVAL);
            }
        }
    }
    false
}
