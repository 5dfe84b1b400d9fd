use crate::core::Packet;
use parking_lot::Mutex;

/// 默认的初始槽位数，同时也是每次扩容的增量
const DEFAULT_SLOTS: usize = 1000;

/// push 的结果
#[derive(Debug)]
pub enum PushResult {
    /// 入队成功
    Pushed,
    /// 超出字节预算被拒绝，原样返还数据包（队列状态不变）
    Full(Packet),
}

impl PushResult {
    pub fn is_pushed(&self) -> bool {
        matches!(self, PushResult::Pushed)
    }
}

struct QueueInner {
    /// 槽位环（arena），front/back 为环上索引
    slots: Vec<Option<Packet>>,
    front: usize,
    back: usize,
    count: usize,
    byte_total: usize,
}

/// 数据包队列 - 有界、可增长的 FIFO
///
/// 两级容量控制：
/// - 字节预算：硬上限。会使缓冲字节总量越界的 push 被整体拒绝（Full），
///   由生产者退避重试，数据不丢弃
/// - 槽位容量：软上限。槽位用满时按固定增量扩容并保序搬迁，
///   front > back（已回绕）时分 front..end 与 start..back 两段拷贝
///
/// 字节预算检查严格先于槽位扩容。
///
/// 并发模型：单生产者 + 单消费者，外加控制线程随时可调用 flush；
/// push/pop/flush 由队列自己的互斥锁串行化
pub struct PacketQueue {
    byte_budget: usize,
    grow: usize,
    inner: Mutex<QueueInner>,
}

impl PacketQueue {
    /// 创建队列，byte_budget 为缓冲字节总量的硬上限
    pub fn new(byte_budget: usize) -> Self {
        Self::with_slots(byte_budget, DEFAULT_SLOTS)
    }

    /// 创建队列并指定初始槽位数（同时作为扩容增量）
    pub fn with_slots(byte_budget: usize, slots: usize) -> Self {
        let slots = slots.max(1);
        let mut ring = Vec::with_capacity(slots);
        ring.resize_with(slots, || None);
        Self {
            byte_budget,
            grow: slots,
            inner: Mutex::new(QueueInner {
                slots: ring,
                front: 0,
                back: 0,
                count: 0,
                byte_total: 0,
            }),
        }
    }

    /// 入队。超出字节预算返回 Full 且状态不变；槽位不足时先扩容
    pub fn push(&self, packet: Packet) -> PushResult {
        let mut q = self.inner.lock();
        let size = packet.size.max(0) as usize;

        // 字节预算检查先于扩容
        if q.byte_total + size > self.byte_budget {
            return PushResult::Full(packet);
        }
        if q.count == q.slots.len() {
            self.grow_slots(&mut q);
        }

        let back = q.back;
        q.slots[back] = Some(packet);
        q.back = (q.back + 1) % q.slots.len();
        q.count += 1;
        q.byte_total += size;
        PushResult::Pushed
    }

    /// 出队。空队列返回 None
    pub fn pop(&self) -> Option<Packet> {
        let mut q = self.inner.lock();
        if q.count == 0 {
            return None;
        }
        let front = q.front;
        let packet = q.slots[front].take()?;
        q.front = (q.front + 1) % q.slots.len();
        q.count -= 1;
        q.byte_total -= packet.size.max(0) as usize;
        Some(packet)
    }

    /// 清空队列：释放所有缓冲的数据包并重置计数（Seek/停止时调用）
    pub fn flush(&self) {
        let mut q = self.inner.lock();
        for slot in q.slots.iter_mut() {
            slot.take();
        }
        q.front = 0;
        q.back = 0;
        q.count = 0;
        q.byte_total = 0;
    }

    /// 按入队顺序搬迁到更大的槽位环
    fn grow_slots(&self, q: &mut QueueInner) {
        let old_cap = q.slots.len();
        let mut slots: Vec<Option<Packet>> = Vec::with_capacity(old_cap + self.grow);
        slots.resize_with(old_cap + self.grow, || None);
        // front <= back 时是一段连续区间，已回绕时等价于两段（front..end、start..back）
        for (i, slot) in slots.iter_mut().take(q.count).enumerate() {
            *slot = q.slots[(q.front + i) % old_cap].take();
        }
        q.slots = slots;
        q.front = 0;
        q.back = q.count;
    }

    pub fn len(&self) -> usize {
        self.inner.lock().count
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().count == 0
    }

    /// 当前缓冲字节总量
    pub fn byte_total(&self) -> usize {
        self.inner.lock().byte_total
    }

    pub fn byte_budget(&self) -> usize {
        self.byte_budget
    }

    /// 当前槽位容量（只增不减）
    pub fn capacity(&self) -> usize {
        self.inner.lock().slots.len()
    }
}
