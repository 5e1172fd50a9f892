//! 延迟处理器（DeferredHandler）与频道缓冲区（DeferredHandlers）
//!
//! 延迟订阅收到投递后，把“处理器 + 已提取的事件值”绑定为一个无参任务，
//! 连同订阅时解析出的目标队列一起存入频道缓冲区；`flush` 时按存储顺序执行，
//! 每个任务被分发到自己的队列，`flush` 不等待其完成。
//!
use crate::handle_mode::HandleMode;
use crate::subscription::SubscriptionId;
use notify_core::queue::DispatchQueueRef;
use std::collections::VecDeque;
use std::fmt;

/// 已绑定事件值的处理器调用；缓冲区在线程间共享，因此要求 `Sync`
pub type DeferredJob = Box<dyn FnOnce() + Send + Sync + 'static>;

/// 绑定了事件值与目标队列的处理器
pub struct DeferredHandler {
    subscription: SubscriptionId,
    queue: DispatchQueueRef,
    job: DeferredJob,
}

impl DeferredHandler {
    pub fn new(subscription: SubscriptionId, queue: DispatchQueueRef, job: DeferredJob) -> Self {
        Self {
            subscription,
            queue,
            job,
        }
    }

    /// 产生该处理器的订阅
    pub fn subscription(&self) -> SubscriptionId {
        self.subscription
    }

    pub fn queue(&self) -> &DispatchQueueRef {
        &self.queue
    }

    /// 分发到目标队列执行
    pub fn run(self) {
        self.queue.dispatch(self.job);
    }
}

impl fmt::Debug for DeferredHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredHandler")
            .field("subscription", &self.subscription)
            .field("queue", &self.queue.label())
            .finish_non_exhaustive()
    }
}

/// 单次到达的准入结果
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Admission {
    /// 新到达的处理器是否进入缓冲区
    pub accepted: bool,
    /// 因本次到达而被移出的已有处理器数量
    pub evicted: usize,
}

impl Admission {
    fn accepted(evicted: usize) -> Self {
        Self {
            accepted: true,
            evicted,
        }
    }

    fn rejected(evicted: usize) -> Self {
        Self {
            accepted: false,
            evicted,
        }
    }
}

/// 单个频道的延迟处理器缓冲区（保持准入顺序）
#[derive(Debug, Default)]
pub struct DeferredHandlers {
    handlers: VecDeque<DeferredHandler>,
}

impl DeferredHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// 按存储顺序列出各处理器所属订阅
    pub fn subscriptions(&self) -> Vec<SubscriptionId> {
        self.handlers.iter().map(|h| h.subscription()).collect()
    }

    /// 按保留策略准入一个新到达的处理器
    pub fn admit(&mut self, handler: DeferredHandler, mode: HandleMode) -> Admission {
        match mode {
            HandleMode::All => {
                self.handlers.push_back(handler);
                Admission::accepted(0)
            }
            HandleMode::OnlyFirst => {
                if self.handlers.is_empty() {
                    self.handlers.push_back(handler);
                    Admission::accepted(0)
                } else {
                    Admission::rejected(0)
                }
            }
            HandleMode::OnlyLast => {
                let evicted = self.handlers.len();
                self.handlers.clear();
                self.handlers.push_back(handler);
                Admission::accepted(evicted)
            }
            HandleMode::First(n) if n > 0 => {
                let cap = n.unsigned_abs();
                if self.handlers.len() >= cap {
                    let evicted = self.handlers.len() - cap;
                    self.handlers.truncate(cap);
                    Admission::rejected(evicted)
                } else {
                    self.handlers.push_back(handler);
                    Admission::accepted(0)
                }
            }
            HandleMode::Last(n) if n > 0 => {
                let cap = n.unsigned_abs();
                self.handlers.push_back(handler);
                let mut evicted = 0;
                while self.handlers.len() > cap {
                    self.handlers.pop_front();
                    evicted += 1;
                }
                Admission::accepted(evicted)
            }
            HandleMode::First(_) | HandleMode::Last(_) => Admission::rejected(0),
        }
    }
}

impl IntoIterator for DeferredHandlers {
    type Item = DeferredHandler;
    type IntoIter = std::collections::vec_deque::IntoIter<DeferredHandler>;

    fn into_iter(self) -> Self::IntoIter {
        self.handlers.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify_core::queue::InlineQueue;
    use std::sync::{Arc, Mutex};

    struct Harness {
        ran: Arc<Mutex<Vec<u64>>>,
        buf: DeferredHandlers,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                ran: Arc::new(Mutex::new(Vec::new())),
                buf: DeferredHandlers::new(),
            }
        }

        fn handler(&self, id: u64) -> DeferredHandler {
            let ran = self.ran.clone();
            DeferredHandler::new(
                SubscriptionId::new(id),
                Arc::new(InlineQueue),
                Box::new(move || ran.lock().unwrap().push(id)),
            )
        }

        fn admit(&mut self, id: u64, mode: HandleMode) -> Admission {
            let h = self.handler(id);
            self.buf.admit(h, mode)
        }

        fn stored(&self) -> Vec<u64> {
            self.buf.subscriptions().iter().map(|s| s.get()).collect()
        }

        fn run_all(self) -> Vec<u64> {
            for h in self.buf {
                h.run();
            }
            self.ran.lock().unwrap().clone()
        }
    }

    #[test]
    fn all_appends_every_arrival() {
        let mut h = Harness::new();
        assert_eq!(h.handler(0).queue().label(), "inline");
        for id in 1..=3 {
            assert_eq!(h.admit(id, HandleMode::All), Admission::accepted(0));
        }
        assert_eq!(h.run_all(), vec![1, 2, 3]);
    }

    #[test]
    fn only_first_keeps_the_first_arrival() {
        let mut h = Harness::new();
        assert!(h.admit(1, HandleMode::OnlyFirst).accepted);
        assert!(!h.admit(2, HandleMode::OnlyFirst).accepted);
        assert!(!h.admit(3, HandleMode::OnlyFirst).accepted);
        assert_eq!(h.run_all(), vec![1]);
    }

    #[test]
    fn only_last_replaces_everything() {
        let mut h = Harness::new();
        assert_eq!(h.admit(1, HandleMode::OnlyLast), Admission::accepted(0));
        assert_eq!(h.admit(2, HandleMode::OnlyLast), Admission::accepted(1));
        assert_eq!(h.admit(3, HandleMode::OnlyLast), Admission::accepted(1));
        assert_eq!(h.run_all(), vec![3]);
    }

    #[test]
    fn first_n_stops_at_capacity() {
        let mut h = Harness::new();
        for id in 1..=5 {
            h.admit(id, HandleMode::First(2));
        }
        assert_eq!(h.stored(), vec![1, 2]);
    }

    #[test]
    fn last_n_keeps_most_recent() {
        let mut h = Harness::new();
        for id in 1..=4 {
            h.admit(id, HandleMode::Last(2));
        }
        assert_eq!(h.run_all(), vec![3, 4]);
    }

    #[test]
    fn non_positive_counts_are_no_ops() {
        let mut h = Harness::new();
        h.admit(1, HandleMode::All);
        assert_eq!(h.admit(2, HandleMode::First(0)), Admission::rejected(0));
        assert_eq!(h.admit(3, HandleMode::Last(-1)), Admission::rejected(0));
        assert_eq!(h.stored(), vec![1]);
    }

    #[test]
    fn first_n_truncates_entries_admitted_under_other_modes() {
        let mut h = Harness::new();
        for id in 1..=4 {
            h.admit(id, HandleMode::All);
        }
        assert_eq!(h.admit(5, HandleMode::First(2)), Admission::rejected(2));
        assert_eq!(h.stored(), vec![1, 2]);
    }

    #[test]
    fn last_n_trims_front_of_mixed_buffer() {
        let mut h = Harness::new();
        h.admit(1, HandleMode::All);
        h.admit(2, HandleMode::OnlyFirst);
        h.admit(3, HandleMode::All);
        assert_eq!(h.admit(4, HandleMode::Last(2)), Admission::accepted(1));
        assert_eq!(h.stored(), vec![3, 4]);
    }
}
