use crate::handle_mode::HandleMode;
use bon::Builder;
use notify_core::queue::DispatchQueueRef;
use std::fmt;

/// 订阅序号（总线内唯一）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// 订阅选项
///
/// - `queue`：显式目标队列；同时传给通知中心，立即订阅的回调也在该队列执行；
/// - `defer_execution`：为 `true` 时处理器进入延迟缓冲区，等待 `flush`；
/// - `handle_mode`：延迟缓冲区的保留策略，未设置时取总线配置的默认值。
///
/// ```rust
/// use notify_bus::{HandleMode, SubscribeOptions};
///
/// let opts = SubscribeOptions::builder()
///     .defer_execution(true)
///     .handle_mode(HandleMode::Last(2))
///     .build();
/// assert!(opts.defer_execution());
/// ```
#[derive(Builder, Clone, Default)]
pub struct SubscribeOptions {
    queue: Option<DispatchQueueRef>,
    #[builder(default)]
    defer_execution: bool,
    handle_mode: Option<HandleMode>,
}

impl SubscribeOptions {
    /// 立即执行、无显式队列
    pub fn immediate() -> Self {
        Self::default()
    }

    /// 延迟执行，使用给定保留策略
    pub fn deferred(mode: HandleMode) -> Self {
        Self {
            queue: None,
            defer_execution: true,
            handle_mode: Some(mode),
        }
    }

    pub fn queue(&self) -> Option<&DispatchQueueRef> {
        self.queue.as_ref()
    }

    pub fn defer_execution(&self) -> bool {
        self.defer_execution
    }

    pub fn handle_mode(&self) -> Option<HandleMode> {
        self.handle_mode
    }
}

impl fmt::Debug for SubscribeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscribeOptions")
            .field("queue", &self.queue.as_ref().map(|q| q.label()))
            .field("defer_execution", &self.defer_execution)
            .field("handle_mode", &self.handle_mode)
            .finish()
    }
}
