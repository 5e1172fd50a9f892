use crate::handle_mode::HandleMode;
use notify_core::queue::{DispatchQueueRef, InlineQueue, ThreadQueue};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 既无显式队列、订阅时也不在运行时内时，延迟处理器使用的队列
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackQueue {
    /// 临时队列：每个处理器一个新线程
    #[default]
    Thread,
    /// 在 `flush` 的调用线程上直接执行
    Inline,
}

impl FallbackQueue {
    pub fn queue(&self) -> DispatchQueueRef {
        match self {
            Self::Thread => Arc::new(ThreadQueue::named("notify-deferred")),
            Self::Inline => Arc::new(InlineQueue),
        }
    }
}

/// 通知总线配置
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyBusConfig {
    /// 订阅选项未指定保留策略时使用
    pub default_handle_mode: HandleMode,
    /// 延迟处理器的兜底队列
    pub fallback_queue: FallbackQueue,
}
