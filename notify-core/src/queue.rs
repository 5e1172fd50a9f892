//! 分发队列（DispatchQueue）
//!
//! 回调最终执行的上下文：
//! - `InlineQueue`：在调用线程上立即执行；
//! - `ThreadQueue`：每个任务一个新线程，作为“临时队列”；
//! - `RuntimeQueue`（`tokio` 特性）：投递到捕获的 tokio 运行时。
//!
use std::fmt;
use std::sync::Arc;
use std::thread;

/// 无参、一次性的待执行任务
pub type Job = Box<dyn FnOnce() + Send + 'static>;

pub type DispatchQueueRef = Arc<dyn DispatchQueue>;

/// 分发队列：接收任务并在自身的执行上下文中运行
///
/// `dispatch` 不等待任务完成（`InlineQueue` 除外）。
pub trait DispatchQueue: Send + Sync {
    fn dispatch(&self, job: Job);

    /// 队列标签（用于日志）
    fn label(&self) -> &str {
        "anonymous"
    }
}

impl fmt::Debug for dyn DispatchQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DispatchQueue").field(&self.label()).finish()
    }
}

/// 在调用线程上立即执行
#[derive(Clone, Copy, Debug, Default)]
pub struct InlineQueue;

impl DispatchQueue for InlineQueue {
    fn dispatch(&self, job: Job) {
        job();
    }

    fn label(&self) -> &str {
        "inline"
    }
}

/// 每个任务在新的系统线程上执行
#[derive(Clone, Debug, Default)]
pub struct ThreadQueue {
    thread_name: Option<String>,
}

impl ThreadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(thread_name: impl Into<String>) -> Self {
        Self {
            thread_name: Some(thread_name.into()),
        }
    }
}

impl DispatchQueue for ThreadQueue {
    fn dispatch(&self, job: Job) {
        let mut builder = thread::Builder::new();
        if let Some(name) = &self.thread_name {
            builder = builder.name(name.clone());
        }
        if let Err(err) = builder.spawn(job) {
            tracing::warn!(error = %err, "failed to spawn dispatch thread, job dropped");
        }
    }

    fn label(&self) -> &str {
        self.thread_name.as_deref().unwrap_or("thread")
    }
}

/// 投递到 tokio 运行时的阻塞线程池
#[cfg(feature = "tokio")]
#[derive(Clone, Debug)]
pub struct RuntimeQueue {
    handle: tokio::runtime::Handle,
}

#[cfg(feature = "tokio")]
impl RuntimeQueue {
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }

    /// 捕获当前线程所在的运行时；不在运行时内时返回 `None`
    pub fn current() -> Option<Self> {
        tokio::runtime::Handle::try_current().ok().map(Self::new)
    }
}

#[cfg(feature = "tokio")]
impl DispatchQueue for RuntimeQueue {
    fn dispatch(&self, job: Job) {
        drop(self.handle.spawn_blocking(job));
    }

    fn label(&self) -> &str {
        "runtime"
    }
}

/// 当前执行上下文对应的队列（若有）
#[cfg(feature = "tokio")]
pub fn current_queue() -> Option<DispatchQueueRef> {
    RuntimeQueue::current().map(|queue| Arc::new(queue) as DispatchQueueRef)
}

/// 当前执行上下文对应的队列（若有）
#[cfg(not(feature = "tokio"))]
pub fn current_queue() -> Option<DispatchQueueRef> {
    None
}
