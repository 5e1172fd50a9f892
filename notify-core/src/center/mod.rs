//! 通知中心（NotifyCenter）协议
//!
//! 外部投递原语的抽象：按名称注册观察者、按名称投递、分发给已注册观察者。
//! 中心以显式的 `CenterId` 标识，而非依赖对象引用身份；
//! 观察者令牌 `ObserverToken` 仅对签发它的中心有意义。
//!
mod in_memory;

pub use in_memory::InMemoryNotifyCenter;

use crate::channel::ChannelName;
use crate::error::NotifyResult;
use crate::notification::Notification;
use crate::queue::DispatchQueueRef;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// 观察者回调
pub type ObserverCallback = Arc<dyn Fn(&Notification) + Send + Sync>;

pub type NotifyCenterRef = Arc<dyn NotifyCenter>;

/// 通知中心标识（进程内唯一）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CenterId(u64);

impl CenterId {
    /// 分配一个新的进程内唯一标识
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CenterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "center-{}", self.0)
    }
}

/// 观察者注册令牌
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverToken {
    center: CenterId,
    seq: u64,
}

impl ObserverToken {
    pub fn new(center: CenterId, seq: u64) -> Self {
        Self { center, seq }
    }

    /// 签发该令牌的中心
    pub fn center(&self) -> CenterId {
        self.center
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// 通知中心：按名称注册、注销与投递
pub trait NotifyCenter: Send + Sync {
    /// 中心标识
    fn id(&self) -> CenterId;

    /// 为 `name` 注册观察者
    ///
    /// - `queue` 为 `Some` 时，回调被分发到该队列执行；
    /// - 否则在投递线程上同步执行。
    fn add_observer(
        &self,
        name: &ChannelName,
        queue: Option<DispatchQueueRef>,
        callback: ObserverCallback,
    ) -> NotifyResult<ObserverToken>;

    /// 注销观察者；未知或已注销的令牌视为无操作
    fn remove_observer(&self, token: ObserverToken);

    /// 将通知投递给该名称下的全部观察者
    fn post(&self, notification: Notification) -> NotifyResult<()>;
}
