//! 通知基础库（notify-core）
//!
//! 提供类型化发布/订阅所需的最小构件：
//! - 频道名称（`channel`）与投递信封（`notification`）
//! - 通知中心协议（`center`）：按名称注册、按名称投递、分发给已注册的观察者，
//!   并附带一个进程内实现 `InMemoryNotifyCenter`
//! - 通知对象（`notify_object`）：知道自身频道、所属中心，以及如何把载荷
//!   写入/读出信封
//! - 分发队列（`queue`）：回调最终执行的上下文
//! - 统一错误类型（`error`）
//!
//! 订阅、延迟缓冲与保留策略位于 `notify-bus`，本 crate 只定义其依赖的能力。
//!
pub mod center;
pub mod channel;
pub mod error;
pub mod notification;
pub mod notify_object;
pub mod queue;

pub use center::{
    CenterId, InMemoryNotifyCenter, NotifyCenter, NotifyCenterRef, ObserverCallback,
    ObserverToken,
};
pub use channel::ChannelName;
pub use error::{NotifyError, NotifyResult};
pub use notification::{Notification, UserInfo};
pub use notify_object::{Capability, NotifyObject};
pub use queue::{DispatchQueue, DispatchQueueRef, InlineQueue, Job, ThreadQueue};

#[cfg(feature = "tokio")]
pub use queue::RuntimeQueue;

// 允许在本 crate 内部通过 ::notify_core 进行自引用，
// 以便派生宏在本 crate 的单元测试中也能解析到 ::notify_core 路径。
extern crate self as notify_core;
