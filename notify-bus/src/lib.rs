//! 通知总线（notify-bus）
//!
//! 在通知中心之上提供类型化的订阅与延迟投递：
//! - 立即订阅：投递到达时直接调用处理器；
//! - 延迟订阅：处理器与事件值绑定为 `DeferredHandler`，按 `HandleMode`
//!   保留策略写入频道缓冲区，之后由 `flush` 统一执行。
//!
pub mod bus;
pub mod config;
pub mod deferred;
pub mod handle_mode;
pub mod subscription;

pub use bus::NotifyBus;
pub use config::{FallbackQueue, NotifyBusConfig};
pub use deferred::{Admission, DeferredHandler, DeferredHandlers, DeferredJob};
pub use handle_mode::HandleMode;
pub use subscription::{SubscribeOptions, SubscriptionId};
