//! 通知总线（NotifyBus）
//!
//! - `subscribe*`：向通知对象所属中心注册观察者，投递到达时立即调用处理器，
//!   或绑定为 `DeferredHandler` 按保留策略写入频道缓冲区；
//! - `flush`：按存储顺序执行某频道存活的延迟处理器，并把频道恢复为空闲（无缓冲区）；
//! - 销毁时注销本总线在所有中心上持有的全部观察者令牌。
//!
//! 缓冲区与令牌表均为 `DashMap`，投递线程与 `flush` 线程可并发访问。
//! 观察者回调只持有总线状态的弱引用，中心比总线活得久也不会使总线常驻。

use crate::config::NotifyBusConfig;
use crate::deferred::{DeferredHandler, DeferredHandlers};
use crate::handle_mode::HandleMode;
use crate::subscription::{SubscribeOptions, SubscriptionId};
use dashmap::DashMap;
use notify_core::center::{CenterId, NotifyCenterRef, ObserverCallback, ObserverToken};
use notify_core::channel::ChannelName;
use notify_core::error::NotifyResult;
use notify_core::notification::Notification;
use notify_core::notify_object::NotifyObject;
use notify_core::queue::{self, DispatchQueueRef};
use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace, warn};

/// 通知总线
///
/// 不可克隆：销毁即注销全部观察者。需要共享时以 `Arc<NotifyBus>` 持有。
pub struct NotifyBus {
    state: Arc<BusState>,
}

struct BusState {
    config: NotifyBusConfig,
    next_subscription: AtomicU64,
    deferred: DashMap<ChannelName, DeferredHandlers>,
    centers: DashMap<CenterId, CenterTokens>,
}

// 某个中心上本总线持有的令牌
struct CenterTokens {
    center: NotifyCenterRef,
    tokens: Vec<ObserverToken>,
}

impl Default for NotifyBus {
    fn default() -> Self {
        Self::with_config(NotifyBusConfig::default())
    }
}

impl NotifyBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: NotifyBusConfig) -> Self {
        Self {
            state: Arc::new(BusState {
                config,
                next_subscription: AtomicU64::new(1),
                deferred: DashMap::new(),
                centers: DashMap::new(),
            }),
        }
    }

    pub fn config(&self) -> &NotifyBusConfig {
        &self.state.config
    }

    /// 立即订阅：投递到达时在投递线程上直接调用处理器
    pub fn subscribe<T, F>(&self, object: &T, handler: F) -> NotifyResult<()>
    where
        T: NotifyObject,
        F: Fn(T) + Send + Sync + 'static,
    {
        self.subscribe_with(object, SubscribeOptions::immediate(), handler)
    }

    /// 延迟订阅：处理器按 `mode` 进入频道缓冲区，等待 `flush`
    pub fn subscribe_deferred<T, F>(
        &self,
        object: &T,
        mode: HandleMode,
        handler: F,
    ) -> NotifyResult<()>
    where
        T: NotifyObject,
        F: Fn(T) + Send + Sync + 'static,
    {
        self.subscribe_with(object, SubscribeOptions::deferred(mode), handler)
    }

    /// 按选项订阅
    ///
    /// 向 `object.notify_center()` 为 `object.name()` 注册一个观察者；
    /// 注册失败原样返回。同一频道的多次订阅各自独立，不做去重。
    pub fn subscribe_with<T, F>(
        &self,
        object: &T,
        options: SubscribeOptions,
        handler: F,
    ) -> NotifyResult<()>
    where
        T: NotifyObject,
        F: Fn(T) + Send + Sync + 'static,
    {
        let subscription = SubscriptionId::new(
            self.state
                .next_subscription
                .fetch_add(1, Ordering::Relaxed),
        );
        let name = object.name();
        let center = object.notify_center();
        let mode = options
            .handle_mode()
            .unwrap_or(self.state.config.default_handle_mode);
        let handler = Arc::new(handler);
        let template = object.clone();

        let callback: ObserverCallback = if options.defer_execution() {
            // 目标队列在订阅时解析：显式队列 > 当前运行时 > 兜底队列
            let target = self.state.resolve_queue(options.queue().cloned());
            let weak = Arc::downgrade(&self.state);
            let channel = name.clone();

            Arc::new(move |notification: &Notification| {
                let Some(state) = weak.upgrade() else {
                    return;
                };
                let Some(value) = extract_or_warn(&template, notification, subscription) else {
                    return;
                };
                let handler = handler.clone();
                let deferred = DeferredHandler::new(
                    subscription,
                    target.clone(),
                    Box::new(move || handler(value)),
                );
                state.admit(&channel, deferred, mode);
            })
        } else {
            Arc::new(move |notification: &Notification| {
                if let Some(value) = extract_or_warn(&template, notification, subscription) {
                    handler(value);
                }
            })
        };

        let token = center.add_observer(&name, options.queue().cloned(), callback)?;
        self.state.remember(center, token);

        debug!(
            channel = %name,
            %subscription,
            deferred = options.defer_execution(),
            %mode,
            "subscribed"
        );
        Ok(())
    }

    /// 执行某频道的全部延迟处理器，并清空该频道
    ///
    /// 先摘下缓冲区再逐个执行，执行期间新到达的处理器进入新的缓冲区，留待下次 `flush`。
    /// 频道无缓冲区时为无操作。返回执行的处理器数量。
    pub fn flush<Q>(&self, name: &Q) -> usize
    where
        ChannelName: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some((channel, handlers)) = self.state.deferred.remove(name) else {
            return 0;
        };

        let count = handlers.len();
        debug!(channel = %channel, count, "flushing deferred handlers");
        for handler in handlers {
            trace!(
                channel = %channel,
                subscription = %handler.subscription(),
                queue = handler.queue().label(),
                "running deferred handler"
            );
            handler.run();
        }
        count
    }

    /// 执行全部频道的延迟处理器（频道之间无顺序保证）
    pub fn flush_all(&self) -> usize {
        let names: Vec<ChannelName> = self
            .state
            .deferred
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.iter().map(|name| self.flush(name)).sum()
    }

    /// 丢弃某频道的延迟处理器而不执行，返回丢弃数量
    pub fn discard<Q>(&self, name: &Q) -> usize
    where
        ChannelName: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.state.deferred.remove(name) {
            Some((channel, handlers)) => {
                debug!(channel = %channel, count = handlers.len(), "discarded deferred handlers");
                handlers.len()
            }
            None => 0,
        }
    }

    /// 某频道待执行的延迟处理器数量
    pub fn pending<Q>(&self, name: &Q) -> usize
    where
        ChannelName: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.state
            .deferred
            .get(name)
            .map(|handlers| handlers.len())
            .unwrap_or(0)
    }

    /// 某频道是否存在缓冲区（空闲频道没有缓冲区）
    pub fn has_pending<Q>(&self, name: &Q) -> bool
    where
        ChannelName: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.state.deferred.contains_key(name)
    }

    /// 某频道缓冲区中各处理器所属订阅（按存储顺序）
    pub fn pending_subscriptions<Q>(&self, name: &Q) -> Vec<SubscriptionId>
    where
        ChannelName: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.state
            .deferred
            .get(name)
            .map(|handlers| handlers.subscriptions())
            .unwrap_or_default()
    }

    /// 本总线当前持有的观察者令牌数
    pub fn subscription_count(&self) -> usize {
        self.state
            .centers
            .iter()
            .map(|entry| entry.tokens.len())
            .sum()
    }

    /// 在所有涉及的中心上注销本总线的全部观察者，返回注销数量
    ///
    /// 已缓冲的延迟处理器保留，仍可 `flush`。
    pub fn clear_observers(&self) -> usize {
        let ids: Vec<CenterId> = self.state.centers.iter().map(|e| *e.key()).collect();

        let mut removed = 0;
        for id in ids {
            let Some((_, entry)) = self.state.centers.remove(&id) else {
                continue;
            };
            for token in entry.tokens {
                entry.center.remove_observer(token);
                removed += 1;
            }
            trace!(center = %id, "observers removed from center");
        }

        if removed > 0 {
            debug!(removed, "bus observers cleared");
        }
        removed
    }
}

impl Drop for NotifyBus {
    fn drop(&mut self) {
        self.clear_observers();
        self.state.deferred.clear();
    }
}

impl fmt::Debug for NotifyBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifyBus")
            .field("config", self.config())
            .field("channels", &self.state.deferred.len())
            .field("subscriptions", &self.subscription_count())
            .finish()
    }
}

impl BusState {
    fn resolve_queue(&self, explicit: Option<DispatchQueueRef>) -> DispatchQueueRef {
        explicit
            .or_else(queue::current_queue)
            .unwrap_or_else(|| self.config.fallback_queue.queue())
    }

    fn admit(&self, name: &ChannelName, handler: DeferredHandler, mode: HandleMode) {
        let subscription = handler.subscription();

        // 无操作策略不创建缓冲区，频道保持空闲
        if mode.admits_nothing() {
            trace!(channel = %name, %subscription, %mode, "deferred handler dropped");
            return;
        }

        let mut handlers = self.deferred.entry(name.clone()).or_default();
        let admission = handlers.admit(handler, mode);
        trace!(
            channel = %name,
            %subscription,
            %mode,
            accepted = admission.accepted,
            evicted = admission.evicted,
            pending = handlers.len(),
            "deferred handler admitted"
        );
    }

    fn remember(&self, center: NotifyCenterRef, token: ObserverToken) {
        self.centers
            .entry(center.id())
            .or_insert_with(|| CenterTokens {
                center: center.clone(),
                tokens: Vec::new(),
            })
            .tokens
            .push(token);
    }
}

fn extract_or_warn<T: NotifyObject>(
    template: &T,
    notification: &Notification,
    subscription: SubscriptionId,
) -> Option<T> {
    match template.extract(notification) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(
                channel = %notification.name(),
                %subscription,
                error = %err,
                "failed to extract notification, delivery dropped"
            );
            None
        }
    }
}
