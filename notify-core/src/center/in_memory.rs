//! 内存版通知中心（InMemoryNotifyCenter）
//!
//! 基于 `DashMap` 的进程内实现，满足 `NotifyCenter` 协议：
//! - 同一名称下的观察者按注册顺序分发；
//! - `post` 先对观察者列表做快照，再在锁外调用回调，
//!   因此回调内可以再次投递、注册或注销；
//! - 未指定队列的观察者在投递线程上同步执行，`post` 返回前即已完成。
//!
//! 注意：快照语义意味着投递过程中被注销的观察者仍可能收到本次通知。

use super::{CenterId, NotifyCenter, NotifyCenterRef, ObserverCallback, ObserverToken};
use crate::channel::ChannelName;
use crate::error::{NotifyError, NotifyResult};
use crate::notification::Notification;
use crate::queue::DispatchQueueRef;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

#[derive(Clone)]
struct Observer {
    token: ObserverToken,
    queue: Option<DispatchQueueRef>,
    callback: ObserverCallback,
}

impl Observer {
    fn deliver(&self, notification: &Notification) {
        match &self.queue {
            Some(queue) => {
                let callback = self.callback.clone();
                let notification = notification.clone();
                queue.dispatch(Box::new(move || callback(&notification)));
            }
            None => (self.callback)(notification),
        }
    }
}

/// 简单的内存通知中心实现
pub struct InMemoryNotifyCenter {
    id: CenterId,
    next_seq: AtomicU64,
    observers: DashMap<ChannelName, Vec<Observer>>,
    index: DashMap<ObserverToken, ChannelName>,
    closed: AtomicBool,
}

impl Default for InMemoryNotifyCenter {
    fn default() -> Self {
        Self {
            id: CenterId::next(),
            next_seq: AtomicU64::new(1),
            observers: DashMap::new(),
            index: DashMap::new(),
            closed: AtomicBool::new(false),
        }
    }
}

impl InMemoryNotifyCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建一个新的中心并以协议引用返回
    pub fn shared() -> NotifyCenterRef {
        Arc::new(Self::new())
    }

    /// 当前注册的观察者总数
    pub fn observer_count(&self) -> usize {
        self.index.len()
    }

    /// 某名称下注册的观察者数
    pub fn observer_count_for(&self, name: &str) -> usize {
        self.observers.get(name).map(|list| list.len()).unwrap_or(0)
    }

    /// 关闭中心：移除全部观察者，此后注册与投递均返回 `NotifyError::Closed`
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.observers.clear();
        self.index.clear();
        tracing::debug!(center = %self.id, "notify center closed");
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self, name: &ChannelName) -> NotifyResult<()> {
        if self.is_closed() {
            return Err(NotifyError::Closed {
                name: name.to_string(),
            });
        }
        if name.as_str().is_empty() {
            return Err(NotifyError::center("empty channel name"));
        }
        Ok(())
    }
}

impl NotifyCenter for InMemoryNotifyCenter {
    fn id(&self) -> CenterId {
        self.id
    }

    fn add_observer(
        &self,
        name: &ChannelName,
        queue: Option<DispatchQueueRef>,
        callback: ObserverCallback,
    ) -> NotifyResult<ObserverToken> {
        self.ensure_open(name)?;

        let token = ObserverToken::new(self.id, self.next_seq.fetch_add(1, Ordering::Relaxed));
        self.observers.entry(name.clone()).or_default().push(Observer {
            token,
            queue,
            callback,
        });
        self.index.insert(token, name.clone());

        Ok(token)
    }

    fn remove_observer(&self, token: ObserverToken) {
        if token.center() != self.id {
            return;
        }
        let Some((_, name)) = self.index.remove(&token) else {
            return;
        };

        // 先释放分片锁再移除空列表，避免同分片重入死锁
        let now_empty = match self.observers.get_mut(&name) {
            Some(mut list) => {
                list.retain(|o| o.token != token);
                list.is_empty()
            }
            None => false,
        };
        if now_empty {
            self.observers.remove_if(&name, |_, list| list.is_empty());
        }
        tracing::trace!(
            center = self.id.get(),
            seq = token.seq(),
            channel = %name,
            "observer removed"
        );
    }

    fn post(&self, notification: Notification) -> NotifyResult<()> {
        self.ensure_open(notification.name())?;

        let snapshot: Vec<Observer> = self
            .observers
            .get(notification.name())
            .map(|list| list.clone())
            .unwrap_or_default();

        tracing::trace!(
            center = %self.id,
            channel = %notification.name(),
            observers = snapshot.len(),
            "posting notification"
        );

        for observer in &snapshot {
            observer.deliver(&notification);
        }
        Ok(())
    }
}
