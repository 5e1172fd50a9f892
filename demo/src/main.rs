use notify_bus::{HandleMode, NotifyBus, SubscribeOptions};
use notify_core::{
    DispatchQueueRef, InMemoryNotifyCenter, InlineQueue, NotifyObject as _, NotifyResult,
};
use notify_macros::NotifyObject;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, LazyLock};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

static CENTER: LazyLock<Arc<InMemoryNotifyCenter>> =
    LazyLock::new(|| Arc::new(InMemoryNotifyCenter::new()));

#[derive(Debug, Clone, PartialEq, NotifyObject)]
#[notify(center = CENTER.clone())]
enum UserNotify {
    #[notify(name = "UserLogoutNotificationName")]
    Logout,
    #[notify(name = "UserChangeInfoNotificationName")]
    InfoChanged,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Profile {
    nick: String,
    level: u32,
}

#[derive(Debug, Clone, NotifyObject)]
#[notify(name = "user.profile_changed", center = CENTER.clone(), key = "profile")]
struct ProfileChanged {
    #[notify(payload)]
    profile: Option<Profile>,
}

impl ProfileChanged {
    fn with(nick: &str, level: u32) -> Self {
        Self {
            profile: Some(Profile {
                nick: nick.to_string(),
                level,
            }),
        }
    }
}

#[tokio::main]
async fn main() -> NotifyResult<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "demo=info,notify_bus=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bus = NotifyBus::new();

    // 立即订阅：投递返回前处理器已执行
    bus.subscribe(&UserNotify::Logout, |event| {
        info!(?event, "user logged out");
    })?;
    UserNotify::Logout.post()?;

    // 延迟订阅 + OnlyLast：多次投递只保留最后一次
    let inline = SubscribeOptions::builder()
        .queue(Arc::new(InlineQueue) as DispatchQueueRef)
        .defer_execution(true)
        .handle_mode(HandleMode::OnlyLast)
        .build();
    bus.subscribe_with(&ProfileChanged { profile: None }, inline, |event| {
        if let Some(profile) = event.profile {
            info!(nick = %profile.nick, level = profile.level, "profile refreshed");
        }
    })?;
    for (nick, level) in [("good", 1), ("bad", 2), ("nice", 3)] {
        ProfileChanged::with(nick, level).post()?;
    }
    info!(
        pending = bus.pending("user.profile_changed"),
        "profile changes buffered"
    );
    bus.flush("user.profile_changed");

    // 未指定队列：在运行时内订阅，处理器在 flush 后回到该运行时执行
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    bus.subscribe_deferred(&UserNotify::InfoChanged, HandleMode::Last(2), move |event| {
        let _ = tx.send(event);
    })?;
    for _ in 0..4 {
        UserNotify::InfoChanged.post()?;
    }
    let flushed = bus.flush("UserChangeInfoNotificationName");
    for _ in 0..flushed {
        if let Some(event) = rx.recv().await {
            info!(?event, "deferred info change handled");
        }
    }

    drop(bus);
    info!(observers = CENTER.observer_count(), "bus dropped");
    Ok(())
}
