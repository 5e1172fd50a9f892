use notify_core::{Capability, InMemoryNotifyCenter, NotifyCenterRef, NotifyObject};
use notify_macros::NotifyObject;
use std::sync::LazyLock;

static CENTER: LazyLock<NotifyCenterRef> = LazyLock::new(InMemoryNotifyCenter::shared);

#[derive(Clone, NotifyObject)]
#[notify(center = CENTER.clone())]
struct CacheCleared;

#[derive(Clone, NotifyObject)]
#[notify(name = "app.will_terminate", center = CENTER.clone())]
struct WillTerminate {
    #[allow(dead_code)]
    reason: String,
}

fn main() {
    assert_eq!(CacheCleared.name().as_str(), "CacheCleared");
    assert_eq!(CacheCleared::CAPABILITY, Capability::Basic);

    let event = WillTerminate {
        reason: "update".into(),
    };
    assert_eq!(event.name().as_str(), "app.will_terminate");
    assert_eq!(event.user_info_key(), "payload");
}
