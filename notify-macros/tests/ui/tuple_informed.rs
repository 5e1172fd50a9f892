use notify_core::{InMemoryNotifyCenter, Notification, NotifyCenterRef, NotifyObject, UserInfo};
use notify_macros::NotifyObject;
use std::sync::LazyLock;

static CENTER: LazyLock<NotifyCenterRef> = LazyLock::new(InMemoryNotifyCenter::shared);

#[derive(Debug, Clone, PartialEq, NotifyObject)]
#[notify(name = "counter.changed", center = CENTER.clone())]
struct CounterChanged(#[notify(payload)] Option<u64>);

fn main() {
    let mut info = UserInfo::new();
    info.insert("payload".into(), 7u64.into());
    let n = Notification::with_user_info("counter.changed", info);

    let back = CounterChanged(None).extract(&n).unwrap();
    assert_eq!(back, CounterChanged(Some(7)));
}
