use notify_core::{ChannelName, InMemoryNotifyCenter, NotifyObject};
use notify_macros::NotifyObject;
use std::sync::{Arc, LazyLock};

static USER_CENTER: LazyLock<Arc<InMemoryNotifyCenter>> =
    LazyLock::new(|| Arc::new(InMemoryNotifyCenter::new()));

#[derive(Debug, Clone, PartialEq, NotifyObject)]
#[notify(center = USER_CENTER.clone())]
enum UserNotify {
    #[notify(name = "UserLogoutNotificationName")]
    Logout,
    #[notify(name = "UserChangeInfoNotificationName")]
    InfoChanged,
    Deleted,
}

fn main() {
    assert_eq!(
        UserNotify::Logout.name(),
        ChannelName::from("UserLogoutNotificationName")
    );
    assert_eq!(
        UserNotify::InfoChanged.name().as_str(),
        "UserChangeInfoNotificationName"
    );
    assert_eq!(UserNotify::Deleted.name().as_str(), "UserNotify.Deleted");
    assert!(UserNotify::Deleted.payload().is_none());
    assert_eq!(
        UserNotify::Logout.notify_center().id(),
        notify_core::NotifyCenter::id(&**USER_CENTER)
    );
    UserNotify::Logout.post().unwrap();
}
