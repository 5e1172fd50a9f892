use notify_core::{Capability, InMemoryNotifyCenter, NotifyCenterRef, NotifyObject};
use notify_macros::NotifyObject;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static CENTER: LazyLock<NotifyCenterRef> = LazyLock::new(InMemoryNotifyCenter::shared);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Profile {
    nick: String,
}

#[derive(Debug, Clone, PartialEq, NotifyObject)]
#[notify(name = "user.profile_changed", center = CENTER.clone(), key = "profile")]
struct ProfileChanged {
    #[notify(payload)]
    profile: Option<Profile>,
    source: &'static str,
}

fn main() {
    assert_eq!(ProfileChanged::CAPABILITY, Capability::Informed);

    let template = ProfileChanged {
        profile: None,
        source: "settings",
    };
    assert_eq!(template.user_info_key(), "profile");
    assert!(template.payload().is_none());

    let filled = template.with_payload(Some(Profile { nick: "meler".into() }));
    assert_eq!(filled.payload().map(|p| p.nick.as_str()), Some("meler"));
    assert_eq!(filled.source, "settings");

    let info = filled.user_info().unwrap().unwrap();
    assert!(info.contains_key("profile"));
    filled.post().unwrap();
}
