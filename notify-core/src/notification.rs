use crate::channel::ChannelName;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 结构化附加信息：字符串键到动态值的映射
pub type UserInfo = serde_json::Map<String, Value>;

/// 投递信封
///
/// 通知中心分发给观察者的内容：频道名称，以及可选的结构化附加信息。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    name: ChannelName,
    user_info: Option<UserInfo>,
}

impl Notification {
    /// 仅包含名称的通知
    pub fn new(name: impl Into<ChannelName>) -> Self {
        Self {
            name: name.into(),
            user_info: None,
        }
    }

    /// 携带附加信息的通知
    pub fn with_user_info(name: impl Into<ChannelName>, user_info: UserInfo) -> Self {
        Self {
            name: name.into(),
            user_info: Some(user_info),
        }
    }

    pub fn name(&self) -> &ChannelName {
        &self.name
    }

    pub fn user_info(&self) -> Option<&UserInfo> {
        self.user_info.as_ref()
    }

    /// 读取附加信息中的某个键；无附加信息或键缺失时返回 `None`
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.user_info.as_ref().and_then(|info| info.get(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn value_lookup_handles_missing_info_and_key() {
        let bare = Notification::new("user.logout");
        assert!(bare.user_info().is_none());
        assert!(bare.value("payload").is_none());

        let mut info = UserInfo::new();
        info.insert("payload".into(), json!({"nick": "meler"}));
        let informed = Notification::with_user_info("user.info_changed", info);

        assert_eq!(informed.name().as_str(), "user.info_changed");
        assert_eq!(informed.value("payload"), Some(&json!({"nick": "meler"})));
        assert!(informed.value("other").is_none());
    }
}
