//! 通知对象（NotifyObject）
//!
//! 描述一个具名频道的值：知道自身名称与所属中心，可把自身投递出去，
//! 并能从投递信封中还原出同一变体的实例。
//!
//! 两种能力：
//! - `Capability::Basic`：只有名称，载荷类型为 `()`；
//! - `Capability::Informed`：携带结构化载荷，以 `user_info_key()` 为键写入/读出信封。
//!
//! 通常通过 `#[derive(NotifyObject)]`（见 `notify-macros`）实现。
//!
use crate::center::NotifyCenterRef;
use crate::channel::ChannelName;
use crate::error::{NotifyError, NotifyResult};
use crate::notification::{Notification, UserInfo};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// 载荷在附加信息中的默认键
pub const DEFAULT_USER_INFO_KEY: &str = "payload";

/// 通知对象的能力集合
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    /// 仅名称
    Basic,
    /// 名称 + 载荷
    Informed,
}

/// 通知对象
pub trait NotifyObject: Clone + Send + Sync + 'static {
    /// 能力；`Basic` 对象投递时不附带信息，提取时忽略信封中的信息
    const CAPABILITY: Capability = Capability::Basic;

    /// 载荷类型；仅名称的对象使用 `()`
    type Payload: Serialize + DeserializeOwned + Send + Sync + 'static;

    /// 频道名称
    fn name(&self) -> ChannelName;

    /// 所属通知中心
    fn notify_center(&self) -> NotifyCenterRef;

    /// 载荷在附加信息中的键
    fn user_info_key(&self) -> &str {
        DEFAULT_USER_INFO_KEY
    }

    fn payload(&self) -> Option<&Self::Payload> {
        None
    }

    /// 以给定载荷构造同一变体的新实例
    fn with_payload(&self, payload: Option<Self::Payload>) -> Self {
        let _ = payload;
        self.clone()
    }

    /// 投递时使用的附加信息；无载荷时为 `None`
    fn user_info(&self) -> NotifyResult<Option<UserInfo>> {
        if Self::CAPABILITY == Capability::Basic {
            return Ok(None);
        }
        let Some(payload) = self.payload() else {
            return Ok(None);
        };

        let mut info = UserInfo::new();
        info.insert(
            self.user_info_key().to_string(),
            serde_json::to_value(payload)?,
        );
        Ok(Some(info))
    }

    /// 通过所属中心投递给全部当前观察者
    fn post(&self) -> NotifyResult<()> {
        let notification = match self.user_info()? {
            Some(info) => Notification::with_user_info(self.name(), info),
            None => Notification::new(self.name()),
        };
        self.notify_center().post(notification)
    }

    /// 从投递信封还原同一变体的实例
    ///
    /// - 键缺失（或无附加信息）时视为“无载荷”，返回 `with_payload(None)`；
    /// - 键存在但无法解码时返回 `NotifyError::Payload`。
    fn extract(&self, notification: &Notification) -> NotifyResult<Self> {
        if Self::CAPABILITY == Capability::Basic {
            return Ok(self.clone());
        }

        let key = self.user_info_key();
        let Some(value) = notification.value(key) else {
            return Ok(self.with_payload(None));
        };

        let payload = <Self::Payload as Deserialize>::deserialize(value).map_err(|e| {
            NotifyError::Payload {
                name: notification.name().to_string(),
                key: key.to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(self.with_payload(Some(payload)))
    }
}
