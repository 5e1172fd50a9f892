use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod notify_object;

/// 通知对象派生宏
///
/// 为目标类型实现 `::notify_core::notify_object::NotifyObject`。
///
/// 枚举（仅名称，每个单元变体一个频道）：
/// ```ignore
/// #[derive(Clone, NotifyObject)]
/// #[notify(center = USER_CENTER.clone())]
/// enum UserNotify {
///     #[notify(name = "user.logout")]
///     Logout,
///     InfoChanged, // 默认名称 "UserNotify.InfoChanged"
/// }
/// ```
///
/// 结构体（可选载荷字段，类型须为 `Option<T>`）：
/// ```ignore
/// #[derive(Clone, NotifyObject)]
/// #[notify(name = "user.profile", center = USER_CENTER.clone(), key = "profile")]
/// struct ProfileChanged {
///     #[notify(payload)]
///     profile: Option<Profile>,
/// }
/// ```
///
/// 支持的键：
/// - 类型级：`center = <expr>`（必填，求值为可转为 `NotifyCenterRef` 的 `Arc`）、
///   `name = "..."`（仅结构体，默认类型名）、`key = "..."`（仅带载荷的结构体，默认 `"payload"`）
/// - 变体级：`name = "..."`
/// - 字段级：`payload`
#[proc_macro_derive(NotifyObject, attributes(notify))]
pub fn derive_notify_object(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    notify_object::expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
