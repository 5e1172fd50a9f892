use serde::{Deserialize, Serialize};
use std::fmt;

/// 保留策略（HandleMode）
///
/// 延迟订阅在每次有新的处理器到达时，据此决定频道缓冲区中哪些处理器保留到 `flush`：
/// - `All`：全部保留；
/// - `OnlyFirst`：只保留第一个，之后到达的丢弃；
/// - `OnlyLast`：只保留最近一个；
/// - `First(n)`：保留前 `n` 个；
/// - `Last(n)`：保留最近 `n` 个。
///
/// `First`/`Last` 的 `n <= 0` 时退化为无操作：到达的处理器被丢弃，缓冲区不变。
/// 策略随每次到达单独求值，而非固定在频道上。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleMode {
    #[default]
    All,
    OnlyFirst,
    OnlyLast,
    First(isize),
    Last(isize),
}

impl HandleMode {
    /// 该策略是否对任何到达都不做处理（`First`/`Last` 且 `n <= 0`）
    pub fn admits_nothing(&self) -> bool {
        matches!(self, Self::First(n) | Self::Last(n) if *n <= 0)
    }
}

impl fmt::Display for HandleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::OnlyFirst => f.write_str("only_first"),
            Self::OnlyLast => f.write_str("only_last"),
            Self::First(n) => write!(f, "first({n})"),
            Self::Last(n) => write!(f, "last({n})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_positive_counts_admit_nothing() {
        assert!(HandleMode::First(0).admits_nothing());
        assert!(HandleMode::Last(-3).admits_nothing());
        assert!(!HandleMode::First(1).admits_nothing());
        assert!(!HandleMode::Last(2).admits_nothing());
        assert!(!HandleMode::All.admits_nothing());
        assert!(!HandleMode::OnlyLast.admits_nothing());
    }

    #[test]
    fn parses_from_config_values() {
        let modes: Vec<HandleMode> =
            serde_json::from_str(r#"["all", "only_first", "only_last", {"first": 3}, {"last": 2}]"#)
                .unwrap();
        assert_eq!(
            modes,
            vec![
                HandleMode::All,
                HandleMode::OnlyFirst,
                HandleMode::OnlyLast,
                HandleMode::First(3),
                HandleMode::Last(2),
            ]
        );
    }

    #[test]
    fn display_is_compact() {
        assert_eq!(HandleMode::default().to_string(), "all");
        assert_eq!(HandleMode::Last(2).to_string(), "last(2)");
    }
}
