//! Per-asset warnings for image intake.
//!
//! Each file of a batch is resolved inside its own [`scope`]. Anything
//! reported with [`warn_asset!`](crate::warn_asset) while it runs, such as an
//! upload that fell back to the inline preview, is attributed to that file.

use std::cell::RefCell;

use tracing::warn;

/// Warnings raised while resolving one asset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetWarnings {
    pub asset: String,
    pub messages: Vec<String>,
}

impl AssetWarnings {
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

tokio::task_local! {
    static CURRENT: RefCell<AssetWarnings>;
}

/// Attach a warning to the asset in scope. Without one it is only logged.
pub fn record(message: impl Into<String>) {
    let mut message = Some(message.into());
    let _ = CURRENT.try_with(|current| {
        current.borrow_mut().messages.extend(message.take());
    });
    if let Some(message) = message {
        warn!(message, "asset warning outside of an asset scope");
    }
}

/// Resolve `asset` by running `f`, returning what it reported.
pub async fn scope<F, T>(asset: impl Into<String>, f: F) -> (T, AssetWarnings)
where
    F: std::future::Future<Output = T>,
{
    let initial = AssetWarnings {
        asset: asset.into(),
        messages: Vec::new(),
    };
    CURRENT
        .scope(RefCell::new(initial), async {
            let result = f.await;
            let warnings = CURRENT.with(|current| current.take());
            (result, warnings)
        })
        .await
}

#[macro_export]
macro_rules! warn_asset {
    ($($arg:tt)*) => {
        $crate::warning::record(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_warnings_belong_to_their_asset() {
        crate::warn_asset!("dropped {}", 1);
        let ((), first) = scope("a.png", async {
            crate::warn_asset!("slow upload {}", 2);
        })
        .await;
        let ((), second) = scope("b.png", async {}).await;

        assert_eq!(first.asset, "a.png");
        assert_eq!(first.messages, vec!["slow upload 2".to_string()]);
        assert_eq!(second.asset, "b.png");
        assert!(second.is_empty());
    }
}
