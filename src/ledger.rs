use std::collections::HashMap;

use teloxide::types::{ChatId, UserId};
use tokio::sync::Mutex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WarnOutcome {
    Warned { count: u32 },
    /// Threshold reached and the user is to be banned. The entry is kept
    /// until [`WarningLedger::reset`] is called for a ban that went through.
    Ban { count: u32 },
}

/// Per-process warning counters. Cleared on restart.
pub struct WarningLedger {
    threshold: u32,
    counts: Mutex<HashMap<(ChatId, UserId), u32>>,
}

impl WarningLedger {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.max(1),
            counts: Mutex::new(HashMap::new()),
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub async fn warn(&self, chat: ChatId, user: UserId) -> WarnOutcome {
        let mut counts = self.counts.lock().await;

        let count = counts.entry((chat, user)).or_insert(0);
        *count += 1;
        let count = *count;

        if count >= self.threshold {
            counts.insert((chat, user), self.threshold);
            WarnOutcome::Ban {
                count: self.threshold,
            }
        } else {
            WarnOutcome::Warned { count }
        }
    }

    pub async fn count(&self, chat: ChatId, user: UserId) -> u32 {
        self.counts
            .lock()
            .await
            .get(&(chat, user))
            .copied()
            .unwrap_or(0)
    }

    pub async fn reset(&self, chat: ChatId, user: UserId) {
        self.counts.lock().await.remove(&(chat, user));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAT: ChatId = ChatId(-100);
    const USER: UserId = UserId(42);

    #[tokio::test]
    async fn bans_on_third_warning() {
        let ledger = WarningLedger::new(3);

        assert_eq!(ledger.warn(CHAT, USER).await, WarnOutcome::Warned { count: 1 });
        assert_eq!(ledger.warn(CHAT, USER).await, WarnOutcome::Warned { count: 2 });
        assert_eq!(ledger.count(CHAT, USER).await, 2);

        assert_eq!(ledger.warn(CHAT, USER).await, WarnOutcome::Ban { count: 3 });
        ledger.reset(CHAT, USER).await;
        assert_eq!(ledger.count(CHAT, USER).await, 0);

        // Counting starts over after a ban.
        assert_eq!(ledger.warn(CHAT, USER).await, WarnOutcome::Warned { count: 1 });
    }

    #[tokio::test]
    async fn failed_ban_keeps_count() {
        let ledger = WarningLedger::new(3);

        for _ in 0..2 {
            ledger.warn(CHAT, USER).await;
        }
        assert_eq!(ledger.warn(CHAT, USER).await, WarnOutcome::Ban { count: 3 });

        // No reset, as when the ban call fails.
        assert_eq!(ledger.count(CHAT, USER).await, 3);
        assert_eq!(ledger.warn(CHAT, USER).await, WarnOutcome::Ban { count: 3 });
        assert_eq!(ledger.count(CHAT, USER).await, 3);

        ledger.reset(CHAT, USER).await;
        assert_eq!(ledger.count(CHAT, USER).await, 0);
    }

    #[tokio::test]
    async fn keys_are_per_chat_and_user() {
        let ledger = WarningLedger::new(3);

        ledger.warn(CHAT, USER).await;
        ledger.warn(CHAT, USER).await;
        ledger.warn(ChatId(-200), USER).await;
        ledger.warn(CHAT, UserId(43)).await;

        assert_eq!(ledger.count(CHAT, USER).await, 2);
        assert_eq!(ledger.count(ChatId(-200), USER).await, 1);
        assert_eq!(ledger.count(CHAT, UserId(43)).await, 1);

        ledger.reset(CHAT, USER).await;
        assert_eq!(ledger.count(CHAT, USER).await, 0);
        assert_eq!(ledger.count(CHAT, UserId(43)).await, 1);
    }
}
