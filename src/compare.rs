//! Asymmetric differences between a "following" and a "followers" set.

use crate::sym_table::SymTable;
use core::fmt;

/// An account on one side of a [`Difference`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub username: String,
    /// When the relationship started, in Unix seconds, if the export said.
    pub timestamp: Option<u64>,
}

impl Account {
    fn new(username: &str, timestamp: Option<u64>) -> Self {
        Account {
            username: username.to_owned(),
            timestamp,
        }
    }
}

/// Accounts present on only one side, each list in traversal order of the
/// table it came from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Difference {
    /// Followed by you, absent from your followers.
    pub not_following_back: Vec<Account>,
    /// Following you, absent from the accounts you follow.
    pub not_followed_by_you: Vec<Account>,
}

impl Difference {
    pub fn is_empty(&self) -> bool {
        self.not_following_back.is_empty() && self.not_followed_by_you.is_empty()
    }
}

fn missing_from<B>(from: &SymTable<Option<u64>>, other: &SymTable<B>) -> Vec<Account> {
    let mut missing = Vec::new();
    from.for_each(|name, timestamp| {
        if !other.contains(name) {
            missing.push(Account::new(name, *timestamp));
        }
    });
    missing
}

/// Keys of `following` not in `followers`, and vice versa. Each reported
/// account keeps the timestamp stored for it on its own side; membership
/// only looks at keys.
pub fn compare(
    following: &SymTable<Option<u64>>,
    followers: &SymTable<Option<u64>>,
) -> Difference {
    Difference {
        not_following_back: missing_from(following, followers),
        not_followed_by_you: missing_from(followers, following),
    }
}

fn write_account(f: &mut fmt::Formatter<'_>, account: &Account, message: &str) -> fmt::Result {
    write!(f, "{} {message}", account.username)?;
    if let Some(timestamp) = account.timestamp {
        write!(f, " (since {timestamp})")?;
    }
    writeln!(f)
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "People you follow but don't follow you back:")?;
        for account in &self.not_following_back {
            write_account(f, account, "does not follow you back.")?;
        }
        writeln!(f)?;
        writeln!(f, "People who follow you but you don't follow back:")?;
        for account in &self.not_followed_by_you {
            write_account(f, account, "is not followed by you.")?;
        }
        Ok(())
    }
}
