//! Administrator authorization.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Identity of whoever issues a command (a chat user id, for instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallerId(pub u64);

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Decides whether a caller may administer credentials.
pub trait Authorizer: Send + Sync {
    /// Returns true if `caller` is an administrator.
    fn is_admin(&self, caller: CallerId) -> bool;
}

/// Fixed set of administrator ids.
#[derive(Debug, Clone, Default)]
pub struct AdminAllowList {
    ids: HashSet<u64>,
}

impl AdminAllowList {
    /// Creates an allow-list from raw ids.
    pub fn new(ids: impl IntoIterator<Item = u64>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    /// Number of administrators.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if nobody is allowed.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl Authorizer for AdminAllowList {
    fn is_admin(&self, caller: CallerId) -> bool {
        self.ids.contains(&caller.0)
    }
}
