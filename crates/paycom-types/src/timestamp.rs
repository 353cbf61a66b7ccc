//! Millisecond Unix timestamps, the gateway's unit of time.
//!
//! Receipt lifecycle fields (`create_time`, `pay_time`, `cancel_time`) and the
//! `from`/`to` window of `receipts.get_all` are all milliseconds since the Unix
//! epoch, sent as bare JSON integers. `0` means "not happened yet".

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::ops::Sub;
use std::time::{Duration, SystemTime};

/// Milliseconds since 1970-01-01T00:00:00Z.
///
/// ```
/// use paycom_types::timestamp::UnixMillis;
/// use std::time::Duration;
///
/// let now = UnixMillis::now();
/// let month_ago = now - Duration::from_secs(30 * 24 * 60 * 60);
/// assert!(month_ago < now);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UnixMillis(i64);

impl UnixMillis {
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Current system time.
    ///
    /// A clock set before the Unix epoch yields `0`.
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or_default();
        Self(millis)
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }

    /// `true` for the zero value the gateway uses for unset times.
    pub fn is_unset(&self) -> bool {
        self.0 == 0
    }
}

impl Sub<Duration> for UnixMillis {
    type Output = Self;

    fn sub(self, rhs: Duration) -> Self::Output {
        UnixMillis(self.0.saturating_sub(rhs.as_millis() as i64))
    }
}

impl From<i64> for UnixMillis {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for UnixMillis {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
