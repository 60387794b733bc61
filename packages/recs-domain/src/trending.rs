use std::cmp::Reverse;

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, Result};

/// Engagement totals for one article, always computed at read time.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EngagementCounts {
	pub likes: u64,
	pub comments: u64,
	pub bookmarks: u64,
}
impl EngagementCounts {
	pub fn new(likes: u64, comments: u64, bookmarks: u64) -> Self {
		Self { likes, comments, bookmarks }
	}

	/// Likes first, then comments, then bookmarks.
	pub fn rank_key(&self) -> (u64, u64, u64) {
		(self.likes, self.comments, self.bookmarks)
	}
}

/// Trailing window of engagement events considered for trending.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TrendingWindow {
	pub since: OffsetDateTime,
	pub until: OffsetDateTime,
}
impl TrendingWindow {
	/// Fails when the window start falls outside the representable date range.
	pub fn trailing(now: OffsetDateTime, days: u32) -> Result<Self> {
		let since = now.checked_sub(Duration::days(i64::from(days))).ok_or_else(|| {
			Error::InvalidWindow { message: format!("{days} days reaches past the supported range.") }
		})?;

		Ok(Self { since, until: now })
	}
}

/// Orders items by `(likes, comments, bookmarks)` descending and keeps the first `limit`.
///
/// The sort is stable, so items with identical counts keep their input order.
pub fn rank_trending<T, F>(mut items: Vec<T>, counts: F, limit: usize) -> Vec<T>
where
	F: Fn(&T) -> EngagementCounts,
{
	items.sort_by_key(|item| Reverse(counts(item).rank_key()));
	items.truncate(limit);

	items
}
