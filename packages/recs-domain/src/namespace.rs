use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Disjoint identifier spaces inside the vector index.
///
/// The same identifier may exist under two namespaces without referring to the same entity, so
/// every index operation names the namespace it targets.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
	Articles,
	Tags,
	Users,
}
impl Namespace {
	pub const ALL: [Self; 3] = [Self::Articles, Self::Tags, Self::Users];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Articles => "articles",
			Self::Tags => "tags",
			Self::Users => "users",
		}
	}
}
impl fmt::Display for Namespace {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
impl FromStr for Namespace {
	type Err = Error;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|namespace| namespace.as_str() == raw)
			.ok_or_else(|| Error::UnknownNamespace(raw.to_string()))
	}
}
