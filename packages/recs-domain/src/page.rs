use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Validated 1-indexed paging parameters.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PageRequest {
	page: u32,
	page_size: u32,
}
impl PageRequest {
	pub fn new(page: u32, page_size: u32) -> Result<Self> {
		if page == 0 {
			return Err(Error::InvalidPage { message: "page must be 1 or greater.".to_string() });
		}
		if page_size == 0 {
			return Err(Error::InvalidPage {
				message: "page size must be greater than zero.".to_string(),
			});
		}

		Ok(Self { page, page_size })
	}

	pub fn page(self) -> u32 {
		self.page
	}

	pub fn page_size(self) -> u32 {
		self.page_size
	}

	fn bounds(self) -> (usize, usize) {
		let start = (self.page as usize - 1).saturating_mul(self.page_size as usize);

		(start, start.saturating_add(self.page_size as usize))
	}
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Page<T> {
	pub items: Vec<T>,
	pub total: usize,
	pub total_pages: usize,
	pub page: u32,
	pub page_size: u32,
	pub has_next_page: bool,
}
impl<T> Page<T> {
	pub fn map<U, F>(self, f: F) -> Page<U>
	where
		F: FnMut(T) -> U,
	{
		Page {
			items: self.items.into_iter().map(f).collect(),
			total: self.total,
			total_pages: self.total_pages,
			page: self.page,
			page_size: self.page_size,
			has_next_page: self.has_next_page,
		}
	}
}

/// Slices an already ordered sequence. `total` counts the full sequence.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
	let total = items.len();
	let (start, end) = request.bounds();
	let items = items.into_iter().skip(start).take(end - start).collect();

	Page {
		items,
		total,
		total_pages: page_count(total, request.page_size),
		page: request.page,
		page_size: request.page_size,
		has_next_page: end < total,
	}
}

pub fn page_count(total: usize, page_size: u32) -> usize {
	if page_size == 0 {
		return 0;
	}

	total.div_ceil(page_size as usize)
}
