use serde::{Deserialize, Serialize};

/// One page of a filtered collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

impl<T> Paginated<T> {
    /// Slices `items` to the requested page. Pages start at 1; a page past
    /// the end is empty.
    pub fn from_items(items: Vec<T>, page: usize, page_size: usize) -> Self {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let total = items.len();
        let start = (page - 1).saturating_mul(page_size);
        let data = items.into_iter().skip(start).take(page_size).collect();
        Self {
            data,
            total,
            page,
            page_size,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NotificationQuery {
    pub since: Option<u64>,
}
