use serde::Serialize;

/// Default number of rows shown on admin list pages.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 25;

/// Page selection applied to repository list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number.
    pub page: usize,
    /// Number of rows per page.
    pub per_page: usize,
}

impl Pagination {
    /// Offset into the result set implied by this selection.
    pub fn offset(&self) -> usize {
        (self.page.max(1) - 1) * self.per_page
    }
}

/// Pagination metadata echoed alongside every paginated payload.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PageMeta {
    pub current_page: usize,
    pub per_page: usize,
    pub total: usize,
    pub last_page: usize,
    /// 1-based index of the first row on this page, `None` when empty.
    pub from: Option<usize>,
    /// 1-based index of the last row on this page, `None` when empty.
    pub to: Option<usize>,
}

/// A page of items together with its [`PageMeta`].
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    /// Wrap one page of `items` drawn from a result set of `total` rows.
    pub fn new(items: Vec<T>, page: usize, per_page: usize, total: usize) -> Self {
        let page = page.max(1);
        let last_page = total.div_ceil(per_page).max(1);
        let (from, to) = if items.is_empty() {
            (None, None)
        } else {
            let first = (page - 1) * per_page + 1;
            (Some(first), Some(first + items.len() - 1))
        };
        Self {
            items,
            meta: PageMeta {
                current_page: page,
                per_page,
                total,
                last_page,
                from,
                to,
            },
        }
    }

    /// Total number of pages in the underlying result set.
    pub fn last_page(&self) -> usize {
        self.meta.last_page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginated_computes_bounds() {
        let page = Paginated::new(vec![1, 2, 3], 2, 10, 23);

        assert_eq!(page.meta.current_page, 2);
        assert_eq!(page.meta.last_page, 3);
        assert_eq!(page.meta.from, Some(11));
        assert_eq!(page.meta.to, Some(13));
        assert_eq!(page.meta.total, 23);
    }

    #[test]
    fn paginated_empty_has_no_bounds() {
        let page = Paginated::<i32>::new(Vec::new(), 1, 10, 0);

        assert_eq!(page.meta.last_page, 1);
        assert_eq!(page.meta.from, None);
        assert_eq!(page.meta.to, None);
    }
}
