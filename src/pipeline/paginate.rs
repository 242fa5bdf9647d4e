// src/pipeline/paginate.rs

/// Eligible results are capped at this many before slicing.
pub const MAX_RESULTS: usize = 200;
pub const MIN_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

/// One page of results plus the metadata reported to callers.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Items on this page
    pub count: usize,
    /// Effective (clamped) page number
    pub page: usize,
    /// Effective (clamped) page size
    pub page_size: usize,
    /// Capped total across all pages
    pub total: usize,
}

/// Clamp a requested page size into `[MIN_PAGE_SIZE, MAX_PAGE_SIZE]`.
pub fn clamp_page_size(requested: i64) -> usize {
    usize::try_from(requested)
        .unwrap_or(MIN_PAGE_SIZE)
        .clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE)
}

pub fn clamp_page(requested: i64) -> usize {
    usize::try_from(requested).unwrap_or(1).max(1)
}

/// Cap `items` at [`MAX_RESULTS`] and return the requested slice.
pub fn paginate<T>(items: Vec<T>, page: i64, page_size: i64) -> Page<T> {
    let page = clamp_page(page);
    let page_size = clamp_page_size(page_size);
    let total = items.len().min(MAX_RESULTS);

    let start = (page - 1).saturating_mul(page_size);
    let end = start.saturating_add(page_size).min(total);
    let items: Vec<T> = if start >= end {
        Vec::new()
    } else {
        items.into_iter().skip(start).take(end - start).collect()
    };

    Page {
        count: items.len(),
        items,
        page,
        page_size,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn test_first_and_last_pages() {
        let first = paginate(numbers(25), 1, 10);
        assert_eq!(first.items, numbers(10));
        assert_eq!((first.count, first.page, first.page_size, first.total), (10, 1, 10, 25));

        let last = paginate(numbers(25), 3, 10);
        assert_eq!(last.items, vec![20, 21, 22, 23, 24]);
        assert_eq!(last.count, 5);
    }

    #[test]
    fn test_second_page_of_ten() {
        let page = paginate(numbers(25), 2, 10);
        assert_eq!(page.items, (10..20).collect::<Vec<_>>());
        assert_eq!(page.count, 10);
        assert_eq!(page.total, 25);
    }

    #[test]
    fn test_explicit_zero_page_size_clamps_up() {
        let filters = crate::models::Filters::from_value(&serde_json::json!({ "pageSize": 0 }));
        let page = paginate(numbers(25), filters.page, filters.page_size);
        assert_eq!(page.page_size, MIN_PAGE_SIZE);
        assert_eq!(page.count, 10);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let page = paginate(numbers(25), 4, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 25);
    }

    #[test]
    fn test_clamping() {
        assert_eq!(clamp_page_size(3), MIN_PAGE_SIZE);
        assert_eq!(clamp_page_size(1_000), MAX_PAGE_SIZE);
        assert_eq!(clamp_page_size(0), MIN_PAGE_SIZE);
        assert_eq!(clamp_page_size(-20), MIN_PAGE_SIZE);
        assert_eq!(clamp_page(0), 1);
        assert_eq!(clamp_page(-5), 1);
        assert_eq!(clamp_page(7), 7);
    }

    #[test]
    fn test_total_capped_at_max_results() {
        let page = paginate(numbers(500), 2, 100);
        assert_eq!(page.total, MAX_RESULTS);
        assert_eq!(page.items.first(), Some(&100));
        assert_eq!(page.items.last(), Some(&199));

        assert!(paginate(numbers(500), 3, 100).items.is_empty());
    }
}
