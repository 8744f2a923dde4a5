//! Fixed-size page windows.

/// Number of pages needed for `len` items (0 when there are none).
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// Items on the 1-based `page`. Pages past the end are empty, not clamped.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page_size == 0 {
        return &[];
    }
    let start = page.max(1).saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 9), 0);
        assert_eq!(total_pages(9, 9), 1);
        assert_eq!(total_pages(10, 9), 2);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn test_page_slice_windows() {
        let items: Vec<u32> = (1..=7).collect();
        assert_eq!(page_slice(&items, 1, 3), &[1, 2, 3]);
        assert_eq!(page_slice(&items, 3, 3), &[7]);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let items: Vec<u32> = (1..=4).collect();
        assert!(page_slice(&items, 3, 3).is_empty());
        assert!(page_slice(&items, usize::MAX, 3).is_empty());
    }

    #[test]
    fn test_page_zero_reads_as_first() {
        let items = vec!["a", "b"];
        assert_eq!(page_slice(&items, 0, 1), &["a"]);
    }
}
