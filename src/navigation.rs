//! Scroll position to page mapping
//!
//! Pages are assumed to share one height: `scroll_height / total_pages`.
//! Real documents with mixed page sizes drift from this, most visibly
//! near the end of long documents.

/// Inside 1px of the bottom bound, or past it
pub fn is_at_bottom(scroll_top: f64, viewport_height: f64, scroll_height: f64) -> bool {
    let position = scroll_top + viewport_height;
    position.ceil() >= scroll_height || (scroll_height - position).abs() < 1.0
}

pub fn uniform_page_height(scroll_height: f64, total_pages: usize) -> f64 {
    if total_pages == 0 {
        return 0.0;
    }
    scroll_height / total_pages as f64
}

/// Page whose slot contains the bottom edge of the viewport
pub fn page_at_scroll(
    scroll_top: f64,
    viewport_height: f64,
    scroll_height: f64,
    total_pages: usize,
) -> usize {
    if total_pages == 0 {
        return 1;
    }
    if is_at_bottom(scroll_top, viewport_height, scroll_height) {
        return total_pages;
    }
    let page_height = uniform_page_height(scroll_height, total_pages);
    if page_height <= 0.0 {
        return 1;
    }
    let page = ((scroll_top + viewport_height) / page_height).ceil();
    (page.max(1.0) as usize).min(total_pages)
}

/// Scroll offset that brings `page` to the top
pub fn page_scroll_offset(page: usize, scroll_height: f64, total_pages: usize) -> f64 {
    page.saturating_sub(1) as f64 * uniform_page_height(scroll_height, total_pages)
}

/// Clamp a requested page into `[1, total_pages]`
pub fn clamp_page(page: i64, total_pages: usize) -> usize {
    let upper = total_pages.max(1) as i64;
    page.clamp(1, upper) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bottom_detection_tolerates_subpixel_gap() {
        assert!(is_at_bottom(2400.0, 600.0, 3000.0));
        assert!(is_at_bottom(2399.5, 600.0, 3000.0));
        assert!(is_at_bottom(2399.2, 600.0, 3000.0));
        assert!(!is_at_bottom(2398.0, 600.0, 3000.0));
    }

    #[test]
    fn top_of_document_is_page_one() {
        assert_eq!(page_at_scroll(0.0, 600.0, 10_000.0, 10), 1);
    }

    #[test]
    fn viewport_bottom_selects_page() {
        // page height 1000: bottom edge at 1700 lies in page 2
        assert_eq!(page_at_scroll(1100.0, 600.0, 10_000.0, 10), 2);
        // bottom edge exactly on a boundary stays on the earlier page
        assert_eq!(page_at_scroll(1400.0, 600.0, 10_000.0, 10), 2);
        assert_eq!(page_at_scroll(1401.0, 600.0, 10_000.0, 10), 3);
    }

    #[test]
    fn exact_bottom_is_last_page() {
        assert_eq!(page_at_scroll(9400.0, 600.0, 10_000.0, 10), 10);
    }

    #[test]
    fn no_pages_maps_to_one() {
        assert_eq!(page_at_scroll(0.0, 600.0, 600.0, 0), 1);
    }

    #[test]
    fn offsets_are_uniform() {
        assert_eq!(page_scroll_offset(1, 10_000.0, 10), 0.0);
        assert_eq!(page_scroll_offset(4, 10_000.0, 10), 3000.0);
    }

    #[test]
    fn clamp_page_keeps_range() {
        assert_eq!(clamp_page(0, 5), 1);
        assert_eq!(clamp_page(-3, 5), 1);
        assert_eq!(clamp_page(9, 5), 5);
        assert_eq!(clamp_page(3, 0), 1);
    }
}
