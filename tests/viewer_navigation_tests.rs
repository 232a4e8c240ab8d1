mod common;

use std::time::{Duration, Instant};

use common::Harness;
use crossterm::event::KeyCode;
use pagescroll::ViewerEvent;
use pagescroll::test_utils::FakeDocumentSpec;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

// Ten 400x600 surfaces with 20px gaps and padding: 6240px of content,
// a uniform slot of 624px per page, 300px viewport.

#[test]
fn go_to_page_scrolls_then_reconciles() {
    let mut h = Harness::loaded(10);
    h.take_events();

    h.viewer.go_to_page(3);
    assert!(h.viewer.container().is_animating());
    assert_eq!(h.viewer.current_page(), 1);

    h.viewer.settle();
    assert_eq!(h.viewer.container().scroll_top(), 1248.0);
    assert_eq!(h.viewer.current_page(), 3);
    assert_eq!(
        h.take_events(),
        vec![
            ViewerEvent::PageChanged {
                page_number: 3,
                total_pages: 10,
            },
            ViewerEvent::ProgressChanged {
                percentage: 22,
                current: 3,
                total: 10,
            },
        ]
    );
}

#[test]
fn out_of_range_targets_are_clamped() {
    let mut h = Harness::loaded(10);
    h.viewer.go_to_page(99);
    h.viewer.settle();
    assert_eq!(h.viewer.current_page(), 10);

    h.viewer.go_to_page(0);
    h.viewer.settle();
    assert_eq!(h.viewer.current_page(), 1);
}

#[test]
fn huge_page_number_goes_to_last_page() {
    let mut h = Harness::loaded(10);
    h.viewer.go_to_page(usize::MAX);
    h.viewer.settle();
    assert_eq!(h.viewer.current_page(), 10);
}

#[test]
fn next_and_prev_step_one_page() {
    let mut h = Harness::loaded(10);
    h.viewer.next();
    h.viewer.settle();
    h.viewer.next();
    h.viewer.settle();
    assert_eq!(h.viewer.current_page(), 3);

    h.viewer.prev();
    h.viewer.settle();
    assert_eq!(h.viewer.current_page(), 2);
    assert_eq!(h.page_changes(), vec![2, 3, 2]);
}

#[test]
fn prev_on_first_page_stays_put() {
    let mut h = Harness::loaded(5);
    h.take_events();
    h.viewer.prev();
    h.viewer.settle();
    assert_eq!(h.viewer.current_page(), 1);
    assert!(h.page_changes().is_empty());
}

#[test]
fn navigation_before_load_does_nothing() {
    let mut h = Harness::new(FakeDocumentSpec::uniform(3, 200.0, 300.0));
    h.viewer.go_to_page(2);
    h.viewer.next();
    h.viewer.settle();
    assert_eq!(h.viewer.current_page(), 1);
    assert!(h.take_events().is_empty());
}

#[test]
fn bottom_of_document_is_last_page() {
    let mut h = Harness::loaded(10);
    h.take_events();
    h.viewer.scroll_to(1e9);
    h.viewer.settle();

    assert_eq!(h.viewer.container().scroll_top(), 5940.0);
    assert_eq!(h.viewer.current_page(), 10);
    assert_eq!(
        h.take_events().last(),
        Some(&ViewerEvent::ProgressChanged {
            percentage: 100,
            current: 10,
            total: 10,
        })
    );
}

#[test]
fn scroll_reconciles_only_after_the_debounce_window() {
    let mut h = Harness::loaded(10);
    let t0 = Instant::now();

    h.viewer.scroll_to_at(1000.0, t0);
    h.viewer.tick_at(t0 + Duration::from_millis(50));
    assert_eq!(h.viewer.current_page(), 1);

    // a new scroll restarts the window
    h.viewer.scroll_to_at(2000.0, t0 + Duration::from_millis(60));
    h.viewer.tick_at(t0 + Duration::from_millis(120));
    assert_eq!(h.viewer.current_page(), 1);

    h.viewer.tick_at(t0 + Duration::from_millis(160));
    assert_eq!(h.viewer.current_page(), 4);
    assert_eq!(h.page_changes(), vec![4]);
}

#[test]
fn keyboard_scrolls_nine_tenths_of_the_viewport() {
    let mut h = Harness::loaded(10);

    assert!(h.hub.dispatch(KeyCode::PageDown));
    h.viewer.settle();
    assert_eq!(h.viewer.container().scroll_top(), 270.0);

    assert!(h.hub.dispatch(KeyCode::Up));
    h.viewer.settle();
    assert_eq!(h.viewer.container().scroll_top(), 0.0);

    assert!(h.hub.dispatch(KeyCode::End));
    h.viewer.settle();
    assert_eq!(h.viewer.current_page(), 10);

    assert!(h.hub.dispatch(KeyCode::Home));
    h.viewer.settle();
    assert_eq!(h.viewer.current_page(), 1);
}

#[test]
fn unrelated_keys_are_not_consumed() {
    let h = Harness::loaded(3);
    assert!(!h.hub.dispatch(KeyCode::Char('x')));
    assert!(!h.hub.dispatch(KeyCode::Enter));
}

#[test]
fn chapter_resolves_named_destination() {
    let mut h = Harness::new(
        FakeDocumentSpec::uniform(10, 200.0, 300.0)
            .with_destination("intro", 2)
            .with_destination("appendix", 9),
    );
    h.load_ok();

    h.viewer.go_to_chapter("appendix");
    h.viewer.settle();
    assert_eq!(h.viewer.current_page(), 9);

    h.viewer.go_to_chapter(4usize);
    h.viewer.settle();
    assert_eq!(h.viewer.current_page(), 4);
}

#[test]
fn unknown_chapter_reports_error_and_stays() {
    let mut h = Harness::loaded(10);
    h.take_events();

    h.viewer.go_to_chapter("nowhere");
    h.viewer.settle();

    assert_eq!(h.viewer.current_page(), 1);
    assert_eq!(
        h.take_events(),
        vec![ViewerEvent::Error {
            message: "invalid destination: nowhere".into()
        }]
    );
}

#[test]
fn chapter_before_load_is_swallowed() {
    let mut h = Harness::new(FakeDocumentSpec::uniform(3, 200.0, 300.0));
    h.viewer.go_to_chapter("intro");
    assert_eq!(
        h.take_events(),
        vec![ViewerEvent::Error {
            message: "no document loaded".into()
        }]
    );
}

#[test]
fn slider_jumps_to_page_and_scrolls() {
    let mut h = Harness::new(FakeDocumentSpec::uniform(10, 200.0, 300.0)).with_slider();
    h.load_ok();
    assert_eq!(h.viewer.slider().map(|s| s.value()), Some(0.0));
    h.take_events();

    h.viewer.handle_slider_input(50.0);
    assert_eq!(h.viewer.current_page(), 5);
    assert_eq!(
        h.take_events(),
        vec![ViewerEvent::PageChanged {
            page_number: 5,
            total_pages: 10,
        }]
    );

    h.viewer.settle();
    assert_eq!(h.viewer.container().scroll_top(), 2970.0);
}

#[test]
fn resize_schedules_reconciliation() {
    let mut h = Harness::loaded(10);
    h.viewer.scroll_to(1000.0);
    h.viewer.settle();
    assert_eq!(h.viewer.current_page(), 3);

    h.viewer.resize(common::WIDTH, 900.0);
    h.viewer.settle();
    // bottom edge now at 1900 of 6240
    assert_eq!(h.viewer.current_page(), 4);
}

proptest! {
    #[test]
    fn go_to_page_then_settle_lands_on_that_page(
        (pages, target) in (1usize..40).prop_flat_map(|pages| (Just(pages), 1..=pages))
    ) {
        let mut h = Harness::loaded(pages);
        h.viewer.go_to_page(target);
        h.viewer.settle();
        prop_assert_eq!(h.viewer.current_page(), target);
    }

    #[test]
    fn current_page_stays_in_range(pages in 1usize..40, target in -5i64..60) {
        let mut h = Harness::loaded(pages);
        h.viewer.go_to_page(target.max(0) as usize);
        h.viewer.settle();
        let current = h.viewer.current_page();
        prop_assert!(current >= 1 && current <= pages);
    }

    #[test]
    fn progress_is_monotone_in_page(pages in 2usize..60) {
        let mut h = Harness::loaded(pages);
        h.take_events();
        let mut last = None;
        for page in 1..=pages {
            if let Some(progress) = h.viewer.update_progress(page) {
                prop_assert!(last.is_none_or(|prev| progress.percentage > prev));
                last = Some(progress.percentage);
            }
        }
        prop_assert_eq!(last, Some(100.0));
    }
}
