//! Deterministic pagination math.

use common::browse_result::PageState;

/// Maps a requested page onto a clamped page window. Pure and idempotent;
/// out-of-range requests are corrected, never rejected, so paging past the
/// end lands on the last page instead of an error.
///
/// Indices are 1-based and inclusive. With a `total_count` of zero the
/// window is empty: `start_index` is 1 and `end_index` is 0.
pub fn compute_page_state(requested_page: i64, page_size: u64, total_count: u64) -> PageState {
    let total_pages = total_count.div_ceil(page_size);
    let last_page = total_pages.max(1);
    let current_page = if requested_page < 1 {
        1
    } else {
        (requested_page as u64).min(last_page)
    };
    PageState {
        current_page,
        total_count,
        total_pages,
        start_index: page_size * (current_page - 1) + 1,
        end_index: (page_size * current_page).min(total_count),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middle_page_window() {
        // 30 results at 25 per page: page 2 holds results 26-30.
        let state = compute_page_state(2, 25, 30);
        assert_eq!(state.current_page, 2);
        assert_eq!(state.total_pages, 2);
        assert_eq!(state.start_index, 26);
        assert_eq!(state.end_index, 30);
    }

    #[test]
    fn requests_past_the_end_clamp_to_the_last_page() {
        let state = compute_page_state(999, 25, 30);
        assert_eq!(state.current_page, 2);
        assert_eq!(state.start_index, 26);
        assert_eq!(state.end_index, 30);
    }

    #[test]
    fn requests_below_one_clamp_to_the_first_page() {
        for requested in [-5, 0] {
            let state = compute_page_state(requested, 25, 100);
            assert_eq!(state.current_page, 1);
            assert_eq!(state.start_index, 1);
            assert_eq!(state.end_index, 25);
        }
    }

    #[test]
    fn empty_result_set() {
        let state = compute_page_state(3, 25, 0);
        assert_eq!(state.current_page, 1);
        assert_eq!(state.total_pages, 0);
        assert_eq!(state.start_index, 1);
        assert_eq!(state.end_index, 0);
    }

    #[test]
    fn exact_page_boundary() {
        let state = compute_page_state(2, 25, 50);
        assert_eq!(state.total_pages, 2);
        assert_eq!(state.start_index, 26);
        assert_eq!(state.end_index, 50);
    }

    #[test]
    fn is_idempotent_and_bounded_for_arbitrary_input() {
        for requested in [i64::MIN, -1, 0, 1, 2, 40, i64::MAX] {
            for total in [0u64, 1, 24, 25, 26, 1000] {
                let first = compute_page_state(requested, 25, total);
                let second = compute_page_state(requested, 25, total);
                assert_eq!(first, second);
                assert!(first.current_page >= 1);
                assert!(first.current_page <= first.total_pages.max(1));
                if total == 0 {
                    assert_eq!(first.end_index, 0);
                } else {
                    assert!(first.start_index <= first.end_index);
                    assert!(first.end_index <= total);
                }
            }
        }
    }
}
