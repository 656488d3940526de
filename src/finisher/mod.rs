//! Post-processing of the aggregate id list
//!
//! Runs on raw video ids, before the output layer adds any tab or URL
//! prefix.

use std::collections::HashSet;

use crate::utils::{VIDEO_ID_ALPHA_PREFIX_LEN, VIDEO_ID_SORT_WIDTH};

/// Optionally dedupe, then sort by numeric suffix.
#[must_use]
pub fn finish_ids(ids: Vec<String>, dedupe: bool) -> Vec<String> {
    let mut ids = if dedupe { dedupe_ids(ids) } else { ids };
    sort_video_ids(&mut ids);
    ids
}

/// Drop repeated ids, keeping the first occurrence of each.
#[must_use]
pub fn dedupe_ids(ids: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.into_iter()
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

/// Sort ids such as `sm9` / `so12` by their numeric part.
///
/// Stable, so equal keys keep their aggregate order.
pub fn sort_video_ids(ids: &mut [String]) {
    ids.sort_by_cached_key(|id| sort_key(id));
}

/// Tail after the two-letter prefix, left-padded with `0` to the sort width.
///
/// Ids shorter than the prefix are padded whole. Tails longer than the width
/// are kept as they are.
#[must_use]
pub fn sort_key(id: &str) -> String {
    let tail = if id.len() >= VIDEO_ID_ALPHA_PREFIX_LEN {
        id.get(VIDEO_ID_ALPHA_PREFIX_LEN..).unwrap_or(id)
    } else {
        id
    };
    format!("{tail:0>width$}", width = VIDEO_ID_SORT_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn sorts_by_numeric_suffix() {
        let mut ids = strings(&["sm12", "sm3", "sm1"]);
        sort_video_ids(&mut ids);
        assert_eq!(ids, strings(&["sm1", "sm3", "sm12"]));
    }

    #[test]
    fn prefix_letters_do_not_affect_order() {
        let mut ids = strings(&["so20", "sm100", "nm7"]);
        sort_video_ids(&mut ids);
        assert_eq!(ids, strings(&["nm7", "so20", "sm100"]));
    }

    #[test]
    fn short_ids_compare_whole() {
        let mut ids = strings(&["sm12", "s", "sm3"]);
        sort_video_ids(&mut ids);
        assert_eq!(ids, strings(&["sm3", "s", "sm12"]));
    }

    #[test]
    fn sorting_sorted_list_is_noop() {
        let sorted = strings(&["sm1", "sm2", "sm10", "sm200"]);
        let mut ids = sorted.clone();
        sort_video_ids(&mut ids);
        assert_eq!(ids, sorted);
    }

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let ids = strings(&["sm2", "sm1", "sm2", "sm3", "sm1"]);
        assert_eq!(dedupe_ids(ids), strings(&["sm2", "sm1", "sm3"]));
    }

    #[test]
    fn dedupe_of_unique_list_is_noop() {
        let ids = strings(&["sm1", "sm3", "sm2"]);
        assert_eq!(dedupe_ids(ids.clone()), ids);
    }

    #[test]
    fn finish_dedupes_then_sorts() {
        let ids = strings(&["sm2", "sm1", "sm1"]);
        assert_eq!(finish_ids(ids.clone(), true), strings(&["sm1", "sm2"]));
        assert_eq!(finish_ids(ids, false), strings(&["sm1", "sm1", "sm2"]));
    }

    #[test]
    fn non_ascii_ids_do_not_panic() {
        let mut ids = strings(&["é1", "sm2", "あ"]);
        sort_video_ids(&mut ids);
        assert_eq!(ids.len(), 3);
    }
}
