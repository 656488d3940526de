//! Per-account page walker
//!
//! Pages are requested strictly in sequence. The walk stops on:
//! - `max_pages` exceeded, a 404, or an empty page (clean end)
//! - `max_items` reached, even in the middle of a page (clean end)
//! - cancellation or an attempt deadline (clean end, matches kept)
//! - exhausted retries or an undecodable page (matches kept, error returned)

use chrono::{DateTime, Days, NaiveDate, Utc};
use log::{debug, error};
use tokio_util::sync::CancellationToken;

use super::fetch_types::FetchError;
use super::listing_data::{Essential, ListingPage};
use super::retrier::RequestRetrier;
use crate::config::FetchConfig;
use crate::utils::PAGE_SIZE;

/// Comment-count and upload-date predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingFilter {
    comment_threshold: i64,
    /// Inclusive lower bound, UTC midnight of the first day.
    not_before: Option<DateTime<Utc>>,
    /// Exclusive upper bound, UTC midnight after the last day.
    before: Option<DateTime<Utc>>,
}

impl ListingFilter {
    /// Build a filter over the inclusive day range `[after, before]`.
    #[must_use]
    pub fn new(comment_threshold: i64, after: NaiveDate, before: NaiveDate) -> Self {
        Self {
            comment_threshold,
            not_before: utc_midnight(after),
            before: before
                .checked_add_days(Days::new(1))
                .and_then(utc_midnight),
        }
    }

    /// True iff the entry has more comments than the threshold and was
    /// registered inside the day range. Entries without a timestamp never match.
    #[must_use]
    pub fn matches(&self, entry: &Essential) -> bool {
        if entry.count.comment <= self.comment_threshold {
            return false;
        }
        let Some(registered_at) = entry.registered_at.map(|t| t.with_timezone(&Utc)) else {
            return false;
        };
        if self.not_before.is_some_and(|bound| registered_at < bound) {
            return false;
        }
        self.before.is_none_or(|bound| registered_at < bound)
    }
}

fn utc_midnight(day: NaiveDate) -> Option<DateTime<Utc>> {
    day.and_hms_opt(0, 0, 0).map(|at| at.and_utc())
}

/// Walks one account's listing and collects matching video ids
#[derive(Debug, Clone)]
pub struct ListingFetcher {
    retrier: RequestRetrier,
    base_url: String,
    filter: ListingFilter,
    max_pages: u32,
    max_items: usize,
}

impl ListingFetcher {
    #[must_use]
    pub fn new(retrier: RequestRetrier, config: &FetchConfig) -> Self {
        Self {
            retrier,
            base_url: config.base_url().to_string(),
            filter: ListingFilter::new(
                config.comment_threshold(),
                config.date_after(),
                config.date_before(),
            ),
            max_pages: config.max_pages(),
            max_items: config.max_items(),
        }
    }

    #[must_use]
    pub fn page_url(&self, user_id: &str, page: u32) -> String {
        format!(
            "{}/users/{user_id}/videos?pageSize={PAGE_SIZE}&page={page}",
            self.base_url
        )
    }

    /// Collect matching ids for `user_id`, in listing order
    ///
    /// The ids gathered so far are returned on every path. The error is set
    /// only for exhausted retries and decode failures; cancellation and
    /// attempt deadlines end the walk without one.
    pub async fn fetch_user_videos(
        &self,
        user_id: &str,
        cancel: &CancellationToken,
    ) -> (Vec<String>, Option<FetchError>) {
        let mut matched = Vec::new();
        let mut page: u32 = 1;

        loop {
            if self.max_pages > 0 && page > self.max_pages {
                debug!("user {user_id}: page limit {} reached", self.max_pages);
                break;
            }

            let url = self.page_url(user_id, page);
            let response = match self.retrier.get(&url, cancel).await {
                Ok(response) => response,
                Err(e) if e.is_cancellation() => {
                    debug!("user {user_id}: fetch aborted on page {page}: {e}");
                    return (matched, None);
                }
                Err(e) => return (matched, Some(e)),
            };

            if response.is_not_found() {
                debug!("user {user_id}: no page {page}");
                break;
            }

            let listing = match ListingPage::from_slice(&response.body) {
                Ok(listing) => listing,
                Err(e) => {
                    error!("user {user_id}: undecodable page {page}: {e}");
                    return (
                        matched,
                        Some(FetchError::Decode {
                            url,
                            message: e.to_string(),
                        }),
                    );
                }
            };

            if listing.data.items.is_empty() {
                break;
            }

            for item in &listing.data.items {
                if !self.filter.matches(&item.essential) {
                    continue;
                }
                matched.push(item.essential.id.clone());
                if self.max_items > 0 && matched.len() >= self.max_items {
                    debug!("user {user_id}: item limit {} reached", self.max_items);
                    return (matched, None);
                }
            }

            page = match page.checked_add(1) {
                Some(next) => next,
                None => break,
            };
        }

        (matched, None)
    }
}
