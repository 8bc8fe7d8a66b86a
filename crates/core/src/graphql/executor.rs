//! Blocking executor
//!
//! Three modes over one [`QueryDescriptor`]:
//! - [`run_single`] - exactly one item, zero is `NotFound`
//! - [`run_list`] - every item of a single response
//! - [`run_paginated`] - follow `endCursor` until the server stops or the
//!   page cap is reached

use std::time::Duration;

use arize_domain::constants::DEFAULT_MAX_PAGES;
use arize_domain::{ArizeError, Result};
use tracing::{debug, warn};

use super::descriptor::{QueryDescriptor, Variables};
use super::parse::{parse_response, Page};
use super::ports::GraphQlTransport;
use super::request::GraphQlRequest;

/// Paging limits shared by both executors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationOptions {
    /// Pause between consecutive page requests
    pub page_delay: Duration,
    /// Hard cap on pages fetched per call
    pub max_pages: usize,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self { page_delay: Duration::ZERO, max_pages: DEFAULT_MAX_PAGES }
    }
}

impl PaginationOptions {
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }
}

/// Outcome of inspecting one page: keep going with this cursor, or stop.
pub(crate) fn next_cursor<T>(name: &str, page: &Page<T>) -> Option<String> {
    if !page.has_next_page {
        return None;
    }
    match page.end_cursor.as_deref() {
        Some(cursor) => Some(cursor.to_string()),
        None => {
            warn!(descriptor = name, "server reported hasNextPage without endCursor; stopping");
            None
        }
    }
}

fn fetch_page<D, T>(
    transport: &T,
    variables: &D::Variables,
    cursor: Option<&str>,
) -> Result<Page<D::Item>>
where
    D: QueryDescriptor,
    T: GraphQlTransport + ?Sized,
{
    let request = GraphQlRequest::build::<D>(variables, cursor)?;
    debug!(descriptor = D::NAME, cursor = ?cursor, "executing GraphQL operation");
    let raw = transport
        .execute(&request)
        .map_err(|e| e.into_query(D::DESCRIPTION))?;
    parse_response::<D>(&raw, variables)
}

/// Execute `D` and return its single item.
pub fn run_single<D, T>(transport: &T, variables: &D::Variables) -> Result<D::Item>
where
    D: QueryDescriptor,
    T: GraphQlTransport + ?Sized,
{
    variables.validate()?;
    let page = fetch_page::<D, T>(transport, variables, None)?;
    page.items
        .into_iter()
        .next()
        .ok_or_else(|| ArizeError::not_found(D::DESCRIPTION, "result not found"))
}

/// Execute `D` once and return every item of the response.
pub fn run_list<D, T>(transport: &T, variables: &D::Variables) -> Result<Vec<D::Item>>
where
    D: QueryDescriptor,
    T: GraphQlTransport + ?Sized,
{
    variables.validate()?;
    Ok(fetch_page::<D, T>(transport, variables, None)?.items)
}

/// Follow the cursor chain, concatenating items in page order.
///
/// Sleeps `page_delay` between requests (never before the first). An error
/// on any page discards everything collected so far.
pub fn run_paginated<D, T>(
    transport: &T,
    variables: &D::Variables,
    options: &PaginationOptions,
) -> Result<Vec<D::Item>>
where
    D: QueryDescriptor,
    T: GraphQlTransport + ?Sized,
{
    variables.validate()?;

    let mut items = Vec::new();
    let mut cursor: Option<String> = None;

    for page_number in 0..options.max_pages {
        if page_number > 0 && !options.page_delay.is_zero() {
            std::thread::sleep(options.page_delay);
        }

        let page = fetch_page::<D, T>(transport, variables, cursor.as_deref())?;
        let next = next_cursor(D::NAME, &page);
        items.extend(page.items);

        match next {
            Some(next) => cursor = Some(next),
            None => {
                debug!(descriptor = D::NAME, pages = page_number + 1, items = items.len(), "pagination complete");
                return Ok(items);
            }
        }
    }

    warn!(descriptor = D::NAME, max_pages = options.max_pages, "page cap reached; results truncated");
    Ok(items)
}
