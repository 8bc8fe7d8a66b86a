//! Non-blocking executor
//!
//! Same contract as [`super::executor`]: identical request construction,
//! identical parsing, identical error kinds. Only the transport call and the
//! inter-page pause are suspension points.

use arize_domain::{ArizeError, Result};
use tracing::{debug, warn};

use super::descriptor::{QueryDescriptor, Variables};
use super::executor::{next_cursor, PaginationOptions};
use super::parse::{parse_response, Page};
use super::ports::AsyncGraphQlTransport;
use super::request::GraphQlRequest;

async fn fetch_page<D, T>(
    transport: &T,
    variables: &D::Variables,
    cursor: Option<&str>,
) -> Result<Page<D::Item>>
where
    D: QueryDescriptor,
    T: AsyncGraphQlTransport + ?Sized,
{
    let request = GraphQlRequest::build::<D>(variables, cursor)?;
    debug!(descriptor = D::NAME, cursor = ?cursor, "executing GraphQL operation");
    let raw = transport
        .execute(&request)
        .await
        .map_err(|e| e.into_query(D::DESCRIPTION))?;
    parse_response::<D>(&raw, variables)
}

pub async fn run_single<D, T>(transport: &T, variables: &D::Variables) -> Result<D::Item>
where
    D: QueryDescriptor,
    T: AsyncGraphQlTransport + ?Sized,
{
    variables.validate()?;
    let page = fetch_page::<D, T>(transport, variables, None).await?;
    page.items
        .into_iter()
        .next()
        .ok_or_else(|| ArizeError::not_found(D::DESCRIPTION, "result not found"))
}

pub async fn run_list<D, T>(transport: &T, variables: &D::Variables) -> Result<Vec<D::Item>>
where
    D: QueryDescriptor,
    T: AsyncGraphQlTransport + ?Sized,
{
    variables.validate()?;
    Ok(fetch_page::<D, T>(transport, variables, None).await?.items)
}

pub async fn run_paginated<D, T>(
    transport: &T,
    variables: &D::Variables,
    options: &PaginationOptions,
) -> Result<Vec<D::Item>>
where
    D: QueryDescriptor,
    T: AsyncGraphQlTransport + ?Sized,
{
    variables.validate()?;

    let mut items = Vec::new();
    let mut cursor: Option<String> = None;

    for page_number in 0..options.max_pages {
        if page_number > 0 && !options.page_delay.is_zero() {
            tokio::time::sleep(options.page_delay).await;
        }

        let page = fetch_page::<D, T>(transport, variables, cursor.as_deref()).await?;
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
