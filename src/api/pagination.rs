//! Pagination utilities for list endpoints

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// One page of a filtered listing.
///
/// `total` counts every match before paging, so it does not change when
/// `page` or `per_page` do.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult<T: Serialize> {
    pub total: u64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
    pub data: Vec<T>,
}

impl<T: Serialize> PageResult<T> {
    pub fn new(data: Vec<T>, total: u64, page: i64, per_page: i64) -> Self {
        Self {
            total_pages: total_pages(total, per_page),
            total,
            page,
            per_page,
            data,
        }
    }
}

/// `ceil(total / per_page)`, with `per_page` below 1 treated as 1.
pub fn total_pages(total: u64, per_page: i64) -> i64 {
    let per_page = u64::try_from(per_page.max(1)).unwrap_or(1);
    i64::try_from(total.div_ceil(per_page)).unwrap_or(i64::MAX)
}

impl<T: Serialize> IntoResponse for PageResult<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
