//! Limit/offset handling shared by the list endpoints.

use actix_web::HttpRequest;
use pagination::{Page, PageParams, PageRequest, Paginated, PaginationError};
use serde_json::json;
use url::Url;

use crate::domain::Error;

/// Normalise client pagination parameters against the configured default.
pub(crate) fn page_request(params: PageParams, default_limit: u32) -> Result<PageRequest, Error> {
    PageRequest::from_params(params, default_limit).map_err(|err| match err {
        PaginationError::ZeroLimit => Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "limit", "code": "zero_limit" })),
        PaginationError::InvalidDefault { .. } => Error::internal(err.to_string()),
    })
}

/// Absolute URL of the current request, used as the base for page links.
pub(crate) fn request_url(req: &HttpRequest) -> Result<Url, Error> {
    let info = req.connection_info();
    let raw = format!("{}://{}{}", info.scheme(), info.host(), req.uri());
    Url::parse(&raw).map_err(|err| Error::internal(format!("request URL {raw} is invalid: {err}")))
}

/// Wrap a page of domain values into the list envelope.
pub(crate) fn paginated<T, U>(
    req: &HttpRequest,
    page: Page<T>,
    convert: impl FnMut(T) -> U,
) -> Result<Paginated<U>, Error> {
    let base = request_url(req)?;
    Ok(Paginated::from_page(page.map(convert), &base))
}
