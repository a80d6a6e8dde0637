use futures_util::future::LocalBoxFuture;

use crate::error::FetchError;

/// Retrieves fragment markup by URL. No caching: every call fetches.
pub trait FragmentSource {
    fn fetch_text<'a>(&'a self, url: &'a str) -> LocalBoxFuture<'a, Result<String, FetchError>>;
}
