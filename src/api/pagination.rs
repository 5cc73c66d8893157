//! Lazy page-by-page iteration over list endpoints.
use std::{collections::HashSet, vec};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::lib::errors::ApiError;

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_page_url: Option<String>,
}

/// Split a list response into the records under `key` and `meta.next_page_url`.
pub fn decode_page<T: DeserializeOwned>(
    url: &str,
    mut body: Value,
    key: &str,
) -> Result<Page<T>, ApiError> {
    let raw_items = body
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| ApiError::Decode {
            url: url.to_string(),
            message: format!("missing `{key}` array"),
        })?;
    let items = serde_json::from_value(raw_items).map_err(|err| ApiError::Decode {
        url: url.to_string(),
        message: err.to_string(),
    })?;
    let next_page_url = body
        .pointer("/meta/next_page_url")
        .and_then(Value::as_str)
        .filter(|next| !next.is_empty())
        .map(str::to_string);

    Ok(Page {
        items,
        next_page_url,
    })
}

/// Iterator that fetches the next page only once the current one is drained.
///
/// After a failed fetch the error is yielded once and iteration ends. A next
/// page URL that was already fetched ends iteration.
pub struct PageStream<T, F> {
    fetch: F,
    next_url: Option<String>,
    visited: HashSet<String>,
    buffered: vec::IntoIter<T>,
}

impl<T, F> PageStream<T, F>
where
    F: FnMut(&str) -> Result<Page<T>, ApiError>,
{
    pub fn new(first_url: String, fetch: F) -> Self {
        Self {
            fetch,
            next_url: Some(first_url),
            visited: HashSet::new(),
            buffered: Vec::new().into_iter(),
        }
    }
}

impl<T, F> Iterator for PageStream<T, F>
where
    F: FnMut(&str) -> Result<Page<T>, ApiError>,
{
    type Item = Result<T, ApiError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.buffered.next() {
                return Some(Ok(item));
            }
            let url = self.next_url.take()?;
            let fetched = (self.fetch)(&url);
            self.visited.insert(url);
            match fetched {
                Ok(page) => {
                    let visited = &self.visited;
                    self.next_url = page.next_page_url.filter(|next| !visited.contains(next));
                    self.buffered = page.items.into_iter();
                }
                Err(err) => return Some(Err(err)),
            }
        }
    }
}
