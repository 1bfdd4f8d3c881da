// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Iterate over the results of list RPCs.
//!
//! List RPCs return their results in pages. Each page contains some elements
//! and a continuation token to fetch the next page. [Pages] turns a function
//! that fetches one page into a lazy sequence of pages.
//!
//! The sequence ends when a page has an empty continuation token, or when
//! the optional page limit is reached. A page with an empty continuation
//! token marks the end of the sequence, it is not returned.
//!
//! # Example
//! ```
//! # use gapic_gax::pagination::*;
//! # use gapic_gax::status::Status;
//! #[derive(Default)]
//! struct ListBooksResponse {
//!     books: Vec<String>,
//!     next_page_token: String,
//! }
//!
//! impl PageableResponse for ListBooksResponse {
//!     type PageItem = String;
//!     fn next_page_token(&self) -> &str { &self.next_page_token }
//!     fn items(&self) -> &[String] { &self.books }
//!     fn into_items(self) -> Vec<String> { self.books }
//! }
//!
//! let mut calls = 0;
//! let pages = Pages::new(move |page: &mut ListBooksResponse| {
//!     calls += 1;
//!     page.books = vec![format!("book-{calls}")];
//!     if calls < 3 {
//!         page.next_page_token = format!("token-{calls}");
//!     }
//!     Status::default()
//! }, 0);
//! let books = pages.items().collect::<Result<Vec<_>, _>>()?;
//! assert_eq!(books, vec!["book-1", "book-2"]);
//! # Ok::<(), Status>(())
//! ```

use crate::status::Status;
use std::marker::PhantomData;

/// Describes the response of a list RPC.
///
/// The [Default] value is the cleared page, used as the output parameter of
/// the page retrieval function.
pub trait PageableResponse: Default {
    /// The type of the elements in each page.
    type PageItem;

    /// The continuation token, empty on the last page.
    fn next_page_token(&self) -> &str;

    /// The elements in this page.
    fn items(&self) -> &[Self::PageItem];

    /// Consumes the page and returns its elements.
    fn into_items(self) -> Vec<Self::PageItem>;
}

/// One page returned by a list RPC.
#[derive(Clone, Debug, PartialEq)]
pub struct PageResult<P> {
    page: P,
}

impl<P> PageResult<P>
where
    P: PageableResponse,
{
    /// Wraps a page.
    pub fn new(page: P) -> Self {
        Self { page }
    }

    /// The continuation token for the next page.
    pub fn next_page_token(&self) -> &str {
        self.page.next_page_token()
    }

    /// Iterate over the elements in this page.
    pub fn iter(&self) -> std::slice::Iter<'_, P::PageItem> {
        self.page.items().iter()
    }

    /// The full response, including any fields other than the elements.
    pub fn raw_page(&self) -> &P {
        &self.page
    }

    /// Consumes this object and returns the full response.
    pub fn into_raw_page(self) -> P {
        self.page
    }
}

impl<P> IntoIterator for PageResult<P>
where
    P: PageableResponse,
{
    type Item = P::PageItem;
    type IntoIter = std::vec::IntoIter<P::PageItem>;
    fn into_iter(self) -> Self::IntoIter {
        self.page.into_items().into_iter()
    }
}

impl<'a, P> IntoIterator for &'a PageResult<P>
where
    P: PageableResponse,
{
    type Item = &'a P::PageItem;
    type IntoIter = std::slice::Iter<'a, P::PageItem>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A restartable sequence of pages.
///
/// Each traversal starts from a clone of the retrieval function, so the same
/// [Pages] can be traversed many times, and each traversal starts from the
/// first page.
///
/// A failed retrieval is returned as an `Err` item, after that the traversal
/// ends.
pub struct Pages<P, F> {
    get_next_page: F,
    max_pages: usize,
    _page: PhantomData<fn() -> P>,
}

impl<P, F> Pages<P, F>
where
    P: PageableResponse,
    F: FnMut(&mut P) -> Status + Clone,
{
    /// Creates a new sequence.
    ///
    /// # Parameters
    /// * `get_next_page` - fills the page passed as an argument with the next
    ///   page, the function carries the continuation token between calls.
    /// * `max_pages` - stop after this many pages, zero means no limit.
    pub fn new(get_next_page: F, max_pages: usize) -> Self {
        Self {
            get_next_page,
            max_pages,
            _page: PhantomData,
        }
    }

    /// Starts a new traversal.
    pub fn iter(&self) -> PageIter<P, F> {
        PageIter {
            get_next_page: self.get_next_page.clone(),
            max_pages: self.max_pages,
            page_count: 0,
            done: false,
            _page: PhantomData,
        }
    }

    /// Starts a new traversal over the elements of all pages.
    pub fn items(&self) -> Items<P, F> {
        Items {
            pages: self.iter(),
            current: None,
        }
    }
}

impl<'a, P, F> IntoIterator for &'a Pages<P, F>
where
    P: PageableResponse,
    F: FnMut(&mut P) -> Status + Clone,
{
    type Item = Result<PageResult<P>, Status>;
    type IntoIter = PageIter<P, F>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One traversal over a [Pages] sequence.
pub struct PageIter<P, F> {
    get_next_page: F,
    max_pages: usize,
    page_count: usize,
    done: bool,
    _page: PhantomData<fn() -> P>,
}

impl<P, F> Iterator for PageIter<P, F>
where
    P: PageableResponse,
    F: FnMut(&mut P) -> Status,
{
    type Item = Result<PageResult<P>, Status>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.max_pages != 0 && self.page_count >= self.max_pages {
            self.done = true;
            return None;
        }
        let mut page = P::default();
        let status = (self.get_next_page)(&mut page);
        if !status.is_ok() {
            tracing::debug!(page_count = self.page_count, %status, "page retrieval failed");
            self.done = true;
            return Some(Err(status));
        }
        if page.next_page_token().is_empty() {
            self.done = true;
            return None;
        }
        self.page_count += 1;
        Some(Ok(PageResult::new(page)))
    }
}

impl<P, F> std::iter::FusedIterator for PageIter<P, F>
where
    P: PageableResponse,
    F: FnMut(&mut P) -> Status,
{
}

/// One traversal over the elements of a [Pages] sequence.
pub struct Items<P: PageableResponse, F> {
    pages: PageIter<P, F>,
    current: Option<std::vec::IntoIter<P::PageItem>>,
}

impl<P, F> Iterator for Items<P, F>
where
    P: PageableResponse,
    F: FnMut(&mut P) -> Status,
{
    type Item = Result<P::PageItem, Status>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.current.as_mut().and_then(Iterator::next) {
                return Some(Ok(item));
            }
            match self.pages.next()? {
                Ok(page) => self.current = Some(page.into_iter()),
                Err(status) => return Some(Err(status)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Code;
    use test_case::test_case;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct TestPage {
        items: Vec<String>,
        next_page_token: String,
        extra: i32,
    }

    impl PageableResponse for TestPage {
        type PageItem = String;
        fn next_page_token(&self) -> &str {
            &self.next_page_token
        }
        fn items(&self) -> &[String] {
            &self.items
        }
        fn into_items(self) -> Vec<String> {
            self.items
        }
    }

    // Returns pages with tokens "NextPage1" to "NextPage9", and then a page
    // with an empty token.
    fn ten_pages() -> impl FnMut(&mut TestPage) -> Status + Clone {
        let mut count = 0;
        move |page: &mut TestPage| {
            count += 1;
            page.items = vec![format!("item-{count}-a"), format!("item-{count}-b")];
            page.extra = count;
            if count < 10 {
                page.next_page_token = format!("NextPage{count}");
            }
            Status::default()
        }
    }

    #[test]
    fn page_result() {
        let page = TestPage {
            items: vec!["a".to_string(), "b".to_string()],
            next_page_token: "token".to_string(),
            extra: 42,
        };
        let result = PageResult::new(page.clone());
        assert_eq!(result.next_page_token(), "token");
        assert_eq!(result.raw_page(), &page);
        let by_ref: Vec<&String> = result.iter().collect();
        assert_eq!(by_ref, vec!["a", "b"]);
        let mut count = 0;
        for _ in &result {
            count += 1;
        }
        assert_eq!(count, 2);
        let by_value: Vec<String> = result.into_iter().collect();
        assert_eq!(by_value, vec!["a", "b"]);
    }

    #[test]
    fn page_result_into_raw() {
        let page = TestPage::default();
        let result = PageResult::new(page.clone());
        assert_eq!(result.into_raw_page(), page);
    }

    #[test_case(0, 9; "uncapped")]
    #[test_case(5, 5; "capped")]
    #[test_case(9, 9; "cap at end")]
    #[test_case(20, 9; "cap past end")]
    fn page_count(max_pages: usize, want: usize) -> anyhow::Result<()> {
        let pages = Pages::new(ten_pages(), max_pages);
        let tokens = pages
            .iter()
            .map(|p| p.map(|p| p.next_page_token().to_string()))
            .collect::<Result<Vec<_>, _>>()?;
        let expected: Vec<String> = (1..=want).map(|i| format!("NextPage{i}")).collect();
        assert_eq!(tokens, expected);
        Ok(())
    }

    #[test]
    fn restartable() -> anyhow::Result<()> {
        let pages = Pages::new(ten_pages(), 0);
        let first = pages.iter().collect::<Result<Vec<_>, _>>()?;
        let second = pages.iter().collect::<Result<Vec<_>, _>>()?;
        assert_eq!(first.len(), 9);
        assert_eq!(first, second);
        assert_eq!(first[0].raw_page().extra, 1);

        let mut iter = (&pages).into_iter();
        let p = iter.next().expect("at least one page")?;
        assert_eq!(p.next_page_token(), "NextPage1");
        Ok(())
    }

    #[test]
    fn retrieval_error() {
        let mut count = 0;
        let pages = Pages::new(
            move |page: &mut TestPage| {
                count += 1;
                if count == 3 {
                    return Status::new(Code::Unavailable, "try again");
                }
                page.items = vec![format!("item-{count}")];
                page.next_page_token = format!("NextPage{count}");
                Status::default()
            },
            0,
        );
        let mut iter = pages.iter();
        assert!(matches!(iter.next(), Some(Ok(_))));
        assert!(matches!(iter.next(), Some(Ok(_))));
        let err = iter.next();
        assert!(
            matches!(&err, Some(Err(s)) if s.code() == Code::Unavailable),
            "{:?}",
            err.map(|r| r.map(|p| p.into_raw_page()))
        );
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }

    #[test]
    fn items() -> anyhow::Result<()> {
        let pages = Pages::new(ten_pages(), 2);
        let items = pages.items().collect::<Result<Vec<_>, _>>()?;
        assert_eq!(items, vec!["item-1-a", "item-1-b", "item-2-a", "item-2-b"]);
        Ok(())
    }

    #[test]
    fn items_error() {
        let mut count = 0;
        let pages = Pages::new(
            move |page: &mut TestPage| {
                count += 1;
                if count == 2 {
                    return Status::new(Code::PermissionDenied, "nope");
                }
                page.items = vec!["a".to_string()];
                page.next_page_token = "more".to_string();
                Status::default()
            },
            0,
        );
        let got: Vec<_> = pages.items().collect();
        assert_eq!(
            got,
            vec![
                Ok("a".to_string()),
                Err(Status::new(Code::PermissionDenied, "nope"))
            ]
        );
    }

    #[test]
    fn empty_first_page() {
        let pages = Pages::new(|_: &mut TestPage| Status::default(), 0);
        assert!(pages.iter().next().is_none());
        assert!(pages.items().next().is_none());
    }
}
