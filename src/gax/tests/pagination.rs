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

//! Verify list RPC helpers are usable from outside the crate.

#[cfg(test)]
mod tests {
    use gapic_gax::pagination::*;
    use gapic_gax::status::{Code, Status};
    use std::collections::VecDeque;

    #[derive(Clone, Debug, Default)]
    struct ListShelvesResponse {
        shelves: Vec<String>,
        next_page_token: String,
    }

    impl PageableResponse for ListShelvesResponse {
        type PageItem = String;
        fn next_page_token(&self) -> &str {
            &self.next_page_token
        }
        fn items(&self) -> &[String] {
            &self.shelves
        }
        fn into_items(self) -> Vec<String> {
            self.shelves
        }
    }

    // Simulates a list RPC returning `responses` in order. Each traversal
    // clones the closure, and with it, the remaining responses.
    fn list_shelves(
        mut responses: VecDeque<Result<ListShelvesResponse, Status>>,
    ) -> impl FnMut(&mut ListShelvesResponse) -> Status + Clone {
        move |page: &mut ListShelvesResponse| match responses.pop_front() {
            None => Status::new(Code::Internal, "too many calls"),
            Some(Err(status)) => status,
            Some(Ok(r)) => {
                *page = r;
                Status::default()
            }
        }
    }

    fn page(shelves: &[&str], token: &str) -> ListShelvesResponse {
        ListShelvesResponse {
            shelves: shelves.iter().map(|s| s.to_string()).collect(),
            next_page_token: token.to_string(),
        }
    }

    #[test]
    fn stateful_retrieval() -> anyhow::Result<()> {
        let responses = VecDeque::from(vec![
            Ok(page(&["s1", "s2"], "t1")),
            Ok(page(&["s3"], "t2")),
            Ok(page(&[], "")),
        ]);
        let pages = Pages::new(list_shelves(responses), 0);
        let mut tokens = Vec::new();
        let mut shelves = Vec::new();
        for p in &pages {
            let p = p?;
            tokens.push(p.next_page_token().to_string());
            shelves.extend(p);
        }
        assert_eq!(tokens, vec!["t1", "t2"]);
        assert_eq!(shelves, vec!["s1", "s2", "s3"]);

        // Restarting the traversal restarts from a fresh copy of the closure.
        let again = pages.items().collect::<Result<Vec<_>, _>>()?;
        assert_eq!(again, vec!["s1", "s2", "s3"]);
        Ok(())
    }

    #[test]
    fn error_is_reported() {
        let responses = VecDeque::from(vec![
            Ok(page(&["s1"], "t1")),
            Err(Status::new(Code::PermissionDenied, "nope")),
        ]);
        let pages = Pages::new(list_shelves(responses), 0);
        let got: Vec<_> = pages.items().collect();
        assert_eq!(
            got,
            vec![
                Ok("s1".to_string()),
                Err(Status::new(Code::PermissionDenied, "nope"))
            ]
        );
    }
}
