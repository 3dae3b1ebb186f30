//! Property-based tests for pagination and the patch engine.
//!
//! Uses proptest for input generation; async service calls are driven with
//! `tokio_test::block_on` since proptest bodies are synchronous.

mod common;

use common::{directory, group_id, patch};
use proptest::prelude::*;
use scim_directory::patch::{PathExpression, apply};
use scim_directory::resolver::NoopResolver;
use scim_directory::resource::{Group, Member, User};
use scim_directory::service::ResourceService;
use scim_directory::{ListQuery, PatchOperation};
use serde_json::json;
use std::collections::HashSet;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Walking the whole collection page by page visits every resource exactly once.
    #[test]
    fn pagination_partition_covers_all(n in 0usize..25, count in 1i64..8) {
        tokio_test::block_on(async {
            let directory = directory();
            for i in 0..n {
                directory.users().create(User::new(format!("user-{:03}", i))).await.unwrap();
            }

            let mut seen = Vec::new();
            let mut start = 1i64;
            loop {
                let page = directory
                    .users()
                    .list(ListQuery::new(Some(start), Some(count)))
                    .await
                    .unwrap();
                prop_assert_eq!(page.total_results, n);
                prop_assert_eq!(page.items_per_page, page.resources.len());
                if page.resources.is_empty() {
                    break;
                }
                seen.extend(page.resources.into_iter().map(|u| u.user_name));
                start += count;
            }

            prop_assert_eq!(seen.len(), n);
            let unique: HashSet<_> = seen.iter().collect();
            prop_assert_eq!(unique.len(), n);
            let mut sorted = seen.clone();
            sorted.sort();
            prop_assert_eq!(sorted, seen);
            Ok(())
        })?;
    }

    /// Adding the same members any number of times keeps each exactly once.
    #[test]
    fn add_members_is_idempotent(
        values in prop::collection::vec("[a-f]{1,3}", 1..6),
        repeats in 1usize..4,
    ) {
        tokio_test::block_on(async {
            let directory = directory();
            let eng = directory.groups().create(Group::new("Eng")).await.unwrap();
            let entries: Vec<_> = values.iter().map(|v| json!({"value": v})).collect();
            let request = patch(vec![PatchOperation::add(Some("members"), json!(entries))]);

            let mut group = eng;
            for _ in 0..repeats {
                group = directory
                    .groups()
                    .patch(group_id(&group), &request)
                    .await
                    .unwrap();
            }

            let distinct: HashSet<_> = values.iter().collect();
            prop_assert_eq!(group.members.len(), distinct.len());
            for value in &values {
                prop_assert_eq!(group.members.iter().filter(|m| &m.value == value).count(), 1);
            }
            Ok(())
        })?;
    }

    /// A filtered remove drops exactly the matching members and nothing else.
    #[test]
    fn filtered_remove_is_exact(
        values in prop::collection::vec("[a-d]", 0..8),
        target in "[a-d]",
    ) {
        let mut group = Group::new("Eng");
        group.members = values.iter().map(Member::new).collect();

        let op = PatchOperation::remove(&format!("members[value eq \"{}\"]", target));
        let once = tokio_test::block_on(apply(group, &op, &NoopResolver));
        let twice = tokio_test::block_on(apply(once.clone(), &op, &NoopResolver));

        let expected: Vec<_> = values.iter().filter(|v| **v != target).cloned().collect();
        let remaining: Vec<_> = once.members.iter().map(|m| m.value.clone()).collect();
        prop_assert_eq!(remaining, expected);
        prop_assert_eq!(once, twice);
    }

    /// The parser never panics, whatever the input.
    #[test]
    fn path_parser_is_total(path in ".{0,40}") {
        let _ = PathExpression::parse(Some(&path), &["members"]);
    }

    /// Quoted literals survive a render and re-parse.
    #[test]
    fn filter_literals_round_trip(literal in "[ -~]{0,20}") {
        let path = PathExpression::Filtered {
            collection: "members".to_string(),
            filter: scim_directory::patch::ValueFilter {
                attribute: "value".to_string(),
                value: literal,
            },
        };
        let reparsed = PathExpression::parse(Some(&path.to_string()), &["members"]);
        prop_assert_eq!(reparsed, Ok(path));
    }
}
