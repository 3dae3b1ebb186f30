//! Concurrent access to the services.

mod common;

use common::{directory, group_id, patch};
use futures::future::join_all;
use scim_directory::resource::{Group, User};
use scim_directory::service::ResourceService;
use scim_directory::{ListQuery, PatchOperation, ScimError};
use serde_json::json;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_member_adds_are_not_lost() {
    let directory = directory();
    let eng = directory.groups().create(Group::new("Eng")).await.unwrap();
    let id = group_id(&eng).to_string();

    let tasks = (0..32).map(|i| {
        let directory = directory.clone();
        let id = id.clone();
        tokio::spawn(async move {
            let request = patch(vec![PatchOperation::add(
                Some("members"),
                json!({"value": format!("member-{}", i)}),
            )]);
            directory.groups().patch(&id, &request).await
        })
    });

    for result in join_all(tasks).await {
        result.unwrap().unwrap();
    }

    let group = directory.groups().get_by_id(&id).await.unwrap().unwrap();
    assert_eq!(group.members.len(), 32);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_of_same_user_name() {
    let directory = directory();

    let tasks = (0..16).map(|_| {
        let directory = directory.clone();
        tokio::spawn(async move { directory.users().create(User::new("contended")).await })
    });

    let results: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    let created = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(ScimError::Conflict { .. })))
        .count();
    assert_eq!(created, 1);
    assert_eq!(conflicts, 15);

    let page = directory.users().list(ListQuery::default()).await.unwrap();
    assert_eq!(page.total_results, 1);
}
