//! # Provisioning Walkthrough
//!
//! Runs a typical identity-provider provisioning sequence against an in-memory directory
//! through the operation handler, the way an HTTP layer would drive it.
//!
//! ```bash
//! RUST_LOG=debug cargo run --example provisioning
//! ```

use scim_directory::{
    ListQuery, ResourceKind, ScimOperationHandler, ScimOperationRequest, ScimOperationResponse,
    ServiceConfig, storage::InMemoryStorage,
};
use serde_json::{Value, json};

fn report(step: &str, response: &ScimOperationResponse) {
    log::info!("{} -> {}", step, response.status);
    if let Some(body) = &response.body {
        match serde_json::to_string_pretty(body) {
            Ok(pretty) => println!("{}\n{}\n", step, pretty),
            Err(e) => log::warn!("Could not render body: {}", e),
        }
    }
}

fn id_of(response: &ScimOperationResponse) -> Result<String, Box<dyn std::error::Error>> {
    response
        .body
        .as_ref()
        .and_then(|body| body.get("id"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| format!("response {} carried no id", response.status).into())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let config = ServiceConfig::builder()
        .base_location("https://scim.example.com/scim/v2")
        .default_count(10)
        .max_count(100)
        .build()?;
    let handler = ScimOperationHandler::with_storage(InMemoryStorage::new(), config);

    let alice = handler
        .handle_operation(ScimOperationRequest::create(
            ResourceKind::User,
            json!({
                "schemas": ["urn:ietf:params:scim:schemas:core:2.0:User"],
                "userName": "alice@example.com",
                "name": {"givenName": "Alice", "familyName": "Liddell"},
                "emails": [{"value": "alice@example.com", "type": "work", "primary": true}]
            }),
        ))
        .await;
    report("Create alice", &alice);
    let alice_id = id_of(&alice)?;

    let bob = handler
        .handle_operation(ScimOperationRequest::create(
            ResourceKind::User,
            json!({"userName": "bob@example.com", "displayName": "Bob"}),
        ))
        .await;
    let bob_id = id_of(&bob)?;

    let duplicate = handler
        .handle_operation(ScimOperationRequest::create(
            ResourceKind::User,
            json!({"userName": "alice@example.com"}),
        ))
        .await;
    report("Create duplicate alice", &duplicate);

    let eng = handler
        .handle_operation(ScimOperationRequest::create(
            ResourceKind::Group,
            json!({"displayName": "Eng"}),
        ))
        .await;
    let eng_id = id_of(&eng)?;

    let add_members = handler
        .handle_operation(ScimOperationRequest::patch(
            ResourceKind::Group,
            &eng_id,
            json!({
                "schemas": ["urn:ietf:params:scim:api:messages:2.0:PatchOp"],
                "Operations": [
                    {"op": "Add", "path": "members", "value": [{"value": alice_id}, {"value": bob_id}]}
                ]
            }),
        ))
        .await;
    report("Add members to Eng", &add_members);

    let remove_bob = handler
        .handle_operation(ScimOperationRequest::patch(
            ResourceKind::Group,
            &eng_id,
            json!({
                "Operations": [
                    {"op": "remove", "path": format!("members[value eq \"{}\"]", bob_id)},
                    {"op": "replace", "value": {"displayName": "Engineering"}}
                ]
            }),
        ))
        .await;
    report("Remove bob, rename group", &remove_bob);

    let deactivate = handler
        .handle_operation(ScimOperationRequest::patch(
            ResourceKind::User,
            &bob_id,
            json!({"Operations": [{"op": "replace", "path": "active", "value": false}]}),
        ))
        .await;
    report("Deactivate bob", &deactivate);

    let users = handler
        .handle_operation(
            ScimOperationRequest::list(ResourceKind::User).with_query(ListQuery::new(Some(1), Some(10))),
        )
        .await;
    report("List users", &users);

    let deleted = handler
        .handle_operation(ScimOperationRequest::delete(ResourceKind::User, &bob_id))
        .await;
    report("Delete bob", &deleted);

    let missing = handler
        .handle_operation(ScimOperationRequest::get(ResourceKind::User, &bob_id))
        .await;
    report("Get deleted bob", &missing);

    Ok(())
}
