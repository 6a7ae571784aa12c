mod common;

use campfire::{
    delete_user, get_group_by_id, get_user_with_groups, insert_group, insert_user, join_group,
    leave_group, list_events_containing, list_events_of_type, list_group_members, list_groups,
    list_user_memberships, record_event,
};
use common::new_user;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test]
async fn joining_twice_keeps_one_membership(pool: PgPool) {
    let alice = insert_user(&pool, &new_user("alice@example.com", "Alice"))
        .await
        .unwrap();
    let rustaceans = insert_group(&pool, "Rustaceans").await.unwrap();
    assert!(get_group_by_id(&pool, rustaceans.id).await.unwrap().is_some());

    let membership = join_group(&pool, alice.id, rustaceans.id, None).await.unwrap();
    assert_eq!(membership.role, "member");

    // Re-joining refreshes the role on the edge instead of duplicating it.
    let membership = join_group(&pool, alice.id, rustaceans.id, Some("admin"))
        .await
        .unwrap();
    assert_eq!(membership.role, "admin");
    assert_eq!(list_user_memberships(&pool, alice.id).await.unwrap().len(), 1);
}

#[sqlx::test]
async fn membership_flattening_and_rosters(pool: PgPool) {
    let alice = insert_user(&pool, &new_user("alice@example.com", "Alice"))
        .await
        .unwrap();
    let bob = insert_user(&pool, &new_user("bob@example.com", "Bob"))
        .await
        .unwrap();
    let rustaceans = insert_group(&pool, "Rustaceans").await.unwrap();
    let gophers = insert_group(&pool, "Gophers").await.unwrap();
    assert_eq!(list_groups(&pool).await.unwrap().len(), 2);

    join_group(&pool, alice.id, rustaceans.id, Some("admin")).await.unwrap();
    join_group(&pool, alice.id, gophers.id, None).await.unwrap();
    join_group(&pool, bob.id, rustaceans.id, None).await.unwrap();

    let with_groups = get_user_with_groups(&pool, alice.id).await.unwrap().unwrap();
    assert_eq!(with_groups.groups.len(), 2);
    let rust_edge = with_groups
        .groups
        .iter()
        .find(|group| group.group_id == rustaceans.id)
        .unwrap();
    assert_eq!(rust_edge.name, "Rustaceans");
    assert_eq!(rust_edge.role, "admin");

    let roster = list_group_members(&pool, rustaceans.id).await.unwrap();
    assert_eq!(roster.len(), 2);
    assert!(roster.iter().any(|member| member.email == "bob@example.com"));

    let gone = leave_group(&pool, bob.id, rustaceans.id).await.unwrap();
    assert!(gone.is_some());
    assert!(leave_group(&pool, bob.id, rustaceans.id).await.unwrap().is_none());
    assert_eq!(list_group_members(&pool, rustaceans.id).await.unwrap().len(), 1);
}

#[sqlx::test]
async fn memberships_vanish_with_either_side(pool: PgPool) {
    let alice = insert_user(&pool, &new_user("alice@example.com", "Alice"))
        .await
        .unwrap();
    let rustaceans = insert_group(&pool, "Rustaceans").await.unwrap();
    join_group(&pool, alice.id, rustaceans.id, None).await.unwrap();

    delete_user(&pool, alice.id).await.unwrap();
    assert!(list_group_members(&pool, rustaceans.id)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test]
async fn containment_queries_match_structurally(pool: PgPool) {
    record_event(
        &pool,
        &json!({
            "type": "purchase",
            "payload": { "sku": "book-1", "amount": 20 },
            "metadata": { "source": "web", "version": 1 },
        }),
    )
    .await
    .unwrap();
    record_event(
        &pool,
        &json!({
            "type": "purchase",
            "payload": { "sku": "book-2", "amount": 5 },
            "metadata": { "source": "mobile", "version": 1 },
        }),
    )
    .await
    .unwrap();
    record_event(&pool, &json!({ "type": "signup", "payload": {} }))
        .await
        .unwrap();

    let purchases = list_events_containing(&pool, &json!({ "type": "purchase" }))
        .await
        .unwrap();
    assert_eq!(purchases.len(), 2);

    // Containment matches nested sub-documents too.
    let from_web = list_events_containing(&pool, &json!({ "metadata": { "source": "web" } }))
        .await
        .unwrap();
    assert_eq!(from_web.len(), 1);
    assert_eq!(from_web[0].data["payload"]["sku"], "book-1");

    let signups = list_events_of_type(&pool, "signup").await.unwrap();
    assert_eq!(signups.len(), 1);
    assert!(list_events_of_type(&pool, "refund").await.unwrap().is_empty());
}
