mod common;

use campfire::{
    author_stats, average_post_views, count_active_users, count_distinct_authors,
    count_published_posts, count_users, increment_post_views, insert_comment, insert_post,
    insert_profile, insert_user, list_comments_with_context, post_counts_by_author,
    post_views_range, prolific_authors, total_post_views, users_with_post_stats, NewComment,
    NewProfile, Post, User,
};
use common::{new_post, new_user};
use sqlx::PgPool;

/// The canonical fixture: alice & bob, a profile for alice, two published
/// posts by alice plus one draft by bob, three comments.
async fn seed_scenario(pool: &PgPool) -> (User, User, Post, Post) {
    let alice = insert_user(pool, &new_user("alice@example.com", "Alice"))
        .await
        .unwrap();
    let bob = insert_user(pool, &new_user("bob@example.com", "Bob"))
        .await
        .unwrap();
    insert_profile(
        pool,
        &NewProfile {
            user_id: alice.id,
            bio: Some("Software engineer".to_owned()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let post_1 = insert_post(pool, &new_post("Getting Started", "getting-started", true, alice.id))
        .await
        .unwrap();
    let post_2 = insert_post(pool, &new_post("Best Practices", "best-practices", true, alice.id))
        .await
        .unwrap();
    insert_post(pool, &new_post("Draft Post", "draft-post", false, bob.id))
        .await
        .unwrap();

    for (content, post_id, author_id) in [
        ("Great post!", post_1.id, bob.id),
        ("Very helpful, thanks!", post_1.id, alice.id),
        ("Bookmarked!", post_2.id, bob.id),
    ] {
        insert_comment(
            pool,
            &NewComment {
                content: content.to_owned(),
                post_id,
                author_id,
            },
        )
        .await
        .unwrap();
    }

    (alice, bob, post_1, post_2)
}

#[sqlx::test]
async fn canonical_scenario_counts(pool: PgPool) {
    let (alice, _bob, _post_1, _post_2) = seed_scenario(&pool).await;

    assert_eq!(count_published_posts(&pool).await.unwrap(), 2);

    let counts = post_counts_by_author(&pool).await.unwrap();
    let alice_count = counts
        .iter()
        .find(|row| row.author_id == alice.id)
        .unwrap();
    assert_eq!(alice_count.post_count, 2);

    // HAVING count > 1 keeps alice only; at-threshold authors are excluded.
    let prolific = prolific_authors(&pool, 1).await.unwrap();
    assert_eq!(prolific.len(), 1);
    assert_eq!(prolific[0].author_id, alice.id);
    assert!(prolific_authors(&pool, 2).await.unwrap().is_empty());
}

#[sqlx::test]
async fn scalar_aggregates(pool: PgPool) {
    assert_eq!(count_users(&pool).await.unwrap(), 0);
    assert_eq!(total_post_views(&pool).await.unwrap(), 0);
    assert!(average_post_views(&pool).await.unwrap().is_none());

    let (_alice, _bob, post_1, post_2) = seed_scenario(&pool).await;

    assert_eq!(count_users(&pool).await.unwrap(), 2);
    assert_eq!(count_active_users(&pool).await.unwrap(), 2);
    assert_eq!(count_distinct_authors(&pool).await.unwrap(), 2);

    increment_post_views(&pool, post_1.id).await.unwrap();
    increment_post_views(&pool, post_1.id).await.unwrap();
    increment_post_views(&pool, post_2.id).await.unwrap();

    assert_eq!(total_post_views(&pool).await.unwrap(), 3);
    // 3 views across 3 posts (the draft counts with zero).
    assert_eq!(average_post_views(&pool).await.unwrap(), Some(1.0));

    let range = post_views_range(&pool).await.unwrap();
    assert_eq!(range.min_views, Some(0));
    assert_eq!(range.max_views, Some(2));
}

#[sqlx::test]
async fn grouped_stats_include_postless_users(pool: PgPool) {
    let (alice, bob, _post_1, _post_2) = seed_scenario(&pool).await;
    let carol = insert_user(&pool, &new_user("carol@example.com", "Carol"))
        .await
        .unwrap();

    let stats = author_stats(&pool).await.unwrap();
    assert_eq!(stats.len(), 3);
    // Ordered by post count, busiest author first.
    assert_eq!(stats[0].author_id, alice.id);
    assert_eq!(stats[0].post_count, 2);
    let carol_stats = stats.iter().find(|row| row.author_id == carol.id).unwrap();
    assert_eq!(carol_stats.post_count, 0);
    assert_eq!(carol_stats.total_views, None);

    let subquery_stats = users_with_post_stats(&pool).await.unwrap();
    let bob_stats = subquery_stats
        .iter()
        .find(|row| row.id == bob.id)
        .unwrap();
    assert_eq!(bob_stats.post_count, Some(1));
    let carol_stats = subquery_stats
        .iter()
        .find(|row| row.id == carol.id)
        .unwrap();
    assert_eq!(carol_stats.post_count, None);
}

#[sqlx::test]
async fn comment_context_joins_both_parents(pool: PgPool) {
    let (alice, bob, post_1, _post_2) = seed_scenario(&pool).await;

    let rows = list_comments_with_context(&pool).await.unwrap();
    assert_eq!(rows.len(), 3);
    // Newest first by the time-ordered comment id.
    assert!(rows.windows(2).all(|pair| pair[0].comment_id > pair[1].comment_id));

    let first_comment = rows
        .iter()
        .find(|row| row.comment_content == "Great post!")
        .unwrap();
    assert_eq!(first_comment.post_id, post_1.id);
    assert_eq!(first_comment.post_title, "Getting Started");
    assert_eq!(first_comment.author_id, bob.id);
    assert_eq!(first_comment.author_name, "Bob");
    assert!(rows.iter().any(|row| row.author_id == alice.id));
}
