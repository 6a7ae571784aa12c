// Loads the development fixture set: two users, a profile, three posts and
// three comments.

use campfire::{
    close_db, init_db, insert_comment, insert_post, insert_profile, insert_users, NewComment,
    NewPost, NewProfile, NewUser,
};
use tracing::info;

#[tokio::main]
async fn main() -> campfire::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let pool = init_db().await?;
    info!("Seeding database");

    let users = insert_users(
        &pool,
        &[
            NewUser {
                email: "alice@example.com".to_owned(),
                name: "Alice".to_owned(),
                ..Default::default()
            },
            NewUser {
                email: "bob@example.com".to_owned(),
                name: "Bob".to_owned(),
                ..Default::default()
            },
        ],
    )
    .await?;
    let (alice, bob) = (&users[0], &users[1]);
    info!(alice = %alice.id, bob = %bob.id, "Created users");

    insert_profile(
        &pool,
        &NewProfile {
            user_id: alice.id,
            bio: Some("Software engineer".to_owned()),
            ..Default::default()
        },
    )
    .await?;
    insert_profile(
        &pool,
        &NewProfile {
            user_id: bob.id,
            bio: Some("Designer".to_owned()),
            ..Default::default()
        },
    )
    .await?;

    let post_1 = insert_post(
        &pool,
        &NewPost {
            title: "Getting Started with Campfire".to_owned(),
            content: "Campfire is a small community platform...".to_owned(),
            slug: "getting-started-campfire".to_owned(),
            published: true,
            author_id: alice.id,
        },
    )
    .await?;
    let post_2 = insert_post(
        &pool,
        &NewPost {
            title: "PostgreSQL Best Practices".to_owned(),
            content: "When working with PostgreSQL...".to_owned(),
            slug: "postgresql-best-practices".to_owned(),
            published: true,
            author_id: alice.id,
        },
    )
    .await?;
    insert_post(
        &pool,
        &NewPost {
            title: "Draft Post".to_owned(),
            content: "This is a draft...".to_owned(),
            slug: "draft-post".to_owned(),
            published: false,
            author_id: bob.id,
        },
    )
    .await?;
    info!(post_1 = %post_1.id, post_2 = %post_2.id, "Created posts");

    insert_comment(
        &pool,
        &NewComment {
            content: "Great post!".to_owned(),
            post_id: post_1.id,
            author_id: bob.id,
        },
    )
    .await?;
    insert_comment(
        &pool,
        &NewComment {
            content: "Very helpful, thanks!".to_owned(),
            post_id: post_1.id,
            author_id: alice.id,
        },
    )
    .await?;
    insert_comment(
        &pool,
        &NewComment {
            content: "Bookmarked!".to_owned(),
            post_id: post_2.id,
            author_id: bob.id,
        },
    )
    .await?;

    info!("Seeding complete");
    close_db(&pool).await;
    Ok(())
}
