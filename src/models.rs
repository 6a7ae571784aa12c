use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Active,
    Archived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
    Guest,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub status: Status,
    pub role: UserRole,
    pub settings: serde_json::Value,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub role: Option<UserRole>,
    pub settings: Option<serde_json::Value>,
}

/// Optional fields of a partial user update; `None` leaves a column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub name: Option<String>,
}

pub fn default_user_settings() -> serde_json::Value {
    json!({
        "theme": "light",
        "notifications": { "email": true, "push": false },
        "language": "en",
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewProfile {
    pub user_id: Uuid,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub slug: String,
    pub published: bool,
    pub views: i32,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub slug: String,
    pub published: bool,
    pub author_id: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub content: String,
    pub post_id: Uuid,
    pub author_id: Uuid,
}

/// Comment content paired with its author, for attaching to a post that does
/// not exist yet.
#[derive(Debug, Clone)]
pub struct CommentDraft {
    pub author_id: Uuid,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GroupMembership {
    pub user_id: Uuid,
    pub group_id: Uuid,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Event {
    pub id: Uuid,
    pub data: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

// ----------------- Join projections -----------------

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostWithAuthor {
    pub post_id: Uuid,
    pub title: String,
    pub slug: String,
    pub author_name: String,
    pub author_email: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentContext {
    pub comment_id: Uuid,
    pub comment_content: String,
    pub commented_at: DateTime<Utc>,
    pub post_id: Uuid,
    pub post_title: String,
    pub author_id: Uuid,
    pub author_name: String,
}

/// One row per (user, post) pair from the left join; post columns are absent
/// for users who have never posted.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserPostRow {
    pub user_id: Uuid,
    pub user_name: String,
    pub post_id: Option<Uuid>,
    pub post_title: Option<String>,
    pub published: Option<bool>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GroupMember {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

// ----------------- Aggregate projections -----------------

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuthorPostCount {
    pub author_id: Uuid,
    pub post_count: i64,
    pub total_views: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuthorStats {
    pub author_id: Uuid,
    pub author_name: String,
    pub post_count: i64,
    pub total_views: Option<i64>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ViewsRange {
    pub min_views: Option<i32>,
    pub max_views: Option<i32>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserPostStats {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub post_count: Option<i64>,
    pub total_views: Option<i64>,
}

// ----------------- Restricted column sets -----------------

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PostTitle {
    pub id: Uuid,
    pub title: String,
    pub published: bool,
}

// ----------------- Nested relation results -----------------

#[derive(Debug, Clone)]
pub struct UserWithProfile {
    pub user: User,
    pub profile: Option<Profile>,
}

#[derive(Debug, Clone)]
pub struct UserWithRelations {
    pub user: User,
    pub profile: Option<Profile>,
    pub posts: Vec<Post>,
}

#[derive(Debug, Clone)]
pub struct UserWithPosts {
    pub user: User,
    pub posts: Vec<Post>,
}

#[derive(Debug, Clone)]
pub struct CommentWithAuthor {
    pub comment: Comment,
    pub author: User,
}

#[derive(Debug, Clone)]
pub struct PostWithComments {
    pub post: Post,
    pub author: User,
    pub comments: Vec<CommentWithAuthor>,
}

#[derive(Debug, Clone)]
pub struct UserWithPostTitles {
    pub user: UserSummary,
    pub posts: Vec<PostTitle>,
}

/// A group the user belongs to, flattened together with the attributes that
/// live on the membership edge itself.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserGroup {
    pub group_id: Uuid,
    pub name: String,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct UserWithGroups {
    pub user: User,
    pub groups: Vec<UserGroup>,
}
