use campfire::{NewPost, NewUser};
use uuid::Uuid;

pub fn new_user(email: &str, name: &str) -> NewUser {
    NewUser {
        email: email.to_owned(),
        name: name.to_owned(),
        ..Default::default()
    }
}

pub fn new_post(title: &str, slug: &str, published: bool, author_id: Uuid) -> NewPost {
    NewPost {
        title: title.to_owned(),
        content: format!("{title} body"),
        slug: slug.to_owned(),
        published,
        author_id,
    }
}
