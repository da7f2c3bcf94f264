use std::collections::BTreeSet;
use std::thread;

use diesel::prelude::*;

use blog_posts::domain::post::{NewPost, UpdatePost};
use blog_posts::models::post_tag::PostTag as DbPostTag;
use blog_posts::repository::{PostReader, PostWriter, RepositoryError, TagReader};
use blog_posts::schema::post_tags;

mod common;

fn tag_set(tags: &[String]) -> BTreeSet<&str> {
    tags.iter().map(String::as_str).collect()
}

fn tag_names(repo: &impl TagReader) -> Vec<String> {
    repo.list_tags()
        .expect("list tags")
        .into_iter()
        .map(|tag| tag.name)
        .collect()
}

fn association_count(test_db: &common::TestDb, post_id: i32) -> usize {
    let mut conn = test_db.pool().get().expect("connection");
    post_tags::table
        .filter(post_tags::post_id.eq(post_id))
        .load::<DbPostTag>(&mut conn)
        .expect("load associations")
        .len()
}

fn reject_tag_named(test_db: &common::TestDb, name: &str) {
    let mut conn = test_db.pool().get().expect("connection");
    diesel::sql_query(format!(
        "CREATE TRIGGER reject_{name} BEFORE INSERT ON tags WHEN NEW.name = '{name}' \
         BEGIN SELECT RAISE(ABORT, 'rejected tag'); END"
    ))
    .execute(&mut conn)
    .expect("create trigger");
}

fn first_post() -> NewPost {
    NewPost::new("First Post", "Hello from the blog.", "Technology")
        .with_tags(["golang", "database", "web"])
}

#[test]
fn test_create_then_get_round_trips() {
    let test_db = common::TestDb::new("create_then_get_round_trips.db");
    let repo = test_db.repo();

    let created = repo.create_post(&first_post()).expect("create post");
    assert_eq!(created.id, 1);
    assert_eq!(created.created_at, created.updated_at);

    let fetched = repo.get_post_by_id(created.id).expect("get post");
    assert_eq!(fetched.title, "First Post");
    assert_eq!(fetched.content, "Hello from the blog.");
    assert_eq!(fetched.category, "Technology");
    assert_eq!(
        tag_set(&fetched.tags),
        BTreeSet::from(["golang", "database", "web"])
    );
    assert_eq!(fetched, created);
}

#[test]
fn test_update_replaces_tag_set() {
    let test_db = common::TestDb::new("update_replaces_tag_set.db");
    let repo = test_db.repo();

    let created = repo.create_post(&first_post()).expect("create post");

    let update = UpdatePost::new("Updated Post", "New body", "Backend")
        .with_tags(["golang", "backend", "postgres"]);
    let updated = repo.update_post(created.id, &update).expect("update post");

    assert_eq!(updated.title, "Updated Post");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= updated.created_at);

    let fetched = repo.get_post_by_id(created.id).expect("get post");
    assert_eq!(
        tag_set(&fetched.tags),
        BTreeSet::from(["golang", "backend", "postgres"])
    );
    assert_eq!(association_count(&test_db, created.id), 3);

    // Unreferenced tags are kept.
    assert_eq!(
        tag_names(&repo),
        vec!["backend", "database", "golang", "postgres", "web"]
    );
}

#[test]
fn test_update_with_empty_tags_removes_all() {
    let test_db = common::TestDb::new("update_with_empty_tags.db");
    let repo = test_db.repo();

    let created = repo.create_post(&first_post()).expect("create post");
    repo.update_post(created.id, &UpdatePost::new("Plain", "No tags", "Misc"))
        .expect("update post");

    let fetched = repo.get_post_by_id(created.id).expect("get post");
    assert!(fetched.tags.is_empty());
    assert_eq!(association_count(&test_db, created.id), 0);
}

#[test]
fn test_update_missing_post_is_not_found_and_writes_nothing() {
    let test_db = common::TestDb::new("update_missing_post.db");
    let repo = test_db.repo();

    let update = UpdatePost::new("Ghost", "Body", "Misc").with_tags(["phantom"]);
    let err = repo
        .update_post(42, &update)
        .expect_err("expected update of missing post to fail");

    assert!(matches!(err, RepositoryError::NotFound(42)));
    assert!(tag_names(&repo).is_empty());
    assert_eq!(association_count(&test_db, 42), 0);
}

#[test]
fn test_failed_tag_write_rolls_back_create() {
    let test_db = common::TestDb::new("failed_tag_rolls_back_create.db");
    let repo = test_db.repo();
    reject_tag_named(&test_db, "broken");

    let err = repo
        .create_post(&NewPost::new("Doomed", "Body", "Misc").with_tags(["ok", "broken"]))
        .expect_err("expected rejected tag to fail the create");

    assert!(!err.is_not_found());
    assert!(repo.list_posts().expect("list posts").is_empty());
    assert!(tag_names(&repo).is_empty());
    assert_eq!(association_count(&test_db, 1), 0);
}

#[test]
fn test_failed_tag_write_rolls_back_update() {
    let test_db = common::TestDb::new("failed_tag_rolls_back_update.db");
    let repo = test_db.repo();

    let created = repo.create_post(&first_post()).expect("create post");
    reject_tag_named(&test_db, "broken");

    let update = UpdatePost::new("Changed", "Changed body", "Other")
        .with_tags(["fresh", "broken"]);
    repo.update_post(created.id, &update)
        .expect_err("expected rejected tag to fail the update");

    let fetched = repo.get_post_by_id(created.id).expect("get post");
    assert_eq!(fetched, created);
    assert_eq!(tag_names(&repo), vec!["database", "golang", "web"]);
    assert_eq!(association_count(&test_db, created.id), 3);
}

#[test]
fn test_overlapping_tags_are_shared() {
    let test_db = common::TestDb::new("overlapping_tags_are_shared.db");
    let repo = test_db.repo();

    let first = repo.create_post(&first_post()).expect("create first");
    let second = repo
        .create_post(&NewPost::new("Second", "More", "Technology").with_tags(["golang", "rust"]))
        .expect("create second");

    let tags = repo.list_tags().expect("list tags");
    let golang: Vec<_> = tags.iter().filter(|tag| tag.name == "golang").collect();
    assert_eq!(golang.len(), 1);
    assert_eq!(tags.len(), 4);

    let mut conn = test_db.pool().get().expect("connection");
    let referencing: Vec<i32> = post_tags::table
        .filter(post_tags::tag_id.eq(golang[0].id))
        .select(post_tags::post_id)
        .order(post_tags::post_id.asc())
        .load(&mut conn)
        .expect("load associations");
    assert_eq!(referencing, vec![first.id, second.id]);
}

#[test]
fn test_duplicate_tags_in_payload_are_collapsed() {
    let test_db = common::TestDb::new("duplicate_tags_collapsed.db");
    let repo = test_db.repo();

    let mut new_post = NewPost::new("Dupes", "Body", "Misc");
    new_post.tags = vec!["rust".to_string(), " rust ".to_string(), "rust".to_string()];

    let created = repo.create_post(&new_post).expect("create post");

    assert_eq!(created.tags, vec!["rust"]);
    assert_eq!(association_count(&test_db, created.id), 1);
}

#[test]
fn test_delete_cascades_and_keeps_tags() {
    let test_db = common::TestDb::new("delete_cascades_and_keeps_tags.db");
    let repo = test_db.repo();

    let first = repo.create_post(&first_post()).expect("create first");
    let second = repo
        .create_post(&NewPost::new("Second", "More", "Technology").with_tags(["golang"]))
        .expect("create second");

    repo.delete_post(first.id).expect("delete post");

    assert_eq!(association_count(&test_db, first.id), 0);
    assert!(matches!(
        repo.get_post_by_id(first.id),
        Err(RepositoryError::NotFound(id)) if id == first.id
    ));
    assert_eq!(tag_names(&repo), vec!["database", "golang", "web"]);

    let survivor = repo.get_post_by_id(second.id).expect("second survives");
    assert_eq!(survivor.tags, vec!["golang"]);
}

#[test]
fn test_delete_is_idempotent() {
    let test_db = common::TestDb::new("delete_is_idempotent.db");
    let repo = test_db.repo();

    let created = repo.create_post(&first_post()).expect("create post");

    repo.delete_post(created.id).expect("first delete");
    repo.delete_post(created.id).expect("second delete");
    repo.delete_post(12345).expect("delete of never-existing post");
}

#[test]
fn test_get_missing_post_is_not_found() {
    let test_db = common::TestDb::new("get_missing_post.db");
    let repo = test_db.repo();

    let err = repo
        .get_post_by_id(7)
        .expect_err("expected missing post to fail");

    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "post 7 not found");
}

#[test]
fn test_list_posts_hydrates_every_post_in_id_order() {
    let test_db = common::TestDb::new("list_posts_hydrates.db");
    let repo = test_db.repo();

    assert!(repo.list_posts().expect("list empty").is_empty());

    repo.create_post(&first_post()).expect("create first");
    repo.create_post(&NewPost::new("Untagged", "Body", "Misc"))
        .expect("create second");
    repo.create_post(&NewPost::new("Third", "Body", "Misc").with_tags(["web"]))
        .expect("create third");

    let posts = repo.list_posts().expect("list posts");
    let ids: Vec<i32> = posts.iter().map(|post| post.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(posts[0].tags, vec!["database", "golang", "web"]);
    assert!(posts[1].tags.is_empty());
    assert_eq!(posts[2].tags, vec!["web"]);
}

#[test]
fn test_search_matches_title_content_and_category() {
    let test_db = common::TestDb::new("search_matches_fields.db");
    let repo = test_db.repo();

    let by_title = repo
        .create_post(&NewPost::new("Updated Post", "Body", "Misc").with_tags(["golang"]))
        .expect("create");
    let by_content = repo
        .create_post(&NewPost::new("Other", "This was updated yesterday", "Misc"))
        .expect("create");
    let by_category = repo
        .create_post(&NewPost::new("Third", "Body", "Updated News"))
        .expect("create");
    repo.create_post(&NewPost::new("Unrelated", "Nothing here", "Misc"))
        .expect("create");

    let found = repo.search_posts("Updated").expect("search");
    let ids: Vec<i32> = found.iter().map(|post| post.id).collect();

    assert_eq!(ids, vec![by_title.id, by_content.id, by_category.id]);
    assert_eq!(found[0].tags, vec!["golang"]);
}

#[test]
fn test_search_treats_wildcards_literally() {
    let test_db = common::TestDb::new("search_wildcards_literal.db");
    let repo = test_db.repo();

    let discount = repo
        .create_post(&NewPost::new("50% off", "Sale", "Deals"))
        .expect("create");
    repo.create_post(&NewPost::new("500 offers", "Sale", "Deals"))
        .expect("create");

    let found = repo.search_posts("50%").expect("search");

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, discount.id);
    assert!(repo.search_posts("_").expect("search").is_empty());
}

#[test]
fn test_concurrent_creates_share_new_tag() {
    let test_db = common::TestDb::new("concurrent_creates_share_tag.db");
    let repo = test_db.repo();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let repo = repo.clone();
            thread::spawn(move || {
                repo.create_post(
                    &NewPost::new(format!("Post {i}"), "Body", "Misc").with_tags(["shared"]),
                )
            })
        })
        .collect();

    for handle in handles {
        let created = handle.join().expect("thread panicked").expect("create post");
        assert_eq!(created.tags, vec!["shared"]);
    }

    assert_eq!(tag_names(&repo), vec!["shared"]);
    assert_eq!(repo.list_posts().expect("list posts").len(), 4);
}
