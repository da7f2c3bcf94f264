use std::collections::HashMap;

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel::upsert::excluded;

use crate::{
    domain::post::{
        NewPost as DomainNewPost, Post as DomainPost, UpdatePost as DomainUpdatePost,
        normalize_tags,
    },
    domain::post_tag::PostTag as DomainPostTag,
    models::post::{NewPost as DbNewPost, Post as DbPost, UpdatePost as DbUpdatePost},
    models::post_tag::PostTag as DbPostTag,
    models::tag::NewTag as DbNewTag,
    repository::{
        DieselRepository, OperationContext, PostReader, PostWriter, RepositoryError,
        RepositoryResult,
    },
};

/// Keeps `IN (...)` lists well below SQLite's bound parameter limit.
const HYDRATE_CHUNK: usize = 500;

impl PostReader for DieselRepository {
    fn get_post_by_id(&self, id: i32) -> RepositoryResult<DomainPost> {
        let context = OperationContext::post("get_post", id);
        let mut conn = self.conn(context)?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| fetch_post(conn, id))
            .map_err(|err| RepositoryError::from_diesel(context, err))
    }

    fn list_posts(&self) -> RepositoryResult<Vec<DomainPost>> {
        use crate::schema::posts;

        let context = OperationContext::new("list_posts");
        let mut conn = self.conn(context)?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            let rows = posts::table
                .order(posts::id.asc())
                .load::<DbPost>(conn)?;
            hydrate(conn, rows)
        })
        .map_err(|err| RepositoryError::from_diesel(context, err))
    }

    fn search_posts(&self, term: &str) -> RepositoryResult<Vec<DomainPost>> {
        use crate::schema::posts;

        let context = OperationContext::new("search_posts");
        let mut conn = self.conn(context)?;
        let pattern = format!("%{}%", escape_like(term));

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            let rows = posts::table
                .filter(
                    posts::title
                        .like(pattern.clone())
                        .escape('\\')
                        .or(posts::content.like(pattern.clone()).escape('\\'))
                        .or(posts::category.like(pattern.clone()).escape('\\')),
                )
                .order(posts::id.asc())
                .load::<DbPost>(conn)?;
            hydrate(conn, rows)
        })
        .map_err(|err| RepositoryError::from_diesel(context, err))
    }
}

impl PostWriter for DieselRepository {
    fn create_post(&self, new_post: &DomainNewPost) -> RepositoryResult<DomainPost> {
        use crate::schema::posts;

        let context = OperationContext::new("create_post");
        let mut conn = self.conn(context)?;
        let now = Utc::now().naive_utc();

        conn.immediate_transaction::<_, diesel::result::Error, _>(|conn| {
            let created = diesel::insert_into(posts::table)
                .values(&DbNewPost::from_domain(new_post, now))
                .get_result::<DbPost>(conn)?;

            replace_post_tags(conn, created.id, &new_post.tags)?;

            let mut tags = load_tags_for_posts(conn, &[created.id])?;
            let tags = tags.remove(&created.id).unwrap_or_default();
            Ok(DomainPost::from((created, tags)))
        })
        .map_err(|err| RepositoryError::from_diesel(context, err))
    }

    fn update_post(
        &self,
        post_id: i32,
        updates: &DomainUpdatePost,
    ) -> RepositoryResult<DomainPost> {
        use crate::schema::posts;

        let context = OperationContext::post("update_post", post_id);
        let mut conn = self.conn(context)?;
        let now = Utc::now().naive_utc();

        conn.immediate_transaction::<_, diesel::result::Error, _>(|conn| {
            // Zero matching rows surfaces as `NotFound` and rolls the transaction back.
            let updated = diesel::update(posts::table.find(post_id))
                .set(&DbUpdatePost::from_domain(updates, now))
                .get_result::<DbPost>(conn)?;

            replace_post_tags(conn, post_id, &updates.tags)?;

            let mut tags = load_tags_for_posts(conn, &[post_id])?;
            let tags = tags.remove(&post_id).unwrap_or_default();
            Ok(DomainPost::from((updated, tags)))
        })
        .map_err(|err| RepositoryError::from_diesel(context, err))
    }

    fn delete_post(&self, post_id: i32) -> RepositoryResult<()> {
        use crate::schema::posts;

        let context = OperationContext::post("delete_post", post_id);
        let mut conn = self.conn(context)?;

        let deleted = diesel::delete(posts::table.find(post_id))
            .execute(&mut conn)
            .map_err(|err| RepositoryError::from_diesel(context, err))?;

        if deleted == 0 {
            log::debug!("delete_post: post {post_id} already absent");
        }

        Ok(())
    }
}

fn fetch_post(conn: &mut SqliteConnection, post_id: i32) -> QueryResult<DomainPost> {
    use crate::schema::posts;

    let post = posts::table.find(post_id).first::<DbPost>(conn)?;
    let mut tags = load_tags_for_posts(conn, &[post_id])?;
    let tags = tags.remove(&post_id).unwrap_or_default();

    Ok(DomainPost::from((post, tags)))
}

fn hydrate(conn: &mut SqliteConnection, rows: Vec<DbPost>) -> QueryResult<Vec<DomainPost>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let post_ids: Vec<i32> = rows.iter().map(|post| post.id).collect();
    let mut tags_by_post = load_tags_for_posts(conn, &post_ids)?;

    Ok(rows
        .into_iter()
        .map(|post| {
            let tags = tags_by_post.remove(&post.id).unwrap_or_default();
            DomainPost::from((post, tags))
        })
        .collect())
}

/// Load tag names for `post_ids`, grouped by post and sorted by name.
fn load_tags_for_posts(
    conn: &mut SqliteConnection,
    post_ids: &[i32],
) -> QueryResult<HashMap<i32, Vec<String>>> {
    use crate::schema::{post_tags, tags};

    let mut map: HashMap<i32, Vec<String>> = HashMap::new();

    for chunk in post_ids.chunks(HYDRATE_CHUNK) {
        let rows = post_tags::table
            .inner_join(tags::table)
            .filter(post_tags::post_id.eq_any(chunk))
            .select((post_tags::post_id, tags::name))
            .order((post_tags::post_id.asc(), tags::name.asc()))
            .load::<(i32, String)>(conn)?;

        for (post_id, name) in rows {
            map.entry(post_id).or_default().push(name);
        }
    }

    Ok(map)
}

/// Replace every association of `post_id` with links to `names`.
///
/// Missing tags are created on the fly; existing tags are reused by name.
fn replace_post_tags(
    conn: &mut SqliteConnection,
    post_id: i32,
    names: &[String],
) -> QueryResult<()> {
    use crate::schema::post_tags;

    diesel::delete(post_tags::table.filter(post_tags::post_id.eq(post_id))).execute(conn)?;

    let names = normalize_tags(names);
    if names.is_empty() {
        return Ok(());
    }

    let mut links = Vec::with_capacity(names.len());
    for name in &names {
        let tag_id = upsert_tag(conn, name)?;
        links.push(DbPostTag::from(&DomainPostTag::new(post_id, tag_id)));
    }

    diesel::insert_into(post_tags::table)
        .values(&links)
        .execute(conn)?;

    Ok(())
}

/// Return the id of the tag called `name`, inserting it first when missing.
fn upsert_tag(conn: &mut SqliteConnection, name: &str) -> QueryResult<i32> {
    use crate::schema::tags;

    diesel::insert_into(tags::table)
        .values(&DbNewTag { name })
        .on_conflict(tags::name)
        .do_update()
        .set(tags::name.eq(excluded(tags::name)))
        .returning(tags::id)
        .get_result::<i32>(conn)
}

/// Escape `LIKE` wildcards so that `term` is matched literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
