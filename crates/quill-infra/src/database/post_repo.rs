//! SeaORM post repository, including tag sync.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbConn, EntityTrait, ModelTrait, NotSet,
    Order, PaginatorTrait, QueryFilter, QueryOrder, Select, Set, TransactionTrait,
};

use quill_core::domain::{
    LinkDiff, Page, PageRequest, Post, PostDraft, PublicationStatus, Tag, missing_tag_names,
    normalize_tag_names,
};
use quill_core::error::RepoError;
use quill_core::ports::PostRepository;

use super::entity::EntityLabel;
use super::entity::{category, comment, post, tag, tag_post};
use super::error::db_err;

/// Post repository backed by any SeaORM connection.
pub struct SqlPostRepository {
    db: DbConn,
}

impl SqlPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

fn not_found<E: EntityLabel>() -> RepoError {
    RepoError::NotFound(E::LABEL)
}

fn public_posts() -> Select<post::Entity> {
    post::Entity::find().filter(is_public())
}

fn is_public() -> sea_orm::sea_query::SimpleExpr {
    post::Column::PublicationStatus.eq(PublicationStatus::Public.as_str())
}

fn newest_first(select: Select<post::Entity>) -> Select<post::Entity> {
    select
        .order_by_desc(post::Column::CreatedAt)
        .order_by_desc(post::Column::Id)
}

/// Load the tags of every model in one query and build domain posts.
async fn attach_tags<C>(conn: &C, models: Vec<post::Model>) -> Result<Vec<Post>, RepoError>
where
    C: ConnectionTrait,
{
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
    let links = tag_post::Entity::find()
        .filter(tag_post::Column::PostId.is_in(ids))
        .find_also_related(tag::Entity)
        .order_by_asc(tag::Column::Name)
        .all(conn)
        .await
        .map_err(db_err)?;

    let mut tags_by_post: HashMap<i32, Vec<Tag>> = HashMap::new();
    for (link, tag) in links {
        if let Some(tag) = tag {
            tags_by_post
                .entry(link.post_id)
                .or_default()
                .push(tag.into());
        }
    }

    models
        .into_iter()
        .map(|model| {
            let tags = tags_by_post.remove(&model.id).unwrap_or_default();
            model.into_domain(tags)
        })
        .collect()
}

async fn attach_tags_one<C>(conn: &C, model: Option<post::Model>) -> Result<Option<Post>, RepoError>
where
    C: ConnectionTrait,
{
    match model {
        Some(model) => Ok(attach_tags(conn, vec![model]).await?.pop()),
        None => Ok(None),
    }
}

async fn paginate<C>(
    conn: &C,
    select: Select<post::Entity>,
    page: PageRequest,
) -> Result<Page<Post>, RepoError>
where
    C: ConnectionTrait,
{
    let paginator = select.paginate(conn, page.per_page);
    let total = paginator.num_items().await.map_err(db_err)?;
    let models = paginator.fetch_page(page.index()).await.map_err(db_err)?;
    let posts = attach_tags(conn, models).await?;

    Ok(Page::new(posts, page, total))
}

async fn load_post<C>(conn: &C, id: i32) -> Result<Post, RepoError>
where
    C: ConnectionTrait,
{
    let model = post::Entity::find_by_id(id)
        .one(conn)
        .await
        .map_err(db_err)?;

    attach_tags_one(conn, model)
        .await?
        .ok_or_else(not_found::<post::Entity>)
}

async fn ensure_category<C>(conn: &C, category_id: Option<i32>) -> Result<(), RepoError>
where
    C: ConnectionTrait,
{
    let Some(id) = category_id else {
        return Ok(());
    };

    let found = category::Entity::find_by_id(id)
        .one(conn)
        .await
        .map_err(db_err)?;

    match found {
        Some(_) => Ok(()),
        None => Err(not_found::<category::Entity>()),
    }
}

/// Reconcile the links of `post_id` with the requested tag names, creating
/// tags that do not exist yet.
async fn sync_tags<C>(conn: &C, post_id: i32, names: &[String]) -> Result<(), RepoError>
where
    C: ConnectionTrait,
{
    let wanted = normalize_tag_names(names);

    let mut tags: Vec<Tag> = if wanted.is_empty() {
        Vec::new()
    } else {
        tag::Entity::find()
            .filter(tag::Column::Name.is_in(wanted.clone()))
            .all(conn)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(Into::into)
            .collect()
    };

    let missing = missing_tag_names(&wanted, &tags);
    if !missing.is_empty() {
        let rows = missing
            .iter()
            .map(|name| tag::ActiveModel::from(Tag::new(name.clone())));

        // A concurrent save may create the same tag first; its row is picked
        // up by the reload below.
        tag::Entity::insert_many(rows)
            .on_conflict(
                OnConflict::column(tag::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await
            .map_err(db_err)?;

        let created = tag::Entity::find()
            .filter(tag::Column::Name.is_in(missing.clone()))
            .all(conn)
            .await
            .map_err(db_err)?;

        tracing::debug!(post_id, created = ?missing, "Created missing tags");
        tags.extend(created.into_iter().map(Tag::from));
    }

    let desired: Vec<i32> = tags.iter().map(|t| t.id).collect();
    let current: Vec<i32> = tag_post::Entity::find()
        .filter(tag_post::Column::PostId.eq(post_id))
        .all(conn)
        .await
        .map_err(db_err)?
        .into_iter()
        .map(|link| link.tag_id)
        .collect();

    let diff = LinkDiff::between(&current, &desired);
    if diff.is_empty() {
        return Ok(());
    }

    if !diff.detach.is_empty() {
        tag_post::Entity::delete_many()
            .filter(tag_post::Column::PostId.eq(post_id))
            .filter(tag_post::Column::TagId.is_in(diff.detach.clone()))
            .exec(conn)
            .await
            .map_err(db_err)?;
    }

    if !diff.attach.is_empty() {
        let links = diff.attach.iter().map(|&tag_id| tag_post::ActiveModel {
            post_id: Set(post_id),
            tag_id: Set(tag_id),
        });
        tag_post::Entity::insert_many(links)
            .exec_without_returning(conn)
            .await
            .map_err(db_err)?;
    }

    tracing::debug!(
        post_id,
        attached = ?diff.attach,
        detached = ?diff.detach,
        "Synced post tags"
    );
    Ok(())
}

#[async_trait]
impl PostRepository for SqlPostRepository {
    async fn find_all(&self, page: PageRequest) -> Result<Page<Post>, RepoError> {
        paginate(&self.db, newest_first(post::Entity::find()), page).await
    }

    async fn find_published(&self, page: PageRequest) -> Result<Page<Post>, RepoError> {
        paginate(&self.db, newest_first(public_posts()), page).await
    }

    async fn find_latest(&self) -> Result<Post, RepoError> {
        let model = newest_first(public_posts())
            .one(&self.db)
            .await
            .map_err(db_err)?;

        attach_tags_one(&self.db, model)
            .await?
            .ok_or_else(not_found::<post::Entity>)
    }

    async fn find_by_random(&self, page: PageRequest) -> Result<Page<Post>, RepoError> {
        let select = public_posts().order_by(Expr::cust("RANDOM()"), Order::Asc);
        paginate(&self.db, select, page).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Post, RepoError> {
        tracing::debug!(post_id = id, "Finding post by id");
        load_post(&self.db, id).await
    }

    async fn find_all_by_category_name(
        &self,
        name: &str,
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        let category = category::Entity::find()
            .filter(category::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(not_found::<category::Entity>)?;

        let select = category.find_related(post::Entity).filter(is_public());
        paginate(&self.db, newest_first(select), page).await
    }

    async fn find_all_by_tag_name(
        &self,
        name: &str,
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        let tag = tag::Entity::find()
            .filter(tag::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(not_found::<tag::Entity>)?;

        let select = tag.find_related(post::Entity).filter(is_public());
        paginate(&self.db, newest_first(select), page).await
    }

    async fn find_by_title(&self, title: &str) -> Result<Post, RepoError> {
        let model = newest_first(public_posts().filter(post::Column::Title.eq(title)))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        attach_tags_one(&self.db, model)
            .await?
            .ok_or_else(not_found::<post::Entity>)
    }

    async fn find_related(&self, post: &Post, page: PageRequest) -> Result<Page<Post>, RepoError> {
        let tag_ids = post.tag_ids();
        if tag_ids.is_empty() {
            return Ok(Page::empty(page));
        }

        let tagged = Query::select()
            .column(tag_post::Column::PostId)
            .from(tag_post::Entity)
            .and_where(tag_post::Column::TagId.is_in(tag_ids))
            .to_owned();

        let select = public_posts()
            .filter(post::Column::Id.ne(post.id))
            .filter(post::Column::Id.in_subquery(tagged));

        paginate(&self.db, newest_first(select), page).await
    }

    async fn find_previous(&self, id: i32) -> Result<Option<Post>, RepoError> {
        let model = public_posts()
            .filter(post::Column::Id.lt(id))
            .order_by_desc(post::Column::Id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        attach_tags_one(&self.db, model).await
    }

    async fn find_next(&self, id: i32) -> Result<Option<Post>, RepoError> {
        let model = public_posts()
            .filter(post::Column::Id.gt(id))
            .order_by_asc(post::Column::Id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        attach_tags_one(&self.db, model).await
    }

    async fn store(&self, admin_id: i32, draft: PostDraft) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        ensure_category(&txn, draft.category_id).await?;

        let now = Utc::now();
        let published_at = draft.publication_status.resolve_published_at(None, now);

        let model = post::ActiveModel {
            id: NotSet,
            admin_id: Set(admin_id),
            category_id: Set(draft.category_id),
            title: Set(draft.title),
            md_content: Set(draft.md_content),
            html_content: Set(draft.html_content),
            publication_status: Set(draft.publication_status.as_str().to_string()),
            published_at: Set(published_at.map(Into::into)),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        sync_tags(&txn, model.id, &draft.tags).await?;
        let post = load_post(&txn, model.id).await?;
        txn.commit().await.map_err(db_err)?;

        tracing::info!(
            post_id = post.id,
            admin_id,
            status = %post.publication_status,
            "Post created"
        );
        Ok(post)
    }

    async fn update_by_id(&self, id: i32, draft: PostDraft) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let existing = post::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(not_found::<post::Entity>)?;
        ensure_category(&txn, draft.category_id).await?;

        let now = Utc::now();
        let published_at = draft
            .publication_status
            .resolve_published_at(existing.published_at.map(Into::into), now);

        let mut active: post::ActiveModel = existing.into();
        active.category_id = Set(draft.category_id);
        active.title = Set(draft.title);
        active.md_content = Set(draft.md_content);
        active.html_content = Set(draft.html_content);
        active.publication_status = Set(draft.publication_status.as_str().to_string());
        active.published_at = Set(published_at.map(Into::into));
        active.updated_at = Set(now.into());
        active.update(&txn).await.map_err(db_err)?;

        if !draft.tags.is_empty() {
            sync_tags(&txn, id, &draft.tags).await?;
        }

        let post = load_post(&txn, id).await?;
        txn.commit().await.map_err(db_err)?;

        tracing::info!(post_id = id, status = %post.publication_status, "Post updated");
        Ok(post)
    }

    async fn destroy_by_id(&self, id: i32) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        tag_post::Entity::delete_many()
            .filter(tag_post::Column::PostId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        comment::Entity::delete_many()
            .filter(comment::Column::PostId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        let result = post::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(not_found::<post::Entity>());
        }

        txn.commit().await.map_err(db_err)?;
        tracing::info!(post_id = id, "Post deleted");
        Ok(())
    }
}
