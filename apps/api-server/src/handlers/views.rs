//! Domain to wire conversions.

use quill_core::domain::{Category, Comment, Page, PageRequest, Post, Tag};
use quill_shared::dto::{
    CategoryResponse, CommentResponse, PageQuery, PageResponse, PostResponse, TagResponse,
};

pub fn page_request(query: &PageQuery, default_per_page: u64) -> PageRequest {
    PageRequest::new(
        query.page.unwrap_or(1),
        query.per_page.unwrap_or(default_per_page),
    )
}

pub fn page_response<T, U, F>(page: Page<T>, f: F) -> PageResponse<U>
where
    F: FnMut(T) -> U,
{
    let page = page.map(f);
    PageResponse {
        data: page.items,
        current_page: page.page,
        per_page: page.per_page,
        total: page.total,
        last_page: page.last_page,
    }
}

pub fn tag(tag: Tag) -> TagResponse {
    TagResponse {
        id: tag.id,
        name: tag.name,
        created_at: tag.created_at,
        updated_at: tag.updated_at,
    }
}

pub fn category(category: Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        name: category.name,
        created_at: category.created_at,
        updated_at: category.updated_at,
    }
}

pub fn comment(comment: Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        post_id: comment.post_id,
        name: comment.name,
        body: comment.body,
        created_at: comment.created_at,
    }
}

pub fn post(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        admin_id: post.admin_id,
        category_id: post.category_id,
        title: post.title,
        content: post.md_content,
        html_content: post.html_content,
        publication_status: post.publication_status.to_string(),
        published_at: post.published_at,
        tags: post.tags.into_iter().map(tag).collect(),
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_defaults_and_clamps() {
        let req = page_request(&PageQuery::default(), 10);
        assert_eq!((req.page, req.per_page), (1, 10));

        let req = page_request(
            &PageQuery {
                page: Some(0),
                per_page: Some(1_000),
            },
            10,
        );
        assert_eq!((req.page, req.per_page), (1, PageRequest::MAX_PER_PAGE));
    }

    #[test]
    fn test_page_response_carries_totals() {
        let page = Page::new(vec![1, 2], PageRequest::new(1, 2), 5);

        let response = page_response(page, |n| n * 10);

        assert_eq!(response.data, vec![10, 20]);
        assert_eq!(response.total, 5);
        assert_eq!(response.last_page, 3);
    }
}
