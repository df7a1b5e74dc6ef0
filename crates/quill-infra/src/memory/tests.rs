use std::sync::Arc;

use chrono::{Duration, Utc};
use quill_core::domain::{
    Actor, Category, Comment, ContentType, PageLink, PageRequest, Post, PostFilter, PostPatch,
    PostStatus, ReportReason, ReportStatus, Role, User,
};
use quill_core::ports::Repositories;
use quill_core::services::{DUPLICATE_CATEGORY, PostDraft, ReportDraft, author_filter};
use quill_core::{DomainError, Services};
use uuid::Uuid;

use super::InMemoryStore;

struct Fixture {
    repos: Repositories,
    services: Services,
    author: User,
    reader: User,
    admin: User,
    category: Category,
}

impl Fixture {
    async fn new() -> Self {
        let repos = Arc::new(InMemoryStore::new()).repositories();
        let author = repos
            .users
            .insert(User::new("Ada".into(), "ada@example.com".into(), Role::User))
            .await
            .unwrap();
        let reader = repos
            .users
            .insert(User::new("Grace".into(), "grace@example.com".into(), Role::User))
            .await
            .unwrap();
        let admin = repos
            .users
            .insert(User::new("Root".into(), "root@example.com".into(), Role::Admin))
            .await
            .unwrap();
        let category = repos
            .categories
            .insert(Category::new("Programming".into()))
            .await
            .unwrap();

        Self {
            services: Services::new(&repos),
            repos,
            author,
            reader,
            admin,
            category,
        }
    }

    fn actor(user: &User) -> Actor {
        Actor::new(user.id, user.role)
    }

    /// Store a post created `age_minutes` ago.
    async fn post(&self, title: &str, age_minutes: i64) -> Post {
        let mut post = Post::new(
            self.author.id,
            self.category.id,
            title.to_string(),
            format!("Body of {title}"),
        );
        post.created_at = Utc::now() - Duration::minutes(age_minutes);
        post.updated_at = post.created_at;
        self.repos.posts.insert(post).await.unwrap()
    }
}

#[tokio::test]
async fn test_second_page_holds_the_remainder() {
    let fx = Fixture::new().await;
    for i in 0..15 {
        fx.post(&format!("post {i}"), i).await;
    }

    let page = fx
        .services
        .listing
        .list(PostFilter::default(), PageRequest::new(2, 10))
        .await
        .unwrap();

    assert_eq!(page.items.len(), 5);
    assert_eq!(page.total, 15);
    assert_eq!(page.pagination.next, None);
    assert_eq!(page.pagination.prev, Some(PageLink { page: 1, limit: 10 }));
    // Oldest five, still newest first.
    let titles: Vec<_> = page.items.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["post 10", "post 11", "post 12", "post 13", "post 14"]);
}

#[tokio::test]
async fn test_first_page_links_forward_only() {
    let fx = Fixture::new().await;
    for i in 0..15 {
        fx.post(&format!("post {i}"), i).await;
    }

    let page = fx
        .services
        .listing
        .list(PostFilter::default(), PageRequest::default())
        .await
        .unwrap();

    assert_eq!(page.items.len(), 10);
    assert_eq!(page.items[0].title, "post 0");
    assert_eq!(page.pagination.next, Some(PageLink { page: 2, limit: 10 }));
    assert_eq!(page.pagination.prev, None);
}

#[tokio::test]
async fn test_page_past_the_end_is_empty_but_counted() {
    let fx = Fixture::new().await;
    for i in 0..3 {
        fx.post(&format!("post {i}"), i).await;
    }

    let page = fx
        .services
        .listing
        .list(PostFilter::default(), PageRequest::new(5, 10))
        .await
        .unwrap();

    assert!(page.items.is_empty());
    assert_eq!(page.total, 3);
    assert_eq!(page.pagination.next, None);
    assert_eq!(page.pagination.prev, Some(PageLink { page: 4, limit: 10 }));
}

#[tokio::test]
async fn test_paging_at_numeric_extremes() {
    let fx = Fixture::new().await;
    for i in 0..3 {
        fx.post(&format!("post {i}"), i).await;
    }
    let max = i64::MAX.to_string();

    let deepest = fx
        .services
        .listing
        .list(PostFilter::default(), PageRequest::parse(Some(&max), Some("1")))
        .await
        .unwrap();
    assert!(deepest.items.is_empty());
    assert_eq!(deepest.total, 3);
    assert_eq!(deepest.pagination.next, None);

    let overflowing = fx
        .services
        .listing
        .list(PostFilter::default(), PageRequest::parse(Some("3"), Some(&max)))
        .await
        .unwrap();
    assert_eq!(overflowing.items.len(), 3);
    assert_eq!(overflowing.pagination.prev, None);
}

#[tokio::test]
async fn test_listing_filters_by_author() {
    let fx = Fixture::new().await;
    fx.post("mine", 1).await;
    let other = Post::new(
        fx.reader.id,
        fx.category.id,
        "theirs".into(),
        "text".into(),
    );
    fx.repos.posts.insert(other).await.unwrap();

    let raw = fx.author.id.to_string();
    let filter = author_filter(Some(&raw)).unwrap();
    let page = fx
        .services
        .listing
        .list(filter, PageRequest::default())
        .await
        .unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].title, "mine");
}

#[test]
fn test_author_filter_rejects_malformed_ids() {
    assert!(matches!(
        author_filter(Some("not-a-uuid")),
        Err(DomainError::InvalidArgument(_))
    ));
    assert_eq!(author_filter(Some("")).unwrap(), PostFilter::default());
    assert_eq!(author_filter(None).unwrap(), PostFilter::default());
}

#[tokio::test]
async fn test_listing_populates_references() {
    let fx = Fixture::new().await;
    let post = fx.post("populated", 0).await;
    let first = Comment::new(post.id, fx.reader.id, "first!".into(), None);
    let first = fx.repos.comments.insert(first).await.unwrap();
    let reply = Comment::new(post.id, fx.author.id, "thanks".into(), Some(first.id));
    fx.repos.comments.insert(reply).await.unwrap();

    let page = fx
        .services
        .listing
        .list(PostFilter::default(), PageRequest::default())
        .await
        .unwrap();
    let view = &page.items[0];

    assert_eq!(view.author.as_ref().unwrap().name, "Ada");
    assert_eq!(view.category.as_ref().unwrap().name, "Programming");
    let comments = view.comments.as_ref().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].author.as_ref().unwrap().name, "Grace");
    assert_eq!(comments[1].parent_id, Some(first.id));
}

#[tokio::test]
async fn test_listing_tolerates_dangling_author() {
    let fx = Fixture::new().await;
    let orphan = Post::new(Uuid::new_v4(), fx.category.id, "orphan".into(), "x".into());
    fx.repos.posts.insert(orphan).await.unwrap();

    let page = fx
        .services
        .listing
        .list(PostFilter::default(), PageRequest::default())
        .await
        .unwrap();

    assert!(page.items[0].author.is_none());
}

#[tokio::test]
async fn test_search_ignores_case_and_checks_tags() {
    let fx = Fixture::new().await;
    fx.post("Hello World", 2).await;
    fx.post("Unrelated", 1).await;
    let mut tagged = Post::new(fx.author.id, fx.category.id, "Tagged".into(), "x".into());
    tagged.tags = vec!["SayHELLO".into()];
    fx.repos.posts.insert(tagged).await.unwrap();

    let hits = fx.services.search.search(Some("hello")).await.unwrap();

    let titles: Vec<_> = hits.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["Tagged", "Hello World"]);
    assert!(hits.iter().all(|p| p.comments.is_none()));
    assert_eq!(hits[0].author.as_ref().unwrap().name, "Ada");
}

#[tokio::test]
async fn test_search_skips_drafts() {
    let fx = Fixture::new().await;
    let draft = Post::new(fx.author.id, fx.category.id, "hello draft".into(), "x".into())
        .with_status(PostStatus::Draft);
    fx.repos.posts.insert(draft).await.unwrap();

    let hits = fx.services.search.search(Some("hello")).await.unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let fx = Fixture::new().await;
    fx.post("100% Rust", 1).await;
    fx.post("Plain", 0).await;

    let hits = fx.services.search.search(Some("%")).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "100% Rust");
}

#[tokio::test]
async fn test_search_requires_a_query() {
    let fx = Fixture::new().await;

    for query in [None, Some("")] {
        let err = fx.services.search.search(query).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
    }
}

#[tokio::test]
async fn test_toggle_like_adds_then_removes() {
    let fx = Fixture::new().await;
    let post = fx.post("likeable", 0).await;
    let (u1, u2) = (fx.author.id, fx.reader.id);
    let likes = &fx.services.engagement;

    assert_eq!(likes.toggle_like(post.id, u1).await.unwrap().likes, vec![u1]);
    assert_eq!(likes.toggle_like(post.id, u2).await.unwrap().likes, vec![u1, u2]);
    assert_eq!(likes.toggle_like(post.id, u1).await.unwrap().likes, vec![u2]);
}

#[tokio::test]
async fn test_toggle_like_twice_restores_likes() {
    let fx = Fixture::new().await;
    let post = fx.post("likeable", 0).await;
    fx.services
        .engagement
        .toggle_like(post.id, fx.reader.id)
        .await
        .unwrap();

    let once = fx
        .services
        .engagement
        .toggle_like(post.id, fx.admin.id)
        .await
        .unwrap();
    let twice = fx
        .services
        .engagement
        .toggle_like(post.id, fx.admin.id)
        .await
        .unwrap();

    assert!(once.is_liked_by(fx.admin.id));
    assert_eq!(twice.likes, vec![fx.reader.id]);
}

#[tokio::test]
async fn test_toggle_like_scenario_from_a_liked_post() {
    let fx = Fixture::new().await;
    let (u1, u2) = (fx.reader.id, fx.admin.id);
    let mut post = Post::new(
        fx.author.id,
        fx.category.id,
        "liked".into(),
        "Body".into(),
    );
    post.likes = vec![u1];
    let post = fx.repos.posts.insert(post).await.unwrap();
    let engagement = &fx.services.engagement;

    let post = engagement.toggle_like(post.id, u1).await.unwrap();
    assert_eq!(post.likes, Vec::<Uuid>::new());

    let post = engagement.toggle_like(post.id, u2).await.unwrap();
    assert_eq!(post.likes, vec![u2]);

    let post = engagement.toggle_like(post.id, u2).await.unwrap();
    assert_eq!(post.likes, Vec::<Uuid>::new());
}

#[tokio::test]
async fn test_toggle_like_on_missing_post() {
    let fx = Fixture::new().await;
    let missing = Uuid::new_v4();

    let err = fx
        .services
        .engagement
        .toggle_like(missing, fx.reader.id)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DomainError::NotFound { entity_type: "Post", id } if id == missing
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_toggles_keep_every_like() {
    let fx = Fixture::new().await;
    let post_id = fx.post("popular", 0).await.id;
    let users: Vec<Uuid> = (0..32).map(|_| Uuid::new_v4()).collect();

    let handles: Vec<_> = users
        .iter()
        .map(|&user| {
            let engagement = fx.services.engagement.clone();
            tokio::spawn(async move { engagement.toggle_like(post_id, user).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let post = fx.services.listing.get(post_id).await.unwrap();
    assert_eq!(post.likes.len(), users.len());
    assert!(users.iter().all(|u| post.likes.contains(u)));
}

#[tokio::test]
async fn test_create_post_requires_fields() {
    let fx = Fixture::new().await;
    let draft = PostDraft {
        title: Some("Title".into()),
        content: Some("   ".into()),
        category_id: Some(fx.category.id),
        ..Default::default()
    };

    let err = fx
        .services
        .posts
        .create(&Fixture::actor(&fx.author), draft)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidArgument(_)));
}

#[tokio::test]
async fn test_create_post_checks_category() {
    let fx = Fixture::new().await;
    let draft = PostDraft {
        title: Some("Title".into()),
        content: Some("Body".into()),
        category_id: Some(Uuid::new_v4()),
        ..Default::default()
    };

    let err = fx
        .services
        .posts
        .create(&Fixture::actor(&fx.author), draft)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn test_create_post_publishes_for_the_actor() {
    let fx = Fixture::new().await;
    let draft = PostDraft {
        title: Some(" Title ".into()),
        content: Some("Body".into()),
        category_id: Some(fx.category.id),
        image: None,
        tags: vec!["rust".into()],
    };

    let view = fx
        .services
        .posts
        .create(&Fixture::actor(&fx.reader), draft)
        .await
        .unwrap();

    assert_eq!(view.title, "Title");
    assert_eq!(view.status, PostStatus::Published);
    assert_eq!(view.author.unwrap().id, fx.reader.id);
    assert!(view.likes.is_empty());
}

#[tokio::test]
async fn test_only_owner_or_admin_may_edit() {
    let fx = Fixture::new().await;
    let post = fx.post("original", 0).await;
    fx.services
        .engagement
        .toggle_like(post.id, fx.reader.id)
        .await
        .unwrap();
    let patch = PostPatch {
        title: Some("edited".into()),
        ..Default::default()
    };

    let err = fx
        .services
        .posts
        .update(&Fixture::actor(&fx.reader), post.id, patch.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Unauthorized));

    let view = fx
        .services
        .posts
        .update(&Fixture::actor(&fx.admin), post.id, patch)
        .await
        .unwrap();
    assert_eq!(view.title, "edited");
    assert_eq!(view.likes, vec![fx.reader.id]);
}

#[tokio::test]
async fn test_deleted_post_is_gone() {
    let fx = Fixture::new().await;
    let post = fx.post("short-lived", 0).await;

    fx.services
        .posts
        .delete(&Fixture::actor(&fx.author), post.id)
        .await
        .unwrap();

    let err = fx.services.listing.get(post.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn test_category_names_are_unique() {
    let fx = Fixture::new().await;
    let admin = Fixture::actor(&fx.admin);

    let err = fx
        .services
        .categories
        .create(&admin, "Programming")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(msg) if msg == DUPLICATE_CATEGORY));

    let other = fx.services.categories.create(&admin, "Travel").await.unwrap();
    let err = fx
        .services
        .categories
        .rename(&admin, other.id, "Programming")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(msg) if msg == DUPLICATE_CATEGORY));
}

#[tokio::test]
async fn test_category_writes_need_admin() {
    let fx = Fixture::new().await;

    let err = fx
        .services
        .categories
        .create(&Fixture::actor(&fx.reader), "Travel")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Unauthorized));
}

#[tokio::test]
async fn test_category_in_use_cannot_be_deleted() {
    let fx = Fixture::new().await;
    fx.post("uses the category", 0).await;

    let err = fx
        .services
        .categories
        .delete(&Fixture::actor(&fx.admin), fx.category.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let categories = fx.services.categories.list().await.unwrap();
    assert_eq!(categories.len(), 1);
}

#[tokio::test]
async fn test_reply_must_stay_on_the_same_post() {
    let fx = Fixture::new().await;
    let first = fx.post("first", 1).await;
    let second = fx.post("second", 0).await;
    let actor = Fixture::actor(&fx.reader);

    let parent = fx
        .services
        .comments
        .create(&actor, first.id, "on first", None)
        .await
        .unwrap();
    let err = fx
        .services
        .comments
        .create(&actor, second.id, "wrong thread", Some(parent.id))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let comments = fx.services.comments.list_for_post(first.id).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].author.as_ref().unwrap().name, "Grace");
}

#[tokio::test]
async fn test_report_lifecycle() {
    let fx = Fixture::new().await;
    let post = fx.post("offending", 0).await;
    let reader = Fixture::actor(&fx.reader);
    let admin = Fixture::actor(&fx.admin);

    let too_long = ReportDraft {
        content_type: ContentType::Post,
        content_id: post.id,
        reason: ReportReason::Spam,
        description: "x".repeat(501),
    };
    let err = fx.services.reports.file(&reader, too_long).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let dangling = ReportDraft {
        content_type: ContentType::Comment,
        content_id: Uuid::new_v4(),
        reason: ReportReason::Spam,
        description: "spam".into(),
    };
    let err = fx.services.reports.file(&reader, dangling).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity_type: "Comment", .. }));

    let report = fx
        .services
        .reports
        .file(
            &reader,
            ReportDraft {
                content_type: ContentType::Post,
                content_id: post.id,
                reason: ReportReason::Spam,
                description: "buy now".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(report.status, ReportStatus::Pending);

    let err = fx.services.reports.list(&reader, None).await.unwrap_err();
    assert!(matches!(err, DomainError::Unauthorized));

    fx.services
        .reports
        .set_status(&admin, report.id, ReportStatus::Resolved)
        .await
        .unwrap();
    let pending = fx
        .services
        .reports
        .list(&admin, Some(ReportStatus::Pending))
        .await
        .unwrap();
    let resolved = fx
        .services
        .reports
        .list(&admin, Some(ReportStatus::Resolved))
        .await
        .unwrap();
    assert!(pending.is_empty());
    assert_eq!(resolved.len(), 1);
}
