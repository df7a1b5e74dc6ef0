//! Application services - the operations the HTTP layer exposes, written
//! against the ports only.

mod categories;
mod comments;
mod engagement;
mod listing;
mod populate;
mod posts;
mod reports;
mod search;

pub use categories::{CategoryService, DUPLICATE_CATEGORY};
pub use comments::CommentService;
pub use engagement::EngagementService;
pub use listing::{ListingService, author_filter};
pub use populate::{Populator, WithComments};
pub use posts::{PostDraft, PostService};
pub use reports::{ReportDraft, ReportService};
pub use search::SearchService;

use crate::ports::Repositories;

/// All services, wired to one set of repositories.
#[derive(Clone)]
pub struct Services {
    pub listing: ListingService,
    pub search: SearchService,
    pub engagement: EngagementService,
    pub posts: PostService,
    pub categories: CategoryService,
    pub comments: CommentService,
    pub reports: ReportService,
}

impl Services {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            listing: ListingService::new(repos),
            search: SearchService::new(repos),
            engagement: EngagementService::new(repos),
            posts: PostService::new(repos),
            categories: CategoryService::new(repos),
            comments: CommentService::new(repos),
            reports: ReportService::new(repos),
        }
    }
}
