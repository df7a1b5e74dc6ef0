//! Domain entities - the core business objects.

mod category;
mod comment;
mod page;
mod post;
mod report;
mod user;
mod view;

pub use category::Category;
pub use comment::{Comment, CommentStatus};
pub use page::{DEFAULT_LIMIT, DEFAULT_PAGE, Page, PageLink, PageRequest, Pagination};
pub use post::{Post, PostFilter, PostPatch, PostStatus};
pub use report::{ContentType, MAX_REPORT_DESCRIPTION, Report, ReportReason, ReportStatus};
pub use user::{Actor, Role, User};
pub use view::{CategorySummary, CommentView, PostView, UserSummary};
