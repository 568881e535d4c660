//! # ds-services
//!
//! Application logic sitting between the HTTP layer and the ports defined in
//! `ds-core`. Every service is cheap to clone and holds its ports behind `Arc`.

pub mod admin;
pub mod blog;
pub mod comments;
pub mod likes;
pub mod locks;
mod store;
pub mod tools;

pub use admin::{AdminDeletion, AdminService, AdminSummary};
pub use blog::{BlogQuery, BlogService};
pub use comments::CommentService;
pub use likes::{LikeService, LikeStatus};
pub use locks::KeyedLocks;
pub use tools::ToolService;
