//! In-memory representation of an RPL node's routing state (§3).

mod builder;
mod dag;
mod instance;
mod parent;
mod route;
mod stats;

pub use builder::{DagBuilder, InstanceBuilder};
pub use dag::Dag;
pub use instance::Instance;
pub use parent::Parent;
pub use route::{RouteEntry, RouteState, SourceRouteEntry};
pub use stats::Stats;
