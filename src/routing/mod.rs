//! Dispatch routing
//!
//! Routers decide which registered agents receive an incoming task. They see
//! the dispatch request (requested skill, explicit agent pin) and the live
//! registry, and produce a dispatch plan; they never talk to the network.

pub mod router;
pub mod skill_router;

pub use router::{DispatchPlan, DispatchRequest, Router};
pub use skill_router::SkillRouter;
