//! Classification, similarity and clustering engine for WiseWays.
//!
//! Questions are classified ([`classify`]), linked by a composite of weighted
//! signals ([`links`]), and grouped into thinking rooms ([`rooms`]). The
//! [`store::GraphStore`] aggregate ties these together behind the mutation
//! operations collaborators call.

pub mod analytics;
pub mod causal;
pub mod classify;
pub mod demo;
pub mod links;
pub mod rooms;
pub mod similarity;
pub mod store;
pub mod terms;

pub use analytics::{Analytics, LinkStrength};
pub use classify::Classification;
pub use store::{GraphStore, build_node};
