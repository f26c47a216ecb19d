pub mod fetch_utils;
pub mod http_client;
pub mod orchestrator;
pub mod profile_orchestrator;
pub mod transport;
pub mod urls;

// Re-export URL utilities
pub use urls::*;
// Re-export HTTP client utilities
pub use http_client::create_http_client_with_timeout;
// Re-export the aggregation entry points
pub use orchestrator::{
    ContestAggregate, ContestAggregator, ContestSettings, RelevanceWindow, SourceReport,
    SourceStatus, build_transport, fetch_contests,
};
pub use profile_orchestrator::{ProfileAggregate, ProfileAggregator, ProfileTotals, fetch_profiles};
pub use transport::{ReqwestTransport, Transport};
