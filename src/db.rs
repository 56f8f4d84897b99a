pub mod source;
pub use source::SalesSource;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
pub mod queries;
