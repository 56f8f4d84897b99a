pub mod dashboard;
pub mod filters;
