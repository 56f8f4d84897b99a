pub mod dashboard;
pub mod filters;

#[cfg(test)]
mod tests;
