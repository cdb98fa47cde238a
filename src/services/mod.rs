/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Per-roll-number and group team registration.
pub mod registration_service;
/// Score lookups, adjustments and team listing.
pub mod score_service;
/// Storage connection supervisor with backoff.
pub mod storage_supervisor;
#[cfg(test)]
mod test_support;
