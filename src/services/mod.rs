/// OpenAPI documentation generation.
pub mod documentation;
/// Round lifecycle and scorekeeping logic.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Storage connection supervisor with reconnect backoff.
pub mod storage_supervisor;
