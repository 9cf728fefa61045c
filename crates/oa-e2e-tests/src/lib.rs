//! End-to-end tests for Orchard Advisor live under `tests/`.
//!
//! They drive the HTTP router built by `oa-server` with real classifier,
//! predictor and advisor instances, loading the sample data in `data/`
//! and mocking the hosted language model with wiremock.
