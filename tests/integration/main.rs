//! Integration tests for the CrudKit HTTP API.

mod entity_test;
mod envelope_test;
mod helpers;
