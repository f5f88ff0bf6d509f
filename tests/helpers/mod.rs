// Test helpers shared by the unit and integration test targets
//
// Vendor APIs are replaced by in-memory fakes that record every call, so
// adapter flows can be exercised without network access.
//
// Usage:
//   #[path = "../helpers/mod.rs"]
//   mod helpers;
//   use helpers::*;

#![allow(dead_code)]

pub mod test_data;

pub use fake_gateways::*;
pub use test_data::*;
