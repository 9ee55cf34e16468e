pub mod api;
pub mod archive;
pub mod comparator;
pub mod error;
pub mod hub;
pub mod materializer;
pub mod model;
pub mod registry;
pub mod testcase;
pub mod tracker;
pub mod workspace;

pub use hub::CompanionHub;
