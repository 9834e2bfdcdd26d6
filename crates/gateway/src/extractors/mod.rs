//! Request extractors.

mod app_json;

pub use app_json::AppJson;
