//! UMA Core — domain models, the issuance error taxonomy and the
//! repository traits the issuance flow is written against.

pub mod error;
pub mod models;
pub mod repository;
