//! Command handlers for the mdtriage CLI

pub mod classify;
pub mod dispatch;
pub mod freshness;
pub mod groups;
pub mod outdated;
pub mod run;
