//! mdtriage Core Library
//!
//! Classification, grouping, consolidation, and outdated-content detection
//! for loosely-organized markdown documentation trees.

pub mod archive;
pub mod chronology;
pub mod classify;
pub mod config;
pub mod dates;
pub mod discover;
pub mod error;
pub mod file;
pub mod grouping;
pub mod logging;
pub mod merge;
pub mod metadata;
pub mod migration;
pub mod outdated;
pub mod pipeline;
pub mod reader;
pub mod redundancy;
pub mod report;
pub mod text;
pub mod xref;
