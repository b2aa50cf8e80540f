//! Persistence of snapshots, record files, the carrier cache and the
//! lookup worklist

pub mod files;

pub use files::*;
