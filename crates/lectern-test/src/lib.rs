//! Shared test fixtures for Lectern crates.
//!
//! This crate provides catalog builders and small campus data sets.
//! It depends only on `lectern-core` so every higher crate can use it
//! as a dev-dependency.
//!
//! - [`builders`] - one-line constructors for catalog records
//! - [`campus`] - ready-made catalogs and snapshots
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! lectern-test = { workspace = true }
//! ```
//!
//! ```ignore
//! use lectern_test::campus::{small_campus, snapshot_of};
//!
//! let snapshot = snapshot_of(small_campus());
//! ```

pub mod builders;
pub mod campus;

pub use builders::{
    admin_lecturer, course, lecturer, preference, room, section, slot, time, week_slots, DAYS,
    SLOTS_PER_DAY,
};
pub use campus::{small_campus, snapshot_of, two_day_catalog};
