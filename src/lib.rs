// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Activity Deck: swipe through suggested activities.
//!
//! This crate provides the client-side core of the swipe app: picking the
//! next activity card from the catalog, recording interactions against the
//! hosted data service, and reinforcing category preferences on completion.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod time_utils;

pub use services::{Session, SessionState};
