//! Shared test harness modules for the Siteline CLI.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]

use super::*;

mod fetch_steps;
mod helpers;
mod rank_steps;
