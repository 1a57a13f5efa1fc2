//! Bid decision strategies for Adnuntius custom-bidding line items.
//!
//! Each polling cycle the [`engine::driver::Driver`] fetches per-site stats for
//! every line item, hands them to the configured [`strategy::BidStrategy`] and
//! submits the resulting [`domain::BidUpdate`]s. Two strategies ship with the
//! crate: fixed per-site prices from a [`strategy::BidTable`], and a daily
//! [`schedule::PauseWindow`] that pauses and resumes the line item.

pub mod adapters;
pub mod cli;
pub mod clock;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod schedule;
pub mod strategy;

#[cfg(test)]
pub(crate) mod test_support;
