//! # veritaminal-borders
//!
//! The playable border settings for Veritaminal, each with its own rule
//! pack, scripted milestones, and atmosphere:
//!
//! 1. **Eastokva Crossing** — a reopened land border; ministry seals and a
//!    closed transit corridor arrive mid-career.
//! 2. **Port of Veldania** — a harbor checkpoint; shore papers must be
//!    dated, ordered, and eventually sealed.
//! 3. **Mirastan Mountain Pass** — a winter crossing under refugee surge;
//!    suspended issuing offices and expiry-date directives.
//!
//! [`catalog`] looks settings up and assembles ready-to-play shift engines;
//! [`scenarios`] holds three demo walk-throughs used by the demo binary.

pub mod catalog;
pub mod scenarios;
