//! Replay controller for the candela analytics engine.
//!
//! [`ReplayController`] is an explicit state machine over a cursor into a
//! fixed series. It never owns a timer: a driver (the CLI uses a tokio
//! interval) calls [`ReplayController::tick`] and recomputes analytics over
//! [`ReplayController::visible`].

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/candela/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod controller;

pub use controller::{DEFAULT_INTERVAL, PlaybackState, ReplayController};
