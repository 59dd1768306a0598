//! Route bookkeeping
//!
//! The routing engine is an external collaborator reached through
//! [`RouteService`]. [`RouteTracker`] owns the single route handle and decides
//! between a full recomputation and a cheap origin update.

mod service;
mod tracker;

pub use service::{RouteError, RouteHandle, RouteService};
pub use tracker::{RouteAction, RouteState, RouteTracker};
