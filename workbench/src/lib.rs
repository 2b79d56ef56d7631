// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Client-side workflow layer for the MMT dashboard
//!
//! This crate holds the state machines behind the dashboard's widgets,
//! independent of any rendering toolkit:
//!
//! - [`editor::FailureEditor`]: the failure-notification edit session
//!   (load by id, field edits at minute precision, save, approve).
//! - [`banner::AlertBanner`]: the global critical-alert banner with
//!   dismiss-until-next-match semantics.
//! - [`sync_badge`]: the pure status-to-presentation mapping for the sync
//!   badge.
//! - [`navigation`]: the static module registry and the unread-count badge.
//!
//! Polling is centralized: instead of one timer per widget, the two HTTP
//! polls (open critical failures, unread alert count) run as background
//! tasks registered with a [`background::Driver`] and publish snapshots over
//! `tokio::sync::watch` channels that any number of widgets observe.

pub mod background;
pub mod banner;
pub mod editor;
pub mod navigation;
pub mod sync_badge;
