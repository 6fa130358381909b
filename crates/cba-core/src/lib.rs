//! # CBA Core
//!
//! Shared, I/O-free logic for CBA Indicators: the indicator data model, the
//! static fallback catalog, client-side filtering and selection, the typed
//! route schema that threads state between pages, the [`api::IndicatorApi`]
//! seam to the remote recommendation service, and one explicit view-state
//! type per page.
//!
//! This crate performs no network, filesystem, or runtime work. The
//! `cba-indicators` crate supplies the HTTP client and the CLI that drive
//! these views.
//!
//! ## Page flow
//!
//! ```text
//!   Home ──▶ Upload ──┐
//!     │               ▼
//!     └──────────▶  Chat ──▶ Results ──▶ Compare
//!                            ▲                │
//!                            └── remove=<id> ─┘
//! ```

pub mod api;
pub mod catalog;
pub mod filter;
pub mod lifecycle;
pub mod models;
pub mod route;
pub mod selection;
pub mod views;
