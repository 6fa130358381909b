//! # CBA Indicators
//!
//! Command-line client for the CBA indicator recommendation service.
//!
//! A project is described either by uploading a project document or by
//! chatting with the intake assistant; the service then recommends
//! monitoring indicators, which can be filtered, picked, and compared side
//! by side. Page state lives in [`cba_core`]; this crate adds the HTTP
//! client, configuration, logging, and one command per page.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌───────────────┐   ┌────────────────────┐
//! │  CLI (cba)   │──▶│  cba_core     │──▶│  IndicatorApi      │
//! │  one command │   │  page views   │   │  HttpApi (reqwest) │
//! │  per page    │◀──│  + routes     │   │  /chat /upload     │
//! └──────────────┘   └───────────────┘   │  /recommendations  │
//!                                        └────────────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and API URL resolution |
//! | [`client`] | HTTP implementation of the service calls |
//! | [`logging`] | `tracing` subscriber setup |
//! | [`render`] | Text and JSON output helpers |
//! | [`home`], [`upload`], [`chat`], [`results`], [`compare`] | Page commands |
//! | [`open`] | Route-link dispatch |

pub mod chat;
pub mod client;
pub mod compare;
pub mod config;
pub mod home;
pub mod logging;
pub mod open;
pub mod render;
pub mod results;
pub mod upload;
