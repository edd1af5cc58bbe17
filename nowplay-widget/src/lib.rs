//! nowplay-widget library - Status Widget
//!
//! Client-side half of the "Now Playing" feature: polls the status proxy on
//! a fixed interval, caches the latest normalized status, and renders one
//! of three mutually exclusive visual states (loading, playing, idle) with
//! content-identity keyed transitions.
//!
//! The pieces compose explicitly rather than through hidden globals: a
//! constructible [`cache::QueryCache`] is injected into the
//! [`view::StatusWidget`], and [`poller::spawn_poller`] drives the cache
//! from a [`client::ProxyClient`].

pub mod cache;
pub mod client;
pub mod poller;
pub mod render;
pub mod transition;
pub mod view;

pub use cache::QueryCache;
pub use client::ProxyClient;
pub use render::RenderFrame;
pub use view::{StatusWidget, WidgetState};
