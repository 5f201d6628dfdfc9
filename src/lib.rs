//! # Inlet
//!
//! A personal feed aggregator with triage workflow.
//!
//! ## Architecture
//!
//! Inlet follows a modular pipeline architecture:
//!
//! ```text
//! Fetcher → Normalizer → Dedup → Store → CLI
//!              ↑
//!     Sync (remote payloads)
//! ```
//!
//! Items flow in from two directions: the local refresher fetches RSS
//! and HTML sources directly, and the sync client pulls normalized
//! records from a remote aggregation endpoint. Both paths converge on
//! the same dedup and upsert semantics, so an item seen twice merges
//! instead of duplicating.
//!
//! ## Quick Start
//!
//! ```bash
//! # Add a source (crawls the page for a feed link)
//! inlet add https://blog.rust-lang.org --discover
//!
//! # Fetch everything now
//! inlet refresh
//!
//! # Work the inbox
//! inlet list --items --status unread
//! inlet triage https://example.com/post later
//!
//! # Keep it current in the background
//! inlet daemon --interval 1h
//! ```

/// Application context and error handling.
///
/// [`AppContext`](app::AppContext) wires together store, fetchers,
/// refresher, discovery, sync and summarizer.
pub mod app;

/// Command-line interface using clap.
pub mod cli;

/// Configuration loaded from `~/.config/inlet/config.toml`.
pub mod config;

/// Background daemon running the refresh/sync loop on an interval.
pub mod daemon;

/// Feed autodiscovery: given any page URL, find its feed.
pub mod discovery;

/// Core domain models.
///
/// - [`Source`](domain::Source): a subscribed feed or site
/// - [`Item`](domain::Item): one entry, keyed by url
/// - [`Bucket`](domain::Bucket): the triage projection over item status
pub mod domain;

/// HTTP fetching and HTML link extraction.
///
/// - [`Fetcher`](fetcher::Fetcher): async trait for source fetching
/// - [`HttpFetcher`](fetcher::HttpFetcher): reqwest-based implementation
/// - [`HtmlExtractor`](fetcher::HtmlExtractor): item extraction for HTML sources
pub mod fetcher;

/// Record normalization and deduplication.
///
/// Converts loosely-shaped remote records and RSS/Atom entries into
/// [`NewItem`](domain::NewItem) candidates, then merges duplicates.
pub mod normalizer;

/// Parallel refresh cycle over all enabled sources.
pub mod refresh;

/// Built-in source registry seeded into fresh databases.
pub mod registry;

/// Device-local settings (JSON, lenient on errors).
pub mod settings;

/// SQLite persistence layer.
///
/// - [`Store`](store::Store): trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;

/// AI digest generation against a local model server.
pub mod summarizer;

/// Pull-based sync from a remote aggregation endpoint.
pub mod sync;
