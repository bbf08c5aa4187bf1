//! Version resolution for Plone and Volto project scaffolding
//!
//! This crate discovers which Plone backend and Volto frontend releases are
//! currently offered, and which Python, Node.js, and pnpm versions go with
//! them, by querying the public registries. Every lookup degrades to a fixed
//! fallback when a registry is unreachable or publishes unusable metadata,
//! so callers always receive a usable answer and never a transport error.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Registries │────▶│  Resolvers  │────▶│  Selection  │
//! │   (fetch)   │     │(group, trim)│     │(or fallback)│
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                   │
//!        ▼                   ▼
//! ┌─────────────┐     ┌─────────────┐
//! │   Client    │     │    Memos    │
//! │(shared HTTP)│     │ (lifetime)  │
//! └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`version`]: ordering key for the mixed release version syntaxes
//! - [`series`]: series keys and grouped release listings
//! - [`client`]: shared HTTP client with timeout and redirect handling
//! - [`registries`]: fetchers for dist.plone.org, PyPI, and npm
//! - [`resolvers`]: grouping, trimming, and compatibility policies
//! - [`cache`]: memoization primitives backing the resolvers
//! - [`outcome`]: live-or-fallback tagging of resolved data
//! - [`error`]: registry error type
//! - [`config`]: endpoints, version floors, and fallback constants

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod outcome;
pub mod registries;
pub mod resolvers;
pub mod series;
pub mod version;

pub use client::RegistryClient;
pub use error::RegistryError;
pub use outcome::Outcome;
pub use resolvers::{
    NodeCompatResolver, PloneSeriesResolver, PythonCompatResolver, Resolvers, VoltoSeriesResolver,
};
pub use series::{SeriesGroups, SeriesKey, SeriesLatest};
pub use version::{PreRelease, VersionKey};
