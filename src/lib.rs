//! # poemsite
//!
//! Catalog plain-text poems in named configurations and publish each
//! configuration as a static website. Poem files carry their own metadata in
//! their names (`<YYYY.MM.DD>_<N>_<title>.txt`); the catalog itself is a set of
//! flat comma-separated text files.
//!
//! # Architecture: Two Stores, One Generator
//!
//! ```text
//! config/_base.cfg    name,backing-file        (registry of configurations)
//! config/<name>.cfg   id,date,title,filepath   (one poem store per configuration)
//!          │
//!          ▼
//! generate  →  dest/index.html, dest/<stem>.html, dest/src/<poem>.txt
//! ```
//!
//! Reads are lenient: a malformed line is skipped. Rewrites (removals) are
//! strict: a malformed line aborts the operation rather than being dropped,
//! and the new file replaces the old one through a rename.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`api`] | `PoemTool`, the operations the CLI calls |
//! | [`registry`] | Configuration registry: list, add, remove with cascade |
//! | [`poem_store`] | Per-configuration poem store and poem ingestion |
//! | [`generate`] | Site generation for one configuration, source copying |
//! | [`page`] | Poem page rendering with Maud |
//! | [`index`] | Index page rendering with Maud |
//! | [`naming`] | `<YYYY.MM.DD>_<N>_<title>.txt` filename parser |
//! | [`config`] | Optional `poems.toml` settings: store location, site title |
//! | [`types`] | Records shared between stores, generator, and CLI |
//! | [`error`] | Error taxonomy shared by every operation |
//! | [`output`] | CLI text formatting |
//!
//! # Design Decisions
//!
//! ## Pages Load Their Text at View Time
//!
//! A poem page does not embed the poem. It carries a `data-src` URL pointing at
//! the copied source under `src/`, and a few lines of inline JavaScript fetch
//! and display it as plain text. Editing a published poem only requires
//! replacing the `.txt` file.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/). Interpolated titles
//! and dates are escaped automatically, and the page structure is checked at
//! compile time.
//!
//! ## Deterministic Output
//!
//! Generating the same store twice produces byte-identical files. Pages and the
//! index contain no timestamps, and unchanged sources are detected by SHA-256
//! and left alone.

pub mod api;
pub mod config;
pub mod error;
mod flatfile;
pub mod generate;
pub mod index;
pub mod naming;
pub mod output;
pub mod page;
pub mod poem_store;
pub mod registry;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
