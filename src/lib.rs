//! # Respimg
//!
//! Responsive image plumbing for sites that serve originals through an
//! on-the-fly transform engine. Given a stored image and a set of transform
//! parameters, respimg builds the public URLs, the `srcset` candidate
//! lists, and the final `<img>`/`<picture>` markup — and routes the
//! resulting requests back to the engine.
//!
//! # Architecture: Resolve, Describe, Render
//!
//! Markup generation runs through three independent layers, each producing
//! a plain data value the next one consumes:
//!
//! ```text
//! 1. Resolve   ImageRef  →  source URL + metadata   (media store lookup)
//! 2. Describe  source    →  descriptor              (URLs, srcset entries, attributes)
//! 3. Render    descriptor →  Markup                 (final HTML via Maud)
//! ```
//!
//! This separation exists for three reasons:
//!
//! - **Testability**: descriptors are ordinary structs you can assert on
//!   without parsing HTML.
//! - **Reuse**: the same descriptor feeds both the `<img>` and `<picture>`
//!   renderers, and callers that need raw URLs can stop after stage 2.
//! - **Graceful degradation**: an unresolvable image produces an empty
//!   descriptor, which renders to empty markup — templates never have to
//!   guard against missing attachments.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`params`] | Transform parameter sets — insertion-ordered, query-string serializable |
//! | [`config`] | Named size tables from TOML: single sets and per-viewport groups |
//! | [`media`] | The [`media::MediaStore`] seam — resolving image references to URLs and metadata |
//! | [`url`] | Public transform URL construction (base path, relative-path rewriting, SVG passthrough) |
//! | [`srcset`] | `srcset` candidate generation — width filtering, webp pairing, default `src` selection |
//! | [`picture`] | Mobile/desktop pairing and width derivation for `<picture>` elements |
//! | [`markup`] | Descriptor → HTML rendering with Maud |
//! | [`images`] | The [`images::Images`] service — the facade tying store, URLs, and sizes together |
//! | [`compat`] | Legacy call-shape adapter (`get`, `getImage`, `getImages`, …) |
//! | [`dispatch`] | Request interception: rewriting public paths back into engine paths |
//!
//! # Design Decisions
//!
//! ## Maud Over String Templates
//!
//! Markup is produced with [Maud](https://maud.lambda.xyz/) where the
//! element structure is static, with a small escaped-attribute writer for
//! the caller-supplied attribute maps Maud's macro cannot express.
//! Interpolation is auto-escaped either way, so attacker-controlled alt
//! text or attribute values cannot break out of the tag.
//!
//! ## Degrade to Empty, Never Panic
//!
//! Template-facing operations return empty values instead of errors: an
//! unknown image yields empty markup, an unknown size name yields an empty
//! parameter set (with a `tracing` warning). A missing attachment is
//! routine content drift, not a programming error, and a page render
//! should survive it. Errors are reserved for the edges where the caller
//! can act on them: config parsing ([`config::ConfigError`]) and legacy
//! dispatch ([`compat::CompatError`]).
//!
//! ## Injected Media Store
//!
//! All lookups go through the [`media::MediaStore`] trait rather than a
//! global. Production embeds supply their CMS-backed store; tests use
//! [`media::StaticMediaStore`], a handful of in-memory entries. Nothing in
//! the crate touches ambient state.
//!
//! ## Ordered Parameter Sets
//!
//! [`params::ParameterSet`] preserves insertion order, so a given input
//! always serializes to the same query string. Engines key their caches on
//! the full URL; a reordering map would silently fragment those caches.

pub mod compat;
pub mod config;
pub mod dispatch;
pub mod images;
pub mod markup;
pub mod media;
pub mod params;
pub mod picture;
pub mod srcset;
pub mod url;
