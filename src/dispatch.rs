//! Request interception for transform URLs.
//!
//! Public URLs produced by [`crate::url`] embed a path prefix (the base
//! path, `img` by default) that no file on disk answers to. [`Dispatcher`]
//! recognises those requests, rewrites the path back into a source-relative
//! one, and hands it to a [`TransformEngine`] exactly once. Requests whose
//! path does not contain the base path fall through untouched so the host
//! can serve them normally.
//!
//! The dispatcher is transport-agnostic: it works on an already-parsed path
//! and query pairs and returns the engine's response verbatim, leaving HTTP
//! plumbing to the embedding server.

/// Raw response from a transform engine, passed through unmodified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl EngineResponse {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }
}

/// The component that renders a source image according to query parameters.
pub trait TransformEngine {
    /// Produce the transformed image at `path` (source-relative, with a
    /// leading slash) for the given query pairs.
    fn output_image(&self, path: &str, query: &[(String, String)]) -> EngineResponse;
}

impl<F> TransformEngine for F
where
    F: Fn(&str, &[(String, String)]) -> EngineResponse,
{
    fn output_image(&self, path: &str, query: &[(String, String)]) -> EngineResponse {
        self(path, query)
    }
}

/// Routes transform requests to an engine based on the URL base path.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    base_path: String,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new("img")
    }
}

impl Dispatcher {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Handle one request. Returns `None` when the path does not contain
    /// the base path, so the caller can fall through to its own routing.
    ///
    /// The base path and the single separator character after it are
    /// removed at the position they occur, turning
    /// `/img/2024/photo.jpg` into `/2024/photo.jpg`.
    pub fn handle<E: TransformEngine>(
        &self,
        request_path: &str,
        query: &[(String, String)],
        engine: &E,
    ) -> Option<EngineResponse> {
        let at = request_path.find(&self.base_path)?;
        let after = at + self.base_path.len();
        let mut source_path = String::with_capacity(request_path.len());
        source_path.push_str(&request_path[..at]);
        // Drop the separator that followed the base path along with it.
        let rest = &request_path[after..];
        let mut chars = rest.chars();
        chars.next();
        source_path.push_str(chars.as_str());
        Some(engine.output_image(&source_path, query))
    }
}
