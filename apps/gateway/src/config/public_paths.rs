//! Paths that skip the authentication gate.

/// Prefixes served without authentication: auth endpoints, the public
/// product catalog, API documentation and the health probe.
pub const DEFAULT_PUBLIC_PREFIXES: &[&str] = &[
    "/auth/",
    "/api/auth",
    "/product/",
    "/swagger-ui",
    "/v3/api-docs",
    "/health",
];

/// Paths that bypass the gate only on an exact match.
pub const DEFAULT_PUBLIC_EXACT: &[&str] = &["/swagger-ui.html"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicPaths {
    prefixes: Vec<String>,
    exact: Vec<String>,
}

impl PublicPaths {
    pub fn new<P, E>(prefixes: P, exact: E) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
            exact: exact.into_iter().map(Into::into).collect(),
        }
    }

    /// Nothing is public.
    pub fn none() -> Self {
        Self {
            prefixes: Vec::new(),
            exact: Vec::new(),
        }
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.exact.iter().any(|p| p == path)
            || self.prefixes.iter().any(|p| path.starts_with(p.as_str()))
    }
}

impl Default for PublicPaths {
    fn default() -> Self {
        Self::new(
            DEFAULT_PUBLIC_PREFIXES.iter().copied(),
            DEFAULT_PUBLIC_EXACT.iter().copied(),
        )
    }
}
