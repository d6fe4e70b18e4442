//! Public path allow-list
//!
//! Patterns use Ant-style segments: `*` matches exactly one path segment
//! and a trailing `/**` matches any remainder, including nothing.

/// Paths reachable without a token
pub const PUBLIC_PATHS: [&str; 10] = [
    "/auth/**",
    "/api/auth/**",
    "/test",
    "/api/test",
    "/api/test/**",
    "/health",
    "/actuator/health",
    "/error",
    "/favicon.ico",
    "/public/**",
];

/// A compiled path pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<String>,
    any_suffix: bool,
}

impl PathPattern {
    pub fn new(pattern: &str) -> Self {
        let (base, any_suffix) = match pattern.strip_suffix("/**") {
            Some(base) => (base, true),
            None => (pattern, false),
        };

        Self {
            segments: split_segments(base).map(str::to_string).collect(),
            any_suffix,
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        let mut path_segments = split_segments(path);

        for expected in &self.segments {
            match path_segments.next() {
                Some(actual) if expected == "*" || expected == actual => {}
                _ => return false,
            }
        }

        self.any_suffix || path_segments.next().is_none()
    }
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Ordered set of public patterns
#[derive(Debug, Clone)]
pub struct PublicPaths {
    patterns: Vec<PathPattern>,
}

impl Default for PublicPaths {
    fn default() -> Self {
        Self::new(PUBLIC_PATHS)
    }
}

impl PublicPaths {
    pub fn new<'a>(patterns: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            patterns: patterns.into_iter().map(PathPattern::new).collect(),
        }
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(path))
    }
}
