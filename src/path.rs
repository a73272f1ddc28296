use crate::config::SEP;

/// POSIX-style resolution of remote paths against a working directory.
///
/// Pure string manipulation with no error conditions: any input normalizes
/// to *some* path. The only state is the working directory the resolver was
/// constructed with.
#[derive(Debug, Clone)]
pub struct PathResolver {
    cwd: String,
}

impl PathResolver {
    pub fn new(cwd: impl Into<String>) -> Self {
        Self { cwd: cwd.into() }
    }

    /// Working directory that anchors relative resolution.
    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    pub(crate) fn set_cwd(&mut self, cwd: String) {
        self.cwd = cwd;
    }

    pub fn is_absolute(path: &str) -> bool {
        path.starts_with(SEP)
    }

    /// Collapses `.` and `..` segments. A `..` with nothing left to pop is a
    /// silent no-op. Empty segments survive only at the very start (absolute
    /// marker) or the very end (trailing slash).
    pub fn normalize(&self, path: &str) -> String {
        let segments: Vec<&str> = path.split(SEP).collect();
        let last = segments.len() - 1;
        let mut result: Vec<&str> = Vec::new();

        for (i, segment) in segments.iter().enumerate() {
            match *segment {
                "." => {}
                ".." => {
                    result.pop();
                }
                "" if i > 0 && i < last => {}
                _ => result.push(segment),
            }
        }

        result.join(SEP)
    }

    /// Resolves components right to left: the rightmost absolute component
    /// wins and everything left of it is ignored; when no component is
    /// absolute the working directory anchors the result. Empty components
    /// are skipped.
    pub fn resolve(&self, components: &[&str]) -> String {
        let mut parts: Vec<&str> = Vec::new();

        for (i, component) in components.iter().enumerate().rev() {
            if component.is_empty() {
                continue;
            }
            parts.insert(0, component);
            if Self::is_absolute(component) {
                break;
            }
            if i == 0 {
                parts.insert(0, self.cwd.as_str());
            }
        }

        self.normalize(&parts.join(SEP))
    }

    /// Plain join-then-normalize; no absolute short-circuit and no working
    /// directory injection.
    pub fn join(&self, components: &[&str]) -> String {
        self.normalize(&components.join(SEP))
    }
}
