use crate::path::PathResolver;

/// Target accepted by [`DirectoryStack::pushd`] to exchange the two most
/// recent entries, shell style.
pub const SWAP_MARKER: &str = "-";

/// Shell-style navigation history over absolute remote paths.
///
/// Invariants: at least one entry at all times (the bottom is the configured
/// home), no two entries are ever equal, and the working directory always
/// mirrors the top. All mutation happens in caller order on a single thread;
/// there is no internal locking.
#[derive(Debug, Clone)]
pub struct DirectoryStack {
    resolver: PathResolver,
    stack: Vec<String>,
}

impl DirectoryStack {
    pub fn new(home: impl Into<String>) -> Self {
        let home = home.into();
        Self {
            resolver: PathResolver::new(home.clone()),
            stack: vec![home],
        }
    }

    /// Pushes a directory onto the stack and makes it current.
    ///
    /// An empty target or [`SWAP_MARKER`] exchanges the two most recent
    /// entries instead (a no-op below two entries). A target already on the
    /// stack is relocated to the top rather than duplicated. Returns a
    /// snapshot of the stack after the change, top last.
    pub fn pushd(&mut self, target: &str) -> Vec<String> {
        if target.is_empty() || target == SWAP_MARKER {
            let len = self.stack.len();
            if len >= 2 {
                self.stack.swap(len - 1, len - 2);
            }
        } else {
            let path = self.resolver.resolve(&[target]);
            if let Some(index) = self.stack.iter().position(|entry| entry == &path) {
                self.stack.remove(index);
            }
            self.stack.push(path);
        }

        self.sync_cwd();
        self.stack.clone()
    }

    /// Pops the top entry unless it is the only one; the bottom entry is not
    /// evictable this way. Returns a snapshot either way.
    pub fn popd(&mut self) -> Vec<String> {
        if self.stack.len() > 1 {
            self.stack.pop();
        }

        self.sync_cwd();
        self.stack.clone()
    }

    /// Ordered navigation history, top of stack last. Read-only: callers
    /// cannot mutate navigation state through this view.
    pub fn dirs(&self) -> &[String] {
        &self.stack
    }

    /// Current directory, always equal to the top of the stack.
    pub fn pwd(&self) -> &str {
        self.resolver.cwd()
    }

    pub fn normalize(&self, path: &str) -> String {
        self.resolver.normalize(path)
    }

    pub fn resolve(&self, components: &[&str]) -> String {
        self.resolver.resolve(components)
    }

    pub fn join(&self, components: &[&str]) -> String {
        self.resolver.join(components)
    }

    fn sync_cwd(&mut self) {
        // The stack is never empty, so the top always exists.
        if let Some(top) = self.stack.last() {
            self.resolver.set_cwd(top.clone());
        }
    }
}
