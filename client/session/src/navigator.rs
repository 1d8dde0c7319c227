/// Router hook the session layer drives when it has to move the user, such
/// as the forced trip to the login page at the end of a logout.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Navigator for embedders that handle navigation elsewhere; drops requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, _path: &str) {}
}
