use client_session::Role;
use once_cell::sync::Lazy;

/// Redirect target for navigations that need a login first.
pub const LOGIN_PATH: &str = "/login";
/// Redirect target for navigations the current session may not make.
pub const PROFILE_PATH: &str = "/profile";

pub const PERSONNEL_ONLY: &[Role] = &[Role::Personnel];
pub const PROVIDER_ONLY: &[Role] = &[Role::Provider];
pub const CUSTOMER_ONLY: &[Role] = &[Role::Customer];

/// One segment of a route pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// Fixed text.
    Static(&'static str),
    /// `:name` capture.
    Param(&'static str),
}

fn parse_segments(pattern: &'static str) -> Vec<Segment> {
    pattern
        .split('/')
        .filter(|part| !part.is_empty())
        .map(|part| match part.strip_prefix(':') {
            Some(name) => Segment::Param(name),
            None => Segment::Static(part),
        })
        .collect()
}

/// Guard metadata attached to a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteRequirements {
    pub requires_auth: bool,
    pub requires_guest: bool,
    /// Checked in declaration order; the standard table sets at most one
    /// role per route, but the guard handles any number.
    pub required_roles: &'static [Role],
}

impl RouteRequirements {
    pub const NONE: RouteRequirements = RouteRequirements {
        requires_auth: false,
        requires_guest: false,
        required_roles: &[],
    };

    pub const fn authenticated() -> Self {
        RouteRequirements {
            requires_auth: true,
            requires_guest: false,
            required_roles: &[],
        }
    }

    pub const fn guest() -> Self {
        RouteRequirements {
            requires_auth: false,
            requires_guest: true,
            required_roles: &[],
        }
    }

    /// Role-gated routes always require authentication as well.
    pub const fn role(roles: &'static [Role]) -> Self {
        RouteRequirements {
            requires_auth: true,
            requires_guest: false,
            required_roles: roles,
        }
    }
}

/// Static description of one route: path pattern, stable name, optional
/// route-level redirect, and guard requirements.
#[derive(Debug, Clone)]
pub struct RouteDescriptor {
    pub path: &'static str,
    pub name: &'static str,
    pub redirect: Option<&'static str>,
    pub requirements: RouteRequirements,
    segments: Vec<Segment>,
}

impl RouteDescriptor {
    pub fn new(path: &'static str, name: &'static str, requirements: RouteRequirements) -> Self {
        Self {
            path,
            name,
            redirect: None,
            requirements,
            segments: parse_segments(path),
        }
    }

    pub fn with_redirect(mut self, target: &'static str) -> Self {
        self.redirect = Some(target);
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Match a concrete path against this route, capturing `:param` values.
    pub fn matches(&self, path: &str) -> Option<RouteParams> {
        let parts: Vec<&str> = path.split('/').filter(|part| !part.is_empty()).collect();
        if parts.len() != self.segments.len() {
            return None;
        }
        let mut params = RouteParams::default();
        for (segment, part) in self.segments.iter().zip(parts) {
            match *segment {
                Segment::Static(expected) => {
                    if expected != part {
                        return None;
                    }
                }
                Segment::Param(name) => params.insert(name, part),
            }
        }
        Some(params)
    }
}

/// Captured `:param` values for a matched route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams(Vec<(&'static str, String)>);

impl RouteParams {
    fn insert(&mut self, name: &'static str, value: &str) {
        self.0.push((name, value.to_owned()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Outcome of resolving a concrete path against a table.
#[derive(Debug, Clone)]
pub struct RouteMatch<'a> {
    pub route: &'a RouteDescriptor,
    pub params: RouteParams,
}

/// Ordered route set; the first matching descriptor wins.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteDescriptor>,
}

impl RouteTable {
    pub fn new(routes: Vec<RouteDescriptor>) -> Self {
        Self { routes }
    }

    /// The application's full route surface.
    pub fn standard() -> &'static RouteTable {
        &STANDARD_ROUTES
    }

    pub fn routes(&self) -> &[RouteDescriptor] {
        &self.routes
    }

    pub fn by_name(&self, name: &str) -> Option<&RouteDescriptor> {
        self.routes.iter().find(|route| route.name == name)
    }

    pub fn resolve(&self, path: &str) -> Option<RouteMatch<'_>> {
        self.routes
            .iter()
            .find_map(|route| route.matches(path).map(|params| RouteMatch { route, params }))
    }
}

static STANDARD_ROUTES: Lazy<RouteTable> = Lazy::new(|| {
    RouteTable::new(vec![
        RouteDescriptor::new("/", "root", RouteRequirements::NONE).with_redirect(LOGIN_PATH),
        RouteDescriptor::new("/login", "login", RouteRequirements::guest()),
        RouteDescriptor::new("/register", "register", RouteRequirements::guest()),
        RouteDescriptor::new("/profile", "profile", RouteRequirements::authenticated()),
        RouteDescriptor::new(
            "/profile/edit",
            "profile-edit",
            RouteRequirements::authenticated(),
        ),
        RouteDescriptor::new(
            "/personnel",
            "personnel",
            RouteRequirements::role(PERSONNEL_ONLY),
        ),
        RouteDescriptor::new(
            "/personnel/create",
            "personnel-create",
            RouteRequirements::role(PERSONNEL_ONLY),
        ),
        RouteDescriptor::new(
            "/personnel/:id/edit",
            "personnel-edit",
            RouteRequirements::role(PERSONNEL_ONLY),
        ),
        RouteDescriptor::new(
            "/provider",
            "provider",
            RouteRequirements::role(PROVIDER_ONLY),
        ),
        RouteDescriptor::new(
            "/provider/create",
            "provider-create",
            RouteRequirements::role(PROVIDER_ONLY),
        ),
        RouteDescriptor::new(
            "/provider/:id/edit",
            "provider-edit",
            RouteRequirements::role(PROVIDER_ONLY),
        ),
        RouteDescriptor::new(
            "/customer",
            "customer",
            RouteRequirements::role(CUSTOMER_ONLY),
        ),
        RouteDescriptor::new(
            "/customer/create",
            "customer-create",
            RouteRequirements::role(CUSTOMER_ONLY),
        ),
        RouteDescriptor::new(
            "/customer/:id/edit",
            "customer-edit",
            RouteRequirements::role(CUSTOMER_ONLY),
        ),
    ])
});
