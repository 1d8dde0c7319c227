pub mod guard;
pub mod routes;

pub use guard::{decide, evaluate, GuardDecision};
pub use routes::{
    RouteDescriptor, RouteMatch, RouteParams, RouteRequirements, RouteTable, Segment,
    CUSTOMER_ONLY, LOGIN_PATH, PERSONNEL_ONLY, PROFILE_PATH, PROVIDER_ONLY,
};
