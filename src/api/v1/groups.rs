//! Route groups mounted under `/api/v1/<group>`.
//!
//! The shell owns prefixes, documentation tags and the authentication policy;
//! the groups' own endpoints come from the routers handed in here.

use utoipa_axum::{router::OpenApiRouter, routes};

use crate::api::v1::API_PREFIX;
use crate::api::v1::handlers::{health, placeholder};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSpec {
    pub prefix: &'static str,
    pub tag: &'static str,
    pub protected: bool,
}

impl GroupSpec {
    /// True for the mount point itself and every path below it.
    /// `/api/v1/agents` covers `/api/v1/agents/` but not `/api/v1/agentsx`.
    pub fn covers(&self, path: &str) -> bool {
        path.strip_prefix(API_PREFIX)
            .and_then(|rest| rest.strip_prefix(self.prefix))
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }
}

pub const HEALTH: GroupSpec = GroupSpec {
    prefix: "/health",
    tag: "Health",
    protected: false,
};
pub const AGENTS: GroupSpec = GroupSpec {
    prefix: "/agents",
    tag: "Agents",
    protected: true,
};
pub const TASKS: GroupSpec = GroupSpec {
    prefix: "/tasks",
    tag: "Tasks",
    protected: true,
};
pub const ANALYTICS: GroupSpec = GroupSpec {
    prefix: "/analytics",
    tag: "Analytics",
    protected: true,
};

pub const ALL: [GroupSpec; 4] = [HEALTH, AGENTS, TASKS, ANALYTICS];

/// Groups that sit behind the bearer gate.
pub fn protected() -> Vec<GroupSpec> {
    ALL.into_iter().filter(|spec| spec.protected).collect()
}

pub struct RouteGroups {
    pub health: OpenApiRouter<AppState>,
    pub agents: OpenApiRouter<AppState>,
    pub tasks: OpenApiRouter<AppState>,
    pub analytics: OpenApiRouter<AppState>,
}

impl RouteGroups {
    /// Pair each router with its `GroupSpec`, in mount order.
    pub fn into_parts(self) -> [(GroupSpec, OpenApiRouter<AppState>); 4] {
        [
            (HEALTH, self.health),
            (AGENTS, self.agents),
            (TASKS, self.tasks),
            (ANALYTICS, self.analytics),
        ]
    }
}

impl Default for RouteGroups {
    fn default() -> Self {
        Self {
            health: OpenApiRouter::new()
                .routes(routes!(health::health))
                .routes(routes!(health::readiness)),
            agents: placeholder::agents(),
            tasks: placeholder::tasks(),
            analytics: placeholder::analytics(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_mount_point_and_subpaths_only() {
        assert!(AGENTS.covers("/api/v1/agents"));
        assert!(AGENTS.covers("/api/v1/agents/"));
        assert!(AGENTS.covers("/api/v1/agents/42/runs"));

        assert!(!AGENTS.covers("/api/v1/agentsx"));
        assert!(!AGENTS.covers("/api/v1/tasks"));
        assert!(!AGENTS.covers("/agents"));
        assert!(!AGENTS.covers("/api/v2/agents"));
    }

    #[test]
    fn only_business_groups_are_protected() {
        let prefixes: Vec<&str> = protected().iter().map(|spec| spec.prefix).collect();
        assert_eq!(prefixes, ["/agents", "/tasks", "/analytics"]);
    }
}
