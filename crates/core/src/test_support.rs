// SPDX-License-Identifier: MIT

//! Test-only builders for entity structs, gated behind `test-support` so
//! other crates' tests can construct well-formed fixtures without
//! duplicating field lists.

use crate::clock::{Clock, SystemClock};
use crate::id::{IdGen, SequentialIdGen};
use crate::member::TeamMember;
use crate::project::{Project, ProjectId};
use crate::role::Role;
use crate::team::{Team, TeamId};
use crate::MemberId;
use std::path::PathBuf;

/// Builds members/teams/projects with sequential ids, for tests that don't
/// care about specific id values.
pub struct Fixtures {
    member_ids: SequentialIdGen,
    team_ids: SequentialIdGen,
    project_ids: SequentialIdGen,
}

impl Default for Fixtures {
    fn default() -> Self {
        Self {
            member_ids: SequentialIdGen::new("member"),
            team_ids: SequentialIdGen::new("team"),
            project_ids: SequentialIdGen::new("project"),
        }
    }
}

impl Fixtures {
    pub fn member(&self, name: &str, role: Role) -> TeamMember {
        TeamMember::new(
            MemberId::new(self.member_ids.next()),
            name,
            role,
            format!("you are {name}"),
            &SystemClock,
        )
    }

    pub fn team(&self, name: &str, members: Vec<TeamMember>) -> Team {
        Team::new(TeamId::new(self.team_ids.next()), name, "", members, &SystemClock)
    }

    pub fn project(&self, name: &str, path: impl Into<PathBuf>) -> Project {
        Project::new(ProjectId::new(self.project_ids.next()), name, path.into(), &SystemClock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_generate_distinct_sequential_ids() {
        let fx = Fixtures::default();
        let a = fx.member("dev-a", Role::Developer);
        let b = fx.member("qa-b", Role::Qa);
        assert_ne!(a.id, b.id);
    }
}
