use super::events::TeamEvent;
use super::value_objects::{TeamMember, TeamOrigin, TeamScope};
use crate::domain::age_class::AgeClass;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Number of shooters in a complete championship team
pub const TEAM_SIZE: usize = 3;

/// Structural violations of the Team aggregate
///
/// Compatibility of age classes is not checked here; that needs the rule
/// table and is the validator's job.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TeamError {
    #[error("Team already has {max} members")]
    TeamFull { max: usize },

    #[error("Too many members: {0} (a team has at most {})", TEAM_SIZE)]
    TooManyMembers(usize),

    #[error("Shooter {0} is already a member of this team")]
    DuplicateMember(Uuid),

    #[error("Shooter {0} is not a member of this team")]
    NotAMember(Uuid),
}

/// Team aggregate root
///
/// A championship team of up to three shooters of one club, for one
/// discipline and season.
///
/// # Invariants
/// - At most [`TEAM_SIZE`] members
/// - No shooter appears twice
/// - Any manual change turns the team into a `Manual` team
///
/// # Example
/// ```
/// use kreismeisterschaft_api::domain::team::{Team, TeamScope};
/// use uuid::Uuid;
///
/// let scope = TeamScope::new(Uuid::new_v4(), Uuid::new_v4(), 2026);
/// let (team, events) = Team::manual(scope, 1, Vec::new()).expect("valid team");
///
/// assert!(!team.is_complete());
/// assert_eq!(events.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    id: Uuid,
    club_id: Uuid,
    discipline_id: Uuid,
    season: i32,
    number: i32,
    members: Vec<TeamMember>,
    origin: TeamOrigin,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Team {
    /// Creates a team produced by automatic formation
    ///
    /// # Returns
    /// * `Ok((Team, Vec<TeamEvent>))` - New team and a `Generated` event
    /// * `Err(TeamError)` - More than three members or a duplicate shooter
    pub fn generated(
        scope: TeamScope,
        number: i32,
        members: Vec<TeamMember>,
    ) -> Result<(Self, Vec<TeamEvent>), TeamError> {
        let team = Self::build(scope, number, members, TeamOrigin::Generated)?;
        let events = vec![TeamEvent::Generated {
            team_id: team.id,
            club_id: team.club_id,
            member_count: team.members.len(),
        }];
        Ok((team, events))
    }

    /// Creates a team assembled by an administrator
    pub fn manual(
        scope: TeamScope,
        number: i32,
        members: Vec<TeamMember>,
    ) -> Result<(Self, Vec<TeamEvent>), TeamError> {
        let team = Self::build(scope, number, members, TeamOrigin::Manual)?;
        let events = vec![TeamEvent::Created {
            team_id: team.id,
            club_id: team.club_id,
            member_count: team.members.len(),
        }];
        Ok((team, events))
    }

    fn build(
        scope: TeamScope,
        number: i32,
        members: Vec<TeamMember>,
        origin: TeamOrigin,
    ) -> Result<Self, TeamError> {
        if members.len() > TEAM_SIZE {
            return Err(TeamError::TooManyMembers(members.len()));
        }
        for (i, member) in members.iter().enumerate() {
            if members[..i].iter().any(|m| m.shooter_id == member.shooter_id) {
                return Err(TeamError::DuplicateMember(member.shooter_id));
            }
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            club_id: scope.club_id,
            discipline_id: scope.discipline_id,
            season: scope.season,
            number,
            members,
            origin,
            created_at: now,
            updated_at: now,
        })
    }

    /// Adds a shooter to the team
    ///
    /// # Business Rules
    /// - The team must have a free slot
    /// - The shooter must not already be a member
    /// - The team becomes a manual team
    pub fn add_member(&mut self, member: TeamMember) -> Result<TeamEvent, TeamError> {
        if self.contains(member.shooter_id) {
            return Err(TeamError::DuplicateMember(member.shooter_id));
        }
        if self.members.len() >= TEAM_SIZE {
            return Err(TeamError::TeamFull { max: TEAM_SIZE });
        }

        let shooter_id = member.shooter_id;
        self.members.push(member);
        self.touch_manually();

        Ok(TeamEvent::MemberAdded {
            team_id: self.id,
            shooter_id,
        })
    }

    /// Removes a shooter from the team; the team becomes a manual team
    pub fn remove_member(&mut self, shooter_id: Uuid) -> Result<TeamEvent, TeamError> {
        let position = self
            .members
            .iter()
            .position(|m| m.shooter_id == shooter_id)
            .ok_or(TeamError::NotAMember(shooter_id))?;

        self.members.remove(position);
        self.touch_manually();

        Ok(TeamEvent::MemberRemoved {
            team_id: self.id,
            shooter_id,
        })
    }

    /// Assigns the team's display number within its scope
    pub fn renumber(&mut self, number: i32) {
        self.number = number;
    }

    fn touch_manually(&mut self) {
        self.origin = TeamOrigin::Manual;
        self.updated_at = Utc::now();
    }

    // ===== Queries =====

    /// A team is complete with exactly three members
    pub fn is_complete(&self) -> bool {
        self.members.len() == TEAM_SIZE
    }

    pub fn contains(&self, shooter_id: Uuid) -> bool {
        self.members.iter().any(|m| m.shooter_id == shooter_id)
    }

    pub fn member_ids(&self) -> Vec<Uuid> {
        self.members.iter().map(|m| m.shooter_id).collect()
    }

    /// Age classes of the members, in member order
    pub fn age_classes(&self) -> Vec<&AgeClass> {
        self.members.iter().map(|m| &m.age_class).collect()
    }

    /// Sum of the members' qualifying scores
    pub fn total_score(&self) -> Decimal {
        self.members.iter().map(|m| m.qualifying_score).sum()
    }

    /// Highest qualifying score in the team, zero for an empty team
    pub fn best_score(&self) -> Decimal {
        self.members
            .iter()
            .map(|m| m.qualifying_score)
            .max()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn scope(&self) -> TeamScope {
        TeamScope::new(self.club_id, self.discipline_id, self.season)
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn club_id(&self) -> Uuid {
        self.club_id
    }

    pub fn discipline_id(&self) -> Uuid {
        self.discipline_id
    }

    pub fn season(&self) -> i32 {
        self.season
    }

    pub fn number(&self) -> i32 {
        self.number
    }

    pub fn members(&self) -> &[TeamMember] {
        &self.members
    }

    pub fn origin(&self) -> TeamOrigin {
        self.origin
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Reconstructs a Team from persistence layer data
    ///
    /// Bypasses the constructor checks; only for repository implementations.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persistence(
        id: Uuid,
        club_id: Uuid,
        discipline_id: Uuid,
        season: i32,
        number: i32,
        members: Vec<TeamMember>,
        origin: TeamOrigin,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            club_id,
            discipline_id,
            season,
            number,
            members,
            origin,
            created_at,
            updated_at,
        }
    }
}
