use uuid::Uuid;

/// Domain events that occur within the Team aggregate
///
/// Emitted by the aggregate's constructors and mutators; the application
/// service logs them after the change has been persisted.
///
/// # Example
/// ```
/// use kreismeisterschaft_api::domain::team::events::TeamEvent;
/// use uuid::Uuid;
///
/// let event = TeamEvent::MemberAdded {
///     team_id: Uuid::new_v4(),
///     shooter_id: Uuid::new_v4(),
/// };
/// assert_eq!(event.name(), "member_added");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamEvent {
    /// Fired when team formation produced the team
    Generated {
        team_id: Uuid,
        club_id: Uuid,
        member_count: usize,
    },
    /// Fired when an administrator created the team by hand
    Created {
        team_id: Uuid,
        club_id: Uuid,
        member_count: usize,
    },
    MemberAdded {
        team_id: Uuid,
        shooter_id: Uuid,
    },
    MemberRemoved {
        team_id: Uuid,
        shooter_id: Uuid,
    },
}

impl TeamEvent {
    /// Returns the team_id for this event
    pub fn team_id(&self) -> Uuid {
        match self {
            TeamEvent::Generated { team_id, .. } => *team_id,
            TeamEvent::Created { team_id, .. } => *team_id,
            TeamEvent::MemberAdded { team_id, .. } => *team_id,
            TeamEvent::MemberRemoved { team_id, .. } => *team_id,
        }
    }

    /// Stable event name for logs
    pub fn name(&self) -> &'static str {
        match self {
            TeamEvent::Generated { .. } => "generated",
            TeamEvent::Created { .. } => "created",
            TeamEvent::MemberAdded { .. } => "member_added",
            TeamEvent::MemberRemoved { .. } => "member_removed",
        }
    }
}
