use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::dto::scoring::ScoringRulesResponse;
use crate::models::{League, LeagueMember};

/// Request payload for creating a league
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateLeagueRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeagueResponse {
    pub league_id: Uuid,
    pub name: String,
    pub admin_id: Uuid,
    pub invite_code: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<League> for LeagueResponse {
    fn from(league: League) -> Self {
        Self {
            league_id: league.league_id,
            name: league.name,
            admin_id: league.admin_id,
            invite_code: league.invite_code,
            created_at: league.created_at,
        }
    }
}

/// A league the caller belongs to
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LeagueSummary {
    pub league_id: Uuid,
    pub name: String,
    pub admin_id: Uuid,
    pub admin_username: String,
    pub member_count: i64,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JoinLeagueResponse {
    pub league_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InviteCodeResponse {
    pub invite_code: Uuid,
}

/// What an invite link shows before joining
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LeaguePreview {
    pub league_id: Uuid,
    pub name: String,
    pub admin_username: String,
    pub member_count: i64,
}

/// Full view of a league for its members.
///
/// The invite code is only disclosed to the league administrator.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeagueDetailResponse {
    pub league_id: Uuid,
    pub name: String,
    pub admin_id: Uuid,
    pub admin_username: Option<String>,
    pub invite_code: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub members: Vec<LeagueMember>,
    pub scoring: ScoringRulesResponse,
}

impl LeagueDetailResponse {
    pub fn new(
        league: League,
        members: Vec<LeagueMember>,
        scoring: ScoringRulesResponse,
        viewer_id: Uuid,
    ) -> Self {
        let admin_username = members
            .iter()
            .find(|member| member.user_id == league.admin_id)
            .map(|member| member.username.clone());
        let invite_code = (viewer_id == league.admin_id).then_some(league.invite_code);

        Self {
            league_id: league.league_id,
            name: league.name,
            admin_id: league.admin_id,
            admin_username,
            invite_code,
            created_at: league.created_at,
            members,
            scoring,
        }
    }
}

/// League row as listed for its administrator
#[derive(Debug, Clone, FromRow)]
pub struct AdministeredLeague {
    pub league_id: Uuid,
    pub name: String,
    pub invite_code: Uuid,
    pub member_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdministeredLeagueResponse {
    pub league_id: Uuid,
    pub name: String,
    pub invite_code: Uuid,
    pub member_count: i64,
    pub created_at: DateTime<Utc>,
    pub scoring: ScoringRulesResponse,
}

impl AdministeredLeagueResponse {
    pub fn new(league: AdministeredLeague, scoring: ScoringRulesResponse) -> Self {
        Self {
            league_id: league.league_id,
            name: league.name,
            invite_code: league.invite_code,
            member_count: league.member_count,
            created_at: league.created_at,
            scoring,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::at;

    fn league(admin_id: Uuid) -> League {
        League {
            league_id: Uuid::from_u128(1),
            name: "Paddock Club".to_string(),
            admin_id,
            invite_code: Uuid::from_u128(99),
            created_at: at("2025-02-01T12:00:00Z"),
        }
    }

    fn member(id: u128, username: &str) -> LeagueMember {
        LeagueMember {
            user_id: Uuid::from_u128(id),
            username: username.to_string(),
            joined_at: at("2025-02-02T12:00:00Z"),
        }
    }

    fn scoring() -> ScoringRulesResponse {
        ScoringRulesResponse::from_rules(Uuid::from_u128(1), None)
    }

    #[test]
    fn test_detail_names_admin_from_members() {
        let admin = Uuid::from_u128(10);
        let members = vec![member(10, "ada"), member(11, "bruno")];

        let detail = LeagueDetailResponse::new(league(admin), members, scoring(), admin);

        assert_eq!(detail.admin_username.as_deref(), Some("ada"));
        assert_eq!(detail.members.len(), 2);
        assert!(detail.scoring.uses_defaults);
    }

    #[test]
    fn test_invite_code_shown_to_league_admin_only() {
        let admin = Uuid::from_u128(10);
        let members = vec![member(10, "ada"), member(11, "bruno")];

        let as_admin = LeagueDetailResponse::new(league(admin), members.clone(), scoring(), admin);
        let as_member =
            LeagueDetailResponse::new(league(admin), members, scoring(), Uuid::from_u128(11));

        assert_eq!(as_admin.invite_code, Some(Uuid::from_u128(99)));
        assert_eq!(as_member.invite_code, None);
    }

    #[test]
    fn test_administered_league_carries_counts_and_rules() {
        let row = AdministeredLeague {
            league_id: Uuid::from_u128(1),
            name: "Paddock Club".to_string(),
            invite_code: Uuid::from_u128(99),
            member_count: 4,
            created_at: at("2025-02-01T12:00:00Z"),
        };

        let response = AdministeredLeagueResponse::new(row, scoring());

        assert_eq!(response.member_count, 4);
        assert_eq!(response.scoring.league_id, Uuid::from_u128(1));
    }
}
