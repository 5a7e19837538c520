use serde::{Deserialize, Serialize};
use std::fmt;

use crate::aggregate::{validate_shares, ShareCheck};
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Member,
    Viewer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Member => write!(f, "member"),
            Role::Viewer => write!(f, "viewer"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    #[default]
    Active,
    Pending,
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Visibility {
    Public,
    Private,
    #[default]
    InviteOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollaborationSettings {
    pub allow_income_sharing: bool,
    pub allow_expense_sharing: bool,
    pub allow_member_invites: bool,
    pub require_approval: bool,
    pub visibility: Visibility,
}

impl Default for CollaborationSettings {
    fn default() -> Self {
        Self {
            allow_income_sharing: true,
            allow_expense_sharing: true,
            allow_member_invites: true,
            require_approval: false,
            visibility: Visibility::InviteOnly,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

/// The backend sends either a bare reference (email or id) or a populated profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Reference(String),
    Profile(UserProfile),
}

impl UserRef {
    pub fn id(&self) -> &str {
        match self {
            UserRef::Reference(reference) => reference,
            UserRef::Profile(profile) => &profile.id,
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            UserRef::Reference(reference) => reference.trim().to_string(),
            UserRef::Profile(profile) => format!("{} {}", profile.first_name, profile.last_name)
                .trim()
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub user: UserRef,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub share_percentage: f64,
    #[serde(default)]
    pub status: MemberStatus,
}

impl Member {
    pub fn new(user: impl Into<String>, role: Role, share_percentage: f64) -> Self {
        Self {
            user: UserRef::Reference(user.into()),
            role,
            share_percentage,
            status: MemberStatus::Active,
        }
    }

    pub fn display_name(&self) -> String {
        self.user.display_name()
    }

    /// Members without a display name are left out of the rendered report
    pub fn is_named(&self) -> bool {
        !self.display_name().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collaboration {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserRef>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub settings: CollaborationSettings,
}

impl Collaboration {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            owner: None,
            members: Vec::new(),
            settings: CollaborationSettings::default(),
        }
    }

    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    pub fn total_share(&self) -> f64 {
        self.members.iter().map(|m| m.share_percentage).sum()
    }

    pub fn named_members(&self) -> impl Iterator<Item = &Member> {
        self.members.iter().filter(|m| m.is_named())
    }

    pub fn has_named_members(&self) -> bool {
        self.named_members().next().is_some()
    }

    /// Append a member if the combined share stays at or below 100%.
    /// On rejection the member list is left untouched.
    pub fn add_member(&mut self, member: Member) -> Result<ShareCheck, ValidationError> {
        if member.user.id().trim().is_empty() {
            return Err(ValidationError::BlankMember);
        }

        let check = validate_shares(&self.members, Some(member.share_percentage))?;
        self.members.push(member);
        Ok(check)
    }

    /// Matches on id, or on name ignoring case
    pub fn matches(&self, reference: &str) -> bool {
        self.id == reference || self.name.eq_ignore_ascii_case(reference)
    }
}
