use crate::domain::BilingualText;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: String,
    pub name: BilingualText,
    pub role: BilingualText,
    #[serde(default)]
    pub bio: BilingualText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    // display order on the team page, lowest first
    #[serde(default)]
    pub position: u32,
}
