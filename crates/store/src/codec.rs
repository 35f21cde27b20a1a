//! Wire format for an owner's campaign list: a JSON array of campaign records
//! with camelCase fields and ISO-8601 `createdAt`.

use campaign_sequence::CampaignWorkflow;

pub fn encode(campaigns: &[CampaignWorkflow]) -> anyhow::Result<String> {
    Ok(serde_json::to_string(campaigns)?)
}

/// Missing optional fields fall back to their model defaults.
pub fn decode(data: &str) -> anyhow::Result<Vec<CampaignWorkflow>> {
    Ok(serde_json::from_str(data)?)
}
