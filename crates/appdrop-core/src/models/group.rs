use serde::{Deserialize, Serialize};

use crate::config::OrganizationGroupRef;

/// Numeric identifier wrapper used by the API (`{"Value": 570}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityId {
    #[serde(rename = "Value")]
    pub value: i64,
}

/// Organization group as returned by `/API/system/groups/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationGroup {
    #[serde(rename = "Id")]
    pub id: EntityId,
    #[serde(rename = "Uuid", default)]
    pub uuid: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "GroupId", default)]
    pub group_id: Option<String>,
    #[serde(rename = "Country", default)]
    pub country: Option<String>,
}

impl OrganizationGroup {
    /// One-line label used when the operator has to pick a group.
    pub fn label(&self) -> String {
        format!(
            "{} (id {}, {}){}",
            self.name,
            self.id.value,
            self.group_id.as_deref().unwrap_or("-"),
            self.country
                .as_deref()
                .map(|c| format!(" [{}]", c))
                .unwrap_or_default()
        )
    }
}

impl From<&OrganizationGroup> for OrganizationGroupRef {
    fn from(group: &OrganizationGroup) -> Self {
        OrganizationGroupRef {
            id: group.id.value,
            uuid: group.uuid.clone(),
            name: group.name.clone(),
        }
    }
}

/// Group search response envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupSearchResponse {
    #[serde(rename = "LocationGroups", default)]
    pub location_groups: Vec<OrganizationGroup>,
    #[serde(rename = "Total", default)]
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_group_search_envelope() {
        let body = r#"{
            "LocationGroups": [
                {"Id": {"Value": 570}, "Uuid": "6f1d", "Name": "Corp", "GroupId": "corp", "Country": "Belgium"},
                {"Id": {"Value": 571}, "Name": "Corp Labs"}
            ],
            "Page": 0,
            "PageSize": 500,
            "Total": 2
        }"#;
        let parsed: GroupSearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.total, 2);
        assert_eq!(parsed.location_groups[0].id.value, 570);
        assert_eq!(parsed.location_groups[1].uuid, "");
        assert_eq!(
            parsed.location_groups[0].label(),
            "Corp (id 570, corp) [Belgium]"
        );

        let selected = OrganizationGroupRef::from(&parsed.location_groups[0]);
        assert_eq!(selected.id, 570);
        assert_eq!(selected.uuid, "6f1d");
    }
}
