use crate::markup::tokens::{ChannelToken, RoleToken, VariableToken};
use crate::models::{Channel, MentionKind, Role, Roster, TemplateVariable};

/// One selectable row in the suggestion surface, ready to commit: the raw
/// value is already in canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub kind: MentionKind,
    pub raw_value: String,
    pub label: String,
}

impl Candidate {
    pub fn role(role: &Role) -> Self {
        Self {
            kind: MentionKind::Role,
            raw_value: RoleToken::raw(&role.id),
            label: format!("@{}", role.name),
        }
    }

    pub fn channel(channel: &Channel) -> Self {
        Self {
            kind: MentionKind::Channel,
            raw_value: ChannelToken::raw(&channel.id),
            label: format!("#{}", channel.name),
        }
    }

    pub fn variable(variable: &TemplateVariable) -> Self {
        Self {
            kind: MentionKind::Variable,
            raw_value: VariableToken::raw(&variable.key),
            label: variable.name.clone(),
        }
    }
}

/// A category of variable candidates, in the roster's category order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableGroup {
    pub category: String,
    pub items: Vec<Candidate>,
}

/// Case-insensitive substring match. An empty search matches everything,
/// so the surface can show the full list when composition opens.
fn matches(haystack: &str, search: &str) -> bool {
    search.is_empty() || haystack.to_lowercase().contains(&search.to_lowercase())
}

pub fn filter_roles(roles: &[Role], search: &str) -> Vec<Candidate> {
    roles
        .iter()
        .filter(|r| matches(&r.name, search))
        .map(Candidate::role)
        .collect()
}

pub fn filter_channels(channels: &[Channel], search: &str) -> Vec<Candidate> {
    channels
        .iter()
        .filter(|c| matches(&c.name, search))
        .map(Candidate::channel)
        .collect()
}

/// Filters variables by name or key and groups the hits by category,
/// keeping the first-seen category order.
pub fn filter_variables(variables: &[TemplateVariable], search: &str) -> Vec<VariableGroup> {
    let mut groups: Vec<VariableGroup> = Vec::new();
    for variable in variables {
        if !matches(&variable.name, search) && !matches(&variable.key, search) {
            continue;
        }
        let candidate = Candidate::variable(variable);
        match groups.iter_mut().find(|g| g.category == variable.category) {
            Some(group) => group.items.push(candidate),
            None => groups.push(VariableGroup {
                category: variable.category.clone(),
                items: vec![candidate],
            }),
        }
    }
    groups
}

/// The flat candidate list for a mention kind, in roster order.
pub fn candidates(roster: &Roster, kind: MentionKind, search: &str) -> Vec<Candidate> {
    match kind {
        MentionKind::Role => filter_roles(&roster.roles, search),
        MentionKind::Channel => filter_channels(&roster.channels, search),
        MentionKind::Variable => filter_variables(&roster.variables, search)
            .into_iter()
            .flat_map(|g| g.items)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variables() -> Vec<TemplateVariable> {
        let var = |key: &str, name: &str, category: &str| TemplateVariable {
            key: key.into(),
            name: name.into(),
            description: None,
            category: category.into(),
        };
        vec![
            var("user", "User name", "General"),
            var("level", "New level", "Leveling"),
            var("level_old", "Previous level", "Leveling"),
            var("server", "Server name", "General"),
        ]
    }

    #[test]
    fn empty_search_matches_everything() {
        let roles = vec![
            Role {
                id: "1".into(),
                name: "Mods".into(),
            },
            Role {
                id: "2".into(),
                name: "Admins".into(),
            },
        ];
        assert_eq!(filter_roles(&roles, "").len(), 2);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let roles = vec![Role {
            id: "1".into(),
            name: "Moderators".into(),
        }];
        assert_eq!(filter_roles(&roles, "ERat").len(), 1);
        assert!(filter_roles(&roles, "admin").is_empty());
    }

    #[test]
    fn role_candidate_carries_canonical_raw_value() {
        let roles = vec![Role {
            id: "42".into(),
            name: "Mods".into(),
        }];
        let got = filter_roles(&roles, "mods");
        assert_eq!(got[0].raw_value, "<@42>");
        assert_eq!(got[0].label, "@Mods");
    }

    #[test]
    fn variables_group_by_category_in_first_seen_order() {
        let groups = filter_variables(&variables(), "");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].category, "General");
        assert_eq!(groups[1].category, "Leveling");
        assert_eq!(groups[0].items.len(), 2);
        assert_eq!(groups[1].items.len(), 2);
    }

    #[test]
    fn variables_match_on_key_or_name() {
        let groups = filter_variables(&variables(), "level_");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].items.len(), 1);
        assert_eq!(groups[0].items[0].raw_value, "{level_old}");

        let by_name = filter_variables(&variables(), "previous");
        assert_eq!(by_name[0].items[0].raw_value, "{level_old}");
    }

    #[test]
    fn flat_candidates_flatten_variable_groups() {
        let roster = Roster {
            variables: variables(),
            ..Roster::default()
        };
        let flat = candidates(&roster, MentionKind::Variable, "level");
        assert_eq!(flat.len(), 2);
    }
}
