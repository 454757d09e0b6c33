use std::collections::BTreeMap;

/// Index of dot-namespaced question groups. `a.b` belongs to group `a`;
/// a name with no dot belongs to no group. Member lists keep insertion
/// order and never hold duplicates, and the reverse name-to-group map
/// always agrees with them.
#[derive(Debug, Clone, Default)]
pub struct GroupIndex {
    groups: BTreeMap<String, Vec<String>>,
    membership: BTreeMap<String, String>,
}

impl GroupIndex {
    /// Records `name` under its group prefix. Ungrouped names are a no-op.
    pub fn add(&mut self, name: &str) {
        let Some((group, item)) = name.split_once('.') else {
            return;
        };
        if item.is_empty() {
            return;
        }
        let members = self.groups.entry(group.to_string()).or_default();
        if !members.iter().any(|member| member == name) {
            members.push(name.to_string());
        }
        self.membership.insert(name.to_string(), group.to_string());
    }

    /// Members of the group named exactly `group`.
    pub fn get(&self, group: &str) -> Option<&[String]> {
        self.groups.get(group).map(Vec::as_slice)
    }

    /// Members of the group addressed by `key`, resolving through the
    /// prefix before the first dot so a full member name and a bare group
    /// name land on the same group.
    pub fn members_for(&self, key: &str) -> Option<&[String]> {
        self.get(key.split('.').next().unwrap_or(key))
    }

    /// The group `name` belongs to, if any.
    pub fn group_of(&self, name: &str) -> Option<&str> {
        self.membership.get(name).map(String::as_str)
    }

    /// Drops `name` from its group. A group whose member list empties is
    /// removed entirely.
    pub fn remove(&mut self, name: &str) {
        let Some(group) = self.membership.remove(name) else {
            return;
        };
        if let Some(members) = self.groups.get_mut(&group) {
            members.retain(|member| member != name);
            if members.is_empty() {
                self.groups.remove(&group);
            }
        }
    }

    pub fn contains(&self, group: &str) -> bool {
        self.groups.contains_key(group)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|(group, members)| (group.as_str(), members.as_slice()))
    }
}
