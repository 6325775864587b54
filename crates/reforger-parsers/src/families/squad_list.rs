//! Squad roster snapshots.
//!
//! The document is produced by a server mod and its fields are not always
//! typed consistently, so every value is extracted leniently: ids may
//! arrive as numbers or numeric strings, flags as booleans or `"true"`.

use serde_json::Value;

use reforger_types::{
    DomainEvent, EventKind, GroupLeader, GroupSummary, RawLine, SquadListEvent, SquadPlayer,
    platform_display_name,
};

use crate::classifier::EventClassifier;
use crate::json::{flag, int, number, string};

#[derive(Debug, Clone, Copy, Default)]
pub struct SquadListClassifier;

impl SquadListClassifier {
    /// Flatten a roster document into one entry per member.
    ///
    /// Returns `None` when the document has no `groups` array.
    pub fn process_data(&self, doc: &Value) -> Option<SquadListEvent> {
        let groups = doc.get("groups")?.as_array()?;

        let timestamp = doc
            .get("lastUpdated")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map_or_else(|| chrono::Utc::now().to_rfc3339(), str::to_string);

        let mut players = Vec::new();
        let mut group_summary = Vec::with_capacity(groups.len());

        for group in groups {
            let summary = summarize(group);
            let members = group.get("members").and_then(Value::as_array);
            for member in members.into_iter().flatten() {
                players.push(player(member, &summary));
            }
            group_summary.push(summary);
        }

        Some(SquadListEvent {
            timestamp,
            summary: doc.get("summary").filter(|v| !v.is_null()).cloned(),
            players,
            group_summary,
        })
    }
}

impl EventClassifier for SquadListClassifier {
    fn kind(&self) -> EventKind {
        EventKind::SquadList
    }

    fn test(&self, item: &RawLine) -> bool {
        item.as_json()
            .and_then(|doc| doc.get("groups"))
            .is_some_and(Value::is_array)
    }

    fn classify(&self, item: &RawLine) -> Option<DomainEvent> {
        self.process_data(item.as_json()?).map(DomainEvent::SquadList)
    }
}

fn summarize(group: &Value) -> GroupSummary {
    let leader = group.get("leader").filter(|l| l.is_object()).map(|l| GroupLeader {
        id: int(l.get("id")),
        name: string(l.get("name")),
    });

    GroupSummary {
        group_id: int(group.get("groupId")),
        group_index: int(group.get("groupIndex")),
        name: string(group.get("name")),
        faction: string(group.get("faction")),
        radio_frequency: number(group.get("radioFrequency")),
        is_private: flag(group.get("isPrivate")),
        member_count: int(group.get("memberCount")),
        max_members: int(group.get("maxMembers")),
        leader,
    }
}

fn player(member: &Value, group: &GroupSummary) -> SquadPlayer {
    let platform = string(member.get("platform"));
    let platform_type = platform.as_deref().map(|p| platform_display_name(p).to_string());

    SquadPlayer {
        id: int(member.get("id")),
        name: string(member.get("name")),
        player_bi_id: string(member.get("playerBiId")),
        platform,
        platform_type,
        rank: string(member.get("rank")),
        is_leader: flag(member.get("isLeader")),
        group_id: group.group_id,
        group_index: group.group_index,
        group_name: group.name.clone(),
        faction: group.faction.clone(),
        radio_frequency: group.radio_frequency.clone(),
        is_private_group: group.is_private,
        group_member_count: group.member_count,
        group_max_members: group.max_members,
        leader_id: group.leader.as_ref().and_then(|l| l.id),
        leader_name: group.leader.as_ref().and_then(|l| l.name.clone()),
    }
}
