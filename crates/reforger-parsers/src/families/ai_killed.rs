use reforger_types::{AiKilledEvent, DomainEvent, EventKind};

use crate::classifier::PatternClassifier;
use crate::pattern::TaggedLine;

pub const TAG: &str = "AI_KILLED";

pub fn classifier() -> PatternClassifier {
    PatternClassifier::new(EventKind::AiKilled).pattern(TAG, |line| DomainEvent::AiKilled(parse(line)))
}

pub fn parse(line: &TaggedLine<'_>) -> AiKilledEvent {
    let f = &line.fields;
    AiKilledEvent {
        timestamp: line.timestamp.to_string(),
        killer_id: f.int("killerId"),
        killer_name: f.string("killerName"),
        killer_bi_id: f.string("killerBiId"),
        killer_faction: f.string("killerFaction"),
        victim_type: f.string("victimType"),
        weapon_name: f.string("weaponName"),
        weapon_type: f.string("weaponType"),
        weapon_source: f.string("weaponSource"),
        grenade_type: f.string("grenadeType"),
        attachments: f.string("attachments"),
        sight_name: f.string("sightName"),
        is_team_kill: f.flag("isTeamKill"),
        kill_distance: f.float("killDistance"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_kill_line() {
        let line = "[2025-05-27 06:01:10] AI_KILLED = grenadeType = none, weaponSource = Hand, weaponType = Rifle, sightName = PSO-1, killerBiId = 839714fe, killerFaction = #AR-Faction_USSR, victimType = US_Rifleman, killerName = Cerberus, weaponName = SVD, isTeamKill = false, killerId = 295, killDistance = 212.5";
        let Some(DomainEvent::AiKilled(event)) = classifier().process_line(line) else {
            panic!("ai kill line did not classify");
        };
        assert_eq!(event.killer_id, Some(295));
        assert_eq!(event.victim_type.as_deref(), Some("US_Rifleman"));
        assert_eq!(event.weapon_type.as_deref(), Some("Rifle"));
        assert_eq!(event.sight_name.as_deref(), Some("PSO-1"));
        assert_eq!(event.attachments, None);
        assert!(!event.is_team_kill);
        assert_eq!(event.kill_distance, Some(212.5));
    }

    #[test]
    fn test_player_kill_tag_is_not_ai_kill() {
        assert!(classifier().process_line("[t] PLAYER_KILLED = killerId=1").is_none());
    }
}
