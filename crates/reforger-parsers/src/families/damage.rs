use reforger_types::{DamageEvent, DomainEvent, EventKind};

use crate::classifier::PatternClassifier;
use crate::pattern::TaggedLine;

pub const TAG: &str = "DAMAGE";

pub fn classifier() -> PatternClassifier {
    PatternClassifier::new(EventKind::Damage).pattern(TAG, |line| DomainEvent::Damage(parse(line)))
}

pub fn parse(line: &TaggedLine<'_>) -> DamageEvent {
    let f = &line.fields;
    DamageEvent {
        timestamp: line.timestamp.to_string(),
        damage_type: f.string("damageType"),
        damage_amount: f.float("damageAmount"),
        hit_zone_name: f.string("hitZoneName"),
        weapon_name: f.string("weaponName"),
        distance: f.float("distance"),
        is_friendly_fire: f.flag("isFriendlyFire"),
        killer_id: f.int("killerId"),
        killer_name: f.string("killerName"),
        killer_bi_id: f.string("killerBiId"),
        killer_faction: f.string("killerFaction"),
        victim_id: f.int("victimId"),
        victim_name: f.string("victimName"),
        victim_bi_id: f.string("victimBiId"),
        victim_faction: f.string("victimFaction"),
    }
}
