use reforger_types::{
    DomainEvent, EventKind, KillDetails, KillType, Killer, PlayerKilledEvent, faction_display_name,
};

use crate::classifier::PatternClassifier;
use crate::fields::Fields;
use crate::pattern::TaggedLine;

pub const TAG: &str = "PLAYER_KILLED";

pub fn classifier() -> PatternClassifier {
    PatternClassifier::new(EventKind::PlayerKilled)
        .pattern(TAG, |line| DomainEvent::PlayerKilled(parse(line)))
}

fn side(f: &Fields<'_>, prefix: &str) -> Killer {
    let key = |suffix: &str| format!("{}{}", prefix, suffix);
    let faction = f.get(&key("Faction"));
    Killer {
        id: f.int(&key("Id")),
        name: f.string(&key("Name")),
        bi_id: f.string(&key("BiId")),
        faction: faction.map(str::to_string),
        faction_type: faction.map(|k| faction_display_name(k).to_string()),
        control: None,
        control_type: None,
        disguise: None,
    }
}

pub fn parse(line: &TaggedLine<'_>) -> PlayerKilledEvent {
    let f = &line.fields;
    let killer = side(f, "killer");
    let victim = side(f, "victim");
    let friendly_fire = f.flag("isFriendlyFire");
    let team_kill = f.flag("isTeamKill");
    let kill_type = KillType::classify(
        killer.id,
        killer.name.as_deref(),
        killer.bi_id.as_deref(),
        friendly_fire,
        team_kill,
    );

    PlayerKilledEvent {
        timestamp: line.timestamp.to_string(),
        killer,
        victim,
        kill: KillDetails {
            weapon: f.string("weaponName"),
            distance: f.float("killDistance"),
            friendly_fire,
            team_kill,
            kill_type,
            weapon_source: None,
            weapon_source_type: None,
            instigator_type: None,
        },
    }
}
