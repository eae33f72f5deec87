use crate::model::Pokemon;
use phf::phf_map;
use serde::Serialize;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Nature {
    Hardy,
    Lonely,
    Brave,
    Adamant,
    Naughty,
    Bold,
    Docile,
    Relaxed,
    Impish,
    Lax,
    Timid,
    Hasty,
    Serious,
    Jolly,
    Naive,
    Modest,
    Mild,
    Quiet,
    Bashful,
    Rash,
    Calm,
    Gentle,
    Sassy,
    Careful,
    Quirky,
}

static NATURES: phf::Map<&'static str, Nature> = phf_map! {
    "hardy" => Nature::Hardy,
    "lonely" => Nature::Lonely,
    "brave" => Nature::Brave,
    "adamant" => Nature::Adamant,
    "naughty" => Nature::Naughty,
    "bold" => Nature::Bold,
    "docile" => Nature::Docile,
    "relaxed" => Nature::Relaxed,
    "impish" => Nature::Impish,
    "lax" => Nature::Lax,
    "timid" => Nature::Timid,
    "hasty" => Nature::Hasty,
    "serious" => Nature::Serious,
    "jolly" => Nature::Jolly,
    "naive" => Nature::Naive,
    "modest" => Nature::Modest,
    "mild" => Nature::Mild,
    "quiet" => Nature::Quiet,
    "bashful" => Nature::Bashful,
    "rash" => Nature::Rash,
    "calm" => Nature::Calm,
    "gentle" => Nature::Gentle,
    "sassy" => Nature::Sassy,
    "careful" => Nature::Careful,
    "quirky" => Nature::Quirky,
};

impl Nature {
    /// Unknown or missing natures are neutral.
    pub fn from_name(name: Option<&str>) -> Nature {
        name.and_then(|n| NATURES.get(n.trim().to_ascii_lowercase().as_str()).copied())
            .unwrap_or(Nature::Hardy)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum Stat {
    Hp,
    Atk,
    Def,
    Spa,
    Spd,
    Spe,
}

pub fn stat_modifier(nature: Nature, stat: Stat) -> f64 {
    match nature {
        Nature::Hardy | Nature::Docile | Nature::Serious | Nature::Bashful | Nature::Quirky => 1.0,
        Nature::Lonely => bonus(stat, Stat::Atk, Stat::Def),
        Nature::Brave => bonus(stat, Stat::Atk, Stat::Spe),
        Nature::Adamant => bonus(stat, Stat::Atk, Stat::Spa),
        Nature::Naughty => bonus(stat, Stat::Atk, Stat::Spd),
        Nature::Bold => bonus(stat, Stat::Def, Stat::Atk),
        Nature::Relaxed => bonus(stat, Stat::Def, Stat::Spe),
        Nature::Impish => bonus(stat, Stat::Def, Stat::Spa),
        Nature::Lax => bonus(stat, Stat::Def, Stat::Spd),
        Nature::Timid => bonus(stat, Stat::Spe, Stat::Atk),
        Nature::Hasty => bonus(stat, Stat::Spe, Stat::Def),
        Nature::Jolly => bonus(stat, Stat::Spe, Stat::Spa),
        Nature::Naive => bonus(stat, Stat::Spe, Stat::Spd),
        Nature::Modest => bonus(stat, Stat::Spa, Stat::Atk),
        Nature::Mild => bonus(stat, Stat::Spa, Stat::Def),
        Nature::Quiet => bonus(stat, Stat::Spa, Stat::Spe),
        Nature::Rash => bonus(stat, Stat::Spa, Stat::Spd),
        Nature::Calm => bonus(stat, Stat::Spd, Stat::Atk),
        Nature::Gentle => bonus(stat, Stat::Spd, Stat::Def),
        Nature::Sassy => bonus(stat, Stat::Spd, Stat::Spe),
        Nature::Careful => bonus(stat, Stat::Spd, Stat::Spa),
    }
}

fn bonus(stat: Stat, boosted: Stat, lowered: Stat) -> f64 {
    if stat == boosted {
        1.1
    } else if stat == lowered {
        0.9
    } else {
        1.0
    }
}

fn core_value(base: u32, iv: u32, ev: u32, level: u32) -> u32 {
    ((base * 2 + iv + ev / 4) * level) / 100
}

pub fn calc_hp(base: u32, iv: u32, ev: u32, level: u32) -> u32 {
    core_value(base, iv, ev, level) + level + 10
}

pub fn calc_stat(base: u32, iv: u32, ev: u32, level: u32, nature_mod: f64) -> u32 {
    let stat = (core_value(base, iv, ev, level) + 5) as f64 * nature_mod;
    stat.floor() as u32
}

/// Battle-ready stats, fixed once a battle state is built.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct StatsSet {
    pub hp: u32,
    pub atk: u32,
    pub def: u32,
    pub spa: u32,
    pub spd: u32,
    pub spe: u32,
}

pub fn calculate_all_stats(pokemon: &Pokemon) -> StatsSet {
    let nature = Nature::from_name(pokemon.nature.as_deref());
    let level = pokemon.level;
    let base = pokemon.base_stats;
    let ivs = pokemon.ivs;
    let evs = pokemon.evs;
    StatsSet {
        hp: calc_hp(base.hp, ivs.hp, evs.hp, level),
        atk: calc_stat(base.atk, ivs.atk, evs.atk, level, stat_modifier(nature, Stat::Atk)),
        def: calc_stat(base.def, ivs.def, evs.def, level, stat_modifier(nature, Stat::Def)),
        spa: calc_stat(base.spa, ivs.spa, evs.spa, level, stat_modifier(nature, Stat::Spa)),
        spd: calc_stat(base.spd, ivs.spd, evs.spd, level, stat_modifier(nature, Stat::Spd)),
        spe: calc_stat(base.spe, ivs.spe, evs.spe, level, stat_modifier(nature, Stat::Spe)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Stats;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn mon(base: Stats, level: u32, evs: Stats, ivs: Stats, nature: &str) -> Pokemon {
        Pokemon {
            name: "test".to_string(),
            species: None,
            level,
            types: vec!["normal".to_string()],
            base_stats: base,
            ivs,
            evs,
            nature: Some(nature.to_string()),
            ability: None,
            moves: Vec::new(),
        }
    }

    #[test]
    fn test_charizard_lv50_adamant() {
        let base = Stats { hp: 78, atk: 84, def: 78, spa: 109, spd: 85, spe: 100 };
        let evs = Stats { hp: 0, atk: 252, def: 0, spa: 0, spd: 4, spe: 252 };
        let set = calculate_all_stats(&mon(base, 50, evs, Stats::max_ivs(), "Adamant"));
        assert_eq!(set.hp, 153);
        assert_eq!(set.atk, 149);
        assert_eq!(set.def, 98);
        assert_eq!(set.spa, 116);
        assert_eq!(set.spd, 106);
        assert_eq!(set.spe, 152);
    }

    #[test]
    fn test_dragonite_lv50_neutral() {
        let base = Stats { hp: 91, atk: 134, def: 95, spa: 100, spd: 100, spe: 80 };
        let set = calculate_all_stats(&mon(base, 50, Stats::default(), Stats::default(), "hardy"));
        assert_eq!(set.hp, 151);
        assert_eq!(set.atk, 139);
        assert_eq!(set.def, 100);
        assert_eq!(set.spa, 105);
        assert_eq!(set.spd, 105);
        assert_eq!(set.spe, 85);
    }

    #[test]
    fn test_nature_modifiers() {
        assert!((stat_modifier(Nature::Adamant, Stat::Atk) - 1.1).abs() < f64::EPSILON);
        assert!((stat_modifier(Nature::Adamant, Stat::Spa) - 0.9).abs() < f64::EPSILON);
        assert_eq!(stat_modifier(Nature::Adamant, Stat::Def), 1.0);
        assert_eq!(Nature::from_name(Some("TIMID")), Nature::Timid);
        assert_eq!(Nature::from_name(Some("sleepy")), Nature::Hardy);
        assert_eq!(Nature::from_name(None), Nature::Hardy);
    }

    #[test]
    fn formulas_are_monotonic() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..2000 {
            let base = rng.gen_range(1..=255);
            let iv = rng.gen_range(0..31);
            let ev = rng.gen_range(0..252);
            let level = rng.gen_range(1..100);
            assert!(calc_hp(base, iv + 1, ev, level) >= calc_hp(base, iv, ev, level));
            assert!(calc_hp(base, iv, ev + 1, level) >= calc_hp(base, iv, ev, level));
            assert!(calc_hp(base, iv, ev, level + 1) >= calc_hp(base, iv, ev, level));
            assert!(calc_stat(base, iv + 1, ev, level, 1.0) >= calc_stat(base, iv, ev, level, 1.0));
            assert!(calc_stat(base, iv, ev + 1, level, 1.0) >= calc_stat(base, iv, ev, level, 1.0));
            assert!(calc_stat(base, iv, ev, level + 1, 1.0) >= calc_stat(base, iv, ev, level, 1.0));
        }
    }

    #[test]
    fn boosting_nature_beats_neutral_beats_hindering() {
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..2000 {
            let base = rng.gen_range(1..=255);
            let iv = rng.gen_range(0..=31);
            let ev = rng.gen_range(0..=252);
            let level = rng.gen_range(1..=100);
            let up = calc_stat(base, iv, ev, level, 1.1);
            let flat = calc_stat(base, iv, ev, level, 1.0);
            let down = calc_stat(base, iv, ev, level, 0.9);
            assert!(up >= flat && flat >= down, "base {base} iv {iv} ev {ev} lv {level}");
        }
    }
}
