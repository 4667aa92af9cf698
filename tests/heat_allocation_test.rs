// ==========================================
// 分组生成引擎集成测试
// ==========================================
// 场景: 接力分组规模、个人项目学校均衡、Open 组、
//       重复生成结构一致、项目间互不影响
// ==========================================

mod helpers;

use helpers::RosterBuilder;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashSet};
use track_meet_heats::config::HeatConfig;
use track_meet_heats::domain::{AgeCategory, Gender, Heat, HeatKind, MeetRoster};
use track_meet_heats::engine::{
    BalanceEntry, HeatAllocationEngine, IdentityShuffle, RandomShuffle, SchoolBalancer,
};

// ==========================================
// 测试辅助函数
// ==========================================

fn seeded_engine(seed: u64) -> HeatAllocationEngine {
    HeatAllocationEngine::new(&HeatConfig::default(), Box::new(RandomShuffle::seeded(seed)))
}

fn relay_roster(schools: usize) -> MeetRoster {
    RosterBuilder::new()
        .schools(schools)
        .event("R1", "4x100m Relay", Gender::Male, AgeCategory::U15)
        .build()
}

fn individual_roster(per_school: &[usize]) -> MeetRoster {
    RosterBuilder::new()
        .schools(per_school.len())
        .event("E1", "100m", Gender::Female, AgeCategory::U13)
        .entries("100m", Gender::Female, AgeCategory::U13, per_school)
        .build()
}

fn lane_numbers(heat: &Heat) -> Vec<u32> {
    heat.lanes.iter().map(|l| l.lane).collect()
}

/// 每组的 (道次数, 占用者集合)
fn structure(heats: &[Heat]) -> Vec<(usize, BTreeSet<String>)> {
    heats
        .iter()
        .map(|h| {
            (
                h.lanes.len(),
                h.lanes.iter().map(|l| l.occupant_id().to_string()).collect(),
            )
        })
        .collect()
}

// ==========================================
// 接力分组
// ==========================================

#[test]
fn test_thirteen_schools_split_five_four_four() {
    let mut engine = seeded_engine(7);
    let heats = engine.generate_heats("R1", &relay_roster(13), Vec::new());

    assert_eq!(heats.len(), 3);
    let sizes: Vec<usize> = heats.iter().map(|h| h.lanes.len()).collect();
    assert_eq!(sizes, vec![5, 4, 4]);

    for heat in &heats {
        assert_eq!(heat.kind, HeatKind::Relay);
        let expected: Vec<u32> = (1..=heat.lanes.len() as u32).collect();
        assert_eq!(lane_numbers(heat), expected);
    }
}

#[test]
fn test_relay_without_schools_keeps_collection() {
    let mut engine = seeded_engine(1);
    let existing = engine.generate_heats("R1", &relay_roster(3), Vec::new());

    let mut no_schools = relay_roster(0);
    no_schools.events = relay_roster(3).events;
    let after = engine.generate_heats("R1", &no_schools, existing.clone());

    assert_eq!(after, existing);
}

// ==========================================
// 个人项目
// ==========================================

#[test]
fn test_four_entries_two_schools_single_heat() {
    let entries = vec![
        BalanceEntry::new("a1", "s1"),
        BalanceEntry::new("a2", "s1"),
        BalanceEntry::new("a3", "s2"),
        BalanceEntry::new("a4", "s2"),
    ];

    for seed in 0..20 {
        let mut shuffle = RandomShuffle::seeded(seed);
        let result = SchoolBalancer::new().balance(&entries, 8, 1, &mut shuffle);

        assert!(result.dropped.is_empty());
        assert_eq!(result.heats.len(), 1);
        let heat = &result.heats[0];
        assert_eq!(heat.iter().map(|l| l.lane).collect::<Vec<_>>(), vec![1, 2, 3, 4]);

        let ids: HashSet<&str> = heat.iter().map(|l| l.entry_id.as_str()).collect();
        assert_eq!(ids.len(), 4);

        // 轮转阶段先放入两所不同学校
        assert_ne!(heat[0].school_id, heat[1].school_id);
    }
}

#[test]
fn test_nineteen_athletes_uneven_schools_all_placed() {
    let roster = individual_roster(&[7, 5, 4, 2, 1]);
    let mut engine = seeded_engine(99);
    let heats = engine.generate_heats("E1", &roster, Vec::new());

    assert_eq!(heats.len(), 3);
    let placed: usize = heats.iter().map(|h| h.lanes.len()).sum();
    assert_eq!(placed, 19);
    for heat in &heats {
        assert!(heat.lanes.len() <= 8);
        assert!(heat.lanes.iter().all(|l| (1..=8).contains(&l.lane)));
    }
}

#[test]
fn test_eligibility_filters_gender_and_age() {
    let roster = RosterBuilder::new()
        .schools(2)
        .event("E1", "100m", Gender::Female, AgeCategory::U13)
        .entries("100m", Gender::Female, AgeCategory::U13, &[1, 1])
        .entries("100m", Gender::Male, AgeCategory::U13, &[3])
        .entries("100m", Gender::Female, AgeCategory::U15, &[0, 2])
        .entries("200m", Gender::Female, AgeCategory::U13, &[2])
        .build();

    let mut engine = HeatAllocationEngine::new(&HeatConfig::default(), Box::new(IdentityShuffle));
    let heats = engine.generate_heats("E1", &roster, Vec::new());

    assert_eq!(heats.len(), 1);
    assert_eq!(heats[0].lanes.len(), 2);
}

#[test]
fn test_open_event_single_heat_in_roster_order() {
    let roster = RosterBuilder::new()
        .schools(3)
        .event("O1", "800m", Gender::Male, AgeCategory::Open)
        .entries("800m", Gender::Male, AgeCategory::Open, &[4, 4, 4])
        .build();

    let mut engine = seeded_engine(3);
    let heats = engine.generate_heats("O1", &roster, Vec::new());

    assert_eq!(heats.len(), 1);
    let heat = &heats[0];
    assert_eq!(heat.lanes.len(), 12);
    assert_eq!(lane_numbers(heat), (1..=12).collect::<Vec<u32>>());
    assert!(heat.lanes.iter().all(|l| l.position.is_none()));

    let expected: Vec<&str> = roster.athletes.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(heat.occupant_ids(), expected);
}

// ==========================================
// 重复生成与项目隔离
// ==========================================

#[test]
fn test_fixed_seed_regeneration_has_same_structure() {
    let roster = individual_roster(&[5, 5, 3, 3, 2]);

    let first = seeded_engine(2024).generate_heats("E1", &roster, Vec::new());
    let second = seeded_engine(2024).generate_heats("E1", &roster, first.clone());

    assert_eq!(structure(&first), structure(&second));
    assert!(second.iter().all(|h| h.event_id == "E1"));
    assert_eq!(second.len(), first.len());
}

#[test]
fn test_regenerating_one_event_leaves_others_untouched() {
    let roster = RosterBuilder::new()
        .schools(8)
        .event("E1", "100m", Gender::Female, AgeCategory::U13)
        .event("R1", "4x100m Relay", Gender::Female, AgeCategory::U13)
        .entries("100m", Gender::Female, AgeCategory::U13, &[3, 3, 2, 2, 1, 1, 1, 1])
        .build();

    let mut engine = seeded_engine(11);
    let heats = engine.generate_heats("E1", &roster, Vec::new());
    let heats = engine.generate_heats("R1", &roster, heats);
    let relay_before: Vec<Heat> = heats.iter().filter(|h| h.event_id == "R1").cloned().collect();

    let heats = engine.generate_heats("E1", &roster, heats);
    let relay_after: Vec<Heat> = heats.iter().filter(|h| h.event_id == "R1").cloned().collect();

    assert_eq!(relay_before, relay_after);
    assert_eq!(heats.iter().filter(|h| h.event_id == "E1").count(), 2);
}

#[test]
fn test_unknown_event_is_noop() {
    let roster = individual_roster(&[2, 2]);
    let mut engine = seeded_engine(5);
    let heats = engine.generate_heats("E1", &roster, Vec::new());

    let after = engine.generate_heats("missing", &roster, heats.clone());
    assert_eq!(after, heats);
}

// ==========================================
// 性质测试
// ==========================================

proptest! {
    #[test]
    fn prop_relay_heat_sizes(n in 1usize..60, seed in any::<u64>()) {
        let heats = seeded_engine(seed).generate_heats("R1", &relay_roster(n), Vec::new());

        let num_heats = n.div_ceil(6);
        prop_assert_eq!(heats.len(), num_heats);

        let base = n / num_heats;
        let mut seen = HashSet::new();
        for heat in &heats {
            prop_assert!(heat.lanes.len() == base || heat.lanes.len() == base + 1);
            let expected: Vec<u32> = (1..=heat.lanes.len() as u32).collect();
            prop_assert_eq!(lane_numbers(heat), expected);
            for lane in &heat.lanes {
                prop_assert!(seen.insert(lane.occupant_id().to_string()));
            }
        }
        prop_assert_eq!(seen.len(), n);
    }

    #[test]
    fn prop_individual_places_everyone_once(
        per_school in prop::collection::vec(0usize..7, 1..8),
        seed in any::<u64>(),
    ) {
        let roster = individual_roster(&per_school);
        let total: usize = per_school.iter().sum();
        let heats = seeded_engine(seed).generate_heats("E1", &roster, Vec::new());

        prop_assert_eq!(heats.len(), total.div_ceil(8));

        let mut seen = HashSet::new();
        for (heat, number) in heats.iter().zip(1u32..) {
            prop_assert_eq!(heat.heat_number, number);
            let lanes: HashSet<u32> = heat.lanes.iter().map(|l| l.lane).collect();
            prop_assert_eq!(lanes.len(), heat.lanes.len());
            prop_assert!(heat.lanes.iter().all(|l| (1..=8).contains(&l.lane)));
            for lane in &heat.lanes {
                prop_assert!(seen.insert(lane.occupant_id().to_string()));
            }
        }
        prop_assert_eq!(seen.len(), total);
    }
}
