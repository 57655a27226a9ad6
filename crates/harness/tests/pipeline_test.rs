use combat_content::{Catalog, ComponentSpec, EntitySpec};
use combat_core::{
    BoardDimensions, BoardOracle, ComponentBehavior, ComponentDefinition, ComponentInstance,
    ComponentTag, ComponentValue, DataValue, EntityKind, HookConfig, HookContext, HookError,
    HookResult, ItemInfo, ItemUid, PendingAction, Phase, PhaseSet, PlaybackEvent, Position,
    Strike, Team, UnitId, UnitOracle,
};
use combat_harness::{
    ArithmeticEvaluator, CombatScript, CommitError, Content, Pipeline, ScriptedStrike, Side,
    UnitRecord, World,
};

// ============================================================================
// Fixtures
// ============================================================================

fn spec(nid: &str, negative: bool, components: &[(&str, Option<&str>)]) -> EntitySpec {
    EntitySpec {
        nid: nid.to_owned(),
        negative,
        components: components
            .iter()
            .map(|(id, value)| ComponentSpec {
                id: (*id).to_owned(),
                value: value.map(|text| ComponentValue::Text(text.to_owned())),
            })
            .collect(),
    }
}

fn skills() -> Vec<EntitySpec> {
    let mut miracle = spec("Miracle", false, &[("true_miracle_event", Some("Miracle_Saved"))]);
    miracle.components.insert(
        0,
        ComponentSpec {
            id: "build_charge_start_charged".into(),
            value: Some(ComponentValue::Int(1)),
        },
    );
    let mut crit = spec("Critical_Eye", false, &[]);
    crit.components.push(ComponentSpec {
        id: "crit_flash".into(),
        value: Some(ComponentValue::Int(20)),
    });
    let mut wide = spec("Wide_Casting", false, &[]);
    wide.components.push(ComponentSpec {
        id: "empower_splash".into(),
        value: Some(ComponentValue::Int(1)),
    });
    let mut lucky = spec("Lucky_Growth", false, &[]);
    lucky.components.push(ComponentSpec {
        id: "expression_growth_change".into(),
        value: Some(ComponentValue::Pairs(vec![
            ("LCK".into(), "unit.LCK / 2".into()),
            ("SPD".into(), "5".into()),
        ])),
    });

    vec![
        miracle,
        crit,
        wide,
        lucky,
        spec("Venom_Edge", false, &[("give_status_after_strike", Some("Poisoned"))]),
        spec("Poisoned", true, &[("mid_battle_recoil", Some("2"))]),
        spec("Purity", false, &[("immune_new_status", None)]),
        spec("Vengeance_Call", false, &[("event_after_combat_when_hit", Some("Vengeance"))]),
        spec("Deathblow_Recoil", false, &[("recoil_after_combat", Some("5"))]),
        spec("Watchful", false, &[("event_on_upkeep", Some("Morning_Watch"))]),
        spec("Broken", false, &[("give_status_after_strike", None)]),
        spec("Journal", false, &[("scribe", None)]),
        spec(
            "Lance_Master",
            false,
            &[("must_use_reach", None), ("condition", Some("unit.HP - 5"))],
        ),
    ]
}

fn items() -> Vec<EntitySpec> {
    vec![
        spec(
            "Hand_Axe",
            false,
            &[
                ("post_combat_splash_aoe", Some("1")),
                ("post_combat_splash_damage", Some("3")),
            ],
        ),
        spec("Physic", false, &[("ally_blast_aoe_except_unit", Some("1"))]),
        spec("Levin_Sword", false, &[("kinda_magic", None)]),
    ]
}

fn world(units: &[(u32, Team, (i32, i32), u32)]) -> World {
    let mut world = World::new(BoardDimensions::new(10, 10));
    for &(id, team, (x, y), hp) in units {
        world.add_unit(
            UnitRecord::new(UnitId(id), format!("unit{id}"), team, hp, Position::new(x, y))
                .with_max_hp(20),
        );
    }
    world
}

fn content(config: HookConfig) -> Content {
    Content::new(
        Catalog::new(EntityKind::Skill, skills()),
        Catalog::new(EntityKind::Item, items()),
        config,
    )
    .unwrap()
}

fn pipeline_with(world: World, config: HookConfig) -> Pipeline {
    Pipeline::new(content(config), world, ArithmeticEvaluator::new())
}

fn pipeline(world: World) -> Pipeline {
    pipeline_with(world, HookConfig::default())
}

fn duel() -> World {
    world(&[
        (1, Team::Player, (4, 4), 20),
        (2, Team::Enemy, (4, 5), 18),
    ])
}

fn strike(by: Side, outcome: Strike, damage: u32) -> ScriptedStrike {
    ScriptedStrike { by, outcome, damage }
}

fn combat(attacker: u32, defender: u32, exchanges: Vec<Vec<ScriptedStrike>>) -> CombatScript {
    CombatScript {
        attacker: UnitId(attacker),
        defender: UnitId(defender),
        attacker_item: None,
        defender_item: None,
        exchanges,
    }
}

fn charge(pipeline: &Pipeline, unit: u32, skill: &str) -> Option<i64> {
    pipeline
        .loadout(UnitId(unit))?
        .skill(skill)?
        .component("build_charge_start_charged")?
        .state()
        .int("charge")
}

fn event_names(pipeline: &Pipeline) -> Vec<String> {
    pipeline.triggers().into_iter().map(|t| t.event).collect()
}

// ============================================================================
// Combat flow
// ============================================================================

#[test]
fn miracle_holds_once_then_the_charge_is_spent() {
    let mut pipeline = pipeline(duel());
    pipeline.grant_skill(UnitId(1), "Miracle").unwrap();

    let summary = pipeline
        .resolve_combat(&combat(
            2,
            1,
            vec![
                vec![strike(Side::Attacker, Strike::Hit, 25)],
                vec![strike(Side::Attacker, Strike::Hit, 5)],
            ],
        ))
        .unwrap();

    assert_eq!(summary.strikes, 2);
    assert_eq!(summary.defender_hp, 0);
    assert_eq!(summary.deaths, vec![UnitId(1)]);
    assert!(!pipeline.world().is_alive(UnitId(1)));
    assert_eq!(charge(&pipeline, 1, "Miracle"), Some(0));
    assert_eq!(event_names(&pipeline), ["Miracle_Saved"]);

    let procs = pipeline
        .playback()
        .iter()
        .filter(|event| matches!(event, PlaybackEvent::DefenseHitProc { .. }))
        .count();
    assert_eq!(procs, 1);
    assert!(pipeline.failures().is_empty());
}

#[test]
fn negative_status_is_rejected_by_immunity() {
    let mut pipeline = pipeline(duel());
    pipeline.grant_skill(UnitId(1), "Venom_Edge").unwrap();
    pipeline.grant_skill(UnitId(2), "Purity").unwrap();

    pipeline
        .resolve_combat(&combat(1, 2, vec![vec![strike(Side::Attacker, Strike::Hit, 3)]]))
        .unwrap();

    assert_eq!(pipeline.loadout(UnitId(2)).unwrap().skill_nids(), ["Purity"]);
    assert_eq!(pipeline.world().hp(UnitId(2)), Some(15));
}

#[test]
fn gained_status_recoils_after_each_exchange() {
    let mut pipeline = pipeline(duel());
    pipeline.grant_skill(UnitId(1), "Venom_Edge").unwrap();

    let summary = pipeline
        .resolve_combat(&combat(1, 2, vec![vec![strike(Side::Attacker, Strike::Hit, 3)]]))
        .unwrap();

    assert_eq!(pipeline.loadout(UnitId(2)).unwrap().skill_nids(), ["Poisoned"]);
    // 18 - 3 from the strike, then 2 from the poison at the end of the exchange.
    assert_eq!(summary.defender_hp, 13);
}

#[test]
fn hit_flag_never_leaks_into_the_next_combat() {
    let mut pipeline = pipeline(duel());
    pipeline.grant_skill(UnitId(1), "Vengeance_Call").unwrap();

    pipeline
        .resolve_combat(&combat(2, 1, vec![vec![strike(Side::Attacker, Strike::Hit, 2)]]))
        .unwrap();
    pipeline
        .resolve_combat(&combat(2, 1, vec![vec![strike(Side::Attacker, Strike::Miss, 2)]]))
        .unwrap();

    assert_eq!(event_names(&pipeline), ["Vengeance"]);
    let flag = pipeline
        .loadout(UnitId(1))
        .unwrap()
        .skill("Vengeance_Call")
        .unwrap()
        .components()[0]
        .state()
        .flag("got_hit");
    assert!(!flag);
}

#[test]
fn lethal_recoil_kills_at_zero() {
    let mut pipeline = pipeline(world(&[
        (1, Team::Player, (4, 4), 20),
        (2, Team::Enemy, (4, 5), 3),
    ]));
    pipeline.grant_skill(UnitId(2), "Deathblow_Recoil").unwrap();

    let summary = pipeline
        .resolve_combat(&combat(2, 1, vec![vec![strike(Side::Attacker, Strike::Miss, 4)]]))
        .unwrap();

    assert_eq!(summary.attacker_hp, 0);
    assert_eq!(summary.deaths, vec![UnitId(2)]);
    assert!(!pipeline.world().is_alive(UnitId(2)));
    assert!(pipeline.rejected().is_empty());
}

#[test]
fn splash_hits_enemies_next_to_the_target() {
    let mut pipeline = pipeline(world(&[
        (1, Team::Player, (4, 4), 20),
        (2, Team::Enemy, (4, 5), 18),
        (3, Team::Enemy, (5, 5), 12),
        (4, Team::Player, (3, 5), 20),
    ]));
    pipeline.equip(UnitId(1), ItemUid(10), "Hand_Axe").unwrap();

    let mut script = combat(1, 2, vec![vec![strike(Side::Attacker, Strike::Hit, 4)]]);
    script.attacker_item = Some(ItemUid(10));
    pipeline.resolve_combat(&script).unwrap();

    let world = pipeline.world();
    assert_eq!(world.hp(UnitId(2)), Some(14));
    assert_eq!(world.hp(UnitId(3)), Some(9));
    assert_eq!(world.hp(UnitId(4)), Some(20));
    let hits = pipeline
        .playback()
        .iter()
        .filter(|event| matches!(event, PlaybackEvent::DamageHit { .. }))
        .count();
    assert_eq!(hits, 2);
}

#[test]
fn splash_kills_a_bystander_it_drops_to_zero() {
    let mut pipeline = pipeline(world(&[
        (1, Team::Player, (4, 4), 20),
        (2, Team::Enemy, (4, 5), 18),
        (3, Team::Enemy, (5, 5), 2),
    ]));
    pipeline.equip(UnitId(1), ItemUid(10), "Hand_Axe").unwrap();

    let mut script = combat(1, 2, vec![vec![strike(Side::Attacker, Strike::Hit, 4)]]);
    script.attacker_item = Some(ItemUid(10));
    let first = pipeline.resolve_combat(&script).unwrap();

    assert_eq!(first.deaths, vec![UnitId(3)]);
    assert_eq!(pipeline.deaths(), [UnitId(3)]);
    let world = pipeline.world();
    assert!(!world.is_alive(UnitId(3)));
    assert_eq!(world.hp(UnitId(3)), Some(0));
    assert_eq!(world.unit_at(Position::new(5, 5)), None);

    // The corpse is off the board, so the next splash passes it by.
    let second = pipeline.resolve_combat(&script).unwrap();
    assert!(second.deaths.is_empty());
    let bystander_hits = pipeline
        .playback()
        .iter()
        .filter(|event| {
            matches!(event, PlaybackEvent::DamageHit { defender: UnitId(3), .. })
        })
        .count();
    assert_eq!(bystander_hits, 1);
    assert!(pipeline.rejected().is_empty());
}

#[test]
fn crit_effects_play_before_the_crit_lands() {
    let mut pipeline = pipeline(duel());
    pipeline.grant_skill(UnitId(1), "Critical_Eye").unwrap();

    pipeline
        .resolve_combat(&combat(1, 2, vec![vec![strike(Side::Attacker, Strike::Crit, 5)]]))
        .unwrap();

    let playback = pipeline.playback();
    assert_eq!(playback.len(), 3);
    assert!(matches!(
        playback[0],
        PlaybackEvent::TintEffect { unit: UnitId(1), frames: 20, .. }
    ));
    assert!(matches!(playback[1], PlaybackEvent::SoundCue { .. }));
    assert_eq!(
        playback[2],
        PlaybackEvent::DamageCrit {
            attacker: UnitId(1),
            defender: UnitId(2),
            damage: 5
        }
    );
}

#[test]
fn failing_hook_is_isolated_from_the_combat() {
    let mut pipeline = pipeline(duel());
    pipeline.grant_skill(UnitId(1), "Broken").unwrap();

    let summary = pipeline
        .resolve_combat(&combat(1, 2, vec![vec![strike(Side::Attacker, Strike::Hit, 6)]]))
        .unwrap();

    assert_eq!(summary.defender_hp, 12);
    assert_eq!(pipeline.failures().len(), 1);
    assert_eq!(pipeline.failures()[0].error.error_code(), "HANDLER_INVALID_VALUE");
    assert!(pipeline.loadout(UnitId(2)).is_none());
}

#[test]
fn unknown_participant_is_rejected_up_front() {
    let mut pipeline = pipeline(duel());
    let error = pipeline
        .resolve_combat(&combat(1, 99, vec![vec![strike(Side::Attacker, Strike::Hit, 1)]]))
        .unwrap_err();

    assert_eq!(error, CommitError::UnknownUnit(UnitId(99)));
    assert!(pipeline.playback().is_empty());
}

// ============================================================================
// Skill gain and lifecycle
// ============================================================================

#[test]
fn cascade_depth_bounds_gain_hooks() {
    let mut bounded = pipeline_with(duel(), HookConfig::default().with_max_cascade_depth(0));
    bounded.grant_skill(UnitId(2), "Purity").unwrap();
    bounded.gain_skill(UnitId(2), "Poisoned", None).unwrap();
    assert_eq!(
        bounded.loadout(UnitId(2)).unwrap().skill_nids(),
        ["Purity", "Poisoned"]
    );

    let mut unbounded = pipeline(duel());
    unbounded.grant_skill(UnitId(2), "Purity").unwrap();
    unbounded.gain_skill(UnitId(2), "Poisoned", None).unwrap();
    assert_eq!(unbounded.loadout(UnitId(2)).unwrap().skill_nids(), ["Purity"]);
}

#[test]
fn upkeep_and_chapter_end() {
    let mut pipeline = pipeline(duel());
    pipeline.grant_skill(UnitId(1), "Watchful").unwrap();
    pipeline.grant_skill(UnitId(1), "Miracle").unwrap();

    pipeline.upkeep(UnitId(1));
    let triggers = pipeline.triggers();
    assert_eq!(triggers.len(), 1);
    assert_eq!(triggers[0].event, "Morning_Watch");
    assert_eq!(triggers[0].actor, UnitId(1));

    pipeline
        .resolve_combat(&combat(2, 1, vec![vec![strike(Side::Attacker, Strike::Hit, 30)]]))
        .unwrap();
    assert_eq!(pipeline.world().hp(UnitId(1)), Some(1));
    assert_eq!(charge(&pipeline, 1, "Miracle"), Some(0));

    pipeline.end_chapter();
    assert_eq!(charge(&pipeline, 1, "Miracle"), Some(1));
}

/// Records the skill it arrived with and who granted it.
struct Scribe;

impl ComponentBehavior for Scribe {
    fn phases(&self) -> PhaseSet {
        PhaseSet::ON_GAIN_SKILL
    }

    fn handle(
        &self,
        _: Phase,
        instance: &mut ComponentInstance,
        ctx: &mut HookContext<'_>,
    ) -> HookResult {
        let Some(gained) = ctx.gained_skill() else {
            return Ok(());
        };
        let (nid, source) = (gained.nid.clone(), gained.source);
        ctx.queue(PendingAction::SetObjData {
            target: instance.reference(),
            key: "gained".into(),
            value: DataValue::Text(nid),
        });
        if let Some(source) = source {
            ctx.queue(PendingAction::SetObjData {
                target: instance.reference(),
                key: "source".into(),
                value: DataValue::Int(i64::from(source.0)),
            });
        }
        Ok(())
    }
}

#[test]
fn gain_hooks_fire_on_the_new_skill_only() {
    let mut content = content(HookConfig::default());
    content
        .skill_library
        .register(ComponentDefinition::new("scribe", ComponentTag::Custom), Scribe)
        .unwrap();
    let mut pipeline = Pipeline::new(content, duel(), ArithmeticEvaluator::new());

    pipeline.gain_skill(UnitId(1), "Journal", Some(UnitId(2))).unwrap();
    pipeline.gain_skill(UnitId(1), "Watchful", None).unwrap();

    let state = pipeline
        .loadout(UnitId(1))
        .unwrap()
        .skill("Journal")
        .unwrap()
        .component("scribe")
        .unwrap()
        .state();
    assert_eq!(state.get("gained"), Some(&DataValue::Text("Journal".into())));
    assert_eq!(state.int("source"), Some(2));
    assert!(pipeline.rejected().is_empty());
    assert!(pipeline.failures().is_empty());
}

#[test]
fn executed_writes_reach_the_world_and_the_right_item() {
    let mut pipeline = pipeline(duel());
    pipeline.grant_skill(UnitId(1), "Miracle").unwrap();
    pipeline.equip(UnitId(1), ItemUid(10), "Hand_Axe").unwrap();
    pipeline.equip(UnitId(1), ItemUid(11), "Hand_Axe").unwrap();

    let loadout = pipeline.loadout(UnitId(1)).unwrap();
    let charge_ref = loadout
        .skill("Miracle")
        .unwrap()
        .component("build_charge_start_charged")
        .unwrap()
        .reference();
    let splash_ref = |uid| {
        loadout
            .item(uid)
            .unwrap()
            .component("post_combat_splash_damage")
            .unwrap()
            .reference()
    };
    let (first_axe, second_axe) = (splash_ref(ItemUid(10)), splash_ref(ItemUid(11)));
    assert_ne!(first_axe, second_axe);

    pipeline.execute([
        PendingAction::SetHp { unit: UnitId(2), hp: 5 },
        PendingAction::SetObjData {
            target: charge_ref.clone(),
            key: "charge".into(),
            value: DataValue::Int(0),
        },
        PendingAction::ModifyComponentValue {
            target: second_axe,
            value: ComponentValue::Text("6".into()),
        },
        PendingAction::ModifyComponentValue {
            target: charge_ref,
            value: ComponentValue::Text("lots".into()),
        },
    ]);

    assert_eq!(pipeline.world().hp(UnitId(2)), Some(5));
    assert_eq!(charge(&pipeline, 1, "Miracle"), Some(0));
    let damage = |uid| {
        pipeline
            .loadout(UnitId(1))
            .unwrap()
            .item(uid)
            .unwrap()
            .component("post_combat_splash_damage")
            .unwrap()
            .value()
            .clone()
    };
    assert_eq!(damage(ItemUid(10)), ComponentValue::Text("3".into()));
    assert_eq!(damage(ItemUid(11)), ComponentValue::Text("6".into()));

    // The shape mismatch is rejected and the old value kept.
    assert_eq!(pipeline.rejected().len(), 1);
    assert!(matches!(pipeline.rejected()[0], CommitError::Config(_)));
    let miracle = pipeline.loadout(UnitId(1)).unwrap().skill("Miracle").unwrap();
    assert_eq!(miracle.components()[0].value(), &ComponentValue::Int(1));
}

#[test]
fn setting_hp_to_zero_kills_and_the_dead_stay_dead() {
    let mut pipeline = pipeline(duel());
    pipeline.execute([
        PendingAction::SetHp { unit: UnitId(2), hp: 0 },
        PendingAction::ChangeHp { unit: UnitId(2), delta: 5 },
        PendingAction::Die { unit: UnitId(2), killer: Some(UnitId(1)) },
    ]);

    assert!(!pipeline.world().is_alive(UnitId(2)));
    assert_eq!(pipeline.world().hp(UnitId(2)), Some(0));
    assert_eq!(pipeline.deaths(), [UnitId(2)]);
    assert!(pipeline.rejected().is_empty());
}

#[test]
fn unknown_skill_gain_is_a_catalog_error() {
    let mut pipeline = pipeline(duel());
    let error = pipeline.gain_skill(UnitId(1), "Nope", None).unwrap_err();
    assert!(matches!(error, CommitError::Catalog(_)));
}

// ============================================================================
// Queries
// ============================================================================

fn armory(hp: u32) -> World {
    let mut world = world(&[
        (1, Team::Player, (4, 4), hp),
        (4, Team::Player, (3, 5), 20),
    ]);
    let item = |uid: u32, nid: &str, tags: &[&str], equippable: bool| ItemInfo {
        uid: ItemUid(uid),
        nid: nid.to_owned(),
        tags: tags.iter().map(|t| (*t).to_owned()).collect(),
        equippable,
        accessory: false,
    };
    world.add_item(item(20, "Physic", &[], false));
    world.add_item(item(21, "Levin_Sword", &["Sword"], true));
    world.add_item(item(22, "Spear", &["Reach"], true));
    if let Some(unit) = world.unit_mut(UnitId(1)) {
        unit.stats.insert("LCK".into(), 8);
    }
    world
}

#[test]
fn reach_rule_applies_while_the_condition_holds() {
    let mut healthy = pipeline(armory(20));
    healthy.grant_skill(UnitId(1), "Lance_Master").unwrap();
    assert!(!healthy.can_use(UnitId(1), ItemUid(21)));
    assert!(healthy.can_use(UnitId(1), ItemUid(22)));
    assert!(healthy.can_use(UnitId(1), ItemUid(20)));
    assert!(!healthy.can_use(UnitId(1), ItemUid(99)));

    let mut wounded = pipeline(armory(5));
    wounded.grant_skill(UnitId(1), "Lance_Master").unwrap();
    assert!(wounded.can_use(UnitId(1), ItemUid(21)));
}

#[test]
fn empowered_blast_reaches_further() {
    let mut pipeline = pipeline(armory(20));
    pipeline.equip(UnitId(1), ItemUid(20), "Physic").unwrap();
    assert!(pipeline.splash(UnitId(1), ItemUid(20), Position::new(4, 4)).is_empty());

    pipeline.grant_skill(UnitId(1), "Wide_Casting").unwrap();
    let tiles = pipeline.splash(UnitId(1), ItemUid(20), Position::new(4, 4));
    assert_eq!(tiles.into_iter().collect::<Vec<_>>(), [Position::new(3, 5)]);
}

#[test]
fn formulas_and_growths() {
    let mut pipeline = pipeline(armory(20));
    pipeline.equip(UnitId(1), ItemUid(21), "Levin_Sword").unwrap();
    pipeline.grant_skill(UnitId(1), "Lucky_Growth").unwrap();

    assert_eq!(
        pipeline.damage_formula(UnitId(1), ItemUid(21)).as_deref(),
        Some("MAGIC_DAMAGE")
    );
    assert_eq!(
        pipeline.resist_formula(UnitId(1), ItemUid(21)).as_deref(),
        Some("MAGIC_DEFENSE")
    );
    assert_eq!(pipeline.damage_formula(UnitId(1), ItemUid(20)), None);

    let growth = pipeline.growth_changes(UnitId(1));
    assert_eq!(growth["LCK"], 4);
    assert_eq!(growth["SPD"], 5);
}
