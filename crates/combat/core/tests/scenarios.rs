use std::cell::RefCell;
use std::rc::Rc;

use combat_core::{
    ActorId, ActorSpec, ActorStats, AttackData, CombatAction, CombatConfig, CombatEvent,
    CombatWorld, DamageInfo, Faction, HitOutcome, HitstopConfig, HurtboxId, InputSnapshot, Moveset,
    StateKind,
};
use glam::Vec3;

fn world() -> CombatWorld {
    CombatWorld::new(CombatConfig::new().with_hitstop(HitstopConfig::NONE))
}

/// Player at the origin facing +Z, enemy 1.5 units ahead facing back.
fn duel(world: &mut CombatWorld, enemy_stats: ActorStats) -> (ActorId, ActorId) {
    let player = world.spawn(ActorSpec::new(Faction::Player));
    let enemy = world.spawn(
        ActorSpec::new(Faction::Enemy)
            .with_stats(enemy_stats)
            .with_position(Vec3::new(0.0, 0.0, 1.5))
            .with_forward(Vec3::NEG_Z),
    );
    (player, enemy)
}

fn body(world: &CombatWorld, id: ActorId) -> HurtboxId {
    world.actor(id).unwrap().hurtboxes()[0].id
}

fn record_events(world: &mut CombatWorld) -> Rc<RefCell<Vec<CombatEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    world
        .coordinator_mut()
        .events_mut()
        .subscribe(move |event| sink.borrow_mut().push(event.clone()));
    events
}

/// Starts the default light swing and steps into its active window.
fn swing_into_active(world: &mut CombatWorld, attacker: ActorId) {
    assert!(world.actor_mut(attacker).unwrap().try_light_attack());
    world.step(0.16);
    assert!(world.actor(attacker).unwrap().hitbox().is_active());
}

#[test]
fn repeated_overlaps_dispatch_once_per_swing() {
    let mut world = world();
    let (player, enemy) = duel(&mut world, ActorStats::default());
    let hitbox = world.actor(player).unwrap().hitbox().id;
    let hurtbox = body(&world, enemy);

    swing_into_active(&mut world, player);
    for _ in 0..3 {
        world.report_overlap(hitbox, hurtbox);
    }
    let report = world.step(0.02);
    assert_eq!(report.dispatched, 1);

    world.report_overlap(hitbox, hurtbox);
    world.report_overlap(hitbox, hurtbox);
    assert_eq!(world.step(0.02).dispatched, 0);

    let enemy = world.actor(enemy).unwrap();
    assert!((enemy.health() - 82.0).abs() < 1e-4);
    assert_eq!(world.actor(player).unwrap().tally().hits_landed, 1);
}

#[test]
fn same_faction_overlap_is_suppressed_without_touching_hit_set() {
    let mut world = world();
    let player = world.spawn(ActorSpec::new(Faction::Player));
    let ally = world.spawn(ActorSpec::new(Faction::Player).with_position(Vec3::Z));
    let hitbox = world.actor(player).unwrap().hitbox().id;
    let hurtbox = body(&world, ally);

    swing_into_active(&mut world, player);
    world.report_overlap(hitbox, hurtbox);
    assert_eq!(world.step(0.02).dispatched, 0);

    assert!(world.actor(player).unwrap().hitbox().hits().is_empty());
    assert_eq!(world.actor(ally).unwrap().health(), 100.0);
}

#[test]
fn friendly_fire_lets_allies_hit_each_other() {
    let mut world = CombatWorld::new(
        CombatConfig::new()
            .with_hitstop(HitstopConfig::NONE)
            .with_friendly_fire(true),
    );
    let player = world.spawn(ActorSpec::new(Faction::Player));
    let ally = world.spawn(ActorSpec::new(Faction::Player).with_position(Vec3::Z));
    let hitbox = world.actor(player).unwrap().hitbox().id;

    swing_into_active(&mut world, player);
    let hurtbox = body(&world, ally);
    world.report_overlap(hitbox, hurtbox);
    assert_eq!(world.step(0.02).dispatched, 1);
    assert!(world.actor(ally).unwrap().health() < 100.0);
}

#[test]
fn third_poise_hit_breaks_staggers_and_recovers() {
    let mut world = world();
    let (_, enemy) = duel(&mut world, ActorStats::default());
    let events = record_events(&mut world);

    let hit = DamageInfo::new(10.0, 20.0, None);
    let breaks: Vec<bool> = (0..3)
        .map(|_| world.apply_damage(None, enemy, &hit).caused_poise_break())
        .collect();
    assert_eq!(breaks, vec![false, false, true]);

    assert_eq!(world.actor(enemy).unwrap().state_kind(), StateKind::Stagger);
    assert!(
        events
            .borrow()
            .contains(&CombatEvent::PoiseBreak { actor: enemy })
    );

    for _ in 0..25 {
        world.step(0.1);
    }
    let enemy = world.actor(enemy).unwrap();
    assert_eq!(enemy.state_kind(), StateKind::Idle);
    assert!(!enemy.poise().is_broken());
}

#[test]
fn buffered_dodge_fires_when_recovery_opens() {
    let mut moveset = Moveset::default();
    moveset.light_combo.clear();
    moveset.light_combo.push(
        AttackData::new("jab", 10.0, 5.0, 0.1)
            .with_windows(0.1, 0.3, 0.5)
            .with_stamina_cost(10.0),
    );
    let mut world = world();
    let player = world.spawn(ActorSpec::new(Faction::Player).with_moveset(moveset));

    assert!(world.actor_mut(player).unwrap().try_light_attack());
    let dodge = InputSnapshot {
        dodge: true,
        ..InputSnapshot::default()
    };
    world.sample_input(player, &dodge);

    // Follow-through: cancels are not legal yet, the dodge stays buffered.
    world.step(0.03);
    let actor = world.actor(player).unwrap();
    assert_eq!(actor.state_kind(), StateKind::LightAttack);
    assert!(actor.buffer().has_buffered(CombatAction::Dodge));

    world.sample_input(player, &InputSnapshot::default());
    world.step(0.03);
    let actor = world.actor(player).unwrap();
    assert_eq!(actor.state_kind(), StateKind::Dodge);
    assert!(!actor.buffer().has_buffered(CombatAction::Dodge));
    assert!((actor.stamina().current() - 70.0).abs() < 1e-4);
}

#[test]
fn perfect_parry_negates_and_staggers_attacker() {
    let mut world = world();
    let (player, enemy) = duel(&mut world, ActorStats::default());
    let events = record_events(&mut world);
    let hitbox = world.actor(player).unwrap().hitbox().id;
    let hurtbox = body(&world, enemy);

    swing_into_active(&mut world, player);
    assert!(world.actor_mut(enemy).unwrap().try_parry());
    world.report_overlap(hitbox, hurtbox);
    assert_eq!(world.step(0.02).dispatched, 1);

    assert_eq!(world.actor(enemy).unwrap().health(), 100.0);
    assert_eq!(world.actor(player).unwrap().state_kind(), StateKind::Stagger);
    assert!(!world.actor(player).unwrap().hitbox().is_active());
    assert!(events.borrow().contains(&CombatEvent::ParryOccurred {
        defender: enemy,
        attacker: Some(player),
        perfect: true,
    }));
}

#[test]
fn late_parry_only_halves_the_hit() {
    let mut world = world();
    let (player, enemy) = duel(&mut world, ActorStats::default());
    let hitbox = world.actor(player).unwrap().hitbox().id;
    let hurtbox = body(&world, enemy);

    swing_into_active(&mut world, player);
    assert!(world.actor_mut(enemy).unwrap().try_parry());
    world.report_overlap(hitbox, hurtbox);
    world.step(0.1);

    let enemy = world.actor(enemy).unwrap();
    assert!((enemy.health() - 91.0).abs() < 1e-4);
    assert_eq!(enemy.tally().partial_parries, 1);
    assert_eq!(enemy.deflect_chain(), 1);
    assert_eq!(world.actor(player).unwrap().state_kind(), StateKind::LightAttack);
}

#[test]
fn lethal_hit_kills_and_unregisters_in_the_same_tick() {
    let mut world = world();
    let (player, enemy) = duel(&mut world, ActorStats::default().with_max_health(15.0));
    let events = record_events(&mut world);
    let hitbox = world.actor(player).unwrap().hitbox().id;
    let hurtbox = body(&world, enemy);

    swing_into_active(&mut world, player);
    world.report_overlap(hitbox, hurtbox);
    world.step(0.02);

    let dead = world.actor(enemy).unwrap();
    assert!(!dead.is_alive());
    assert_eq!(dead.state_kind(), StateKind::Death);
    assert!(dead.hurtboxes().iter().all(|hurtbox| !hurtbox.is_enabled()));
    assert!(!world.coordinator().is_registered(enemy));
    assert!(events.borrow().contains(&CombatEvent::Death {
        actor: enemy,
        killer: Some(player),
    }));

    // Further damage against the corpse is ignored.
    let result = world.apply_damage(Some(player), enemy, &DamageInfo::new(5.0, 0.0, Some(player)));
    assert_eq!(result.outcome, HitOutcome::Ignored);

    assert!(world.respawn(enemy, Vec3::new(0.0, 0.0, 3.0)));
    let revived = world.actor(enemy).unwrap();
    assert!(revived.is_alive());
    assert_eq!(revived.state_kind(), StateKind::Idle);
    assert_eq!(revived.health(), 15.0);
    assert!(world.coordinator().is_registered(enemy));
}

#[test]
fn hitstop_freezes_simulation_but_not_real_time() {
    let mut world = CombatWorld::default();
    let (_, enemy) = duel(&mut world, ActorStats::default());

    world.step(0.1);
    let result = world.apply_damage(None, enemy, &DamageInfo::new(50.0, 0.0, None));
    assert_eq!(result.outcome, HitOutcome::Normal);
    assert!(world.coordinator().hitstop().is_active(world.coordinator().real_time()));

    assert_eq!(world.step(0.1).dt, 0.0);
    assert_eq!(world.step(0.1).dt, 0.0);
    assert!((world.coordinator().sim_time() - 0.1).abs() < 1e-6);

    assert!((world.step(0.1).dt - 0.1).abs() < 1e-6);
    let clock = world.coordinator().clock();
    assert!((clock.real - 0.4).abs() < 1e-6);
    assert!((clock.sim - 0.2).abs() < 1e-6);
}

#[test]
fn despawned_actor_overlaps_are_dropped() {
    let mut world = world();
    let (player, enemy) = duel(&mut world, ActorStats::default());
    let hitbox = world.actor(player).unwrap().hitbox().id;
    let hurtbox = body(&world, enemy);

    swing_into_active(&mut world, player);
    assert!(world.despawn(enemy).is_some());
    world.report_overlap(hitbox, hurtbox);
    assert_eq!(world.step(0.02).dispatched, 0);
    assert_eq!(world.actors().len(), 1);
}

#[test]
fn unregistered_target_overlap_keeps_the_swing_armed() {
    let mut world = world();
    let (player, enemy) = duel(&mut world, ActorStats::default());
    let hitbox = world.actor(player).unwrap().hitbox().id;
    let hurtbox = body(&world, enemy);

    swing_into_active(&mut world, player);
    world.coordinator_mut().unregister(enemy);
    world.report_overlap(hitbox, hurtbox);
    assert_eq!(world.step(0.02).dispatched, 0);
    assert!(world.actor(player).unwrap().hitbox().hits().is_empty());

    world.coordinator_mut().register(enemy, Faction::Enemy);
    world.report_overlap(hitbox, hurtbox);
    assert_eq!(world.step(0.02).dispatched, 1);
}

#[test]
fn spawn_caps_listed_hurtboxes() {
    let mut spec = ActorSpec::new(Faction::Enemy);
    for _ in 0..CombatConfig::MAX_HURTBOXES + 2 {
        spec = spec.with_hurtbox(1.0);
    }
    assert_eq!(spec.hurtboxes.len(), CombatConfig::MAX_HURTBOXES);

    let mut world = world();
    let id = world.spawn(spec);
    assert_eq!(
        world.actor(id).unwrap().hurtboxes().len(),
        CombatConfig::MAX_HURTBOXES
    );
}
