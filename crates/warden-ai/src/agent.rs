//! The hostile agent and its per-tick decision pipeline.
//!
//! Each tick runs: perception, memory bookkeeping, state selection, attack
//! animation, state behavior, timers, movement resolution, stuck detection
//! and projectile update. A forced step-back preempts everything but timers
//! and projectiles.

use tracing::{debug, info, warn};
use warden_common::{AgentId, Millis, RandomSource, Rect, Vec2};

use crate::collision::CollisionOracle;
use crate::config::{AgentConfig, ConfigError};
use crate::constants::{BREADCRUMB_ARRIVE_RADIUS, BREADCRUMB_SKIP_RADIUS, RANGE_MANA_COST};
use crate::direction::Facing;
use crate::effects::AgentEffect;
use crate::melee::{MeleeAttack, MeleeReach};
use crate::memory::{TrailFollower, TrailStep};
use crate::movement::{avoidance_velocity, resolve_movement, seek_velocity, Body, MoveOutcome};
use crate::patrol::{IdleLook, PatrolRoute, PatrolStep};
use crate::perception::{perceive, Perception, SightChange, TargetTracker};
use crate::projectile::Projectile;
use crate::ranged::{kiting_velocity, RangeAttack};
use crate::search::{SearchSession, SearchStep};
use crate::state::{next_state, BehaviorState, TransitionInputs};
use crate::stuck::{StepBack, StepBackStatus, StuckMonitor};
use crate::vitals::{DamageOutcome, RespawnTimer, Vitals};

/// Collaborators supplied to every tick.
pub struct TickContext<'a, C: ?Sized, R: ?Sized> {
    /// Current time
    pub now: Millis,
    /// Static obstacles
    pub collision: &'a C,
    /// Random source for search, patrol and step-back decisions
    pub rng: &'a mut R,
}

impl<'a, C: ?Sized, R: ?Sized> TickContext<'a, C, R> {
    /// Bundles the tick collaborators.
    pub fn new(now: Millis, collision: &'a C, rng: &'a mut R) -> Self {
        Self {
            now,
            collision,
            rng,
        }
    }
}

/// A hostile AI-controlled actor.
#[derive(Debug, Clone)]
pub struct Agent {
    id: AgentId,
    config: AgentConfig,
    body: Body,
    reach: MeleeReach,

    spawn_point: Vec2,
    position: Vec2,
    velocity: Vec2,
    facing: Facing,
    state: BehaviorState,
    alive: bool,

    vitals: Vitals,
    respawn: RespawnTimer,

    tracker: TargetTracker,
    trail: TrailFollower,
    search: Option<SearchSession>,
    search_completed: bool,
    patrol: PatrolRoute,
    idle_look: IdleLook,

    stuck: StuckMonitor,
    step_back: Option<StepBack>,

    melee: MeleeAttack,
    range: RangeAttack,
    projectiles: Vec<Projectile>,

    last_tick_at: Option<Millis>,
}

impl Agent {
    /// Creates an agent at `spawn_point` after validating its configuration.
    pub fn new(config: AgentConfig, spawn_point: Vec2) -> Result<Self, ConfigError> {
        if let Err(e) = config.validate() {
            warn!(name = %config.name, "Rejected agent configuration: {e}");
            return Err(e);
        }

        let body = Body::new(config.body_width, config.body_height, config.body_offset_y);
        let reach = MeleeReach {
            size: config.melee_hitbox_size,
            offset: config.melee_hitbox_offset,
        };
        let vitals = Vitals::new(config.max_health, config.max_mana);
        let respawn = RespawnTimer::new(config.respawn_delay_ms);

        Ok(Self {
            id: AgentId::new(),
            body,
            reach,
            spawn_point,
            position: spawn_point,
            velocity: Vec2::ZERO,
            facing: Facing::default(),
            state: BehaviorState::Patrol,
            alive: true,
            vitals,
            respawn,
            tracker: TargetTracker::default(),
            trail: TrailFollower::default(),
            search: None,
            search_completed: false,
            patrol: PatrolRoute::default(),
            idle_look: IdleLook::default(),
            stuck: StuckMonitor::new(spawn_point, Millis::ZERO),
            step_back: None,
            melee: MeleeAttack::default(),
            range: RangeAttack::default(),
            projectiles: Vec::new(),
            last_tick_at: None,
            config,
        })
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Runs one simulation step against the target's current hitbox.
    pub fn tick<C, R>(&mut self, ctx: &mut TickContext<'_, C, R>, target: &Rect) -> Vec<AgentEffect>
    where
        C: CollisionOracle + ?Sized,
        R: RandomSource + ?Sized,
    {
        let now = ctx.now;
        let collision = ctx.collision;
        let rng = &mut *ctx.rng;
        let mut effects = Vec::new();

        self.melee.clear_hitbox();

        let elapsed = self.last_tick_at.map_or(0, |last| now.since(last));
        self.last_tick_at = Some(now);

        if !self.alive {
            if self.respawn.is_due(now) {
                self.respawn(now);
                effects.push(AgentEffect::Respawned {
                    at: self.spawn_point,
                });
            }
            return effects;
        }

        let previous_state = self.state;
        let position_before = self.position;

        if let Some(step_back) = self.step_back.as_mut() {
            match step_back.step(&mut self.position, &self.body, collision) {
                StepBackStatus::Moving => {
                    self.velocity = step_back.velocity();
                    if let Some(facing) = Facing::from_velocity(self.velocity) {
                        self.facing = facing;
                    }
                },
                StepBackStatus::Finished => {
                    debug!(agent = %self.id, moved = self.position.distance(step_back.origin()), "Step-back finished");
                    self.step_back = None;
                    self.velocity = Vec2::ZERO;
                    self.stuck.clear();
                },
            }
            self.update_timers(now, elapsed);
            self.update_projectiles(collision);
            return effects;
        }

        // Perception and memory bookkeeping
        let perception = perceive(collision, self.position, target, self.config.ranges.sight);
        self.track_target(&perception, now);

        // State selection
        self.state = next_state(&self.transition_inputs(&perception, now));

        // Attack animations
        self.advance_melee(now, target, &mut effects);
        self.advance_range(now, &perception, &mut effects);

        // State behavior
        let velocity = match self.state {
            BehaviorState::Patrol => self.patrol_velocity(rng, now),
            BehaviorState::Chase => self.chase_velocity(&perception, collision, rng, now, &mut effects),
            BehaviorState::Search => self.search_velocity(collision, rng, now, &mut effects),
            BehaviorState::MeleeAttack => self.melee_behavior(&perception, now),
            BehaviorState::RangeAttack => self.range_behavior(&perception, now),
            BehaviorState::Idle => Vec2::ZERO,
        };
        self.velocity = velocity;
        if !self.range.is_active() {
            if let Some(facing) = Facing::from_velocity(velocity) {
                self.facing = facing;
            }
        }

        self.look_around(rng, now);
        self.update_timers(now, elapsed);

        // Movement and stuck detection
        if resolve_movement(&mut self.position, velocity, &self.body, collision) == MoveOutcome::Blocked {
            self.stuck.penalize_blocked();
        }

        let displacement = self.position.distance(position_before);
        let trying_to_move = velocity != Vec2::ZERO && !self.state.is_attack();
        if self.stuck.record_tick(displacement, trying_to_move) {
            debug!(agent = %self.id, position = ?self.position, "Stuck, stepping back");
            self.step_back = Some(StepBack::begin(self.position, self.config.base_speed, rng));
            self.stuck.clear();
            effects.push(AgentEffect::StepBackStarted);
        }

        self.update_projectiles(collision);

        if self.state != previous_state {
            debug!(agent = %self.id, from = %previous_state, to = %self.state, "State changed");
            effects.push(AgentEffect::StateChanged {
                from: previous_state,
                to: self.state,
            });
        }

        effects
    }

    fn track_target(&mut self, perception: &Perception, now: Millis) {
        match self.tracker.observe(perception) {
            SightChange::Visible => {
                self.trail.clear();
                self.trail.reset_progress();
                self.search = None;
                self.search_completed = false;
            },
            SightChange::JustLost => {
                debug!(agent = %self.id, "Lost sight of target");
                self.trail.reset_progress();
                self.search_completed = false;
            },
            SightChange::Hidden => {},
        }
        self.trail.expire(now);
    }

    fn transition_inputs(&self, perception: &Perception, now: Millis) -> TransitionInputs {
        TransitionInputs {
            melee_active: self.melee.is_active(),
            range_active: self.range.is_active(),
            target_visible: perception.visible,
            distance: perception.distance,
            ranges: self.config.ranges,
            mana: self.vitals.mana(),
            range_cost: RANGE_MANA_COST,
            since_last_melee: self.melee.last_trigger().map(|t| now.since(t)),
            search_completed: self.search_completed,
            searching: self.search.is_some(),
            trail_followable: self.trail.is_followable(),
            has_patrol_area: self.config.patrol_area.is_some(),
        }
    }

    fn update_timers(&mut self, now: Millis, elapsed_ms: u64) {
        self.melee.update_cooldown(now);
        self.range.update_cooldown(now);
        self.vitals.regenerate(elapsed_ms);
    }

    fn update_projectiles<C: CollisionOracle + ?Sized>(&mut self, collision: &C) {
        for projectile in &mut self.projectiles {
            projectile.update(collision);
        }
        self.projectiles.retain(Projectile::is_alive);
    }

    fn face_target(&mut self, delta: Vec2) {
        if let Some(facing) = Facing::toward(delta) {
            self.facing = facing;
        }
    }

    fn look_around<R: RandomSource + ?Sized>(&mut self, rng: &mut R, now: Millis) {
        if self.melee.is_active() || self.range.is_active() || self.state.is_attack() {
            return;
        }
        if self.velocity != Vec2::ZERO {
            return;
        }
        let paused = self.search.as_ref().is_some_and(SearchSession::is_paused);
        if let Some(facing) = self.idle_look.update(now, paused, rng) {
            self.facing = facing;
        }
    }

    // ========================================================================
    // Patrol, chase and search
    // ========================================================================

    fn patrol_velocity<R: RandomSource + ?Sized>(&mut self, rng: &mut R, now: Millis) -> Vec2 {
        match self
            .patrol
            .step(self.config.patrol_area.as_ref(), self.position, rng, now)
        {
            PatrolStep::MoveTo(waypoint) => seek_velocity(self.position, waypoint, self.config.base_speed),
            PatrolStep::Wait | PatrolStep::Stationary => Vec2::ZERO,
        }
    }

    fn chase_velocity<C, R>(
        &mut self,
        perception: &Perception,
        collision: &C,
        rng: &mut R,
        now: Millis,
        effects: &mut Vec<AgentEffect>,
    ) -> Vec2
    where
        C: CollisionOracle + ?Sized,
        R: RandomSource + ?Sized,
    {
        if perception.visible {
            return seek_velocity(self.position, perception.target_center, self.config.base_speed);
        }

        if self.trail.is_followable() {
            return self.follow_breadcrumbs(collision, rng, now, effects);
        }

        self.trail.clear();
        if self.tracker.has_seen() {
            self.enter_search(collision, rng, now, effects);
        } else {
            self.state = BehaviorState::Patrol;
        }
        Vec2::ZERO
    }

    fn follow_breadcrumbs<C, R>(
        &mut self,
        collision: &C,
        rng: &mut R,
        now: Millis,
        effects: &mut Vec<AgentEffect>,
    ) -> Vec2
    where
        C: CollisionOracle + ?Sized,
        R: RandomSource + ?Sized,
    {
        let Some(crumb) = self.trail.current() else {
            return Vec2::ZERO;
        };
        let distance = self.position.distance(crumb);

        if distance < BREADCRUMB_SKIP_RADIUS && self.stuck.is_sample_stuck() {
            self.advance_breadcrumb(collision, rng, now, effects);
            return Vec2::ZERO;
        }

        if distance > BREADCRUMB_ARRIVE_RADIUS {
            let velocity =
                avoidance_velocity(self.position, crumb, self.config.base_speed, &self.body, collision);
            self.recover_if_sample_stuck(collision, rng, now, effects);
            velocity
        } else {
            self.advance_breadcrumb(collision, rng, now, effects);
            Vec2::ZERO
        }
    }

    fn advance_breadcrumb<C, R>(
        &mut self,
        collision: &C,
        rng: &mut R,
        now: Millis,
        effects: &mut Vec<AgentEffect>,
    ) where
        C: CollisionOracle + ?Sized,
        R: RandomSource + ?Sized,
    {
        self.stuck.clear_sampled();
        if self.trail.advance() == TrailStep::Exhausted {
            self.enter_search(collision, rng, now, effects);
        }
    }

    /// Sampled stuck recovery: skip a breadcrumb or pick a new search point.
    fn recover_if_sample_stuck<C, R>(
        &mut self,
        collision: &C,
        rng: &mut R,
        now: Millis,
        effects: &mut Vec<AgentEffect>,
    ) where
        C: CollisionOracle + ?Sized,
        R: RandomSource + ?Sized,
    {
        if !self.stuck.sample(self.position, now) {
            return;
        }

        if self.trail.current().is_some() {
            self.advance_breadcrumb(collision, rng, now, effects);
        } else {
            if let Some(search) = self.search.as_mut() {
                search.regenerate_target(self.position, &self.body, collision, rng);
            }
            self.stuck.clear_sampled();
        }
    }

    fn enter_search<C, R>(
        &mut self,
        collision: &C,
        rng: &mut R,
        now: Millis,
        effects: &mut Vec<AgentEffect>,
    ) where
        C: CollisionOracle + ?Sized,
        R: RandomSource + ?Sized,
    {
        self.trail.clear();
        self.stuck.clear_sampled();
        self.search_completed = false;
        self.search = Some(SearchSession::begin(self.position, &self.body, collision, rng, now));
        self.state = BehaviorState::Search;
        debug!(agent = %self.id, position = ?self.position, "Search started");
        effects.push(AgentEffect::SearchStarted);
    }

    fn complete_search(&mut self, effects: &mut Vec<AgentEffect>) {
        self.search = None;
        self.search_completed = true;
        self.patrol.reset();
        self.state = BehaviorState::Patrol;
        info!(agent = %self.id, name = %self.config.name, "Search completed without finding target");
        effects.push(AgentEffect::SearchCompleted);
    }

    fn search_velocity<C, R>(
        &mut self,
        collision: &C,
        rng: &mut R,
        now: Millis,
        effects: &mut Vec<AgentEffect>,
    ) -> Vec2
    where
        C: CollisionOracle + ?Sized,
        R: RandomSource + ?Sized,
    {
        let Some(search) = self.search.as_mut() else {
            return Vec2::ZERO;
        };

        match search.step(self.position, &self.body, collision, rng, now) {
            SearchStep::Completed => {
                self.complete_search(effects);
                Vec2::ZERO
            },
            SearchStep::Paused => Vec2::ZERO,
            SearchStep::MoveTo(point) => {
                let velocity =
                    avoidance_velocity(self.position, point, self.config.base_speed, &self.body, collision);
                self.recover_if_sample_stuck(collision, rng, now, effects);
                velocity
            },
        }
    }

    // ========================================================================
    // Attacks
    // ========================================================================

    fn advance_melee(&mut self, now: Millis, target: &Rect, effects: &mut Vec<AgentEffect>) {
        if !self.melee.is_active() {
            return;
        }
        let frames = self.config.animations.melee[self.facing];
        if let Some(strike) = self
            .melee
            .update(now, frames, self.position, self.facing, &self.reach, target)
        {
            effects.push(AgentEffect::HitVolumeCreated {
                volume: strike.volume,
            });
            if strike.hit {
                debug!(agent = %self.id, damage = self.config.melee_damage, "Melee hit");
                effects.push(AgentEffect::MeleeHit {
                    volume: strike.volume,
                    damage: self.config.melee_damage,
                });
            }
        }
    }

    fn advance_range(&mut self, now: Millis, perception: &Perception, effects: &mut Vec<AgentEffect>) {
        if !self.range.is_active() {
            return;
        }
        let animations = &self.config.animations;
        let frames = match animations.range[self.facing] {
            0 => animations.movement[self.facing],
            n => n,
        };
        let progress = self
            .range
            .update(now, frames, self.config.projectile_spawn_frame);
        if progress.spawn {
            let projectile = Projectile::new(
                self.position,
                perception.delta,
                self.config.projectile_speed,
                self.config.projectile_range,
                self.config.range_damage,
            );
            effects.push(AgentEffect::ProjectileSpawned {
                origin: self.position,
                direction: projectile.velocity().normalize_or_zero(),
            });
            self.projectiles.push(projectile);
        }
    }

    fn melee_behavior(&mut self, perception: &Perception, now: Millis) -> Vec2 {
        let ranges = self.config.ranges;
        if !self.melee.is_active() && perception.distance > ranges.melee_exit {
            self.state = BehaviorState::Chase;
            return Vec2::ZERO;
        }

        if !self.melee.is_active() {
            self.face_target(perception.delta);
            if self.melee.is_ready() && perception.distance <= ranges.melee_enter {
                self.melee.start(now);
            }
        }
        Vec2::ZERO
    }

    fn range_behavior(&mut self, perception: &Perception, now: Millis) -> Vec2 {
        let ranges = self.config.ranges;
        if !ranges.can_melee() && perception.distance < ranges.range_exit {
            let velocity = kiting_velocity(
                perception.delta,
                perception.distance,
                &ranges,
                self.config.base_speed,
            );
            self.try_start_range(perception, now);
            return velocity;
        }

        if !self.range.is_active() {
            self.face_target(perception.delta);
            self.try_start_range(perception, now);
        }
        Vec2::ZERO
    }

    fn try_start_range(&mut self, perception: &Perception, now: Millis) {
        if !self.range.is_ready() {
            return;
        }
        if !self.vitals.spend_mana(RANGE_MANA_COST) {
            return;
        }
        self.face_target(perception.delta);
        self.range.start(now);
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Applies damage; kills the agent when health runs out.
    pub fn apply_damage(&mut self, amount: u32, now: Millis) -> DamageOutcome {
        if !self.alive {
            return DamageOutcome::default();
        }

        let outcome = self.vitals.apply_damage(amount);
        if outcome.killed {
            self.alive = false;
            self.melee.cancel();
            self.range.cancel();
            self.step_back = None;
            self.velocity = Vec2::ZERO;
            self.respawn.record_death(now);
            info!(agent = %self.id, name = %self.config.name, "Agent died");
        }
        outcome
    }

    fn respawn(&mut self, now: Millis) {
        self.alive = true;
        self.vitals.restore_full();
        self.respawn.clear();
        self.melee.reset();
        self.range.reset();
        self.projectiles.clear();
        self.tracker.forget();
        self.trail.clear();
        self.trail.reset_progress();
        self.search = None;
        self.search_completed = false;
        self.patrol.reset();
        self.step_back = None;
        self.stuck = StuckMonitor::new(self.spawn_point, now);
        self.position = self.spawn_point;
        self.velocity = Vec2::ZERO;
        self.facing = Facing::default();
        self.state = BehaviorState::Patrol;
        info!(agent = %self.id, name = %self.config.name, at = ?self.spawn_point, "Agent respawned");
    }

    /// Offers a breadcrumb trail snapshot. Returns whether it was accepted.
    pub fn push_memory_trail(&mut self, points: &[Vec2], now: Millis) -> bool {
        if !self.alive {
            return false;
        }
        match self.trail.accept(
            points,
            self.position,
            self.tracker.is_visible(),
            self.tracker.has_seen(),
            self.tracker.last_seen(),
            now,
        ) {
            Ok(()) => true,
            Err(reason) => {
                debug!(agent = %self.id, ?reason, "Breadcrumb trail rejected");
                false
            },
        }
    }

    /// Returns to patrol and forgets the target entirely.
    pub fn clear_target_memory(&mut self) {
        self.tracker.forget();
        self.trail.clear();
        self.trail.reset_progress();
        self.search = None;
        self.search_completed = false;
        self.state = BehaviorState::Patrol;
    }

    /// Returns and clears the hit volume produced this tick.
    pub fn consume_melee_hitbox(&mut self) -> Option<Rect> {
        self.melee.take_hitbox()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Agent ID.
    #[must_use]
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Configuration.
    #[must_use]
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Current behavior state.
    #[must_use]
    pub fn state(&self) -> BehaviorState {
        self.state
    }

    /// Current position (body center before the vertical offset).
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Spawn point.
    #[must_use]
    pub fn spawn_point(&self) -> Vec2 {
        self.spawn_point
    }

    /// Velocity requested on the last tick.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Current facing.
    #[must_use]
    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Collision hitbox in world space.
    #[must_use]
    pub fn body_hitbox(&self) -> Rect {
        self.body.rect_at(self.position)
    }

    /// Whether the agent is alive.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Current health.
    #[must_use]
    pub fn health(&self) -> u32 {
        self.vitals.health()
    }

    /// Maximum health.
    #[must_use]
    pub fn max_health(&self) -> u32 {
        self.vitals.max_health()
    }

    /// Current mana.
    #[must_use]
    pub fn mana(&self) -> u32 {
        self.vitals.mana()
    }

    /// Maximum mana.
    #[must_use]
    pub fn max_mana(&self) -> u32 {
        self.vitals.max_mana()
    }

    /// Whether the target was visible on the last tick.
    #[must_use]
    pub fn can_see_target(&self) -> bool {
        self.tracker.is_visible()
    }

    /// Whether the target has been seen since the last memory reset.
    #[must_use]
    pub fn has_seen_target(&self) -> bool {
        self.tracker.has_seen()
    }

    /// Whether a search session is running.
    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.search.is_some()
    }

    /// Whether a forced step-back is in progress.
    #[must_use]
    pub fn is_stepping_back(&self) -> bool {
        self.step_back.is_some()
    }

    /// Whether a breadcrumb trail is retained.
    #[must_use]
    pub fn has_memory_trail(&self) -> bool {
        self.trail.trail().is_some()
    }

    /// Breadcrumbs consumed since the trail-follow count was last reset.
    #[must_use]
    pub fn breadcrumbs_followed(&self) -> u32 {
        self.trail.consumed()
    }

    /// Live projectiles.
    #[must_use]
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Live projectiles, for impact resolution.
    pub fn projectiles_mut(&mut self) -> &mut Vec<Projectile> {
        &mut self.projectiles
    }
}
