//! Fixed tuning constants of the agent controller.
//!
//! Distances are world units, durations are milliseconds.

// ============================================================================
// Perception
// ============================================================================

/// Side of the square probe used to sample a line of sight.
pub const SIGHT_PROBE_SIZE: f32 = 8.0;

/// Maximum spacing between line-of-sight samples.
pub const SIGHT_SAMPLE_SPACING: f32 = 16.0;

/// Minimum number of line-of-sight samples.
pub const MIN_SIGHT_SAMPLES: u32 = 4;

/// Axis dead zone when turning to face a target.
pub const FACE_DEAD_ZONE: f32 = 8.0;

// ============================================================================
// Memory trail
// ============================================================================

/// Lifetime of an accepted trail.
pub const TRAIL_TTL_MS: u64 = 5_000;

/// Maximum number of points retained from a pushed trail.
pub const TRAIL_CAPACITY: usize = 15;

/// An agent that never saw the target only accepts trails starting this close.
pub const TRAIL_ACCEPT_RADIUS: f32 = 800.0;

/// Breadcrumbs consumed before switching to search.
pub const MAX_BREADCRUMBS_TO_FOLLOW: u32 = 3;

/// A breadcrumb counts as reached within this distance.
pub const BREADCRUMB_ARRIVE_RADIUS: f32 = 5.0;

/// A nearby breadcrumb is skipped when stuck within this distance.
pub const BREADCRUMB_SKIP_RADIUS: f32 = 30.0;

// ============================================================================
// Search
// ============================================================================

/// Total lifetime of a search session.
pub const SEARCH_DURATION_MS: u64 = 10_000;

/// Candidate points tried before a search gives up.
pub const MAX_SEARCH_ATTEMPTS: u32 = 3;

/// A search candidate counts as reached within this distance.
pub const SEARCH_ARRIVE_RADIUS: f32 = 15.0;

/// Search radius on the first attempt.
pub const SEARCH_BASE_RADIUS: f32 = 100.0;

/// Radius growth per failed attempt.
pub const SEARCH_RADIUS_STEP: f32 = 80.0;

/// Upper bound on the search radius.
pub const SEARCH_MAX_RADIUS: f32 = 400.0;

/// Random trials per candidate before falling back to an unchecked point.
pub const SEARCH_CANDIDATE_TRIALS: u32 = 20;

/// Half extent of the unchecked fallback square.
pub const SEARCH_FALLBACK_SPREAD: f32 = 150.0;

/// Bounds of a search move window.
pub const SEARCH_MOVE_MIN_MS: u64 = 100;
/// Upper bound of a search move window.
pub const SEARCH_MOVE_MAX_MS: u64 = 1_000;

/// Bounds of a search pause window.
pub const SEARCH_PAUSE_MIN_MS: u64 = 1_000;
/// Upper bound of a search pause window.
pub const SEARCH_PAUSE_MAX_MS: u64 = 1_500;

// ============================================================================
// Patrol and idle
// ============================================================================

/// A patrol point counts as reached within this distance.
pub const PATROL_ARRIVE_RADIUS: f32 = 8.0;

/// Minimum wait at a patrol point.
pub const PATROL_WAIT_MIN_MS: u64 = 1_000;

/// Maximum wait at a patrol point.
pub const PATROL_WAIT_MAX_MS: u64 = 3_000;

/// Idle look-around interval.
pub const IDLE_LOOK_MIN_MS: u64 = 500;
/// Upper bound of the idle look-around interval.
pub const IDLE_LOOK_MAX_MS: u64 = 1_000;

/// Look-around interval while a search is paused.
pub const SEARCH_LOOK_MIN_MS: u64 = 300;
/// Upper bound of the paused-search look-around interval.
pub const SEARCH_LOOK_MAX_MS: u64 = 800;

// ============================================================================
// Movement and stuck recovery
// ============================================================================

/// Speed multiplier on the free axis when avoiding an obstacle.
pub const AVOIDANCE_AXIS_BOOST: f32 = 1.5;

/// Offsets tried when sliding along a blocked axis.
pub const SLIDE_OFFSETS: [f32; 3] = [3.0, 2.0, 1.0];

/// Direction ring probed when both axes are blocked.
pub const FORCED_MOVE_DIRECTIONS: [(f32, f32); 16] = [
    (1.0, 0.0),
    (-1.0, 0.0),
    (0.0, 1.0),
    (0.0, -1.0),
    (1.0, 1.0),
    (-1.0, 1.0),
    (1.0, -1.0),
    (-1.0, -1.0),
    (2.0, 1.0),
    (-2.0, 1.0),
    (2.0, -1.0),
    (-2.0, -1.0),
    (1.0, 2.0),
    (-1.0, 2.0),
    (1.0, -2.0),
    (-1.0, -2.0),
];

/// Magnitudes applied to each forced-move direction, largest first.
pub const FORCED_MOVE_MAGNITUDES: [f32; 3] = [3.0, 2.0, 1.0];

/// Penalty added to the sampled stuck counter when a move is fully blocked.
pub const BLOCKED_MOVE_PENALTY: u32 = 2;

/// Consecutive no-progress ticks that trigger a forced step-back.
pub const STUCK_TICK_THRESHOLD: u32 = 30;

/// Displacement below which a tick counts as no progress.
pub const STUCK_MIN_PROGRESS: f32 = 1.0;

/// Duration of a forced step-back.
pub const STEP_BACK_TICKS: u32 = 20;

/// Step-back speed as a fraction of base speed.
pub const STEP_BACK_SPEED_FACTOR: f32 = 0.5;

/// Exclusive upper bound of the step-back clearance score.
pub const STEP_BACK_CLEARANCE_MAX: u64 = 60;

/// Interval of the sampled stuck heuristic.
pub const STUCK_SAMPLE_INTERVAL_MS: u64 = 400;

/// Progress below which a sample window counts as stuck.
pub const STUCK_SAMPLE_MIN_PROGRESS: f32 = 2.0;

/// Sampled stuck count above which breadcrumbs are skipped or the search target regenerated.
pub const STUCK_SAMPLE_LIMIT: u32 = 1;

// ============================================================================
// Melee
// ============================================================================

/// Time per melee animation frame.
pub const MELEE_FRAME_INTERVAL_MS: u64 = 100;

/// Animation frame at which the hit volume is created.
pub const MELEE_SPAWN_FRAME: u8 = 4;

/// Minimum interval between melee swings.
pub const MELEE_COOLDOWN_MS: u64 = 1_500;

/// A ranged attack needs this long since the last melee swing.
pub const MELEE_TO_RANGE_DELAY_MS: u64 = 1_200;

/// Agents whose melee-enter radius is at most this cannot melee.
pub const MELEE_CAPABLE_MIN_RANGE: f32 = 1.0;

// ============================================================================
// Range
// ============================================================================

/// Time per ranged animation frame.
pub const RANGE_FRAME_INTERVAL_MS: u64 = 200;

/// Minimum interval between ranged attacks.
pub const RANGE_COOLDOWN_MS: u64 = 2_000;

/// Mana spent per ranged attack.
pub const RANGE_MANA_COST: u32 = 5;

/// Kiting speed as a fraction of base speed.
pub const KITE_SPEED_FACTOR: f32 = 0.4;

/// Side of the square projectile hitbox.
pub const PROJECTILE_SIZE: f32 = 8.0;

// ============================================================================
// Resources
// ============================================================================

/// Mana regeneration period.
pub const MANA_REGEN_INTERVAL_MS: u64 = 1_000;

/// Mana restored per period.
pub const MANA_REGEN_AMOUNT: u32 = 1;
