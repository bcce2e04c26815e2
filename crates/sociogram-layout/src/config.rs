use sociogram_graph::{EdgeType, NodeId};

/// Tuning knobs for the layout pipeline.
///
/// The defaults are the shipping values; tests override individual fields
/// rather than constructing configs from scratch.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Seed for the jitter RNG used by deterministic seeding.
    pub seed: u64,
    /// Designated "self" node that roots the recruiting-tree seed layout.
    pub root: Option<NodeId>,

    /// Stress majorization sweep cap.
    pub stress_sweeps: usize,
    /// Early-stop threshold: relative stress drop per sweep.
    pub stress_tolerance: f64,
    /// Spatial length of one graph hop in the stress phase.
    pub ideal_edge_length: f64,

    /// Force refinement iteration count.
    pub force_iterations: usize,
    /// Crossing-reduction iteration count (low temperature, polish only).
    pub crossing_iterations: usize,
    /// Iterations for one incremental (hot set) pass.
    pub incremental_iterations: usize,
    /// Cooperative cancellation is checked every this many iterations.
    pub cancel_check_interval: usize,

    /// Node count above which repulsion switches to Barnes–Hut.
    pub barnes_hut_threshold: usize,
    /// Barnes–Hut opening angle.
    pub barnes_hut_theta: f64,

    pub repulsion: f64,
    pub spring: f64,
    pub gravity: f64,
    pub damping: f64,
    /// Minimum separation radius per node (collision avoidance).
    pub node_radius: f64,
    /// Starting per-iteration displacement cap; decays linearly to near zero.
    pub temperature: f64,
    /// Fraction of `temperature` used when re-heating neighbors during drag.
    pub reheat: f64,

    /// Spring multiplier for the temporary pull attraction.
    pub pull_strength: f64,
    /// Factor applied to a pulled node's other attractions (reduced, not zeroed).
    pub pull_attraction_scale: f64,
    /// Simulated settle steps for one pull animation (~600ms at 16ms steps).
    pub pull_settle_steps: usize,

    /// Attraction of clustered family members toward their cluster centroid.
    pub containment: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            seed: 0x50C10,
            root: None,
            stress_sweeps: 100,
            stress_tolerance: 1e-3,
            ideal_edge_length: 120.0,
            force_iterations: 200,
            crossing_iterations: 50,
            incremental_iterations: 50,
            cancel_check_interval: 50,
            barnes_hut_threshold: 500,
            barnes_hut_theta: 0.8,
            repulsion: 6_000.0,
            spring: 0.06,
            gravity: 0.015,
            damping: 0.85,
            node_radius: 16.0,
            temperature: 40.0,
            reheat: 0.3,
            pull_strength: 4.0,
            pull_attraction_scale: 0.3,
            pull_settle_steps: 38,
            containment: 0.04,
        }
    }
}

impl LayoutConfig {
    /// Rest length of a spring along an edge, per relationship type.
    ///
    /// Family and recruiting ties sit tight; incidental co-mentions sit loose.
    pub fn rest_length(&self, ty: EdgeType) -> f64 {
        let factor = match ty {
            EdgeType::Family => 0.6,
            EdgeType::RecruitingTree => 0.8,
            EdgeType::Business => 1.0,
            EdgeType::Referral => 1.0,
            EdgeType::Communication => 1.2,
            EdgeType::CoAttendance => 1.4,
            EdgeType::MentionTogether => 1.6,
        };
        self.ideal_edge_length * factor
    }
}
