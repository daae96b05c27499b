//! Random frame generation.
//!
//! Every frame gets a uniformly chosen sender end system, a receiver class
//! drawn from the profile's receiver mix, and a frame type drawn from the
//! frame types' cumulative percentages.

use std::collections::BTreeSet;

use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::frame::{Frame, FrameType, TrafficError};
use super::PERCENTAGE_TOLERANCE;
use crate::topology::NetworkGraph;

/// How a receiver-class draw is mapped onto a class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiverSelection {
    /// Thresholds are tested one after another without stopping, so every
    /// draw below `broadcast + single + multi` ends up as multi and every
    /// other draw as local. Broadcast and single are never produced.
    #[default]
    Cascading,
    /// Each draw falls into exactly one class
    Exclusive,
}

/// Receiver set shape of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverClass {
    /// One random other end system
    Single,
    /// End systems two hops away from the sender
    Local,
    /// A random non-empty set of other end systems
    Multi,
    /// Every other end system
    Broadcast,
}

/// Share of frames per receiver class
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReceiverMix {
    single: f64,
    local: f64,
    multi: f64,
    broadcast: f64,
}

impl ReceiverMix {
    pub fn new(single: f64, local: f64, multi: f64, broadcast: f64) -> Result<Self, TrafficError> {
        for value in [single, local, multi, broadcast] {
            if !(0.0..=1.0).contains(&value) {
                return Err(TrafficError::InvalidPercentage { value });
            }
        }
        let sum = single + local + multi + broadcast;
        if (sum - 1.0).abs() > PERCENTAGE_TOLERANCE {
            return Err(TrafficError::PercentageSum { what: "Receiver class", sum });
        }
        Ok(Self { single, local, multi, broadcast })
    }

    pub fn single(&self) -> f64 {
        self.single
    }

    pub fn local(&self) -> f64 {
        self.local
    }

    pub fn multi(&self) -> f64 {
        self.multi
    }

    pub fn broadcast(&self) -> f64 {
        self.broadcast
    }

    /// Receiver class for a draw in `[0, 1)`
    pub fn class_for(&self, draw: f64, selection: ReceiverSelection) -> ReceiverClass {
        let broadcast = self.broadcast;
        let single = broadcast + self.single;
        let multi = single + self.multi;

        match selection {
            ReceiverSelection::Cascading => {
                if draw < multi {
                    ReceiverClass::Multi
                } else {
                    ReceiverClass::Local
                }
            }
            ReceiverSelection::Exclusive => {
                if draw < broadcast {
                    ReceiverClass::Broadcast
                } else if draw < single {
                    ReceiverClass::Single
                } else if draw < multi {
                    ReceiverClass::Multi
                } else {
                    ReceiverClass::Local
                }
            }
        }
    }
}

/// Everything needed to generate the traffic of one network
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficProfile {
    number_frames: usize,
    mix: ReceiverMix,
    frame_types: Vec<FrameType>,
    selection: ReceiverSelection,
}

impl TrafficProfile {
    /// Create a profile; frame type percentages must add up to 1.0
    pub fn new(
        number_frames: usize,
        mix: ReceiverMix,
        frame_types: Vec<FrameType>,
        selection: ReceiverSelection,
    ) -> Result<Self, TrafficError> {
        let sum: f64 = frame_types.iter().map(FrameType::percentage).sum();
        if (sum - 1.0).abs() > PERCENTAGE_TOLERANCE {
            return Err(TrafficError::PercentageSum { what: "Frame type", sum });
        }
        Ok(Self { number_frames, mix, frame_types, selection })
    }

    pub fn number_frames(&self) -> usize {
        self.number_frames
    }

    pub fn mix(&self) -> &ReceiverMix {
        &self.mix
    }

    pub fn frame_types(&self) -> &[FrameType] {
        &self.frame_types
    }

    pub fn selection(&self) -> ReceiverSelection {
        self.selection
    }

    /// Frame type for a draw in `[0, 1)` by cumulative percentage.
    ///
    /// A draw past the last cumulative bound, possible when rounding leaves
    /// the sum just under 1.0, gets the last frame type.
    pub fn frame_type_for(&self, draw: f64) -> &FrameType {
        let mut cumulative = 0.0;
        for frame_type in &self.frame_types {
            cumulative += frame_type.percentage();
            if draw < cumulative {
                return frame_type;
            }
        }
        // new() rejects an empty list
        &self.frame_types[self.frame_types.len() - 1]
    }
}

/// End systems reachable from `sender` in exactly two directed hops
pub fn local_receivers(graph: &NetworkGraph, sender: usize) -> Vec<usize> {
    let mut receivers = BTreeSet::new();
    for (_, first) in graph.out_links(sender) {
        for (_, second) in graph.out_links(first.destination) {
            if second.destination != sender && graph.is_end_system(second.destination) {
                receivers.insert(second.destination);
            }
        }
    }
    receivers.into_iter().collect()
}

/// Generate the frames of a profile over the end systems of `graph`
///
/// # Examples
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use ttnetgen::topology::build_non_cyclic;
/// use ttnetgen::traffic::{generate_frames, FrameType, ReceiverMix, ReceiverSelection, TrafficProfile};
///
/// let graph = build_non_cyclic("-3", "w100;w100;w100").unwrap();
/// let frame_type = FrameType::new(1.0, 1_000_000, 1_000_000, 100, 0, 1_000_000).unwrap();
/// let mix = ReceiverMix::new(0.0, 1.0, 0.0, 0.0).unwrap();
/// let profile = TrafficProfile::new(5, mix, vec![frame_type], ReceiverSelection::Exclusive).unwrap();
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let frames = generate_frames(&graph, &profile, &mut rng).unwrap();
/// assert_eq!(frames.len(), 5);
/// ```
pub fn generate_frames<R: Rng>(
    graph: &NetworkGraph,
    profile: &TrafficProfile,
    rng: &mut R,
) -> Result<Vec<Frame>, TrafficError> {
    if profile.number_frames == 0 {
        return Ok(Vec::new());
    }
    let end_systems = graph.end_systems();
    if end_systems.len() < 2 {
        return Err(TrafficError::NotEnoughEndSystems { available: end_systems.len() });
    }
    if profile.selection == ReceiverSelection::Cascading
        && (profile.mix.broadcast > 0.0 || profile.mix.single > 0.0)
    {
        warn!(
            "Cascading receiver selection never produces broadcast or single frames \
             (broadcast = {}, single = {}); use exclusive selection to get them",
            profile.mix.broadcast, profile.mix.single
        );
    }

    let mut frames = Vec::with_capacity(profile.number_frames);
    for index in 0..profile.number_frames {
        let draw: f64 = rng.gen();
        let sender = end_systems[rng.gen_range(0..end_systems.len())];
        let mut others: Vec<usize> = end_systems.iter().copied().filter(|&id| id != sender).collect();

        let class = profile.mix.class_for(draw, profile.selection);
        let receivers = match class {
            ReceiverClass::Broadcast => others,
            ReceiverClass::Single => vec![others[rng.gen_range(0..others.len())]],
            ReceiverClass::Multi => {
                others.shuffle(rng);
                let count = rng.gen_range(1..=others.len());
                others.truncate(count);
                others
            }
            ReceiverClass::Local => {
                let local = local_receivers(graph, sender);
                if local.is_empty() {
                    vec![others[rng.gen_range(0..others.len())]]
                } else {
                    local
                }
            }
        };

        let frame_type = profile.frame_type_for(rng.gen());
        debug!("Frame {}: {:?} from {} to {:?}", index, class, sender, receivers);
        frames.push(Frame::from_type(sender, receivers, frame_type)?);
    }

    info!("Generated {} frames over {} end systems", frames.len(), end_systems.len());
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{build_configurable, build_non_cyclic, LinkSpec, NodeDescription, NodeKind};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn frame_type(percentage: f64) -> FrameType {
        FrameType::new(percentage, 1_000_000, 500_000, 128, 0, 1_000_000).unwrap()
    }

    fn profile(frames: usize, mix: ReceiverMix, selection: ReceiverSelection) -> TrafficProfile {
        TrafficProfile::new(frames, mix, vec![frame_type(1.0)], selection).unwrap()
    }

    /// Root switch with four end systems
    fn star() -> NetworkGraph {
        build_non_cyclic("-4", "w100;w100;w100;w100").unwrap()
    }

    #[test]
    fn test_class_selection() {
        let mix = ReceiverMix::new(0.25, 0.25, 0.25, 0.25).unwrap();

        assert_eq!(mix.class_for(0.1, ReceiverSelection::Exclusive), ReceiverClass::Broadcast);
        assert_eq!(mix.class_for(0.3, ReceiverSelection::Exclusive), ReceiverClass::Single);
        assert_eq!(mix.class_for(0.6, ReceiverSelection::Exclusive), ReceiverClass::Multi);
        assert_eq!(mix.class_for(0.9, ReceiverSelection::Exclusive), ReceiverClass::Local);

        assert_eq!(mix.class_for(0.1, ReceiverSelection::Cascading), ReceiverClass::Multi);
        assert_eq!(mix.class_for(0.3, ReceiverSelection::Cascading), ReceiverClass::Multi);
        assert_eq!(mix.class_for(0.6, ReceiverSelection::Cascading), ReceiverClass::Multi);
        assert_eq!(mix.class_for(0.9, ReceiverSelection::Cascading), ReceiverClass::Local);
    }

    #[test]
    fn test_percentages_must_sum_to_one() {
        assert!(matches!(
            ReceiverMix::new(0.5, 0.5, 0.5, 0.0),
            Err(TrafficError::PercentageSum { .. })
        ));
        assert!(matches!(
            ReceiverMix::new(-0.5, 0.5, 0.5, 0.5),
            Err(TrafficError::InvalidPercentage { .. })
        ));
        let mix = ReceiverMix::new(1.0, 0.0, 0.0, 0.0).unwrap();
        assert!(matches!(
            TrafficProfile::new(1, mix, vec![frame_type(0.3)], ReceiverSelection::Exclusive),
            Err(TrafficError::PercentageSum { .. })
        ));
        assert!(TrafficProfile::new(1, mix, vec![], ReceiverSelection::Exclusive).is_err());
    }

    #[test]
    fn test_frame_type_cumulative_choice() {
        let mix = ReceiverMix::new(1.0, 0.0, 0.0, 0.0).unwrap();
        let short = FrameType::new(0.3, 1000, 1000, 64, 0, 1000).unwrap();
        let long = FrameType::new(0.7, 2000, 2000, 64, 0, 2000).unwrap();
        let profile = TrafficProfile::new(1, mix, vec![short, long], ReceiverSelection::Exclusive).unwrap();

        assert_eq!(profile.frame_type_for(0.0).period(), 1000);
        assert_eq!(profile.frame_type_for(0.29).period(), 1000);
        assert_eq!(profile.frame_type_for(0.31).period(), 2000);
        // Past every cumulative bound
        assert_eq!(profile.frame_type_for(1.0).period(), 2000);
    }

    #[test]
    fn test_broadcast_and_single() {
        let graph = star();
        let mut rng = StdRng::seed_from_u64(1);

        let broadcast = profile(20, ReceiverMix::new(0.0, 0.0, 0.0, 1.0).unwrap(), ReceiverSelection::Exclusive);
        for frame in generate_frames(&graph, &broadcast, &mut rng).unwrap() {
            assert_eq!(frame.receivers().len(), 3);
            assert!(!frame.receivers().contains(&frame.sender()));
            assert!(graph.is_end_system(frame.sender()));
        }

        let single = profile(20, ReceiverMix::new(1.0, 0.0, 0.0, 0.0).unwrap(), ReceiverSelection::Exclusive);
        for frame in generate_frames(&graph, &single, &mut rng).unwrap() {
            assert_eq!(frame.receivers().len(), 1);
            assert_ne!(frame.receivers()[0], frame.sender());
            assert!(graph.is_end_system(frame.receivers()[0]));
        }
    }

    #[test]
    fn test_cascading_turns_broadcast_into_multi() {
        let graph = star();
        let mut rng = StdRng::seed_from_u64(2);
        let profile = profile(50, ReceiverMix::new(0.0, 0.0, 0.0, 1.0).unwrap(), ReceiverSelection::Cascading);

        let frames = generate_frames(&graph, &profile, &mut rng).unwrap();
        assert_eq!(frames.len(), 50);
        for frame in &frames {
            let receivers = frame.receivers();
            assert!((1..=3).contains(&receivers.len()));
            assert!(!receivers.contains(&frame.sender()));
            let unique: BTreeSet<_> = receivers.iter().collect();
            assert_eq!(unique.len(), receivers.len());
        }
    }

    #[test]
    fn test_local_receivers_are_two_hops_away() {
        let graph = star();
        assert_eq!(local_receivers(&graph, 1), vec![2, 3, 4]);

        let mut rng = StdRng::seed_from_u64(3);
        let profile = profile(10, ReceiverMix::new(0.0, 1.0, 0.0, 0.0).unwrap(), ReceiverSelection::Cascading);
        for frame in generate_frames(&graph, &profile, &mut rng).unwrap() {
            let expected: Vec<usize> = [1, 2, 3, 4].into_iter().filter(|&id| id != frame.sender()).collect();
            assert_eq!(frame.receivers(), expected.as_slice());
        }
    }

    #[test]
    fn test_local_falls_back_to_single_receiver() {
        let w = LinkSpec::wired(100).unwrap();
        let graph = build_configurable(&[
            NodeDescription::new(0, NodeKind::EndSystem).connect(1, w),
            NodeDescription::new(1, NodeKind::EndSystem).connect(0, w),
        ])
        .unwrap();
        assert!(local_receivers(&graph, 0).is_empty());

        let mut rng = StdRng::seed_from_u64(4);
        let profile = profile(5, ReceiverMix::new(0.0, 1.0, 0.0, 0.0).unwrap(), ReceiverSelection::Exclusive);
        for frame in generate_frames(&graph, &profile, &mut rng).unwrap() {
            assert_eq!(frame.receivers(), &[1 - frame.sender()]);
        }
    }

    #[test]
    fn test_same_seed_same_frames() {
        let graph = star();
        let profile = profile(25, ReceiverMix::new(0.25, 0.25, 0.25, 0.25).unwrap(), ReceiverSelection::Exclusive);

        let first = generate_frames(&graph, &profile, &mut StdRng::seed_from_u64(99)).unwrap();
        let second = generate_frames(&graph, &profile, &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_needs_two_end_systems() {
        let graph = build_non_cyclic("0", "").unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let mix = ReceiverMix::new(1.0, 0.0, 0.0, 0.0).unwrap();

        assert_eq!(
            generate_frames(&graph, &profile(1, mix, ReceiverSelection::Exclusive), &mut rng),
            Err(TrafficError::NotEnoughEndSystems { available: 1 })
        );
        assert_eq!(
            generate_frames(&graph, &profile(0, mix, ReceiverSelection::Exclusive), &mut rng),
            Ok(Vec::new())
        );
    }
}
