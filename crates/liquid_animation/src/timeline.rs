//! Timeline orchestration for multiple animated properties

use crate::curve::Curve;
use crate::keyframe::KeyframeTrack;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    pub struct TrackId;
}

/// A named property track in a timeline
struct TimelineTrack {
    name: String,
    track: KeyframeTrack,
}

/// A timeline that owns a set of property tracks and a single clock
///
/// All tracks are sampled at the same `current_time`, so every property read
/// in one frame is consistent.
pub struct Timeline {
    tracks: SlotMap<TrackId, TimelineTrack>,
    current_time: f32,
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            tracks: SlotMap::with_key(),
            current_time: 0.0,
        }
    }

    /// Register a property with its initial value
    pub fn add_track(&mut self, name: impl Into<String>, initial: f32) -> TrackId {
        self.tracks.insert(TimelineTrack {
            name: name.into(),
            track: KeyframeTrack::new(initial),
        })
    }

    /// Look up a track by name
    pub fn find(&self, name: &str) -> Option<TrackId> {
        self.tracks
            .iter()
            .find(|(_, t)| t.name == name)
            .map(|(id, _)| id)
    }

    pub fn track(&self, id: TrackId) -> Option<&KeyframeTrack> {
        self.tracks.get(id).map(|t| &t.track)
    }

    pub fn track_mut(&mut self, id: TrackId) -> Option<&mut KeyframeTrack> {
        self.tracks.get_mut(id).map(|t| &mut t.track)
    }

    /// Jump a property to `value` at `at_ms`
    pub fn set(&mut self, id: TrackId, at_ms: f32, value: f32) {
        match self.track_mut(id) {
            Some(track) => track.set(at_ms, value),
            None => tracing::warn!("set on unknown timeline track {:?}", id),
        }
    }

    /// Animate a property from its current value to `to`, starting at `at_ms`
    pub fn animate(&mut self, id: TrackId, at_ms: f32, to: f32, curve: Curve) {
        match self.track_mut(id) {
            Some(track) => track.animate(at_ms, to, curve),
            None => tracing::warn!("animate on unknown timeline track {:?}", id),
        }
    }

    /// Advance the timeline clock
    pub fn tick(&mut self, dt_ms: f32) {
        self.current_time += dt_ms.max(0.0);
    }

    /// Move the clock to an absolute time
    pub fn seek(&mut self, t_ms: f32) {
        self.current_time = t_ms.max(0.0);
    }

    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    /// Current value of a track
    pub fn value(&self, id: TrackId) -> Option<f32> {
        self.value_at(id, self.current_time)
    }

    /// Value of a track at an arbitrary time
    pub fn value_at(&self, id: TrackId, t_ms: f32) -> Option<f32> {
        self.track(id).map(|t| t.value_at(t_ms))
    }

    /// Time at which every track has settled
    pub fn settled_at_ms(&self) -> f32 {
        self.tracks
            .values()
            .map(|t| t.track.settled_at_ms())
            .fold(0.0, f32::max)
    }

    pub fn is_settled(&self) -> bool {
        self.current_time >= self.settled_at_ms()
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracks_share_one_clock() {
        let mut timeline = Timeline::new();
        let a = timeline.add_track("a", 0.0);
        let b = timeline.add_track("b", 100.0);

        timeline.animate(a, 0.0, 10.0, Curve::linear(100.0));
        timeline.animate(b, 50.0, 0.0, Curve::linear(100.0));

        timeline.tick(50.0);
        assert_eq!(timeline.value(a), Some(5.0));
        assert_eq!(timeline.value(b), Some(100.0));

        timeline.tick(50.0);
        assert_eq!(timeline.value(a), Some(10.0));
        assert_eq!(timeline.value(b), Some(50.0));

        assert_eq!(timeline.settled_at_ms(), 150.0);
        assert!(!timeline.is_settled());
        timeline.seek(150.0);
        assert!(timeline.is_settled());
    }

    #[test]
    fn test_find_by_name() {
        let mut timeline = Timeline::new();
        let id = timeline.add_track("progress", 0.0);
        assert_eq!(timeline.find("progress"), Some(id));
        assert_eq!(timeline.find("spacing"), None);
        assert_eq!(timeline.track_count(), 1);
    }

    #[test]
    fn test_negative_ticks_are_ignored() {
        let mut timeline = Timeline::new();
        timeline.tick(10.0);
        timeline.tick(-5.0);
        assert_eq!(timeline.current_time(), 10.0);
    }
}
