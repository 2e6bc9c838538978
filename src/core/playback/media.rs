//! Media element seam and the per-clip element registry.

use std::collections::HashMap;

use uuid::Uuid;

/// A decoder-backed media element (video or audio) the synchronizer drives.
pub trait MediaElement {
    fn seek(&mut self, time: f64);
    fn play(&mut self);
    fn pause(&mut self);
    fn current_time(&self) -> f64;
    /// Source duration in seconds; 0 until metadata is known.
    fn duration(&self) -> f64;
    fn is_paused(&self) -> bool;
    fn set_visible(&mut self, visible: bool);
    fn video_size(&self) -> Option<(u32, u32)>;
}

impl<M: MediaElement + ?Sized> MediaElement for Box<M> {
    fn seek(&mut self, time: f64) {
        (**self).seek(time)
    }
    fn play(&mut self) {
        (**self).play()
    }
    fn pause(&mut self) {
        (**self).pause()
    }
    fn current_time(&self) -> f64 {
        (**self).current_time()
    }
    fn duration(&self) -> f64 {
        (**self).duration()
    }
    fn is_paused(&self) -> bool {
        (**self).is_paused()
    }
    fn set_visible(&mut self, visible: bool) {
        (**self).set_visible(visible)
    }
    fn video_size(&self) -> Option<(u32, u32)> {
        (**self).video_size()
    }
}

/// Media elements keyed by the clip that owns them.
///
/// Elements enter with the clip and leave with it; anything returned from
/// [`MediaRegistry::insert`] or [`MediaRegistry::remove`] is the caller's to release.
#[derive(Debug)]
pub struct MediaRegistry<M> {
    elements: HashMap<Uuid, M>,
}

impl<M> Default for MediaRegistry<M> {
    fn default() -> Self {
        Self {
            elements: HashMap::new(),
        }
    }
}

impl<M: MediaElement> MediaRegistry<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `element` for `clip_id`, handing back the element it replaces.
    pub fn insert(&mut self, clip_id: Uuid, element: M) -> Option<M> {
        let previous = self.elements.insert(clip_id, element);
        if previous.is_some() {
            tracing::debug!(clip_id = %clip_id, "media element replaced");
        }
        previous
    }

    pub fn remove(&mut self, clip_id: Uuid) -> Option<M> {
        let mut removed = self.elements.remove(&clip_id)?;
        removed.pause();
        removed.set_visible(false);
        tracing::debug!(clip_id = %clip_id, "media element released");
        Some(removed)
    }

    pub fn get(&self, clip_id: Uuid) -> Option<&M> {
        self.elements.get(&clip_id)
    }

    pub fn get_mut(&mut self, clip_id: Uuid) -> Option<&mut M> {
        self.elements.get_mut(&clip_id)
    }

    pub fn contains(&self, clip_id: Uuid) -> bool {
        self.elements.contains_key(&clip_id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn pause_all(&mut self) {
        for element in self.elements.values_mut() {
            if !element.is_paused() {
                element.pause();
            }
        }
    }

    /// Pause and hide every element except `active`, then hand out the active one.
    ///
    /// The others are silenced first so two elements are never audible together.
    pub fn isolate(&mut self, active: Option<Uuid>) -> Option<&mut M> {
        for (id, element) in self.elements.iter_mut() {
            if Some(*id) == active {
                continue;
            }
            element.set_visible(false);
            if !element.is_paused() {
                element.pause();
            }
        }
        let element = self.elements.get_mut(&active?)?;
        element.set_visible(true);
        Some(element)
    }
}
