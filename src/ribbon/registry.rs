//! Live ribbons keyed by gallery element.
//!
//! `initialize` is the only way a ribbon comes to life. Whichever trigger
//! fires first creates the instance; later triggers for the same element
//! are no-ops.

use std::collections::BTreeMap;

use crate::dom::{GalleryWidget, WidgetKey};
use crate::ribbon::animator::Ribbon;
use crate::ribbon::driver::{AnimationLoop, LoopHandle, Schedule};
use crate::ribbon::RibbonConfig;

/// What asked for initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The host page finished loading.
    DocumentReady,
    /// The page builder reported a widget as ready.
    ElementReady,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Created,
    AlreadyInitialized,
    /// Gallery has no images; nothing was built.
    Inert,
}

/// A ribbon together with the loop that drives it.
#[derive(Debug)]
pub struct RibbonInstance {
    pub ribbon: Ribbon,
    pub animation: AnimationLoop,
}

impl RibbonInstance {
    pub fn frame(&mut self) -> Schedule {
        self.animation.frame(&mut self.ribbon)
    }

    pub fn handle(&self) -> LoopHandle {
        self.animation.handle()
    }
}

#[derive(Debug, Default)]
pub struct RibbonRegistry {
    instances: BTreeMap<WidgetKey, RibbonInstance>,
    config: RibbonConfig,
}

impl RibbonRegistry {
    pub fn new(config: RibbonConfig) -> Self {
        Self {
            instances: BTreeMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &RibbonConfig {
        &self.config
    }

    /// Initialize a ribbon for `gallery` unless one already exists.
    pub fn initialize(
        &mut self,
        trigger: Trigger,
        gallery: &GalleryWidget,
        viewport_width: f32,
    ) -> InitOutcome {
        if self.instances.contains_key(&gallery.key) {
            log::debug!("{:?}: ribbon {} already initialized", trigger, gallery.key);
            return InitOutcome::AlreadyInitialized;
        }

        let Some(ribbon) = Ribbon::new(gallery, viewport_width, self.config.clone()) else {
            log::debug!("{:?}: gallery {} has no images, leaving it alone", trigger, gallery.key);
            return InitOutcome::Inert;
        };

        log::info!(
            "{:?}: ribbon {} started with {} slide(s) from {} image(s)",
            trigger,
            gallery.key,
            ribbon.track().len(),
            gallery.sources.len()
        );
        self.instances.insert(
            gallery.key.clone(),
            RibbonInstance {
                ribbon,
                animation: AnimationLoop::new(),
            },
        );
        InitOutcome::Created
    }

    /// Initialize every gallery of a page.
    pub fn initialize_all(
        &mut self,
        trigger: Trigger,
        galleries: &[GalleryWidget],
        viewport_width: f32,
    ) -> Vec<InitOutcome> {
        galleries
            .iter()
            .map(|g| self.initialize(trigger, g, viewport_width))
            .collect()
    }

    pub fn get(&self, key: &WidgetKey) -> Option<&RibbonInstance> {
        self.instances.get(key)
    }

    pub fn get_mut(&mut self, key: &WidgetKey) -> Option<&mut RibbonInstance> {
        self.instances.get_mut(key)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &WidgetKey> {
        self.instances.keys()
    }

    /// Stop and drop one ribbon. Returns false if none was registered.
    pub fn teardown(&mut self, key: &WidgetKey) -> bool {
        match self.instances.remove(key) {
            Some(instance) => {
                instance.handle().stop();
                log::info!(
                    "ribbon {} torn down after {} frame(s), {} recycle(s)",
                    key,
                    instance.animation.frames(),
                    instance.ribbon.recycles()
                );
                true
            }
            None => false,
        }
    }

    /// Stop and drop every ribbon, e.g. before loading another page.
    pub fn teardown_all(&mut self) {
        let keys: Vec<WidgetKey> = self.instances.keys().cloned().collect();
        for key in keys {
            self.teardown(&key);
        }
    }

    /// Run one frame on every live ribbon. Instances whose loop was stopped
    /// from outside are dropped. Returns true while any loop wants another frame.
    pub fn frame_all(&mut self) -> bool {
        let mut stopped = Vec::new();
        for (key, instance) in self.instances.iter_mut() {
            if instance.frame() == Schedule::Stopped {
                stopped.push(key.clone());
            }
        }
        for key in stopped {
            self.teardown(&key);
        }
        !self.instances.is_empty()
    }
}
