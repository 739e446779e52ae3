use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use listview::DisplayedItem;

use crate::TemplateId;

/// Instance lifecycle, implemented by the host UI.
pub trait InstanceHost {
    type Instance;

    /// Instantiates `template`. New instances start inactive.
    fn create(&mut self, template: TemplateId) -> Self::Instance;

    /// Shows or hides an instance that is checked out of or returned to the pool.
    fn set_active(&mut self, instance: &mut Self::Instance, active: bool);

    fn destroy(&mut self, instance: Self::Instance);
}

/// Binds items of type `T` to instances.
pub trait ItemHost<T>: InstanceHost {
    /// Displays `item` in `instance`. Measured sizes can be reported through `ctx`.
    fn bind(&mut self, instance: &mut Self::Instance, item: &T, ctx: &mut BindContext);
}

/// What [`ItemHost::bind`] gets to know about the slot, and how it reports back.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BindContext {
    pub item: DisplayedItem,
    pub template: TemplateId,
    pub selected: bool,
    reported: Option<u32>,
}

impl BindContext {
    pub fn new(item: DisplayedItem, template: TemplateId, selected: bool) -> Self {
        Self {
            item,
            template,
            selected,
            reported: None,
        }
    }

    /// Reports the measured main-axis size of the bound item.
    ///
    /// Applied after the bind pass; degenerate values are sanitized.
    pub fn report_size(&mut self, size: f32) {
        self.reported = Some(listview::sanitize_size(size));
    }

    pub fn reported_size(&self) -> Option<u32> {
        self.reported
    }
}

/// A displayed slot as the pool sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot {
    pub virtual_index: isize,
    pub index: usize,
    pub template: TemplateId,
}

#[derive(Debug)]
struct Active<I> {
    template: TemplateId,
    virtual_index: isize,
    instance: I,
}

/// Reusable instances, keyed by the index of the item they display.
///
/// A window never shows an item twice, looped or not, so an item that stays in the window keeps
/// its instance even when its virtual index changes (a looped list wrapping around).
/// Released instances are deactivated and cached per template until the next `acquire`.
#[derive(Debug)]
pub struct InstancePool<I> {
    active: BTreeMap<usize, Active<I>>,
    cache: BTreeMap<TemplateId, Vec<I>>,
    created: usize,
}

impl<I> Default for InstancePool<I> {
    fn default() -> Self {
        Self {
            active: BTreeMap::new(),
            cache: BTreeMap::new(),
            created: 0,
        }
    }
}

impl<I> InstancePool<I> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn cached_len(&self) -> usize {
        self.cache.values().map(Vec::len).sum()
    }

    /// Instances created over the pool's lifetime.
    pub fn created(&self) -> usize {
        self.created
    }

    pub fn get(&self, index: usize) -> Option<&I> {
        self.active.get(&index).map(|a| &a.instance)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut I> {
        self.active.get_mut(&index).map(|a| &mut a.instance)
    }

    /// Active instances as `(virtual_index, item_index, instance)` by item index.
    pub fn iter_active(&self) -> impl Iterator<Item = (isize, usize, &I)> + '_ {
        self.active
            .iter()
            .map(|(&index, a)| (a.virtual_index, index, &a.instance))
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (isize, usize, &mut I)> + '_ {
        self.active
            .iter_mut()
            .map(|(&index, a)| (a.virtual_index, index, &mut a.instance))
    }

    /// Checks an instance of `template` out of the cache, creating one when none is left.
    pub fn acquire<H: InstanceHost<Instance = I>>(
        &mut self,
        host: &mut H,
        template: TemplateId,
    ) -> I {
        let cached = self.cache.get_mut(&template).and_then(Vec::pop);
        let mut instance = match cached {
            Some(instance) => instance,
            None => {
                self.created += 1;
                vtrace!(template = template.0, created = self.created, "InstancePool: create");
                host.create(template)
            }
        };
        host.set_active(&mut instance, true);
        instance
    }

    pub fn release<H: InstanceHost<Instance = I>>(
        &mut self,
        host: &mut H,
        template: TemplateId,
        mut instance: I,
    ) {
        host.set_active(&mut instance, false);
        self.cache.entry(template).or_default().push(instance);
    }

    /// Makes the active set match `slots`.
    ///
    /// Instances of items that left the window (or changed template) are released first so the
    /// new slots can reuse them. Returns the item indexes that must be bound, in slot order: new
    /// slots, and every slot when `rebind_all` is set. Items that only moved to another virtual
    /// index keep their binding.
    pub fn sync<H: InstanceHost<Instance = I>>(
        &mut self,
        host: &mut H,
        slots: &[Slot],
        rebind_all: bool,
    ) -> Vec<usize> {
        let wanted: BTreeMap<usize, &Slot> = slots.iter().map(|s| (s.index, s)).collect();
        let stale: Vec<usize> = self
            .active
            .iter()
            .filter(|(index, a)| {
                wanted
                    .get(*index)
                    .is_none_or(|slot| slot.template != a.template)
            })
            .map(|(&index, _)| index)
            .collect();
        for index in stale {
            if let Some(a) = self.active.remove(&index) {
                self.release(host, a.template, a.instance);
            }
        }

        let mut to_bind = Vec::new();
        for slot in slots {
            match self.active.get_mut(&slot.index) {
                Some(a) => {
                    a.virtual_index = slot.virtual_index;
                    if rebind_all {
                        to_bind.push(slot.index);
                    }
                }
                None => {
                    let instance = self.acquire(host, slot.template);
                    self.active.insert(
                        slot.index,
                        Active {
                            template: slot.template,
                            virtual_index: slot.virtual_index,
                            instance,
                        },
                    );
                    to_bind.push(slot.index);
                }
            }
        }
        vtrace!(
            active = self.active.len(),
            cached = self.cached_len(),
            rebind = to_bind.len(),
            "InstancePool::sync"
        );
        to_bind
    }

    /// Destroys every instance of `template`, active or cached. Returns how many were destroyed.
    pub fn invalidate_template<H: InstanceHost<Instance = I>>(
        &mut self,
        host: &mut H,
        template: TemplateId,
    ) -> usize {
        let stale: Vec<usize> = self
            .active
            .iter()
            .filter(|(_, a)| a.template == template)
            .map(|(&index, _)| index)
            .collect();
        let mut destroyed = 0;
        for index in stale {
            if let Some(mut a) = self.active.remove(&index) {
                host.set_active(&mut a.instance, false);
                host.destroy(a.instance);
                destroyed += 1;
            }
        }
        for instance in self.cache.remove(&template).unwrap_or_default() {
            host.destroy(instance);
            destroyed += 1;
        }
        vdebug!(template = template.0, destroyed, "InstancePool::invalidate_template");
        destroyed
    }

    /// Destroys cached instances beyond `keep_per_template`.
    pub fn trim<H: InstanceHost<Instance = I>>(&mut self, host: &mut H, keep_per_template: usize) {
        for cached in self.cache.values_mut() {
            while cached.len() > keep_per_template {
                if let Some(instance) = cached.pop() {
                    host.destroy(instance);
                }
            }
        }
    }

    /// Destroys every instance.
    pub fn clear<H: InstanceHost<Instance = I>>(&mut self, host: &mut H) {
        for (_, mut a) in core::mem::take(&mut self.active) {
            host.set_active(&mut a.instance, false);
            host.destroy(a.instance);
        }
        for (_, cached) in core::mem::take(&mut self.cache) {
            for instance in cached {
                host.destroy(instance);
            }
        }
    }
}
