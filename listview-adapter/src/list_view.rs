use alloc::sync::Arc;
use alloc::vec::Vec;

use listview::{
    Align, DisplayedItem, ItemKey, KeyCacheKey, ListEngine, ListOptions, Rect, VisibleWindow,
    WindowTracker, sanitize_size,
};

use crate::error::check_index;
use crate::{
    BindContext, Easing, InstancePool, ItemHost, ObservableList, Result, ScrollData, Selection,
    Slot, TemplateId, Templates, Tween,
};

/// Maps an item to its identity.
pub type KeyFn<T, K> = Arc<dyn Fn(&T, usize) -> K + Send + Sync>;

/// Item-specific default size; overrides the template size.
pub type SizeFn<T> = Arc<dyn Fn(&T, usize) -> f32 + Send + Sync>;

/// Configuration for [`ListView`].
pub struct ListViewOptions<T, K = ItemKey> {
    pub list: ListOptions<K>,
    pub key_of: KeyFn<T, K>,
    pub size_of: Option<SizeFn<T>>,
    /// Keep the displayed items in place across data changes.
    pub retain_scroll_position: bool,
    pub multiple_select: bool,
}

impl<T, K> Clone for ListViewOptions<T, K> {
    fn clone(&self) -> Self {
        Self {
            list: self.list.clone(),
            key_of: self.key_of.clone(),
            size_of: self.size_of.clone(),
            retain_scroll_position: self.retain_scroll_position,
            multiple_select: self.multiple_select,
        }
    }
}

impl<T, K> core::fmt::Debug for ListViewOptions<T, K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListViewOptions")
            .field("list", &self.list)
            .field("has_size_of", &self.size_of.is_some())
            .field("retain_scroll_position", &self.retain_scroll_position)
            .field("multiple_select", &self.multiple_select)
            .finish_non_exhaustive()
    }
}

impl<T: 'static> ListViewOptions<T, ItemKey> {
    /// Options keyed by item index. Sizes then stick to positions rather than items.
    pub fn indexed(list: ListOptions<ItemKey>) -> Self {
        Self::new(list, |_: &T, index| index as ItemKey)
    }
}

impl<T, K> ListViewOptions<T, K> {
    pub fn new(
        list: ListOptions<K>,
        key_of: impl Fn(&T, usize) -> K + Send + Sync + 'static,
    ) -> Self {
        Self {
            list,
            key_of: Arc::new(key_of),
            size_of: None,
            retain_scroll_position: true,
            multiple_select: false,
        }
    }

    pub fn with_size_of(
        mut self,
        size_of: impl Fn(&T, usize) -> f32 + Send + Sync + 'static,
    ) -> Self {
        self.size_of = Some(Arc::new(size_of));
        self
    }

    pub fn with_retain_scroll_position(mut self, retain: bool) -> Self {
        self.retain_scroll_position = retain;
        self
    }

    pub fn with_multiple_select(mut self, multiple: bool) -> Self {
        self.multiple_select = multiple;
        self
    }
}

/// A frame-driven virtualized list view.
///
/// Owns the data, the [`ListEngine`] and the pooled instances. The host forwards viewport and
/// scroll events and calls [`ListView::update`] once per frame; the view then binds only the
/// instances whose slot changed.
///
/// Mutations through [`ListView::data_mut`] are recorded and picked up lazily: by the next
/// `update`, or by the first index-based call that needs the current items.
pub struct ListView<T, K = ItemKey, I = ()> {
    data: ObservableList<T>,
    engine: ListEngine<K>,
    templates: Templates<T>,
    item_templates: Vec<TemplateId>,
    key_of: KeyFn<T, K>,
    size_of: Option<SizeFn<T>>,
    retain_scroll_position: bool,

    pool: InstancePool<I>,
    tracker: WindowTracker,
    selection: Selection,
    tween: Option<Tween>,

    items_dirty: bool,
    pending_anchor: Option<ScrollData<K>>,
    invalidated: Vec<TemplateId>,
    rebind_all: bool,
    deferred: bool,
    displayed: Vec<DisplayedItem>,
}

impl<T, K: KeyCacheKey + Clone, I> ListView<T, K, I> {
    /// Fails with [`crate::Error::MissingDefaultTemplate`] when `templates` has no default, or
    /// with [`crate::Error::UnknownTemplate`] when the selector picks an unregistered one.
    ///
    /// The default template's size becomes the layout's default item size.
    pub fn new(
        items: Vec<T>,
        options: ListViewOptions<T, K>,
        templates: Templates<T>,
    ) -> Result<Self> {
        templates.validate()?;
        let ListViewOptions {
            mut list,
            key_of,
            size_of,
            retain_scroll_position,
            multiple_select,
        } = options;
        if let Some(size) = templates.default_id().and_then(|id| templates.size_of(id)) {
            list.settings.default_size = size;
        }

        let (item_templates, entries) =
            resolve_items(&templates, &items, &key_of, size_of.as_ref())?;
        let engine = ListEngine::with_items(list, entries);
        vdebug!(count = items.len(), "ListView::new");

        Ok(Self {
            data: ObservableList::from(items),
            engine,
            templates,
            item_templates,
            key_of,
            size_of,
            retain_scroll_position,
            pool: InstancePool::new(),
            tracker: WindowTracker::new(),
            selection: Selection::new(multiple_select),
            tween: None,
            items_dirty: false,
            pending_anchor: None,
            invalidated: Vec::new(),
            rebind_all: true,
            deferred: false,
            displayed: Vec::new(),
        })
    }

    pub fn data(&self) -> &ObservableList<T> {
        &self.data
    }

    /// Mutable access to the items. Every mutation is recorded.
    pub fn data_mut(&mut self) -> &mut ObservableList<T> {
        &mut self.data
    }

    pub fn set_data(&mut self, items: Vec<T>) {
        self.data.reset(items);
    }

    pub fn engine(&self) -> &ListEngine<K> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut ListEngine<K> {
        &mut self.engine
    }

    pub fn templates(&self) -> &Templates<T> {
        &self.templates
    }

    pub fn pool(&self) -> &InstancePool<I> {
        &self.pool
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    // Host events.

    pub fn on_viewport(&mut self, rect: Rect) {
        self.engine.set_rect(rect);
    }

    /// Call this when the UI reports a scroll offset change (e.g. user wheel/drag).
    ///
    /// This cancels any active animation.
    pub fn on_scroll(&mut self, offset: u64, now_ms: u64) {
        self.cancel_animation();
        self.engine.apply_scroll_offset_event(offset, now_ms);
    }

    /// Advances the view by one frame.
    ///
    /// Applies pending data and template changes, advances the scroll animation, recomputes the
    /// window and binds the instances of changed slots. Sizes reported during binding are applied
    /// afterwards; if they move the window, the recompute runs once more right away (later
    /// reports wait for the next frame).
    ///
    /// Returns whether any instance was (re)bound.
    pub fn update<H: ItemHost<T, Instance = I>>(
        &mut self,
        host: &mut H,
        now_ms: u64,
    ) -> Result<bool> {
        let mut bound = self.update_pass(host, now_ms)?;
        if core::mem::take(&mut self.deferred) {
            vdebug!("ListView::update: replaying deferred recompute");
            bound |= self.update_pass(host, now_ms)?;
            self.deferred = false;
        }
        Ok(bound)
    }

    fn update_pass<H: ItemHost<T, Instance = I>>(
        &mut self,
        host: &mut H,
        now_ms: u64,
    ) -> Result<bool> {
        for id in core::mem::take(&mut self.invalidated) {
            self.pool.invalidate_template(host, id);
            self.rebind_all = true;
        }
        self.flush()?;
        self.advance_animation(now_ms);
        self.engine.update_scrolling(now_ms);

        let window = self.engine.visible_window();
        let moved = self.tracker.update(window);
        if !moved && !self.rebind_all {
            return Ok(false);
        }

        self.engine.collect_displayed_items(&mut self.displayed);
        let slots: Vec<Slot> = self
            .displayed
            .iter()
            .filter_map(|it| {
                let template = *self.item_templates.get(it.index)?;
                Some(Slot {
                    virtual_index: it.virtual_index,
                    index: it.index,
                    template,
                })
            })
            .collect();
        let to_bind = self.pool.sync(host, &slots, self.rebind_all);
        self.rebind_all = false;

        let mut reports = Vec::new();
        for item in self.displayed.iter().filter(|it| to_bind.contains(&it.index)) {
            let (Some(value), Some(instance)) =
                (self.data.get(item.index), self.pool.get_mut(item.index))
            else {
                continue;
            };
            let Some(&template) = self.item_templates.get(item.index) else {
                continue;
            };
            let mut ctx = BindContext::new(*item, template, self.selection.is_selected(item.index));
            host.bind(instance, value, &mut ctx);
            if let Some(size) = ctx.reported_size() {
                reports.push((item.index, size));
            }
        }
        vtrace!(
            first = window.first,
            count = window.count,
            bound = to_bind.len(),
            "ListView::update_pass"
        );

        if !reports.is_empty() {
            let applied = self.engine.set_instance_sizes(reports);
            if applied != 0 || self.engine.visible_window() != window {
                self.deferred = true;
            }
        }
        Ok(!to_bind.is_empty())
    }

    /// Applies recorded data changes to the engine and the selection.
    fn flush(&mut self) -> Result<()> {
        let changes = self.data.take_changes();
        if !changes.is_empty() {
            if self.retain_scroll_position && self.pending_anchor.is_none() {
                self.pending_anchor = Some(ScrollData::capture(&self.engine));
            }
            for change in &changes {
                self.selection.apply(change);
            }
            self.items_dirty = true;
            vtrace!(changes = changes.len(), count = self.data.len(), "ListView: data changed");
        }
        if !self.items_dirty {
            return Ok(());
        }

        let (item_templates, entries) = resolve_items(
            &self.templates,
            &self.data,
            &self.key_of,
            self.size_of.as_ref(),
        )?;
        self.item_templates = item_templates;
        self.engine.set_items(entries);
        self.items_dirty = false;
        self.rebind_all = true;
        if let Some(anchor) = self.pending_anchor.take() {
            anchor.restore(&mut self.engine);
        }
        Ok(())
    }

    fn advance_animation(&mut self, now_ms: u64) {
        let Some(tween) = self.tween else {
            return;
        };
        let off = tween.sample(now_ms);
        let target = if self.engine.is_looped() {
            off.rem_euclid(self.engine.loop_size().max(1) as i64) as u64
        } else {
            off.max(0) as u64
        };
        self.engine.apply_scroll_offset_event(target, now_ms);
        if tween.is_done(now_ms) {
            self.tween = None;
            self.engine.set_is_scrolling(false);
        }
    }

    /// Calls `f` for every displayed slot that has an instance, e.g. to position instances after
    /// scrolling.
    pub fn for_each_displayed_instance(&mut self, mut f: impl FnMut(&DisplayedItem, &mut I)) {
        self.engine.collect_displayed_items(&mut self.displayed);
        for item in &self.displayed {
            if let Some(instance) = self.pool.get_mut(item.index) {
                f(item, instance);
            }
        }
    }

    /// Destroys every instance; the next `update` creates them again.
    pub fn clear_instances<H: ItemHost<T, Instance = I>>(&mut self, host: &mut H) {
        self.pool.clear(host);
        self.tracker.invalidate();
        self.rebind_all = true;
    }

    // Sizes.

    /// Overrides the main-axis size of `index`; returns the applied scroll compensation.
    pub fn set_instance_size(&mut self, index: usize, size: f32) -> Result<i64> {
        self.flush()?;
        Ok(self.engine.set_instance_size(index, sanitize_size(size))?)
    }

    pub fn reset_instance_size(&mut self, index: usize) -> Result<i64> {
        self.flush()?;
        Ok(self.engine.reset_instance_size(index)?)
    }

    // Scrolling.

    /// Scrolls to `index` immediately and returns the applied offset.
    pub fn scroll_to(&mut self, index: usize, align: Align) -> Result<u64> {
        self.flush()?;
        check_index(index, self.engine.count())?;
        self.cancel_animation();
        Ok(self.engine.scroll_to_index(index, align))
    }

    /// Starts an animated scroll to `index` and returns the target offset.
    ///
    /// Looped lists take the shorter way around.
    pub fn scroll_to_animated(
        &mut self,
        index: usize,
        align: Align,
        now_ms: u64,
        duration_ms: u64,
        easing: Easing,
    ) -> Result<u64> {
        self.flush()?;
        check_index(index, self.engine.count())?;
        let to = self.engine.scroll_to_index_offset(index, align);
        let from = self.engine.scroll_offset() as i64;
        let mut target = to as i64;
        if self.engine.is_looped() {
            let period = self.engine.loop_size().max(1) as i64;
            let mut delta = (target - from).rem_euclid(period);
            if delta > period / 2 {
                delta -= period;
            }
            target = from + delta;
        }
        vtrace!(index, from, target, "ListView::scroll_to_animated");
        self.tween = Some(Tween::new(from, target, now_ms, duration_ms, easing));
        Ok(to)
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    pub fn cancel_animation(&mut self) {
        self.tween = None;
    }

    // Selection.

    pub fn select(&mut self, index: usize) -> Result<()> {
        self.flush()?;
        check_index(index, self.data.len())?;
        if self.selection.select(index) {
            self.rebind_all = true;
        }
        Ok(())
    }

    pub fn deselect(&mut self, index: usize) -> Result<()> {
        self.flush()?;
        check_index(index, self.data.len())?;
        if self.selection.deselect(index) {
            self.rebind_all = true;
        }
        Ok(())
    }

    /// Returns whether `index` is selected afterwards.
    pub fn toggle(&mut self, index: usize) -> Result<bool> {
        self.flush()?;
        check_index(index, self.data.len())?;
        self.rebind_all = true;
        Ok(self.selection.toggle(index))
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selection.is_selected(index)
    }

    pub fn selected_indices(&self) -> Vec<usize> {
        self.selection.iter().collect()
    }

    pub fn set_multiple_select(&mut self, multiple: bool) {
        self.selection.set_multiple(multiple);
        self.rebind_all = true;
    }

    pub fn clear_selection(&mut self) {
        if !self.selection.is_empty() {
            self.selection.clear();
            self.rebind_all = true;
        }
    }

    // Templates.

    /// Changes the size of template `id`.
    ///
    /// Its instances are recreated on the next update and the size overrides of its items are
    /// dropped.
    pub fn set_template(&mut self, id: TemplateId, size: f32) -> Result<()> {
        self.flush()?;
        self.templates.set_size(id, size)?;
        if self.templates.default_id() == Some(id) {
            let size = sanitize_size(size);
            self.engine
                .update_options(|o| o.settings.default_size = size);
        }
        let overridden: Vec<usize> = self
            .item_templates
            .iter()
            .enumerate()
            .filter(|&(index, &t)| t == id && self.engine.is_size_overridden(index))
            .map(|(index, _)| index)
            .collect();
        for index in overridden {
            self.engine.reset_instance_size(index)?;
        }
        vdebug!(template = id.0, "ListView::set_template");
        self.invalidated.push(id);
        self.items_dirty = true;
        Ok(())
    }

    // Visibility.

    pub fn visible_window(&self) -> VisibleWindow {
        self.engine.visible_window()
    }

    pub fn displayed_indices(&self) -> Vec<usize> {
        self.engine.visible_window().indices().collect()
    }

    pub fn is_visible(&self, index: usize) -> bool {
        self.engine.is_displayed(index)
    }
}

type ResolvedItems<K> = (Vec<TemplateId>, Vec<(K, u32)>);

fn resolve_items<T, K>(
    templates: &Templates<T>,
    items: &[T],
    key_of: &KeyFn<T, K>,
    size_of: Option<&SizeFn<T>>,
) -> Result<ResolvedItems<K>> {
    let mut ids = Vec::with_capacity(items.len());
    let mut entries = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let id = templates.select(item, index)?;
        let size = match size_of {
            Some(f) => sanitize_size(f(item, index)),
            None => templates.size_of(id).unwrap_or(1),
        };
        ids.push(id);
        entries.push((key_of(item, index), size));
    }
    Ok((ids, entries))
}
