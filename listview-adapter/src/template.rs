use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::{Error, Result};

/// Identifies an item template (a prototype the host instantiates).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemplateId(pub u32);

/// Picks the template of an item.
pub type TemplateSelector<T> = Arc<dyn Fn(&T, usize) -> TemplateId + Send + Sync>;

/// The registered templates and their prototype sizes.
///
/// A default template is mandatory: items use it unless a selector picks another one.
pub struct Templates<T> {
    entries: Vec<(TemplateId, u32)>,
    default: Option<TemplateId>,
    selector: Option<TemplateSelector<T>>,
}

impl<T> Clone for Templates<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            default: self.default,
            selector: self.selector.clone(),
        }
    }
}

impl<T> Default for Templates<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            default: None,
            selector: None,
        }
    }
}

impl<T> core::fmt::Debug for Templates<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Templates")
            .field("entries", &self.entries)
            .field("default", &self.default)
            .field("has_selector", &self.selector.is_some())
            .finish()
    }
}

impl<T> Templates<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a set with a single default template.
    pub fn single(id: TemplateId, size: f32) -> Self {
        Self::new().with_default(id, size)
    }

    pub fn with_template(mut self, id: TemplateId, size: f32) -> Self {
        self.register(id, size);
        self
    }

    pub fn with_default(mut self, id: TemplateId, size: f32) -> Self {
        self.register(id, size);
        self.default = Some(id);
        self
    }

    pub fn with_selector(
        mut self,
        f: impl Fn(&T, usize) -> TemplateId + Send + Sync + 'static,
    ) -> Self {
        self.selector = Some(Arc::new(f));
        self
    }

    /// Adds `id` or updates its size.
    pub fn register(&mut self, id: TemplateId, size: f32) {
        let size = listview::sanitize_size(size);
        match self.entries.iter_mut().find(|(t, _)| *t == id) {
            Some(entry) => entry.1 = size,
            None => self.entries.push((id, size)),
        }
    }

    /// Changes the prototype size of a registered template.
    pub fn set_size(&mut self, id: TemplateId, size: f32) -> Result<()> {
        let entry = self
            .entries
            .iter_mut()
            .find(|(t, _)| *t == id)
            .ok_or(Error::UnknownTemplate(id))?;
        entry.1 = listview::sanitize_size(size);
        Ok(())
    }

    pub fn size_of(&self, id: TemplateId) -> Option<u32> {
        self.entries
            .iter()
            .find_map(|&(t, size)| (t == id).then_some(size))
    }

    pub fn contains(&self, id: TemplateId) -> bool {
        self.size_of(id).is_some()
    }

    pub fn default_id(&self) -> Option<TemplateId> {
        self.default
    }

    pub fn ids(&self) -> impl Iterator<Item = TemplateId> + '_ {
        self.entries.iter().map(|&(id, _)| id)
    }

    pub fn validate(&self) -> Result<()> {
        match self.default {
            Some(id) if self.contains(id) => Ok(()),
            _ => Err(Error::MissingDefaultTemplate),
        }
    }

    /// The template of `item`, falling back to the default one.
    pub fn select(&self, item: &T, index: usize) -> Result<TemplateId> {
        let id = match &self.selector {
            Some(f) => f(item, index),
            None => self.default.ok_or(Error::MissingDefaultTemplate)?,
        };
        if !self.contains(id) {
            vwarn!(template = id.0, index, "selector returned an unknown template");
            return Err(Error::UnknownTemplate(id));
        }
        Ok(id)
    }
}
