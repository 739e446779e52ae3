//! Data binding on top of the `listview` crate.
//!
//! `listview` computes which items are displayed and where. This crate connects that math to a
//! host UI:
//!
//! - an observable data source whose mutations are recorded as changes
//! - item templates and a pool of reusable instances
//! - selection that follows its items through inserts and removes
//! - scroll recovery across data changes, and tween-based smooth scrolling
//!
//! [`ListView`] ties these together. The host implements [`ItemHost`] (create, show/hide, bind,
//! destroy instances), forwards viewport and scroll events, and calls [`ListView::update`] once
//! per frame.
//!
//! The crate is framework-agnostic and has no UI bindings.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod data;
mod error;
mod list_view;
mod pool;
mod scroll_data;
mod selection;
mod template;
mod tween;


pub use data::{Change, ObservableList};
pub use error::{Error, Result};
pub use list_view::{KeyFn, ListView, ListViewOptions, SizeFn};
pub use pool::{BindContext, InstanceHost, InstancePool, ItemHost, Slot};
pub use scroll_data::ScrollData;
pub use selection::Selection;
pub use template::{TemplateId, TemplateSelector, Templates};
pub use tween::{Easing, Tween};
