//! Component storage: the arena, generation-checked handles, and the
//! listener declaration table.
//!
//! Internal modules:
//! - [`arena`]: owning slot table with generation checks;
//! - [`component`]: the [`Component`] trait and [`ListenerSpec`] rows;
//! - [`handle`]: the [`Handle`] identifier type.

mod arena;
mod component;
mod handle;

pub use arena::Components;
pub use component::{Component, ListenerFn, ListenerSpec};
pub use handle::Handle;
