//! Dictionary decorators.
//!
//! Both decorators implement [`DictionaryModel`](geoscope_core::ports::DictionaryModel)
//! on top of another model: [`CoarseDictionaryDecorator`] relabels fine-cell
//! categories to the cells of a coarser grid, [`FocusDictionaryDecorator`]
//! hides every category outside an allowed set.

pub mod coarse;
pub mod focus;

pub use coarse::CoarseDictionaryDecorator;
pub use focus::FocusDictionaryDecorator;
