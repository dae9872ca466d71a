//! Custom widgets

pub mod dropdown;
pub mod text_block;

pub use dropdown::{Dropdown, DropdownView};
pub use text_block::TextBlock;
