pub use crate::display::{Palette, Window};

mod display;
