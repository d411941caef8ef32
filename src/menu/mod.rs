pub mod builder;
pub mod chooser;
pub mod render;
pub mod shell;

pub use builder::{build_menu, run_menu_loop, Action, MenuEntry, MenuHandler, MenuItem, Side};
pub use chooser::{Chooser, DialoguerChooser};
pub use render::TableRenderer;
pub use shell::Shell;
