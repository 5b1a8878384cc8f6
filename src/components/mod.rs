pub mod pager;
pub mod session_watcher;
pub mod sidebar_nav;
pub mod ui;

pub use pager::Pager;
pub use session_watcher::SessionWatcher;
pub use sidebar_nav::SidebarNav;
