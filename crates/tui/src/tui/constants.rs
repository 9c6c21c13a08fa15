use std::time::Duration;

pub(crate) const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub(crate) const TICK_RATE: Duration = Duration::from_millis(200);
pub(crate) const STATUS_TTL: Duration = Duration::from_secs(5);

pub(crate) const APP_TITLE: &str = "Task Manager";
pub(crate) const APP_SUBTITLE: &str = "Organize your tasks efficiently";

pub(crate) const STATUS_FORM: &str =
    "New task — Tab/Shift+Tab move between fields • ←/→ pick category • Alt+Enter new line • Enter create • Esc back";
pub(crate) const STATUS_HELP: &str = "Keyboard reference — Enter/Esc to close";
pub(crate) const STATUS_CONFIRM_DELETE: &str =
    "Confirm deletion — arrows choose, Enter confirms, Esc cancels";
pub(crate) const STATUS_REFRESHING: &str = "Refreshing tasks";
pub(crate) const STATUS_DELETE_CANCELLED: &str = "Deletion cancelled";
pub(crate) const STATUS_NOTHING_SELECTED: &str = "No task selected";
pub(crate) const STATUS_ALREADY_COMPLETED: &str = "Task is already completed";
pub(crate) const STATUS_BUSY: &str = "Task is still being updated";
