mod alert_banner;
mod filter_bar;
mod pagination_bar;
mod task_list;
mod task_modal;
mod task_row;

pub use alert_banner::AlertBanner;
pub use filter_bar::FilterBar;
pub use pagination_bar::PaginationBar;
pub use task_list::TaskList;
pub use task_modal::TaskModal;
pub use task_row::TaskRow;
