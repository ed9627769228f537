//! Dashboard views

pub mod details;
pub mod files;
pub mod result;
pub mod text;
pub mod upload;
pub mod visualization;
pub mod word_boxes;

pub use details::render_details_tab;
pub use files::render_files_tab;
pub use result::render_result_view;
pub use text::render_text_tab;
pub use upload::render_upload_view;
pub use visualization::render_visualization_tab;
pub use word_boxes::render_word_boxes_tab;
