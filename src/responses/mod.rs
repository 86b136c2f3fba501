pub mod file;
pub mod html;
pub mod redirect;
pub mod xlsx;

pub use crate::errors::ResultResp;
pub use file::file_response;
pub use html::html_response;
pub use redirect::redirect_response;
pub use xlsx::xlsx_response;
