pub mod errors;
pub mod html;
pub mod json;
pub mod xlsx;

pub use errors::{error_to_response, html_error_response, ResultResp};
pub use html::{clear_session_cookie, html_response, redirect_response, session_cookie};
pub use json::json_response;
pub use xlsx::xlsx_response;
