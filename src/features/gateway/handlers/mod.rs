mod login_handler;
mod proxy_handler;

pub use login_handler::login;
pub use proxy_handler::proxy_to_driver_service;
