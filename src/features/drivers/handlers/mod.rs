pub mod driver_handler;

pub use driver_handler::{
    __path_create_driver, __path_find_nearby, __path_list_drivers, __path_update_driver,
    create_driver, find_nearby, list_drivers, update_driver,
};
