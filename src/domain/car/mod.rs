//! Car aggregate
//!
//! Cars belong to exactly one owner. The list of service records is not
//! stored on the car row; it is derived from `services.car_id`.

pub mod model;
pub mod repository;

pub use model::{
    can_modify, validate_new_car, validate_car_update, Car, CarDetails, CreateCarDto,
    UpdateCarDto,
};
pub use repository::CarRepository;
