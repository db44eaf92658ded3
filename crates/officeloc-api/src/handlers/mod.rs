mod attendances;
mod distance;
mod health;
mod locations;
mod offices;

pub use attendances::{create_attendance, get_attendance, list_attendances, update_attendance};
pub use distance::measure_distance;
pub use health::health_check;
pub use locations::resolve_location;
pub use offices::{
    create_office, delete_office, get_office, get_office_geometry, list_offices,
    set_office_geometry, update_office,
};
