pub mod geo;

pub use geo::{
    angle_diff, calculate_bearing, calculate_distance, calculate_elevation, destination_point,
    normalize_degrees,
};
