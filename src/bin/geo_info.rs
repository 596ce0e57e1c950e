//! Geodetic Information Tool
//!
//! Prints the Earth-centered positions of two coordinates along with the
//! bearing, surface distance and straight-line distance between them, and
//! the relative position of the second as seen from the first.
//!
//! Usage:
//!   cargo run --bin geo_info -- <lat1> <lon1> <lat2> <lon2> [--height1 m] [--height2 m]

use clap::Parser;
use arspatial::constants::{EARTH_RADIUS, RAD2DEG};
use arspatial::coordinates::bearing_between;
use arspatial::{GeodeticCoordinate, WorldLocation};

/// Type alias for the error type used throughout this module
type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Geodetic Information Tool
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Prints positions, bearing and distances between two coordinates",
    long_about = None,
    allow_negative_numbers = true
)]
struct Args {
    /// Latitude of the first point in degrees
    lat1: f64,
    /// Longitude of the first point in degrees
    lon1: f64,
    /// Latitude of the second point in degrees
    lat2: f64,
    /// Longitude of the second point in degrees
    lon2: f64,

    /// Height of the first point above the surface in meters
    #[arg(long, default_value_t = 0.0)]
    height1: f64,

    /// Height of the second point above the surface in meters
    #[arg(long, default_value_t = 0.0)]
    height2: f64,
}

/// Prints a section header with a title and separator line
fn print_section_header(title: &str) {
    println!("\n{}:", title);
    println!("-------------------------------------------------------");
}

/// Helper to print named values in a formatted way
fn print_named_value(name: &str, value: impl std::fmt::Display) {
    println!("{}: {}", name, value);
}

fn describe(name: &str, location: &WorldLocation) {
    let (lat, lon) = location.coordinate().to_degrees();
    let position = location.position();
    print_section_header(name);
    print_named_value("Latitude", format!("{:.6}°", lat));
    print_named_value("Longitude", format!("{:.6}°", lon));
    print_named_value("Altitude (from center)", format!("{:.1} m", location.altitude()));
    print_named_value(
        "Position",
        format!("({:.1}, {:.1}, {:.1})", position.x, position.y, position.z),
    );
}

fn main() -> Result<()> {
    let args = Args::parse();

    let from = WorldLocation::new(
        GeodeticCoordinate::from_degrees(args.lat1, args.lon1),
        EARTH_RADIUS + args.height1,
    )?;
    let to = WorldLocation::new(
        GeodeticCoordinate::from_degrees(args.lat2, args.lon2),
        EARTH_RADIUS + args.height2,
    )?;

    describe("From", &from);
    describe("To", &to);

    let bearing = bearing_between(from.coordinate(), to.coordinate());
    let relative = from.relative_position_of(&to);

    print_section_header("Between");
    print_named_value("Initial bearing", format!("{:.2}°", bearing * RAD2DEG));
    print_named_value(
        "Surface distance",
        format!("{:.1} m", from.spherical_distance_from(&to)),
    );
    print_named_value("Straight-line distance", format!("{:.1} m", from.distance_from(&to)));
    print_named_value(
        "Relative position",
        format!("({:.1}, {:.1}, {:.1})", relative.x, relative.y, relative.z),
    );

    Ok(())
}
