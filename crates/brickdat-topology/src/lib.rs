use thiserror::Error;
use truck_modeling::{Rad, builder};

pub use truck_modeling::{Face, Point3, Solid, Vector3, Wire};

/// Stud pitch of a brick, in millimetres.
pub const STUD_PITCH_MM: f64 = 8.0;
/// Height of one plate, in millimetres. A brick is three plates tall.
pub const PLATE_HEIGHT_MM: f64 = 3.2;
pub const STUD_RADIUS_MM: f64 = 2.4;
pub const STUD_HEIGHT_MM: f64 = 1.8;

const CIRCLE_DIVISION: usize = 16;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error(transparent)]
    Modeling(#[from] truck_modeling::errors::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

pub struct SolidBuilder;

impl SolidBuilder {
    pub fn box_solid(width: f64, height: f64, depth: f64) -> Result<Solid> {
        ensure_positive("width", width)?;
        ensure_positive("height", height)?;
        ensure_positive("depth", depth)?;

        let v = builder::vertex(Point3::new(0.0, 0.0, 0.0));
        let e = builder::tsweep(&v, Vector3::unit_x() * width);
        let f = builder::tsweep(&e, Vector3::unit_y() * height);
        Ok(builder::tsweep(&f, Vector3::unit_z() * depth))
    }

    /// Solid body of a `columns` x `rows` brick, `plates` plates tall, in millimetres.
    /// Studs are not included.
    pub fn brick_body(columns: u32, rows: u32, plates: u32) -> Result<Solid> {
        ensure_count("columns", columns)?;
        ensure_count("rows", rows)?;
        ensure_count("plates", plates)?;

        Self::box_solid(
            f64::from(columns) * STUD_PITCH_MM,
            f64::from(plates) * PLATE_HEIGHT_MM,
            f64::from(rows) * STUD_PITCH_MM,
        )
    }

    pub fn cylinder_z(center: Point3, radius: f64, height: f64) -> Result<Solid> {
        ensure_positive("radius", radius)?;
        ensure_positive("height", height)?;

        let face = circle_face(center, radius)?;
        Ok(builder::tsweep(&face, Vector3::unit_z() * height))
    }

    pub fn stud() -> Result<Solid> {
        Self::cylinder_z(Point3::new(0.0, 0.0, 0.0), STUD_RADIUS_MM, STUD_HEIGHT_MM)
    }
}

fn circle_face(center: Point3, radius: f64) -> Result<Face> {
    let v = builder::vertex(Point3::new(center.x + radius, center.y, center.z));
    let wire = builder::rsweep(
        &v,
        center,
        Vector3::unit_z(),
        Rad(std::f64::consts::PI * 2.0),
    );
    Ok(builder::try_attach_plane(&[wire])?)
}

fn ensure_positive(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::InvalidParameter(format!("{name} must be > 0")));
    }
    Ok(())
}

fn ensure_count(name: &str, value: u32) -> Result<()> {
    if value == 0 {
        return Err(Error::InvalidParameter(format!("{name} must be at least 1")));
    }
    Ok(())
}
