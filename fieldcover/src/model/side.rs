//! Vehicle sides.

/// One of the two independently controlled sides of the spreader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Left of the direction of travel.
    Left,
    /// Right of the direction of travel.
    Right,
}

impl Side {
    /// Both sides, left first.
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];

    /// Offset added to the heading to point across this side.
    pub fn bearing_offset(&self) -> f64 {
        match self {
            Side::Left => -90.0,
            Side::Right => 90.0,
        }
    }

    /// Bearing across this side for a given heading.
    pub fn bearing(&self, heading_deg: f64) -> f64 {
        heading_deg + self.bearing_offset()
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_bearings() {
        assert_eq!(Side::Left.bearing(0.0), -90.0);
        assert_eq!(Side::Right.bearing(0.0), 90.0);
        assert_eq!(Side::Right.bearing(270.0), 360.0);
    }

    #[test]
    fn test_side_display() {
        assert_eq!(format!("{}", Side::Left), "left");
        assert_eq!(format!("{}", Side::Right), "right");
    }
}
