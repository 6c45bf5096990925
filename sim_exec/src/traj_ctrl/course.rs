//! # Course
//!
//! The course is the fixed, ordered list of waypoints the vehicle tracks. It
//! is read-only for the duration of a run.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use nalgebra::Vector2;
use serde::Serialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An ordered, non-empty sequence of waypoints in a planar metric frame.
#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct Course {
    points_m: Vec<Vector2<f64>>,
}

// -----------------------------------------------------------------------------------------------
// ENUMS
// -----------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CourseError {
    #[error("Attempted to create a course with no waypoints")]
    Empty,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Course {
    /// Create a course from its waypoints.
    pub fn new(points_m: Vec<Vector2<f64>>) -> Result<Self, CourseError> {
        if points_m.is_empty() {
            return Err(CourseError::Empty);
        }

        Ok(Self { points_m })
    }

    /// Create a course from `[x, y]` pairs, as found in parameter files.
    pub fn from_xy(points: &[[f64; 2]]) -> Result<Self, CourseError> {
        Self::new(points.iter().map(|p| Vector2::new(p[0], p[1])).collect())
    }

    /// Get the number of points in the course
    pub fn get_num_points(&self) -> usize {
        self.points_m.len()
    }

    /// Index of the final waypoint.
    pub fn last_index(&self) -> usize {
        self.points_m.len() - 1
    }

    pub fn get_point(&self, index: usize) -> Option<Vector2<f64>> {
        self.points_m.get(index).copied()
    }

    pub fn points(&self) -> &[Vector2<f64>] {
        &self.points_m
    }

    /// Return the length of the course in meters, the sum of the distances
    /// between consecutive waypoints.
    pub fn get_length(&self) -> f64 {
        self.points_m
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).norm())
            .sum()
    }

    /// Index of the waypoint closest to the given position.
    ///
    /// Ties go to the lowest index.
    pub fn nearest_index(&self, position_m: &Vector2<f64>) -> usize {
        let mut nearest = 0;
        let mut nearest_dist_m = (self.points_m[0] - position_m).norm();

        for (i, point) in self.points_m.iter().enumerate().skip(1) {
            let dist_m = (point - position_m).norm();
            if dist_m < nearest_dist_m {
                nearest = i;
                nearest_dist_m = dist_m;
            }
        }

        nearest
    }

    /// Walk forward from `start_index`, accumulating the distance between
    /// consecutive waypoints, and return the first index at which the
    /// accumulated distance reaches `look_ahead_m`.
    ///
    /// The walk stops at the last waypoint if the course ends first.
    pub fn look_ahead_index(&self, start_index: usize, look_ahead_m: f64) -> usize {
        let mut index = start_index;
        let mut dist_m = 0f64;

        while dist_m < look_ahead_m && index + 1 < self.points_m.len() {
            dist_m += (self.points_m[index + 1] - self.points_m[index]).norm();
            index += 1;

            trace!("Look-ahead walk at index {}, accumulated {:.3} m", index, dist_m);
        }

        index
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn l_course() -> Course {
        Course::from_xy(&[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0]]).unwrap()
    }

    #[test]
    fn test_empty_course() {
        assert_eq!(Course::new(Vec::new()), Err(CourseError::Empty));
        assert_eq!(Course::from_xy(&[]), Err(CourseError::Empty));
    }

    #[test]
    fn test_single_point_course() {
        let course = Course::from_xy(&[[3.0, 4.0]]).unwrap();

        assert_eq!(course.last_index(), 0);
        assert_eq!(course.get_length(), 0.0);
        assert_eq!(course.nearest_index(&Vector2::new(100.0, -7.0)), 0);
        assert_eq!(course.look_ahead_index(0, 5.0), 0);
    }

    #[test]
    fn test_length() {
        assert_eq!(l_course().get_length(), 20.0);
        assert_eq!(l_course().get_point(2), Some(Vector2::new(10.0, 10.0)));
        assert_eq!(l_course().get_point(3), None);
    }

    #[test]
    fn test_nearest_index() {
        let course = l_course();

        assert_eq!(course.nearest_index(&Vector2::new(1.0, 1.0)), 0);
        assert_eq!(course.nearest_index(&Vector2::new(9.0, 1.0)), 1);
        assert_eq!(course.nearest_index(&Vector2::new(11.0, 8.0)), 2);

        // Equidistant from both ends of the first leg, the first occurrence wins
        assert_eq!(course.nearest_index(&Vector2::new(5.0, 0.0)), 0);

        // Duplicate waypoints resolve to the earlier one
        let dup = Course::from_xy(&[[0.0, 0.0], [2.0, 0.0], [2.0, 0.0]]).unwrap();
        assert_eq!(dup.nearest_index(&Vector2::new(2.0, 0.1)), 1);
    }

    #[test]
    fn test_look_ahead_index() {
        let course = Course::from_xy(&[
            [0.0, 0.0],
            [0.5, 0.0],
            [1.0, 0.0],
            [1.5, 0.0],
            [3.0, 0.0],
        ])
        .unwrap();

        // Exactly reaching the look-ahead distance stops the walk
        assert_eq!(course.look_ahead_index(0, 1.0), 2);

        // The first point at or beyond the look-ahead is chosen, even when an
        // earlier one is closer to the look-ahead distance
        assert_eq!(course.look_ahead_index(0, 1.6), 4);

        // Zero look-ahead doesn't move
        assert_eq!(course.look_ahead_index(1, 0.0), 1);

        // Running off the end stops at the last point
        assert_eq!(course.look_ahead_index(2, 100.0), 4);
    }
}
