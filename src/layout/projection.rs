use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use super::{Point, point};
use crate::network::GeoPoint;

/// Tile size the map widget renders with.
pub const TILE_SIZE: f64 = 512.0;
/// Zoom used for projection, independent of the live display zoom so that the
/// layout scale does not change when the viewer zooms.
pub const PROJECTION_ZOOM: f64 = 4.0;
/// Applied to every unprojected longitude. The datasets and the map layers
/// consuming layout output expect longitudes shifted one turn west.
pub const LONGITUDE_CORRECTION: f64 = -360.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub center: GeoPoint,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(center: GeoPoint, width: f64, height: f64) -> Self {
        Self {
            center,
            width,
            height,
        }
    }
}

fn wrap_longitude(lambda: f64) -> f64 {
    if lambda.abs() > PI {
        lambda - (lambda / TAU).round() * TAU
    } else {
        lambda
    }
}

fn mercator_y(phi: f64) -> f64 {
    (FRAC_PI_4 + phi / 2.0).tan().ln()
}

/// Spherical Mercator anchored so that the viewport centre lands in the middle
/// of the display bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projector {
    scale: f64,
    center_lambda: f64,
    center_y: f64,
    translate: Point,
}

impl Projector {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            scale: (TILE_SIZE * 0.5 / PI) * 2f64.powf(PROJECTION_ZOOM),
            center_lambda: wrap_longitude(viewport.center.lng.to_radians()),
            center_y: mercator_y(viewport.center.lat.to_radians()),
            translate: point(viewport.width / 2.0, viewport.height / 2.0),
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn project(&self, geo: GeoPoint) -> Point {
        let lambda = wrap_longitude(geo.lng.to_radians());
        let y = mercator_y(geo.lat.to_radians());
        point(
            self.translate.x + self.scale * (lambda - self.center_lambda),
            self.translate.y - self.scale * (y - self.center_y),
        )
    }

    /// Exact inverse of [`Projector::project`] followed by
    /// [`LONGITUDE_CORRECTION`].
    pub fn unproject(&self, planar: Point) -> GeoPoint {
        let lambda =
            wrap_longitude((planar.x - self.translate.x) / self.scale + self.center_lambda);
        let y = self.center_y - (planar.y - self.translate.y) / self.scale;
        let phi = 2.0 * y.exp().atan() - FRAC_PI_2;
        GeoPoint::new(lambda.to_degrees() + LONGITUDE_CORRECTION, phi.to_degrees())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn canton() -> Projector {
        Projector::new(Viewport::new(GeoPoint::new(113.26, 23.13), 1440.0, 920.0))
    }

    #[test]
    fn centre_projects_to_middle_of_bounds() {
        let projected = canton().project(GeoPoint::new(113.26, 23.13));
        assert!((projected.x - 720.0).abs() < 1e-9);
        assert!((projected.y - 460.0).abs() < 1e-9);
    }

    #[test]
    fn scale_follows_fixed_zoom() {
        let expected = 256.0 / PI * 16.0;
        assert!((canton().scale() - expected).abs() < 1e-9);
    }

    #[test]
    fn north_is_up_and_east_is_right() {
        let projector = canton();
        let centre = projector.project(GeoPoint::new(113.26, 23.13));
        let north_east = projector.project(GeoPoint::new(114.0, 24.0));
        assert!(north_east.x > centre.x);
        assert!(north_east.y < centre.y);
    }

    #[test]
    fn unproject_applies_longitude_correction() {
        let projector = canton();
        let back = projector.unproject(point(720.0, 460.0));
        assert!((back.lng - (113.26 - 360.0)).abs() < 1e-9);
        assert!((back.lat - 23.13).abs() < 1e-9);
    }

    #[test]
    fn longitudes_wrap_into_one_turn() {
        let projector = canton();
        let wrapped = projector.project(GeoPoint::new(-246.74, 23.13));
        assert!((wrapped.x - 720.0).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn round_trip_recovers_coordinates(
            lng in -179.0f64..179.0,
            lat in -80.0f64..80.0,
            center_lng in -170.0f64..170.0,
            center_lat in -60.0f64..60.0,
        ) {
            let projector = Projector::new(Viewport::new(
                GeoPoint::new(center_lng, center_lat),
                1280.0,
                800.0,
            ));
            let back = projector.unproject(projector.project(GeoPoint::new(lng, lat)));
            prop_assert!((back.lng - LONGITUDE_CORRECTION - lng).abs() < 1e-7);
            prop_assert!((back.lat - lat).abs() < 1e-7);
        }
    }
}
