//! End-to-end frame: track the device, cull world points and pick one by tapping

use approx::assert_relative_eq;
use arspatial::constants::{DEG2RAD, EARTH_RADIUS};
use arspatial::location::TrackerSettings;
use arspatial::model::{BillboardModel, MeshModel};
use arspatial::picking::calculate_view_frustum_bounding_box;
use arspatial::scene::{pick_world_point, radar_blips, visible_points};
use arspatial::{
    GeodeticCoordinate, LocationTracker, PlatformReading, ReadingUpdate, Renderable, ViewSettings,
    Viewport, WorldLocation, WorldPoint,
};
use nalgebra::{Matrix4, Point3, Vector2, Vector3};

fn point_above(height: f64, title: &str) -> WorldPoint {
    WorldPoint::new(
        WorldLocation::new(GeodeticCoordinate::new(0.0, 0.0), EARTH_RADIUS + height).unwrap(),
    )
    .with_metadata("title", title)
}

#[test]
fn test_track_cull_and_pick() {
    let mut tracker = LocationTracker::new(TrackerSettings::default()).unwrap();
    assert_eq!(
        tracker
            .update_location(PlatformReading::new(0.0, 0.0, 0.0).with_accuracy(5.0))
            .unwrap(),
        ReadingUpdate::Applied
    );
    tracker.update_heading(0.0).unwrap();
    let origin = tracker.world_location().unwrap().clone();

    let cube = MeshModel::new(
        "cube",
        vec![Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0)],
    );
    let points = vec![
        point_above(1.0, "too close").with_model(cube.clone()),
        point_above(40.0, "far balloon").with_model(BillboardModel::new(3.0, 3.0)),
        point_above(15.0, "near balloon").with_model(cube),
        point_above(5000.0, "beyond range").with_model(BillboardModel::new(100.0, 100.0)),
    ];

    let settings = ViewSettings::default();
    let visible = visible_points(&origin, &points, &settings);
    assert_eq!(visible, vec![1, 2]);
    let candidates: Vec<WorldPoint> = visible.iter().map(|&i| points[i].clone()).collect();

    // Look straight up (+z is up at latitude 0, longitude 0)
    let projection = Matrix4::new_perspective(1.0, 60.0 * DEG2RAD as f32, 0.5, 1000.0);
    let view = Matrix4::look_at_rh(&Point3::origin(), &Point3::new(0.0, 0.0, 1.0), &Vector3::y());
    let viewport = Viewport::new(0.0, 0.0, 320.0, 320.0);

    let picked = pick_world_point(
        &projection,
        &view,
        viewport,
        &origin,
        Vector2::new(160.0, 160.0),
        &candidates,
    )
    .unwrap()
    .map(|i| candidates[i].title().unwrap().to_string());
    assert_eq!(picked.as_deref(), Some("near balloon"));

    // Every visible point lies inside the frustum's bounding box
    let frustum = calculate_view_frustum_bounding_box(&projection, &view, viewport).unwrap();
    for point in &candidates {
        let sphere = point.bounding_sphere_from(&origin).unwrap();
        assert!(frustum.contains(&sphere.center));
    }

    // All points are overhead, so they sit at the center of the radar
    let blips = radar_blips(&origin, &candidates, settings.maximum_distance);
    assert_eq!(blips.inside.len(), 2);
    for blip in blips.inside {
        assert!(blip.norm() < 1e-3);
    }
}

#[test]
fn test_walking_updates_relative_positions() {
    let settings = TrackerSettings {
        location_smoothing: 1.0,
        ..TrackerSettings::default()
    };
    let mut tracker = LocationTracker::new(settings).unwrap();
    let landmark = point_above(0.0, "landmark");

    tracker.update_location(PlatformReading::new(0.0, -0.001, 0.0)).unwrap();
    let before = tracker
        .world_location()
        .unwrap()
        .relative_position_of(&landmark.location);
    assert!(before.x > 100.0, "landmark should be east: {:?}", before);

    tracker.update_location(PlatformReading::new(0.0, 0.0, 0.0)).unwrap();
    let after = tracker
        .world_location()
        .unwrap()
        .relative_position_of(&landmark.location);
    assert_relative_eq!(after, Vector3::zeros(), epsilon = 1e-6);
}

#[test]
fn test_model_bounds_feed_fit_to_frustum() {
    use arspatial::picking::scale_factor_to_fit_frustum;

    let identity = Matrix4::identity();
    let frustum =
        calculate_view_frustum_bounding_box(&identity, &identity, Viewport::new(0.0, 0.0, 10.0, 10.0))
            .unwrap();

    let banner = BillboardModel::new(8.0, 1.0);
    let scale = scale_factor_to_fit_frustum(&frustum, &banner.bounding_box()).unwrap();
    assert_relative_eq!(scale, 0.25);
}
