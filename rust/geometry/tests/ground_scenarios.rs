// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use approx::assert_relative_eq;
use ground3d_core::{GroundBounds, HomeModel, Level, LevelId, PieceOfFurniture, Point, Room, Wall};
use ground3d_geometry::bool2d::ring_perimeter;
use ground3d_geometry::{Area, GroundGenerator, GroundGeometry};

const EPS: f64 = 1e-3;

fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<Point> {
    vec![[min_x, min_y], [max_x, min_y], [max_x, max_y], [min_x, max_y]]
}

fn area(points: &[Point]) -> Area {
    Area::from_points(points)
}

/// 20 m square ground, small enough to be handled as a single detailed part
fn small_home() -> HomeModel {
    HomeModel::new(GroundBounds::new(-1000.0, -1000.0, 2000.0, 2000.0))
}

fn ground_area(home: &HomeModel) -> Area {
    Area::from_bounds(&home.ground.to_bounds())
}

fn generate(home: &HomeModel) -> GroundGeometry {
    GroundGenerator::default().generate(home).unwrap()
}

/// Faces at one elevation never overlap each other
fn assert_no_overlap(geometry: &GroundGeometry, elevation: f64) {
    let sum: f64 = geometry.faces_at(elevation).map(|face| face.measure()).sum();
    assert_relative_eq!(sum, geometry.area_at(elevation).measure(), epsilon = EPS);
}

fn basement(home: &mut HomeModel, id: u32, elevation: f64) -> LevelId {
    let id = LevelId(id);
    home.levels.push(Level::new(id, format!("Level {}", elevation), elevation, 250.0, 12.0));
    id
}

#[test]
fn test_flat_ground_is_one_rectangle() {
    let home = small_home();
    let geometry = generate(&home);

    assert_eq!(geometry.faces.len(), 1);
    assert!(geometry.skirts.is_empty());
    let face = &geometry.faces[0];
    assert_eq!(face.elevation, 0.0);
    assert!(face.profile.holes.is_empty());
    assert!(geometry.area_at(0.0).same_region(&ground_area(&home), EPS));
}

#[test]
fn test_large_ground_is_split_without_gap() {
    let home = HomeModel::new(GroundBounds::default());
    let geometry = generate(&home);

    // Plain outer part and detailed part around the origin
    assert_eq!(geometry.faces.len(), 2);
    assert!(geometry.area_at(0.0).same_region(&ground_area(&home), 1.0));
    assert_no_overlap(&geometry, 0.0);
}

#[test]
fn test_visible_room_is_cut_from_ground() {
    let mut home = small_home();
    let room = rect(0.0, 0.0, 300.0, 200.0);
    home.rooms.push(Room::new(room.clone()));

    let geometry = generate(&home);
    let expected = ground_area(&home).subtract(&area(&room));
    assert!(geometry.area_at(0.0).same_region(&expected, EPS));
    assert!(geometry.area_at(0.0).intersect(&area(&room)).measure() < EPS);
    assert!(geometry.skirts.is_empty());
}

#[test]
fn test_room_with_hidden_floor_keeps_ground() {
    let mut home = small_home();
    home.rooms.push(Room::new(rect(0.0, 0.0, 300.0, 200.0)).with_floor_visible(false));

    let geometry = generate(&home);
    assert!(geometry.area_at(0.0).same_region(&ground_area(&home), EPS));
}

#[test]
fn test_buried_furniture_digs_open_pit() {
    let mut home = small_home();
    let level = basement(&mut home, 1, -50.0);
    let footprint = rect(100.0, 100.0, 200.0, 200.0);
    home.furniture
        .push(PieceOfFurniture::new(footprint.clone(), -50.0).with_level(level));

    let geometry = generate(&home);
    let pit = area(&footprint);

    assert!(geometry.area_at(-50.0).same_region(&pit, EPS));
    assert!(geometry
        .area_at(0.0)
        .same_region(&ground_area(&home).subtract(&pit), EPS));
    // No ceiling over an open pit
    assert!(geometry.area_at(0.0).intersect(&pit).measure() < EPS);

    assert_eq!(geometry.skirts.len(), 4);
    for quad in &geometry.skirts {
        assert_eq!(quad.base, -50.0);
        assert_eq!(quad.top, 0.0);
    }
    // Skirts follow the pit outline edge for edge
    let perimeter: f64 = geometry.skirts.iter().map(|q| q.width()).sum();
    let outline: f64 = pit.decompose().iter().map(|ring| ring_perimeter(&ring.points)).sum();
    assert_relative_eq!(perimeter, outline, epsilon = EPS);
    assert_relative_eq!(outline, 400.0, epsilon = EPS);
}

#[test]
fn test_buried_courtyard_gets_ceiling() {
    let mut home = small_home();
    let level = basement(&mut home, 1, -50.0);
    // Four pieces around a 1 m courtyard
    for footprint in [
        rect(0.0, 0.0, 300.0, 100.0),
        rect(0.0, 200.0, 300.0, 300.0),
        rect(0.0, 100.0, 100.0, 200.0),
        rect(200.0, 100.0, 300.0, 200.0),
    ] {
        home.furniture
            .push(PieceOfFurniture::new(footprint, -50.0).with_level(level));
    }

    let geometry = generate(&home);
    let outline = area(&rect(0.0, 0.0, 300.0, 300.0));
    let courtyard = area(&rect(100.0, 100.0, 200.0, 200.0));

    let ground = geometry.area_at(0.0);
    assert!(ground.same_region(&ground_area(&home).subtract(&outline).union(&courtyard), EPS));
    // The courtyard is capped, not left as an open pit
    assert!(courtyard.subtract(&ground).measure() < EPS);
    assert_no_overlap(&geometry, 0.0);

    assert!(geometry
        .area_at(-50.0)
        .same_region(&outline.subtract(&courtyard), EPS));

    // Skirts around the outline and around the courtyard
    let perimeter: f64 = geometry.skirts.iter().map(|q| q.width()).sum();
    assert_relative_eq!(perimeter, 1200.0 + 400.0, epsilon = EPS);
}

#[test]
fn test_wall_loop_digs_its_outline() {
    let mut home = small_home();
    let level = basement(&mut home, 1, -50.0);
    for wall in [
        Wall::new(rect(-10.0, -10.0, 410.0, 10.0)),
        Wall::new(rect(390.0, -10.0, 410.0, 410.0)),
        Wall::new(rect(-10.0, 390.0, 410.0, 410.0)),
        Wall::new(rect(-10.0, -10.0, 10.0, 410.0)),
    ] {
        home.walls.push(wall.with_level(level));
    }
    home.furniture.push(
        PieceOfFurniture::new(rect(150.0, 150.0, 250.0, 250.0), -50.0).with_level(level),
    );

    let geometry = generate(&home);
    let outline = area(&rect(-10.0, -10.0, 410.0, 410.0));

    // The loop interior is dug down to the level, open to the sky
    assert!(geometry.area_at(-50.0).same_region(&outline, EPS));
    assert!(geometry
        .area_at(0.0)
        .same_region(&ground_area(&home).subtract(&outline), EPS));
}

#[test]
fn test_generation_is_idempotent() {
    let mut home = small_home();
    let level = basement(&mut home, 1, -120.0);
    home.rooms.push(Room::new(rect(0.0, 0.0, 400.0, 300.0)));
    home.rooms.push(Room::new(rect(-500.0, -500.0, -100.0, -200.0)).with_level(level));
    home.furniture.push(
        PieceOfFurniture::new(rect(500.0, 500.0, 600.0, 550.0), -120.0).with_level(level),
    );

    let generator = GroundGenerator::default();
    let first = generator.generate(&home).unwrap();
    let second = generator.generate(&home).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_mesh(), second.to_mesh());
}

#[test]
fn test_decomposed_rings_rebuild_generated_area() {
    let mut home = small_home();
    home.rooms.push(Room::new(rect(0.0, 0.0, 400.0, 300.0)));
    home.rooms.push(Room::new(rect(600.0, 600.0, 700.0, 900.0)));

    let ground = generate(&home).area_at(0.0);
    let mut rebuilt = Area::new();
    for ring in ground.decompose() {
        if ring.is_hole() {
            rebuilt.remove(&ring.to_area());
        } else {
            rebuilt.add(&ring.to_area());
        }
    }
    assert!(rebuilt.same_region(&ground, EPS));
}

#[test]
fn test_stacked_basements_open_column() {
    let mut home = small_home();
    let upper = basement(&mut home, 1, -30.0);
    let lower = basement(&mut home, 2, -60.0);
    let column = rect(0.0, 0.0, 400.0, 400.0);
    home.rooms.push(Room::new(column.clone()).with_level(upper));
    home.rooms.push(Room::new(column.clone()).with_level(lower));

    let geometry = generate(&home);
    let column = area(&column);

    assert!(geometry
        .area_at(0.0)
        .same_region(&ground_area(&home).subtract(&column), EPS));
    // Both floors are drawn by the rooms themselves
    assert_eq!(geometry.faces_at(-30.0).count(), 0);
    assert_eq!(geometry.faces_at(-60.0).count(), 0);
    // No ceiling anywhere over the column
    assert!(geometry.area_at(0.0).intersect(&column).measure() < EPS);

    let upper_skirts: Vec<_> = geometry.skirts.iter().filter(|q| q.base == -30.0).collect();
    let lower_skirts: Vec<_> = geometry.skirts.iter().filter(|q| q.base == -60.0).collect();
    assert!(upper_skirts.iter().all(|q| q.top == 0.0));
    assert!(lower_skirts.iter().all(|q| q.top == -30.0));
    let upper_perimeter: f64 = upper_skirts.iter().map(|q| q.width()).sum();
    let lower_perimeter: f64 = lower_skirts.iter().map(|q| q.width()).sum();
    assert_relative_eq!(upper_perimeter, 1600.0, epsilon = EPS);
    assert_relative_eq!(lower_perimeter, 1600.0, epsilon = EPS);
}

#[test]
fn test_deeper_shaft_through_basement_floor() {
    let mut home = small_home();
    let upper = basement(&mut home, 1, -30.0);
    let lower = basement(&mut home, 2, -60.0);
    let pit = rect(0.0, 0.0, 100.0, 100.0);
    let shaft = rect(40.0, 40.0, 44.0, 44.0);
    home.furniture.push(PieceOfFurniture::new(pit.clone(), -30.0).with_level(upper));
    home.furniture.push(PieceOfFurniture::new(shaft.clone(), -60.0).with_level(lower));

    let geometry = generate(&home);
    let (pit, shaft) = (area(&pit), area(&shaft));

    assert!(geometry
        .area_at(0.0)
        .same_region(&ground_area(&home).subtract(&pit), EPS));
    assert!(geometry.area_at(-30.0).same_region(&pit.subtract(&shaft), EPS));
    assert!(geometry.area_at(-60.0).same_region(&shaft, EPS));
    assert_no_overlap(&geometry, 0.0);
}

#[test]
fn test_nested_holes_over_three_levels() {
    let mut home = small_home();
    let first = basement(&mut home, 1, -30.0);
    let second = basement(&mut home, 2, -60.0);
    let third = basement(&mut home, 3, -90.0);

    // Ring of rooms around a buried courtyard at -30
    for footprint in [
        rect(0.0, 0.0, 300.0, 100.0),
        rect(0.0, 200.0, 300.0, 300.0),
        rect(0.0, 100.0, 100.0, 200.0),
        rect(200.0, 100.0, 300.0, 200.0),
    ] {
        home.rooms
            .push(Room::new(footprint).with_level(first).with_floor_visible(false));
    }
    // A pit under the courtyard, and a shaft at the bottom of that pit
    let pit = rect(120.0, 120.0, 180.0, 180.0);
    let shaft = rect(140.0, 140.0, 160.0, 160.0);
    home.furniture.push(PieceOfFurniture::new(pit.clone(), -60.0).with_level(second));
    home.furniture.push(PieceOfFurniture::new(shaft.clone(), -90.0).with_level(third));

    let geometry = generate(&home);
    let outline = area(&rect(0.0, 0.0, 300.0, 300.0));
    let courtyard = area(&rect(100.0, 100.0, 200.0, 200.0));
    let (pit, shaft) = (area(&pit), area(&shaft));

    // Only the courtyard gets a ceiling
    assert!(geometry
        .area_at(0.0)
        .same_region(&ground_area(&home).subtract(&outline).union(&courtyard), EPS));
    assert_no_overlap(&geometry, 0.0);

    assert!(geometry
        .area_at(-30.0)
        .same_region(&outline.subtract(&courtyard), EPS));
    // The shaft hole in the pit floor opens on the deeper level: no ceiling
    assert!(geometry.area_at(-60.0).same_region(&pit.subtract(&shaft), EPS));
    assert!(geometry.area_at(-90.0).same_region(&shaft, EPS));
    for elevation in [-30.0, -60.0, -90.0] {
        assert_no_overlap(&geometry, elevation);
    }
}

#[test]
fn test_levels_at_same_elevation_make_no_extra_skirt() {
    let mut home = small_home();
    let a = basement(&mut home, 1, -50.0);
    let b = basement(&mut home, 2, -50.0);
    home.furniture
        .push(PieceOfFurniture::new(rect(0.0, 0.0, 100.0, 100.0), -50.0).with_level(a));
    home.furniture
        .push(PieceOfFurniture::new(rect(100.0, 0.0, 200.0, 100.0), -50.0).with_level(b));

    let geometry = generate(&home);
    assert!(geometry
        .area_at(-50.0)
        .same_region(&area(&rect(0.0, 0.0, 200.0, 100.0)), EPS));
    let perimeter: f64 = geometry.skirts.iter().map(|q| q.width()).sum();
    assert_relative_eq!(perimeter, 600.0, epsilon = EPS);
}
