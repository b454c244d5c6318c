mod common;

use mvt::{GeomEncoder, GeomType as MvtGeomType, Tile as MvtTile};
use serde_json::json;
use vt_reader::{GeoJsonGeometry, Tile, TileProjection};

use common::{
    encode_lines, encode_points, encode_rings, feature, layer, single_feature_tile, string_value,
    tile,
};

const COLUMN: u32 = 8801;
const ROW: u32 = 5371;
const ZOOM: u8 = 14;

fn assert_close(actual: [f64; 2], expected: [f64; 2]) {
    assert!(
        (actual[0] - expected[0]).abs() < 1e-6 && (actual[1] - expected[1]).abs() < 1e-6,
        "{actual:?} != {expected:?}"
    );
}

fn create_point_tile() -> Vec<u8> {
    let mut tile = MvtTile::new(4096);
    let layer = tile.create_layer("poi");
    let geom = GeomEncoder::new(MvtGeomType::Point)
        .point(3898.0, 1731.0)
        .expect("point")
        .encode()
        .expect("encode");
    let mut feature = layer.into_feature(geom);
    feature.add_tag_string("name", "Mauerpark");
    let layer = feature.into_layer();
    tile.add_layer(layer).expect("add poi");
    tile.to_bytes().expect("tile bytes")
}

#[test]
fn projection_matches_known_location() {
    let projection = TileProjection::new(4096, COLUMN, ROW, ZOOM);
    let lonlat = projection.project(vt_reader::Point { x: 3898, y: 1731 });
    assert_close(lonlat, [13.402258, 52.543989]);
}

#[test]
fn projection_maps_tile_zero_corners() {
    let projection = TileProjection::new(4096, 0, 0, 0);
    let center = projection.project(vt_reader::Point { x: 2048, y: 2048 });
    assert_close(center, [0.0, 0.0]);
    let corner = projection.project(vt_reader::Point { x: 0, y: 0 });
    assert!((corner[0] + 180.0).abs() < 1e-9);
    assert!((corner[1] - 85.0511287798).abs() < 1e-6);
}

#[test]
fn single_point_feature_is_a_point() {
    let data = create_point_tile();
    let tile = Tile::new(&data).expect("decode");
    let feature = tile.layer("poi").unwrap().feature(0).expect("feature");
    let geojson = feature.to_geojson(COLUMN, ROW, ZOOM).expect("geojson");

    match geojson.geometry {
        Some(GeoJsonGeometry::Point(coord)) => assert_close(coord, [13.402258, 52.543989]),
        other => panic!("expected point, got {other:?}"),
    }
    assert_eq!(geojson.properties["name"].as_str(), Some("Mauerpark"));
    assert_eq!(geojson.id, None);
}

#[test]
fn several_points_make_a_multipoint() {
    let data = single_feature_tile(1, &encode_points(&[(0, 0), (4096, 4096), (2048, 2048)]));
    let tile = Tile::new(&data).expect("decode");
    let feature = tile.layer("test").unwrap().feature(0).expect("feature");
    let geojson = feature.to_geojson(0, 0, 0).expect("geojson");

    let geometry = geojson.geometry.expect("geometry");
    match geometry {
        GeoJsonGeometry::MultiPoint(coords) => {
            assert_eq!(coords.len(), 3);
            assert_close(coords[2], [0.0, 0.0]);
        }
        other => panic!("expected multipoint, got {other:?}"),
    }
    assert_eq!(geojson.id.as_deref(), Some("1"));
}

#[test]
fn lines_pick_single_or_multi() {
    let single = single_feature_tile(2, &encode_lines(&[&[(0, 0), (10, 10)]]));
    let tile = Tile::new(&single).expect("decode");
    let geojson = tile.layer("test").unwrap().feature(0).unwrap().to_geojson(0, 0, 1).unwrap();
    assert!(matches!(geojson.geometry, Some(GeoJsonGeometry::LineString(_))));

    let multi = single_feature_tile(2, &encode_lines(&[&[(0, 0), (10, 10)], &[(20, 20), (30, 5)]]));
    let tile = Tile::new(&multi).expect("decode");
    let geojson = tile.layer("test").unwrap().feature(0).unwrap().to_geojson(0, 0, 1).unwrap();
    match geojson.geometry {
        Some(GeoJsonGeometry::MultiLineString(lines)) => assert_eq!(lines.len(), 2),
        other => panic!("expected multilinestring, got {other:?}"),
    }
}

#[test]
fn polygons_pick_single_or_multi() {
    let outer_a: &[(i32, i32)] = &[(0, 0), (10, 0), (10, 10), (0, 10)];
    let hole_a: &[(i32, i32)] = &[(2, 2), (2, 4), (4, 4), (4, 2)];
    let outer_b: &[(i32, i32)] = &[(20, 0), (30, 0), (30, 10), (20, 10)];

    let single = single_feature_tile(3, &encode_rings(&[outer_a, hole_a]));
    let tile = Tile::new(&single).expect("decode");
    let geojson = tile.layer("test").unwrap().feature(0).unwrap().to_geojson(0, 0, 0).unwrap();
    match geojson.geometry {
        Some(GeoJsonGeometry::Polygon(rings)) => {
            assert_eq!(rings.len(), 2);
            assert_eq!(rings[0].len(), 5);
            assert_eq!(rings[0].first(), rings[0].last());
        }
        other => panic!("expected polygon, got {other:?}"),
    }

    let multi = single_feature_tile(3, &encode_rings(&[outer_a, hole_a, outer_b]));
    let tile = Tile::new(&multi).expect("decode");
    let geojson = tile.layer("test").unwrap().feature(0).unwrap().to_geojson(0, 0, 0).unwrap();
    match geojson.geometry {
        Some(GeoJsonGeometry::MultiPolygon(polygons)) => {
            assert_eq!(polygons.len(), 2);
            assert_eq!(polygons[0].len(), 2);
            assert_eq!(polygons[1].len(), 1);
        }
        other => panic!("expected multipolygon, got {other:?}"),
    }
}

#[test]
fn unknown_geometry_has_null_geometry() {
    let data = single_feature_tile(0, &encode_points(&[(1, 1)]));
    let tile = Tile::new(&data).expect("decode");
    let geojson = tile.layer("test").unwrap().feature(0).unwrap().to_geojson(0, 0, 0).unwrap();
    assert!(geojson.geometry.is_none());

    let value = serde_json::to_value(&geojson).expect("json");
    assert_eq!(value["geometry"], serde_json::Value::Null);
}

#[test]
fn feature_serializes_as_geojson() {
    let data = tile(&[layer(
        "test",
        Some(4096),
        &["kind"],
        &[string_value("bench")],
        &[feature(Some(99), &[0, 0], 1, &encode_points(&[(2048, 2048)]))],
    )]);
    let tile = Tile::new(&data).expect("decode");
    let geojson = tile.layer("test").unwrap().feature(0).unwrap().to_geojson(0, 0, 0).unwrap();

    let value = serde_json::to_value(&geojson).expect("json");
    assert_eq!(value["type"], "Feature");
    assert_eq!(value["id"], "99");
    assert_eq!(value["properties"], json!({ "kind": "bench" }));
    assert_eq!(value["geometry"]["type"], "Point");
    let coords = value["geometry"]["coordinates"]
        .as_array()
        .expect("coordinates");
    assert_eq!(coords.len(), 2);
    assert!(coords[0].as_f64().unwrap().abs() < 1e-9);
    assert!(coords[1].as_f64().unwrap().abs() < 1e-9);
}

#[test]
fn layer_to_geojson_collects_all_features() {
    let data = create_point_tile();
    let tile = Tile::new(&data).expect("decode");
    let collection = tile
        .layer("poi")
        .unwrap()
        .to_geojson(COLUMN, ROW, ZOOM)
        .expect("collection");
    assert_eq!(collection.features.len(), 1);

    let value = serde_json::to_value(&collection).expect("json");
    assert_eq!(value["type"], "FeatureCollection");
    assert_eq!(value["features"][0]["type"], "Feature");
}
