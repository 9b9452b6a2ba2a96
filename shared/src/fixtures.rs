//! Tiny two-state topology and matching table used across the unit tests.
//!
//! Quantized grid with one unit per degree, origin at (-120, 34):
//! California spans x 0..2, Nevada x 2..4, both y 0..4. Counties are 2x2
//! squares: 06037 (0,0), 32003 (2,0), 32001 (2,2) and an id-less county at
//! (0,2). The two states share arc 4, the x = 2 border.

pub(crate) const TOPOLOGY: &str = r#"{
  "type": "Topology",
  "transform": { "scale": [1, 1], "translate": [-120, 34] },
  "objects": {
    "counties": {
      "type": "GeometryCollection",
      "geometries": [
        { "type": "Polygon", "id": "06037", "arcs": [[0]] },
        { "type": "Polygon", "id": 32003, "arcs": [[1]] },
        { "type": "MultiPolygon", "id": "32001", "arcs": [[[2]]] },
        { "type": "Polygon", "arcs": [[3]] },
        { "type": "Point", "coordinates": [1, 1] }
      ]
    },
    "states": {
      "type": "GeometryCollection",
      "geometries": [
        { "type": "Polygon", "id": "06", "arcs": [[4, 5]] },
        { "type": "Polygon", "id": "32", "arcs": [[6, -5]] }
      ]
    }
  },
  "arcs": [
    [[0, 0], [2, 0], [0, 2], [-2, 0], [0, -2]],
    [[2, 0], [2, 0], [0, 2], [-2, 0], [0, -2]],
    [[2, 2], [2, 0], [0, 2], [-2, 0], [0, -2]],
    [[0, 2], [2, 0], [0, 2], [-2, 0], [0, -2]],
    [[2, 0], [0, 4]],
    [[2, 4], [-2, 0], [0, -4], [2, 0]],
    [[2, 0], [2, 0], [0, 4], [-2, 0]]
  ]
}"#;

pub(crate) const TABLE: &str = "\
id,density,county_name,state_name
32003,42,Clark,Nevada
32001,abc,Churchill,Nevada
06037,2420.3,Los Angeles,California
";
