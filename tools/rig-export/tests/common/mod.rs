//! Scene fixtures shared by the integration tests

#![allow(dead_code)]

use serde_json::{json, Value};
use std::path::{Path, PathBuf};

pub const IDENTITY: [f32; 16] = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// Skinned quad bound to a two-joint leg with a pass-through offset node
/// between the joints.
///
/// ```text
/// scene
/// |- hip (joint 0)
/// |  `- offset (pass-through, translate 0 2 0)
/// |     `- knee (joint 1)
/// `- body (controller "rig" -> geometry "body")
/// ```
pub fn skinned_scene() -> Value {
    json!({
        "root": 0,
        "nodes": [
            { "name": "scene", "children": [1, 4] },
            { "name": "hip", "children": [2],
              "transforms": [
                { "type": "translate", "sid": "translate", "value": [0, 1, 0] },
                { "type": "rotate", "sid": "rotateZ", "axis": [0, 0, 1], "angle": 0 }
              ] },
            { "name": "offset", "children": [3],
              "transforms": [ { "type": "translate", "value": [0, 2, 0] } ] },
            { "name": "knee",
              "transforms": [ { "type": "translate", "sid": "translate", "value": [0, 1, 0] } ] },
            { "name": "body", "instances": [ { "controller": 0 } ] }
        ],
        "geometries": [{
            "name": "body",
            "texture": "art/textures/body.png",
            "positions": { "stride": 3, "data": [0, 0, 0, 1, 0, 0, 1, 1, 0, 0, 1, 0] },
            "normals": { "stride": 3, "data": [0, 0, 1] },
            "texcoords": { "stride": 2, "data": [0, 0, 1, 0, 1, 1, 0, 1] },
            "submeshes": [{
                "positions": [0, 1, 2, 3],
                "normals": [0, 0, 0, 0],
                "texcoords": [0, 1, 2, 3],
                "face_vertex_counts": [4]
            }]
        }],
        "controllers": [{
            "name": "rig",
            "geometry": 0,
            "bind_shape_matrix": IDENTITY,
            "joints": [
                { "node": 1, "inverse_bind_matrix": IDENTITY },
                { "node": 3, "inverse_bind_matrix": IDENTITY }
            ],
            "influences": [
                [[0, 0.25], [1, 0.75]],
                [[0, 0.0], [1, 0.0]],
                [[1, 1.0]],
                []
            ]
        }],
        "animations": [
            { "target": "knee/rotateZ",
              "curves": [ { "keys": [
                { "time": 0.0, "value": 0.0, "in_tangent": [-0.25, 0.0], "out_tangent": [0.25, 0.0] },
                { "time": 1.0, "value": 45.0, "in_tangent": [0.75, 45.0], "out_tangent": [1.25, 45.0] }
              ] } ] },
            { "target": "knee/translate",
              "curves": [
                { "keys": [ { "time": 0.0, "value": 0.0 } ] },
                { "keys": [ { "time": 0.0, "value": 0.0 } ] },
                { "keys": [ { "time": 0.0, "value": 0.0 } ] }
              ] },
            { "target": "hip/translate",
              "curves": [
                { "keys": [ { "time": 0.0, "value": 0.0 } ] },
                { "keys": [ { "time": 0.0, "value": 1.0 } ] },
                { "keys": [ { "time": 0.0, "value": 0.0 } ] }
              ] }
        ]
    })
}

pub fn write_scene(dir: &Path, scene: &Value) -> PathBuf {
    let path = dir.join("scene.json");
    std::fs::write(&path, serde_json::to_string_pretty(scene).unwrap())
        .expect("Failed to write scene");
    path
}
