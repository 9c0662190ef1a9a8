//! Integration tests for the load -> normals -> buffers pipeline.

use std::fs;
use std::path::PathBuf;

use meshview_core::{
    compute_normals, load, load_buffers, parse_obj, ErrorKind, Face, MeshBuffers, MeshError,
};
use nalgebra::{Point3, Vector3};

fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

fn write_temp(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("meshview-{}-{name}", std::process::id()));
    fs::write(&path, contents).unwrap();
    path
}

// ─── Scenarios ────────────────────────────────────────────────

#[test]
fn single_triangle_scenario() {
    let mesh = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
    assert_eq!(
        mesh.vertices(),
        &[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    );
    assert_eq!(mesh.faces(), &[Face::new(0, 1, 2)]);

    let normals = compute_normals(&mesh).unwrap();
    assert_eq!(normals, vec![Vector3::z(); 3]);
}

#[test]
fn slash_decorated_refs_match_plain_refs() {
    let plain = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
    let decorated = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1/1/1 2/2/2 3/3/3\n").unwrap();
    assert_eq!(plain, decorated);
}

#[test]
fn first_source_index_maps_to_vertex_zero() {
    let mesh = parse_obj("v 5 5 5\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 3 4\n").unwrap();
    assert_eq!(mesh.faces()[0].indices()[0], 0);

    let triangle = mesh.triangle(0).unwrap();
    assert_eq!(triangle.corners[0], Point3::new(5.0, 5.0, 5.0));
}

#[test]
fn degenerate_triangle_never_yields_nan() {
    let mesh = parse_obj("v 0 0 0\nv 1 1 1\nv 2 2 2\nf 1 2 3\n").unwrap();
    let err = compute_normals(&mesh).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Geometry);
    assert!(matches!(err, MeshError::DegenerateFace { face: 0 }));

    assert!(MeshBuffers::from_mesh(&mesh).is_err());
}

#[test]
fn empty_file_yields_empty_buffers() {
    let path = write_temp("empty.obj", "# nothing here\n\n");
    let buffers = load_buffers(&path).unwrap();
    fs::remove_file(&path).ok();

    assert!(buffers.positions().is_empty());
    assert!(buffers.indices().is_empty());
    assert!(buffers.normals().is_empty());
}

// ─── File loading ─────────────────────────────────────────────

#[test]
fn missing_file_is_a_resource_error() {
    let err = load(data_path("does-not-exist.obj")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Resource);
    assert!(err.to_string().contains("does-not-exist.obj"));
}

#[test]
fn tetrahedron_normals_point_outward() {
    let mesh = load(data_path("tetrahedron.obj")).unwrap();
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.face_count(), 4);

    let normals = compute_normals(&mesh).unwrap();
    assert_eq!(normals.len(), 12);

    for (face, triangle) in mesh.triangles().enumerate() {
        let centroid = triangle
            .corners
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords)
            / 3.0;
        for corner in 0..3 {
            let n = normals[face * 3 + corner];
            assert!((n.norm() - 1.0).abs() < 1e-5);
            assert!(n.dot(&centroid) > 0.0, "face {face} points inward");
        }
    }
}

#[test]
fn loading_is_deterministic() {
    let first = load_buffers(data_path("tetrahedron.obj")).unwrap();
    let second = load_buffers(data_path("tetrahedron.obj")).unwrap();

    assert_eq!(first.indices(), second.indices());
    let bits = |v: &[f32]| v.iter().map(|f| f.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(first.positions()), bits(second.positions()));
    assert_eq!(bits(first.normals()), bits(second.normals()));
}

#[test]
fn quad_file_is_rejected_not_truncated() {
    let path = write_temp(
        "quad.obj",
        "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
    );
    let err = load_buffers(&path).unwrap_err();
    fs::remove_file(&path).ok();

    assert_eq!(err.kind(), ErrorKind::Parse);
    assert!(matches!(err, MeshError::FaceArity { line: 5, count: 4 }));
}
