/// Loader for the vertex/face subset of the Wavefront OBJ format
use std::fs;
use std::path::Path;

use nalgebra::Point3;
use nom::{
    bytes::complete::take_till1,
    character::complete::{char, digit1, space0},
    combinator::{all_consuming, map_res, opt, rest},
    number::complete::float,
    sequence::{pair, preceded},
    IResult,
};
use tracing::{debug, info};

use crate::error::{MeshError, MeshResult};
use crate::geometry::{Face, Mesh};

/// One classified line of an OBJ file
#[derive(Debug, Clone, PartialEq)]
enum Record {
    Vertex(Point3<f32>),
    Face(Face),
    Ignored,
}

/// Read and parse the mesh at `path`
pub fn load(path: impl AsRef<Path>) -> MeshResult<Mesh> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| MeshError::Resource {
        path: path.to_path_buf(),
        source,
    })?;

    let mesh = parse_obj(&text)?;
    info!(
        path = %path.display(),
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "loaded mesh"
    );
    Ok(mesh)
}

/// Parse OBJ text into an indexed mesh.
///
/// Only `v` and `f` records are understood; every other line is skipped.
pub fn parse_obj(input: &str) -> MeshResult<Mesh> {
    let mut vertices = Vec::new();
    let mut faces = Vec::new();
    let mut ignored = 0usize;

    for (number, line) in input.lines().enumerate() {
        match parse_line(number + 1, line)? {
            Record::Vertex(vertex) => vertices.push(vertex),
            Record::Face(face) => faces.push(face),
            Record::Ignored => ignored += 1,
        }
    }

    debug!(ignored, "skipped unsupported OBJ lines");
    Mesh::new(vertices, faces)
}

fn parse_line(line: usize, text: &str) -> MeshResult<Record> {
    let Ok((body, keyword)) = parse_keyword(text) else {
        return Ok(Record::Ignored);
    };

    match keyword {
        "v" => parse_vertex(line, text, body).map(Record::Vertex),
        "f" => parse_face(line, text, body).map(Record::Face),
        _ => Ok(Record::Ignored),
    }
}

/// First whitespace-delimited token of a line
fn parse_keyword(input: &str) -> IResult<&str, &str> {
    preceded(space0, take_till1(|c: char| c.is_whitespace()))(input)
}

fn parse_vertex(line: usize, text: &str, body: &str) -> MeshResult<Point3<f32>> {
    let mut coords = Vec::with_capacity(4);
    for token in body.split_whitespace() {
        let value = match all_consuming(float::<_, nom::error::Error<&str>>)(token) {
            Ok((_, value)) if value.is_finite() => value,
            _ => {
                return Err(MeshError::parse(
                    line,
                    text,
                    format!("invalid vertex coordinate `{token}`"),
                ))
            }
        };
        coords.push(value);
    }

    // x y z with an optional w weight that plays no part in rendering
    match coords.as_slice() {
        [x, y, z] | [x, y, z, _] => Ok(Point3::new(*x, *y, *z)),
        _ => Err(MeshError::parse(
            line,
            text,
            format!("vertex needs 3 coordinates, found {}", coords.len()),
        )),
    }
}

fn parse_face(line: usize, text: &str, body: &str) -> MeshResult<Face> {
    let mut indices = Vec::with_capacity(3);
    for token in body.split_whitespace() {
        let index = match parse_vertex_ref(token) {
            Ok((_, index)) if index > 0 => index - 1,
            Ok(_) => {
                return Err(MeshError::parse(
                    line,
                    text,
                    "vertex references are 1-based, found `0`",
                ))
            }
            Err(_) => {
                return Err(MeshError::parse(
                    line,
                    text,
                    format!("invalid vertex reference `{token}`"),
                ))
            }
        };
        indices.push(index);
    }

    match indices.as_slice() {
        &[a, b, c] => Ok(Face::new(a, b, c)),
        refs if refs.len() > 3 => Err(MeshError::FaceArity {
            line,
            count: refs.len(),
        }),
        refs => Err(MeshError::TooFewFaceRefs {
            line,
            count: refs.len(),
        }),
    }
}

/// `index[/texcoord[/normal]]`, keeping only the position index
fn parse_vertex_ref(input: &str) -> IResult<&str, u32> {
    let (input, (index, _)) = all_consuming(pair(
        map_res(digit1, str::parse::<u32>),
        opt(preceded(char('/'), rest)),
    ))(input)?;
    Ok((input, index))
}
