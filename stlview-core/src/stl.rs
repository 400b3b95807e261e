/// STL file parser for binary and ASCII formats
use nalgebra::{Point3, Vector3};
use nom::{
    bytes::complete::{tag, take},
    character::complete::{multispace0, multispace1, not_line_ending, space0},
    combinator::{map, opt},
    multi::{count, many0},
    number::complete::{float, le_f32, le_u16, le_u32},
    sequence::{preceded, tuple},
    IResult,
};

use crate::error::StlError;
use crate::geometry::{Mesh, Triangle, Vertex};

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh, StlError> {
    if data.len() < HEADER_LEN + 4 {
        return Err(StlError::TooShort(data.len()));
    }

    let (body, declared) = binary_preamble(data).map_err(|_| StlError::TooShort(data.len()))?;
    let declared = declared as usize;
    let available = body.len() / FACET_LEN;
    if declared > available {
        return Err(StlError::Truncated {
            declared,
            available,
        });
    }

    let (_, triangles) = count(binary_facet, declared)(body).map_err(|_| StlError::Truncated {
        declared,
        available,
    })?;
    Ok(Mesh { triangles })
}

fn binary_preamble(input: &[u8]) -> IResult<&[u8], u32> {
    preceded(take(HEADER_LEN), le_u32)(input)
}

fn binary_facet(input: &[u8]) -> IResult<&[u8], Triangle> {
    let (input, normal) = binary_vector(input)?;
    let (input, (a, b, c)) = tuple((binary_vector, binary_vector, binary_vector))(input)?;
    let (input, _attribute_bytes) = le_u16(input)?;

    let vertex = |p: Vector3<f32>| Vertex::at(Point3::from(p), normal);
    Ok((input, Triangle::new(vertex(a), vertex(b), vertex(c))))
}

fn binary_vector(input: &[u8]) -> IResult<&[u8], Vector3<f32>> {
    map(tuple((le_f32, le_f32, le_f32)), |(x, y, z)| {
        Vector3::new(x, y, z)
    })(input)
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Mesh, StlError> {
    match ascii_solid(input) {
        Ok((_, mesh)) => Ok(mesh),
        Err(e) => Err(StlError::Ascii(describe(e))),
    }
}

fn describe(err: nom::Err<nom::error::Error<&str>>) -> String {
    match err {
        nom::Err::Incomplete(_) => "unexpected end of input".to_string(),
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            let line: String = e.input.chars().take_while(|c| *c != '\n').take(40).collect();
            format!("{:?} near {:?}", e.code, line.trim())
        }
    }
}

fn ascii_solid(input: &str) -> IResult<&str, Mesh> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _name) = preceded(space0, not_line_ending)(input)?;
    let (input, triangles) = many0(ascii_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    let (input, _) = opt(preceded(space0, not_line_ending))(input)?;

    Ok((input, Mesh { triangles }))
}

fn ascii_facet(input: &str) -> IResult<&str, Triangle> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, normal) = ascii_vector(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, (a, b, c)) = tuple((ascii_vertex, ascii_vertex, ascii_vertex))(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    let vertex = |p: Vector3<f32>| Vertex::at(Point3::from(p), normal);
    Ok((input, Triangle::new(vertex(a), vertex(b), vertex(c))))
}

fn ascii_vertex(input: &str) -> IResult<&str, Vector3<f32>> {
    preceded(preceded(multispace0, tag("vertex")), ascii_vector)(input)
}

fn ascii_vector(input: &str) -> IResult<&str, Vector3<f32>> {
    let (input, x) = preceded(multispace0, float)(input)?;
    let (input, y) = preceded(multispace1, float)(input)?;
    let (input, z) = preceded(multispace1, float)(input)?;
    Ok((input, Vector3::new(x, y, z)))
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Detect and parse STL file (binary or ASCII).
///
/// A UTF-8 byte order mark and leading whitespace are skipped before looking
/// for the "solid" keyword. Binary files are allowed to start with "solid" in
/// their header, so a failed ASCII parse falls back to the binary reader.
pub fn parse_stl(data: &[u8]) -> Result<Mesh, StlError> {
    let text = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let text = text.trim_ascii_start();
    if text.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(text) {
            match parse_ascii_stl(text) {
                Ok(mesh) => return Ok(mesh),
                Err(e) => log::debug!("not ASCII STL ({e}), trying binary"),
            }
        }
    }

    parse_binary_stl(data)
}
