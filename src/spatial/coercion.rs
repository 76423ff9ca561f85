//! Geometry variant handling for partition and clip results
//!
//! Boolean operations can degenerate into lines, several disjoint parts or
//! nothing at all. Every result is carried as a [`Geometry`] variant and
//! either flattened into polygons or coerced into exactly one polygon, with
//! anything else reported as [`GenerationError::UnsupportedGeometry`].

use crate::io::error::{GenerationError, Result};
use geo::{BooleanOps, Geometry, GeometryCollection, LineString, MultiPolygon, Polygon};

/// Short name of a geometry variant for diagnostics
pub const fn kind_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "point",
        Geometry::Line(_) => "line",
        Geometry::LineString(_) => "line string",
        Geometry::Polygon(_) => "polygon",
        Geometry::MultiPoint(_) => "multi point",
        Geometry::MultiLineString(_) => "multi line string",
        Geometry::MultiPolygon(_) => "multi polygon",
        Geometry::GeometryCollection(_) => "geometry collection",
        Geometry::Rect(_) => "rectangle",
        Geometry::Triangle(_) => "triangle",
    }
}

/// Whether the geometry has no coordinates at all
pub fn is_empty(geometry: &Geometry<f64>) -> bool {
    match geometry {
        Geometry::LineString(line) => line.0.is_empty(),
        Geometry::Polygon(polygon) => polygon.exterior().0.is_empty(),
        Geometry::MultiPoint(points) => points.0.is_empty(),
        Geometry::MultiLineString(lines) => lines.0.iter().all(|line| line.0.is_empty()),
        Geometry::MultiPolygon(polygons) => polygons
            .0
            .iter()
            .all(|polygon| polygon.exterior().0.is_empty()),
        Geometry::GeometryCollection(collection) => collection.0.iter().all(is_empty),
        Geometry::Point(_) | Geometry::Line(_) | Geometry::Rect(_) | Geometry::Triangle(_) => false,
    }
}

/// Collapse a boolean-operation result into the narrowest variant
///
/// No parts becomes an empty collection and a single part a plain polygon.
pub fn from_multi_polygon(multi: MultiPolygon<f64>) -> Geometry<f64> {
    let MultiPolygon(mut parts) = multi;
    match parts.len() {
        0 => Geometry::GeometryCollection(GeometryCollection(Vec::new())),
        1 => parts.pop().map_or_else(
            || Geometry::GeometryCollection(GeometryCollection(Vec::new())),
            Geometry::Polygon,
        ),
        _ => Geometry::MultiPolygon(MultiPolygon(parts)),
    }
}

/// Intersection of two polygons as a single geometry variant
pub fn intersection(first: &Polygon<f64>, second: &Polygon<f64>) -> Geometry<f64> {
    from_multi_polygon(first.intersection(second))
}

/// Intersection of three polygons, evaluated left to right
pub fn intersection3(
    first: &Polygon<f64>,
    second: &Polygon<f64>,
    third: &Polygon<f64>,
) -> Geometry<f64> {
    from_multi_polygon(first.intersection(second).intersection(third))
}

/// Force a clip result back into one polygon
///
/// Polygons pass through; lines and line strings are closed into rings.
///
/// # Errors
///
/// Returns `EmptyResult` for empty geometries and `UnsupportedGeometry` for
/// every other variant, including multi-part results
pub fn coerce_to_polygon(geometry: Geometry<f64>, stage: &'static str) -> Result<Polygon<f64>> {
    if is_empty(&geometry) {
        return Err(GenerationError::EmptyResult { stage });
    }

    match geometry {
        Geometry::Polygon(polygon) => Ok(polygon),
        Geometry::LineString(mut line) => {
            if !line.is_closed() {
                line.close();
            }
            Ok(Polygon::new(line, vec![]))
        }
        Geometry::Line(line) => {
            let mut ring = LineString::from(vec![line.start, line.end]);
            ring.close();
            Ok(Polygon::new(ring, vec![]))
        }
        other => Err(GenerationError::UnsupportedGeometry {
            stage,
            kind: kind_name(&other),
        }),
    }
}

/// Recursively flatten collections into their leaf polygons
///
/// # Errors
///
/// Returns `UnsupportedGeometry` on the first leaf that is not a polygon
pub fn flatten_polygons(geometry: Geometry<f64>, stage: &'static str) -> Result<Vec<Polygon<f64>>> {
    let mut polygons = Vec::new();
    flatten_into(geometry, stage, &mut polygons)?;
    Ok(polygons)
}

fn flatten_into(
    geometry: Geometry<f64>,
    stage: &'static str,
    polygons: &mut Vec<Polygon<f64>>,
) -> Result<()> {
    match geometry {
        Geometry::Polygon(polygon) => polygons.push(polygon),
        Geometry::MultiPolygon(MultiPolygon(parts)) => polygons.extend(parts),
        Geometry::GeometryCollection(GeometryCollection(children)) => {
            for child in children {
                flatten_into(child, stage, polygons)?;
            }
        }
        other => {
            return Err(GenerationError::UnsupportedGeometry {
                stage,
                kind: kind_name(&other),
            });
        }
    }
    Ok(())
}
