// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed views over `solid`, `side` and `editor` classes
//!
//! Conversion reads properties by name. Required properties that are missing
//! or hold an unusable kind of value are errors; numeric fields stored as
//! unparseable text fall back to zero with a warning.
//!
//! ## Example
//!
//! ```rust,ignore
//! use vmf_lite_geometry::{solids, Winding};
//!
//! let document = vmf_lite_parser::parse_file("de_dust2.vmf")?;
//! for solid in solids(&document)? {
//!     println!("solid {} has {} vertices", solid.id, solid.vertices().len());
//! }
//! ```

use crate::vertices::{self, ExtractionOptions, HalfSpace, Tolerances, Winding};
use crate::{Error, Point3, Result};
use log::{debug, warn};
use rayon::prelude::*;
use std::sync::atomic::AtomicBool;
use vmf_lite_model::{ClassQuery, Document, GenericClass, Plane, TypedValue, UvAxis, Vec3};

const SOLID: &str = "solid";
const SIDE: &str = "side";
const EDITOR: &str = "editor";

/// Lightmap scale used when a side does not carry one
pub const DEFAULT_LIGHTMAP_SCALE: f64 = 16.0;

/// Named property lookups on one class
struct Fields<'a> {
    class: &'a GenericClass,
}

impl<'a> Fields<'a> {
    fn new(class: &'a GenericClass) -> Self {
        Self { class }
    }

    fn required(&self, key: &str) -> Result<&'a TypedValue> {
        self.class
            .property(key)
            .ok_or_else(|| Error::missing_property(&self.class.name, key))
    }

    fn mismatch(&self, key: &str, expected: &str, value: &TypedValue) -> Error {
        Error::type_mismatch(&self.class.name, key, expected, value.kind())
    }

    fn integer(&self, key: &str) -> Result<i32> {
        let value = self.required(key)?;
        match value {
            TypedValue::Integer(i) => Ok(*i),
            TypedValue::Float(f) => Ok(*f as i32),
            TypedValue::String(s) => Ok(self.lenient(key, s)),
            other => Err(self.mismatch(key, "integer", other)),
        }
    }

    fn float(&self, key: &str) -> Result<f64> {
        let value = self.required(key)?;
        match value {
            TypedValue::String(s) => Ok(self.lenient(key, s)),
            other => other
                .as_float()
                .ok_or_else(|| self.mismatch(key, "float", other)),
        }
    }

    fn float_or(&self, key: &str, default: f64) -> Result<f64> {
        match self.class.property(key) {
            Some(_) => self.float(key),
            None => Ok(default),
        }
    }

    fn integer_or(&self, key: &str, default: i32) -> Result<i32> {
        match self.class.property(key) {
            Some(_) => self.integer(key),
            None => Ok(default),
        }
    }

    fn plane(&self, key: &str) -> Result<Plane> {
        let value = self.required(key)?;
        value
            .as_plane()
            .copied()
            .ok_or_else(|| self.mismatch(key, "plane", value))
    }

    fn uv(&self, key: &str) -> Result<UvAxis> {
        let value = self.required(key)?;
        value
            .as_uv()
            .copied()
            .ok_or_else(|| self.mismatch(key, "uv", value))
    }

    fn text(&self, key: &str) -> Result<String> {
        // Numeric-looking names were typed by the parser; render them back
        self.required(key).map(ToString::to_string)
    }

    fn optional_integer(&self, key: &str) -> Option<i32> {
        match self.class.property(key)? {
            TypedValue::Integer(i) => Some(*i),
            TypedValue::String(s) => Some(self.lenient(key, s)),
            other => {
                warn!("{} '{}' is {}, ignoring it", self.class.name, key, other.kind());
                None
            }
        }
    }

    fn flag(&self, key: &str, default: bool) -> bool {
        match self.class.property(key) {
            None => default,
            Some(TypedValue::Integer(i)) => *i != 0,
            Some(TypedValue::Float(f)) => *f != 0.0,
            Some(TypedValue::String(s)) => match s.trim() {
                "true" => true,
                "false" => false,
                other => self.lenient::<i32>(key, other) != 0,
            },
            Some(other) => {
                warn!("{} '{}' is {}, using {}", self.class.name, key, other.kind(), default);
                default
            }
        }
    }

    /// Parse text as a number, falling back to zero
    fn lenient<T>(&self, key: &str, text: &str) -> T
    where
        T: std::str::FromStr + Default,
    {
        text.trim().parse().unwrap_or_else(|_| {
            warn!(
                "{} '{}' has non-numeric value {:?}, using 0",
                self.class.name, key, text
            );
            T::default()
        })
    }
}

/// One bounding plane of a solid with its surface data
#[derive(Clone, Debug, PartialEq)]
pub struct Side {
    pub id: i32,
    pub plane: Plane,
    pub material: String,
    pub u_axis: UvAxis,
    pub v_axis: UvAxis,
    pub rotation: f64,
    pub lightmap_scale: f64,
    pub smoothing_groups: i32,
}

impl TryFrom<&GenericClass> for Side {
    type Error = Error;

    /// `id`, `plane`, `material`, `uaxis` and `vaxis` are required.
    /// `rotation` and `smoothing_groups` default to 0, `lightmapscale` to 16.
    fn try_from(class: &GenericClass) -> Result<Self> {
        if !class.is(SIDE) {
            return Err(Error::unexpected_class(SIDE, &class.name));
        }
        let fields = Fields::new(class);

        Ok(Side {
            id: fields.integer("id")?,
            plane: fields.plane("plane")?,
            material: fields.text("material")?,
            u_axis: fields.uv("uaxis")?,
            v_axis: fields.uv("vaxis")?,
            rotation: fields.float_or("rotation", 0.0)?,
            lightmap_scale: fields.float_or("lightmapscale", DEFAULT_LIGHTMAP_SCALE)?,
            smoothing_groups: fields.integer_or("smoothing_groups", 0)?,
        })
    }
}

/// Editor-only metadata of a solid
#[derive(Clone, Debug, PartialEq)]
pub struct EditorInfo {
    /// Display color, 0-255 per channel
    pub color: Vec3,
    pub visgroup_id: Option<i32>,
    pub group_id: Option<i32>,
    pub visgroup_shown: bool,
    pub visgroup_auto_shown: bool,
    pub comments: String,
}

impl Default for EditorInfo {
    fn default() -> Self {
        Self {
            color: Vec3::ZERO,
            visgroup_id: None,
            group_id: None,
            visgroup_shown: true,
            visgroup_auto_shown: true,
            comments: String::new(),
        }
    }
}

impl From<&GenericClass> for EditorInfo {
    /// Every field is optional; absent or unreadable values keep their defaults
    fn from(class: &GenericClass) -> Self {
        let fields = Fields::new(class);
        let defaults = EditorInfo::default();

        let color = match class.property("color") {
            Some(TypedValue::Vector3(v)) => *v,
            Some(TypedValue::String(s)) => parse_color(s).unwrap_or_else(|| {
                warn!("editor color {:?} is not three numbers, using black", s);
                defaults.color
            }),
            Some(other) => {
                warn!("editor color is {}, using black", other.kind());
                defaults.color
            }
            None => defaults.color,
        };

        EditorInfo {
            color,
            visgroup_id: fields.optional_integer("visgroupid"),
            group_id: fields.optional_integer("groupid"),
            visgroup_shown: fields.flag("visgroupshown", defaults.visgroup_shown),
            visgroup_auto_shown: fields.flag("visgroupautoshown", defaults.visgroup_auto_shown),
            comments: class
                .property("comments")
                .map(ToString::to_string)
                .unwrap_or(defaults.comments),
        }
    }
}

fn parse_color(text: &str) -> Option<Vec3> {
    let mut parts = text.split_whitespace().map(str::parse::<f64>);
    let r = parts.next()?.ok()?;
    let g = parts.next()?.ok()?;
    let b = parts.next()?.ok()?;
    parts.next().is_none().then_some(Vec3::new(r, g, b))
}

/// A convex brush: ordered sides plus editor metadata
#[derive(Clone, Debug, PartialEq)]
pub struct Solid {
    pub id: i32,
    pub sides: Vec<Side>,
    pub editor: EditorInfo,
}

impl TryFrom<&GenericClass> for Solid {
    type Error = Error;

    fn try_from(class: &GenericClass) -> Result<Self> {
        if !class.is(SOLID) {
            return Err(Error::unexpected_class(SOLID, &class.name));
        }

        let id = Fields::new(class).integer("id")?;
        let sides = class
            .children
            .iter()
            .filter(|c| c.is(SIDE))
            .map(Side::try_from)
            .collect::<Result<Vec<_>>>()?;
        if sides.is_empty() {
            return Err(Error::missing_class(SOLID, SIDE));
        }

        let editor = class
            .child(EDITOR)
            .map(EditorInfo::from)
            .ok_or_else(|| Error::missing_class(SOLID, EDITOR))?;

        Ok(Solid { id, sides, editor })
    }
}

impl Solid {
    /// Planes of all sides, in side order
    pub fn planes(&self) -> impl Iterator<Item = &Plane> + Clone {
        self.sides.iter().map(|side| &side.plane)
    }

    /// Winding convention detected from this solid's planes
    pub fn winding(&self, tolerances: &Tolerances) -> Winding {
        vertices::detect_winding(self.planes(), tolerances)
    }

    /// Half-spaces of all sides, oriented by `options.winding`
    pub fn half_spaces(&self, options: &ExtractionOptions) -> Vec<HalfSpace> {
        vertices::half_spaces(self.planes(), options.winding, &options.tolerances)
    }

    /// Vertices with default options
    pub fn vertices(&self) -> Vec<Point3<f64>> {
        self.vertices_with(&ExtractionOptions::default())
    }

    /// Vertices with explicit options
    pub fn vertices_with(&self, options: &ExtractionOptions) -> Vec<Point3<f64>> {
        let spaces = self.half_spaces(options);
        let points = if options.parallel {
            // Without a cancel flag extraction cannot fail
            vertices::extract_vertices_with(&spaces, options, None).unwrap_or_default()
        } else {
            vertices::extract_vertices(&spaces, &options.tolerances)
        };
        debug!("solid {}: {} vertices from {} sides", self.id, points.len(), self.sides.len());
        points
    }

    /// Vertices with explicit options, abandoned once `cancel` is set
    pub fn vertices_cancellable(
        &self,
        options: &ExtractionOptions,
        cancel: &AtomicBool,
    ) -> Result<Vec<Point3<f64>>> {
        let spaces = self.half_spaces(options);
        vertices::extract_vertices_with(&spaces, options, Some(cancel))
    }
}

/// Convert every `solid` class in the document, at any depth
///
/// World brushes come first in document order, followed by brushes nested in
/// entities, as found by a depth-first walk.
pub fn solids(document: &Document) -> Result<Vec<Solid>> {
    let solids = document
        .find_classes(SOLID, true)
        .into_iter()
        .map(Solid::try_from)
        .collect::<Result<Vec<_>>>()?;
    debug!("converted {} solids", solids.len());
    Ok(solids)
}

/// Vertices of many solids, one list per solid, computed across threads
pub fn solid_vertices(solids: &[Solid], options: &ExtractionOptions) -> Vec<Vec<Point3<f64>>> {
    let per_solid = ExtractionOptions {
        parallel: false,
        ..*options
    };
    solids
        .par_iter()
        .map(|solid| solid.vertices_with(&per_solid))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertices::weld_vertices;
    use approx::assert_relative_eq;
    use vmf_lite_model::Vec4;

    fn uv() -> TypedValue {
        TypedValue::Uv(UvAxis::new(Vec4::new(1.0, 0.0, 0.0, 0.0), 0.25))
    }

    fn side(id: i32, points: [[f64; 3]; 3]) -> GenericClass {
        let plane = Plane::new(points[0].into(), points[1].into(), points[2].into());
        GenericClass::new("side")
            .with_property("id", id)
            .with_property("plane", plane)
            .with_property("material", "DEV/DEV_MEASUREGENERIC01")
            .with_property("uaxis", uv())
            .with_property("vaxis", uv())
            .with_property("rotation", 0)
            .with_property("lightmapscale", 16)
            .with_property("smoothing_groups", 0)
    }

    fn editor() -> GenericClass {
        GenericClass::new("editor")
            .with_property("color", "0 180 0")
            .with_property("visgroupshown", 1)
            .with_property("visgroupautoshown", 1)
    }

    /// Unit cube around the origin whose plane normals face outward
    fn outward_cube() -> GenericClass {
        let faces = [
            [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0]],
            [[0.0, 0.0, -1.0], [0.0, 1.0, -1.0], [1.0, 1.0, -1.0]],
            [[1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0]],
            [[-1.0, 0.0, 0.0], [-1.0, 0.0, 1.0], [-1.0, 1.0, 1.0]],
            [[0.0, 1.0, 0.0], [0.0, 1.0, 1.0], [1.0, 1.0, 1.0]],
            [[0.0, -1.0, 0.0], [1.0, -1.0, 0.0], [1.0, -1.0, 1.0]],
        ];
        faces
            .iter()
            .enumerate()
            .fold(GenericClass::new("solid").with_property("id", 7), |s, (i, f)| {
                s.with_child(side(i as i32 + 1, *f))
            })
            .with_child(editor())
    }

    const HAMMER_CUBE: &str = r#"world
{
	"id" "1"
	"classname" "worldspawn"
	solid
	{
		"id" "2"
		side
		{
			"id" "1"
			"plane" "(-64 64 64) (64 64 64) (64 -64 64)"
			"material" "DEV/DEV_MEASUREGENERIC01"
			"uaxis" "[1 0 0 0] 0.25"
			"vaxis" "[0 -1 0 0] 0.25"
			"rotation" "0"
			"lightmapscale" "16"
			"smoothing_groups" "0"
		}
		side
		{
			"id" "2"
			"plane" "(-64 -64 -64) (64 -64 -64) (64 64 -64)"
			"material" "DEV/DEV_MEASUREGENERIC01"
			"uaxis" "[1 0 0 0] 0.25"
			"vaxis" "[0 -1 0 0] 0.25"
			"rotation" "0"
			"lightmapscale" "16"
			"smoothing_groups" "0"
		}
		side
		{
			"id" "3"
			"plane" "(-64 64 64) (-64 -64 64) (-64 -64 -64)"
			"material" "DEV/DEV_MEASUREGENERIC01"
			"uaxis" "[0 1 0 0] 0.25"
			"vaxis" "[0 0 -1 0] 0.25"
			"rotation" "0"
			"lightmapscale" "16"
			"smoothing_groups" "0"
		}
		side
		{
			"id" "4"
			"plane" "(64 64 -64) (64 -64 -64) (64 -64 64)"
			"material" "DEV/DEV_MEASUREGENERIC01"
			"uaxis" "[0 1 0 0] 0.25"
			"vaxis" "[0 0 -1 0] 0.25"
			"rotation" "0"
			"lightmapscale" "16"
			"smoothing_groups" "0"
		}
		side
		{
			"id" "5"
			"plane" "(64 64 64) (-64 64 64) (-64 64 -64)"
			"material" "DEV/DEV_MEASUREGENERIC01"
			"uaxis" "[1 0 0 0] 0.25"
			"vaxis" "[0 0 -1 0] 0.25"
			"rotation" "0"
			"lightmapscale" "16"
			"smoothing_groups" "0"
		}
		side
		{
			"id" "6"
			"plane" "(64 -64 -64) (-64 -64 -64) (-64 -64 64)"
			"material" "DEV/DEV_MEASUREGENERIC01"
			"uaxis" "[1 0 0 0] 0.25"
			"vaxis" "[0 0 -1 0] 0.25"
			"rotation" "0"
			"lightmapscale" "16"
			"smoothing_groups" "0"
		}
		editor
		{
			"color" "0 180 0"
			"visgroupshown" "1"
			"visgroupautoshown" "1"
		}
	}
}
"#;

    fn corners(half: f64) -> Vec<Point3<f64>> {
        let mut out = Vec::new();
        for x in [-half, half] {
            for y in [-half, half] {
                for z in [-half, half] {
                    out.push(Point3::new(x, y, z));
                }
            }
        }
        out
    }

    fn assert_same_points(got: &[Point3<f64>], want: &[Point3<f64>]) {
        let got = weld_vertices(got, 1e-6);
        assert_eq!(got.len(), want.len());
        for w in want {
            assert!(
                got.iter().any(|g| (*g - *w).norm() < 1e-6),
                "missing vertex {:?}",
                w
            );
        }
    }

    #[test]
    fn test_side_conversion() {
        let class = side(3, [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0]]);
        let converted = Side::try_from(&class).unwrap();
        assert_eq!(converted.id, 3);
        assert_eq!(converted.material, "DEV/DEV_MEASUREGENERIC01");
        assert_relative_eq!(converted.u_axis.scale, 0.25);
        assert_relative_eq!(converted.lightmap_scale, 16.0);
        assert_eq!(converted.smoothing_groups, 0);
    }

    #[test]
    fn test_side_properties_in_any_order() {
        let class = GenericClass::new("side")
            .with_property("vaxis", uv())
            .with_property("material", "BRICK/BRICKWALL001")
            .with_property("plane", Plane::default())
            .with_property("uaxis", uv())
            .with_property("id", 9);
        let converted = Side::try_from(&class).unwrap();
        assert_eq!(converted.id, 9);
        assert_eq!(converted.material, "BRICK/BRICKWALL001");
        assert_relative_eq!(converted.rotation, 0.0);
        assert_relative_eq!(converted.lightmap_scale, DEFAULT_LIGHTMAP_SCALE);
    }

    #[test]
    fn test_side_missing_plane() {
        let class = GenericClass::new("side").with_property("id", 1);
        assert_eq!(
            Side::try_from(&class),
            Err(Error::missing_property("side", "plane"))
        );
    }

    #[test]
    fn test_side_plane_of_wrong_kind() {
        let mut class = side(1, [[0.0; 3]; 3]);
        class.properties[1].value = TypedValue::from("not a plane");
        assert_eq!(
            Side::try_from(&class),
            Err(Error::type_mismatch("side", "plane", "plane", "string"))
        );
    }

    #[test]
    fn test_non_numeric_rotation_becomes_zero() {
        let mut class = side(1, [[0.0; 3]; 3]);
        class.properties[5].value = TypedValue::from("abc");
        let converted = Side::try_from(&class).unwrap();
        assert_relative_eq!(converted.rotation, 0.0);
    }

    #[test]
    fn test_wrong_class_name() {
        assert_eq!(
            Solid::try_from(&editor()),
            Err(Error::unexpected_class("solid", "editor"))
        );
    }

    #[test]
    fn test_solid_without_editor() {
        let class = GenericClass::new("solid")
            .with_property("id", 1)
            .with_child(side(1, [[0.0; 3]; 3]));
        assert_eq!(
            Solid::try_from(&class),
            Err(Error::missing_class("solid", "editor"))
        );
    }

    #[test]
    fn test_solid_without_sides() {
        let class = GenericClass::new("solid")
            .with_property("id", 1)
            .with_child(editor());
        assert_eq!(
            Solid::try_from(&class),
            Err(Error::missing_class("solid", "side"))
        );
    }

    #[test]
    fn test_editor_info() {
        let info = EditorInfo::from(&editor().with_property("visgroupid", 4));
        assert_eq!(info.color, Vec3::new(0.0, 180.0, 0.0));
        assert_eq!(info.visgroup_id, Some(4));
        assert_eq!(info.group_id, None);
        assert!(info.visgroup_shown);
        assert!(info.visgroup_auto_shown);
        assert_eq!(info.comments, "");

        let hidden = GenericClass::new("editor")
            .with_property("visgroupshown", 0)
            .with_property("color", "red");
        let info = EditorInfo::from(&hidden);
        assert!(!info.visgroup_shown);
        assert_eq!(info.color, Vec3::ZERO);
    }

    #[test]
    fn test_cube_vertices_as_defined() {
        let solid = Solid::try_from(&outward_cube()).unwrap();
        assert_eq!(solid.id, 7);
        assert_eq!(solid.sides.len(), 6);
        assert_eq!(solid.winding(&Tolerances::default()), Winding::AsDefined);

        let options = ExtractionOptions::new().with_winding(Winding::AsDefined);
        let vertices = solid.vertices_with(&options);
        assert_eq!(vertices.len(), 8);
        assert_same_points(&vertices, &corners(1.0));
    }

    #[test]
    fn test_hammer_cube_needs_reversed_winding() {
        let document = vmf_lite_parser::parse(HAMMER_CUBE).unwrap();
        let solids = solids(&document).unwrap();
        assert_eq!(solids.len(), 1);

        let solid = &solids[0];
        assert_eq!(solid.id, 2);
        assert_eq!(solid.winding(&Tolerances::default()), Winding::Reversed);

        let defined = ExtractionOptions::new().with_winding(Winding::AsDefined);
        assert!(solid.vertices_with(&defined).is_empty());

        let vertices = solid.vertices();
        assert_eq!(vertices.len(), 8);
        assert_same_points(&vertices, &corners(64.0));
    }

    #[test]
    fn test_vertex_extraction_is_idempotent() {
        let solid = Solid::try_from(&outward_cube()).unwrap();
        assert_eq!(solid.vertices(), solid.vertices());

        let parallel = ExtractionOptions::new().with_parallel(true);
        assert_eq!(solid.vertices_with(&parallel), solid.vertices());
    }

    #[test]
    fn test_cancelled_solid() {
        let solid = Solid::try_from(&outward_cube()).unwrap();
        let cancel = AtomicBool::new(true);
        assert_eq!(
            solid.vertices_cancellable(&ExtractionOptions::default(), &cancel),
            Err(Error::Cancelled)
        );

        let go = AtomicBool::new(false);
        let vertices = solid
            .vertices_cancellable(&ExtractionOptions::default(), &go)
            .unwrap();
        assert_eq!(vertices, solid.vertices());
    }

    #[test]
    fn test_solids_found_at_any_depth() {
        let entity = GenericClass::new("entity")
            .with_property("classname", "func_detail")
            .with_child(outward_cube());
        let world = GenericClass::new("world").with_child(outward_cube());
        let document = Document::new(vec![world, entity]);

        let found = solids(&document).unwrap();
        assert_eq!(found.len(), 2);

        let all = solid_vertices(&found, &ExtractionOptions::default());
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|v| v.len() == 8));
    }

    #[test]
    fn test_degenerate_side_is_ignored() {
        let solid = Solid::try_from(&outward_cube().with_child(side(99, [[0.0; 3]; 3]))).unwrap();
        assert_eq!(solid.sides.len(), 7);
        let options = ExtractionOptions::new().with_winding(Winding::AsDefined);
        assert_eq!(solid.vertices_with(&options).len(), 8);
    }
}
