//! Reader for the restricted scene-description dialect: a top-level
//! array of flat objects, each introduced by a `"type"` key. The dialect
//! looks like JSON but is not one — strings are bare printable ASCII
//! with no escapes, the only nesting is the three-element vector, and
//! every diagnostic carries a line number.

use std::fs;
use std::iter::Peekable;
use std::path::Path;
use std::str::Chars;

use log::debug;

use crate::error::{Error, Result};
use crate::math::Point3;
use crate::scene::{Camera, Light, Scene, Surface, MAX_OBJECTS};

const MAX_STRING_LEN: usize = 128;

pub fn load_scene(path: &Path) -> Result<Scene> {
    let source = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_scene(&source)
}

pub fn parse_scene(source: &str) -> Result<Scene> {
    Parser::new(source).parse()
}

enum ParsedObject {
    Camera(Camera),
    Surface(Surface),
    Light(Light),
}

struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Parser {
            chars: source.chars().peekable(),
            line: 1,
        }
    }

    fn parse(mut self) -> Result<Scene> {
        let mut camera: Option<Camera> = None;
        let mut surfaces = Vec::new();
        let mut lights = Vec::new();

        self.skip_ws();
        self.expect_c('[')?;
        self.skip_ws();
        if self.chars.peek() == Some(&']') {
            self.chars.next();
        } else {
            loop {
                self.expect_c('{')?;
                match self.parse_object()? {
                    ParsedObject::Camera(c) => {
                        if camera.is_some() {
                            return Err(self.err("scene defines more than one camera"));
                        }
                        camera = Some(c);
                    }
                    ParsedObject::Surface(s) => {
                        if surfaces.len() >= MAX_OBJECTS {
                            return Err(Error::CapacityExceeded {
                                kind: "surface",
                                limit: MAX_OBJECTS,
                            });
                        }
                        surfaces.push(s);
                    }
                    ParsedObject::Light(l) => {
                        if lights.len() >= MAX_OBJECTS {
                            return Err(Error::CapacityExceeded {
                                kind: "light",
                                limit: MAX_OBJECTS,
                            });
                        }
                        lights.push(l);
                    }
                }
                self.skip_ws();
                match self.next_c()? {
                    ',' => self.skip_ws(),
                    ']' => break,
                    _ => return Err(self.err("expected ',' or ']' after an object")),
                }
            }
        }

        let camera = match camera {
            Some(camera) => camera,
            None => return Err(self.err("scene does not define a camera")),
        };
        debug!(
            "parsed {} surfaces and {} lights",
            surfaces.len(),
            lights.len()
        );
        Ok(Scene {
            camera,
            surfaces,
            lights,
        })
    }

    /// Parses one object body. The opening `{` has been consumed; the
    /// first key must be `"type"` and decides how the rest is routed.
    fn parse_object(&mut self) -> Result<ParsedObject> {
        self.skip_ws();
        let key = self.next_string()?;
        if key != "type" {
            return Err(self.err("expected \"type\" as the first key of an object"));
        }
        self.skip_ws();
        self.expect_c(':')?;
        self.skip_ws();
        let kind = self.next_string()?;
        match kind.as_str() {
            "camera" => self.parse_camera().map(ParsedObject::Camera),
            "plane" => self.parse_plane().map(ParsedObject::Surface),
            "sphere" => self.parse_sphere().map(ParsedObject::Surface),
            "light" => self.parse_light().map(ParsedObject::Light),
            other => Err(self.err(format!("unknown object type \"{}\"", other))),
        }
    }

    fn parse_camera(&mut self) -> Result<Camera> {
        let mut width = None;
        let mut height = None;
        while let Some(key) = self.next_field()? {
            match key.as_str() {
                "width" => width = Some(self.next_number()?),
                "height" => height = Some(self.next_number()?),
                other => {
                    return Err(self.err(format!("unknown camera property \"{}\"", other)));
                }
            }
        }
        let width = width.ok_or_else(|| self.err("camera is missing its width"))?;
        let height = height.ok_or_else(|| self.err("camera is missing its height"))?;
        if width <= 0.0 || height <= 0.0 {
            return Err(self.err("camera width and height must be positive"));
        }
        Ok(Camera {
            center: Point3::ORIGIN,
            width,
            height,
        })
    }

    fn parse_plane(&mut self) -> Result<Surface> {
        let mut position = [0.0; 3];
        let mut normal = [0.0; 3];
        let mut color = [0.0; 3];
        let mut diffuse = [0.0; 3];
        let mut specular = [0.0; 3];
        while let Some(key) = self.next_field()? {
            match key.as_str() {
                "position" => position = self.next_vector()?,
                "normal" => normal = self.next_vector()?,
                "color" => color = self.next_vector()?,
                "diffuse_color" => diffuse = self.next_vector()?,
                "specular_color" => specular = self.next_vector()?,
                "radius" => return Err(self.err("radius is only valid on a sphere")),
                other => {
                    return Err(self.err(format!("unknown plane property \"{}\"", other)));
                }
            }
        }
        Ok(Surface::Plane {
            center: position.into(),
            normal: normal.into(),
            color: color.into(),
            diffuse: diffuse.into(),
            specular: specular.into(),
        })
    }

    fn parse_sphere(&mut self) -> Result<Surface> {
        let mut position = [0.0; 3];
        let mut radius = None;
        let mut color = [0.0; 3];
        let mut diffuse = [0.0; 3];
        let mut specular = [0.0; 3];
        while let Some(key) = self.next_field()? {
            match key.as_str() {
                "position" => position = self.next_vector()?,
                "radius" => radius = Some(self.next_number()?),
                "color" => color = self.next_vector()?,
                "diffuse_color" => diffuse = self.next_vector()?,
                "specular_color" => specular = self.next_vector()?,
                other => {
                    return Err(self.err(format!("unknown sphere property \"{}\"", other)));
                }
            }
        }
        let radius = radius.ok_or_else(|| self.err("sphere is missing its radius"))?;
        if radius <= 0.0 {
            return Err(self.err("sphere radius must be positive"));
        }
        // sphere positions store a negated vertical component: the input
        // and internal spaces disagree on that axis for spheres only
        let center = Point3::new(position[0], -position[1], position[2]);
        Ok(Surface::Sphere {
            center,
            radius,
            color: color.into(),
            diffuse: diffuse.into(),
            specular: specular.into(),
        })
    }

    fn parse_light(&mut self) -> Result<Light> {
        let mut position = [0.0; 3];
        let mut color = [0.0; 3];
        let mut direction = [0.0; 3];
        let mut radial = [1.0, 0.0, 0.0];
        let mut angular_a0 = 0.0;
        let mut theta = 0.0;
        while let Some(key) = self.next_field()? {
            match key.as_str() {
                "position" => position = self.next_vector()?,
                "color" => color = self.next_vector()?,
                "direction" => direction = self.next_vector()?,
                "radial-a0" => radial[0] = self.next_number()?,
                "radial-a1" => radial[1] = self.next_number()?,
                "radial-a2" => radial[2] = self.next_number()?,
                "angular-a0" => angular_a0 = self.next_number()?,
                "theta" => theta = self.next_number()?,
                other => {
                    return Err(self.err(format!("unknown light property \"{}\"", other)));
                }
            }
        }
        Ok(Light {
            position: position.into(),
            color: color.into(),
            radial,
            angular_a0,
            direction: direction.into(),
            theta,
        })
    }

    /// Steps to the next `key:` inside an object, or `None` at the
    /// closing `}`.
    fn next_field(&mut self) -> Result<Option<String>> {
        self.skip_ws();
        match self.next_c()? {
            '}' => Ok(None),
            ',' => {
                self.skip_ws();
                let key = self.next_string()?;
                self.skip_ws();
                self.expect_c(':')?;
                self.skip_ws();
                Ok(Some(key))
            }
            _ => Err(self.err("expected ',' or '}' inside an object")),
        }
    }

    fn err(&self, message: impl Into<String>) -> Error {
        Error::Format {
            line: self.line,
            message: message.into(),
        }
    }

    fn next_c(&mut self) -> Result<char> {
        match self.chars.next() {
            Some(c) => {
                if c == '\n' {
                    self.line += 1;
                }
                Ok(c)
            }
            None => Err(self.err("unexpected end of file")),
        }
    }

    fn skip_ws(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if !c.is_whitespace() {
                break;
            }
            if c == '\n' {
                self.line += 1;
            }
            self.chars.next();
        }
    }

    fn expect_c(&mut self, expected: char) -> Result<()> {
        let c = self.next_c()?;
        if c == expected {
            Ok(())
        } else {
            Err(self.err(format!("expected '{}', found '{}'", expected, c)))
        }
    }

    fn next_string(&mut self) -> Result<String> {
        if self.next_c()? != '"' {
            return Err(self.err("expected a string"));
        }
        let mut buffer = String::new();
        loop {
            let c = self.next_c()?;
            if c == '"' {
                return Ok(buffer);
            }
            if buffer.len() >= MAX_STRING_LEN {
                return Err(self.err(format!(
                    "strings longer than {} characters are not supported",
                    MAX_STRING_LEN
                )));
            }
            if c == '\\' {
                return Err(self.err("strings with escape codes are not supported"));
            }
            if !(' '..='~').contains(&c) {
                return Err(self.err("strings may contain only printable ascii characters"));
            }
            buffer.push(c);
        }
    }

    fn next_number(&mut self) -> Result<f64> {
        let mut buffer = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E') {
                buffer.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        buffer.parse().map_err(|_| self.err("expected a number"))
    }

    fn next_vector(&mut self) -> Result<[f64; 3]> {
        let mut v = [0.0; 3];
        self.expect_c('[')?;
        self.skip_ws();
        v[0] = self.next_number()?;
        self.skip_ws();
        self.expect_c(',')?;
        self.skip_ws();
        v[1] = self.next_number()?;
        self.skip_ws();
        self.expect_c(',')?;
        self.skip_ws();
        v[2] = self.next_number()?;
        self.skip_ws();
        self.expect_c(']')?;
        Ok(v)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::{RGBColor, Vec3};

    fn parse(source: &str) -> Result<Scene> {
        parse_scene(source)
    }

    fn format_error(result: Result<Scene>) -> (usize, String) {
        match result {
            Err(Error::Format { line, message }) => (line, message),
            other => panic!("expected a format error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_minimal_scene() {
        let scene = parse(
            r#"[
                {"type": "camera", "width": 0.7, "height": 0.5},
                {"type": "sphere", "position": [0, 1, 5], "radius": 2,
                 "color": [1, 0, 0], "diffuse_color": [1, 0, 0], "specular_color": [0.5, 0.5, 0.5]},
                {"type": "plane", "position": [0, -1, 0], "normal": [0, 1, 0],
                 "color": [0, 1, 0], "diffuse_color": [0, 1, 0], "specular_color": [0, 0, 0]},
                {"type": "light", "position": [1, 2, 3], "color": [2, 2, 2],
                 "radial-a0": 1, "radial-a1": 0.5, "radial-a2": 0.125,
                 "angular-a0": 2, "direction": [0, -1, 0], "theta": 0.5}
            ]"#,
        )
        .expect("scene must parse");

        assert_eq!(scene.camera.width, 0.7);
        assert_eq!(scene.camera.height, 0.5);
        assert_eq!(scene.camera.center, Point3::ORIGIN);
        assert_eq!(scene.surfaces.len(), 2);
        assert_eq!(scene.lights.len(), 1);

        let light = &scene.lights[0];
        assert_eq!(light.position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(light.radial, [1.0, 0.5, 0.125]);
        assert_eq!(light.angular_a0, 2.0);
        assert_eq!(light.direction, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(light.theta, 0.5);
    }

    #[test]
    fn test_sphere_position_flips_vertical_axis() {
        let scene = parse(
            r#"[{"type": "camera", "width": 1, "height": 1},
                {"type": "sphere", "position": [1, 2, 3], "radius": 1}]"#,
        )
        .unwrap();
        match scene.surfaces[0] {
            Surface::Sphere { center, .. } => assert_eq!(center, Point3::new(1.0, -2.0, 3.0)),
            Surface::Plane { .. } => panic!("expected a sphere"),
        }
    }

    #[test]
    fn test_plane_position_is_unmodified() {
        let scene = parse(
            r#"[{"type": "camera", "width": 1, "height": 1},
                {"type": "plane", "position": [1, 2, 3], "normal": [0, 1, 0]}]"#,
        )
        .unwrap();
        match scene.surfaces[0] {
            Surface::Plane { center, .. } => assert_eq!(center, Point3::new(1.0, 2.0, 3.0)),
            Surface::Sphere { .. } => panic!("expected a plane"),
        }
    }

    #[test]
    fn test_omitted_fields_default() {
        let scene = parse(
            r#"[{"type": "camera", "width": 1, "height": 1},
                {"type": "sphere", "radius": 1},
                {"type": "light", "position": [0, 0, 0]}]"#,
        )
        .unwrap();
        assert_eq!(scene.surfaces[0].base_color(), RGBColor::ZERO);
        let light = &scene.lights[0];
        assert_eq!(light.radial, [1.0, 0.0, 0.0]);
        assert_eq!(light.theta, 0.0);
    }

    #[test]
    fn test_radius_on_plane_is_rejected() {
        let (_, message) = format_error(parse(
            r#"[{"type": "camera", "width": 1, "height": 1},
                {"type": "plane", "radius": 1}]"#,
        ));
        assert!(message.contains("radius"));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let (_, message) =
            format_error(parse(r#"[{"type": "cone", "radius": 1}]"#));
        assert!(message.contains("cone"));
    }

    #[test]
    fn test_unknown_property_is_rejected() {
        let (_, message) = format_error(parse(
            r#"[{"type": "sphere", "radius": 1, "glow": [1, 1, 1]}]"#,
        ));
        assert!(message.contains("glow"));
    }

    #[test]
    fn test_missing_type_key_is_rejected() {
        let (_, message) = format_error(parse(r#"[{"radius": 1}]"#));
        assert!(message.contains("type"));
    }

    #[test]
    fn test_missing_camera_is_rejected() {
        let (_, message) = format_error(parse(r#"[{"type": "sphere", "radius": 1}]"#));
        assert!(message.contains("camera"));
    }

    #[test]
    fn test_empty_scene_is_missing_its_camera() {
        assert!(parse("[]").is_err());
    }

    #[test]
    fn test_duplicate_camera_is_rejected() {
        let (_, message) = format_error(parse(
            r#"[{"type": "camera", "width": 1, "height": 1},
                {"type": "camera", "width": 2, "height": 2}]"#,
        ));
        assert!(message.contains("camera"));
    }

    #[test]
    fn test_camera_requires_positive_extent() {
        assert!(parse(r#"[{"type": "camera", "width": 0, "height": 1}]"#).is_err());
        assert!(parse(r#"[{"type": "camera", "width": 1}]"#).is_err());
    }

    #[test]
    fn test_sphere_requires_positive_radius() {
        assert!(parse(
            r#"[{"type": "camera", "width": 1, "height": 1},
                {"type": "sphere", "radius": -1}]"#
        )
        .is_err());
        assert!(parse(
            r#"[{"type": "camera", "width": 1, "height": 1},
                {"type": "sphere", "position": [0, 0, 5]}]"#
        )
        .is_err());
    }

    #[test]
    fn test_overlong_string_is_rejected() {
        let source = format!(r#"[{{"type": "{}"}}]"#, "x".repeat(150));
        let (_, message) = format_error(parse(&source));
        assert!(message.contains("128"));
    }

    #[test]
    fn test_escape_codes_are_rejected() {
        assert!(parse(r#"[{"type": "sph\nere"}]"#).is_err());
    }

    #[test]
    fn test_non_ascii_string_is_rejected() {
        let (_, message) = format_error(parse(r#"[{"type": "sphère"}]"#));
        assert!(message.contains("ascii"));
    }

    #[test]
    fn test_missing_number_is_rejected() {
        let (_, message) = format_error(parse(
            r#"[{"type": "camera", "width": , "height": 1}]"#,
        ));
        assert!(message.contains("number"));
    }

    #[test]
    fn test_short_vector_is_rejected() {
        assert!(parse(
            r#"[{"type": "camera", "width": 1, "height": 1},
                {"type": "sphere", "radius": 1, "position": [1, 2]}]"#
        )
        .is_err());
    }

    #[test]
    fn test_unterminated_array_is_rejected() {
        let (_, message) = format_error(parse(
            r#"[{"type": "camera", "width": 1, "height": 1}"#,
        ));
        assert!(message.contains("end of file"));
    }

    #[test]
    fn test_error_reports_the_offending_line() {
        let (line, _) = format_error(parse(
            "[\n{\"type\": \"camera\", \"width\": 1, \"height\": 1},\n{\"type\": \"cone\"}\n]",
        ));
        assert_eq!(line, 3);
    }

    #[test]
    fn test_surface_capacity_is_enforced() {
        let mut source = String::from(r#"[{"type": "camera", "width": 1, "height": 1}"#);
        for _ in 0..MAX_OBJECTS + 1 {
            source.push_str(r#", {"type": "sphere", "radius": 1, "position": [0, 0, 5]}"#);
        }
        source.push(']');
        assert!(matches!(
            parse(&source),
            Err(Error::CapacityExceeded { kind: "surface", .. })
        ));
    }

    #[test]
    fn test_light_capacity_is_enforced() {
        let mut source = String::from(r#"[{"type": "camera", "width": 1, "height": 1}"#);
        for _ in 0..MAX_OBJECTS + 1 {
            source.push_str(r#", {"type": "light", "position": [0, 0, 0]}"#);
        }
        source.push(']');
        assert!(matches!(
            parse(&source),
            Err(Error::CapacityExceeded { kind: "light", .. })
        ));
    }

    #[test]
    fn test_scientific_notation_numbers() {
        let scene = parse(
            r#"[{"type": "camera", "width": 1e0, "height": 2.5e-1}]"#,
        )
        .unwrap();
        assert_eq!(scene.camera.height, 0.25);
    }

    #[test]
    fn test_load_scene_missing_file_is_an_io_error() {
        let result = load_scene(Path::new("/nonexistent/scene.json"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
