//! Loading of `lat,lon` point files for summary maps

use crate::error::MapError;
use crate::geometry::LatLon;
use std::fs;
use std::path::Path;

/// Read a points file with one `lat,lon` pair per line.
///
/// Blank lines and lines starting with `#` are skipped.
///
/// # Errors
/// * `MapError::FileNotFound` if `path` is not a file
/// * `MapError::InvalidPointsLine` for the first malformed line
pub fn read_points_csv(path: &Path) -> Result<Vec<LatLon>, MapError> {
    if !path.is_file() {
        return Err(MapError::not_found("Points", path));
    }
    let text = fs::read_to_string(path)?;
    parse_points(&text)
}

/// Parse the contents of a points file
pub fn parse_points(text: &str) -> Result<Vec<LatLon>, MapError> {
    let mut points = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let invalid = |reason: String| MapError::InvalidPointsLine {
            line: index + 1,
            text: raw.to_string(),
            reason,
        };

        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        let [lat, lon] = parts[..] else {
            return Err(invalid(format!("found {} fields", parts.len())));
        };

        let parse = |field: &str, name: &str| -> Result<f64, MapError> {
            match field.parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(value),
                Ok(value) => Err(invalid(format!("{} is not finite: {}", name, value))),
                Err(_) => Err(invalid(format!("{} is not a number: {:?}", name, field))),
            }
        };

        points.push(LatLon::new(parse(lat, "latitude")?, parse(lon, "longitude")?));
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    #[test]
    fn test_read_points_csv() {
        let file = create_test_csv("# photos\n52.0,-8.0\n\n  52.0001 , -8.0001  \n10.0,10.0\n");
        let points = read_points_csv(file.path()).unwrap();
        assert_eq!(
            points,
            vec![
                LatLon::new(52.0, -8.0),
                LatLon::new(52.0001, -8.0001),
                LatLon::new(10.0, 10.0),
            ]
        );
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = read_points_csv(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, MapError::FileNotFound { .. }));
        assert!(err.to_string().contains("/definitely/not/here.csv"));
    }

    #[test]
    fn test_wrong_field_count_cites_line() {
        let err = parse_points("52.0,-8.0\n1,2,3\n").unwrap_err();
        match err {
            MapError::InvalidPointsLine { line, ref text, .. } => {
                assert_eq!(line, 2);
                assert_eq!(text, "1,2,3");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("1,2,3"));
    }

    #[test]
    fn test_non_numeric_field() {
        let err = parse_points("north,-8.0").unwrap_err();
        assert!(err.to_string().contains("latitude is not a number"));

        let err = parse_points("52.0,nan").unwrap_err();
        assert!(err.to_string().contains("longitude is not finite"));
    }

    #[test]
    fn test_only_comments() {
        assert!(parse_points("# nothing\n\n   \n").unwrap().is_empty());
    }
}
