use serde::{Deserialize, Serialize};

/// Decimal places kept when a coordinate is used as an aggregation key.
///
/// 6 places ≈ 0.1m, well below the precision anyone types into a report form,
/// so distinct locations never merge while `13.9411` and `13.94110` do.
pub const KEY_PRECISION: i32 = 6;

/// A WGS84 latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both components finite and inside the latitude/longitude ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Parse a `"lat,lng"` string into a coordinate.
///
/// Returns `None` unless the string splits on `,` into exactly two numeric
/// tokens and the result lies inside the valid latitude/longitude ranges.
/// Surrounding whitespace on either token is ignored.
///
/// # Example
/// ```
/// use shelter_core::common::utils::parse_coordinate_pair;
///
/// let c = parse_coordinate_pair("13.9411,121.1639").unwrap();
/// assert_eq!((c.lat, c.lng), (13.9411, 121.1639));
/// assert!(parse_coordinate_pair("Marawoy, Lipa City").is_none());
/// ```
pub fn parse_coordinate_pair(input: &str) -> Option<Coordinate> {
    let mut parts = input.split(',');
    let (lat, lng) = match (parts.next(), parts.next(), parts.next()) {
        (Some(lat), Some(lng), None) => (lat.trim(), lng.trim()),
        _ => return None,
    };

    let coordinate = Coordinate::new(lat.parse().ok()?, lng.parse().ok()?);
    coordinate.is_valid().then_some(coordinate)
}

/// Round a degree value to [`KEY_PRECISION`] places, expressed as an integer.
///
/// # Example
/// ```
/// use shelter_core::common::utils::to_micro_degrees;
///
/// assert_eq!(to_micro_degrees(13.9411), 13_941_100);
/// assert_eq!(to_micro_degrees(-93.2650114), -93_265_011);
/// ```
pub fn to_micro_degrees(value: f64) -> i64 {
    (value * 10f64.powi(KEY_PRECISION)).round() as i64
}

/// Inverse of [`to_micro_degrees`].
pub fn from_micro_degrees(value: i64) -> f64 {
    value as f64 / 10f64.powi(KEY_PRECISION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinate_pair() {
        let c = parse_coordinate_pair("13.9411,121.1639").unwrap();
        assert_eq!(c, Coordinate::new(13.9411, 121.1639));

        // Whitespace around tokens
        let c = parse_coordinate_pair(" 13.9411 , 121.1639 ").unwrap();
        assert_eq!(c, Coordinate::new(13.9411, 121.1639));

        // Negative coordinates
        let c = parse_coordinate_pair("-33.8688,151.2093").unwrap();
        assert_eq!(c, Coordinate::new(-33.8688, 151.2093));
    }

    #[test]
    fn test_parse_rejects_non_pairs() {
        assert!(parse_coordinate_pair("").is_none());
        assert!(parse_coordinate_pair("13.9411").is_none());
        assert!(parse_coordinate_pair("13.9411,121.1639,5").is_none());
        assert!(parse_coordinate_pair("Marawoy, Lipa City").is_none());
        assert!(parse_coordinate_pair("13.9411,").is_none());
        assert!(parse_coordinate_pair("NaN,121.0").is_none());
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!(parse_coordinate_pair("91.0,121.0").is_none());
        assert!(parse_coordinate_pair("13.0,180.5").is_none());
        assert!(parse_coordinate_pair("-90,-180").is_some());
        assert!(parse_coordinate_pair("90,180").is_some());
    }

    #[test]
    fn test_micro_degrees() {
        assert_eq!(to_micro_degrees(13.9411), 13_941_100);
        assert_eq!(to_micro_degrees(13.94110), to_micro_degrees(13.9411));
        assert_eq!(to_micro_degrees(121.16390000001), 121_163_900);
        assert_eq!(from_micro_degrees(13_941_100), 13.9411);
    }
}
