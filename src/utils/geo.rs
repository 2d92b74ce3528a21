/// mean earth radius in kilometers, used by the haversine formula
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great circle distance in kilometers between two (lat, lng) pairs
pub fn haversine_distance_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    EARTH_RADIUS_KM * 2.0 * a.sqrt().asin()
}

/// Travel time estimate in whole minutes for a distance at an assumed
/// average speed, never below one minute so riders are not shown a
/// "0 minutes away" pickup
pub fn eta_minutes(distance_km: f64, speed_kmh: f64) -> u32 {
    if speed_kmh <= 0.0 {
        return 1;
    }

    let minutes = (distance_km / speed_kmh) * 60.0;

    (minutes.round() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_between_equal_points_is_zero() {
        assert_eq!(haversine_distance_km(20.29, 85.82, 20.29, 85.82), 0.0);
    }

    #[test]
    fn distance_of_one_longitude_degree_at_the_equator() {
        let d = haversine_distance_km(0.0, 0.0, 0.0, 1.0);

        // one degree of longitude at the equator is ~111.19 km
        assert!((d - 111.19).abs() < 0.05, "got {d}");
    }

    #[test]
    fn eta_rounds_to_whole_minutes() {
        // 10 km at 20 km/h is exactly half a hour
        assert_eq!(eta_minutes(10.0, 20.0), 30);

        // 3.4 km at 20 km/h is 10.2 minutes
        assert_eq!(eta_minutes(3.4, 20.0), 10);
    }

    #[test]
    fn eta_is_never_below_one_minute() {
        assert_eq!(eta_minutes(0.0, 20.0), 1);
        assert_eq!(eta_minutes(0.05, 20.0), 1);
    }

    #[test]
    fn eta_with_a_degenerate_speed_falls_back_to_one_minute() {
        assert_eq!(eta_minutes(5.0, 0.0), 1);
    }
}
