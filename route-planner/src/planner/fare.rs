//! Stepped-distance fares.

/// Fare table parameters.
#[derive(Debug, Clone)]
pub struct FareConfig {
    /// Fare for any ride up to `base_distance_km`.
    pub base_fare: u32,

    /// Distance covered by the base fare (km).
    pub base_distance_km: f64,

    /// Width of each additional distance band (km).
    pub band_km: f64,

    /// Surcharge per started band beyond the base distance.
    pub band_fare: u32,

    /// Upper bound on any fare.
    pub max_fare: u32,

    /// Average inter-station distance used to estimate ridden distance (km).
    pub km_per_hop: f64,
}

impl FareConfig {
    /// Estimated ridden distance for a number of ride hops.
    pub fn distance_for_hops(&self, hops: usize) -> f64 {
        hops as f64 * self.km_per_hop
    }

    /// Fare for a ridden distance.
    ///
    /// A zero-length trip is free; anything else pays at least the base fare.
    pub fn fare_for_distance(&self, distance_km: f64) -> u32 {
        if !(distance_km.is_finite() && distance_km > 0.0) {
            return 0;
        }

        let extra = distance_km - self.base_distance_km;
        let fare = if extra <= 0.0 || self.band_km <= 0.0 {
            self.base_fare
        } else {
            let bands = (extra / self.band_km).ceil() as u32;
            self.base_fare
                .saturating_add(bands.saturating_mul(self.band_fare))
        };

        fare.min(self.max_fare)
    }
}

impl Default for FareConfig {
    fn default() -> Self {
        Self {
            base_fare: 1400,
            base_distance_km: 10.0,
            band_km: 5.0,
            band_fare: 100,
            max_fare: 3000,
            km_per_hop: 1.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = FareConfig::default();
        assert_eq!(config.base_fare, 1400);
        assert_eq!(config.base_distance_km, 10.0);
        assert_eq!(config.band_km, 5.0);
        assert_eq!(config.band_fare, 100);
        assert_eq!(config.max_fare, 3000);
    }

    #[test]
    fn base_fare_within_threshold() {
        let config = FareConfig::default();
        assert_eq!(config.fare_for_distance(1.2), 1400);
        assert_eq!(config.fare_for_distance(10.0), 1400);
    }

    #[test]
    fn bands_beyond_threshold() {
        let config = FareConfig::default();
        assert_eq!(config.fare_for_distance(10.1), 1500);
        assert_eq!(config.fare_for_distance(15.0), 1500);
        assert_eq!(config.fare_for_distance(15.1), 1600);
        // 9 hops * 1.2 = 10.8 km -> one band
        assert_eq!(config.fare_for_distance(config.distance_for_hops(9)), 1500);
    }

    #[test]
    fn capped_at_max() {
        let config = FareConfig::default();
        assert_eq!(config.fare_for_distance(500.0), 3000);
    }

    #[test]
    fn zero_or_invalid_distance_is_free() {
        let config = FareConfig::default();
        assert_eq!(config.fare_for_distance(0.0), 0);
        assert_eq!(config.fare_for_distance(f64::NAN), 0);
        assert_eq!(config.fare_for_distance(-3.0), 0);
    }
}
