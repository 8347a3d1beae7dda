use crate::generator::template::ramp;
use anyhow::Context;
use rand::{rngs::StdRng, Rng, SeedableRng};
use sailcore::math::{rad, WindMath};
use sailcore::race_interface::{DataPoint, RawPoint};
use serde::{Deserialize, Serialize};

/// Degrees of latitude per nautical mile.
const DEG_PER_NM: f64 = 1.0 / 60.0;

/// Configuration for generating a synthetic race.
///
/// The boat sails at constant speed in a steady wind while the apparent wind
/// angle ramps linearly, so a ramp through zero produces exactly one tack.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Race-clock seconds covered, sampled at 1 Hz from zero.
    pub duration_s: usize,
    pub speed: f64,
    pub aws: f64,
    pub awa_from: f64,
    pub awa_to: f64,
    /// Direction the true wind blows from.
    pub twd: f64,
    /// Half-width of the uniform jitter added to speed and awa.
    pub noise: f64,
    pub seed: u64,
    pub start_lon: f64,
    pub start_lat: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            duration_s: 720,
            speed: 6.0,
            aws: 10.0,
            awa_from: 45.0,
            awa_to: -45.0,
            twd: 0.0,
            noise: 0.0,
            seed: 0,
            start_lon: -122.4,
            start_lat: 47.6,
        }
    }
}

impl GeneratorConfig {
    fn sample_count(&self) -> anyhow::Result<usize> {
        self.duration_s
            .checked_add(1)
            .context("overflow computing sample count for generator")
    }
}

/// Builds the raw samples of a synthetic race.
pub fn build_race(config: &GeneratorConfig) -> anyhow::Result<Vec<RawPoint>> {
    let count = config.sample_count()?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut jitter = |noise: f64| {
        if noise > 0.0 {
            rng.gen_range(-noise..noise)
        } else {
            0.0
        }
    };

    let (mut lon, mut lat) = (config.start_lon, config.start_lat);
    let mut samples = Vec::with_capacity(count);

    for (second, awa) in ramp(config.awa_from, config.awa_to, count).into_iter().enumerate() {
        let tws = WindMath::true_wind_speed(config.speed, awa, config.aws);
        let twa = WindMath::true_wind_angle(config.speed, awa, tws);
        let hdg = (config.twd - twa).rem_euclid(360.0);

        samples.push(RawPoint {
            t: second as f64,
            lon: Some(lon),
            lat: Some(lat),
            hdg: Some(hdg),
            cog: Some(hdg),
            sog: Some(config.speed),
            speed: Some(config.speed + jitter(config.noise)),
            awa: Some(awa + jitter(config.noise)),
            aws: Some(config.aws),
            ..Default::default()
        });

        let run_nm = config.speed / 3600.0;
        lat += run_nm * rad(hdg).cos() * DEG_PER_NM;
        lon += run_nm * rad(hdg).sin() * DEG_PER_NM / rad(lat).cos();
    }

    Ok(samples)
}

pub fn build_points(config: &GeneratorConfig) -> anyhow::Result<Vec<DataPoint>> {
    Ok(build_race(config)?.into_iter().map(DataPoint::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_builds_one_sample_per_second() {
        let race = build_race(&GeneratorConfig::default()).unwrap();
        assert_eq!(race.len(), 721);
        assert_eq!(race[0].t, 0.0);
        assert_eq!(race[720].t, 720.0);
        assert_eq!(race[0].awa, Some(45.0));
        assert_eq!(race[720].awa, Some(-45.0));
    }

    #[test]
    fn heading_points_the_true_wind_back_to_twd() {
        let config = GeneratorConfig {
            twd: 200.0,
            ..Default::default()
        };
        let points = build_points(&config).unwrap();
        let p = &points[100];
        let tws = WindMath::true_wind_speed(6.0, p.awa.unwrap(), 10.0);
        let twa = WindMath::true_wind_angle(6.0, p.awa.unwrap(), tws);
        let twd = WindMath::true_wind_direction(p.hdg.unwrap(), twa);
        assert!((twd - 200.0).abs() < 1e-9);
        assert_eq!(p.ot, 100.0);
    }

    #[test]
    fn seeded_noise_repeats() {
        let config = GeneratorConfig {
            noise: 0.3,
            seed: 13,
            ..Default::default()
        };
        let a = build_race(&config).unwrap();
        let b = build_race(&config).unwrap();
        assert_eq!(a[50].speed, b[50].speed);
        assert!(a.iter().all(|p| (p.speed.unwrap() - 6.0).abs() <= 0.3));
        assert!(a.iter().any(|p| p.speed != Some(6.0)));
    }

    #[test]
    fn boat_moves_along_heading() {
        let points = build_points(&GeneratorConfig::default()).unwrap();
        let first = points[0].position().unwrap();
        let last = points[720].position().unwrap();
        assert!(last.1 > first.1);
    }
}
