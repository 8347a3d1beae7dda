use serde::{Deserialize, Serialize};

/// Every optional quantity a sample can carry, sensor and derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Lon,
    Lat,
    Hdg,
    Cog,
    Sog,
    Speed,
    Awa,
    Aws,
    Heel,
    Trim,
    Tws,
    Twa,
    Twd,
    Gws,
    Gwd,
    Set,
    Drift,
    Vmg,
    TargetSpeed,
    TargetAngle,
    TargetHeel,
    TargetVmg,
    Performance,
    Gws20,
    Gwd20,
    Aawa,
    Atwa,
    Acceleration,
    Rot,
}

impl Field {
    /// Name used in serialized points.
    pub fn name(&self) -> &'static str {
        match self {
            Field::Lon => "lon",
            Field::Lat => "lat",
            Field::Hdg => "hdg",
            Field::Cog => "cog",
            Field::Sog => "sog",
            Field::Speed => "speed",
            Field::Awa => "awa",
            Field::Aws => "aws",
            Field::Heel => "heel",
            Field::Trim => "trim",
            Field::Tws => "tws",
            Field::Twa => "twa",
            Field::Twd => "twd",
            Field::Gws => "gws",
            Field::Gwd => "gwd",
            Field::Set => "set",
            Field::Drift => "drift",
            Field::Vmg => "vmg",
            Field::TargetSpeed => "targetSpeed",
            Field::TargetAngle => "targetAngle",
            Field::TargetHeel => "targetHeel",
            Field::TargetVmg => "targetVmg",
            Field::Performance => "performance",
            Field::Gws20 => "gws_20",
            Field::Gwd20 => "gwd_20",
            Field::Aawa => "aawa",
            Field::Atwa => "atwa",
            Field::Acceleration => "acceleration",
            Field::Rot => "rot",
        }
    }
}

/// One instrument sample, enriched in place by the pipeline.
///
/// `t` is absolute epoch milliseconds, `ot` the race clock in seconds.
/// Every other field is present only once its sensor reported or its
/// formula had all inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub t: i64,
    pub ot: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hdg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cog: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sog: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub awa: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heel: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trim: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tws: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twa: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gws: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gwd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drift: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vmg: Option<f64>,
    #[serde(
        default,
        rename = "targetSpeed",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_speed: Option<f64>,
    #[serde(
        default,
        rename = "targetAngle",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_angle: Option<f64>,
    #[serde(
        default,
        rename = "targetHeel",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_heel: Option<f64>,
    #[serde(
        default,
        rename = "targetVmg",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_vmg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<f64>,
    #[serde(default, rename = "gws_20", skip_serializing_if = "Option::is_none")]
    pub gws_20: Option<f64>,
    #[serde(default, rename = "gwd_20", skip_serializing_if = "Option::is_none")]
    pub gwd_20: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aawa: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atwa: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceleration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rot: Option<f64>,
}

impl DataPoint {
    pub fn new(t: i64, ot: f64) -> Self {
        Self {
            t,
            ot,
            ..Default::default()
        }
    }

    fn slot(&self, field: Field) -> &Option<f64> {
        match field {
            Field::Lon => &self.lon,
            Field::Lat => &self.lat,
            Field::Hdg => &self.hdg,
            Field::Cog => &self.cog,
            Field::Sog => &self.sog,
            Field::Speed => &self.speed,
            Field::Awa => &self.awa,
            Field::Aws => &self.aws,
            Field::Heel => &self.heel,
            Field::Trim => &self.trim,
            Field::Tws => &self.tws,
            Field::Twa => &self.twa,
            Field::Twd => &self.twd,
            Field::Gws => &self.gws,
            Field::Gwd => &self.gwd,
            Field::Set => &self.set,
            Field::Drift => &self.drift,
            Field::Vmg => &self.vmg,
            Field::TargetSpeed => &self.target_speed,
            Field::TargetAngle => &self.target_angle,
            Field::TargetHeel => &self.target_heel,
            Field::TargetVmg => &self.target_vmg,
            Field::Performance => &self.performance,
            Field::Gws20 => &self.gws_20,
            Field::Gwd20 => &self.gwd_20,
            Field::Aawa => &self.aawa,
            Field::Atwa => &self.atwa,
            Field::Acceleration => &self.acceleration,
            Field::Rot => &self.rot,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<f64> {
        match field {
            Field::Lon => &mut self.lon,
            Field::Lat => &mut self.lat,
            Field::Hdg => &mut self.hdg,
            Field::Cog => &mut self.cog,
            Field::Sog => &mut self.sog,
            Field::Speed => &mut self.speed,
            Field::Awa => &mut self.awa,
            Field::Aws => &mut self.aws,
            Field::Heel => &mut self.heel,
            Field::Trim => &mut self.trim,
            Field::Tws => &mut self.tws,
            Field::Twa => &mut self.twa,
            Field::Twd => &mut self.twd,
            Field::Gws => &mut self.gws,
            Field::Gwd => &mut self.gwd,
            Field::Set => &mut self.set,
            Field::Drift => &mut self.drift,
            Field::Vmg => &mut self.vmg,
            Field::TargetSpeed => &mut self.target_speed,
            Field::TargetAngle => &mut self.target_angle,
            Field::TargetHeel => &mut self.target_heel,
            Field::TargetVmg => &mut self.target_vmg,
            Field::Performance => &mut self.performance,
            Field::Gws20 => &mut self.gws_20,
            Field::Gwd20 => &mut self.gwd_20,
            Field::Aawa => &mut self.aawa,
            Field::Atwa => &mut self.atwa,
            Field::Acceleration => &mut self.acceleration,
            Field::Rot => &mut self.rot,
        }
    }

    pub fn get(&self, field: Field) -> Option<f64> {
        *self.slot(field)
    }

    pub fn set(&mut self, field: Field, value: f64) {
        *self.slot_mut(field) = Some(value);
    }

    pub fn has(&self, field: Field) -> bool {
        self.slot(field).is_some()
    }

    pub fn position(&self) -> Option<LonLat> {
        match (self.lon, self.lat) {
            (Some(lon), Some(lat)) => Some(LonLat(lon, lat)),
            _ => None,
        }
    }
}

/// Longitude/latitude pair, serialized as `[lon, lat]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LonLat(pub f64, pub f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_accessors_round_through_slots() {
        let mut point = DataPoint::new(1_000, 1.0);
        assert!(!point.has(Field::TargetVmg));
        point.set(Field::TargetVmg, 5.5);
        assert_eq!(point.get(Field::TargetVmg), Some(5.5));
        assert_eq!(point.target_vmg, Some(5.5));
    }

    #[test]
    fn serialization_uses_contract_names_and_skips_absent_fields() {
        let mut point = DataPoint::new(2_000, 2.0);
        point.target_speed = Some(6.1);
        point.gws_20 = Some(11.0);
        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json["targetSpeed"], 6.1);
        assert_eq!(json["gws_20"], 11.0);
        assert!(json.get("twa").is_none());
        assert_eq!(Field::Gws20.name(), "gws_20");
    }

    #[test]
    fn position_requires_both_coordinates() {
        let mut point = DataPoint::new(0, 0.0);
        point.lon = Some(-122.4);
        assert!(point.position().is_none());
        point.lat = Some(47.6);
        assert_eq!(point.position(), Some(LonLat(-122.4, 47.6)));
    }
}
