use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Light source geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LightKind {
    /// Uniform light from every direction
    Ambient,
    /// Parallel rays travelling from `position` toward `target`
    Directional { position: Vec3, target: Vec3 },
    /// Omni light with inverse-square falloff
    Point { position: Vec3 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub kind: LightKind,
    pub color: Vec3,
    pub intensity: f32,
    pub casts_shadow: bool,
}

/// How a light arrives at a surface point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Incidence {
    /// Unit vector from the surface toward the light
    pub to_light: Vec3,
    /// Distance to the light, infinite for directional lights
    pub distance: f32,
    /// Colour times intensity after falloff
    pub radiance: Vec3,
}

impl Light {
    pub fn ambient(color: Vec3, intensity: f32) -> Self {
        Self {
            kind: LightKind::Ambient,
            color,
            intensity,
            casts_shadow: false,
        }
    }

    pub fn directional(position: Vec3, target: Vec3, color: Vec3, intensity: f32) -> Self {
        Self {
            kind: LightKind::Directional { position, target },
            color,
            intensity,
            casts_shadow: false,
        }
    }

    pub fn point(position: Vec3, color: Vec3, intensity: f32) -> Self {
        Self {
            kind: LightKind::Point { position },
            color,
            intensity,
            casts_shadow: false,
        }
    }

    pub fn with_shadow(mut self, casts_shadow: bool) -> Self {
        self.casts_shadow = casts_shadow;
        self
    }

    pub fn is_ambient(&self) -> bool {
        matches!(self.kind, LightKind::Ambient)
    }

    /// Incoming light at `point`; `None` for ambient lights and degenerate setups
    pub fn incidence(&self, point: Vec3) -> Option<Incidence> {
        match self.kind {
            LightKind::Ambient => None,
            LightKind::Directional { position, target } => {
                let to_light = (position - target).try_normalize()?;
                Some(Incidence {
                    to_light,
                    distance: f32::INFINITY,
                    radiance: self.color * self.intensity,
                })
            }
            LightKind::Point { position } => {
                let offset = position - point;
                let distance = offset.length();
                let to_light = offset.try_normalize()?;
                // Falloff is capped at unit distance so nearby surfaces don't blow out
                let falloff = 1.0 / distance.max(1.0).powi(2);
                Some(Incidence {
                    to_light,
                    distance,
                    radiance: self.color * self.intensity * falloff,
                })
            }
        }
    }
}
