//! Particle background: configuration and the renderer seam.
//!
//! The renderer itself is an external library; Folio only builds its
//! options object and manages the lifetime of the single live instance
//! (see [`ThemeStore`](crate::theme::ThemeStore)). Options serialize to the
//! camelCase JSON the renderer expects.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::FolioResult;
use crate::theme::ThemePreference;

/// Colours that change with the theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParticlePalette {
    pub particle: &'static str,
    pub link: &'static str,
    pub triangle: &'static str,
}

impl ParticlePalette {
    pub fn for_theme(theme: ThemePreference) -> Self {
        match theme {
            ThemePreference::Dark => Self {
                particle: "#ffffff",
                link: "#475569",
                triangle: "#0f172a",
            },
            ThemePreference::Light => Self {
                particle: "#4f46e5",
                link: "#cbd5e1",
                triangle: "#f1f5f9",
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticleConfig {
    pub fps_limit: u32,
    pub interactivity: Interactivity,
    pub particles: ParticleOptions,
    pub detect_retina: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interactivity {
    pub events: InteractivityEvents,
    pub modes: InteractivityModes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractivityEvents {
    pub on_hover: ModeToggle,
    pub on_click: ModeToggle,
    pub resize: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeToggle {
    pub enable: bool,
    pub mode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractivityModes {
    pub grab: GrabMode,
    pub push: PushMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrabMode {
    pub distance: f64,
    pub links: GrabLinks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrabLinks {
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushMode {
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleOptions {
    pub color: ColorValue,
    pub links: Links,
    #[serde(rename = "move")]
    pub motion: Motion,
    pub number: Number,
    pub opacity: AnimatedRange,
    pub shape: Shape,
    pub size: AnimatedRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorValue {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Links {
    pub color: String,
    pub distance: f64,
    pub enable: bool,
    pub opacity: f64,
    pub width: f64,
    pub triangles: Triangles,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Triangles {
    pub enable: bool,
    pub color: String,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Motion {
    pub direction: String,
    pub enable: bool,
    pub out_modes: OutModes,
    pub random: bool,
    pub speed: f64,
    pub straight: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutModes {
    pub default: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Number {
    pub density: Density,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Density {
    pub enable: bool,
    pub area: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimatedRange {
    pub value: Range,
    pub animation: Animation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub enable: bool,
    pub speed: f64,
    pub sync: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    #[serde(rename = "type")]
    pub kind: String,
}

impl ParticleConfig {
    /// Options for the page background under `theme`.
    pub fn for_theme(theme: ThemePreference) -> Self {
        let palette = ParticlePalette::for_theme(theme);
        Self {
            fps_limit: 120,
            interactivity: Interactivity {
                events: InteractivityEvents {
                    on_hover: ModeToggle {
                        enable: true,
                        mode: "grab".into(),
                    },
                    on_click: ModeToggle {
                        enable: true,
                        mode: "push".into(),
                    },
                    resize: true,
                },
                modes: InteractivityModes {
                    grab: GrabMode {
                        distance: 150.0,
                        links: GrabLinks { opacity: 1.0 },
                    },
                    push: PushMode { quantity: 4 },
                },
            },
            particles: ParticleOptions {
                color: ColorValue {
                    value: palette.particle.into(),
                },
                links: Links {
                    color: palette.link.into(),
                    distance: 150.0,
                    enable: true,
                    opacity: 0.25,
                    width: 1.0,
                    triangles: Triangles {
                        enable: true,
                        color: palette.triangle.into(),
                        opacity: 0.05,
                    },
                },
                motion: Motion {
                    direction: "none".into(),
                    enable: true,
                    out_modes: OutModes {
                        default: "bounce".into(),
                    },
                    random: false,
                    speed: 1.5,
                    straight: false,
                },
                number: Number {
                    density: Density {
                        enable: true,
                        area: 800.0,
                    },
                    value: 80,
                },
                opacity: AnimatedRange {
                    value: Range { min: 0.1, max: 0.5 },
                    animation: Animation {
                        enable: true,
                        speed: 0.8,
                        sync: false,
                    },
                },
                shape: Shape {
                    kind: "circle".into(),
                },
                size: AnimatedRange {
                    value: Range { min: 1.0, max: 3.0 },
                    animation: Animation {
                        enable: true,
                        speed: 4.0,
                        sync: false,
                    },
                },
            },
            detect_retina: true,
        }
    }

    pub fn to_json(&self) -> FolioResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A live particle instance.
pub trait ParticleHandle: Send {
    /// Tear the instance down. Called exactly once, before any replacement loads.
    fn destroy(self: Box<Self>);
}

/// The external particle library.
pub trait ParticleRenderer: Send + Sync {
    fn load(
        &self,
        container_id: &str,
        config: &ParticleConfig,
    ) -> FolioResult<Box<dyn ParticleHandle>>;
}

/// Renderer for headless runs: records nothing, logs each load/destroy.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingParticleRenderer;

struct TracingParticleHandle {
    container_id: String,
}

impl ParticleHandle for TracingParticleHandle {
    fn destroy(self: Box<Self>) {
        info!(container = %self.container_id, "Particles destroyed");
    }
}

impl ParticleRenderer for TracingParticleRenderer {
    fn load(
        &self,
        container_id: &str,
        config: &ParticleConfig,
    ) -> FolioResult<Box<dyn ParticleHandle>> {
        info!(
            container = container_id,
            color = %config.particles.color.value,
            count = config.particles.number.value,
            "Particles loaded"
        );
        Ok(Box::new(TracingParticleHandle {
            container_id: container_id.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_follows_theme() {
        let dark = ParticleConfig::for_theme(ThemePreference::Dark);
        let light = ParticleConfig::for_theme(ThemePreference::Light);
        assert_eq!(dark.particles.color.value, "#ffffff");
        assert_eq!(light.particles.color.value, "#4f46e5");
        assert_eq!(dark.particles.links.color, "#475569");
        assert_eq!(light.particles.links.triangles.color, "#f1f5f9");
        // Everything but the palette is shared.
        assert_eq!(dark.interactivity, light.interactivity);
        assert_eq!(dark.particles.motion, light.particles.motion);
    }

    #[test]
    fn test_json_uses_renderer_field_names() {
        let json: serde_json::Value =
            serde_json::from_str(&ParticleConfig::for_theme(ThemePreference::Dark).to_json().unwrap())
                .unwrap();
        assert_eq!(json["fpsLimit"], 120);
        assert_eq!(json["detectRetina"], true);
        assert_eq!(json["interactivity"]["events"]["onHover"]["mode"], "grab");
        assert_eq!(json["interactivity"]["events"]["onClick"]["mode"], "push");
        assert_eq!(json["interactivity"]["modes"]["push"]["quantity"], 4);
        assert_eq!(json["particles"]["move"]["outModes"]["default"], "bounce");
        assert_eq!(json["particles"]["shape"]["type"], "circle");
        assert_eq!(json["particles"]["number"]["density"]["area"], 800.0);
    }
}
