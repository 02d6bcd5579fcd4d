//! Synthetic scene generator.
//!
//! Regions are numbered from one and laid out body by body. Inside a body,
//! consecutive regions are linked in a chain, with a share of the chain links
//! doubled so GLOBAL has work to do and the rest left for SINGLEBODY. Stray
//! single links join random regions of different bodies, and every body's
//! first region touches the background.

use guzman_core::{RegionId, RegionLink};
use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Background region of every generated scene.
pub const BACKGROUND: RegionId = RegionId::new(0);

/// Shape of a generated scene.
#[derive(Clone, Debug)]
pub struct SceneConfig {
    /// Number of bodies.
    pub bodies: usize,
    /// Regions in each body.
    pub regions_per_body: usize,
    /// Probability that a chain link inside a body is doubled.
    pub double_link_ratio: f64,
    /// Single links joining regions of different bodies.
    pub stray_links: usize,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// Errors raised while generating a scene.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    /// The scene would contain no bodies.
    #[error("scene must contain at least one body")]
    ZeroBodies,
    /// Bodies need at least one region each.
    #[error("bodies must contain at least one region")]
    ZeroRegions,
    /// The double-link ratio was not a probability.
    #[error("double-link ratio must lie in [0, 1]")]
    InvalidRatio,
    /// Region ids would not fit the id type.
    #[error("{bodies} bodies of {regions_per_body} regions overflow the region id range")]
    TooManyRegions {
        /// Requested body count.
        bodies: usize,
        /// Requested regions per body.
        regions_per_body: usize,
    },
}

/// Generated links plus the bodies they were built from.
#[derive(Clone, Debug)]
pub struct SyntheticScene {
    links: Vec<RegionLink>,
    bodies: Vec<Vec<RegionId>>,
}

impl SyntheticScene {
    /// Generates a scene from `config`.
    ///
    /// # Errors
    /// Returns [`SceneError`] when the configuration is empty, the ratio is
    /// not a probability, or the region count overflows `i64`.
    pub fn generate(config: &SceneConfig) -> Result<Self, SceneError> {
        validate(config)?;
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let bodies = layout(config)?;
        let mut links = Vec::new();
        let mut junction = 0usize;
        let mut push = |links: &mut Vec<RegionLink>, first: RegionId, second: RegionId| {
            links.push(RegionLink::new(first, second, format!("J{junction}")));
            junction += 1;
        };

        for body in &bodies {
            if let Some(&first) = body.first() {
                push(&mut links, first, BACKGROUND);
            }
            for pair in body.windows(2) {
                if let &[left, right] = pair {
                    push(&mut links, left, right);
                    if rng.gen_bool(config.double_link_ratio) {
                        push(&mut links, right, left);
                    }
                }
            }
        }

        let regions: Vec<RegionId> = bodies.iter().flatten().copied().collect();
        if bodies.len() > 1 {
            for _ in 0..config.stray_links {
                let first = regions.get(rng.gen_range(0..regions.len()));
                let second = regions.get(rng.gen_range(0..regions.len()));
                if let (Some(&first), Some(&second)) = (first, second) {
                    push(&mut links, first, second);
                }
            }
        }

        Ok(Self { links, bodies })
    }

    /// Returns the generated links.
    #[must_use]
    pub fn links(&self) -> &[RegionLink] {
        &self.links
    }

    /// Returns the bodies the scene was laid out from.
    #[must_use]
    pub fn bodies(&self) -> &[Vec<RegionId>] {
        &self.bodies
    }

    /// Returns the number of distinct non-background regions.
    #[must_use]
    pub fn region_count(&self) -> usize {
        self.bodies.iter().map(Vec::len).sum()
    }
}

fn validate(config: &SceneConfig) -> Result<(), SceneError> {
    if config.bodies == 0 {
        return Err(SceneError::ZeroBodies);
    }
    if config.regions_per_body == 0 {
        return Err(SceneError::ZeroRegions);
    }
    if !(0.0..=1.0).contains(&config.double_link_ratio) {
        return Err(SceneError::InvalidRatio);
    }
    Ok(())
}

fn layout(config: &SceneConfig) -> Result<Vec<Vec<RegionId>>, SceneError> {
    let overflow = || SceneError::TooManyRegions {
        bodies: config.bodies,
        regions_per_body: config.regions_per_body,
    };
    let total = config
        .bodies
        .checked_mul(config.regions_per_body)
        .and_then(|total| i64::try_from(total).ok())
        .ok_or_else(overflow)?;
    let per_body = i64::try_from(config.regions_per_body).map_err(|_| overflow())?;
    Ok((1..=total)
        .step_by(config.regions_per_body)
        .map(|start| (start..start + per_body).map(RegionId::new).collect())
        .collect())
}
