/// Drifting background stars.  Purely cosmetic: nothing here touches the
/// simulation, and restarts leave the sky alone.

use rand::Rng;

use crate::entities::StarParticle;

const ALPHA_MIN: f32 = 0.1;
const ALPHA_MAX: f32 = 1.0;

#[derive(Clone, Debug)]
pub struct Starfield {
    pub particles: Vec<StarParticle>,
    width: f32,
    height: f32,
}

fn random_particle(width: f32, height: f32, rng: &mut impl Rng) -> StarParticle {
    StarParticle {
        x: rng.gen_range(0.0..width),
        y: rng.gen_range(0.0..height),
        radius: rng.gen_range(0.5..2.0),
        alpha: rng.gen_range(0.0..1.0),
        speed_x: (rng.gen::<f32>() - 0.5) * 0.2,
        speed_y: (rng.gen::<f32>() - 0.5) * 0.2,
    }
}

impl Starfield {
    pub fn new(count: usize, width: f32, height: f32, rng: &mut impl Rng) -> Self {
        let particles = (0..count)
            .map(|_| random_particle(width, height, rng))
            .collect();
        Starfield {
            particles,
            width,
            height,
        }
    }

    /// Drift every star and twinkle its alpha.  A star that leaves the field
    /// or fades out of `[0.1, 1]` is re-rolled in place.
    pub fn update(&mut self, rng: &mut impl Rng) {
        let (w, h) = (self.width, self.height);
        for p in &mut self.particles {
            p.x += p.speed_x;
            p.y += p.speed_y;
            p.alpha += (rng.gen::<f32>() - 0.5) * 0.02;

            let out_of_bounds = p.x < 0.0 || p.x > w || p.y < 0.0 || p.y > h;
            if p.alpha < ALPHA_MIN || p.alpha > ALPHA_MAX || out_of_bounds {
                *p = random_particle(w, h, rng);
            }
        }
    }
}
