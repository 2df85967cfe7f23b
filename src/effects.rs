//! Decorative simulation behind the quiz: a drifting starfield and particle
//! bursts on every answer. Pure state, stepped once per animation frame by
//! the render loop, so it runs (and tests) without a canvas.

use crate::rng::SeededRandom;

pub const SUCCESS_PALETTE: [&str; 4] = ["#FFD93D", "#6BCB77", "#4D96FF", "#FF6B9D"];
pub const FAILURE_PALETTE: [&str; 3] = ["#FF6B6B", "#C44569", "#FFA07A"];

const PARTICLES_PER_BURST: usize = 20;
const STAR_COUNT: usize = 30;
const GRAVITY: f64 = 0.3;
const LIFE_DECAY: f64 = 0.02;

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub color: &'static str,
    pub size: f64,
    /// 1.0 when spawned, fades to 0; doubles as draw alpha.
    pub life: f64,
}

impl Particle {
    /// Advance one frame. Returns false once the particle has faded out.
    fn step(&mut self) -> bool {
        self.x += self.vx;
        self.y += self.vy;
        self.vy += GRAVITY;
        self.life -= LIFE_DECAY;
        self.life > 0.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Star {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub speed: f64,
    pub opacity: f64,
}

pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub particles: Vec<Particle>,
    pub stars: Vec<Star>,
    rng: SeededRandom,
}

impl Scene {
    pub fn new(width: f64, height: f64, mut rng: SeededRandom) -> Self {
        let stars = (0..STAR_COUNT)
            .map(|_| Star {
                x: rng.unit() * width,
                y: rng.unit() * height,
                size: rng.range_f64(1.0, 4.0),
                speed: rng.range_f64(0.2, 0.7),
                opacity: rng.unit(),
            })
            .collect();
        Self {
            width,
            height,
            particles: Vec::new(),
            stars,
            rng,
        }
    }

    /// Spray particles from the centre in the palette for the answer.
    pub fn burst(&mut self, correct: bool) {
        let palette: &[&'static str] = if correct {
            &SUCCESS_PALETTE
        } else {
            &FAILURE_PALETTE
        };
        let (cx, cy) = (self.width / 2.0, self.height / 2.0);
        for _ in 0..PARTICLES_PER_BURST {
            let color = palette[self.rng.index(palette.len())];
            self.particles.push(Particle {
                x: cx,
                y: cy,
                vx: self.rng.range_f64(-5.0, 5.0),
                vy: self.rng.range_f64(-5.0, 5.0),
                color,
                size: self.rng.range_f64(4.0, 12.0),
                life: 1.0,
            });
        }
    }

    /// Advance stars and particles by one frame. `now_ms` drives the twinkle.
    pub fn step(&mut self, now_ms: f64) {
        for star in &mut self.stars {
            star.y += star.speed;
            if star.y > self.height {
                star.y = 0.0;
                star.x = self.rng.unit() * self.width;
            }
            star.opacity = (now_ms * 0.001 + star.x).sin() * 0.5 + 0.5;
        }
        self.particles.retain_mut(Particle::step);
    }

    pub fn clear_particles(&mut self) {
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> Scene {
        Scene::new(400.0, 300.0, SeededRandom::new(9))
    }

    #[test]
    fn test_starfield_spawns_inside_canvas() {
        let s = scene();
        assert_eq!(s.stars.len(), STAR_COUNT);
        for star in &s.stars {
            assert!((0.0..400.0).contains(&star.x));
            assert!((0.0..300.0).contains(&star.y));
            assert!((1.0..4.0).contains(&star.size));
            assert!((0.2..0.7).contains(&star.speed));
        }
    }

    #[test]
    fn test_burst_uses_answer_palette() {
        let mut s = scene();
        s.burst(true);
        assert_eq!(s.particles.len(), PARTICLES_PER_BURST);
        assert!(s.particles.iter().all(|p| SUCCESS_PALETTE.contains(&p.color)));
        assert!(s.particles.iter().all(|p| p.x == 200.0 && p.y == 150.0));

        s.clear_particles();
        s.burst(false);
        assert!(s.particles.iter().all(|p| FAILURE_PALETTE.contains(&p.color)));
    }

    #[test]
    fn test_particle_motion_and_fade() {
        let mut s = scene();
        s.burst(true);
        let before = s.particles[0].clone();
        s.step(0.0);
        let after = &s.particles[0];
        assert!((after.x - (before.x + before.vx)).abs() < 1e-9);
        assert!((after.vy - (before.vy + GRAVITY)).abs() < 1e-9);
        assert!((after.life - (1.0 - LIFE_DECAY)).abs() < 1e-9);

        // 1.0 / 0.02 frames later every particle is gone.
        for _ in 0..60 {
            s.step(0.0);
        }
        assert!(s.particles.is_empty());
    }

    #[test]
    fn test_stars_wrap_to_top() {
        let mut s = scene();
        s.stars[0].y = 299.9;
        s.stars[0].speed = 0.5;
        s.step(1000.0);
        assert_eq!(s.stars[0].y, 0.0);
        assert!((0.0..=1.0).contains(&s.stars[0].opacity));
    }
}
