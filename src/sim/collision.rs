//! Projectile vs balloon hit detection and scoring

use glam::Vec2;

use super::pools::EntityPools;
use super::state::BalloonColor;

/// A balloon popped during this step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopEvent {
    pub balloon_id: u32,
    pub pos: Vec2,
    pub color: BalloonColor,
    pub points: u32,
}

/// Circle-circle overlap (strict: touching edges do not count)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

/// Pop every live balloon touched by an active projectile.
///
/// Each balloon scores at most once even when several projectiles overlap
/// it. Projectiles keep flying after a hit. A burst is spawned per pop.
pub fn resolve_hits(pools: &mut EntityPools) -> Vec<PopEvent> {
    let mut pops = Vec::new();

    for projectile in pools.projectiles.iter().filter(|p| p.active) {
        for balloon in pools.balloons.iter_mut().filter(|b| !b.popping) {
            if circles_overlap(projectile.pos, projectile.radius, balloon.pos, balloon.radius)
                && balloon.pop()
            {
                pops.push(PopEvent {
                    balloon_id: balloon.id,
                    pos: balloon.pos,
                    color: balloon.color,
                    points: balloon.points(),
                });
            }
        }
    }

    for pop in &pops {
        pools.spawn_burst(pop.pos, pop.color);
    }

    pops
}

/// Total points of a batch of pops
pub fn score_of(pops: &[PopEvent]) -> u64 {
    pops.iter().map(|p| p.points as u64).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BURST_PARTICLES;
    use crate::sim::state::{Balloon, Projectile};

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(Vec2::ZERO, 8.0, Vec2::new(20.0, 0.0), 18.0));
        // Exactly touching is a miss
        assert!(!circles_overlap(Vec2::ZERO, 8.0, Vec2::new(26.0, 0.0), 18.0));
        assert!(!circles_overlap(Vec2::ZERO, 8.0, Vec2::new(100.0, 0.0), 40.0));
    }

    #[test]
    fn test_hit_pops_and_scores_once() {
        let mut pools = EntityPools::new(1);
        pools.balloons.push(Balloon::new(10, Vec2::new(50.0, 50.0), 25.0, 1.0));
        // Two projectiles overlapping the same balloon
        pools.projectiles.push(Projectile::new(1, Vec2::new(45.0, 50.0), Vec2::ZERO));
        pools.projectiles.push(Projectile::new(2, Vec2::new(55.0, 50.0), Vec2::ZERO));

        let pops = resolve_hits(&mut pools);
        assert_eq!(pops.len(), 1);
        assert_eq!(score_of(&pops), 150);
        assert!(pools.balloons[0].popping);
        assert_eq!(pools.particles.len(), BURST_PARTICLES);

        // Next step: already popping, nothing more
        let again = resolve_hits(&mut pools);
        assert!(again.is_empty());
    }

    #[test]
    fn test_projectile_survives_and_pops_several() {
        let mut pools = EntityPools::new(1);
        pools.balloons.push(Balloon::new(10, Vec2::new(0.0, 0.0), 25.0, 1.0));
        pools.balloons.push(Balloon::new(11, Vec2::new(20.0, 0.0), 18.0, 1.0));
        pools.projectiles.push(Projectile::new(1, Vec2::new(10.0, 0.0), Vec2::ZERO));

        let pops = resolve_hits(&mut pools);
        assert_eq!(pops.len(), 2);
        assert_eq!(score_of(&pops), 150 + 203);
        assert!(pools.projectiles[0].active);
    }

    #[test]
    fn test_inactive_projectile_ignored() {
        let mut pools = EntityPools::new(1);
        pools.balloons.push(Balloon::new(10, Vec2::ZERO, 25.0, 1.0));
        let mut p = Projectile::new(1, Vec2::ZERO, Vec2::ZERO);
        p.active = false;
        pools.projectiles.push(p);
        assert!(resolve_hits(&mut pools).is_empty());
    }
}
