// body/tests.rs
// Tests for particles and reaction effects

#[cfg(test)]
mod particle {
    use crate::body::{Particle, Species};
    use ultraviolet::Vec2;

    #[test]
    fn clamp_clips_each_axis_independently() {
        let mut p = Particle::new(Vec2::new(-0.2, 1.7), Species::Acid);
        p.clamp_to_unit();
        assert_eq!(p.pos, Vec2::new(0.0, 1.0));

        let mut q = Particle::new(Vec2::new(0.4, -3.0), Species::Base);
        q.clamp_to_unit();
        assert_eq!(q.pos, Vec2::new(0.4, 0.0));
        assert!(q.in_bounds());
    }

    #[test]
    fn midpoint_is_halfway() {
        let a = Particle::new(Vec2::new(0.2, 0.2), Species::Acid);
        let b = Particle::new(Vec2::new(0.4, 0.6), Species::Base);
        let m = a.midpoint(&b);
        assert!((m.x - 0.3).abs() < 1e-6);
        assert!((m.y - 0.4).abs() < 1e-6);
        assert!((a.distance_sq(&b) - 0.2).abs() < 1e-6);
    }

    #[test]
    fn random_particles_start_inside_unit_square() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..500 {
            assert!(Particle::random(Species::Base, &mut rng).in_bounds());
        }
    }

    #[test]
    fn only_acid_and_base_react() {
        assert!(Species::Acid.is_reactant());
        assert!(Species::Base.is_reactant());
        assert!(!Species::Product.is_reactant());
        assert_eq!(Species::Product.formula(), "H₂O");
    }
}

#[cfg(test)]
mod effects {
    use crate::body::{age_effects, ReactionEffect};
    use crate::config::SimConfig;
    use ultraviolet::Vec2;

    #[test]
    fn effect_grows_by_rate_each_tick() {
        let cfg = SimConfig::default();
        let mut e = ReactionEffect::new(Vec2::new(0.5, 0.5), cfg.effect_min_size);
        e.grow(&cfg);
        e.grow(&cfg);
        assert!((e.size - (cfg.effect_min_size + 2.0 * cfg.effect_growth_rate)).abs() < 1e-6);
        assert_eq!(e.age, 2);
    }

    #[test]
    fn effect_removed_within_lifetime() {
        let cfg = SimConfig::default();
        let lifetime = cfg.effect_lifetime_ticks();
        let mut effects = vec![ReactionEffect::new(Vec2::zero(), cfg.effect_min_size)];
        let mut ticks = 0;
        while !effects.is_empty() {
            age_effects(&mut effects, &cfg);
            ticks += 1;
            assert!(ticks <= lifetime, "effect outlived {} ticks", lifetime);
        }
        assert_eq!(ticks, lifetime);
    }

    #[test]
    fn aging_only_drops_expired_effects() {
        let cfg = SimConfig::default();
        let mut old = ReactionEffect::new(Vec2::zero(), cfg.effect_min_size);
        for _ in 0..cfg.effect_lifetime_ticks() - 1 {
            old.grow(&cfg);
        }
        let fresh = ReactionEffect::new(Vec2::one(), cfg.effect_min_size);
        let mut effects = vec![old, fresh];
        let dropped = age_effects(&mut effects, &cfg);
        assert_eq!(dropped, 1);
        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].pos, Vec2::one());
    }
}
