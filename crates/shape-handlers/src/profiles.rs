//! Meridian profile functions.
//!
//! Pure math: each shape family is a function `r = f(x)` on the closed
//! domain `[0, length]`, with the tip (fore end) at `x = 0` and the base
//! (aft end) at `x = length`. All functions are total and continuous on
//! their domain; out-of-range coefficients are rejected by handler
//! validation before these are ever called.

use rocket_types::Point2;

/// Closed-form nose profile, normalized so `radius_at(0) = 0` and
/// `radius_at(length) = base_radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Profile {
    Cone,
    Elliptical,
    /// Circular-arc meridian with ogive circle radius `rho`.
    Ogive { rho: f64 },
    /// `R (x/L)^k`, `k` in (0, 1].
    Power { k: f64 },
    /// `R (2 t - k t^2) / (2 - k)` with `t = x/L`, `k` in [0, 1].
    Parabolic { k: f64 },
    /// Haack series with coefficient `c >= 0` (0 = Von Karman).
    Haack { c: f64 },
}

impl Profile {
    pub fn radius_at(&self, x: f64, length: f64, base_radius: f64) -> f64 {
        debug_assert!(length > 0.0);
        debug_assert!((0.0..=length + 1e-9).contains(&x));
        let t = (x / length).clamp(0.0, 1.0);
        match *self {
            Profile::Cone => base_radius * t,
            Profile::Elliptical => {
                // Semi-ellipse: r = R sqrt(1 - ((L - x)/L)^2)
                let u = 1.0 - t;
                base_radius * (1.0 - u * u).max(0.0).sqrt()
            }
            Profile::Ogive { rho } => ogive_radius(x, length, base_radius, rho),
            Profile::Power { k } => base_radius * t.powf(k),
            Profile::Parabolic { k } => base_radius * (2.0 * t - k * t * t) / (2.0 - k),
            Profile::Haack { c } => {
                let theta = (1.0 - 2.0 * t).acos();
                let y = theta - (2.0 * theta).sin() / 2.0 + c * theta.sin().powi(3);
                base_radius / std::f64::consts::PI.sqrt() * y.max(0.0).sqrt()
            }
        }
    }
}

/// Ogive circle radius of the tangent ogive for a given nose length and
/// base radius: the unique circle through tip and base whose tangent at
/// the base is parallel to the axis.
pub fn tangent_ogive_rho(length: f64, base_radius: f64) -> f64 {
    (base_radius * base_radius + length * length) / (2.0 * base_radius)
}

/// Center of the ogive circle through the tip (0, 0) and base (L, R)
/// with radius `rho >= tangent_ogive_rho(L, R)`. Returns (cx, cy),
/// cy <= 0.
pub fn ogive_center(length: f64, base_radius: f64, rho: f64) -> (f64, f64) {
    let chord = (length * length + base_radius * base_radius).sqrt();
    let half = chord / 2.0;
    let d = (rho * rho - half * half).max(0.0).sqrt();
    // Perpendicular of the chord pointing below the axis.
    let cx = length / 2.0 + d * base_radius / chord;
    let cy = base_radius / 2.0 - d * length / chord;
    (cx, cy)
}

fn ogive_radius(x: f64, length: f64, base_radius: f64, rho: f64) -> f64 {
    let (cx, cy) = ogive_center(length, base_radius, rho);
    let dx = x - cx;
    cy + (rho * rho - dx * dx).max(0.0).sqrt()
}

/// Spherical blunting of an ogive tip: the cap sphere of radius
/// `cap_radius` internally tangent to the ogive meridian.
#[derive(Debug, Clone, Copy)]
pub struct BluntedTip {
    /// Sphere center on the axis.
    pub sphere_center_x: f64,
    /// Axial position of the cap apex (`sphere_center_x - cap_radius`).
    pub apex_x: f64,
    /// Tangency point between sphere and ogive curve.
    pub tangent: Point2,
}

/// Compute the blunting geometry, or `None` when the cap cannot be made
/// tangent to the ogive (cap too large for the curve).
pub fn blunted_tip(length: f64, base_radius: f64, rho: f64, cap_radius: f64) -> Option<BluntedTip> {
    let (cx, cy) = ogive_center(length, base_radius, rho);
    let reach = rho - cap_radius;
    if reach <= cy.abs() {
        return None;
    }
    let sphere_center_x = cx - (reach * reach - cy * cy).sqrt();
    // Tangency lies on the ray from the ogive center through the sphere
    // center, at distance rho.
    let scale = rho / reach;
    let tangent = Point2::new(
        cx + (sphere_center_x - cx) * scale,
        cy + (0.0 - cy) * scale,
    );
    if tangent.x <= sphere_center_x || tangent.x >= length {
        return None;
    }
    Some(BluntedTip {
        sphere_center_x,
        apex_x: sphere_center_x - cap_radius,
        tangent,
    })
}

/// Radius of a transition at axial position `x`, fore radius at `x = 0`,
/// aft radius at `x = length`.
///
/// Clipped (the standard result): the normalized family curve
/// interpolates between the two radii over the physical length.
/// Unclipped: the meridian is continued to a virtual full-size apex and
/// the physical window of that larger nose profile is used.
pub fn transition_radius(
    profile: &Profile,
    x: f64,
    length: f64,
    fore_radius: f64,
    aft_radius: f64,
    clipped: bool,
) -> f64 {
    if (fore_radius - aft_radius).abs() < 1e-12 {
        return fore_radius;
    }
    // Normalize so the radius grows along +x; mirror otherwise.
    let (x, r_small, r_large) = if fore_radius < aft_radius {
        (x, fore_radius, aft_radius)
    } else {
        (length - x, aft_radius, fore_radius)
    };

    if clipped {
        let f = profile.radius_at(x, length, 1.0);
        r_small + (r_large - r_small) * f
    } else {
        let virtual_len = virtual_length(profile, length, r_small, r_large);
        virtual_profile(profile, virtual_len, r_large).radius_at(
            x + (virtual_len - length),
            virtual_len,
            r_large,
        )
    }
}

/// Profile evaluated over a virtual window of length `lv`. The ogive
/// circle radius is tied to the window it spans, so the tangent form is
/// recomputed for `lv`; every other family scales with the window.
fn virtual_profile(profile: &Profile, lv: f64, r_large: f64) -> Profile {
    match *profile {
        Profile::Ogive { .. } => Profile::Ogive {
            rho: tangent_ogive_rho(lv, r_large),
        },
        p => p,
    }
}

/// Virtual nose length `Lv >= L` such that the family profile with base
/// radius `r_large` over `Lv` passes through `r_small` at `Lv - L`.
/// Closed form where available, bisection otherwise.
pub fn virtual_length(profile: &Profile, length: f64, r_small: f64, r_large: f64) -> f64 {
    debug_assert!(r_small < r_large);
    let ratio = r_small / r_large;
    match *profile {
        Profile::Cone => length / (1.0 - ratio),
        Profile::Power { k } => length / (1.0 - ratio.powf(1.0 / k)),
        Profile::Elliptical => length / (1.0 - ratio * ratio).sqrt(),
        _ => bisect_virtual_length(profile, length, r_small, r_large),
    }
}

fn bisect_virtual_length(profile: &Profile, length: f64, r_small: f64, r_large: f64) -> f64 {
    // g(Lv) = f(Lv - L; Lv, r_large) - r_small is monotonic in Lv:
    // negative just above L, approaching r_large - r_small > 0 as Lv grows.
    let g = |lv: f64| {
        virtual_profile(profile, lv, r_large).radius_at(lv - length, lv, r_large) - r_small
    };

    let mut lo = length * (1.0 + 1e-9);
    let mut hi = length * 2.0;
    while g(hi) < 0.0 && hi < length * 1e9 {
        hi *= 2.0;
    }
    for _ in 0..200 {
        let mid = (lo + hi) / 2.0;
        if g(mid) < 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    (lo + hi) / 2.0
}

/// Sample a nose meridian into `resolution` points (tip first), with the
/// endpoints pinned exactly so downstream wires close without gaps.
pub fn sample_nose(profile: &Profile, length: f64, base_radius: f64, resolution: usize) -> Vec<Point2> {
    let n = resolution.max(2);
    let mut points = Vec::with_capacity(n);
    for i in 0..n {
        let x = length * i as f64 / (n - 1) as f64;
        points.push(Point2::new(x, profile.radius_at(x, length, base_radius)));
    }
    points[0] = Point2::new(0.0, 0.0);
    points[n - 1] = Point2::new(length, base_radius);
    points
}

/// Sample a transition meridian into `resolution` points (fore first),
/// endpoints pinned exactly to the fore/aft radii.
pub fn sample_transition(
    profile: &Profile,
    length: f64,
    fore_radius: f64,
    aft_radius: f64,
    clipped: bool,
    resolution: usize,
) -> Vec<Point2> {
    let n = resolution.max(2);
    let mut points = Vec::with_capacity(n);
    for i in 0..n {
        let x = length * i as f64 / (n - 1) as f64;
        points.push(Point2::new(
            x,
            transition_radius(profile, x, length, fore_radius, aft_radius, clipped),
        ));
    }
    points[0] = Point2::new(0.0, fore_radius);
    points[n - 1] = Point2::new(length, aft_radius);
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn cone_is_linear() {
        let p = Profile::Cone;
        assert_eq!(p.radius_at(0.0, 100.0, 20.0), 0.0);
        assert_eq!(p.radius_at(50.0, 100.0, 20.0), 10.0);
        assert_eq!(p.radius_at(100.0, 100.0, 20.0), 20.0);
    }

    #[test]
    fn families_hit_base_radius() {
        let families = [
            Profile::Cone,
            Profile::Elliptical,
            Profile::Ogive {
                rho: tangent_ogive_rho(100.0, 20.0),
            },
            Profile::Power { k: 0.5 },
            Profile::Parabolic { k: 1.0 },
            Profile::Haack { c: 0.0 },
            Profile::Haack { c: 1.0 / 3.0 },
        ];
        for p in families {
            let tip = p.radius_at(0.0, 100.0, 20.0);
            let base = p.radius_at(100.0, 100.0, 20.0);
            assert!(tip.abs() < 1e-9, "{:?} tip = {}", p, tip);
            assert!((base - 20.0).abs() < 1e-9, "{:?} base = {}", p, base);
        }
    }

    #[test]
    fn tangent_ogive_center_sits_at_base() {
        let rho = tangent_ogive_rho(100.0, 20.0);
        let (cx, cy) = ogive_center(100.0, 20.0, rho);
        assert!((cx - 100.0).abs() < 1e-9);
        assert!((cy - (20.0 - rho)).abs() < 1e-9);
    }

    #[test]
    fn blunted_tip_is_tangent_and_feasible() {
        let rho = tangent_ogive_rho(100.0, 20.0);
        let tip = blunted_tip(100.0, 20.0, rho, 5.0).unwrap();
        assert!(tip.apex_x > 0.0);
        assert!(tip.tangent.x > tip.sphere_center_x);
        // Tangency point lies on the sphere.
        let d = ((tip.tangent.x - tip.sphere_center_x).powi(2) + tip.tangent.r.powi(2)).sqrt();
        assert!((d - 5.0).abs() < 1e-9);
        // Oversized cap is rejected.
        assert!(blunted_tip(100.0, 20.0, rho, 21.0).is_none());
    }

    #[test]
    fn clipped_transition_interpolates_endpoints() {
        for clipped in [true, false] {
            let r0 = transition_radius(&Profile::Cone, 0.0, 60.0, 10.0, 20.0, clipped);
            let r1 = transition_radius(&Profile::Cone, 60.0, 60.0, 10.0, 20.0, clipped);
            assert!((r0 - 10.0).abs() < 1e-9, "clipped={}", clipped);
            assert!((r1 - 20.0).abs() < 1e-9, "clipped={}", clipped);
        }
    }

    #[test]
    fn unclipped_cone_transition_matches_virtual_apex() {
        // Virtual cone: Lv = L * r2 / (r2 - r1) = 120 for L=60, 10->20.
        let lv = virtual_length(&Profile::Cone, 60.0, 10.0, 20.0);
        assert!((lv - 120.0).abs() < 1e-9);
        let mid = transition_radius(&Profile::Cone, 30.0, 60.0, 10.0, 20.0, false);
        assert!((mid - 15.0).abs() < 1e-9);
    }

    #[test]
    fn bisection_virtual_length_converges_for_haack() {
        let p = Profile::Haack { c: 0.0 };
        let lv = virtual_length(&p, 60.0, 10.0, 20.0);
        assert!(lv > 60.0);
        let at_window_start = p.radius_at(lv - 60.0, lv, 20.0);
        assert!((at_window_start - 10.0).abs() < 1e-6);
    }

    #[test]
    fn unclipped_ogive_transition_stays_on_one_circle() {
        // Extreme ratio: 2 -> 30 over 40. The virtual-window ogive circle
        // must pass through both end radii, with no kink at the small end.
        let p = Profile::Ogive {
            rho: tangent_ogive_rho(40.0, 30.0),
        };
        let lv = virtual_length(&p, 40.0, 2.0, 30.0);
        let rho_v = tangent_ogive_rho(lv, 30.0);
        // Base of the virtual window sits at the physical aft end, so the
        // circle center is at (length, r_large - rho_v).
        let (cx, cy) = (40.0, 30.0 - rho_v);
        for i in 0..=100 {
            let x = 40.0 * i as f64 / 100.0;
            let r = transition_radius(&p, x, 40.0, 2.0, 30.0, false);
            let d = ((x - cx).powi(2) + (r - cy).powi(2)).sqrt();
            assert!((d - rho_v).abs() < 1e-6, "x = {x}: off circle by {}", d - rho_v);
        }
        let at_fore = transition_radius(&p, 0.0, 40.0, 2.0, 30.0, false);
        assert!((at_fore - 2.0).abs() < 1e-6);
    }

    #[test]
    fn reversed_transition_mirrors() {
        // Shrinking transition (fore 20 -> aft 10) mirrors the growing one.
        let a = transition_radius(&Profile::Power { k: 0.5 }, 15.0, 60.0, 20.0, 10.0, true);
        let b = transition_radius(&Profile::Power { k: 0.5 }, 45.0, 60.0, 10.0, 20.0, true);
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn samples_pin_endpoints() {
        let pts = sample_transition(&Profile::Haack { c: 0.0 }, 60.0, 10.0, 20.0, true, 50);
        assert_eq!(pts[0], Point2::new(0.0, 10.0));
        assert_eq!(pts[49], Point2::new(60.0, 20.0));
    }

    proptest! {
        #[test]
        fn cone_profile_monotonic(
            length in 1.0f64..1000.0,
            fore in 0.0f64..50.0,
            delta in 0.1f64..50.0,
        ) {
            let aft = fore + delta;
            let steps = 64;
            let mut prev = f64::NEG_INFINITY;
            for i in 0..=steps {
                let x = length * i as f64 / steps as f64;
                let r = transition_radius(&Profile::Cone, x, length, fore, aft, true);
                prop_assert!(r >= prev - 1e-9);
                prev = r;
            }
        }

        #[test]
        fn profiles_stay_non_negative(
            x in 0.0f64..=1.0,
            k in 0.05f64..=1.0,
            c in 0.0f64..=1.0,
        ) {
            let families = [
                Profile::Cone,
                Profile::Elliptical,
                Profile::Power { k },
                Profile::Parabolic { k },
                Profile::Haack { c },
            ];
            for p in families {
                prop_assert!(p.radius_at(x * 100.0, 100.0, 20.0) >= 0.0);
            }
        }
    }
}
