use crate::geometry::primitives::Point;

/// Classification of a part's side profile, used to tell flat blanks from
/// single- and double-bend sections.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProfileShape {
    Flat,
    LBend,
    UBend,
    Complex,
}

/// Direction changes sharper than this count as a bend.
const BEND_THRESHOLD: f32 = std::f32::consts::FRAC_PI_4;

/// Classifies a profile polyline by counting its significant direction
/// changes: none is a flat blank, one is an L bend, two a U channel.
pub fn classify_profile(profile: &[Point]) -> ProfileShape {
    let mut bends = 0;
    let mut prev_dir: Option<(f32, f32)> = None;

    for w in profile.windows(2) {
        let (dx, dy) = (w[1].0 - w[0].0, w[1].1 - w[0].1);
        let len = (dx * dx + dy * dy).sqrt();
        if len == 0.0 {
            continue;
        }
        let dir = (dx / len, dy / len);
        if let Some((px, py)) = prev_dir {
            let dot = (px * dir.0 + py * dir.1).clamp(-1.0, 1.0);
            if dot.acos() > BEND_THRESHOLD {
                bends += 1;
            }
        }
        prev_dir = Some(dir);
    }

    match bends {
        0 => ProfileShape::Flat,
        1 => ProfileShape::LBend,
        2 => ProfileShape::UBend,
        _ => ProfileShape::Complex,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(&[Point(0.0, 0.0), Point(50.0, 0.0), Point(100.0, 0.0)], ProfileShape::Flat; "straight blank")]
    #[test_case(&[Point(0.0, 0.0), Point(50.0, 0.0), Point(50.0, 30.0)], ProfileShape::LBend; "one upward bend")]
    #[test_case(&[Point(0.0, 30.0), Point(0.0, 0.0), Point(50.0, 0.0), Point(50.0, 30.0)], ProfileShape::UBend; "channel")]
    #[test_case(&[], ProfileShape::Flat; "empty profile")]
    fn classification(profile: &[Point], expected: ProfileShape) {
        assert_eq!(classify_profile(profile), expected);
    }
}
