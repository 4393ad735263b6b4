//! Reeds-Shepp curves between two tractor poses.
//!
//! Enumerates the analytic shortest-path families for a car that can
//! drive forward or backward with bounded curvature, ignoring obstacles
//! and the trailer. The planner uses the enumeration twice: the shortest
//! curve length is an admissible heuristic, and the sampled curves are
//! candidate goal-connection segments.
//!
//! Curves are computed in the start frame scaled by the maximum
//! curvature, then the twelve base forms are closed under the usual
//! timeflip/reflect symmetries.

use crate::core::normalize_angle;
use std::f32::consts::{FRAC_PI_2, PI};

/// Curvature sign of one path segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment {
    /// Left turn at maximum curvature.
    Left,
    /// Straight line.
    Straight,
    /// Right turn at maximum curvature.
    Right,
}

impl Segment {
    fn reflected(self) -> Segment {
        match self {
            Segment::Left => Segment::Right,
            Segment::Right => Segment::Left,
            Segment::Straight => Segment::Straight,
        }
    }
}

/// One Reeds-Shepp path: per-segment signed lengths in meters (negative
/// means reverse) and the total unsigned length.
#[derive(Clone, Debug)]
pub struct RsPath {
    /// Segment curvature signs.
    pub segments: Vec<Segment>,
    /// Signed segment lengths, meters.
    pub lengths: Vec<f32>,
    /// Sum of unsigned segment lengths, meters.
    pub total_length: f32,
}

/// A path sampled at fixed arc steps: dense tractor poses plus a
/// per-sample forward flag.
#[derive(Clone, Debug)]
pub struct RsSamples {
    /// Sample X positions, meters.
    pub xs: Vec<f32>,
    /// Sample Y positions, meters.
    pub ys: Vec<f32>,
    /// Sample headings, radians.
    pub yaws: Vec<f32>,
    /// True where the sample's segment is driven forward.
    pub forward: Vec<bool>,
}

impl RsSamples {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// True when no samples were produced.
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}

// Candidate in curvature-normalized units.
type Candidate = (Vec<f32>, Vec<Segment>);

// Paths shorter than this (normalized units) are degenerate and dropped.
const MIN_PATH_LENGTH: f32 = 0.01;
// Two candidates with the same segment signature and lengths within this
// tolerance are the same path reached through different symmetries.
const DEDUP_TOLERANCE: f32 = 0.01;

#[inline]
fn polar(x: f32, y: f32) -> (f32, f32) {
    ((x * x + y * y).sqrt(), y.atan2(x))
}

// Wrap to [-π, π]; the family formulas test raw segment angles against
// [0, π] so this must not collapse -π to +π.
#[inline]
fn mod2pi(x: f32) -> f32 {
    let v = x % (2.0 * PI);
    if v < -PI {
        v + 2.0 * PI
    } else if v > PI {
        v - 2.0 * PI
    } else {
        v
    }
}

#[inline]
fn clamped_acos(x: f32) -> f32 {
    x.clamp(-1.0, 1.0).acos()
}

#[inline]
fn clamped_asin(x: f32) -> f32 {
    x.clamp(-1.0, 1.0).asin()
}

use Segment::{Left, Right, Straight};

fn left_straight_left(x: f32, y: f32, phi: f32) -> Option<Candidate> {
    let (u, t) = polar(x - phi.sin(), y - 1.0 + phi.cos());
    if (0.0..=PI).contains(&t) {
        let v = mod2pi(phi - t);
        if (0.0..=PI).contains(&v) {
            return Some((vec![t, u, v], vec![Left, Straight, Left]));
        }
    }
    None
}

fn left_straight_right(x: f32, y: f32, phi: f32) -> Option<Candidate> {
    let (u1, t1) = polar(x + phi.sin(), y - 1.0 - phi.cos());
    let u1_sq = u1 * u1;
    if u1_sq >= 4.0 {
        let u = (u1_sq - 4.0).sqrt();
        let theta = 2.0f32.atan2(u);
        let t = mod2pi(t1 + theta);
        let v = mod2pi(t - phi);
        if t >= 0.0 && v >= 0.0 {
            return Some((vec![t, u, v], vec![Left, Straight, Right]));
        }
    }
    None
}

fn left_x_right_x_left(x: f32, y: f32, phi: f32) -> Option<Candidate> {
    let (u1, theta) = polar(x - phi.sin(), y - 1.0 + phi.cos());
    if u1 <= 4.0 {
        let a = clamped_acos(0.25 * u1);
        let t = mod2pi(a + theta + FRAC_PI_2);
        let u = mod2pi(PI - 2.0 * a);
        let v = mod2pi(phi - t - u);
        return Some((vec![t, -u, v], vec![Left, Right, Left]));
    }
    None
}

fn left_x_right_left(x: f32, y: f32, phi: f32) -> Option<Candidate> {
    let (u1, theta) = polar(x - phi.sin(), y - 1.0 + phi.cos());
    if u1 <= 4.0 {
        let a = clamped_acos(0.25 * u1);
        let t = mod2pi(a + theta + FRAC_PI_2);
        let u = mod2pi(PI - 2.0 * a);
        let v = mod2pi(-phi + t + u);
        return Some((vec![t, -u, -v], vec![Left, Right, Left]));
    }
    None
}

fn left_right_x_left(x: f32, y: f32, phi: f32) -> Option<Candidate> {
    let (u1, theta) = polar(x - phi.sin(), y - 1.0 + phi.cos());
    if u1 <= 4.0 {
        let u = clamped_acos(1.0 - u1 * u1 * 0.125);
        let a = clamped_asin(2.0 * u.sin() / u1);
        let t = mod2pi(-a + theta + FRAC_PI_2);
        let v = mod2pi(t - u - phi);
        return Some((vec![t, u, -v], vec![Left, Right, Left]));
    }
    None
}

fn left_right_x_left_right(x: f32, y: f32, phi: f32) -> Option<Candidate> {
    let (u1, theta) = polar(x + phi.sin(), y - 1.0 - phi.cos());
    if u1 <= 2.0 {
        let a = clamped_acos((u1 + 2.0) * 0.25);
        let t = mod2pi(theta + a + FRAC_PI_2);
        let u = mod2pi(a);
        let v = mod2pi(phi - t + 2.0 * u);
        if t >= 0.0 && u >= 0.0 && v >= 0.0 {
            return Some((vec![t, u, -u, -v], vec![Left, Right, Left, Right]));
        }
    }
    None
}

fn left_x_right_left_x_right(x: f32, y: f32, phi: f32) -> Option<Candidate> {
    let (u1, theta) = polar(x + phi.sin(), y - 1.0 - phi.cos());
    let u2 = (20.0 - u1 * u1) / 16.0;
    if (0.0..=1.0).contains(&u2) {
        let u = clamped_acos(u2);
        let a = clamped_asin(2.0 * u.sin() / u1);
        let t = mod2pi(theta + a + FRAC_PI_2);
        let v = mod2pi(t - phi);
        if t >= 0.0 && v >= 0.0 {
            return Some((vec![t, -u, -u, v], vec![Left, Right, Left, Right]));
        }
    }
    None
}

fn left_x_right90_straight_left(x: f32, y: f32, phi: f32) -> Option<Candidate> {
    let (u1, theta) = polar(x - phi.sin(), y - 1.0 + phi.cos());
    if u1 >= 2.0 {
        let root = (u1 * u1 - 4.0).sqrt();
        let u = root - 2.0;
        let a = 2.0f32.atan2(root);
        let t = mod2pi(theta + a + FRAC_PI_2);
        let v = mod2pi(t - phi + FRAC_PI_2);
        if t >= 0.0 && v >= 0.0 {
            return Some((
                vec![t, -FRAC_PI_2, -u, -v],
                vec![Left, Right, Straight, Left],
            ));
        }
    }
    None
}

fn left_straight_right90_x_left(x: f32, y: f32, phi: f32) -> Option<Candidate> {
    let (u1, theta) = polar(x - phi.sin(), y - 1.0 + phi.cos());
    if u1 >= 2.0 {
        let root = (u1 * u1 - 4.0).sqrt();
        let u = root - 2.0;
        let a = root.atan2(2.0);
        let t = mod2pi(theta - a + FRAC_PI_2);
        let v = mod2pi(t - phi - FRAC_PI_2);
        if t >= 0.0 && v >= 0.0 {
            return Some((
                vec![t, u, FRAC_PI_2, -v],
                vec![Left, Straight, Right, Left],
            ));
        }
    }
    None
}

fn left_x_right90_straight_right(x: f32, y: f32, phi: f32) -> Option<Candidate> {
    let (u1, theta) = polar(x + phi.sin(), y - 1.0 - phi.cos());
    if u1 >= 2.0 {
        let t = mod2pi(theta + FRAC_PI_2);
        let u = u1 - 2.0;
        let v = mod2pi(phi - t - FRAC_PI_2);
        if t >= 0.0 && v >= 0.0 {
            return Some((
                vec![t, -FRAC_PI_2, -u, -v],
                vec![Left, Right, Straight, Right],
            ));
        }
    }
    None
}

fn left_straight_left90_x_right(x: f32, y: f32, phi: f32) -> Option<Candidate> {
    let (u1, theta) = polar(x + phi.sin(), y - 1.0 - phi.cos());
    if u1 >= 2.0 {
        let t = mod2pi(theta);
        let u = u1 - 2.0;
        let v = mod2pi(phi - t - FRAC_PI_2);
        if t >= 0.0 && v >= 0.0 {
            return Some((
                vec![t, u, FRAC_PI_2, -v],
                vec![Left, Straight, Left, Right],
            ));
        }
    }
    None
}

fn left_x_right90_straight_left90_x_right(x: f32, y: f32, phi: f32) -> Option<Candidate> {
    let (u1, theta) = polar(x + phi.sin(), y - 1.0 - phi.cos());
    if u1 >= 4.0 {
        let root = (u1 * u1 - 4.0).sqrt();
        let u = root - 4.0;
        let a = 2.0f32.atan2(root);
        let t = mod2pi(theta + a + FRAC_PI_2);
        let v = mod2pi(t - phi);
        if t >= 0.0 && v >= 0.0 {
            return Some((
                vec![t, -FRAC_PI_2, -u, -FRAC_PI_2, v],
                vec![Left, Right, Straight, Left, Right],
            ));
        }
    }
    None
}

const BASE_FORMS: [fn(f32, f32, f32) -> Option<Candidate>; 12] = [
    left_straight_left,
    left_straight_right,
    left_x_right_x_left,
    left_x_right_left,
    left_right_x_left,
    left_right_x_left_right,
    left_x_right_left_x_right,
    left_x_right90_straight_left,
    left_straight_right90_x_left,
    left_x_right90_straight_right,
    left_straight_left90_x_right,
    left_x_right90_straight_left90_x_right,
];

fn push_unique(candidates: &mut Vec<Candidate>, lengths: Vec<f32>, segments: Vec<Segment>) {
    let total: f32 = lengths.iter().map(|l| l.abs()).sum();
    if total <= MIN_PATH_LENGTH {
        return;
    }
    let duplicate = candidates.iter().any(|(ls, segs)| {
        *segs == segments
            && ls
                .iter()
                .zip(lengths.iter())
                .all(|(a, b)| (a - b).abs() <= DEDUP_TOLERANCE)
    });
    if !duplicate {
        candidates.push((lengths, segments));
    }
}

fn generate_candidates(x: f32, y: f32, phi: f32) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for form in BASE_FORMS {
        if let Some((lengths, segments)) = form(x, y, phi) {
            push_unique(&mut candidates, lengths, segments);
        }
        // Timeflip: drive the mirrored-in-time problem, negate lengths
        if let Some((lengths, segments)) = form(-x, y, -phi) {
            let lengths = lengths.iter().map(|l| -l).collect();
            push_unique(&mut candidates, lengths, segments);
        }
        // Reflect: mirror across the X axis, swap turn directions
        if let Some((lengths, segments)) = form(x, -y, -phi) {
            let segments = segments.iter().map(|s| s.reflected()).collect();
            push_unique(&mut candidates, lengths, segments);
        }
        // Timeflip + reflect
        if let Some((lengths, segments)) = form(-x, -y, phi) {
            let lengths = lengths.iter().map(|l| -l).collect();
            let segments = segments.iter().map(|s| s.reflected()).collect();
            push_unique(&mut candidates, lengths, segments);
        }
    }
    candidates
}

/// Enumerate all Reeds-Shepp paths from `(sx, sy, syaw)` to
/// `(gx, gy, gyaw)` at the given maximum curvature, sorted by total
/// length ascending. Degenerate near-zero-length paths are dropped, so
/// the result is empty for (near-)identical poses.
pub fn enumerate_paths(
    sx: f32,
    sy: f32,
    syaw: f32,
    gx: f32,
    gy: f32,
    gyaw: f32,
    max_curvature: f32,
) -> Vec<RsPath> {
    let dx = gx - sx;
    let dy = gy - sy;
    let cos_s = syaw.cos();
    let sin_s = syaw.sin();
    let x = (cos_s * dx + sin_s * dy) * max_curvature;
    let y = (-sin_s * dx + cos_s * dy) * max_curvature;
    let phi = mod2pi(gyaw - syaw);

    let mut paths: Vec<RsPath> = generate_candidates(x, y, phi)
        .into_iter()
        .map(|(lengths, segments)| {
            let lengths: Vec<f32> = lengths.iter().map(|l| l / max_curvature).collect();
            let total_length = lengths.iter().map(|l| l.abs()).sum();
            RsPath {
                segments,
                lengths,
                total_length,
            }
        })
        .collect();
    paths.sort_by(|a, b| {
        a.total_length
            .partial_cmp(&b.total_length)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    paths
}

/// Length of the shortest Reeds-Shepp path between two tractor poses,
/// ignoring obstacles. `None` for (near-)identical poses.
pub fn shortest_path_length(
    sx: f32,
    sy: f32,
    syaw: f32,
    gx: f32,
    gy: f32,
    gyaw: f32,
    max_curvature: f32,
) -> Option<f32> {
    enumerate_paths(sx, sy, syaw, gx, gy, gyaw, max_curvature)
        .first()
        .map(|p| p.total_length)
}

// Advance from a segment origin (meters) by a normalized arc distance.
fn interpolate(
    dist: f32,
    segment: Segment,
    max_curvature: f32,
    origin: (f32, f32, f32),
) -> (f32, f32, f32) {
    let (ox, oy, oyaw) = origin;
    match segment {
        Straight => (
            ox + dist / max_curvature * oyaw.cos(),
            oy + dist / max_curvature * oyaw.sin(),
            oyaw,
        ),
        Left | Right => {
            let ldx = dist.sin() / max_curvature;
            let (ldy, yaw) = if segment == Left {
                ((1.0 - dist.cos()) / max_curvature, oyaw + dist)
            } else {
                (-(1.0 - dist.cos()) / max_curvature, oyaw - dist)
            };
            let cos_o = oyaw.cos();
            let sin_o = oyaw.sin();
            (
                ox + cos_o * ldx - sin_o * ldy,
                oy + sin_o * ldx + cos_o * ldy,
                yaw,
            )
        }
    }
}

/// Sample a path at fixed arc steps starting from `(sx, sy, syaw)`.
///
/// The first sample is the start pose; the last is the path's endpoint.
/// Interior samples are spaced `step_size` meters apart along each
/// segment, with a shorter final step closing each segment exactly.
pub fn sample_path(
    path: &RsPath,
    sx: f32,
    sy: f32,
    syaw: f32,
    max_curvature: f32,
    step_size: f32,
) -> RsSamples {
    let d_step = step_size * max_curvature;

    // Build in the start-local frame first
    let mut lxs = Vec::new();
    let mut lys = Vec::new();
    let mut lyaws = Vec::new();
    let mut forward = Vec::new();

    let first_forward = path
        .lengths
        .iter()
        .find(|l| l.abs() > 1e-6)
        .map(|l| *l > 0.0)
        .unwrap_or(true);
    lxs.push(0.0);
    lys.push(0.0);
    lyaws.push(0.0);
    forward.push(first_forward);

    let mut origin = (0.0f32, 0.0f32, 0.0f32);
    for (&length_m, &segment) in path.lengths.iter().zip(path.segments.iter()) {
        let length = length_m * max_curvature;
        if length.abs() <= 1e-6 {
            continue;
        }
        let dir = length > 0.0;
        let signed_step = if dir { d_step } else { -d_step };
        let mut travelled = signed_step;
        while travelled.abs() < length.abs() {
            let (px, py, pyaw) = interpolate(travelled, segment, max_curvature, origin);
            lxs.push(px);
            lys.push(py);
            lyaws.push(pyaw);
            forward.push(dir);
            travelled += signed_step;
        }
        let (px, py, pyaw) = interpolate(length, segment, max_curvature, origin);
        lxs.push(px);
        lys.push(py);
        lyaws.push(pyaw);
        forward.push(dir);
        origin = (px, py, pyaw);
    }

    // Rotate into the world frame and translate to the start pose
    let cos_s = syaw.cos();
    let sin_s = syaw.sin();
    let xs = lxs
        .iter()
        .zip(lys.iter())
        .map(|(&lx, &ly)| cos_s * lx - sin_s * ly + sx)
        .collect();
    let ys = lxs
        .iter()
        .zip(lys.iter())
        .map(|(&lx, &ly)| sin_s * lx + cos_s * ly + sy)
        .collect();
    let yaws = lyaws.iter().map(|&ly| normalize_angle(ly + syaw)).collect();

    RsSamples {
        xs,
        ys,
        yaws,
        forward,
    }
}
